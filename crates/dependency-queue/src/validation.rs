//! Dependency-graph validation: unprovided topics and cycle detection.

use std::collections::HashMap;

use crate::error::ValidationError;
use crate::topic_map::TopicMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    Unseen,
    InProgress,
    Done,
}

/// Walks every topic, reporting unprovided topics and dependency cycles.
///
/// Topics are visited in map enumeration order; items within a topic's
/// `provided_by` and names within an item's `requires` in insertion order.
/// This ordering is what makes "which edge gets reported as the cycle
/// edge" a stable, observable property rather than a hash-order accident.
pub fn validate<V>(topics: &TopicMap<V>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut colors: HashMap<String, Color> = topics
        .iter()
        .map(|(name, _)| (name.to_string(), Color::Unseen))
        .collect();

    for (name, topic) in topics.iter() {
        if topic.provided_by().is_empty() {
            errors.push(ValidationError::UnprovidedTopic {
                topic: name.to_string(),
            });
        }
    }

    let names: Vec<String> = topics.iter().map(|(n, _)| n.to_string()).collect();
    for name in names {
        if colors.get(&name).copied() == Some(Color::Unseen) {
            visit(&name, topics, &mut colors, &mut errors);
        }
    }

    errors
}

fn visit<V>(
    topic_name: &str,
    topics: &TopicMap<V>,
    colors: &mut HashMap<String, Color>,
    errors: &mut Vec<ValidationError>,
) {
    colors.insert(topic_name.to_string(), Color::InProgress);

    if let Some(topic) = topics.get(topic_name) {
        for item in topic.provided_by() {
            for required_topic in item.requires() {
                match colors.get(&required_topic).copied() {
                    Some(Color::InProgress) => {
                        errors.push(ValidationError::Cycle {
                            requiring_item: item.name().to_string(),
                            required_topic: required_topic.clone(),
                        });
                    }
                    Some(Color::Unseen) | None => {
                        visit(&required_topic, topics, colors, errors);
                    }
                    Some(Color::Done) => {}
                }
            }
        }
    }

    colors.insert(topic_name.to_string(), Color::Done);
}
