//! Fixed classification vocabularies.
//!
//! Topic, sentiment, and priority are first-class enums; the classifier's
//! instruction text is rendered from the `ALL` tables here, so the allowed
//! values in the prompt can never drift from what the parser accepts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "How-to")]
    HowTo,
    Product,
    Connector,
    Lineage,
    #[serde(rename = "API/SDK")]
    ApiSdk,
    #[serde(rename = "SSO")]
    Sso,
    Glossary,
    #[serde(rename = "Best practices")]
    BestPractices,
    #[serde(rename = "Sensitive data")]
    SensitiveData,
}

impl Topic {
    pub const ALL: [Topic; 9] = [
        Topic::HowTo,
        Topic::Product,
        Topic::Connector,
        Topic::Lineage,
        Topic::ApiSdk,
        Topic::Sso,
        Topic::Glossary,
        Topic::BestPractices,
        Topic::SensitiveData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::HowTo => "How-to",
            Topic::Product => "Product",
            Topic::Connector => "Connector",
            Topic::Lineage => "Lineage",
            Topic::ApiSdk => "API/SDK",
            Topic::Sso => "SSO",
            Topic::Glossary => "Glossary",
            Topic::BestPractices => "Best practices",
            Topic::SensitiveData => "Sensitive data",
        }
    }

    /// Whether tickets on this topic can be answered from the documentation
    /// collections. Exhaustive: five topics get a grounded answer, the other
    /// four are routed to a team.
    pub fn answerable_from_docs(&self) -> bool {
        match self {
            Topic::HowTo
            | Topic::Product
            | Topic::BestPractices
            | Topic::ApiSdk
            | Topic::Sso => true,
            Topic::Connector
            | Topic::Lineage
            | Topic::Glossary
            | Topic::SensitiveData => false,
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Frustrated,
    Curious,
    Angry,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 4] = [
        Sentiment::Frustrated,
        Sentiment::Curious,
        Sentiment::Angry,
        Sentiment::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Frustrated => "Frustrated",
            Sentiment::Curious => "Curious",
            Sentiment::Angry => "Angry",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    P0,
    P1,
    P2,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::P0, Priority::P1, Priority::P2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P0 => "P0",
            Priority::P1 => "P1",
            Priority::P2 => "P2",
        }
    }

    /// Human label used in the classification instruction
    pub fn label(&self) -> &'static str {
        match self {
            Priority::P0 => "High",
            Priority::P1 => "Medium",
            Priority::P2 => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The label triple assigned to a ticket or free-text question.
/// Produced once per text and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub topic: Topic,
    pub sentiment: Sentiment,
    pub priority: Priority,
}

impl Classification {
    /// Safe defaults substituted when the model reply cannot be parsed or
    /// the provider rejects the request.
    pub fn fallback() -> Self {
        Self {
            topic: Topic::Product,
            sentiment: Sentiment::Neutral,
            priority: Priority::P2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_round_trip() {
        for topic in Topic::ALL {
            let json = serde_json::to_string(&topic).unwrap();
            assert_eq!(json, format!("\"{}\"", topic.as_str()));
            let back: Topic = serde_json::from_str(&json).unwrap();
            assert_eq!(back, topic);
        }
    }

    #[test]
    fn test_answerable_split() {
        let answerable: Vec<Topic> = Topic::ALL
            .into_iter()
            .filter(Topic::answerable_from_docs)
            .collect();
        assert_eq!(
            answerable,
            vec![
                Topic::HowTo,
                Topic::Product,
                Topic::ApiSdk,
                Topic::Sso,
                Topic::BestPractices,
            ]
        );
    }

    #[test]
    fn test_classification_parse() {
        let raw = r#"{"topic": "API/SDK", "sentiment": "Curious", "priority": "P2"}"#;
        let c: Classification = serde_json::from_str(raw).unwrap();
        assert_eq!(c.topic, Topic::ApiSdk);
        assert_eq!(c.sentiment, Sentiment::Curious);
        assert_eq!(c.priority, Priority::P2);
    }

    #[test]
    fn test_classification_rejects_unknown_topic() {
        let raw = r#"{"topic": "Billing", "sentiment": "Neutral", "priority": "P2"}"#;
        assert!(serde_json::from_str::<Classification>(raw).is_err());
    }

    #[test]
    fn test_fallback_values() {
        let c = Classification::fallback();
        assert_eq!(c.topic, Topic::Product);
        assert_eq!(c.sentiment, Sentiment::Neutral);
        assert_eq!(c.priority, Priority::P2);
    }
}
