//! Equality filter construction for Qdrant searches.
//!
//! Currently supports exact equality on scalar payload fields (`String`,
//! integer `Number`, `Bool`); the main user is the namespace restriction.

use qdrant_client::qdrant::{Condition, FieldCondition, Filter, Match, condition::ConditionOneOf};
use tracing::debug;

/// Builds a conjunctive equality [`Filter`] over the given `(field, value)`
/// pairs. Unsupported value types are skipped.
pub fn equals_filter(equals: &[(String, serde_json::Value)]) -> Filter {
    debug!("filters::equals_filter equals={}", equals.len());

    let mut must: Vec<Condition> = Vec::new();

    for (field, val) in equals {
        let m = match val {
            serde_json::Value::String(s) => Match {
                match_value: Some(qdrant_client::qdrant::r#match::MatchValue::Keyword(
                    s.clone(),
                )),
            },
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Match {
                        match_value: Some(qdrant_client::qdrant::r#match::MatchValue::Integer(i)),
                    }
                } else {
                    continue;
                }
            }
            serde_json::Value::Bool(b) => Match {
                match_value: Some(qdrant_client::qdrant::r#match::MatchValue::Boolean(*b)),
            },
            _ => continue, // skip unsupported types
        };

        must.push(Condition {
            condition_one_of: Some(ConditionOneOf::Field(FieldCondition {
                key: field.clone(),
                r#match: Some(m),
                ..Default::default()
            })),
        });
    }

    Filter {
        must,
        ..Default::default()
    }
}

/// Filter restricting a search to one logical namespace.
pub fn namespace_filter(namespace: &str) -> Filter {
    equals_filter(&[(
        "namespace".to_string(),
        serde_json::Value::String(namespace.to_string()),
    )])
}
