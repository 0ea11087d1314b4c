//! Token values supplied by callers to fill naming-pattern placeholders

use std::collections::HashMap;
use std::fmt;

use saphyr::{Yaml, YamlLoader};

use crate::error::TemplateError;
use crate::schema::yaml_type_name;

/// A scalar value usable inside a path segment
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Str(value) => f.write_str(value),
            TokenValue::Int(value) => write!(f, "{}", value),
            TokenValue::Float(value) => write!(f, "{}", value),
            TokenValue::Bool(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        TokenValue::Str(value.to_string())
    }
}

impl From<String> for TokenValue {
    fn from(value: String) -> Self {
        TokenValue::Str(value)
    }
}

impl From<i64> for TokenValue {
    fn from(value: i64) -> Self {
        TokenValue::Int(value)
    }
}

impl From<i32> for TokenValue {
    fn from(value: i32) -> Self {
        TokenValue::Int(value as i64)
    }
}

impl From<f64> for TokenValue {
    fn from(value: f64) -> Self {
        TokenValue::Float(value)
    }
}

impl From<bool> for TokenValue {
    fn from(value: bool) -> Self {
        TokenValue::Bool(value)
    }
}

/// Named token values for one resolution request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenMap {
    values: HashMap<String, TokenValue>,
}

impl TokenMap {
    pub fn new() -> TokenMap {
        TokenMap::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<TokenValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&TokenValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a token map from an already-parsed YAML document.
    ///
    /// The document must be a mapping of string names to scalar values;
    /// anything else fails with `InvalidTokens`.
    pub fn from_yaml(doc: &Yaml) -> Result<TokenMap, TemplateError> {
        let mapping = match doc {
            Yaml::Hash(mapping) => mapping,
            other => {
                return Err(TemplateError::InvalidTokens {
                    reason: format!("expected a mapping, found {}", yaml_type_name(other)),
                })
            }
        };

        let mut map = TokenMap::new();
        for (key, value) in mapping.iter() {
            let name = key.as_str().ok_or_else(|| TemplateError::InvalidTokens {
                reason: format!("token names must be strings, found {}", yaml_type_name(key)),
            })?;
            let value = match value {
                Yaml::String(text) => TokenValue::Str(text.clone()),
                Yaml::Integer(number) => TokenValue::Int(*number),
                Yaml::Boolean(flag) => TokenValue::Bool(*flag),
                Yaml::Real(text) => match text.parse::<f64>() {
                    Ok(number) => TokenValue::Float(number),
                    Err(_) => {
                        return Err(TemplateError::InvalidTokens {
                            reason: format!("token '{}' has an unreadable number", name),
                        })
                    }
                },
                other => {
                    return Err(TemplateError::InvalidTokens {
                        reason: format!(
                            "token '{}' has a non-scalar value ({})",
                            name,
                            yaml_type_name(other)
                        ),
                    })
                }
            };
            map.insert(name, value);
        }
        Ok(map)
    }

    /// Parse a YAML document and build a token map from it
    pub fn from_yaml_str(source: &str) -> Result<TokenMap, TemplateError> {
        let docs = YamlLoader::load_from_str(source).map_err(|e| TemplateError::InvalidTokens {
            reason: format!("unreadable token document: {}", e),
        })?;
        match docs.first() {
            Some(doc) => TokenMap::from_yaml(doc),
            None => Err(TemplateError::InvalidTokens {
                reason: "expected a mapping, found an empty document".to_string(),
            }),
        }
    }
}

impl FromIterator<(String, TokenValue)> for TokenMap {
    fn from_iter<I: IntoIterator<Item = (String, TokenValue)>>(iter: I) -> TokenMap {
        TokenMap {
            values: iter.into_iter().collect(),
        }
    }
}
