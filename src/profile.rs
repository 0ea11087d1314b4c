//! Show/site profiles
//!
//! A profile carries default token values and a root path for a show or
//! site, so artists only supply the tokens that vary per request. Profiles
//! are TOML documents with an optional `[metadata]` table, an optional
//! `[paths]` table, and a `[tokens]` table of scalar defaults.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::tokens::{TokenMap, TokenValue};

/// Errors that can occur when loading or parsing profiles
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("failed to read profile file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse profile TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unsupported value for token '{token}' (expected a scalar)")]
    UnsupportedValue { token: String },
}

/// Default tokens and path settings for a show or site
#[derive(Debug, Clone, Default)]
pub struct Profile {
    /// Optional name for the profile
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Root path prepended to every built path
    pub root_path: Option<String>,
    tokens: TokenMap,
}

/// TOML structure for deserializing profiles
#[derive(Deserialize)]
struct TomlProfile {
    metadata: Option<TomlMetadata>,
    paths: Option<TomlPaths>,
    #[serde(default)]
    tokens: toml::Table,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct TomlPaths {
    root: Option<String>,
}

impl Profile {
    /// Load a profile from a TOML file
    pub fn from_file(path: &Path) -> Result<Profile, ProfileError> {
        let content = std::fs::read_to_string(path)?;
        Profile::from_str(&content)
    }

    /// Load a profile from a TOML string
    pub fn from_str(content: &str) -> Result<Profile, ProfileError> {
        let parsed: TomlProfile = toml::from_str(content)?;

        let mut tokens = TokenMap::new();
        for (name, value) in &parsed.tokens {
            let value = match value {
                toml::Value::String(text) => TokenValue::Str(text.clone()),
                toml::Value::Integer(number) => TokenValue::Int(*number),
                toml::Value::Float(number) => TokenValue::Float(*number),
                toml::Value::Boolean(flag) => TokenValue::Bool(*flag),
                _ => {
                    return Err(ProfileError::UnsupportedValue {
                        token: name.clone(),
                    })
                }
            };
            tokens.insert(name.clone(), value);
        }

        Ok(Profile {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            root_path: parsed.paths.and_then(|p| p.root),
            tokens,
        })
    }

    /// Default tokens declared by this profile
    pub fn tokens(&self) -> &TokenMap {
        &self.tokens
    }

    /// Fill profile defaults into `tokens`, keeping any value already set
    pub fn apply(&self, tokens: &mut TokenMap) {
        for (name, value) in self.tokens.iter() {
            if !tokens.contains(name) {
                tokens.insert(name, value.clone());
            }
        }
    }
}
