//! Schema documents describing the path hierarchy
//!
//! A schema is a YAML mapping of root names to nested child lists. Each
//! child entry is `{name: data}` where `data` is one of three shapes,
//! decided once here at parse time:
//!
//! - a list: the entry's children, with default naming rules
//! - a mapping: per-node metadata (`naming`, `preserve`, `children`)
//! - null or a scalar: a leaf with default naming rules

use std::path::{Path, PathBuf};

use saphyr::{Hash, Yaml, YamlLoader};
use thiserror::Error;

/// Errors that can occur while loading or shaping a schema document
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Error reading the schema file
    #[error("failed to read schema file {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// The document is not valid YAML
    #[error("failed to parse schema: {0}")]
    Parse(String),

    /// The document parsed but does not have the expected structure
    #[error("invalid schema shape: {0}")]
    Shape(String),
}

/// A parsed schema document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub roots: Vec<SchemaRoot>,
}

/// One top-level entry. The root name itself produces no path segment; its
/// value is the first generation of children.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRoot {
    pub name: String,
    pub entries: Vec<SchemaEntry>,
}

/// One named child in the hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    pub name: String,
    pub data: SchemaData,
}

/// The three shapes an entry's data can take
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaData {
    /// No metadata, no children
    Leaf,
    /// A plain child list with default naming rules
    Children(Vec<SchemaEntry>),
    /// Per-node metadata, possibly with children
    Annotated(AnnotatedNode),
}

/// Metadata carried by a mapping-shaped entry
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedNode {
    /// Pattern override; `preserve` wins over it at compile time
    pub naming: Option<String>,
    /// Use the key name verbatim, with no substitution
    pub preserve: bool,
    /// Present only when the `children` key holds a list
    pub children: Option<Vec<SchemaEntry>>,
}

impl Schema {
    /// Load a schema from a YAML file
    pub fn from_file(path: &Path) -> Result<Schema, SchemaError> {
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Schema::from_str(&content)
    }

    /// Parse a schema from a YAML string. An empty document yields an empty
    /// schema; only the first document of a multi-document stream is read.
    pub fn from_str(source: &str) -> Result<Schema, SchemaError> {
        let docs =
            YamlLoader::load_from_str(source).map_err(|e| SchemaError::Parse(e.to_string()))?;
        let doc = match docs.first() {
            Some(doc) if !doc.is_null() => doc,
            _ => return Ok(Schema::default()),
        };

        let mapping = doc.as_hash().ok_or_else(|| {
            SchemaError::Shape(format!(
                "schema root must be a mapping, found {}",
                yaml_type_name(doc)
            ))
        })?;

        let mut roots = Vec::new();
        for (key, value) in mapping.iter() {
            let name = string_key(key, "schema root")?;
            let entries = parse_entry_list(value, &name)?;
            roots.push(SchemaRoot { name, entries });
        }
        Ok(Schema { roots })
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

fn string_key(key: &Yaml, context: &str) -> Result<String, SchemaError> {
    key.as_str().map(str::to_owned).ok_or_else(|| {
        SchemaError::Shape(format!(
            "{} keys must be strings, found {}",
            context,
            yaml_type_name(key)
        ))
    })
}

fn parse_entry_list(value: &Yaml, parent: &str) -> Result<Vec<SchemaEntry>, SchemaError> {
    let items = value.as_vec().ok_or_else(|| {
        SchemaError::Shape(format!(
            "children of '{}' must be a list, found {}",
            parent,
            yaml_type_name(value)
        ))
    })?;

    let mut entries = Vec::new();
    for item in items {
        // A list element mapping with several keys yields one entry per key,
        // in document order.
        let mapping = item.as_hash().ok_or_else(|| {
            SchemaError::Shape(format!(
                "each child of '{}' must be a mapping, found {}",
                parent,
                yaml_type_name(item)
            ))
        })?;
        for (key, data) in mapping.iter() {
            let name = string_key(key, "child")?;
            let data = parse_data(data, &name)?;
            entries.push(SchemaEntry { name, data });
        }
    }
    Ok(entries)
}

fn parse_data(data: &Yaml, name: &str) -> Result<SchemaData, SchemaError> {
    match data {
        Yaml::Array(_) => Ok(SchemaData::Children(parse_entry_list(data, name)?)),
        Yaml::Hash(mapping) => {
            let naming = lookup(mapping, "naming")
                .and_then(Yaml::as_str)
                .map(str::to_owned);
            let preserve = lookup(mapping, "preserve")
                .and_then(Yaml::as_bool)
                .unwrap_or(false);
            let children = match lookup(mapping, "children") {
                Some(value @ Yaml::Array(_)) => Some(parse_entry_list(value, name)?),
                _ => None,
            };
            Ok(SchemaData::Annotated(AnnotatedNode {
                naming,
                preserve,
                children,
            }))
        }
        _ => Ok(SchemaData::Leaf),
    }
}

fn lookup<'a>(mapping: &'a Hash, key: &str) -> Option<&'a Yaml> {
    mapping.get(&Yaml::String(key.to_owned()))
}

pub(crate) fn yaml_type_name(value: &Yaml) -> &'static str {
    match value {
        Yaml::Real(_) => "a float",
        Yaml::Integer(_) => "an integer",
        Yaml::String(_) => "a string",
        Yaml::Boolean(_) => "a boolean",
        Yaml::Array(_) => "a sequence",
        Yaml::Hash(_) => "a mapping",
        Yaml::Null => "null",
        _ => "an unsupported value",
    }
}
