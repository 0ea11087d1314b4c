//! Compiles a schema into an addressable collection of template nodes

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::TemplateError;
use crate::schema::{Schema, SchemaData, SchemaEntry};
use crate::template::{join_path, NodeId, TemplateNode};
use crate::tokens::TokenMap;

/// The template hierarchy for a show, compiled from a schema document.
///
/// The tree owns every node in a flat arena and keeps an index from logical
/// key to node, so path queries go straight to the right node instead of
/// searching the hierarchy. It is built once and then queried; there is no
/// incremental mutation API.
#[derive(Debug, Default)]
pub struct TemplateTree {
    source: Option<PathBuf>,
    schema: Option<Schema>,
    nodes: Vec<TemplateNode>,
    index: HashMap<String, NodeId>,
    root_path: String,
}

impl TemplateTree {
    /// Create an empty tree. Every `build_path` call fails with
    /// `KeyNotFound` until a schema is loaded and compiled.
    pub fn new() -> TemplateTree {
        TemplateTree::default()
    }

    /// Load and compile a schema file
    pub fn from_file(path: &Path) -> Result<TemplateTree, TemplateError> {
        let mut tree = TemplateTree {
            source: Some(path.to_path_buf()),
            ..TemplateTree::default()
        };
        tree.load()?;
        Ok(tree)
    }

    /// Compile an already-parsed schema
    pub fn from_schema(schema: Schema) -> TemplateTree {
        let mut tree = TemplateTree {
            schema: Some(schema),
            ..TemplateTree::default()
        };
        tree.compile();
        tree
    }

    /// Parse and compile an inline schema document
    pub fn from_schema_str(source: &str) -> Result<TemplateTree, TemplateError> {
        Ok(TemplateTree::from_schema(Schema::from_str(source)?))
    }

    /// Set the prefix prepended to every built path
    pub fn with_root_path(mut self, root_path: impl Into<String>) -> TemplateTree {
        self.root_path = root_path.into();
        self
    }

    pub fn set_root_path(&mut self, root_path: impl Into<String>) {
        self.root_path = root_path.into();
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    /// Point the tree at a schema file for later `load` calls
    pub fn set_source(&mut self, path: PathBuf) {
        self.source = Some(path);
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Re-read the schema from the configured source and rebuild the
    /// hierarchy. Fails with `NoSchemaSource` if no source is set.
    pub fn load(&mut self) -> Result<(), TemplateError> {
        self.load_schema()?;
        self.compile();
        Ok(())
    }

    /// Re-read the schema without rebuilding the hierarchy, for callers
    /// that only want to inspect the document.
    pub fn load_schema(&mut self) -> Result<(), TemplateError> {
        let source = self.source.as_ref().ok_or(TemplateError::NoSchemaSource)?;
        self.schema = Some(Schema::from_file(source)?);
        Ok(())
    }

    /// The parsed schema, if one has been loaded
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Rebuild the node arena and key index from the owned schema in one
    /// recursive pass. Root names contribute no segments; their values are
    /// the first generation of children.
    pub fn compile(&mut self) {
        self.nodes.clear();
        self.index.clear();

        let Some(schema) = self.schema.take() else {
            return;
        };
        for root in &schema.roots {
            self.compile_entries(&root.entries, None);
        }
        self.schema = Some(schema);
    }

    fn compile_entries(&mut self, entries: &[SchemaEntry], parent: Option<NodeId>) {
        for entry in entries {
            let default_pattern = || format!("{{{}}}", entry.name);

            let (pattern, preserve, children) = match &entry.data {
                SchemaData::Leaf => (default_pattern(), false, None),
                SchemaData::Children(children) => (default_pattern(), false, Some(children)),
                SchemaData::Annotated(node) => {
                    // Preserving wins over any naming override: the key name
                    // itself is the segment, verbatim.
                    let pattern = if node.preserve {
                        entry.name.clone()
                    } else {
                        node.naming.clone().unwrap_or_else(default_pattern)
                    };
                    (pattern, node.preserve, node.children.as_ref())
                }
            };

            let id = self.nodes.len();
            self.nodes.push(TemplateNode::new(&pattern, preserve, parent));

            // Preserved nodes are structural only; they are never
            // addressable by key. A key appearing twice in the schema
            // overwrites the earlier entry.
            if !preserve {
                self.index.insert(entry.name.clone(), id);
            }

            if let Some(children) = children {
                self.compile_entries(children, Some(id));
            }
        }
    }

    /// Build the path for a logical key with the given tokens
    pub fn build_path(&self, key: &str, tokens: &TokenMap) -> Result<String, TemplateError> {
        let node = self.get(key).ok_or_else(|| TemplateError::KeyNotFound {
            key: key.to_string(),
        })?;
        let resolved = node.resolve(self, tokens)?;
        Ok(join_path(&self.root_path, &resolved))
    }

    /// Get a node by logical key
    pub fn get(&self, key: &str) -> Option<&TemplateNode> {
        self.index.get(key).map(|id| &self.nodes[*id])
    }

    /// Check if a key is addressable
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// All addressable keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(|key| key.as_str())
    }

    /// Total node count, preserved nodes included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node_at(&self, id: NodeId) -> &TemplateNode {
        &self.nodes[id]
    }
}
