//! A single segment of the path hierarchy

use crate::error::TemplateError;
use crate::pattern::Pattern;
use crate::template::{join_path, TemplateTree};
use crate::tokens::TokenMap;

/// Index of a node in the owning tree's arena. Parents are always created
/// before their children, so parent links point strictly backwards and the
/// ancestor chain cannot cycle.
pub type NodeId = usize;

/// One item in the template hierarchy, representing a directory or file
/// name on disk.
///
/// A node holds its compiled naming pattern, the preserve flag, and an
/// optional back-link to its parent. Nodes are created during tree
/// compilation and immutable afterwards; the tree owns them all.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateNode {
    pattern: Pattern,
    preserve: bool,
    parent: Option<NodeId>,
}

impl TemplateNode {
    pub(crate) fn new(pattern: &str, preserve: bool, parent: Option<NodeId>) -> TemplateNode {
        TemplateNode {
            pattern: Pattern::compile(pattern),
            preserve,
            parent,
        }
    }

    /// The naming pattern as written in the schema
    pub fn pattern(&self) -> &str {
        self.pattern.raw()
    }

    /// Whether the pattern is used verbatim, skipping substitution
    pub fn preserve(&self) -> bool {
        self.preserve
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Placeholder names the pattern requests, in encounter order. Scanned
    /// for every node; only consulted when `preserve` is false.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.pattern.placeholder_names()
    }

    /// Resolve this node and its ancestor chain into a path string.
    ///
    /// `tree` must be the tree that owns this node.
    pub fn resolve(
        &self,
        tree: &TemplateTree,
        tokens: &TokenMap,
    ) -> Result<String, TemplateError> {
        self.resolve_with_suffix(tree, tokens, None)
    }

    /// Resolve with an already-built child path appended below this node.
    ///
    /// The node's own segment is rendered first (verbatim for preserved
    /// nodes, substituted otherwise), joined ahead of `child_suffix`, and
    /// the combined path is handed to the parent until the root is reached.
    pub fn resolve_with_suffix(
        &self,
        tree: &TemplateTree,
        tokens: &TokenMap,
        child_suffix: Option<&str>,
    ) -> Result<String, TemplateError> {
        let segment = if self.preserve {
            self.pattern.raw().to_string()
        } else {
            self.pattern.substitute(tokens)?
        };

        let path = match child_suffix {
            Some(suffix) => join_path(&segment, suffix),
            None => segment,
        };

        match self.parent {
            Some(parent) => tree
                .node_at(parent)
                .resolve_with_suffix(tree, tokens, Some(&path)),
            None => Ok(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCHEMA: &str = r#"
film:
  - sequences:
      preserve: true
      children:
        - sequence:
            children:
              - shot: ~
"#;

    fn tokens() -> TokenMap {
        let mut map = TokenMap::new();
        map.insert("sequence", "sq010");
        map.insert("shot", "sq010_0010");
        map
    }

    #[test]
    fn test_resolve_walks_the_ancestor_chain() {
        let tree = TemplateTree::from_schema_str(SCHEMA).expect("Should compile");
        let node = tree.get("shot").expect("Should be registered");
        assert_eq!(
            node.resolve(&tree, &tokens()).expect("Should resolve"),
            "sequences/sq010/sq010_0010"
        );
    }

    #[test]
    fn test_child_resolution_equals_parent_delegation() {
        let tree = TemplateTree::from_schema_str(SCHEMA).expect("Should compile");
        let shot = tree.get("shot").expect("Should be registered");
        let sequence = tree.get("sequence").expect("Should be registered");

        let direct = shot.resolve(&tree, &tokens()).expect("Should resolve");
        let delegated = sequence
            .resolve_with_suffix(&tree, &tokens(), Some("sq010_0010"))
            .expect("Should resolve");
        assert_eq!(direct, delegated);
    }

    #[test]
    fn test_missing_token_fails_without_partial_output() {
        let tree = TemplateTree::from_schema_str(SCHEMA).expect("Should compile");
        let node = tree.get("shot").expect("Should be registered");

        let mut partial = TokenMap::new();
        partial.insert("sequence", "sq010");
        let err = node.resolve(&tree, &partial).unwrap_err();
        match err {
            TemplateError::MissingTokens { pattern, missing } => {
                assert_eq!(pattern, "{shot}");
                assert_eq!(missing, vec!["shot".to_string()]);
            }
            other => panic!("Expected MissingTokens, got {:?}", other),
        }
    }

    #[test]
    fn test_placeholders_scanned_for_preserved_patterns() {
        // A preserved key that looks like a placeholder still resolves
        // verbatim, but the scan itself sees the name.
        let tree = TemplateTree::from_schema_str(
            r#"
root:
  - '{literal}':
      preserve: true
      children:
        - leaf:
            naming: 'file'
"#,
        )
        .expect("Should compile");

        let leaf = tree.get("leaf").expect("Should be registered");
        assert_eq!(
            leaf.resolve(&tree, &TokenMap::new()).expect("Should resolve"),
            "{literal}/file"
        );
    }
}
