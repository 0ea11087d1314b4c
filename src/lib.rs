//! Waymark - declarative path construction for production pipelines
//!
//! Waymark builds filesystem paths from a centrally-defined naming schema
//! instead of hard-coded strings. A YAML schema describes the hierarchy of
//! path segments and their naming patterns; callers ask for a path by
//! logical key plus a set of token values, and the tree resolves the whole
//! ancestor chain in one call.
//!
//! # Example
//!
//! ```rust
//! use waymark::{TemplateTree, TokenMap};
//!
//! let tree = TemplateTree::from_schema_str(r#"
//! film:
//!   - sequences:
//!       preserve: true
//!       children:
//!         - sequence:
//!             children:
//!               - shot: ~
//! "#).unwrap();
//!
//! let mut tokens = TokenMap::new();
//! tokens.insert("sequence", "sq010");
//! tokens.insert("shot", "sq010_0010");
//!
//! assert_eq!(
//!     tree.build_path("shot", &tokens).unwrap(),
//!     "sequences/sq010/sq010_0010"
//! );
//! ```

pub mod error;
pub mod pattern;
pub mod profile;
pub mod schema;
pub mod template;
pub mod tokens;

pub use error::TemplateError;
pub use profile::{Profile, ProfileError};
pub use schema::{Schema, SchemaError};
pub use template::{NodeId, TemplateNode, TemplateTree};
pub use tokens::{TokenMap, TokenValue};

/// Build a single path from an inline schema document.
///
/// Convenience entry point for one-off resolution; repeated queries should
/// construct a [`TemplateTree`] once and reuse it.
///
/// # Example
///
/// ```rust
/// use waymark::TokenMap;
///
/// let mut tokens = TokenMap::new();
/// tokens.insert("asset", "vehicle_red");
///
/// let path = waymark::build_path("assets:\n  - asset: ~\n", "asset", &tokens).unwrap();
/// assert_eq!(path, "vehicle_red");
/// ```
pub fn build_path(schema: &str, key: &str, tokens: &TokenMap) -> Result<String, TemplateError> {
    TemplateTree::from_schema_str(schema)?.build_path(key, tokens)
}
