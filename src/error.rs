//! Error types for schema loading and path resolution

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::pattern::{Pattern, Segment};
use crate::schema::SchemaError;

#[derive(Error, Debug)]
pub enum TemplateError {
    /// A schema load was requested with no source configured
    #[error("no schema source has been configured")]
    NoSchemaSource,

    /// The supplied token set is not usable as a mapping of scalars
    #[error("invalid token set: {reason}")]
    InvalidTokens { reason: String },

    /// One or more placeholders have no value in the supplied tokens
    #[error("tokens {} are missing for template '{pattern}'", format_name_list(.missing))]
    MissingTokens {
        pattern: String,
        missing: Vec<String>,
    },

    /// The requested logical key is not in the compiled index
    #[error("the requested key '{key}' was not found in the template tree")]
    KeyNotFound { key: String },

    /// The schema document could not be loaded or understood
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl TemplateError {
    /// Render the error for terminal output.
    ///
    /// Missing-token errors get an annotated report over the offending
    /// pattern with one label per missing placeholder; every other variant
    /// falls back to its `Display` message.
    pub fn format(&self) -> String {
        match self {
            TemplateError::MissingTokens { pattern, missing } => {
                format_missing_tokens(pattern, missing)
            }
            other => other.to_string(),
        }
    }
}

fn format_name_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("'{}'", name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the ariadne report over the pattern text
fn format_missing_tokens(pattern: &str, missing: &[String]) -> String {
    let compiled = Pattern::compile(pattern);

    let mut offset = None;
    let mut labels = Vec::new();
    for segment in compiled.segments() {
        if let Segment::Placeholder { name, span, .. } = segment {
            if missing.iter().any(|m| m == name) {
                offset.get_or_insert(span.start);
                labels.push(
                    Label::new(("pattern", span.clone()))
                        .with_message(format!("no value for '{}'", name))
                        .with_color(Color::Red),
                );
            }
        }
    }

    // A missing name that no longer lexes out of the pattern has nothing to
    // point at; fall back to the plain message.
    if labels.is_empty() {
        return format!(
            "tokens {} are missing for template '{}'",
            format_name_list(missing),
            pattern
        );
    }

    let mut buf = Vec::new();
    Report::build(ReportKind::Error, "pattern", offset.unwrap_or(0))
        .with_message(format!("tokens {} are missing", format_name_list(missing)))
        .with_labels(labels)
        .finish()
        .write(("pattern", Source::from(pattern)), &mut buf)
        .unwrap();
    String::from_utf8(buf).unwrap()
}
