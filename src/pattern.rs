//! Naming patterns: `{token}` placeholders inside path segment templates
//!
//! A pattern is compiled once into a list of literal runs and placeholders.
//! Placeholders are `{name}` or `{name:spec}`, where `spec` is a width
//! padding specifier (`03` zero-pads to width 3). Brace text that does not
//! form a placeholder stays literal.

use logos::Logos;

use crate::error::TemplateError;
use crate::tokens::TokenMap;

/// Byte range in pattern text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
enum RawToken {
    // Placeholder names are alphabetic plus underscore; anything else keeps
    // the braces literal.
    #[regex(r"\{[A-Za-z_]+(:[^{}]*)?\}")]
    Placeholder,

    #[regex(r"[^{}]+")]
    Text,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,
}

/// Width padding for a placeholder, e.g. `:03` or `:4`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadSpec {
    pub fill: char,
    pub width: usize,
}

impl PadSpec {
    /// Parse the text after the `:`. Returns None for anything outside the
    /// supported subset, in which case the value substitutes plainly.
    fn parse(spec: &str) -> Option<PadSpec> {
        let (fill, digits) = if spec.len() > 1 && spec.starts_with('0') {
            ('0', &spec[1..])
        } else {
            (' ', spec)
        };
        let width = digits.parse::<usize>().ok()?;
        Some(PadSpec { fill, width })
    }

    fn apply(&self, value: &str) -> String {
        let len = value.chars().count();
        if len >= self.width {
            return value.to_string();
        }
        let mut out = String::with_capacity(self.width);
        for _ in 0..self.width - len {
            out.push(self.fill);
        }
        out.push_str(value);
        out
    }
}

/// One piece of a compiled pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Verbatim text
    Literal(String),
    /// A `{name}` or `{name:spec}` marker, with its span in the raw pattern
    Placeholder {
        name: String,
        pad: Option<PadSpec>,
        span: Span,
    },
}

/// A naming pattern compiled into segments
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Compile a pattern string. Never fails: unmatched braces and malformed
    /// placeholders are kept as literal text.
    pub fn compile(raw: &str) -> Pattern {
        let mut segments = Vec::new();
        let mut literal = String::new();

        for (token, span) in RawToken::lexer(raw).spanned() {
            match token {
                Ok(RawToken::Placeholder) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    let inner = &raw[span.start + 1..span.end - 1];
                    let (name, pad) = match inner.split_once(':') {
                        Some((name, spec)) => (name, PadSpec::parse(spec)),
                        None => (inner, None),
                    };
                    segments.push(Segment::Placeholder {
                        name: name.to_string(),
                        pad,
                        span,
                    });
                }
                _ => literal.push_str(&raw[span.clone()]),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Pattern {
            raw: raw.to_string(),
            segments,
        }
    }

    /// The pattern text as written in the schema
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in encounter order, one entry per occurrence
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute every placeholder from `tokens`.
    ///
    /// All missing placeholder names are collected before failing, so the
    /// error names every gap at once; nothing partially substituted is ever
    /// returned. Extra token keys are ignored and duplicate placeholders
    /// substitute consistently.
    pub fn substitute(&self, tokens: &TokenMap) -> Result<String, TemplateError> {
        let mut out = String::new();
        let mut missing: Vec<String> = Vec::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { name, pad, .. } => match tokens.get(name) {
                    Some(value) => {
                        let rendered = value.to_string();
                        match pad {
                            Some(pad) => out.push_str(&pad.apply(&rendered)),
                            None => out.push_str(&rendered),
                        }
                    }
                    None => {
                        if !missing.iter().any(|seen| seen == name) {
                            missing.push(name.clone());
                        }
                    }
                },
            }
        }

        if missing.is_empty() {
            Ok(out)
        } else {
            Err(TemplateError::MissingTokens {
                pattern: self.raw.clone(),
                missing,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(pairs: &[(&str, &str)]) -> TokenMap {
        let mut map = TokenMap::new();
        for (name, value) in pairs {
            map.insert(*name, *value);
        }
        map
    }

    #[test]
    fn test_compile_splits_literals_and_placeholders() {
        let pattern = Pattern::compile("{sequence}_{shot}");
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Placeholder {
                    name: "sequence".to_string(),
                    pad: None,
                    span: 0..10,
                },
                Segment::Literal("_".to_string()),
                Segment::Placeholder {
                    name: "shot".to_string(),
                    pad: None,
                    span: 11..17,
                },
            ]
        );
    }

    #[test]
    fn test_placeholder_names_in_encounter_order() {
        let pattern = Pattern::compile("v{version:03}.{frame}.{ext}");
        let names: Vec<&str> = pattern.placeholder_names().collect();
        assert_eq!(names, vec!["version", "frame", "ext"]);
    }

    #[test]
    fn test_literal_only_pattern_has_no_placeholders() {
        let pattern = Pattern::compile("sequences");
        assert_eq!(pattern.placeholder_names().count(), 0);
        let out = pattern.substitute(&TokenMap::new()).expect("Should substitute");
        assert_eq!(out, "sequences");
    }

    #[test]
    fn test_substitute_simple() {
        let pattern = Pattern::compile("{sequence}/{shot}");
        let out = pattern
            .substitute(&tokens(&[("sequence", "sq010"), ("shot", "sq010_0010")]))
            .expect("Should substitute");
        assert_eq!(out, "sq010/sq010_0010");
    }

    #[test]
    fn test_substitute_zero_pads_integers() {
        let mut map = TokenMap::new();
        map.insert("version", 1);
        let pattern = Pattern::compile("v{version:03}");
        assert_eq!(pattern.substitute(&map).expect("Should substitute"), "v001");
    }

    #[test]
    fn test_substitute_space_pads_without_leading_zero() {
        let mut map = TokenMap::new();
        map.insert("version", 7);
        let pattern = Pattern::compile("{version:3}");
        assert_eq!(pattern.substitute(&map).expect("Should substitute"), "  7");
    }

    #[test]
    fn test_pad_shorter_than_value_is_a_no_op() {
        let mut map = TokenMap::new();
        map.insert("frame", 1001);
        let pattern = Pattern::compile("{frame:02}");
        assert_eq!(pattern.substitute(&map).expect("Should substitute"), "1001");
    }

    #[test]
    fn test_unsupported_spec_substitutes_plainly() {
        let pattern = Pattern::compile("{name:frob}");
        let out = pattern
            .substitute(&tokens(&[("name", "plate")]))
            .expect("Should substitute");
        assert_eq!(out, "plate");
    }

    #[test]
    fn test_extra_tokens_are_ignored() {
        let pattern = Pattern::compile("{shot}");
        let out = pattern
            .substitute(&tokens(&[("shot", "0010"), ("unused", "x")]))
            .expect("Should substitute");
        assert_eq!(out, "0010");
    }

    #[test]
    fn test_duplicate_placeholders_substitute_consistently() {
        let pattern = Pattern::compile("{shot}/{shot}");
        let out = pattern
            .substitute(&tokens(&[("shot", "0010")]))
            .expect("Should substitute");
        assert_eq!(out, "0010/0010");
    }

    #[test]
    fn test_missing_tokens_collects_all_names() {
        let pattern = Pattern::compile("{sequence}_{shot}_{step}");
        let err = pattern
            .substitute(&tokens(&[("shot", "0010")]))
            .unwrap_err();
        match err {
            TemplateError::MissingTokens { pattern, missing } => {
                assert_eq!(pattern, "{sequence}_{shot}_{step}");
                assert_eq!(missing, vec!["sequence".to_string(), "step".to_string()]);
            }
            other => panic!("Expected MissingTokens, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_tokens_deduplicates_repeats() {
        let pattern = Pattern::compile("{shot}_{shot}");
        let err = pattern.substitute(&TokenMap::new()).unwrap_err();
        match err {
            TemplateError::MissingTokens { missing, .. } => {
                assert_eq!(missing, vec!["shot".to_string()]);
            }
            other => panic!("Expected MissingTokens, got {:?}", other),
        }
    }

    #[test]
    fn test_non_placeholder_braces_stay_literal() {
        let pattern = Pattern::compile("{123}/{}/a{b");
        let out = pattern.substitute(&TokenMap::new()).expect("Should substitute");
        assert_eq!(out, "{123}/{}/a{b");
    }

    #[test]
    fn test_underscored_names_are_placeholders() {
        let pattern = Pattern::compile("{element_type}");
        let names: Vec<&str> = pattern.placeholder_names().collect();
        assert_eq!(names, vec!["element_type"]);
    }
}
