//! A single path segment as registered: a literal, a named parameter
//! (optionally constrained to a [`crate::pattern::ParamKind`]), or the
//! trailing wildcard.

use super::error::PatternError;

pub const WILDCARD_TOKEN: &str = "*";
pub const PARAM_TOKEN: &str = ":param";

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    Param { name: String, kind: Option<String> },
    Wildcard,
}

impl Segment {
    /// The key used to look up/insert this segment's child in a radix node's
    /// child map, per the storage-key encoding invariant in the data model:
    /// literal verbatim, any parameter collapses to `:param`, wildcard to `*`.
    pub fn storage_key(&self) -> &str {
        match self {
            Segment::Literal(s) => s.as_str(),
            Segment::Param { .. } => PARAM_TOKEN,
            Segment::Wildcard => WILDCARD_TOKEN,
        }
    }

    /// Matching priority: literal (highest) > parameter-with-kind >
    /// bare parameter > wildcard (lowest), per the deterministic
    /// tie-breaking rule.
    pub fn priority_rank(&self) -> u8 {
        match self {
            Segment::Literal(_) => 3,
            Segment::Param { kind: Some(_), .. } => 2,
            Segment::Param { kind: None, .. } => 1,
            Segment::Wildcard => 0,
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Segment::Literal(_))
    }
}

/// Parses one path segment (the text between two `/`) into a [`Segment`].
///
/// Grammar: a literal segment is any text with no leading `:`; a parameter is
/// `:name` or `:name<kind>`; a bare `*` is the wildcard. Mixing a `:` or `*`
/// with literal text in the same segment is rejected.
pub fn parse_segment(raw: &str) -> Result<Segment, PatternError> {
    if raw.is_empty() {
        return Err(PatternError::EmptySegment {
            segment: raw.to_string(),
        });
    }

    if raw == WILDCARD_TOKEN {
        return Ok(Segment::Wildcard);
    }

    if let Some(rest) = raw.strip_prefix(':') {
        return parse_param(raw, rest);
    }

    if raw.contains(':') || raw.contains('*') {
        return Err(PatternError::MixedParameterLiteralSyntax {
            segment: raw.to_string(),
        });
    }

    Ok(Segment::Literal(raw.to_string()))
}

fn parse_param(segment: &str, rest: &str) -> Result<Segment, PatternError> {
    if rest.is_empty() {
        return Err(PatternError::ParameterMissingName {
            segment: segment.to_string(),
        });
    }

    let (name_part, kind) = match rest.find('<') {
        Some(open) => {
            if !rest.ends_with('>') {
                return Err(PatternError::UnterminatedKind {
                    segment: segment.to_string(),
                });
            }
            let name = &rest[..open];
            let kind = &rest[open + 1..rest.len() - 1];
            (name, Some(kind.to_string()))
        }
        None => (rest, None),
    };

    validate_param_name(segment, name_part)?;

    Ok(Segment::Param {
        name: name_part.to_string(),
        kind,
    })
}

fn validate_param_name(segment: &str, name: &str) -> Result<(), PatternError> {
    if name.is_empty() {
        return Err(PatternError::ParameterNameEmpty {
            segment: segment.to_string(),
            name: name.to_string(),
        });
    }
    let mut chars = name.chars();
    let first = chars.next().expect("checked non-empty above");
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(PatternError::ParameterInvalidStart {
            segment: segment.to_string(),
            name: name.to_string(),
            found: first,
        });
    }
    for c in chars {
        if !(c.is_ascii_alphanumeric() || c == '_') {
            return Err(PatternError::ParameterInvalidCharacter {
                segment: segment.to_string(),
                name: name.to_string(),
                invalid: c,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literal() {
        assert_eq!(
            parse_segment("users").unwrap(),
            Segment::Literal("users".to_string())
        );
    }

    #[test]
    fn parses_bare_param() {
        assert_eq!(
            parse_segment(":id").unwrap(),
            Segment::Param {
                name: "id".to_string(),
                kind: None
            }
        );
    }

    #[test]
    fn parses_param_with_kind() {
        assert_eq!(
            parse_segment(":id<id>").unwrap(),
            Segment::Param {
                name: "id".to_string(),
                kind: Some("id".to_string())
            }
        );
    }

    #[test]
    fn parses_wildcard() {
        assert_eq!(parse_segment("*").unwrap(), Segment::Wildcard);
    }

    #[test]
    fn rejects_mixed_literal_and_param() {
        assert!(parse_segment("user:id").is_err());
    }

    #[test]
    fn rejects_empty_param_name() {
        assert!(parse_segment(":").is_err());
    }

    #[test]
    fn priority_orders_literal_over_kinded_over_bare_over_wildcard() {
        let literal = Segment::Literal("a".into());
        let kinded = Segment::Param {
            name: "a".into(),
            kind: Some("id".into()),
        };
        let bare = Segment::Param {
            name: "a".into(),
            kind: None,
        };
        let wildcard = Segment::Wildcard;
        assert!(literal.priority_rank() > kinded.priority_rank());
        assert!(kinded.priority_rank() > bare.priority_rank());
        assert!(bare.priority_rank() > wildcard.priority_rank());
    }
}
