use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("parameter segment '{segment}' is missing a name")]
    ParameterMissingName { segment: String },
    #[error("parameter name '{name}' in segment '{segment}' is empty")]
    ParameterNameEmpty { segment: String, name: String },
    #[error(
        "parameter name '{name}' in segment '{segment}' must start with an alphabetic character or underscore (found '{found}')"
    )]
    ParameterInvalidStart {
        segment: String,
        name: String,
        found: char,
    },
    #[error(
        "parameter name '{name}' in segment '{segment}' contains invalid character '{invalid}'"
    )]
    ParameterInvalidCharacter {
        segment: String,
        name: String,
        invalid: char,
    },
    #[error("unterminated kind annotation in segment '{segment}'")]
    UnterminatedKind { segment: String },
    #[error("segment '{segment}' mixes literal and parameter syntax outside of a single ':name<kind>' token")]
    MixedParameterLiteralSyntax { segment: String },
    #[error("wildcard segment '*' must be the final segment of the path")]
    WildcardNotTerminal,
    #[error("segment '{segment}' is empty after normalization")]
    EmptySegment { segment: String },
}

pub type PatternResult<T> = Result<T, PatternError>;
