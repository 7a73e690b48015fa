use crate::enums::HttpMethod;
use crate::path::PathError;
use crate::pattern::PatternError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RadixError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error("missing HTTP method for route registration")]
    MissingMethod,
    #[error("unknown parameter kind '{kind}' in segment '{segment}' of path '{path}'")]
    UnknownKind {
        path: String,
        segment: String,
        kind: String,
    },
    #[error("wildcard segment must be the last segment of path '{path}'")]
    WildcardNotTerminal { path: String },
    #[error("duplicate route for method {method} and path '{path}'")]
    DuplicateRoute { method: HttpMethod, path: String },
    #[error("no route registered for method {method} and path '{path}'")]
    RouteNotFound { method: HttpMethod, path: String },
}

pub type RadixResult<T> = Result<T, RadixError>;
