use crate::enums::HttpMethod;
use crate::radix::RadixError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Radix(#[from] RadixError),
    #[error("no route registered for method {method} and path '{path}'")]
    Miss { method: HttpMethod, path: String },
}

pub type RouterResult<T> = Result<T, RouterError>;
