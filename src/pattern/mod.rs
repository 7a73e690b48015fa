mod error;
mod kind;
mod segment;

pub use error::{PatternError, PatternResult};
pub use kind::{ExtractFn, KindRegistry, ParamKind, ParamValue};
pub use segment::{PARAM_TOKEN, WILDCARD_TOKEN, Segment, parse_segment};
