pub use crate::error::{AclResult, Error};
pub use crate::types::{Ident, Key, Keys, OneOrMany, Value, Values};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
