pub use crate::access::{AuthCtx, Capability};
pub use crate::error::{Error, MkResult};
pub use crate::types::{ApiResponse, UserId};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
