pub use crate::app::App;
pub use modkit_types::access::{AuthCtx, Capability};
pub use modkit_types::error::{Error, MkResult};
pub use modkit_types::types::{ApiResponse, UserId};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
