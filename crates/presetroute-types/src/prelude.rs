pub use crate::error::{Error, PrResult};

pub use tracing::{debug, debug_span, error, info, warn};

// vim: ts=4
