pub use presetroute_types::error::{Error, PrResult};

pub use tracing::{debug, debug_span, error, info, warn};

// vim: ts=4
