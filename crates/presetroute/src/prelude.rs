pub use presetroute_types::error::{Error, PrResult};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
