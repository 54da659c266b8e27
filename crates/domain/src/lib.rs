pub mod entities;
pub mod log_extractor;
pub mod ports;

pub use entities::*;
pub use log_extractor::{extract_error_message, NO_ERROR_MESSAGE};
pub use ports::*;
pub use reporter_errors::{ReporterError, ReporterResult};
