pub mod app_config;
pub mod logging;
pub mod output_pipeline;
pub mod qrs;

pub use app_config::*;
pub use logging::*;
pub use output_pipeline::*;
pub use qrs::*;
