pub mod csv_sink;
pub mod qrs_client;
pub mod tls;

pub use csv_sink::*;
pub use qrs_client::*;
pub use tls::*;
