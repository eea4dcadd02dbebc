pub mod error;
pub mod logging;

pub use error::DemoError;
pub use logging::init_logging;
