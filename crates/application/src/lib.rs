pub mod logging;
pub mod services;
