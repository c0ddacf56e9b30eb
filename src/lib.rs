pub mod combine;
pub mod error;
pub mod frontend;
pub mod logging;
pub mod pairing;
pub mod promote;
pub mod report;
pub mod scan;
pub mod session;

pub use error::{Error, Result};
