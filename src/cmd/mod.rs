pub mod serial;
pub mod temperature;

pub use serial::{LineSource, SerialConnection, SerialError};
pub use temperature::RawReading;
