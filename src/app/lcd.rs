use log::info;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LcdError {
    #[error("pin {0} is assigned more than once")]
    DuplicatePin(u8),
}

/// ST7789 panel controller wired to three GPIO pins.
#[derive(Debug)]
pub struct St7789 {
    pins: [u8; 3],
}

impl St7789 {
    pub fn new(pins: [u8; 3]) -> Self {
        Self { pins }
    }

    /// Checks the pin wiring only; no panel commands are sent.
    pub fn init(&mut self) -> Result<(), LcdError> {
        for (idx, pin) in self.pins.iter().enumerate() {
            if self.pins[idx + 1..].contains(pin) {
                return Err(LcdError::DuplicatePin(*pin));
            }
        }
        info!("LCD initialized on pins {:?}", self.pins);
        Ok(())
    }
}
