use std::{
    io::{BufRead, BufReader},
    mem,
    string::FromUtf8Error,
    time::Duration,
};
use log::debug;
use serialport::SerialPort;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerialError {
    #[error("{0}")]
    Open(#[from] serialport::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("invalid UTF-8 in serial line: {0}")]
    Decode(#[from] FromUtf8Error),
    #[error("serial connection is closed")]
    Closed,
}

/// A line-oriented source of sensor data.
pub trait LineSource {
    /// Blocks until one line is read. The returned text has surrounding
    /// whitespace stripped and may be empty.
    fn read_line(&mut self) -> Result<String, SerialError>;
    fn is_open(&self) -> bool;
    fn close(&mut self);
}

pub struct SerialConnection {
    port_name: String,
    reader: Option<LineReader<BufReader<Box<dyn SerialPort>>>>,
}

impl SerialConnection {
    pub fn open(port_name: &str, baud_rate: u32, read_timeout: Duration) -> Result<Self, SerialError> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(read_timeout)
            .open()?;
        Ok(Self {
            port_name: port_name.to_string(),
            reader: Some(LineReader::new(BufReader::new(port))),
        })
    }
}

impl LineSource for SerialConnection {
    fn read_line(&mut self) -> Result<String, SerialError> {
        match self.reader.as_mut() {
            Some(reader) => reader.read_line(),
            None => Err(SerialError::Closed),
        }
    }

    fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    fn close(&mut self) {
        // dropping the port releases the device
        if self.reader.take().is_some() {
            debug!("released serial port '{}'", self.port_name);
        }
    }
}

/// Splits a byte stream into lines. Bytes read before an error are kept
/// and prefixed to the next line.
pub struct LineReader<R> {
    inner: R,
    pending: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: Vec::new(),
        }
    }

    pub fn read_line(&mut self) -> Result<String, SerialError> {
        self.inner.read_until(b'\n', &mut self.pending)?;
        let line = String::from_utf8(mem::take(&mut self.pending))?;
        Ok(line.trim().to_string())
    }
}
