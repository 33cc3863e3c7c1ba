use std::num::ParseFloatError;

/// Zero-based position of the temperature in a comma-separated sensor line.
pub const TEMPERATURE_FIELD: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReading<'a> {
    pub label: &'a str,
}

impl<'a> RawReading<'a> {
    /// Picks the temperature field out of a sensor line. Lines with fewer
    /// than seven fields carry no reading.
    pub fn from_line(line: &'a str) -> Option<Self> {
        line.split(',')
            .nth(TEMPERATURE_FIELD)
            .map(|label| Self { label })
    }

    /// Parses the field, allowing single underscores between digits
    /// (`1_000`).
    pub fn value(&self) -> Result<f64, ParseFloatError> {
        let field = self.label.trim();
        if field.contains('_') && underscores_between_digits(field) {
            return field.replace('_', "").parse();
        }
        field.parse()
    }
}

fn underscores_between_digits(field: &str) -> bool {
    let bytes = field.as_bytes();
    bytes.iter().enumerate().all(|(idx, byte)| {
        *byte != b'_'
            || (idx > 0
                && idx + 1 < bytes.len()
                && bytes[idx - 1].is_ascii_digit()
                && bytes[idx + 1].is_ascii_digit())
    })
}
