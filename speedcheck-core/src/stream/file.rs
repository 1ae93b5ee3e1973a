//! Recorded sample logs
//!
//! Reads accelerometer captures back from disk so a session can be replayed
//! through the estimator.
//!
//! ## Supported Formats
//!
//! 1. **CSV**: `timestamp_ms,x,y,z`, one sample per line. A leading header
//!    row is detected and skipped.
//! 2. **JSON Lines**: one `{"t":..,"x":..,"y":..,"z":..}` object per line,
//!    `t` in milliseconds.
//!
//! Blank lines and lines starting with `#` are ignored in both formats, as
//! is a leading UTF-8 byte-order mark. Lines must be valid UTF-8.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::{Stream, StreamError};
use crate::{
    constants::US_PER_MS,
    sample::Sample,
    time::Timestamp,
    vector::Vector3,
};

const READ_BUFFER_SIZE: usize = 4096;
const LINE_CAPACITY: usize = 256;

/// Log formats understood by [`FileStream`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values
    Csv,
    /// Line-delimited JSON
    JsonLines,
}

impl FileFormat {
    /// Guess the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        match path.as_ref().extension()?.to_str()? {
            "csv" | "txt" => Some(Self::Csv),
            "jsonl" | "ndjson" | "json" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Units the logged axes are recorded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingUnits {
    /// Metres per second squared
    #[default]
    MetersPerSecondSquared,
    /// Multiples of standard gravity
    G,
}

/// Statistics for file streaming
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileStreamStats {
    /// Samples decoded successfully
    pub samples_read: usize,
    /// Total lines consumed, including skipped ones
    pub lines_processed: usize,
    /// Records that failed to parse
    pub parse_errors: usize,
    /// Bytes read from the file
    pub bytes_read: usize,
}

#[derive(Deserialize)]
struct JsonRecord {
    t: f64,
    x: f32,
    y: f32,
    z: f32,
}

/// Sample stream over a CSV or JSON Lines capture
///
/// ## Example
///
/// ```rust,no_run
/// use speedcheck_core::stream::{FileStream, ReadingUnits, Stream};
///
/// let mut stream = FileStream::from_csv("walk.csv")
///     .unwrap()
///     .with_units(ReadingUnits::G);
///
/// while let Ok(sample) = stream.poll_next() {
///     println!("{} {:?}", sample.timestamp, sample.acceleration);
/// }
/// ```
pub struct FileStream {
    file: File,
    format: FileFormat,
    units: ReadingUnits,
    buffer: [u8; READ_BUFFER_SIZE],
    buffer_pos: usize,
    buffer_len: usize,
    line_buffer: heapless::Vec<u8, LINE_CAPACITY>,
    eof: bool,
    skip_lines: usize,
    lines_skipped: usize,
    header_checked: bool,
    stats: FileStreamStats,
}

impl FileStream {
    /// Open a log in the given format
    pub fn new<P: AsRef<Path>>(path: P, format: FileFormat) -> Result<Self, StreamError<std::io::Error>> {
        let file = File::open(path).map_err(StreamError::Transport)?;

        Ok(Self {
            file,
            format,
            units: ReadingUnits::default(),
            buffer: [0; READ_BUFFER_SIZE],
            buffer_pos: 0,
            buffer_len: 0,
            line_buffer: heapless::Vec::new(),
            eof: false,
            skip_lines: 0,
            lines_skipped: 0,
            header_checked: false,
            stats: FileStreamStats::default(),
        })
    }

    /// Open a CSV log
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, StreamError<std::io::Error>> {
        Self::new(path, FileFormat::Csv)
    }

    /// Open a JSON Lines log
    pub fn from_json_lines<P: AsRef<Path>>(path: P) -> Result<Self, StreamError<std::io::Error>> {
        Self::new(path, FileFormat::JsonLines)
    }

    /// Skip the first N lines unconditionally
    pub fn with_skip_lines(mut self, lines: usize) -> Self {
        self.skip_lines = lines;
        self
    }

    /// Set the units of the logged axes
    pub fn with_units(mut self, units: ReadingUnits) -> Self {
        self.units = units;
        self
    }

    /// Log format
    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Get statistics
    pub fn stats(&self) -> &FileStreamStats {
        &self.stats
    }

    /// Reset statistics
    pub fn reset_stats(&mut self) {
        self.stats = FileStreamStats::default();
    }

    fn refill_buffer(&mut self) -> Result<bool, StreamError<std::io::Error>> {
        if self.eof {
            return Ok(false);
        }

        if self.buffer_pos < self.buffer_len {
            let remaining = self.buffer_len - self.buffer_pos;
            self.buffer.copy_within(self.buffer_pos..self.buffer_len, 0);
            self.buffer_len = remaining;
        } else {
            self.buffer_len = 0;
        }
        self.buffer_pos = 0;

        let bytes_read = self
            .file
            .read(&mut self.buffer[self.buffer_len..])
            .map_err(StreamError::Transport)?;

        if bytes_read == 0 {
            self.eof = true;
            return Ok(self.buffer_len > 0);
        }

        self.buffer_len += bytes_read;
        self.stats.bytes_read += bytes_read;
        Ok(true)
    }

    /// Fill `line_buffer` with the next line; false at end of file
    fn read_line(&mut self) -> Result<bool, StreamError<std::io::Error>> {
        self.line_buffer.clear();
        let mut overflowed = false;

        loop {
            while self.buffer_pos < self.buffer_len {
                let byte = self.buffer[self.buffer_pos];
                self.buffer_pos += 1;

                if byte == b'\n' {
                    self.stats.lines_processed += 1;
                    if overflowed {
                        return Err(StreamError::Overflow);
                    }
                    return Ok(true);
                } else if byte != b'\r' && !overflowed && self.line_buffer.push(byte).is_err() {
                    // Consume the rest of the line so the next read starts clean
                    overflowed = true;
                }
            }

            if !self.refill_buffer()? {
                if overflowed {
                    self.stats.lines_processed += 1;
                    return Err(StreamError::Overflow);
                }
                if !self.line_buffer.is_empty() {
                    self.stats.lines_processed += 1;
                    return Ok(true);
                }
                return Ok(false);
            }
        }
    }

}

impl Stream for FileStream {
    type Item = Sample;
    type Error = StreamError<std::io::Error>;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        loop {
            if !self.read_line()? {
                return Err(nb::Error::Other(StreamError::EndOfStream));
            }

            if self.lines_skipped < self.skip_lines {
                self.lines_skipped += 1;
                continue;
            }

            let parsed = match decode_line(&self.line_buffer) {
                Ok(line) => {
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }

                    let first_record = !self.header_checked;
                    self.header_checked = true;
                    if first_record && self.format == FileFormat::Csv && is_csv_header(line) {
                        continue;
                    }

                    match self.format {
                        FileFormat::Csv => parse_csv_record(line, self.units),
                        FileFormat::JsonLines => parse_json_record(line, self.units),
                    }
                }
                Err(reason) => Err(reason),
            };

            return match parsed {
                Ok(sample) => {
                    self.stats.samples_read += 1;
                    Ok(sample)
                }
                Err(reason) => {
                    self.stats.parse_errors += 1;
                    Err(nb::Error::Other(StreamError::Format(reason)))
                }
            };
        }
    }
}

fn decode_line(bytes: &[u8]) -> Result<&str, &'static str> {
    let line = core::str::from_utf8(bytes).map_err(|_| "Invalid UTF-8")?;
    Ok(line.strip_prefix('\u{feff}').unwrap_or(line).trim())
}

/// A header row has no numeric field at all
fn is_csv_header(line: &str) -> bool {
    line.split(',').all(|field| field.trim().parse::<f64>().is_err())
}

fn millis_to_timestamp(ms: f64) -> Result<Timestamp, &'static str> {
    if !ms.is_finite() || ms < 0.0 {
        return Err("Invalid timestamp");
    }
    Ok((ms * US_PER_MS as f64).round() as Timestamp)
}

fn to_sample(reading: Vector3, timestamp: Timestamp, units: ReadingUnits) -> Sample {
    match units {
        ReadingUnits::MetersPerSecondSquared => Sample::new(reading, timestamp),
        ReadingUnits::G => Sample::from_g(reading, timestamp),
    }
}

fn parse_csv_record(line: &str, units: ReadingUnits) -> Result<Sample, &'static str> {
    let fields: heapless::Vec<&str, 8> = line.split(',').map(str::trim).take(8).collect();

    if fields.len() < 4 {
        return Err("Not enough CSV fields");
    }

    let ms = fields[0].parse::<f64>().map_err(|_| "Invalid timestamp")?;
    let timestamp = millis_to_timestamp(ms)?;

    let mut axes = [0.0f32; 3];
    for (axis, field) in axes.iter_mut().zip(&fields[1..4]) {
        *axis = field.parse::<f32>().map_err(|_| "Invalid axis value")?;
    }

    Ok(to_sample(Vector3::from(axes), timestamp, units))
}

fn parse_json_record(line: &str, units: ReadingUnits) -> Result<Sample, &'static str> {
    let record: JsonRecord = serde_json::from_str(line).map_err(|_| "Invalid JSON record")?;
    let timestamp = millis_to_timestamp(record.t)?;

    Ok(to_sample(Vector3::new(record.x, record.y, record.z), timestamp, units))
}
