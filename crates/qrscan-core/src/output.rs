//! JSON and JSONL output for command-line scans.

use serde::Serialize;
use std::io::{self, Write};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// A single JSON array holding every outcome
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Serializes scan outcomes to a writer.
///
/// JSONL items are written immediately by [`OutputWriter::push`]. JSON items
/// are buffered and emitted as one array by [`OutputWriter::finish`], so an
/// interrupted run never leaves half an array on disk.
pub struct OutputWriter<W: Write, T: Serialize> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    pending: Vec<T>,
    items_written: usize,
}

impl<W: Write, T: Serialize> OutputWriter<W, T> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects the JSON format.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            pending: Vec::new(),
            items_written: 0,
        }
    }

    /// Add one item.
    pub fn push(&mut self, item: T) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.pending.push(item),
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, &item).map_err(io::Error::other)?;
                writeln!(self.writer)?;
                self.items_written += 1;
            }
        }
        Ok(())
    }

    /// Write any buffered items and flush. Returns the number of items written.
    pub fn finish(mut self) -> io::Result<usize> {
        if self.format == OutputFormat::Json {
            if self.pretty {
                serde_json::to_writer_pretty(&mut self.writer, &self.pending)
                    .map_err(io::Error::other)?;
            } else {
                serde_json::to_writer(&mut self.writer, &self.pending).map_err(io::Error::other)?;
            }
            writeln!(self.writer)?;
            self.items_written += self.pending.len();
        }
        self.writer.flush()?;
        Ok(self.items_written)
    }
}
