//! The process I/O contract: one JSON object in, one JSON object out.
//!
//! Input is read whole and must be a JSON object. Output is always a single
//! JSON object followed by a newline, either the payload or the
//! `{"error": ...}` envelope.

use crate::error::AgentError;
use crate::outcome::Outcome;
use serde_json::Value;
use std::io::{self, Read, Write};

/// Read all of `reader` as UTF-8 and parse it as the agent's input payload.
pub fn read_payload<R: Read>(mut reader: R) -> Result<Value, AgentError> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    parse_payload(&raw)
}

/// Parse raw input text into a JSON object.
pub fn parse_payload(raw: &str) -> Result<Value, AgentError> {
    if raw.trim().is_empty() {
        return Err(AgentError::Input("No input data provided".into()));
    }

    let payload: Value = serde_json::from_str(raw)
        .map_err(|e| AgentError::Input(format!("Input is not valid JSON: {e}")))?;
    if !payload.is_object() {
        return Err(AgentError::Input("Input must be a JSON object".into()));
    }
    Ok(payload)
}

/// Writes outcomes as single JSON objects.
pub struct OutputWriter<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` switches to indented output; the default is one line.
    pub fn new(writer: W, pretty: bool) -> Self {
        Self { writer, pretty }
    }

    /// Write the outcome's JSON object and a trailing newline, then flush.
    pub fn write(&mut self, outcome: Outcome) -> io::Result<()> {
        let json = outcome.into_json();
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &json).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, &json).map_err(io::Error::other)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
