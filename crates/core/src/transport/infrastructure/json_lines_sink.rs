use std::io::Write;

use crate::rendering::domain::render_result::RenderResult;
use crate::transport::domain::result_sink::ResultSink;

/// Streams one JSON object per line and flushes after each frame.
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ResultSink for JsonLinesSink<W> {
    fn send(&mut self, result: &RenderResult) -> Result<(), Box<dyn std::error::Error>> {
        serde_json::to_writer(&mut self.writer, result)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
