use std::io::Write;

use crate::rendering::domain::render_result::RenderResult;
use crate::transport::domain::result_sink::ResultSink;

/// Human-readable output: a header line, the grid, then a blank line.
pub struct TextGridSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> TextGridSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ResultSink for TextGridSink<W> {
    fn send(&mut self, result: &RenderResult) -> Result<(), Box<dyn std::error::Error>> {
        writeln!(
            self.writer,
            "theme={} resolution={} grid={}x{}",
            result.theme,
            result.resolution,
            result.columns(),
            result.rows()
        )?;
        for line in &result.character_grid {
            writeln!(self.writer, "{line}")?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
