use crate::rendering::domain::render_result::RenderResult;

/// Delivers render results to a client.
///
/// An error means the client is gone; the session stops sending.
pub trait ResultSink: Send {
    fn send(&mut self, result: &RenderResult) -> Result<(), Box<dyn std::error::Error>>;
}
