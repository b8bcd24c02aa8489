pub mod ascii_renderer;
pub mod render_result;
