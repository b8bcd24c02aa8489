pub mod json_lines_sink;
pub mod text_grid_sink;
