pub mod image_processor;
pub mod pipeline_logger;
pub mod session_runner;
