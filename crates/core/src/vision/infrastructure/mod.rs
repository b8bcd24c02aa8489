mod clahe;
mod convexity;
pub mod imageproc_primitives;
mod polygon_math;
