pub mod capture;
pub mod gesture;
pub mod pipeline;
pub mod rendering;
pub mod segmentation;
pub mod shared;
pub mod transport;
pub mod vision;

#[cfg(test)]
mod test_support;
