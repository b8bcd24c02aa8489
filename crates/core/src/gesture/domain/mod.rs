pub mod distance_estimator;
pub mod gesture;
pub mod gesture_classifier;
pub mod shape_descriptor;
pub mod temporal_smoother;
