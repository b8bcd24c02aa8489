pub mod vision_primitives;
