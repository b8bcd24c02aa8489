pub mod mask;
pub mod region_selector;
pub mod skin_mask_builder;
