pub mod editor;
pub mod export;
pub mod geometry;
pub mod metrics;
pub mod packer;
pub mod presets;
pub mod render;
pub mod surface;
pub mod types;
