pub mod animation;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod projection;
pub mod render;
pub mod scene;
pub mod types;
