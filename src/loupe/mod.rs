pub mod projector;

pub use projector::{LoupeConfig, LoupeProjector, LoupeView};
