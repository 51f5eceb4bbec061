//! # Planmark
//!
//! A touch-first annotation engine for large raster floor plans.
//!
//! The crate owns the interaction core of a field-survey tool: the viewport
//! transform mapping image pixels to the screen, the multi-touch gesture
//! recognizer that disambiguates pan, pinch-zoom, and press-and-hold mark
//! placement, the magnified-preview (loupe) coordinate projector, and the
//! deterministic clustering of near-coincident markers into merged badges.
//! Persistence, archive export, and form UI stay with host collaborators
//! behind narrow seams.

pub mod core;
pub mod input;
pub mod loupe;
pub mod markers;
pub mod prelude;
pub mod spatial;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    geometry::{ImageDimensions, Point},
    transform::Transform,
    workspace::{Workspace, WorkspaceEvent, WorkspaceOptions},
};

pub use input::{
    events::{GestureEvent, PointerMode, TouchEvent, TouchEventType, TouchPoint},
    recognizer::{GestureConfig, GestureRecognizer},
};

pub use loupe::{LoupeConfig, LoupeProjector, LoupeView};

pub use spatial::{ClusterEngine, ClusteringConfig, DisplayCluster};

pub use markers::{
    FloorPlan, MarkPipeline, Marker, MarkerData, MarkerDraft, MarkerStore, MemoryStore,
    ProjectInfo,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Marker error: {0}")]
    Marker(String),

    #[error("Plan error: {0}")]
    Plan(String),
}

/// Error type alias for convenience
pub type Error = PlanError;
