//! Prelude module for common planmark types
//!
//! This module re-exports the most commonly used types and functions for
//! easy importing with `use planmark::prelude::*;`

pub use crate::core::{
    constants,
    geometry::{ImageDimensions, Point},
    transform::Transform,
    workspace::{Workspace, WorkspaceEvent, WorkspaceOptions},
};

pub use crate::input::{
    events::{GestureEvent, PointerMode, TouchEvent, TouchEventType, TouchPoint},
    recognizer::{GestureConfig, GestureRecognizer},
};

pub use crate::loupe::{LoupeConfig, LoupeProjector, LoupeView};

pub use crate::spatial::{ClusterEngine, ClusteringConfig, DisplayCluster};

pub use crate::markers::{
    badge_placement, photo_file_name, plans_with_markers, BadgePlacement, FloorPlan,
    MarkPipeline, Marker, MarkerData, MarkerDraft, MarkerStore, MemoryStore, ProjectInfo,
};

pub use crate::{Error as PlanError, Result};

pub use std::time::Duration;

pub use instant::Instant;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
