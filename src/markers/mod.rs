pub mod export;
pub mod marker;
pub mod pipeline;
pub mod store;

// Re-export the essential types
pub use export::{badge_placement, photo_file_name, plans_with_markers, BadgePlacement};
pub use marker::{Marker, MarkerData};
pub use pipeline::{MarkPipeline, MarkerDraft};
pub use store::{FloorPlan, MarkerStore, MemoryStore, ProjectInfo};
