use crate::markers::marker::Marker;
use crate::Result;
use serde::{Deserialize, Serialize};

/// One floor-plan raster image within a project. The image bytes live with
/// the host; `source` is an opaque locator the rendering collaborator
/// understands (a path, a URL, an object-store key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub id: u64,
    pub name: String,
    pub source: String,
}

/// Project record persisted alongside the markers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub floor_plans: Vec<FloorPlan>,
}

/// Persistence collaborator: a key-value record store consulted only for
/// load and save. Implementations live outside this core (IndexedDB, sqlite,
/// a directory of JSON files); the engine never assumes anything beyond this
/// surface.
pub trait MarkerStore {
    fn load_project(&mut self) -> Result<Option<ProjectInfo>>;
    fn save_project(&mut self, project: &ProjectInfo) -> Result<()>;
    fn load_markers(&mut self) -> Result<Vec<Marker>>;
    fn append_marker(&mut self, marker: &Marker) -> Result<()>;
    /// Drops every stored record, ending the project.
    fn clear(&mut self) -> Result<()>;
}

/// In-memory store for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    project: Option<ProjectInfo>,
    markers: Vec<Marker>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing records, as if restored from disk.
    pub fn with_records(project: Option<ProjectInfo>, markers: Vec<Marker>) -> Self {
        Self { project, markers }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

impl MarkerStore for MemoryStore {
    fn load_project(&mut self) -> Result<Option<ProjectInfo>> {
        Ok(self.project.clone())
    }

    fn save_project(&mut self, project: &ProjectInfo) -> Result<()> {
        self.project = Some(project.clone());
        Ok(())
    }

    fn load_markers(&mut self) -> Result<Vec<Marker>> {
        Ok(self.markers.clone())
    }

    fn append_marker(&mut self, marker: &Marker) -> Result<()> {
        self.markers.push(marker.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.project = None;
        self.markers.clear();
        Ok(())
    }
}
