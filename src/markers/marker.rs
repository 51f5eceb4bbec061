use serde::{Deserialize, Serialize};

/// Form payload attached to a marker when the save dialog completes.
/// All values are kept as entered; validation belongs to the form UI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarkerData {
    pub floor: String,
    pub is_mezzanine: bool,
    pub location: String,
    pub code1: String,
    pub code2: String,
    pub code3: String,
    pub code4: String,
    pub code6: String,
    pub length: String,
    pub width: String,
}

/// One placed annotation. Immutable once committed.
///
/// `x` and `y` are percentages of the image dimensions (0-100), not pixels,
/// which keeps a marker's position independent of zoom, pan, and export
/// resolution. `seq` is the user-facing ordinal, assigned as
/// `max(existing) + 1` and never reused; `id` is a creation-time unique key
/// used as the owning identity for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: u64,
    pub plan_index: usize,
    pub x: f64,
    pub y: f64,
    pub seq: u32,
    pub data: MarkerData,
    /// Captured photo bytes; empty when the capture collaborator supplied
    /// nothing.
    #[serde(default)]
    pub photo: Vec<u8>,
}

impl Marker {
    pub fn new(
        id: u64,
        plan_index: usize,
        x: f64,
        y: f64,
        seq: u32,
        data: MarkerData,
        photo: Vec<u8>,
    ) -> Self {
        Self {
            id,
            plan_index,
            x,
            y,
            seq,
            data,
            photo,
        }
    }
}
