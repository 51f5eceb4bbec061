pub mod events;
pub mod recognizer;

// Re-export the essential types
pub use events::{GestureEvent, PointerMode, TouchEvent, TouchEventType, TouchPoint};
pub use recognizer::{GestureConfig, GestureRecognizer};
