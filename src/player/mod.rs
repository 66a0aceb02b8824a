//! Playback engine — N synchronized stems against one logical transport,
//! driven by wall-clock arithmetic over a clock-providing audio backend.

pub mod backend;
pub mod engine;
pub mod loader;
pub mod transport;

#[cfg(feature = "fetch")]
pub mod fetch;

pub use backend::{AudioBackend, AudioData, GainControl, SourceHandle};
pub use engine::{PlayerState, StemDescriptor, StemPlayer, stems_from_json};
pub use loader::StemLoader;
pub use transport::Transport;
