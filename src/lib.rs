//! Scene core of a real-time renderer: hierarchical model trees, per-frame
//! visibility filtering and the fixed-order frame loop around them.

pub mod camera;
pub mod config;
pub mod engine;
pub mod math;
pub mod rendering;
pub mod scene_graph;
pub mod timer;
pub mod window;

pub use camera::{Camera, CameraHandle, CameraSource};
pub use config::{AppConfig, ConfigError};
pub use engine::{App, AppContext, FrameLoop, FramePhase, FrameReport};
