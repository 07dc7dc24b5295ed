mod component;
mod error;
mod geometry;
mod model;
mod playback;
mod render;
mod selection;
mod simulation;
mod solve;
mod state;

pub use component::GraphEditorCanvas;
pub use error::GraphError;
pub use selection::Algorithm;
