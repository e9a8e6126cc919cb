//! The `CytoscapeWidget` component and the engines it can draw with.

mod component;
mod container;
mod engine;

pub use component::CytoscapeWidget;
pub use container::{DomContainer, write_presentation};
pub use engine::{CytoscapeEngine, CytoscapeOptions, Renderer};
