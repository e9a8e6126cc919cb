//! Canvas rendering engine driven by the `force_graph` simulation.

mod engine;
mod render;
mod state;
mod types;

pub use engine::ForceGraphEngine;
