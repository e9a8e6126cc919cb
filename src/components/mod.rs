//! Browser-side pieces: the widget component, its container and engines.

pub mod cytoscape;
pub mod force_graph;
