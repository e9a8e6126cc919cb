//! Picks the layout algorithm name for a draw.

use serde_json::Value;

use super::defaults::{PRESET_LAYOUT, WidgetDefaults};
use super::graph::{CanonicalGraph, is_truthy};

/// Whether the graph already carries coordinates.
///
/// Only the first node is inspected; coverage is assumed uniform.
pub fn has_positions(graph: &CanonicalGraph) -> bool {
	graph
		.elements
		.nodes
		.as_deref()
		.and_then(<[_]>::first)
		.and_then(|node| node.position.as_ref())
		.is_some_and(is_truthy)
}

/// A non-empty explicit name is used as-is and left for the engine to
/// validate. Otherwise embedded positions select the preset layout, and the
/// configured default covers everything else.
pub fn resolve_layout(
	explicit: Option<&Value>,
	graph: &CanonicalGraph,
	defaults: &WidgetDefaults,
) -> String {
	match explicit.and_then(Value::as_str) {
		Some(name) if !name.is_empty() => name.to_string(),
		_ if has_positions(graph) => PRESET_LAYOUT.to_string(),
		_ => defaults.layout.clone(),
	}
}
