use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::types::{EdgeStyle, NodeStyle, StyleSheet};
use crate::widget::{PRESET_LAYOUT, ResolvedConfiguration};

/// Hit slop around a node, in graph space.
pub const HIT_PADDING: f64 = 6.0;
const FIT_PADDING: f64 = 30.0;
const GRID_SPACING: f64 = 60.0;

/// How initial coordinates are chosen for a layout name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
	/// Embedded coordinates, pinned.
	Preset,
	Circle,
	Grid,
	/// Seeded on a circle, then simulated.
	Force,
}

impl Placement {
	pub fn from_layout_name(name: &str) -> Self {
		match name {
			PRESET_LAYOUT => Placement::Preset,
			"circle" | "concentric" => Placement::Circle,
			"grid" => Placement::Grid,
			other => {
				debug!("layout `{other}` runs as force-directed");
				Placement::Force
			}
		}
	}

	fn pins_nodes(self) -> bool {
		self != Placement::Force
	}
}

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub label: Option<String>,
	pub style: NodeStyle,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edge_style: EdgeStyle,
	pub placement: Placement,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
}

impl ForceGraphState {
	pub fn new(config: &ResolvedConfiguration, width: f64, height: f64) -> Self {
		let sheet = StyleSheet::compile(&config.style);
		let placement = Placement::from_layout_name(&config.layout_name);
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();

		let nodes = config.elements.nodes();
		let columns = (nodes.len() as f64).sqrt().ceil().max(1.0) as usize;
		let circle_radius = (nodes.len() as f64 * GRID_SPACING / (2.0 * PI)).max(100.0);
		for (i, node) in nodes.iter().enumerate() {
			let id = node.id().unwrap_or_else(|| i.to_string());
			let style = sheet.node_style(Some(&id));
			let label = style.label.resolve(&node.data);
			let angle = (i as f64) * 2.0 * PI / nodes.len() as f64;
			let (x, y) = match placement {
				// Unpositioned nodes land on the origin, as in any preset layout.
				Placement::Preset => node.point().unwrap_or((0.0, 0.0)),
				Placement::Grid => (
					(i % columns) as f64 * GRID_SPACING,
					(i / columns) as f64 * GRID_SPACING,
				),
				Placement::Circle => (circle_radius * angle.cos(), circle_radius * angle.sin()),
				Placement::Force => (100.0 * angle.cos(), 100.0 * angle.sin()),
			};

			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: placement.pins_nodes(),
				user_data: NodeInfo { label, style },
			});
			id_to_idx.insert(id, idx);
		}

		for edge in config.elements.edges() {
			let endpoints = edge
				.source()
				.zip(edge.target())
				.and_then(|(s, t)| Some((*id_to_idx.get(&s)?, *id_to_idx.get(&t)?)));
			match endpoints {
				Some((src, tgt)) => {
					graph.add_edge(src, tgt, EdgeData::default());
					edges.push((src, tgt));
				}
				None => debug!("skipping edge with unknown endpoints: {:?}", edge.data.get("id")),
			}
		}

		let mut state = Self {
			graph,
			edges,
			edge_style: sheet.edge_style().clone(),
			placement,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
		};
		if placement.pins_nodes() {
			state.fit();
		}
		state
	}

	/// Centers the graph and scales it to fill the viewport.
	pub fn fit(&mut self) {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			let r = node.data.user_data.style.radius();
			bounds = Some(match bounds {
				None => (x - r, y - r, x + r, y + r),
				Some((x0, y0, x1, y1)) => (x0.min(x - r), y0.min(y - r), x1.max(x + r), y1.max(y + r)),
			});
		});
		let Some((x0, y0, x1, y1)) = bounds else {
			return;
		};
		let (bw, bh) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let k = ((self.width - 2.0 * FIT_PADDING) / bw)
			.min((self.height - 2.0 * FIT_PADDING) / bh)
			.clamp(0.1, 10.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - (x0 + bw / 2.0) * k,
			y: self.height / 2.0 - (y0 + bh / 2.0) * k,
			k,
		};
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let reach = node.data.user_data.style.radius() + HIT_PADDING;
			if (dx * dx + dy * dy).sqrt() < reach {
				found = Some(node.index());
			}
		});
		found
	}

	/// Starts dragging the node under the pointer, or panning if there is none.
	pub fn press(&mut self, x: f64, y: f64) {
		match self.node_at_position(x, y) {
			Some(idx) => {
				self.drag = DragState {
					active: true,
					node_idx: Some(idx),
					start_x: x,
					start_y: y,
					..DragState::default()
				};
				let drag = &mut self.drag;
				self.graph.visit_nodes(|node| {
					if node.index() == idx {
						drag.node_start_x = node.x();
						drag.node_start_y = node.y();
					}
				});
			}
			None => {
				self.pan = PanState {
					active: true,
					start_x: x,
					start_y: y,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
				};
			}
		}
	}

	pub fn pointer_moved(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
		}

		if let (true, Some(idx)) = (self.drag.active, self.drag.node_idx) {
			let k = self.transform.k;
			let (nx, ny) = (
				self.drag.node_start_x + ((x - self.drag.start_x) / k) as f32,
				self.drag.node_start_y + ((y - self.drag.start_y) / k) as f32,
			);
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.x = nx;
					node.data.y = ny;
					node.data.is_anchor = true;
				}
			});
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	/// Ends a drag or pan. Dragged nodes stay pinned where they were dropped.
	pub fn release(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
	}

	pub fn leave(&mut self) {
		self.release();
		self.set_hover(None);
	}

	/// Zooms about the pointer; positive `delta_y` zooms out.
	pub fn zoom(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the previous highlight around while it fades out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		if self.placement == Placement::Force || self.drag.active {
			self.graph.update(dt);
		}

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::widget::{CxDecoder, WidgetDefaults, WidgetModel, resolve_configuration};

	fn config(doc: serde_json::Value, layout: Option<&str>) -> ResolvedConfiguration {
		let mut model = WidgetModel::new(doc);
		model.layout_name = layout.map(|name| json!(name));
		resolve_configuration(&model, &CxDecoder, &WidgetDefaults::default()).unwrap()
	}

	fn positions(state: &ForceGraphState) -> Vec<(f32, f32, bool)> {
		let mut out = Vec::new();
		state
			.graph
			.visit_nodes(|node| out.push((node.x(), node.y(), node.data.is_anchor)));
		out
	}

	fn two_nodes() -> serde_json::Value {
		json!({"elements": {
			"nodes": [
				{"data": {"id": "a"}, "position": {"x": 0, "y": 0}},
				{"data": {"id": "b"}, "position": {"x": 100, "y": 50}}
			],
			"edges": [
				{"data": {"id": "ab", "source": "a", "target": "b"}},
				{"data": {"id": "ax", "source": "a", "target": "missing"}}
			]
		}})
	}

	#[test]
	fn preset_keeps_embedded_coordinates_pinned() {
		let state = ForceGraphState::new(&config(two_nodes(), None), 800.0, 600.0);
		assert_eq!(state.placement, Placement::Preset);
		assert_eq!(state.edges.len(), 1);
		let nodes = positions(&state);
		assert!(nodes.contains(&(0.0, 0.0, true)));
		assert!(nodes.contains(&(100.0, 50.0, true)));
	}

	#[test]
	fn fit_centers_the_graph() {
		let state = ForceGraphState::new(&config(two_nodes(), None), 800.0, 600.0);
		let (cx, cy) = state.screen_to_graph(400.0, 300.0);
		assert!((cx - 50.0).abs() < 1e-6);
		assert!((cy - 25.0).abs() < 1e-6);
		assert!(state.node_at_position(400.0, 300.0).is_none());
	}

	#[test]
	fn unknown_layout_names_simulate() {
		let state = ForceGraphState::new(&config(two_nodes(), Some("cola")), 800.0, 600.0);
		assert_eq!(state.placement, Placement::Force);
		assert!(positions(&state).iter().all(|&(_, _, pinned)| !pinned));
	}

	#[test]
	fn grid_places_rows() {
		let doc = json!({"elements": {"nodes": [
			{"data": {"id": "a"}}, {"data": {"id": "b"}}, {"data": {"id": "c"}}
		]}});
		let state = ForceGraphState::new(&config(doc, Some("grid")), 800.0, 600.0);
		let nodes = positions(&state);
		assert!(nodes.contains(&(0.0, 0.0, true)));
		assert!(nodes.contains(&(60.0, 0.0, true)));
		assert!(nodes.contains(&(0.0, 60.0, true)));
	}

	#[test]
	fn dragging_pins_the_node_where_dropped() {
		let mut state = ForceGraphState::new(&config(two_nodes(), None), 800.0, 600.0);
		state.transform = ViewTransform {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		};
		state.press(100.0, 50.0);
		assert!(state.drag.active);
		state.pointer_moved(120.0, 70.0);
		state.release();
		assert!(!state.drag.active);
		assert!(positions(&state).contains(&(120.0, 70.0, true)));
	}

	#[test]
	fn pressing_empty_space_pans() {
		let mut state = ForceGraphState::new(&config(two_nodes(), None), 800.0, 600.0);
		state.transform = ViewTransform {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		};
		state.press(500.0, 500.0);
		assert!(state.pan.active);
		state.pointer_moved(510.0, 490.0);
		assert_eq!((state.transform.x, state.transform.y), (10.0, -10.0));
		state.leave();
		assert!(!state.pan.active);
	}

	#[test]
	fn zoom_keeps_the_pointer_fixed() {
		let mut state = ForceGraphState::new(&config(two_nodes(), None), 800.0, 600.0);
		let before = state.screen_to_graph(200.0, 100.0);
		state.zoom(200.0, 100.0, -1.0);
		let after = state.screen_to_graph(200.0, 100.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn hover_collects_neighbors() {
		let mut state = ForceGraphState::new(&config(two_nodes(), None), 800.0, 600.0);
		state.transform = ViewTransform {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		};
		let a = state.node_at_position(0.0, 0.0).unwrap();
		state.set_hover(Some(a));
		assert_eq!(state.hover.neighbors.len(), 1);
		assert!(state.has_active_highlight());
		state.set_hover(None);
		assert!(state.is_hovered(a));
		assert!(state.hover.neighbors.is_empty());
	}
}
