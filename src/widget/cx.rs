//! Cytoscape Exchange (CX) decoder.
//!
//! A CX document is a JSON array of single-key aspect objects. Aspects can
//! repeat and are merged in document order. Only the aspects needed to draw
//! are read: nodes, edges, their attributes, cartesian coordinates and the
//! default/bypass visual properties. Everything else is skipped.

use std::collections::HashMap;

use log::{debug, trace};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use super::decode::FormatDecoder;
use super::error::DecodeError;
use super::graph::{CanonicalGraph, EdgeRecord, Elements, NodeRecord, StyleRule, StyleRules};

/// Data keys owned by the canonical representation; attributes never
/// overwrite them.
const RESERVED_KEYS: &[&str] = &["id", "source", "target"];

/// Default [`FormatDecoder`] for exchange documents.
#[derive(Clone, Copy, Debug, Default)]
pub struct CxDecoder;

impl FormatDecoder for CxDecoder {
	fn decode(&self, data: &Value) -> Result<CanonicalGraph, DecodeError> {
		let fragments = data.as_array().ok_or(DecodeError::NotAnAspectList)?;
		let mut doc = CxDocument::default();
		for fragment in fragments {
			let aspects = fragment.as_object().ok_or(DecodeError::NotAnAspectList)?;
			for (name, payload) in aspects {
				doc.absorb(name, payload)?;
			}
		}
		doc.into_graph()
	}
}

#[derive(Deserialize)]
struct CxNode {
	#[serde(rename = "@id")]
	id: i64,
	#[serde(default)]
	n: Option<String>,
	#[serde(default)]
	r: Option<String>,
}

#[derive(Deserialize)]
struct CxEdge {
	#[serde(rename = "@id")]
	id: i64,
	s: i64,
	t: i64,
	#[serde(default)]
	i: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Owners {
	One(i64),
	Many(Vec<i64>),
}

impl Owners {
	fn ids(&self) -> &[i64] {
		match self {
			Owners::One(id) => std::slice::from_ref(id),
			Owners::Many(ids) => ids,
		}
	}
}

#[derive(Deserialize)]
struct CxAttribute {
	po: Owners,
	n: String,
	v: Value,
	#[serde(default)]
	d: Option<String>,
}

#[derive(Deserialize)]
struct CxPosition {
	node: i64,
	x: f64,
	y: f64,
}

#[derive(Deserialize)]
struct CxVisualProperty {
	properties_of: String,
	#[serde(default)]
	applies_to: Option<i64>,
	#[serde(default)]
	properties: Map<String, Value>,
}

#[derive(Default)]
struct CxDocument {
	nodes: Vec<CxNode>,
	edges: Vec<CxEdge>,
	node_attributes: Vec<CxAttribute>,
	edge_attributes: Vec<CxAttribute>,
	positions: Vec<CxPosition>,
	visual_properties: Option<Vec<CxVisualProperty>>,
}

fn parse<T: DeserializeOwned>(aspect: &str, payload: &Value) -> Result<Vec<T>, DecodeError> {
	Vec::<T>::deserialize(payload).map_err(|source| DecodeError::Aspect {
		aspect: aspect.to_string(),
		source,
	})
}

impl CxDocument {
	fn absorb(&mut self, aspect: &str, payload: &Value) -> Result<(), DecodeError> {
		match aspect {
			"nodes" => self.nodes.extend(parse(aspect, payload)?),
			"edges" => self.edges.extend(parse(aspect, payload)?),
			"nodeAttributes" => self.node_attributes.extend(parse(aspect, payload)?),
			"edgeAttributes" => self.edge_attributes.extend(parse(aspect, payload)?),
			"cartesianLayout" => self.positions.extend(parse(aspect, payload)?),
			"cyVisualProperties" | "visualProperties" => self
				.visual_properties
				.get_or_insert_with(Vec::new)
				.extend(parse(aspect, payload)?),
			other => trace!("skipping CX aspect `{other}`"),
		}
		Ok(())
	}

	fn into_graph(self) -> Result<CanonicalGraph, DecodeError> {
		let mut node_index = HashMap::with_capacity(self.nodes.len());
		let mut node_data = Vec::with_capacity(self.nodes.len());
		for node in &self.nodes {
			let mut data = Map::new();
			data.insert("id".into(), json!(node.id.to_string()));
			if let Some(name) = &node.n {
				data.insert("name".into(), json!(name));
			}
			if let Some(represents) = &node.r {
				data.insert("represents".into(), json!(represents));
			}
			node_index.insert(node.id, node_data.len());
			node_data.push(data);
		}

		let mut edge_index = HashMap::with_capacity(self.edges.len());
		let mut edge_data = Vec::with_capacity(self.edges.len());
		for edge in &self.edges {
			for endpoint in [edge.s, edge.t] {
				if !node_index.contains_key(&endpoint) {
					return Err(DecodeError::UnknownNode {
						edge: edge.id,
						node: endpoint,
					});
				}
			}
			let mut data = Map::new();
			data.insert("id".into(), json!(edge.id.to_string()));
			data.insert("source".into(), json!(edge.s.to_string()));
			data.insert("target".into(), json!(edge.t.to_string()));
			if let Some(interaction) = &edge.i {
				data.insert("interaction".into(), json!(interaction));
			}
			edge_index.insert(edge.id, edge_data.len());
			edge_data.push(data);
		}

		apply_attributes(&self.node_attributes, &node_index, &mut node_data);
		apply_attributes(&self.edge_attributes, &edge_index, &mut edge_data);

		let mut nodes: Vec<NodeRecord> = node_data
			.into_iter()
			.map(|data| NodeRecord {
				data,
				..Default::default()
			})
			.collect();
		for position in &self.positions {
			match node_index.get(&position.node) {
				Some(&i) => nodes[i].position = Some(json!({"x": position.x, "y": position.y})),
				None => debug!("cartesianLayout entry for unknown node {}", position.node),
			}
		}
		let edges = edge_data
			.into_iter()
			.map(|data| EdgeRecord {
				data,
				..Default::default()
			})
			.collect();

		let style = self
			.visual_properties
			.as_deref()
			.map(derive_style)
			.filter(|rules| !rules.is_empty());

		Ok(CanonicalGraph {
			elements: Elements {
				nodes: Some(nodes),
				edges: Some(edges),
			},
			style,
		})
	}
}

fn apply_attributes(
	attributes: &[CxAttribute],
	index: &HashMap<i64, usize>,
	data: &mut [Map<String, Value>],
) {
	for attribute in attributes {
		if RESERVED_KEYS.contains(&attribute.n.as_str()) {
			debug!("ignoring attribute `{}` that shadows element data", attribute.n);
			continue;
		}
		let value = typed_value(&attribute.v, attribute.d.as_deref());
		for owner in attribute.po.ids() {
			match index.get(owner) {
				Some(&i) => {
					data[i].insert(attribute.n.clone(), value.clone());
				}
				None => debug!("attribute `{}` for unknown element {owner}", attribute.n),
			}
		}
	}
}

/// CX ships most scalars as strings alongside a declared data type.
fn typed_value(value: &Value, data_type: Option<&str>) -> Value {
	let Some(data_type) = data_type else {
		return value.clone();
	};
	if let Some(item_type) = data_type.strip_prefix("list_of_") {
		return match value {
			Value::Array(items) => items.iter().map(|v| typed_value(v, Some(item_type))).collect(),
			other => other.clone(),
		};
	}
	let Value::String(raw) = value else {
		return value.clone();
	};
	match data_type {
		"double" => raw.parse::<f64>().map(|f| json!(f)).unwrap_or_else(|_| value.clone()),
		"integer" | "long" => raw.parse::<i64>().map(|i| json!(i)).unwrap_or_else(|_| value.clone()),
		"boolean" => raw.parse::<bool>().map(|b| json!(b)).unwrap_or_else(|_| value.clone()),
		_ => value.clone(),
	}
}

/// Defaults become `node`/`edge` rules; per-element bypasses follow them as
/// `#id` rules so they take precedence in the engine.
fn derive_style(properties: &[CxVisualProperty]) -> StyleRules {
	let mut defaults = Vec::new();
	let mut bypasses = Vec::new();
	for entry in properties {
		if !entry.properties.is_empty() {
			trace!("visual properties of `{}`", entry.properties_of);
		}
		let translated = translate_properties(&entry.properties);
		match (entry.properties_of.as_str(), entry.applies_to) {
			("nodes:default", _) => {
				let mut style = translated;
				style.insert("label".into(), json!("data(name)"));
				defaults.push(StyleRule {
					selector: "node".into(),
					style,
				});
			}
			("edges:default", _) => defaults.push(StyleRule {
				selector: "edge".into(),
				style: translated,
			}),
			("nodes" | "edges", Some(id)) if !translated.is_empty() => bypasses.push(StyleRule {
				selector: format!("#{id}"),
				style: translated,
			}),
			(other, _) => trace!("no style rule for `{other}` visual properties"),
		}
	}
	defaults.extend(bypasses);
	defaults
}

fn translate_properties(properties: &Map<String, Value>) -> Map<String, Value> {
	let mut style = Map::new();
	for (key, value) in properties {
		let color = || Some(value.clone());
		let translated = match key.as_str() {
			"NODE_FILL_COLOR" => vec![("background-color", color())],
			"NODE_SIZE" => vec![("width", number(value)), ("height", number(value))],
			"NODE_WIDTH" => vec![("width", number(value))],
			"NODE_HEIGHT" => vec![("height", number(value))],
			"NODE_SHAPE" => vec![("shape", shape(value))],
			"NODE_LABEL_COLOR" | "EDGE_LABEL_COLOR" => vec![("color", color())],
			"NODE_LABEL_FONT_SIZE" | "EDGE_LABEL_FONT_SIZE" => vec![("font-size", number(value))],
			"NODE_BORDER_PAINT" => vec![("border-color", color())],
			"NODE_BORDER_WIDTH" => vec![("border-width", number(value))],
			"NODE_TRANSPARENCY" => vec![("background-opacity", opacity(value))],
			"EDGE_WIDTH" => vec![("width", number(value))],
			"EDGE_STROKE_UNSELECTED_PAINT" | "EDGE_UNSELECTED_PAINT" => {
				vec![("line-color", color())]
			}
			"EDGE_TARGET_ARROW_UNSELECTED_PAINT" => vec![("target-arrow-color", color())],
			"EDGE_SOURCE_ARROW_UNSELECTED_PAINT" => vec![("source-arrow-color", color())],
			"EDGE_TARGET_ARROW_SHAPE" => vec![("target-arrow-shape", arrow(value))],
			"EDGE_SOURCE_ARROW_SHAPE" => vec![("source-arrow-shape", arrow(value))],
			"EDGE_TRANSPARENCY" => vec![("opacity", opacity(value))],
			_ => Vec::new(),
		};
		for (property, value) in translated {
			if let Some(value) = value {
				style.insert(property.to_string(), value);
			}
		}
	}
	style
}

fn number(value: &Value) -> Option<Value> {
	match value {
		Value::Number(_) => Some(value.clone()),
		Value::String(s) => s.trim().parse::<f64>().ok().map(|f| json!(f)),
		_ => None,
	}
}

fn opacity(value: &Value) -> Option<Value> {
	let alpha = number(value)?.as_f64()?;
	Some(json!((alpha / 255.0).clamp(0.0, 1.0)))
}

fn shape(value: &Value) -> Option<Value> {
	let name = value.as_str()?;
	Some(json!(name.to_ascii_lowercase().replace('_', "")))
}

fn arrow(value: &Value) -> Option<Value> {
	let name = value.as_str()?;
	let shape = match name {
		"NONE" => "none",
		"DELTA" | "DELTA_SHORT_1" | "DELTA_SHORT_2" => "triangle",
		"ARROW" | "ARROW_SHORT" => "vee",
		"T" => "tee",
		"CIRCLE" => "circle",
		"DIAMOND" | "DIAMOND_SHORT_1" | "DIAMOND_SHORT_2" => "diamond",
		"HALF_TOP" | "HALF_BOTTOM" => "triangle",
		other => return Some(json!(other.to_ascii_lowercase())),
	};
	Some(json!(shape))
}
