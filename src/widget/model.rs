//! Host-owned widget attributes and their change notifications.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::graph::StyleRules;

/// How the host serialized `data`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphFormat {
	/// Cytoscape Exchange: an aspect list that must be decoded.
	#[serde(rename = "cx")]
	Cx,
	/// Cytoscape.js JSON, already canonical.
	#[default]
	#[serde(rename = "cyjs")]
	Cyjs,
	/// Edge list prepared by the host, already canonical.
	#[serde(rename = "el")]
	EdgeList,
}

impl GraphFormat {
	pub fn as_str(&self) -> &'static str {
		match self {
			GraphFormat::Cx => "cx",
			GraphFormat::Cyjs => "cyjs",
			GraphFormat::EdgeList => "el",
		}
	}
}

impl fmt::Display for GraphFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Snapshot of the attributes the widget reads from its host model.
///
/// `layout` is the container's presentation layout, unrelated to the graph
/// layout algorithm in `layout_name`. Both names come from the host protocol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetModel {
	pub data: Value,
	#[serde(default)]
	pub format: GraphFormat,
	#[serde(default)]
	pub visual_style: Option<StyleRules>,
	/// Any JSON value; only a non-empty string selects an algorithm.
	#[serde(default)]
	pub layout_name: Option<Value>,
	#[serde(default)]
	pub background: Option<String>,
	#[serde(default)]
	pub layout: LayoutModel,
}

impl WidgetModel {
	pub fn new(data: Value) -> Self {
		Self {
			data,
			format: GraphFormat::default(),
			visual_style: None,
			layout_name: None,
			background: None,
			layout: LayoutModel::default(),
		}
	}

	pub fn cell_height(&self) -> Option<&str> {
		self.layout.attributes.height.as_deref()
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutModel {
	#[serde(default)]
	pub attributes: LayoutAttributes,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutAttributes {
	#[serde(default)]
	pub height: Option<String>,
}

/// Read access to the host's current attribute values.
pub trait HostModel {
	fn with_model<R>(&self, f: impl FnOnce(&WidgetModel) -> R) -> R;
}

impl HostModel for RefCell<WidgetModel> {
	fn with_model<R>(&self, f: impl FnOnce(&WidgetModel) -> R) -> R {
		f(&self.borrow())
	}
}

impl<T: HostModel + ?Sized> HostModel for Rc<T> {
	fn with_model<R>(&self, f: impl FnOnce(&WidgetModel) -> R) -> R {
		(**self).with_model(f)
	}
}

impl HostModel for Signal<WidgetModel> {
	fn with_model<R>(&self, f: impl FnOnce(&WidgetModel) -> R) -> R {
		self.with_untracked(f)
	}
}

/// Host attribute names that can emit change notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelAttribute {
	/// The render request attribute; the only one that triggers a redraw.
	Value,
	Data,
	Format,
	VisualStyle,
	LayoutName,
	Background,
	Layout,
}

impl ModelAttribute {
	/// Host attributes that differ between two snapshots, in declaration
	/// order. Never contains `Value`, which is a render request and not a
	/// stored attribute.
	pub fn changed_between(prev: &WidgetModel, next: &WidgetModel) -> Vec<ModelAttribute> {
		let checks = [
			(ModelAttribute::Data, prev.data != next.data),
			(ModelAttribute::Format, prev.format != next.format),
			(ModelAttribute::VisualStyle, prev.visual_style != next.visual_style),
			(ModelAttribute::LayoutName, prev.layout_name != next.layout_name),
			(ModelAttribute::Background, prev.background != next.background),
			(ModelAttribute::Layout, prev.layout != next.layout),
		];
		checks
			.into_iter()
			.filter_map(|(attribute, changed)| changed.then_some(attribute))
			.collect()
	}
}

/// A single attribute-change notification, delivered in host order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelEvent {
	pub attribute: ModelAttribute,
}

impl ModelEvent {
	pub fn changed(attribute: ModelAttribute) -> Self {
		Self { attribute }
	}

	pub fn triggers_render(&self) -> bool {
		self.attribute == ModelAttribute::Value
	}
}
