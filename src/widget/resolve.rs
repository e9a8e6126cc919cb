//! Builds the configuration for one draw from a model snapshot.

use serde::Serialize;

use super::decode::{FormatDecoder, decode_document};
use super::defaults::WidgetDefaults;
use super::error::WidgetError;
use super::graph::{Elements, StyleRules};
use super::layout::resolve_layout;
use super::model::WidgetModel;
use super::style::resolve_style;

/// Everything an engine needs for a single draw. Built fresh each time and
/// moved into the engine.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedConfiguration {
	pub elements: Elements,
	pub style: StyleRules,
	pub layout_name: String,
}

/// `layout: { name }` as engines expect it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LayoutOptions<'a> {
	pub name: &'a str,
}

impl ResolvedConfiguration {
	pub fn layout(&self) -> LayoutOptions<'_> {
		LayoutOptions {
			name: &self.layout_name,
		}
	}
}

/// Decode, then resolve style and layout over the decoded graph.
pub fn resolve_configuration<D>(
	model: &WidgetModel,
	decoder: &D,
	defaults: &WidgetDefaults,
) -> Result<ResolvedConfiguration, WidgetError>
where
	D: FormatDecoder + ?Sized,
{
	let graph = decode_document(decoder, model.format, &model.data)?;
	let style = resolve_style(graph.style.as_ref(), model.visual_style.as_ref(), defaults);
	let layout_name = resolve_layout(model.layout_name.as_ref(), &graph, defaults);
	Ok(ResolvedConfiguration {
		elements: graph.elements,
		style,
		layout_name,
	})
}
