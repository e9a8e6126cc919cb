//! Format dispatch in front of the exchange-format decoder.

use serde::Deserialize;
use serde_json::Value;

use super::error::{DecodeError, WidgetError};
use super::graph::CanonicalGraph;
use super::model::GraphFormat;

/// Turns an exchange-format document into canonical elements, plus the style
/// the document carried when it has one.
pub trait FormatDecoder {
	fn decode(&self, data: &Value) -> Result<CanonicalGraph, DecodeError>;
}

impl<F> FormatDecoder for F
where
	F: Fn(&Value) -> Result<CanonicalGraph, DecodeError>,
{
	fn decode(&self, data: &Value) -> Result<CanonicalGraph, DecodeError> {
		self(data)
	}
}

/// Only exchange documents go through the decoder. Native and edge-list
/// documents are already canonical and never contribute a derived style.
pub fn decode_document<D>(
	decoder: &D,
	format: GraphFormat,
	data: &Value,
) -> Result<CanonicalGraph, WidgetError>
where
	D: FormatDecoder + ?Sized,
{
	match format {
		GraphFormat::Cx => decoder
			.decode(data)
			.map_err(|source| WidgetError::Decode { format, source }),
		GraphFormat::Cyjs | GraphFormat::EdgeList => {
			let mut graph = CanonicalGraph::deserialize(data)?;
			graph.style = None;
			Ok(graph)
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use serde_json::json;

	use super::*;
	use crate::widget::graph::StyleRule;

	#[test]
	fn native_documents_skip_the_decoder() {
		let calls = Cell::new(0);
		let decoder = |_: &Value| -> Result<CanonicalGraph, DecodeError> {
			calls.set(calls.get() + 1);
			Ok(CanonicalGraph::default())
		};
		let doc = json!({
			"elements": {"nodes": [{"data": {"id": "a"}}]},
			"style": [{"selector": "node", "style": {}}]
		});
		for format in [GraphFormat::Cyjs, GraphFormat::EdgeList] {
			let graph = decode_document(&decoder, format, &doc).unwrap();
			assert_eq!(graph.elements.nodes().len(), 1);
			assert!(graph.style.is_none());
		}
		assert_eq!(calls.get(), 0);
	}

	#[test]
	fn native_flat_element_lists_decode() {
		let decoder =
			|_: &Value| -> Result<CanonicalGraph, DecodeError> { Err(DecodeError::NotAnAspectList) };
		let doc = json!({"elements": [{"group": "nodes", "data": {"id": "a"}}]});
		let graph = decode_document(&decoder, GraphFormat::Cyjs, &doc).unwrap();
		assert_eq!(graph.elements.nodes()[0].id().as_deref(), Some("a"));
		assert!(graph.elements.edges().is_empty());
	}

	#[test]
	fn exchange_documents_keep_the_derived_style() {
		let decoder = |_: &Value| -> Result<CanonicalGraph, DecodeError> {
			Ok(CanonicalGraph {
				style: Some(vec![StyleRule::new("node", json!({"color": "red"}))]),
				..Default::default()
			})
		};
		let graph = decode_document(&decoder, GraphFormat::Cx, &json!([])).unwrap();
		assert_eq!(graph.style.unwrap()[0].selector, "node");
	}

	#[test]
	fn decoder_failures_carry_the_format() {
		let decoder =
			|_: &Value| -> Result<CanonicalGraph, DecodeError> { Err(DecodeError::NotAnAspectList) };
		let err = decode_document(&decoder, GraphFormat::Cx, &json!({})).unwrap_err();
		assert!(matches!(
			err,
			WidgetError::Decode {
				format: GraphFormat::Cx,
				..
			}
		));
		assert!(err.to_string().starts_with("failed to decode cx document"));
	}

	#[test]
	fn malformed_native_documents_fail() {
		let decoder =
			|_: &Value| -> Result<CanonicalGraph, DecodeError> { Ok(CanonicalGraph::default()) };
		let err = decode_document(&decoder, GraphFormat::Cyjs, &json!({"elements": 3}));
		assert!(matches!(err, Err(WidgetError::Canonical(_))));
	}
}
