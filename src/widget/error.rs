//! Widget error types.

use thiserror::Error;

use super::model::GraphFormat;

/// Failure of a single resolution or configuration step.
#[derive(Debug, Error)]
pub enum WidgetError {
	/// The decoder rejected the document for the declared format.
	#[error("failed to decode {format} document: {source}")]
	Decode {
		/// Format the host declared for `data`.
		format: GraphFormat,
		/// Underlying decoder failure.
		#[source]
		source: DecodeError,
	},

	/// A native document did not have the canonical `{elements}` shape.
	#[error("graph document is not in canonical shape: {0}")]
	Canonical(#[from] serde_json::Error),

	/// Defaults table overrides were unusable.
	#[error("invalid widget defaults: {0}")]
	InvalidDefaults(String),
}

/// Exchange-format decoding failures.
#[derive(Debug, Error)]
pub enum DecodeError {
	#[error("expected a JSON array of aspect objects")]
	NotAnAspectList,

	#[error("aspect `{aspect}` is malformed: {source}")]
	Aspect {
		aspect: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("edge {edge} references unknown node {node}")]
	UnknownNode { edge: i64, node: i64 },
}
