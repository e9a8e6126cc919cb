//! Resolution and re-render logic, independent of any DOM.

pub mod cx;
pub mod decode;
pub mod defaults;
pub mod error;
pub mod graph;
pub mod layout;
pub mod lifecycle;
pub mod model;
pub mod presentation;
pub mod resolve;
pub mod style;

pub use cx::CxDecoder;
pub use decode::{FormatDecoder, decode_document};
pub use defaults::{DEFAULT_BACKGROUND, DEFAULT_HEIGHT, DEFAULT_LAYOUT, PRESET_LAYOUT, WidgetDefaults};
pub use error::{DecodeError, WidgetError};
pub use graph::{CanonicalGraph, EdgeRecord, Elements, NodeRecord, StyleRule, StyleRules};
pub use layout::{has_positions, resolve_layout};
pub use lifecycle::{
	Container, DisplaySignal, DisplayTrigger, DrawOutcome, LifecycleController, LifecycleState,
	PendingDraw, RenderingEngine, display_signal,
};
pub use model::{GraphFormat, HostModel, ModelAttribute, ModelEvent, WidgetModel};
pub use presentation::{CONTAINER_CLASS, CONTAINER_ID, Presentation, resolve_presentation};
pub use resolve::{LayoutOptions, ResolvedConfiguration, resolve_configuration};
pub use style::resolve_style;
