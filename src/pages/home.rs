use leptos::prelude::*;
use log::warn;
use serde_json::{Value, json};

use crate::components::cytoscape::{CytoscapeWidget, Renderer};
use crate::widget::{GraphFormat, WidgetDefaults, WidgetModel};

/// Fallbacks for the demo; anything left out keeps its built-in value.
const DEMO_DEFAULTS: &str = r##"{"background": "#FAFAFA", "height": "560px"}"##;

fn demo_defaults() -> WidgetDefaults {
	WidgetDefaults::from_json(DEMO_DEFAULTS).unwrap_or_else(|err| {
		warn!("{err}; using built-in defaults");
		WidgetDefaults::default()
	})
}

/// Random tree in the canonical `{ elements }` shape.
fn sample_tree(n: usize) -> Value {
	let nodes: Vec<Value> = (0..n)
		.map(|i| json!({"data": {"id": i.to_string()}}))
		.collect();
	let edges: Vec<Value> = (1..n)
		.map(|i| {
			let target = (rand_simple(i) * (i as f64)) as usize;
			json!({"data": {"id": format!("e{i}"), "source": i.to_string(), "target": target.to_string()}})
		})
		.collect();
	json!({"elements": {"nodes": nodes, "edges": edges}})
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Square with embedded coordinates, so the layout resolves to `preset`.
fn sample_positioned() -> Value {
	let corners = [("a", 0, 0), ("b", 200, 0), ("c", 200, 200), ("d", 0, 200)];
	let nodes: Vec<Value> = corners
		.iter()
		.map(|(id, x, y)| json!({"data": {"id": id}, "position": {"x": x, "y": y}}))
		.collect();
	json!({"elements": {
		"nodes": nodes,
		"edges": [
			{"data": {"id": "ab", "source": "a", "target": "b"}},
			{"data": {"id": "bc", "source": "b", "target": "c"}},
			{"data": {"id": "cd", "source": "c", "target": "d"}},
			{"data": {"id": "da", "source": "d", "target": "a"}}
		]
	}})
}

/// Small exchange document carrying its own visual properties.
fn sample_exchange() -> Value {
	json!([
		{"nodes": [{"@id": 1, "n": "alpha"}, {"@id": 2, "n": "beta"}, {"@id": 3, "n": "gamma"}]},
		{"edges": [{"@id": 10, "s": 1, "t": 2}, {"@id": 11, "s": 2, "t": 3}, {"@id": 12, "s": 3, "t": 1}]},
		{"nodeAttributes": [{"po": 1, "n": "weight", "v": "3", "d": "integer"}]},
		{"cyVisualProperties": [
			{"properties_of": "nodes:default", "properties": {
				"NODE_FILL_COLOR": "#1565C0",
				"NODE_WIDTH": "24",
				"NODE_HEIGHT": "24",
				"NODE_LABEL_COLOR": "#263238"
			}},
			{"properties_of": "edges:default", "properties": {
				"EDGE_STROKE_UNSELECTED_PAINT": "#90A4AE",
				"EDGE_WIDTH": "2",
				"EDGE_TARGET_ARROW_SHAPE": "DELTA"
			}}
		]}
	])
}

fn sample(name: &str) -> (Value, GraphFormat) {
	match name {
		"positioned" => (sample_positioned(), GraphFormat::Cyjs),
		"exchange" => (sample_exchange(), GraphFormat::Cx),
		_ => (sample_tree(60), GraphFormat::Cyjs),
	}
}

/// Demo page: one widget plus controls for the host model.
#[component]
pub fn Home() -> impl IntoView {
	let model = RwSignal::new({
		let (data, format) = sample("tree");
		WidgetModel {
			format,
			..WidgetModel::new(data)
		}
	});
	let renderer = RwSignal::new(Renderer::default());
	let defaults = demo_defaults();

	let on_sample = move |ev| {
		let (data, format) = sample(&event_target_value(&ev));
		model.update(|m| {
			m.data = data;
			m.format = format;
		});
	};
	let on_layout = move |ev| {
		let name = event_target_value(&ev);
		model.update(|m| m.layout_name = (!name.is_empty()).then(|| Value::String(name)));
	};
	let on_background = move |ev| {
		let color = event_target_value(&ev);
		model.update(|m| m.background = Some(color));
	};
	let on_height = move |ev| {
		let height = event_target_value(&ev);
		model.update(|m| m.layout.attributes.height = Some(height));
	};
	let on_renderer = move |ev| {
		renderer.set(match event_target_value(&ev).as_str() {
			"canvas" => Renderer::ForceCanvas,
			_ => Renderer::Cytoscape,
		});
	};

	view! {
		<div class="widget-demo">
			<h1>"Graph widget"</h1>
			<div class="controls">
				<label>
					"Graph "
					<select on:change=on_sample>
						<option value="tree">"Random tree"</option>
						<option value="positioned">"Positioned square"</option>
						<option value="exchange">"Exchange document"</option>
					</select>
				</label>
				<label>
					"Layout "
					<select on:change=on_layout>
						<option value="">"(inferred)"</option>
						<option value="cose">"cose"</option>
						<option value="circle">"circle"</option>
						<option value="grid">"grid"</option>
						<option value="preset">"preset"</option>
					</select>
				</label>
				<label>
					"Background "
					<input type="color" value="#fafafa" on:change=on_background />
				</label>
				<label>
					"Height "
					<select on:change=on_height>
						<option value="560px">"560px"</option>
						<option value="320px">"320px"</option>
						<option value="720px">"720px"</option>
					</select>
				</label>
				<label>
					"Renderer "
					<select on:change=on_renderer>
						<option value="cytoscape">"cytoscape.js"</option>
						<option value="canvas">"canvas"</option>
					</select>
				</label>
			</div>
			// switching engines mounts a fresh widget
			{move || {
				view! {
					<CytoscapeWidget
						model=model
						renderer=renderer.get()
						defaults=defaults.clone()
					/>
				}
			}}
		</div>
	}
}
