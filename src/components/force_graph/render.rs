use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Clears to transparent so the container background shows through.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let style = &state.edge_style;
	let has_highlight = state.has_active_highlight();
	let t = ease_out_cubic(state.hover.highlight_t);
	let arrow_size = (style.width * 3.0).max(6.0);

	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}

		// highlighted edges hold their weight, the rest fade with the hover
		let alpha = match (has_highlight, state.is_highlighted(n1.index()) && state.is_highlighted(n2.index())) {
			(true, false) => style.opacity * (1.0 - 0.75 * t),
			_ => style.opacity,
		};
		let (r1, r2) = (
			n1.data.user_data.style.radius(),
			n2.data.user_data.style.radius(),
		);
		let (ux, uy) = (dx / dist, dy / dist);
		let tail = if style.arrow { r2 + arrow_size } else { r2 };

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(&style.line_color);
		ctx.set_line_width(style.width);
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * tail, y2 - uy * tail);
		ctx.stroke();

		if style.arrow {
			ctx.set_fill_style_str(&style.arrow_color);
			let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
			let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
			let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}
	});
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	// dimmed nodes first so highlighted ones paint on top
	for highlighted_pass in [false, true] {
		if highlighted_pass && !has_highlight {
			break;
		}
		state.graph.visit_nodes(|node| {
			let idx = node.index();
			let highlighted = has_highlight && state.is_highlighted(idx);
			if highlighted != highlighted_pass {
				return;
			}
			let info = &node.data.user_data;
			let style = &info.style;
			let (x, y) = (node.x() as f64, node.y() as f64);
			let grow = if highlighted && state.is_hovered(idx) {
				1.0 + 0.35 * t
			} else if highlighted {
				1.0 + 0.2 * t
			} else {
				1.0
			};
			let alpha = if has_highlight && !highlighted {
				style.opacity * (1.0 - 0.7 * t)
			} else {
				style.opacity
			};
			let (rx, ry) = (style.width / 2.0 * grow, style.height / 2.0 * grow);

			ctx.set_global_alpha(alpha);
			ctx.begin_path();
			let _ = ctx.ellipse(x, y, rx, ry, 0.0, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(&style.fill);
			ctx.fill();
			if let (Some(color), true) = (&style.border_color, style.border_width > 0.0) {
				ctx.set_stroke_style_str(color);
				ctx.set_line_width(style.border_width);
				ctx.stroke();
			}
			if highlighted && state.is_hovered(idx) && t > 0.01 {
				ctx.begin_path();
				let _ = ctx.ellipse(x, y, rx + 2.0 / k, ry + 2.0 / k, 0.0, 0.0, 2.0 * PI);
				ctx.set_stroke_style_str(&style.fill);
				ctx.set_line_width(1.5 / k);
				ctx.stroke();
			}

			// labels sit below and to the right of the node
			if let Some(label) = &info.label {
				ctx.set_fill_style_str(&style.label_color);
				ctx.set_font(&format!("{}px sans-serif", style.font_size));
				let _ = ctx.fill_text(label, x + rx + 2.0, y + ry + style.font_size * 0.8);
			}
		});
	}
	ctx.set_global_alpha(1.0);
}
