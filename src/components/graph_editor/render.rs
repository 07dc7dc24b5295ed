use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::geometry::{EdgePath, Emphasis, LABEL_RADIUS, NodeRole, Scene};
use super::model::NODE_RADIUS;

const BACKGROUND: &str = "#fafafa";
const NODE_NORMAL: &str = "#607D8B";
const NODE_SELECTED: &str = "#2196F3";
const NODE_START: &str = "#4CAF50";
const NODE_END: &str = "#F44336";
const EDGE_NORMAL: &str = "#607D8B";
const EDGE_SELECTED: &str = "#FF5722";
const EDGE_HIGHLIGHTED: &str = "#FF9800";
const LABEL_ACCENT: &str = "#E91E63";

const ARROW_SIZE: f64 = 10.0;
const DASH: f64 = 8.0;
const GAP: f64 = 4.0;

pub fn render(
	scene: &Scene,
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
	flow_time: f64,
) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
	draw_edges(scene, ctx, flow_time);
	draw_nodes(scene, ctx);
}

fn edge_style(emphasis: Emphasis) -> (&'static str, f64) {
	match emphasis {
		Emphasis::Normal => (EDGE_NORMAL, 2.0),
		Emphasis::Highlighted => (EDGE_HIGHLIGHTED, 3.0),
		Emphasis::Selected => (EDGE_SELECTED, 3.0),
	}
}

fn draw_edges(scene: &Scene, ctx: &CanvasRenderingContext2d, flow_time: f64) {
	// marching dashes make highlighted edges read as flow
	let dash_offset = -(flow_time * 0.5) % (DASH + GAP);

	for edge in &scene.edges {
		let (color, line_width) = edge_style(edge.emphasis);
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(line_width);
		if edge.emphasis == Emphasis::Highlighted {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(DASH),
				&JsValue::from_f64(GAP),
			));
			ctx.set_line_dash_offset(dash_offset);
		}

		match edge.path {
			EdgePath::Line { from, to } => {
				ctx.begin_path();
				ctx.move_to(from.0, from.1);
				ctx.line_to(to.0, to.1);
				ctx.stroke();
				let _ = ctx.set_line_dash(&js_sys::Array::new());
				if edge.directed {
					draw_arrowhead(ctx, color, from, to);
				}
			}
			EdgePath::Loop(curve) => {
				ctx.begin_path();
				ctx.move_to(curve.start.0, curve.start.1);
				ctx.bezier_curve_to(
					curve.control1.0,
					curve.control1.1,
					curve.control2.0,
					curve.control2.1,
					curve.end.0,
					curve.end.1,
				);
				ctx.stroke();
				let _ = ctx.set_line_dash(&js_sys::Array::new());
			}
		}

		draw_weight_label(ctx, &edge.label, edge.label_pos);
	}
}

fn draw_arrowhead(
	ctx: &CanvasRenderingContext2d,
	color: &str,
	from: (f64, f64),
	to: (f64, f64),
) {
	let dx = to.0 - from.0;
	let dy = to.1 - from.1;
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let (back_x, back_y) = (to.0 - ux * ARROW_SIZE, to.1 - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.set_fill_style_str(color);
	ctx.begin_path();
	ctx.move_to(to.0, to.1);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_weight_label(ctx: &CanvasRenderingContext2d, label: &str, (x, y): (f64, f64)) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, LABEL_RADIUS, 0.0, 2.0 * PI);
	ctx.set_fill_style_str("white");
	ctx.fill();
	ctx.set_stroke_style_str(LABEL_ACCENT);
	ctx.set_line_width(1.5);
	ctx.stroke();

	ctx.set_fill_style_str(LABEL_ACCENT);
	ctx.set_font("bold 12px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(label, x, y);
}

fn node_color(role: NodeRole) -> &'static str {
	match role {
		NodeRole::Normal => NODE_NORMAL,
		NodeRole::Selected => NODE_SELECTED,
		NodeRole::Start => NODE_START,
		NodeRole::End => NODE_END,
	}
}

fn draw_nodes(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for node in &scene.nodes {
		let color = node_color(node.role);
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, NODE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(color);
		ctx.fill();

		ctx.set_fill_style_str("white");
		ctx.set_font("bold 14px sans-serif");
		let _ = ctx.fill_text(&node.label, node.x, node.y);

		let badge = match node.role {
			NodeRole::Start if scene.endpoint_pair => Some("\u{25B6} Source"),
			NodeRole::Start => Some("\u{25B6} Start"),
			NodeRole::End => Some("\u{23F9} Sink"),
			_ => None,
		};
		if let Some(badge) = badge {
			ctx.set_fill_style_str(color);
			ctx.set_font("bold 12px sans-serif");
			let _ = ctx.fill_text(badge, node.x, node.y - NODE_RADIUS - 10.0);
		}
	}
}
