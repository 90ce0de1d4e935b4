use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::layout::{Layout, NODE_RADIUS, PositionedNode};

const BACKGROUND: &str = "#1a1a2e";
const EDGE_COLOR: &str = "rgba(100, 180, 255, 0.6)";
const EDGE_HIGHLIGHT: &str = "rgba(100, 180, 255, 0.95)";

pub fn render(
	layout: &Layout,
	hovered: Option<&str>,
	width: f64,
	height: f64,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
	if layout.nodes.is_empty() {
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
		ctx.set_font("14px sans-serif");
		let _ = ctx.fill_text("No nodes to show", width / 2.0 - 56.0, height / 2.0);
		return;
	}
	draw_links(layout, hovered, ctx);
	for node in &layout.nodes {
		draw_node(node, hovered == Some(node.node.key()), ctx);
	}
}

fn draw_links(layout: &Layout, hovered: Option<&str>, ctx: &CanvasRenderingContext2d) {
	let arrow_size = 8.0;
	for link in &layout.links {
		let (from, to) = (&layout.nodes[link.source], &layout.nodes[link.target]);
		let (dx, dy) = (to.x - from.x, to.y - from.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let touches_hover = hovered.is_some_and(|k| from.node.key() == k || to.node.key() == k);
		let color = if touches_hover { EDGE_HIGHLIGHT } else { EDGE_COLOR };

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(if touches_hover { 2.0 } else { 1.5 });
		if !touches_hover {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(6.0),
				&JsValue::from_f64(4.0),
			));
		}
		ctx.begin_path();
		ctx.move_to(from.x + ux * NODE_RADIUS, from.y + uy * NODE_RADIUS);
		ctx.line_to(
			to.x - ux * (NODE_RADIUS + arrow_size),
			to.y - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		ctx.set_fill_style_str(color);
		let (tip_x, tip_y) = (to.x - ux * NODE_RADIUS, to.y - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if touches_hover && !link.relationship.is_empty() {
			ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
			ctx.set_font("10px sans-serif");
			let _ = ctx.fill_text(
				&link.relationship,
				(from.x + to.x) / 2.0 + 4.0,
				(from.y + to.y) / 2.0 - 4.0,
			);
		}
	}
}

fn draw_node(p: &PositionedNode, is_hovered: bool, ctx: &CanvasRenderingContext2d) {
	let radius = if p.is_center {
		NODE_RADIUS * 1.4
	} else if is_hovered {
		NODE_RADIUS * 1.2
	} else {
		NODE_RADIUS
	};

	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&p.category.color);
	ctx.fill();

	if p.is_center || is_hovered {
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius + 3.0, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str("rgba(255, 255, 255, 0.7)");
		ctx.set_line_width(1.5);
		ctx.stroke();
	}

	ctx.set_fill_style_str("white");
	ctx.set_font("12px sans-serif");
	let _ = ctx.fill_text(&p.node.name, p.x + radius + 4.0, p.y + 4.0);
}
