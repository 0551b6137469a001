//! Canvas rendering for the company graph.
//!
//! Passes, back to front:
//! 1. Background (screen space)
//! 2. Edges with arrowheads and weight labels (world space)
//! 3. Dimmed nodes, then full-opacity nodes on top, each with its label

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{GraphViewState, NodeInfo};
use super::theme::{Color, Theme};

/// Opacity at or above which a node is drawn in the foreground pass.
const FOREGROUND_ALPHA: f64 = 0.99;

/// Renders the complete graph to the canvas.
pub fn render(
	state: &GraphViewState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();
}

fn draw_background(state: &GraphViewState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let gradient = ctx
		.create_radial_gradient(
			state.width / 2.0,
			state.height / 2.0,
			0.0,
			state.width / 2.0,
			state.height / 2.0,
			state.width.max(state.height) * 0.8,
		)
		.ok();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background_secondary.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn node_radius(scale: &ScaledValues, node: &force_graph::Node<NodeInfo>) -> f64 {
	scale.node_radius * node.data.user_data.size
}

fn draw_edges(
	state: &GraphViewState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	state.graph.visit_edges(|n1, n2, _| {
		let Some(info) = state.edge_info(n1.index(), n2.index()) else {
			return;
		};
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let (r1, r2) = (node_radius(scale, n1), node_radius(scale, n2));

		// An edge is only as visible as its faintest endpoint.
		let alpha = [n1.index(), n2.index()]
			.iter()
			.filter_map(|idx| state.appearance(*idx))
			.map(|a| a.shown)
			.fold(1.0_f64, f64::min);

		ctx.set_stroke_style_str(&info.color.with_alpha(alpha).to_css());
		ctx.set_line_width(scale.screen_px(info.width));
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(
			x2 - ux * (r2 + scale.arrow_size),
			y2 - uy * (r2 + scale.arrow_size),
		);
		ctx.stroke();

		draw_arrow(ctx, scale, info.color.with_alpha(alpha), x2, y2, ux, uy, r2);

		if !info.label.is_empty() {
			ctx.set_fill_style_str(&theme.edge_label.with_alpha(alpha).to_css());
			ctx.set_font(&scale.label_font);
			ctx.set_text_align("center");
			let _ = ctx.fill_text(&info.label, (x1 + x2) / 2.0, (y1 + y2) / 2.0 - 2.0);
			ctx.set_text_align("start");
		}
	});
}

#[allow(clippy::too_many_arguments)]
fn draw_arrow(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	color: Color,
	x2: f64,
	y2: f64,
	ux: f64,
	uy: f64,
	target_radius: f64,
) {
	ctx.set_fill_style_str(&color.to_css());

	let (tip_x, tip_y) = (x2 - ux * target_radius, y2 - uy * target_radius);
	let (back_x, back_y) = (tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);
	let (px, py) = (-uy * scale.arrow_size * 0.5, ux * scale.arrow_size * 0.5);

	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_nodes(
	state: &GraphViewState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	// Pass 1: dimmed or fading nodes
	state.graph.visit_nodes(|node| {
		if let Some(appearance) = state.appearance(node.index()) {
			if appearance.shown < FOREGROUND_ALPHA {
				draw_node(state, ctx, node, scale, theme, appearance.fill, appearance.shown);
			}
		}
	});

	// Pass 2: active nodes on top
	state.graph.visit_nodes(|node| {
		if let Some(appearance) = state.appearance(node.index()) {
			if appearance.shown >= FOREGROUND_ALPHA {
				draw_node(state, ctx, node, scale, theme, appearance.fill, 1.0);
			}
		}
	});
}

fn draw_node(
	state: &GraphViewState,
	ctx: &CanvasRenderingContext2d,
	node: &force_graph::Node<NodeInfo>,
	scale: &ScaledValues,
	theme: &Theme,
	fill: Color,
	alpha: f64,
) {
	let (x, y) = (node.x() as f64, node.y() as f64);
	let info = &node.data.user_data;
	let radius = node_radius(scale, node);

	ctx.set_global_alpha(alpha);

	match ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius) {
		Ok(gradient) => {
			let _ = gradient.add_color_stop(0.0, &fill.lighten(0.3).to_css());
			let _ = gradient.add_color_stop(0.7, &fill.to_css());
			let _ = gradient.add_color_stop(1.0, &fill.darken(0.15).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str(&fill.to_css()),
	}
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.fill();

	if info.is_center {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + scale.ring_offset * 2.0, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.center_ring.to_css());
		ctx.set_line_width(scale.ring_width * 2.0);
		ctx.stroke();
	} else if state.is_hovered(&info.id) {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + scale.ring_offset, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.hover_ring.to_css());
		ctx.set_line_width(scale.ring_width);
		ctx.stroke();
	}

	ctx.set_fill_style_str(&theme.label.to_css());
	ctx.set_font(&scale.label_font);
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&info.label, x, y + radius + scale.screen_px(12.0));
	ctx.set_text_align("start");

	ctx.set_global_alpha(1.0);
}
