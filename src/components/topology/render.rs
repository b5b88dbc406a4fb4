//! Canvas rendering for the topology view.
//!
//! Handles all drawing operations: background, links, nodes, and labels.
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Links styled by kind, then nodes, dimmed before highlighted (world space)
//! 3. Vignette, then labels (screen space, so text stays crisp at any zoom)

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::layout::LinkRef;
use super::scale::{ScaleConfig, ScaledValues};
use super::state::{NodeInfo, TopologyState};
use super::theme::{Color, Theme};
use super::types::LinkKind;

/// Attempt to smooth values that would otherwise cause abrupt visual changes.
fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Line-width multiplier from a reported SNR.
///
/// Maps the usable LoRa range (about -20 dB to +10 dB) onto 1.0..=1.8 so
/// strong links read heavier. Links without SNR stay at 1.0.
fn snr_width_mult(snr: Option<f64>) -> f64 {
	match snr {
		Some(db) => 1.0 + 0.8 * ((db + 20.0) / 30.0).clamp(0.0, 1.0),
		None => 1.0,
	}
}

/// Renders the complete topology to the canvas.
pub fn render(
	state: &TopologyState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_links(state, ctx, config, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(state, ctx, theme);
	}

	draw_labels(state, ctx, &scale, theme);
}

fn draw_background(state: &TopologyState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	if theme.background.use_gradient {
		let gradient = ctx
			.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				(state.width.max(state.height)) * 0.8,
			)
			.unwrap();

		gradient
			.add_color_stop(0.0, &theme.background.color_secondary.to_css())
			.unwrap();
		gradient
			.add_color_stop(1.0, &theme.background.color.to_css())
			.unwrap();

		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&theme.background.color.to_css());
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_vignette(state: &TopologyState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let gradient = ctx
		.create_radial_gradient(
			state.width / 2.0,
			state.height / 2.0,
			state.width.min(state.height) * 0.3,
			state.width / 2.0,
			state.height / 2.0,
			state.width.max(state.height) * 0.7,
		)
		.unwrap();

	gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)").unwrap();
	gradient
		.add_color_stop(
			1.0,
			&format!("rgba(0, 0, 0, {})", theme.background.vignette),
		)
		.unwrap();

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_links(
	state: &TopologyState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let positions = state.node_positions();
	let dash_offset = scale.dash_offset(state.flow_time, config.link.flow_speed);

	for link in state.links() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&link.source), positions.get(&link.target))
		else {
			continue;
		};
		draw_link(state, ctx, scale, theme, link, x1, y1, x2, y2, dash_offset);
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

#[allow(clippy::too_many_arguments)]
fn draw_link(
	state: &TopologyState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	link: &LinkRef,
	x1: f64,
	y1: f64,
	x2: f64,
	y2: f64,
	dash_offset: f64,
) {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}

	let link_t = smooth_step(state.highlight.link_intensity(link.source, link.target));
	let max_t = smooth_step(state.highlight.max_intensity());

	let kind_alpha = match link.kind {
		LinkKind::Direct => 1.0,
		LinkKind::Heard => theme.link.heard_alpha,
		LinkKind::Routed => theme.link.routed_alpha,
	};
	let kind_width = match link.kind {
		LinkKind::Routed => 0.7,
		_ => snr_width_mult(link.snr),
	};

	let (link_alpha, base_arrow_alpha, base_width) = if link_t > 0.01 {
		(
			0.7 + 0.3 * link_t,
			0.9 + 0.1 * link_t,
			scale.link_line_width * (1.0 + 0.4 * link_t),
		)
	} else if max_t > 0.01 {
		(
			0.7 - 0.5 * max_t,
			0.9 - 0.6 * max_t,
			scale.link_line_width * (1.0 - 0.3 * max_t),
		)
	} else {
		(0.7, 0.9, scale.link_line_width)
	};

	// Compensate for dash pattern fading to solid
	let width = base_width * kind_width * (1.0 + 0.3 * (1.0 - scale.dash_alpha));
	let arrow_alpha = base_arrow_alpha * scale.arrow_alpha;

	let link_color = &theme.link.color;
	ctx.set_stroke_style_str(&format!(
		"rgba({}, {}, {}, {})",
		link_color.r,
		link_color.g,
		link_color.b,
		link_alpha * kind_alpha * link_color.a
	));
	ctx.set_line_width(width);

	set_kind_dash(ctx, scale, link.kind, dash_offset);

	let (ux, uy) = (dx / dist, dy / dist);
	// One-way links leave room for the arrowhead at the hearing end.
	let end_offset = if link.kind == LinkKind::Heard {
		scale.node_radius + scale.arrow_size
	} else {
		scale.node_radius
	};

	if theme.link.curved && dist > scale.node_radius * 4.0 {
		draw_curved_link(
			ctx,
			x1,
			y1,
			x2,
			y2,
			ux,
			uy,
			end_offset,
			theme.link.curve_tension,
		);
	} else {
		ctx.begin_path();
		ctx.move_to(x1 + ux * scale.node_radius, y1 + uy * scale.node_radius);
		ctx.line_to(x2 - ux * end_offset, y2 - uy * end_offset);
		ctx.stroke();
	}

	if link.kind == LinkKind::Heard && !scale.cull_arrows && arrow_alpha > 0.0 {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&format!(
			"rgba({}, {}, {}, {})",
			link_color.r,
			link_color.g,
			link_color.b,
			arrow_alpha * kind_alpha * link_color.a
		));

		let (tip_x, tip_y) = (x2 - ux * scale.node_radius, y2 - uy * scale.node_radius);
		let (back_x, back_y) = (tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);
		let (px, py) = (-uy * scale.arrow_size * 0.5, ux * scale.arrow_size * 0.5);

		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
}

/// Dash pattern per relationship kind: direct links are solid, heard links
/// carry the animated flow dash, routed links a sparse static dash. Both
/// patterns fade to solid when zoomed out.
fn set_kind_dash(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	kind: LinkKind,
	dash_offset: f64,
) {
	let pattern = match kind {
		LinkKind::Direct => None,
		LinkKind::Heard => Some(scale.heard_dash),
		LinkKind::Routed => Some(scale.routed_dash),
	};

	match pattern {
		Some((dash, gap)) if gap * scale.dash_alpha > 0.1 => {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap * scale.dash_alpha),
			));
			ctx.set_line_dash_offset(if kind == LinkKind::Heard {
				dash_offset
			} else {
				0.0
			});
		}
		_ => {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	}
}

#[allow(clippy::too_many_arguments)]
fn draw_curved_link(
	ctx: &CanvasRenderingContext2d,
	x1: f64,
	y1: f64,
	x2: f64,
	y2: f64,
	ux: f64,
	uy: f64,
	offset: f64,
	tension: f64,
) {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();

	let curve_offset = dist * tension * 0.3;
	let (px, py) = (-uy * curve_offset, ux * curve_offset);

	let (start_x, start_y) = (x1 + ux * offset, y1 + uy * offset);
	let (end_x, end_y) = (x2 - ux * offset, y2 - uy * offset);
	let (mid_x, mid_y) = ((x1 + x2) / 2.0 + px, (y1 + y2) / 2.0 + py);

	ctx.begin_path();
	ctx.move_to(start_x, start_y);
	let _ = ctx.quadratic_curve_to(mid_x, mid_y, end_x, end_y);
	ctx.stroke();
}

fn draw_nodes(
	state: &TopologyState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let max_t = smooth_step(state.highlight.max_intensity());
	let has_highlight = max_t > 0.01;

	// Pass 1: non-highlighted nodes
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let node_t = state.highlight.node_intensity(idx);
		if node_t > 0.001 {
			return;
		}
		let (alpha, radius_mult) = if has_highlight {
			(1.0 - 0.7 * max_t, 1.0 - 0.15 * max_t)
		} else {
			(1.0, 1.0)
		};
		draw_node(ctx, node, scale, theme, alpha, radius_mult);
	});

	// Pass 2: highlighted/transitioning nodes on top
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let node_t = state.highlight.node_intensity(idx);
		if node_t <= 0.001 {
			return;
		}

		let eased_t = smooth_step(node_t);
		let ring_t = smooth_step(state.highlight.focus_ring_intensity(idx));
		let (x, y) = (node.x() as f64, node.y() as f64);

		let dim_alpha = if has_highlight {
			1.0 - 0.7 * max_t
		} else {
			1.0
		};
		let dim_radius = if has_highlight {
			1.0 - 0.15 * max_t
		} else {
			1.0
		};

		let neighbor_radius = 1.0 + 0.25 * eased_t;
		let focused_radius = 1.0 + 0.4 * eased_t;
		let highlight_radius = neighbor_radius + (focused_radius - neighbor_radius) * ring_t;

		let alpha = dim_alpha + (1.0 - dim_alpha) * eased_t;
		let radius_mult = dim_radius + (highlight_radius - dim_radius) * eased_t;

		draw_node(ctx, node, scale, theme, alpha, radius_mult);

		if ring_t > 0.01 {
			let radius = scale.node_radius * radius_mult * node.data.user_data.size;
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + scale.ring_offset, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.8 * ring_t));
			ctx.set_line_width(scale.ring_width);
			ctx.stroke();

			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + scale.ring_offset * 2.5, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.3 * ring_t));
			ctx.set_line_width(scale.ring_width * 0.5);
			ctx.stroke();
		}
	});
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &force_graph::Node<NodeInfo>,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
	radius_mult: f64,
) {
	let (x, y) = (node.x() as f64, node.y() as f64);
	let info = &node.data.user_data;
	let radius = scale.node_radius * radius_mult * info.size;
	let alpha = if info.stale {
		alpha * theme.node.stale_alpha
	} else {
		alpha
	};

	ctx.set_global_alpha(alpha);

	if theme.node.use_gradient {
		let gradient = ctx
			.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
			.unwrap();

		let base_color = Color::parse(&info.color);
		let highlight = base_color.lighten(0.4);
		let shadow = base_color.darken(0.2);

		gradient.add_color_stop(0.0, &highlight.to_css()).unwrap();
		gradient.add_color_stop(0.7, &base_color.to_css()).unwrap();
		gradient.add_color_stop(1.0, &shadow.to_css()).unwrap();

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill();
	} else {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.color);
		ctx.fill();
	}

	if theme.node.border_width > 0.0 {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.node.border_color.to_css());
		ctx.set_line_width(theme.node.border_width / scale.k);
		ctx.stroke();
	}

	ctx.set_global_alpha(1.0);
}

/// Labels draw in screen space after the world transform is restored, so the
/// font size stays constant while positions follow the pan/zoom transform.
/// Highlighted nodes always show their label; everything else only once
/// zoomed in far enough.
fn draw_labels(
	state: &TopologyState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let max_t = smooth_step(state.highlight.max_intensity());
	let has_highlight = max_t > 0.01;

	ctx.set_font(&scale.label_font);
	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		let Some(label) = &info.label else {
			return;
		};

		let node_t = smooth_step(state.highlight.node_intensity(node.index()));
		if node_t <= 0.001 && !scale.show_all_labels {
			return;
		}

		let dim_alpha = if has_highlight { 1.0 - 0.7 * max_t } else { 1.0 };
		let mut alpha = dim_alpha + (1.0 - dim_alpha) * node_t;
		if info.stale {
			alpha *= theme.node.stale_alpha;
		}
		if alpha < 0.05 {
			return;
		}

		let (sx, sy) = state
			.transform
			.graph_to_screen(node.x() as f64, node.y() as f64);
		let offset = scale.node_radius * info.size * scale.k + 5.0;

		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", 0.9 * alpha));
		let _ = ctx.fill_text(label, sx + offset, sy + 3.0);
	});
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn smooth_step_endpoints_and_midpoint() {
		assert_eq!(smooth_step(0.0), 0.0);
		assert_eq!(smooth_step(1.0), 1.0);
		assert_eq!(smooth_step(0.5), 0.5);
		// Eases: below linear in the lower half.
		assert!(smooth_step(0.25) < 0.25);
	}

	#[test]
	fn snr_width_spans_expected_range() {
		assert_eq!(snr_width_mult(None), 1.0);
		assert_eq!(snr_width_mult(Some(-30.0)), 1.0);
		assert_eq!(snr_width_mult(Some(10.0)), 1.8);
		let mid = snr_width_mult(Some(-5.0));
		assert!(mid > 1.0 && mid < 1.8);
	}
}
