//! Zoom-dependent scaling configuration for topology visuals.
//!
//! This module centralizes all zoom-dependent visual parameters, making it easy to
//! understand and tune how elements behave at different zoom levels.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: The coordinate system of the simulation. Values in
//!   world-space scale proportionally with zoom (appear larger when zoomed in).
//! - **Screen-space**: Pixel coordinates on the canvas. Values in screen-space
//!   remain constant regardless of zoom level.
//!
//! # Scaling Behaviors
//!
//! Elements can scale in different ways as zoom level (`k`) changes:
//!
//! - [`ScaleBehavior::World`]: Scales with zoom. Size in world units stays constant,
//!   so it appears larger when zoomed in, smaller when zoomed out.
//! - [`ScaleBehavior::Screen`]: Constant screen size. Divides by `k` to counteract
//!   the canvas transform, maintaining fixed pixel size.
//! - [`ScaleBehavior::Clamped`]: World-space scaling with min/max screen-size bounds.
//!   Useful for elements that should scale but not become too small or too large.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
#[allow(
	dead_code,
	reason = "World/Screen variants complete the API for users customizing ScaleConfig"
)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	/// `(min_screen_px, max_screen_px)` - use `f64::NEG_INFINITY` or `f64::INFINITY` for unbounded.
	Clamped {
		/// Lower screen-size bound in pixels.
		min_screen: f64,
		/// Upper screen-size bound in pixels.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// Compute the world-space value for a given base value and zoom level.
	///
	/// The returned value should be used directly in world-space drawing commands
	/// (after the canvas transform has been applied).
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				// screen_size = world_size * k, so the bounds divide by k.
				let min_world = min_screen / k;
				let max_world = max_screen / k;
				base.clamp(min_world, max_world)
			}
		}
	}
}

/// Defines how alpha/opacity scales with zoom level.
#[derive(Clone, Debug)]
#[allow(
	dead_code,
	reason = "Constant variant available for custom alpha behaviors"
)]
pub enum AlphaBehavior {
	/// Constant alpha regardless of zoom.
	Constant,
	/// Alpha scales linearly with zoom, clamped to [0, 1].
	/// At k=1, alpha = base. At k=0.5, alpha = base * 0.5.
	ScaleWithZoom,
	/// Alpha fades based on zoom thresholds.
	/// Fully visible at `full_alpha_k`, fades to zero at `zero_alpha_k`.
	Fade {
		/// Zoom level at or below which alpha is zero.
		zero_alpha_k: f64,
		/// Zoom level at or above which alpha is full.
		full_alpha_k: f64,
	},
}

impl AlphaBehavior {
	/// Compute alpha multiplier for a given zoom level.
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::Constant => 1.0,
			AlphaBehavior::ScaleWithZoom => k.clamp(0.0, 1.0),
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				let t = (k - zero_alpha_k) / (full_alpha_k - zero_alpha_k);
				t.clamp(0.0, 1.0)
			}
		}
	}
}

/// Configuration for node visual scaling.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Base node radius in world units.
	pub radius: f64,
	/// How the node radius scales with zoom.
	pub radius_behavior: ScaleBehavior,
	/// Hit detection radius in world units.
	pub hit_radius: f64,
	/// How hit radius scales with zoom.
	pub hit_behavior: ScaleBehavior,
	/// Label font size in screen pixels. Labels draw in screen space.
	pub label_size: f64,
	/// Zoom level at which every node shows its label, not just highlighted ones.
	pub label_show_k: f64,
}

/// Configuration for link visual scaling.
#[derive(Clone, Debug)]
pub struct LinkScaleConfig {
	/// Base line width in screen pixels.
	pub line_width: f64,
	/// Dash pattern (dash, gap) for one-way heard links, world units.
	pub heard_dash: (f64, f64),
	/// Dash pattern (dash, gap) for routed links, world units.
	pub routed_dash: (f64, f64),
	/// Flow animation speed for heard links (world units per second).
	pub flow_speed: f64,
	/// How dash pattern visibility scales with zoom.
	/// When faded out, links become solid lines.
	pub dash_alpha_behavior: AlphaBehavior,
}

/// Configuration for the arrowheads on one-way links.
#[derive(Clone, Debug)]
pub struct ArrowScaleConfig {
	/// Base arrow size in world units.
	pub size: f64,
	/// How arrow size scales with zoom.
	pub size_behavior: ScaleBehavior,
	/// How arrow alpha scales with zoom.
	pub alpha_behavior: AlphaBehavior,
	/// Minimum alpha to bother drawing.
	pub cull_alpha: f64,
}

/// Configuration for the selection ring around the focus node.
#[derive(Clone, Debug)]
pub struct RingScaleConfig {
	/// Stroke width in screen pixels.
	pub width: f64,
	/// Offset from the node edge in screen pixels.
	pub offset: f64,
}

/// Complete scale configuration for all topology elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Node scaling.
	pub node: NodeScaleConfig,
	/// Link scaling.
	pub link: LinkScaleConfig,
	/// Arrowhead scaling.
	pub arrow: ArrowScaleConfig,
	/// Selection ring scaling.
	pub ring: RingScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius: 5.0,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 5.0,
					max_screen: f64::INFINITY,
				},
				hit_radius: 12.0,
				hit_behavior: ScaleBehavior::Clamped {
					min_screen: 5.0,
					max_screen: f64::INFINITY,
				},
				label_size: 11.0,
				label_show_k: 1.6,
			},
			link: LinkScaleConfig {
				line_width: 1.5,
				heard_dash: (8.0, 4.0),
				routed_dash: (2.0, 5.0),
				flow_speed: 12.0,
				dash_alpha_behavior: AlphaBehavior::Fade {
					zero_alpha_k: 0.4,
					full_alpha_k: 0.9,
				},
			},
			arrow: ArrowScaleConfig {
				size: 5.0,
				size_behavior: ScaleBehavior::Clamped {
					min_screen: 0.0,
					max_screen: 18.0,
				},
				alpha_behavior: AlphaBehavior::ScaleWithZoom,
				cull_alpha: 0.05,
			},
			ring: RingScaleConfig {
				width: 1.5,
				offset: 2.0,
			},
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
/// All sizes are in world-space (ready to use after canvas transform)
/// unless noted otherwise.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	/// Node radius in world-space.
	pub node_radius: f64,
	/// Hit detection radius in world-space.
	pub hit_radius: f64,
	/// Label font string, screen pixels (labels draw after the transform is restored).
	pub label_font: String,
	/// Whether labels show on every node at this zoom, not just highlighted ones.
	pub show_all_labels: bool,
	/// Link line width in world-space.
	pub link_line_width: f64,
	/// Heard-link dash pattern in world units.
	pub heard_dash: (f64, f64),
	/// Routed-link dash pattern in world units.
	pub routed_dash: (f64, f64),
	/// Dash pattern visibility [0, 1]. At 0, links are solid lines.
	pub dash_alpha: f64,
	/// Arrow size in world-space.
	pub arrow_size: f64,
	/// Arrow alpha multiplier [0, 1].
	pub arrow_alpha: f64,
	/// Whether to skip drawing arrows (alpha below threshold).
	pub cull_arrows: bool,
	/// Selection ring width in world-space.
	pub ring_width: f64,
	/// Selection ring offset in world-space.
	pub ring_offset: f64,
}

impl ScaledValues {
	/// Compute scaled values from configuration and current zoom level.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let arrow_alpha = config.arrow.alpha_behavior.apply(k);
		let dash_alpha = config.link.dash_alpha_behavior.apply(k);

		Self {
			k,
			node_radius: config.node.radius_behavior.apply(config.node.radius, k),
			hit_radius: config.node.hit_behavior.apply(config.node.hit_radius, k),
			label_font: format!("{}px sans-serif", config.node.label_size),
			show_all_labels: k >= config.node.label_show_k,
			link_line_width: config.link.line_width / k,
			heard_dash: config.link.heard_dash,
			routed_dash: config.link.routed_dash,
			dash_alpha,
			arrow_size: config.arrow.size_behavior.apply(config.arrow.size, k),
			arrow_alpha,
			cull_arrows: arrow_alpha < config.arrow.cull_alpha,
			ring_width: config.ring.width / k,
			ring_offset: config.ring.offset / k,
		}
	}

	/// Compute dash offset for the heard-link flow animation.
	pub fn dash_offset(&self, flow_time: f64, flow_speed: f64) -> f64 {
		-flow_time * flow_speed
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn world_and_screen_behaviors() {
		assert_eq!(ScaleBehavior::World.apply(5.0, 2.0), 5.0);
		assert_eq!(ScaleBehavior::Screen.apply(5.0, 2.0), 2.5);
	}

	#[test]
	fn clamped_behavior_bounds_screen_size() {
		let behavior = ScaleBehavior::Clamped {
			min_screen: 5.0,
			max_screen: 20.0,
		};
		// At k=0.25, 5 world units would be 1.25 screen px; clamp lifts to 5 px = 20 world.
		assert_eq!(behavior.apply(5.0, 0.25), 20.0);
		// At k=10, 5 world units would be 50 px; clamp caps at 20 px = 2 world.
		assert_eq!(behavior.apply(5.0, 10.0), 2.0);
		// In range, untouched.
		assert_eq!(behavior.apply(5.0, 2.0), 5.0);
	}

	#[test]
	fn fade_alpha_interpolates() {
		let fade = AlphaBehavior::Fade {
			zero_alpha_k: 0.4,
			full_alpha_k: 0.9,
		};
		assert_eq!(fade.apply(0.2), 0.0);
		assert_eq!(fade.apply(0.9), 1.0);
		let mid = fade.apply(0.65);
		assert!((mid - 0.5).abs() < 1e-9);
	}

	#[test]
	fn degenerate_fade_is_fully_visible() {
		let fade = AlphaBehavior::Fade {
			zero_alpha_k: 0.5,
			full_alpha_k: 0.5,
		};
		assert_eq!(fade.apply(0.1), 1.0);
	}

	#[test]
	fn scaled_values_at_unit_zoom() {
		let config = ScaleConfig::default();
		let scale = ScaledValues::new(&config, 1.0);
		assert_eq!(scale.node_radius, 5.0);
		assert_eq!(scale.link_line_width, 1.5);
		assert!(!scale.show_all_labels);
		assert!(!scale.cull_arrows);
	}

	#[test]
	fn all_labels_show_when_zoomed_in() {
		let config = ScaleConfig::default();
		assert!(ScaledValues::new(&config, 2.0).show_all_labels);
		assert!(!ScaledValues::new(&config, 1.0).show_all_labels);
	}

	#[test]
	fn arrows_cull_when_zoomed_far_out() {
		let config = ScaleConfig::default();
		let scale = ScaledValues::new(&config, 0.01);
		assert!(scale.cull_arrows);
	}

	#[test]
	fn dash_offset_advances_with_flow_time() {
		let scale = ScaledValues::new(&ScaleConfig::default(), 1.0);
		let early = scale.dash_offset(1.0, 12.0);
		let late = scale.dash_offset(2.0, 12.0);
		assert!(late < early);
	}
}
