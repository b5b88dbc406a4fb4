//! Visual theming for the topology view.
//!
//! Provides color math, the device-role color table, fallback palettes,
//! and named theme presets.

use std::collections::HashMap;

/// RGBA color representation.
#[derive(Clone, Copy, Debug)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha, 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque color from channels.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color from channels and alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with a different alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	/// Parses a CSS color string.
	/// Supports hex (`#RRGGBB`) and `rgb()`/`rgba()` functional notation;
	/// anything else falls back to mid gray.
	pub fn parse(color_str: &str) -> Self {
		if color_str.starts_with('#') && color_str.len() == 7 {
			let r = u8::from_str_radix(&color_str[1..3], 16).unwrap_or(128);
			let g = u8::from_str_radix(&color_str[3..5], 16).unwrap_or(128);
			let b = u8::from_str_radix(&color_str[5..7], 16).unwrap_or(128);
			Color::rgb(r, g, b)
		} else if color_str.starts_with("rgb") {
			let nums: Vec<&str> = color_str
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.collect();
			let r = nums
				.first()
				.and_then(|s| s.trim().parse().ok())
				.unwrap_or(128);
			let g = nums
				.get(1)
				.and_then(|s| s.trim().parse().ok())
				.unwrap_or(128);
			let b = nums
				.get(2)
				.and_then(|s| s.trim().parse().ok())
				.unwrap_or(128);
			let a = nums
				.get(3)
				.and_then(|s| s.trim().parse().ok())
				.unwrap_or(1.0);
			Color::rgba(r, g, b, a)
		} else {
			Color::rgb(128, 128, 128)
		}
	}

	/// CSS text for this color, hex when opaque.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Hex CSS text, alpha discarded.
	pub fn to_css_rgb(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

/// Default colors per device role, tuned for a dark background.
pub fn default_role_colors() -> HashMap<String, String> {
	[
		("client", "#5e81ac"),
		("client_mute", "#7d94ab"),
		("router", "#b48ead"),
		("router_client", "#a98bb0"),
		("repeater", "#d08770"),
		("gateway", "#a3be8c"),
		("tracker", "#ebcb8b"),
		("sensor", "#8fbcbb"),
	]
	.into_iter()
	.map(|(k, v)| (k.to_string(), v.to_string()))
	.collect()
}

/// Indexed fallback palette for nodes without a role or color override.
#[derive(Clone, Debug)]
pub struct NodePalette {
	/// Palette entries, cycled by node index.
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Muted, harmonious palette - slate blues and teals (default)
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),  // Steel blue
				Color::rgb(129, 161, 193), // Light steel
				Color::rgb(100, 148, 160), // Teal gray
				Color::rgb(136, 160, 175), // Cadet blue
				Color::rgb(108, 142, 173), // Air force blue
				Color::rgb(119, 158, 165), // Desaturated cyan
				Color::rgb(143, 163, 180), // Cool gray
				Color::rgb(122, 153, 168), // Dusty blue
			],
		}
	}

	/// Aurora palette - cool teals and purples
	pub fn aurora() -> Self {
		Self {
			colors: vec![
				Color::rgb(100, 145, 135), // Eucalyptus
				Color::rgb(115, 135, 155), // Slate
				Color::rgb(130, 120, 150), // Wisteria
				Color::rgb(105, 140, 145), // Teal
				Color::rgb(120, 130, 160), // Periwinkle
				Color::rgb(125, 145, 140), // Sage
				Color::rgb(110, 125, 155), // Storm
				Color::rgb(135, 140, 150), // Pewter
			],
		}
	}

	/// Palette entry for an index, cycling past the end.
	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Link visual style.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	/// Base link color
	pub color: Color,
	/// Alpha multiplier for one-way heard links.
	pub heard_alpha: f64,
	/// Alpha multiplier for routed links.
	pub routed_alpha: f64,
	/// Whether to use curved links
	pub curved: bool,
	/// Curve tension (0.0 = straight, 1.0 = very curved)
	pub curve_tension: f64,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	/// Border/stroke width (0 = no border)
	pub border_width: f64,
	/// Border color
	pub border_color: Color,
	/// Alpha multiplier for nodes that have gone quiet.
	pub stale_alpha: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Preset name.
	pub name: &'static str,
	/// Background styling.
	pub background: BackgroundStyle,
	/// Link styling.
	pub link: LinkStyle,
	/// Node styling.
	pub node: NodeStyle,
	/// Fallback node palette.
	pub palette: NodePalette,
}

impl Theme {
	/// Clean dark theme (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
				vignette: 0.15,
			},
			link: LinkStyle {
				color: Color::rgba(140, 160, 180, 0.5),
				heard_alpha: 0.8,
				routed_alpha: 0.45,
				curved: false,
				curve_tension: 0.0,
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 0.0,
				border_color: Color::rgba(255, 255, 255, 0.0),
				stale_alpha: 0.45,
			},
			palette: NodePalette::slate(),
		}
	}

	/// Elegant darker preset with a cooler palette
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: BackgroundStyle {
				color: Color::rgb(18, 20, 28),
				color_secondary: Color::rgb(25, 28, 38),
				use_gradient: true,
				vignette: 0.2,
			},
			link: LinkStyle {
				color: Color::rgba(100, 120, 150, 0.45),
				heard_alpha: 0.8,
				routed_alpha: 0.4,
				curved: false,
				curve_tension: 0.0,
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 0.0,
				border_color: Color::rgba(255, 255, 255, 0.0),
				stale_alpha: 0.4,
			},
			palette: NodePalette::aurora(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lighten_and_darken_stay_in_range() {
		let c = Color::rgb(94, 129, 172);
		let white = c.lighten(1.0);
		assert_eq!((white.r, white.g, white.b), (255, 255, 255));
		let black = c.darken(1.0);
		assert_eq!((black.r, black.g, black.b), (0, 0, 0));
		// Factors clamp instead of wrapping.
		assert_eq!(c.lighten(2.0).r, 255);
	}

	#[test]
	fn lerp_midpoint() {
		let mid = Color::rgb(0, 0, 0).lerp(Color::rgb(200, 100, 50), 0.5);
		assert_eq!((mid.r, mid.g, mid.b), (100, 50, 25));
	}

	#[test]
	fn css_roundtrip_hex() {
		let c = Color::parse("#5e81ac");
		assert_eq!((c.r, c.g, c.b), (0x5e, 0x81, 0xac));
		assert_eq!(c.to_css(), "#5e81ac");
	}

	#[test]
	fn parses_rgba_notation() {
		let c = Color::parse("rgba(140, 160, 180, 0.5)");
		assert_eq!((c.r, c.g, c.b), (140, 160, 180));
		assert!((c.a - 0.5).abs() < 1e-9);
		assert_eq!(c.to_css(), "rgba(140, 160, 180, 0.5)");
	}

	#[test]
	fn garbage_color_falls_back_to_gray() {
		let c = Color::parse("chartreuse");
		assert_eq!((c.r, c.g, c.b), (128, 128, 128));
	}

	#[test]
	fn palette_cycles() {
		let palette = NodePalette::slate();
		let n = palette.colors.len();
		assert_eq!(palette.get(0).to_css(), palette.get(n).to_css());
	}

	#[test]
	fn role_table_covers_common_roles() {
		let roles = default_role_colors();
		for role in ["client", "router", "repeater", "gateway"] {
			assert!(roles.contains_key(role), "missing {role}");
		}
	}
}
