//! Visual theming for the company graph.
//!
//! Category colors for nodes live in [`CategoryPalette`]; the canvas styling
//! (background, edges, labels) lives in [`Theme`].

use serde::Deserialize;

use super::signal::NodeCategory;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

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

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses a CSS color string. Supports `#RRGGBB` and `rgb()`/`rgba()`;
	/// anything else comes back as neutral gray.
	pub fn parse(color_str: &str) -> Self {
		if color_str.starts_with('#') && color_str.len() == 7 {
			let channel = |range: std::ops::Range<usize>| {
				color_str
					.get(range)
					.and_then(|hex| u8::from_str_radix(hex, 16).ok())
					.unwrap_or(128)
			};
			Color::rgb(channel(1..3), channel(3..5), channel(5..7))
		} else if color_str.starts_with("rgb") {
			let nums: Vec<&str> = color_str
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.collect();
			let channel = |i: usize| {
				nums.get(i)
					.and_then(|s| s.trim().parse().ok())
					.unwrap_or(128)
			};
			let a = nums
				.get(3)
				.and_then(|s| s.trim().parse().ok())
				.unwrap_or(1.0);
			Color::rgba(channel(0), channel(1), channel(2), a)
		} else {
			Color::rgb(128, 128, 128)
		}
	}
}

/// Fixed node fills per role/category, as CSS strings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CategoryPalette {
	pub center: String,
	pub investor: String,
	pub news_linked: String,
	pub other: String,
	pub edge: String,
}

impl CategoryPalette {
	pub fn fill(&self, category: NodeCategory) -> &str {
		match category {
			NodeCategory::Investor => &self.investor,
			NodeCategory::NewsLinked => &self.news_linked,
			NodeCategory::Other => &self.other,
		}
	}
}

impl Default for CategoryPalette {
	fn default() -> Self {
		Self {
			center: "#3b83f6".into(),
			investor: "#dc9192".into(),
			news_linked: "#efe298".into(),
			other: "#8468b3".into(),
			edge: "#dbdbdb".into(),
		}
	}
}

/// Canvas styling that is not tied to node categories.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: Color,
	pub background_secondary: Color,
	pub label: Color,
	pub edge_label: Color,
	/// Ring drawn around the center node.
	pub center_ring: Color,
	pub hover_ring: Color,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			background_secondary: Color::rgb(248, 250, 252),
			label: Color::rgb(30, 41, 59),
			edge_label: Color::rgb(100, 116, 139),
			center_ring: Color::rgba(59, 131, 246, 0.35),
			hover_ring: Color::rgba(15, 23, 42, 0.6),
		}
	}
}
