//! Zoom-dependent scaling and data scales for graph visuals.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: graph coordinates; scale with zoom.
//! - **Screen-space**: canvas pixels; constant regardless of zoom.
//!
//! [`ScaleBehavior`] maps a base size to world-space for a zoom level `k`.
//! [`WeightScale`] maps edge weights to stroke widths on a log scale.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for a base value at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Base sizes for nodes, edges, arrows and labels.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Base node radius in world units, before the per-node size multiplier.
	pub node_radius: f64,
	pub node_behavior: ScaleBehavior,
	/// Hit detection radius in world units.
	pub hit_radius: f64,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Zoom below which labels stop shrinking.
	pub label_min_k: f64,
	/// Edge stroke width range in screen pixels, indexed by weight.
	pub edge_width: (f64, f64),
	pub arrow_size: f64,
	pub arrow_behavior: ScaleBehavior,
	pub ring_width: f64,
	pub ring_offset: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_radius: 8.0,
			node_behavior: ScaleBehavior::Clamped {
				min_screen: 4.0,
				max_screen: f64::INFINITY,
			},
			hit_radius: 12.0,
			label_size: 11.0,
			label_min_k: 0.5,
			edge_width: (1.0, 4.0),
			arrow_size: 6.0,
			arrow_behavior: ScaleBehavior::Clamped {
				min_screen: 0.0,
				max_screen: 18.0,
			},
			ring_width: 1.5,
			ring_offset: 2.0,
		}
	}
}

/// Pre-computed world-space values for one frame's zoom level.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	pub node_radius: f64,
	pub hit_radius: f64,
	pub label_font: String,
	pub arrow_size: f64,
	pub ring_width: f64,
	pub ring_offset: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_font_size = config.label_size / k.max(config.label_min_k);
		Self {
			k,
			node_radius: config.node_behavior.apply(config.node_radius, k),
			hit_radius: config.node_behavior.apply(config.hit_radius, k),
			label_font: format!("{}px sans-serif", label_font_size),
			arrow_size: config.arrow_behavior.apply(config.arrow_size, k),
			ring_width: ScaleBehavior::Screen.apply(config.ring_width, k),
			ring_offset: ScaleBehavior::Screen.apply(config.ring_offset, k),
		}
	}

	/// Screen-pixel width converted to world-space at this zoom.
	pub fn screen_px(&self, px: f64) -> f64 {
		ScaleBehavior::Screen.apply(px, self.k)
	}
}

/// Domain used when the data cannot define a usable log domain.
pub const DEFAULT_WEIGHT_DOMAIN: (f64, f64) = (1.0, 10.0);

/// Logarithmic mapping from a positive domain onto an output range.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightScale {
	domain: (f64, f64),
	range: (f64, f64),
}

impl WeightScale {
	/// Builds a scale over `values`. Empty, single-valued or non-positive data
	/// falls back to [`DEFAULT_WEIGHT_DOMAIN`].
	pub fn new(values: impl IntoIterator<Item = f64>, range: (f64, f64)) -> Self {
		let (min, max) = values
			.into_iter()
			.filter(|v| v.is_finite())
			.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
				(lo.min(v), hi.max(v))
			});
		let domain = if min > 0.0 && max > min {
			(min, max)
		} else {
			DEFAULT_WEIGHT_DOMAIN
		};
		Self { domain, range }
	}

	pub fn domain(&self) -> (f64, f64) {
		self.domain
	}

	/// Maps a value, clamping it into the domain first.
	pub fn apply(&self, value: f64) -> f64 {
		let (lo, hi) = self.domain;
		let v = if value.is_finite() {
			value.clamp(lo, hi)
		} else {
			lo
		};
		let t = (v.ln() - lo.ln()) / (hi.ln() - lo.ln());
		self.range.0 + (self.range.1 - self.range.0) * t
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_behavior_respects_screen_bounds() {
		let behavior = ScaleBehavior::Clamped {
			min_screen: 4.0,
			max_screen: 10.0,
		};
		assert_eq!(behavior.apply(8.0, 1.0), 8.0);
		assert_eq!(behavior.apply(8.0, 0.25), 16.0);
		assert_eq!(behavior.apply(8.0, 4.0), 2.5);
	}

	#[test]
	fn weight_scale_maps_endpoints() {
		let scale = WeightScale::new([1.0, 2.0, 8.0], (1.0, 4.0));
		assert_eq!(scale.domain(), (1.0, 8.0));
		assert_eq!(scale.apply(1.0), 1.0);
		assert_eq!(scale.apply(8.0), 4.0);
		assert!(scale.apply(2.0) > 1.0 && scale.apply(2.0) < 4.0);
		assert_eq!(scale.apply(100.0), 4.0);
	}

	#[test]
	fn degenerate_domains_fall_back() {
		let empty = WeightScale::new(std::iter::empty(), (1.0, 4.0));
		assert_eq!(empty.domain(), DEFAULT_WEIGHT_DOMAIN);
		assert_eq!(empty.apply(1.0), 1.0);

		let single = WeightScale::new([3.0, 3.0], (1.0, 4.0));
		assert_eq!(single.domain(), DEFAULT_WEIGHT_DOMAIN);
		assert!(single.apply(3.0).is_finite());

		let non_positive = WeightScale::new([0.0, 5.0], (1.0, 4.0));
		assert_eq!(non_positive.domain(), DEFAULT_WEIGHT_DOMAIN);
		assert!(non_positive.apply(f64::NAN).is_finite());
	}
}
