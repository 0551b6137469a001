//! Tunable graph parameters.
//!
//! Every field has a default, so a page may embed a partial JSON object
//! (`<script id="graph-config">`) to override only what it needs.

use serde::Deserialize;

use super::theme::CategoryPalette;

/// Viewport width below which the touch interaction path is used.
pub const DEFAULT_BREAKPOINT: f64 = 1024.0;

/// Physics parameters forwarded to `force_graph`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			force_charge: 250.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		}
	}
}

/// Graph construction and interaction configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Viewport width below which touch interaction is used.
	pub breakpoint: f64,
	/// Opacity of nodes outside the active set.
	pub dim_opacity: f64,
	/// Size multiplier of the center node.
	pub center_size: f64,
	/// Size multiplier of related nodes.
	pub related_size: f64,
	/// Node and edge fills.
	pub palette: CategoryPalette,
	/// Physics parameters.
	pub simulation: SimulationConfig,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			breakpoint: DEFAULT_BREAKPOINT,
			dim_opacity: 0.3,
			center_size: 1.8,
			related_size: 1.0,
			palette: CategoryPalette::default(),
			simulation: SimulationConfig::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let config: GraphConfig =
			serde_json::from_str(r##"{ "dim_opacity": 0.5, "palette": { "center": "#000000" } }"##)
				.unwrap();
		assert_eq!(config.dim_opacity, 0.5);
		assert_eq!(config.palette.center, "#000000");
		assert_eq!(config.palette.investor, CategoryPalette::default().investor);
		assert_eq!(config.breakpoint, DEFAULT_BREAKPOINT);
		assert_eq!(config.simulation, SimulationConfig::default());
	}
}
