//! Company relationship graph.
//!
//! Turns a center company and its related companies into a deduplicated,
//! weighted node/edge graph and renders it as an interactive force-directed
//! canvas:
//! - [`builder`] builds the canonical graph from [`CompanyDetail`] data
//! - [`signal`] classifies tag lists into node categories and directions
//! - [`relations`] summarizes relation reasons for the detail overlay
//! - [`interaction`] tracks hover/selection/path mode and derives node styles
//! - [`CompanyGraphCanvas`] hosts the physics simulation and the overlays
//!
//! # Example
//!
//! ```ignore
//! use company_graph::{CompanyDetail, CompanyGraphCanvas};
//!
//! let detail: CompanyDetail = serde_json::from_str(json)?;
//! view! { <CompanyGraphCanvas data=Signal::derive(move || detail.clone()) /> }
//! ```

/// Graph construction.
pub mod builder;
mod component;
/// Tunable parameters.
pub mod config;
/// Hover, selection and path-mode state.
pub mod interaction;
/// Active-set path queries.
pub mod paths;
/// Relation reason summaries.
pub mod relations;
mod render;
/// Zoom-aware sizing and weight scales.
pub mod scale;
/// Category and direction signals from tags.
pub mod signal;
mod state;
/// Colors and canvas theme.
pub mod theme;
mod types;

pub use builder::{CompanyGraph, build_graph};
pub use component::CompanyGraphCanvas;
pub use config::GraphConfig;
pub use interaction::{DeviceClass, InteractionState};
pub use paths::PathSelectionType;
pub use relations::{RelationSummary, summarize};
pub use types::{Company, CompanyDetail, Direction, GraphEdge, GraphNode, RelationTag};
