//! company-graph: company relationship graph for the company detail page.
//!
//! This crate builds a deduplicated, weighted relationship graph around a
//! center company and renders it as an interactive force-directed canvas with
//! hover/selection highlighting and IN/OUT/ALL path modes.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

pub mod components;

pub use components::company_graph::{
	Company, CompanyDetail, CompanyGraph, CompanyGraphCanvas, GraphConfig, build_graph,
};

/// Element id of the embedded company detail JSON.
pub const DATA_ELEMENT_ID: &str = "company-data";
/// Element id of the optional embedded [`GraphConfig`] JSON.
pub const CONFIG_ELEMENT_ID: &str = "graph-config";

/// Failure to read JSON embedded in the page.
#[derive(Debug, Error)]
pub enum LoadError {
	/// No `window` or `document` (not running in a browser).
	#[error("browser window or document unavailable")]
	NoDocument,
	/// The page has no element with this id.
	#[error("no element with id `{0}`")]
	MissingElement(&'static str),
	/// The element exists but is not a `<script>`.
	#[error("element `{0}` is not a <script>")]
	NotScript(&'static str),
	/// The script's text content could not be read.
	#[error("could not read text of `{0}`")]
	Unreadable(&'static str),
	/// The script text is not valid JSON for the expected type.
	#[error("invalid JSON in `{id}`: {source}")]
	Parse {
		/// Element id.
		id: &'static str,
		/// Underlying parse error.
		#[source]
		source: serde_json::Error,
	},
}

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("company-graph: logging initialized");
}

fn read_script_json<T: DeserializeOwned>(id: &'static str) -> Result<T, LoadError> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or(LoadError::NoDocument)?;
	let element = document
		.get_element_by_id(id)
		.ok_or(LoadError::MissingElement(id))?;
	let script: HtmlScriptElement = element.dyn_into().map_err(|_| LoadError::NotScript(id))?;
	let json_text = script.text().map_err(|_| LoadError::Unreadable(id))?;
	serde_json::from_str(&json_text).map_err(|source| LoadError::Parse { id, source })
}

/// Load company detail data from `<script id="company-data">`.
pub fn load_company_detail() -> Result<CompanyDetail, LoadError> {
	let detail: CompanyDetail = read_script_json(DATA_ELEMENT_ID)?;
	info!(
		"company-graph: loaded {} with {} related companies",
		detail.company.name,
		detail.related.len()
	);
	Ok(detail)
}

/// Load graph configuration from `<script id="graph-config">`, if present.
pub fn load_graph_config() -> Result<GraphConfig, LoadError> {
	match read_script_json(CONFIG_ELEMENT_ID) {
		Err(LoadError::MissingElement(_)) => Ok(GraphConfig::default()),
		other => other,
	}
}

/// Main application component.
/// Loads company data and configuration from the DOM and renders the graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let detail = load_company_detail().unwrap_or_else(|e| {
		warn!("company-graph: {}", e);
		CompanyDetail::default()
	});
	let config = load_graph_config().unwrap_or_else(|e| {
		warn!("company-graph: {}, using default config", e);
		GraphConfig::default()
	});
	let title = format!("{} 관계도", detail.company.name);
	let graph_signal = Signal::derive(move || detail.clone());

	view! {
		<Html attr:lang="ko" attr:dir="ltr" />
		<Title text=title />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<CompanyGraphCanvas data=graph_signal config=config fullscreen=true />
		</div>
	}
}
