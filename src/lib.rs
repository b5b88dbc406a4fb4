//! mesh-graph: Interactive force-directed visualization of mesh network topology.
//!
//! This crate provides a WASM-based visualization component that renders a
//! mesh network (nodes = radio devices, links = radio relationships) with
//! physics-based layout, pan/zoom, and hover/selection highlighting.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::topology::{LinkKind, MeshLink, MeshNode, TopologyCanvas, TopologyData};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("mesh-graph: logging initialized");
}

/// Load topology data from a script element with id="topology-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_topology() -> Option<TopologyData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("topology-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<TopologyData>(&json_text) {
		Ok(data) => {
			info!(
				"mesh-graph: loaded {} nodes, {} links",
				data.nodes.len(),
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("mesh-graph: failed to parse topology data: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads topology data from the DOM and renders the mesh visualization.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	// Load topology data from the DOM
	let topology = load_topology().unwrap_or_default();
	let topology_signal = Signal::derive(move || topology.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Mesh Topology" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<TopologyCanvas data=topology_signal fullscreen=true />
			<div class="graph-overlay">
				<h1>"Mesh Topology"</h1>
				<p class="subtitle">
					"Hover a node to preview its radio neighborhood. Click to pin. Scroll to zoom. Drag background to pan."
				</p>
				<ul class="legend">
					<li>"solid - direct neighbor"</li>
					<li>"dashed - heard one-way"</li>
					<li>"faint - routed"</li>
				</ul>
			</div>
		</div>
	}
}
