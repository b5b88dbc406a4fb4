//! Interactive mesh network topology visualization.
//!
//! Renders the mesh as a force-directed graph on an HTML canvas with:
//! - Physics-based node positioning, shaped by a per-link distance function
//!   (relationship kind and hop depth set each link's rest length)
//! - Pan, zoom, and node dragging interactions
//! - Hover previews and click-pinned selection that dim unrelated
//!   nodes and links, with smooth intensity transitions
//! - Link styling by radio relationship: solid direct neighbors, animated
//!   dashes for one-way receptions, faint dashes for routed paths
//!
//! # Example
//!
//! ```ignore
//! use mesh_graph::{TopologyCanvas, TopologyData, MeshNode, MeshLink};
//!
//! let data = TopologyData {
//!     nodes: vec![
//!         MeshNode { id: "!a4c8".into(), label: Some("BASE".into()), hops: Some(0), .. },
//!         MeshNode { id: "!b2d9".into(), label: None, hops: Some(1), .. },
//!     ],
//!     links: vec![
//!         MeshLink { source: "!a4c8".into(), target: "!b2d9".into(), .. },
//!     ],
//! };
//!
//! view! { <TopologyCanvas data=data.into() fullscreen=true /> }
//! ```

mod component;
pub mod layout;
mod render;
pub mod scale;
mod state;
pub mod theme;
mod types;

pub use component::TopologyCanvas;
pub use theme::Theme;
pub use types::{LinkKind, MeshLink, MeshNode, TopologyData};
