//! Topology data structures for input to the mesh graph component.

use serde::Deserialize;

/// A device in the mesh.
#[derive(Clone, Debug, Deserialize)]
pub struct MeshNode {
	/// Unique node identifier (e.g. "!a4c8e0f1"). Used to reference nodes in links.
	pub id: String,
	/// Optional short name shown next to the node. Labeled nodes render larger.
	pub label: Option<String>,
	/// Optional device role (e.g. "client", "router", "repeater", "gateway").
	/// Colors the node via the role table when no explicit `color` is set.
	pub role: Option<String>,
	/// Optional CSS color override (e.g. "#ff0000" or "rgb(255, 0, 0)").
	pub color: Option<String>,
	/// Hop depth from the local node. 0 marks the local node itself.
	/// Nodes with unknown depth are placed on the outermost ring.
	pub hops: Option<u32>,
	/// Seconds since the node was last heard on the air.
	pub last_heard: Option<f64>,
}

/// The radio relationship a link represents.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
	/// Bidirectional radio neighbor.
	#[default]
	Direct,
	/// One-way reception: the target heard the source.
	Heard,
	/// Multi-hop relationship learned from routing.
	Routed,
}

/// A radio relationship between two nodes.
#[derive(Clone, Debug, Deserialize)]
pub struct MeshLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Relationship kind. A bare `{source, target}` link is a direct neighbor.
	#[serde(default)]
	pub kind: LinkKind,
	/// Hop depth of the relationship, used by the layout distance function.
	#[serde(default)]
	pub depth: u32,
	/// Signal-to-noise ratio in dB, when the receiver reported one.
	pub snr: Option<f64>,
}

/// Complete topology: devices and the radio relationships between them.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TopologyData {
	/// Devices in the mesh.
	#[serde(default)]
	pub nodes: Vec<MeshNode>,
	/// Radio relationships between devices.
	#[serde(default)]
	pub links: Vec<MeshLink>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_full_document() {
		let json = r#"{
			"nodes": [
				{"id": "!a4c8e0f1", "label": "BASE", "role": "router", "hops": 0},
				{"id": "!b2d91c22", "role": "client", "hops": 1, "last_heard": 42.0}
			],
			"links": [
				{"source": "!a4c8e0f1", "target": "!b2d91c22", "kind": "heard", "depth": 1, "snr": -7.25}
			]
		}"#;
		let data: TopologyData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].label.as_deref(), Some("BASE"));
		assert_eq!(data.nodes[1].hops, Some(1));
		assert_eq!(data.links[0].kind, LinkKind::Heard);
		assert_eq!(data.links[0].snr, Some(-7.25));
	}

	#[test]
	fn bare_link_defaults_to_direct() {
		let json = r#"{"source": "a", "target": "b"}"#;
		let link: MeshLink = serde_json::from_str(json).unwrap();
		assert_eq!(link.kind, LinkKind::Direct);
		assert_eq!(link.depth, 0);
		assert!(link.snr.is_none());
	}

	#[test]
	fn link_kinds_parse_snake_case() {
		for (text, kind) in [
			("\"direct\"", LinkKind::Direct),
			("\"heard\"", LinkKind::Heard),
			("\"routed\"", LinkKind::Routed),
		] {
			let parsed: LinkKind = serde_json::from_str(text).unwrap();
			assert_eq!(parsed, kind);
		}
	}

	#[test]
	fn empty_document_is_valid() {
		let data: TopologyData = serde_json::from_str("{}").unwrap();
		assert!(data.nodes.is_empty());
		assert!(data.links.is_empty());
	}
}
