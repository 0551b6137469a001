//! Company data as delivered by the upstream API, and the graph shapes built from it.

use serde::{Deserialize, Deserializer, Serialize};

/// Direction a relationship flows relative to the center company.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
	/// Relation points at the center company.
	In,
	/// Relation points away from the center company.
	Out,
}

impl Direction {
	/// Parses the wire form (`"IN"` / `"OUT"`). Anything else is treated as no direction.
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"IN" => Some(Direction::In),
			"OUT" => Some(Direction::Out),
			_ => None,
		}
	}
}

/// One signal linking the center company to a related company.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationTag {
	#[serde(default)]
	pub id: Option<i64>,
	/// Category text, e.g. `"투자사"` for investors.
	#[serde(default, deserialize_with = "null_as_default")]
	pub label: String,
	#[serde(default, deserialize_with = "lenient_direction")]
	pub direction: Option<Direction>,
	#[serde(default)]
	pub rel_reason: Option<String>,
	#[serde(default)]
	pub news_id: Option<i64>,
	#[serde(default)]
	pub disclosure_url: Option<String>,
}

/// A company as it appears in a relationship context.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
	#[serde(default)]
	pub company_id: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub name: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub is_listed: bool,
	#[serde(default, deserialize_with = "null_as_default")]
	pub is_domestic: bool,
	#[serde(default)]
	pub sentiment: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub tags: Vec<RelationTag>,
	#[serde(default)]
	pub price: Option<f64>,
	#[serde(default)]
	pub diff_price: Option<f64>,
	#[serde(default)]
	pub diff_rate: Option<f64>,
}

impl Company {
	/// Node identity: the company id when one exists, otherwise the display name.
	pub fn identity(&self) -> &str {
		match self.company_id.as_deref() {
			Some(id) if !id.is_empty() => id,
			_ => &self.name,
		}
	}
}

/// The center company of a detail page together with its related companies.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetail {
	#[serde(flatten)]
	pub company: Company,
	#[serde(default, deserialize_with = "null_as_default")]
	pub related: Vec<Company>,
}

/// A rendering-ready node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphNode {
	/// Company identity.
	pub id: String,
	/// Display name.
	pub label: String,
	/// Resolved CSS color.
	pub fill: String,
	/// Size multiplier; the center node is larger than related nodes.
	pub size: f64,
	/// 1.0 unless the node is dimmed by the current interaction state.
	pub opacity: f64,
	/// Originating company. Only used to re-derive colors and reasons.
	#[serde(skip)]
	pub data: Option<Company>,
}

/// An aggregated relationship between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphEdge {
	/// `"{source}-{target}"`. Display only; aggregation keys on the id pair.
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Number of related entries merged into this edge.
	pub weight: u32,
	/// `IN` tags summed over merged entries.
	pub in_count: usize,
	/// `OUT` tags summed over merged entries.
	pub out_count: usize,
	/// Empty for weight 1, otherwise the weight.
	pub label: String,
	/// Resolved CSS stroke color.
	pub fill: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_direction<'de, D>(deserializer: D) -> Result<Option<Direction>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<String>::deserialize(deserializer)?;
	Ok(raw.as_deref().and_then(Direction::parse))
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn identity_falls_back_to_name() {
		let named = Company {
			name: "Beta".into(),
			..Default::default()
		};
		assert_eq!(named.identity(), "Beta");

		let empty_id = Company {
			company_id: Some(String::new()),
			name: "Beta".into(),
			..Default::default()
		};
		assert_eq!(empty_id.identity(), "Beta");

		let with_id = Company {
			company_id: Some("005930".into()),
			name: "Beta".into(),
			..Default::default()
		};
		assert_eq!(with_id.identity(), "005930");
	}

	#[test]
	fn deserializes_api_shape() {
		let json = r#"{
			"companyId": "A",
			"name": "Alpha",
			"isListed": true,
			"isDomestic": true,
			"related": [
				{
					"name": "Beta",
					"isListed": false,
					"isDomestic": true,
					"tags": [
						{ "id": 1, "direction": "IN", "label": "투자사", "relReason": "invested", "newsId": 42 }
					]
				}
			]
		}"#;
		let detail: CompanyDetail = serde_json::from_str(json).unwrap();
		assert_eq!(detail.company.identity(), "A");
		assert_eq!(detail.related.len(), 1);
		let tag = &detail.related[0].tags[0];
		assert_eq!(tag.direction, Some(Direction::In));
		assert_eq!(tag.rel_reason.as_deref(), Some("invested"));
		assert_eq!(tag.news_id, Some(42));
		assert_eq!(tag.disclosure_url, None);
	}

	#[test]
	fn malformed_fields_normalize() {
		let json = r#"{
			"name": null,
			"related": [
				{ "name": "Beta", "tags": null },
				{ "name": "Gamma", "tags": [ { "direction": "SIDEWAYS", "label": null } ] }
			]
		}"#;
		let detail: CompanyDetail = serde_json::from_str(json).unwrap();
		assert_eq!(detail.company.name, "");
		assert!(detail.related[0].tags.is_empty());
		assert_eq!(detail.related[1].tags[0].direction, None);
		assert_eq!(detail.related[1].tags[0].label, "");
	}

	#[test]
	fn missing_related_is_empty() {
		let detail: CompanyDetail = serde_json::from_str(r#"{ "name": "Alpha" }"#).unwrap();
		assert!(detail.related.is_empty());
	}
}
