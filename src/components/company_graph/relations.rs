//! Human-readable relation reasons for the detail popover and bottom sheet.

use indexmap::IndexSet;

use super::types::{Direction, RelationTag};

/// One reason line, optionally linking to a news article or a disclosure.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReasonRecord {
	/// Human-readable relation reason.
	pub reason: String,
	/// Backing news item, if any.
	pub news_id: Option<i64>,
	/// Backing regulatory disclosure, if any.
	pub disclosure_url: Option<String>,
}

impl ReasonRecord {
	/// In-app link target, if the reason is backed by a news article.
	pub fn news_href(&self) -> Option<String> {
		self.news_id.map(|id| format!("/news/{}", id))
	}
}

/// Reasons for one related company, split by direction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelationSummary {
	/// Related company name.
	pub name: String,
	/// Reasons on inbound tags.
	pub in_reasons: Vec<ReasonRecord>,
	/// Reasons on outbound tags.
	pub out_reasons: Vec<ReasonRecord>,
}

impl RelationSummary {
	/// True when neither direction has a reason.
	pub fn is_empty(&self) -> bool {
		self.in_reasons.is_empty() && self.out_reasons.is_empty()
	}
}

/// Collects distinct reasons per direction, keeping first-occurrence order.
///
/// Two tags count as the same reason only when text, news id and disclosure
/// url all match. Tags without a reason or without a direction are skipped.
pub fn summarize(name: &str, tags: &[RelationTag]) -> RelationSummary {
	let mut inbound: IndexSet<ReasonRecord> = IndexSet::new();
	let mut outbound: IndexSet<ReasonRecord> = IndexSet::new();

	for tag in tags {
		let (Some(reason), Some(direction)) = (&tag.rel_reason, tag.direction) else {
			continue;
		};
		let record = ReasonRecord {
			reason: reason.clone(),
			news_id: tag.news_id,
			disclosure_url: tag.disclosure_url.clone(),
		};
		match direction {
			Direction::In => inbound.insert(record),
			Direction::Out => outbound.insert(record),
		};
	}

	RelationSummary {
		name: name.to_string(),
		in_reasons: inbound.into_iter().collect(),
		out_reasons: outbound.into_iter().collect(),
	}
}
