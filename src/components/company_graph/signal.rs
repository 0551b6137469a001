//! Tag signal extraction: node category and direction counts from a tag list.

use super::types::{Direction, RelationTag};

/// Tag label that marks a related company as an investor.
pub const INVESTOR_LABEL: &str = "투자사";

/// Coloring category of a related node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeCategory {
	/// Some tag carries the investor label.
	Investor,
	/// Some tag references a news item.
	NewsLinked,
	/// Neither of the above.
	Other,
}

impl NodeCategory {
	/// Investor designation wins over a news link; everything else is `Other`.
	pub fn of(tags: &[RelationTag]) -> Self {
		if tags.iter().any(|tag| tag.label == INVESTOR_LABEL) {
			NodeCategory::Investor
		} else if tags.iter().any(|tag| tag.news_id.is_some()) {
			NodeCategory::NewsLinked
		} else {
			NodeCategory::Other
		}
	}
}

/// Number of `IN` and `OUT` tags in a tag list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionCounts {
	/// Tags with direction `IN`.
	pub inbound: usize,
	/// Tags with direction `OUT`.
	pub outbound: usize,
}

impl DirectionCounts {
	/// Counts directed tags; tags without a direction count toward neither side.
	pub fn of(tags: &[RelationTag]) -> Self {
		tags.iter()
			.fold(Self::default(), |mut counts, tag| {
				match tag.direction {
					Some(Direction::In) => counts.inbound += 1,
					Some(Direction::Out) => counts.outbound += 1,
					None => {}
				}
				counts
			})
	}

	/// `In` only when inbound strictly outnumbers outbound; ties go to `Out`.
	pub fn resolve(self) -> Direction {
		if self.inbound > self.outbound {
			Direction::In
		} else {
			Direction::Out
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tag(label: &str, direction: Option<Direction>, news_id: Option<i64>) -> RelationTag {
		RelationTag {
			label: label.into(),
			direction,
			news_id,
			..Default::default()
		}
	}

	#[test]
	fn investor_outranks_news_link_regardless_of_order() {
		let tags = [
			tag("partner", None, Some(7)),
			tag(INVESTOR_LABEL, None, None),
		];
		assert_eq!(NodeCategory::of(&tags), NodeCategory::Investor);
	}

	#[test]
	fn news_link_without_investor() {
		let tags = [tag("supplier", None, None), tag("partner", None, Some(7))];
		assert_eq!(NodeCategory::of(&tags), NodeCategory::NewsLinked);
	}

	#[test]
	fn empty_tags_are_other() {
		assert_eq!(NodeCategory::of(&[]), NodeCategory::Other);
	}

	#[test]
	fn counts_and_tie_break() {
		let tags = [
			tag("a", Some(Direction::In), None),
			tag("b", Some(Direction::Out), None),
			tag("c", None, None),
		];
		let counts = DirectionCounts::of(&tags);
		assert_eq!(
			counts,
			DirectionCounts {
				inbound: 1,
				outbound: 1
			}
		);
		assert_eq!(counts.resolve(), Direction::Out);
		assert_eq!(DirectionCounts::default().resolve(), Direction::Out);

		let inbound = [tag("a", Some(Direction::In), None)];
		assert_eq!(DirectionCounts::of(&inbound).resolve(), Direction::In);
	}
}
