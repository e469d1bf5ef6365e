//! Structural page outline and model-generated heading insights.

use serde::{Deserialize, Serialize};

/// One heading and the text associated with it, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineSection {
    /// Heading text, whitespace-collapsed, never empty.
    pub heading: String,

    /// Concatenated text under the heading, up to the next heading of
    /// equal-or-higher level.
    pub body_text: String,

    /// Heading level 1-6.
    pub level: u8,
}

/// The structural decomposition of one page: full text plus the ordered
/// heading sections. Produced by the extractor without any semantic
/// interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOutline {
    /// All visible text of the page, whitespace-collapsed.
    pub raw_text: String,

    /// Sections in document order. Duplicate heading names are permitted
    /// here and kept distinct by position.
    pub sections: Vec<OutlineSection>,
}

impl PageOutline {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// The leading sections fed to the summarizer, capped at `max`.
    pub fn capped_sections(&self, max: usize) -> &[OutlineSection] {
        &self.sections[..self.sections.len().min(max)]
    }
}

/// A model-generated description for one heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingInsight {
    pub heading: String,
    pub description: String,
}

/// Ordered heading→description pairs for one page.
///
/// Stored as an explicit list rather than a map so document order survives
/// serialization. Duplicate heading names collapse to the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeadingInsights(Vec<HeadingInsight>);

impl HeadingInsights {
    /// Build insights for the given sections, all with empty descriptions.
    /// Used when summarization is skipped or fails.
    pub fn empty_for(sections: &[OutlineSection]) -> Self {
        Self::from_pairs(
            sections
                .iter()
                .map(|s| (s.heading.clone(), String::new())),
        )
    }

    /// Build from (heading, description) pairs, keeping the first entry
    /// for any repeated heading name.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut insights: Vec<HeadingInsight> = Vec::new();
        for (heading, description) in pairs {
            if insights.iter().any(|i| i.heading == heading) {
                continue;
            }
            insights.push(HeadingInsight {
                heading,
                description,
            });
        }
        Self(insights)
    }

    pub fn get(&self, heading: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|i| i.heading == heading)
            .map(|i| i.description.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeadingInsight> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when no heading carries a non-empty description.
    pub fn all_empty(&self) -> bool {
        self.0.iter().all(|i| i.description.is_empty())
    }
}

impl<'a> IntoIterator for &'a HeadingInsights {
    type Item = &'a HeadingInsight;
    type IntoIter = std::slice::Iter<'a, HeadingInsight>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(heading: &str, body: &str) -> OutlineSection {
        OutlineSection {
            heading: heading.to_string(),
            body_text: body.to_string(),
            level: 2,
        }
    }

    #[test]
    fn test_duplicate_headings_keep_first() {
        let insights = HeadingInsights::from_pairs([
            ("Overview".to_string(), "first".to_string()),
            ("Details".to_string(), "middle".to_string()),
            ("Overview".to_string(), "second".to_string()),
        ]);

        assert_eq!(insights.len(), 2);
        assert_eq!(insights.get("Overview"), Some("first"));
        assert_eq!(insights.get("Details"), Some("middle"));
    }

    #[test]
    fn test_empty_for_preserves_order() {
        let sections = vec![section("History", "a"), section("Applications", "b")];
        let insights = HeadingInsights::empty_for(&sections);

        let headings: Vec<&str> = insights.iter().map(|i| i.heading.as_str()).collect();
        assert_eq!(headings, vec!["History", "Applications"]);
        assert!(insights.all_empty());
    }

    #[test]
    fn test_capped_sections() {
        let outline = PageOutline {
            raw_text: String::new(),
            sections: vec![section("a", ""), section("b", ""), section("c", "")],
        };
        assert_eq!(outline.capped_sections(2).len(), 2);
        assert_eq!(outline.capped_sections(10).len(), 3);
    }

    #[test]
    fn test_insights_serde_roundtrip() {
        let insights = HeadingInsights::from_pairs([(
            "History".to_string(),
            "How it began.".to_string(),
        )]);
        let json = serde_json::to_string(&insights).unwrap();
        assert_eq!(json, r#"[{"heading":"History","description":"How it began."}]"#);
        let parsed: HeadingInsights = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, insights);
    }
}
