//! Search-related models for queries and results.

use serde::{Deserialize, Serialize};

use super::record::EntryPayload;

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// Machine-parseable JSON format
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// A single ranked match from the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Cosine similarity score.
    pub score: f32,

    /// The payload stored with the matching entry.
    pub payload: EntryPayload,
}

/// Collection of search hits for one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// Query that was executed
    pub query: String,

    /// Matching hits, descending by score
    pub hits: Vec<SearchHit>,

    /// Query execution time in milliseconds
    pub duration_ms: u64,
}

impl SearchResults {
    pub fn new(query: String, hits: Vec<SearchHit>, duration_ms: u64) -> Self {
        Self {
            query,
            hits,
            duration_ms,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_search_results() {
        let results = SearchResults::new("test".to_string(), vec![], 50);
        assert!(results.is_empty());
        assert_eq!(results.duration_ms, 50);
    }

    #[test]
    fn test_search_hit_serde() {
        let hit = SearchHit {
            score: 0.91,
            payload: EntryPayload {
                tenant_id: "t1".to_string(),
                url: "https://example.com/ai".to_string(),
                heading: "History".to_string(),
                description: "How the field began.".to_string(),
            },
        };
        let json = serde_json::to_string(&hit).unwrap();
        let parsed: SearchHit = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, hit);
    }
}
