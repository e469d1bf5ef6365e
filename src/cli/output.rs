use std::fmt::Write as FmtWrite;

use crate::models::{OutputFormat, SearchResults, WebContentRecord};
use crate::pipeline::HarvestReport;

pub trait Formatter {
    fn format_harvest_report(&self, report: &HarvestReport) -> String;
    fn format_search_results(&self, results: &SearchResults) -> String;
    fn format_record(&self, record: &WebContentRecord) -> String;
    fn format_status(&self, status: &StatusInfo) -> String;
    fn format_error(&self, error: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub document_store_connected: bool,
    pub vector_store_connected: bool,
    pub vector_store_points: u64,
    pub collection: String,
    pub embedding_url: String,
    pub generation_model: String,
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_harvest_report(&self, report: &HarvestReport) -> String {
        let mut output = String::new();
        writeln!(
            output,
            "Harvested {} for tenant {}",
            report.record.url, report.record.tenant_id
        )
        .unwrap();

        if report.degraded {
            writeln!(output, "Summarization unavailable; raw outline stored.").unwrap();
        }

        writeln!(output, "Headings ({}):", report.record.headings.len()).unwrap();
        for insight in &report.record.headings {
            if insight.description.is_empty() {
                writeln!(output, "  {}", insight.heading).unwrap();
            } else {
                writeln!(output, "  {}: {}", insight.heading, insight.description).unwrap();
            }
        }

        match &report.storage_error {
            None => writeln!(output, "Storage: ok").unwrap(),
            Some(error) => writeln!(output, "Storage: FAILED ({})", error).unwrap(),
        }

        output
    }

    fn format_search_results(&self, results: &SearchResults) -> String {
        if results.is_empty() {
            return format!("No results found for: {}\n", results.query);
        }

        let mut output = String::new();
        writeln!(output, "Search results for: \"{}\"", results.query).unwrap();
        writeln!(
            output,
            "Found {} results in {}ms\n",
            results.len(),
            results.duration_ms
        )
        .unwrap();

        for (i, hit) in results.hits.iter().enumerate() {
            writeln!(output, "{}. [Score: {:.3}] {}", i + 1, hit.score, hit.payload.heading)
                .unwrap();
            writeln!(output, "   URL: {}", hit.payload.url).unwrap();
            if !hit.payload.description.is_empty() {
                writeln!(output, "   {}", hit.payload.description).unwrap();
            }
            writeln!(output).unwrap();
        }

        output
    }

    fn format_record(&self, record: &WebContentRecord) -> String {
        let mut output = String::new();
        writeln!(output, "{} (tenant {})", record.url, record.tenant_id).unwrap();
        writeln!(
            output,
            "Fetched: {} (status {}, {})",
            record.fetch_metadata.fetched_at,
            record.fetch_metadata.status_code,
            record.fetch_metadata.content_type
        )
        .unwrap();
        writeln!(output, "Headings ({}):", record.headings.len()).unwrap();
        for insight in &record.headings {
            writeln!(output, "  {}: {}", insight.heading, insight.description).unwrap();
        }

        let preview: String = record.raw_text.chars().take(300).collect();
        writeln!(output, "Text ({} chars):", record.raw_text.chars().count()).unwrap();
        if record.raw_text.chars().count() > 300 {
            writeln!(output, "  {}...", preview).unwrap();
        } else {
            writeln!(output, "  {}", preview).unwrap();
        }

        output
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        let mut output = String::new();
        writeln!(output, "Status").unwrap();
        writeln!(output, "------").unwrap();

        let doc_status = if status.document_store_connected {
            "[CONNECTED]"
        } else {
            "[UNREACHABLE]"
        };
        writeln!(output, "Document store: {}", doc_status).unwrap();

        let vec_status = if status.vector_store_connected {
            "[CONNECTED]"
        } else {
            "[UNREACHABLE]"
        };
        writeln!(output, "Vector index:   {}", vec_status).unwrap();
        if status.vector_store_connected {
            writeln!(output, "  Collection:   {}", status.collection).unwrap();
            writeln!(output, "  Points:       {}", status.vector_store_points).unwrap();
        }

        writeln!(output, "Embedding:      {}", status.embedding_url).unwrap();
        writeln!(output, "Generation:     {}", status.generation_model).unwrap();

        output
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}\n", error)
    }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_harvest_report(&self, report: &HarvestReport) -> String {
        let value = serde_json::json!({
            "success": true,
            "tenant_id": report.record.tenant_id,
            "url": report.record.url,
            "headings": report.record.headings,
            "degraded": report.degraded,
            "storage_succeeded": report.storage_succeeded,
            "storage_error": report.storage_error,
        });
        format!("{}\n", serde_json::to_string_pretty(&value).unwrap())
    }

    fn format_search_results(&self, results: &SearchResults) -> String {
        format!("{}\n", serde_json::to_string_pretty(results).unwrap())
    }

    fn format_record(&self, record: &WebContentRecord) -> String {
        format!("{}\n", serde_json::to_string_pretty(record).unwrap())
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        let value = serde_json::json!({
            "document_store_connected": status.document_store_connected,
            "vector_store_connected": status.vector_store_connected,
            "vector_store_points": status.vector_store_points,
            "collection": status.collection,
            "embedding_url": status.embedding_url,
            "generation_model": status.generation_model,
        });
        format!("{}\n", serde_json::to_string_pretty(&value).unwrap())
    }

    fn format_error(&self, error: &str) -> String {
        let value = serde_json::json!({ "success": false, "error": error });
        format!("{}\n", serde_json::to_string_pretty(&value).unwrap())
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryPayload, SearchHit};

    fn results() -> SearchResults {
        SearchResults::new(
            "history".to_string(),
            vec![SearchHit {
                score: 0.91,
                payload: EntryPayload {
                    tenant_id: "t1".to_string(),
                    url: "https://example.com/ai".to_string(),
                    heading: "History".to_string(),
                    description: "How it began.".to_string(),
                },
            }],
            12,
        )
    }

    #[test]
    fn test_text_search_output() {
        let output = TextFormatter.format_search_results(&results());
        assert!(output.contains("History"));
        assert!(output.contains("0.910"));
    }

    #[test]
    fn test_json_search_output_parses() {
        let output = JsonFormatter.format_search_results(&results());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["hits"][0]["payload"]["heading"], "History");
    }

    #[test]
    fn test_empty_results_message() {
        let empty = SearchResults::new("nothing".to_string(), vec![], 3);
        let output = TextFormatter.format_search_results(&empty);
        assert!(output.contains("No results"));
    }
}
