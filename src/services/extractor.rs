//! Structural outline extraction from raw HTML.

use ego_tree::NodeRef;
use scraper::{Html, node::Node};

use crate::models::{OutlineSection, PageOutline};

/// Tags whose content never reaches the extracted text.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Walks an HTML document and produces its heading outline.
///
/// Purely structural: headings h1-h6 are collected in document order, and
/// each heading's body is the concatenated text that follows it up to the
/// next heading of equal-or-higher level. Text under a nested lower-level
/// heading belongs to every enclosing open section; the nested heading's
/// own title does not. Whitespace collapses to single spaces. The same
/// bytes always produce the same outline.
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor;

impl OutlineExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, html: &str) -> PageOutline {
        let document = Html::parse_document(html);
        let mut builder = OutlineBuilder::default();
        walk(*document.root_element(), &mut builder);
        builder.finish()
    }
}

fn walk(node: NodeRef<'_, Node>, builder: &mut OutlineBuilder) {
    match node.value() {
        Node::Text(text) => builder.push_text(&text),
        Node::Element(element) => {
            let name = element.name();
            if SKIPPED_TAGS.contains(&name) {
                return;
            }
            if let Some(level) = heading_level(name) {
                let mut title = String::new();
                collect_text(node, &mut title);
                builder.start_heading(level, title);
                // Heading text is the title, not body content.
                return;
            }
            for child in node.children() {
                walk(child, builder);
            }
        }
        _ => {
            for child in node.children() {
                walk(child, builder);
            }
        }
    }
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => append_collapsed(out, &text),
        Node::Element(element) => {
            if SKIPPED_TAGS.contains(&element.name()) {
                return;
            }
            for child in node.children() {
                collect_text(child, out);
            }
        }
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Appends `text` word by word, collapsing runs of whitespace into single
/// spaces across fragment boundaries.
fn append_collapsed(buf: &mut String, text: &str) {
    for word in text.split_whitespace() {
        if !buf.is_empty() {
            buf.push(' ');
        }
        buf.push_str(word);
    }
}

#[derive(Default)]
struct OutlineBuilder {
    raw_text: String,
    sections: Vec<OutlineSection>,
    /// Indices of sections still accumulating body text, outermost first.
    open: Vec<usize>,
}

impl OutlineBuilder {
    fn start_heading(&mut self, level: u8, title: String) {
        let mut heading = String::new();
        append_collapsed(&mut heading, &title);
        // A heading that collapses to nothing is not a heading.
        if heading.is_empty() {
            return;
        }

        append_collapsed(&mut self.raw_text, &heading);

        while let Some(&idx) = self.open.last() {
            if self.sections[idx].level >= level {
                self.open.pop();
            } else {
                break;
            }
        }

        self.sections.push(OutlineSection {
            heading,
            body_text: String::new(),
            level,
        });
        self.open.push(self.sections.len() - 1);
    }

    fn push_text(&mut self, text: &str) {
        append_collapsed(&mut self.raw_text, text);
        for &idx in &self.open {
            append_collapsed(&mut self.sections[idx].body_text, text);
        }
    }

    fn finish(self) -> PageOutline {
        PageOutline {
            raw_text: self.raw_text,
            sections: self.sections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> PageOutline {
        OutlineExtractor::new().extract(html)
    }

    #[test]
    fn test_two_headings_with_bodies() {
        let outline = extract(
            r#"<html><body>
            <h2>History</h2><p>It began in 1956.</p>
            <h2>Applications</h2><p>Used everywhere.</p>
            </body></html>"#,
        );

        assert_eq!(outline.len(), 2);
        assert_eq!(outline.sections[0].heading, "History");
        assert_eq!(outline.sections[0].body_text, "It began in 1956.");
        assert_eq!(outline.sections[1].heading, "Applications");
        assert_eq!(outline.sections[1].body_text, "Used everywhere.");
        assert_eq!(
            outline.raw_text,
            "History It began in 1956. Applications Used everywhere."
        );
    }

    #[test]
    fn test_nested_heading_spans() {
        let outline = extract(
            r#"<body>
            <h2>Outer</h2><p>intro</p>
            <h3>Inner</h3><p>detail</p>
            <h2>Next</h2><p>after</p>
            </body>"#,
        );

        assert_eq!(outline.len(), 3);
        // Outer's span runs until the next h2, so it includes Inner's body
        // text but not Inner's title.
        assert_eq!(outline.sections[0].body_text, "intro detail");
        assert_eq!(outline.sections[1].heading, "Inner");
        assert_eq!(outline.sections[1].body_text, "detail");
        assert_eq!(outline.sections[2].body_text, "after");
    }

    #[test]
    fn test_zero_headings_yields_empty_outline() {
        let outline = extract("<body><p>Just a paragraph.</p><p>Another.</p></body>");
        assert!(outline.is_empty());
        assert_eq!(outline.raw_text, "Just a paragraph. Another.");
    }

    #[test]
    fn test_script_and_style_stripped() {
        let outline = extract(
            r#"<html><head><style>p { color: red; }</style></head><body>
            <h1>Title</h1>
            <script>var hidden = "secret";</script>
            <p>Visible text.</p>
            <noscript>enable js</noscript>
            </body></html>"#,
        );

        assert_eq!(outline.len(), 1);
        assert_eq!(outline.sections[0].body_text, "Visible text.");
        assert!(!outline.raw_text.contains("secret"));
        assert!(!outline.raw_text.contains("color"));
        assert!(!outline.raw_text.contains("enable js"));
    }

    #[test]
    fn test_heading_count_matches_document_order() {
        let html = r#"<body>
            <h1>A</h1><h2>B</h2><h4>C</h4><h3>D</h3><h6>E</h6>
        </body>"#;
        let outline = extract(html);
        let headings: Vec<&str> = outline.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_duplicate_headings_kept_distinct_by_position() {
        let outline = extract(
            "<body><h2>Notes</h2><p>one</p><h2>Notes</h2><p>two</p></body>",
        );
        assert_eq!(outline.len(), 2);
        assert_eq!(outline.sections[0].body_text, "one");
        assert_eq!(outline.sections[1].body_text, "two");
    }

    #[test]
    fn test_empty_heading_skipped() {
        let outline = extract("<body><h2>   </h2><p>orphan text</p><h2>Real</h2></body>");
        assert_eq!(outline.len(), 1);
        assert_eq!(outline.sections[0].heading, "Real");
        assert!(outline.raw_text.contains("orphan text"));
    }

    #[test]
    fn test_whitespace_collapsed_inside_headings() {
        let outline = extract("<body><h1>  Deep   <em>Learning</em>\n Applications </h1></body>");
        assert_eq!(outline.sections[0].heading, "Deep Learning Applications");
    }

    #[test]
    fn test_heading_with_no_following_content() {
        let outline = extract("<body><p>lead</p><h2>Trailing</h2></body>");
        assert_eq!(outline.len(), 1);
        assert_eq!(outline.sections[0].heading, "Trailing");
        assert_eq!(outline.sections[0].body_text, "");
    }

    #[test]
    fn test_deterministic() {
        let html = r#"<body><h1>One</h1><p>alpha</p><h2>Two</h2><p>beta</p></body>"#;
        assert_eq!(extract(html), extract(html));
    }
}
