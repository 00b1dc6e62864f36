//! Static fallback renderer.
//!
//! No browser involved: the markup is parsed with a tolerant DOM parser,
//! structural statistics are computed by direct tree queries, and a
//! synthetic `<script type="application/json">` element carrying the
//! statistics is embedded in the body. The parser always yields a tree, so
//! this renderer cannot fail on malformed input.

use scraper::{ElementRef, Html};

use crate::types::{
    ExtractionData, Metadata, PageContent, RenderResult, Statistics, DATA_ELEMENT_ID,
};
use crate::{HxeError, Result};

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

#[derive(Debug, Clone, Default)]
pub struct StaticRenderer;

impl StaticRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Renders normalized content. URL inputs are rejected here; the
    /// orchestrator fetches URL bodies before selecting this renderer.
    pub fn render(&self, content: &PageContent) -> Result<RenderResult> {
        match content {
            PageContent::Html(html) => Ok(self.render_html(html)),
            PageContent::Url(url) => Err(HxeError::render(format!(
                "Static renderer cannot navigate to {}; fetch the URL first",
                url
            ))),
        }
    }

    /// Parses the markup, computes extraction data, and returns the
    /// serialized tree with the data script element embedded. Any data
    /// element left over from a previous pass is replaced, not duplicated.
    pub fn render_html(&self, html: &str) -> RenderResult {
        let mut document = Html::parse_document(html);
        let data = collect_extraction_data(&document);

        remove_existing_data_element(&mut document);

        let serialized = document.html();
        let enhanced = embed_data_script(&serialized, &data);

        RenderResult::HtmlWithData {
            html: enhanced,
            data: data.into_map(),
        }
    }
}

fn collect_extraction_data(document: &Html) -> ExtractionData {
    let mut title = String::new();
    let mut stats = Statistics::default();

    for node in document.tree.nodes() {
        let Some(element) = node.value().as_element() else {
            continue;
        };
        let name = element.name();

        if HEADING_TAGS.contains(&name) {
            stats.headings += 1;
        }
        match name {
            "a" => stats.links += 1,
            "img" => stats.images += 1,
            "table" => stats.tables += 1,
            "p" => stats.paragraphs += 1,
            "title" if title.is_empty() => {
                if let Some(el) = ElementRef::wrap(node) {
                    title = el.text().collect();
                }
            }
            _ => {}
        }
    }

    ExtractionData {
        metadata: Metadata { title },
        statistics: stats,
        // No script engine runs on this path.
        enhancement_applied: false,
    }
}

/// Detaches a previously injected data element so reprocessing an enhanced
/// document swaps the payload instead of stacking copies.
fn remove_existing_data_element(document: &mut Html) {
    let stale: Vec<_> = document
        .tree
        .nodes()
        .filter(|node| {
            node.value()
                .as_element()
                .map(|el| el.name() == "script" && el.attr("id") == Some(DATA_ELEMENT_ID))
                .unwrap_or(false)
        })
        .map(|node| node.id())
        .collect();

    for id in stale {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Appends the data script element inside `<body>`. `parse_document`
/// guarantees a body element exists even for fragment-like input; if the
/// serialized form still lacks a closing tag the element is appended at the
/// end of the document.
fn embed_data_script(serialized: &str, data: &ExtractionData) -> String {
    let json = serde_json::to_string(data)
        .unwrap_or_else(|_| "{}".to_string())
        // Keep the payload inert inside a script element.
        .replace("</", "<\\/");
    let script = format!(
        "<script type=\"application/json\" id=\"{}\">{}</script>",
        DATA_ELEMENT_ID, json
    );

    match serialized.rfind("</body>") {
        Some(idx) => {
            let mut out = String::with_capacity(serialized.len() + script.len());
            out.push_str(&serialized[..idx]);
            out.push_str(&script);
            out.push_str(&serialized[idx..]);
            out
        }
        None => {
            let mut out = serialized.to_string();
            out.push_str(&script);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataMap;
    use serde_json::Value;

    fn render(html: &str) -> (String, DataMap) {
        let result = StaticRenderer::new().render_html(html);
        let (html, data) = result.into_parts();
        (html, data.expect("static renderer always produces data"))
    }

    #[test]
    fn counts_structural_elements() {
        let html = "<html><head><title>Stats</title></head><body>\
             <h1>a</h1><h2>b</h2><h6>c</h6>\
             <a href=\"#\">x</a><a href=\"#\">y</a>\
             <img src=\"i.png\"><table></table>\
             <p>1</p><p>2</p><p>3</p></body></html>";
        let (_, data) = render(html);
        let stats = &data["statistics"];
        assert_eq!(stats["headings"], Value::from(3));
        assert_eq!(stats["links"], Value::from(2));
        assert_eq!(stats["images"], Value::from(1));
        assert_eq!(stats["tables"], Value::from(1));
        assert_eq!(stats["paragraphs"], Value::from(3));
        assert_eq!(data["metadata"]["title"], Value::from("Stats"));
        assert_eq!(data["enhancementApplied"], Value::Bool(false));
    }

    #[test]
    fn missing_title_is_empty_string() {
        let (_, data) = render("<html><body><p>x</p></body></html>");
        assert_eq!(data["metadata"]["title"], Value::from(""));
    }

    #[test]
    fn embeds_data_script_in_body() {
        let (html, _) = render("<html><body><p>x</p></body></html>");
        let marker = format!("id=\"{}\"", DATA_ELEMENT_ID);
        assert!(html.contains(&marker), "expected data element in: {html}");
        let idx = html.find(&marker).unwrap();
        let body_close = html.rfind("</body>").unwrap();
        assert!(idx < body_close, "data element should sit inside body");
    }

    #[test]
    fn synthesizes_body_for_bare_fragment() {
        let (html, data) = render("<p>only a paragraph</p>");
        assert!(html.contains("<body>"));
        assert!(html.contains(DATA_ELEMENT_ID));
        assert_eq!(data["statistics"]["paragraphs"], Value::from(1));
    }

    #[test]
    fn malformed_markup_never_fails() {
        let (html, data) = render("<h1>unclosed <p>broken <a href='>>><table><td>");
        assert!(html.contains(DATA_ELEMENT_ID));
        assert!(data["statistics"]["headings"].as_u64().unwrap() >= 1);
    }

    #[test]
    fn heading_count_sums_all_levels() {
        let html = "<h1></h1><h2></h2><h3></h3><h4></h4><h5></h5><h6></h6>";
        let (_, data) = render(html);
        assert_eq!(data["statistics"]["headings"], Value::from(6));
    }

    #[test]
    fn reprocessing_replaces_data_element() {
        let (first, _) = render("<html><body><p>x</p></body></html>");
        let (second, data) = render(&first);
        let marker = format!("id=\"{}\"", DATA_ELEMENT_ID);
        assert_eq!(
            second.matches(&marker).count(),
            1,
            "reprocessing must leave exactly one data element"
        );
        // The stale payload is dropped before counting, so statistics are
        // unchanged across passes.
        assert_eq!(data["statistics"]["paragraphs"], Value::from(1));
    }

    #[test]
    fn data_payload_escapes_closing_tags() {
        let data = ExtractionData {
            metadata: Metadata {
                title: "a</script>b".to_string(),
            },
            ..ExtractionData::default()
        };
        let out = embed_data_script("<html><body></body></html>", &data);
        assert!(
            out.contains("a<\\/script>b"),
            "closing tag in payload must be escaped: {out}"
        );
    }

    #[test]
    fn url_content_is_rejected() {
        let renderer = StaticRenderer::new();
        let result = renderer.render(&PageContent::Url("https://example.com".to_string()));
        assert!(matches!(result, Err(HxeError::Render(_))));
    }
}
