use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Element id of the `<script type="application/json">` node that carries
/// extraction data inside enhanced documents.
pub const DATA_ELEMENT_ID: &str = "html-extractor-data";

/// Callback used to surface progress messages and warnings to the caller.
/// The CLI wires this to stderr in verbose mode.
pub type ProgressFn = std::sync::Arc<dyn Fn(&str) + Send + Sync>;

/// JSON object mapping produced alongside rendering.
pub type DataMap = Map<String, Value>;

/// Which rendering strategy ran. Exactly one executes per invocation and it
/// fully determines whether extraction data is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    Profile,
    Ephemeral,
    Static,
}

impl RendererKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RendererKind::Profile => "profile",
            RendererKind::Ephemeral => "ephemeral",
            RendererKind::Static => "static",
        }
    }
}

/// Normalized input handed to a renderer after the orchestrator has read
/// file sources and (on the no-browser path) fetched URL sources.
#[derive(Debug, Clone)]
pub enum PageContent {
    /// Navigate to this URL inside the browser.
    Url(String),
    /// Set this markup as the page content directly.
    Html(String),
}

/// Result of one render. The profile-backed renderer produces HTML only;
/// the ephemeral and static renderers also produce an extraction mapping.
#[derive(Debug, Clone)]
pub enum RenderResult {
    HtmlOnly(String),
    HtmlWithData { html: String, data: DataMap },
}

impl RenderResult {
    pub fn html(&self) -> &str {
        match self {
            RenderResult::HtmlOnly(html) => html,
            RenderResult::HtmlWithData { html, .. } => html,
        }
    }

    pub fn data(&self) -> Option<&DataMap> {
        match self {
            RenderResult::HtmlOnly(_) => None,
            RenderResult::HtmlWithData { data, .. } => Some(data),
        }
    }

    pub fn into_parts(self) -> (String, Option<DataMap>) {
        match self {
            RenderResult::HtmlOnly(html) => (html, None),
            RenderResult::HtmlWithData { html, data } => (html, Some(data)),
        }
    }
}

/// Structured summary computed alongside rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionData {
    pub metadata: Metadata,
    pub statistics: Statistics,
    pub enhancement_applied: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub headings: u64,
    pub links: u64,
    pub images: u64,
    pub tables: u64,
    pub paragraphs: u64,
}

impl ExtractionData {
    /// Converts into the generic mapping shape used by `RenderResult`.
    pub fn into_map(self) -> DataMap {
        match serde_json::to_value(&self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
