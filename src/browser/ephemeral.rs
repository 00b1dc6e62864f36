//! Ephemeral renderer: a disposable browser instance per invocation, with
//! enrichment-script evaluation through the page's standard entry point and
//! a second evaluation that pulls the deposited extraction data back out.

use serde_json::Value;

use super::playwright::{
    ensure_node_available, ensure_playwright_available, run_script, EPHEMERAL_SCRIPT,
};
use super::{log_progress, BrowserOptions};
use crate::injector::Injector;
use crate::types::{DataMap, PageContent, ProgressFn, RenderResult, DATA_ELEMENT_ID};
use crate::{HxeError, Result};

pub struct EphemeralRenderer {
    options: BrowserOptions,
    injector: Injector,
    progress: Option<ProgressFn>,
}

impl EphemeralRenderer {
    pub fn new(options: BrowserOptions, injector: Injector, progress: Option<ProgressFn>) -> Self {
        Self {
            options,
            injector,
            progress,
        }
    }

    /// Renders the content and returns the serialized post-enrichment DOM
    /// plus the extraction mapping the enrichment script deposited into the
    /// page. Malformed extraction data downgrades to a warning and an empty
    /// mapping; it never fails the render.
    pub async fn render(&self, content: &PageContent) -> Result<RenderResult> {
        ensure_node_available(&self.options.node_command).await?;
        ensure_playwright_available(&self.options.node_command).await?;

        let (source, is_url) = match content {
            PageContent::Url(url) => (url.as_str(), true),
            PageContent::Html(html) => (html.as_str(), false),
        };

        let input = serde_json::json!({
            "source": source,
            "isUrl": is_url,
            "navTimeoutMs": self.options.navigation_timeout.as_millis() as u64,
            "idleTimeoutMs": self.options.network_idle_timeout.as_millis() as u64,
            "headless": self.options.headless,
            "injector": self.injector.script(),
            "dataId": DATA_ELEMENT_ID,
        });

        let payload = run_script(
            &self.options.node_command,
            EPHEMERAL_SCRIPT,
            &input,
            self.options.process_timeout,
        )
        .await?;

        if payload.applied == Some(false) {
            log_progress(
                &self.progress,
                "Warning: enrichment script did not complete successfully",
            );
        }

        let html = payload.html.ok_or_else(|| {
            HxeError::render("Playwright returned ok status but no HTML".to_string())
        })?;

        let raw = payload.data.unwrap_or_else(|| "{}".to_string());
        let data = parse_extraction_data(&raw, &self.progress);

        Ok(RenderResult::HtmlWithData { html, data })
    }
}

/// Parses the extraction-data text pulled from the page. Anything that is
/// not a JSON object becomes an empty mapping with a warning.
pub(crate) fn parse_extraction_data(raw: &str, progress: &Option<ProgressFn>) -> DataMap {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            log_progress(
                progress,
                &format!(
                    "Warning: extraction data was {} rather than an object; using empty mapping",
                    json_kind(&other)
                ),
            );
            DataMap::new()
        }
        Err(e) => {
            log_progress(
                progress,
                &format!(
                    "Warning: extraction data was not valid JSON ({}); using empty mapping",
                    e
                ),
            );
            DataMap::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    fn test_injector() -> Injector {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "(() => true)()").unwrap();
        Injector::from_path(file.path()).expect("load injector")
    }

    fn capturing_progress() -> (ProgressFn, Arc<Mutex<Vec<String>>>) {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&messages);
        let cb: ProgressFn = Arc::new(move |msg: &str| {
            sink.lock().unwrap().push(msg.to_string());
        });
        (cb, messages)
    }

    #[test]
    fn parse_extraction_data_accepts_object() {
        let map = parse_extraction_data(r#"{"enhancementApplied":true}"#, &None);
        assert_eq!(map.get("enhancementApplied"), Some(&Value::Bool(true)));
    }

    #[test]
    fn parse_extraction_data_defaults_to_empty_for_malformed_json() {
        let (cb, messages) = capturing_progress();
        let map = parse_extraction_data("{not json", &Some(cb));
        assert!(map.is_empty());
        let logged = messages.lock().unwrap();
        assert!(
            logged.iter().any(|m| m.contains("not valid JSON")),
            "expected a warning, got: {logged:?}"
        );
    }

    #[test]
    fn parse_extraction_data_rejects_non_object_json() {
        let (cb, messages) = capturing_progress();
        let map = parse_extraction_data("[1,2,3]", &Some(cb));
        assert!(map.is_empty());
        assert!(!messages.lock().unwrap().is_empty());
    }

    #[test]
    fn parse_extraction_data_handles_empty_object() {
        let map = parse_extraction_data("{}", &None);
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn render_fails_fast_for_missing_node() {
        let options = BrowserOptions {
            node_command: "definitely-not-a-binary".to_string(),
            ..BrowserOptions::default()
        };
        let renderer = EphemeralRenderer::new(options, test_injector(), None);
        let result = renderer
            .render(&PageContent::Html("<p>x</p>".to_string()))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn render_accepts_documents_larger_than_argv_limits() {
        // /bin/true passes the availability checks and exits 0 without
        // reading stdin or producing output, so the only acceptable failure
        // is the missing stdout payload. A saved web page easily exceeds the
        // ~128 KiB per-argument cap, which must not be hit.
        let options = BrowserOptions {
            node_command: "/bin/true".to_string(),
            ..BrowserOptions::default()
        };
        let renderer = EphemeralRenderer::new(options, test_injector(), None);
        let html = format!("<html><body>{}</body></html>", "<p>x</p>".repeat(50_000));
        let result = renderer.render(&PageContent::Html(html)).await;
        match result {
            Err(HxeError::Render(_)) => {}
            other => panic!("expected render error for empty output, got {other:?}"),
        }
    }
}
