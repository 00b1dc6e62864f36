//! Extractor orchestrator.
//!
//! Classifies the source, normalizes it into renderable content, dispatches
//! to exactly one renderer per configuration, and writes the enhanced HTML
//! (and optionally the extraction data) to disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;

use crate::browser::{
    log_progress, resolve_profile_dir, BrowserOptions, EphemeralRenderer, ProfileRenderer,
    DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_NETWORK_IDLE_TIMEOUT, DEFAULT_PROCESS_TIMEOUT,
};
use crate::fallback::StaticRenderer;
use crate::fetcher;
use crate::injector::Injector;
use crate::source::Source;
use crate::types::{DataMap, PageContent, ProgressFn, RenderResult, RendererKind};
use crate::{Config, HxeError, Result};

/// Options resolved once at startup from CLI flags and the config file.
#[derive(Clone)]
pub struct ExtractorOptions {
    /// When false, skip browser automation entirely and use the static
    /// fallback renderer (fetching URL sources over plain HTTP first).
    pub use_browser: bool,
    pub headless: bool,
    /// Named persistent profile; selects the profile-backed renderer.
    pub profile: Option<String>,
    pub profile_root: PathBuf,
    pub node_command: String,
    pub navigation_timeout: Duration,
    pub network_idle_timeout: Duration,
    pub process_timeout: Duration,
    /// Explicit enrichment-script path; defaults to the standard lookup.
    pub injector_path: Option<PathBuf>,
    pub progress: Option<ProgressFn>,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            use_browser: true,
            headless: true,
            profile: None,
            profile_root: Config::default().resolved_profile_root(),
            node_command: "node".to_string(),
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            network_idle_timeout: DEFAULT_NETWORK_IDLE_TIMEOUT,
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
            injector_path: None,
            progress: None,
        }
    }
}

/// Outcome of one extraction, including which strategy actually ran.
#[derive(Debug, Clone)]
pub struct ExtractReport {
    pub html_path: PathBuf,
    pub data_path: Option<PathBuf>,
    /// Extraction mapping; empty when the active renderer produced none.
    pub data: DataMap,
    pub renderer: RendererKind,
    /// True when a named profile was requested but its directory was missing,
    /// so the render ran in an ephemeral context instead.
    pub profile_fallback: bool,
}

pub struct Extractor {
    options: ExtractorOptions,
    injector: Injector,
    client: Client,
}

impl Extractor {
    /// Builds an extractor, loading the enrichment script eagerly. A missing
    /// script is a configuration error raised here, before any render.
    pub fn new(options: ExtractorOptions) -> Result<Self> {
        let injector = match &options.injector_path {
            Some(path) => Injector::from_path(path)?,
            None => Injector::load_default()?,
        };
        let client = fetcher::build_client()?;
        Ok(Self {
            options,
            injector,
            client,
        })
    }

    pub fn injector(&self) -> &Injector {
        &self.injector
    }

    /// Extracts and enhances HTML from `source`, writing the enhanced
    /// document to `output_html` and, when given, the extraction data as
    /// pretty-printed JSON to `output_data`. Renderer failures are reported
    /// through the progress callback and propagated unchanged.
    pub async fn extract_and_enhance(
        &self,
        source: &str,
        output_html: &Path,
        output_data: Option<&Path>,
    ) -> Result<ExtractReport> {
        let classified = Source::classify(source);
        log_progress(
            &self.options.progress,
            &format!("Source classified as {}", classified.kind_name()),
        );

        let content = match &classified {
            Source::Html(html) => PageContent::Html(html.clone()),
            Source::File(path) => {
                log_progress(
                    &self.options.progress,
                    &format!("Reading HTML from file: {}", path.display()),
                );
                let html = fs::read_to_string(path).map_err(|_| HxeError::SourceNotFound {
                    path: path.display().to_string(),
                })?;
                PageContent::Html(html)
            }
            Source::Url(url) => {
                if self.options.use_browser {
                    // The browser navigates itself; no pre-fetch.
                    PageContent::Url(url.clone())
                } else {
                    log_progress(
                        &self.options.progress,
                        &format!("Fetching HTML from URL: {}", url),
                    );
                    PageContent::Html(fetcher::fetch(&self.client, url).await?)
                }
            }
        };

        let (renderer, profile_fallback, result) = match self.render(&content).await {
            Ok(rendered) => rendered,
            Err(err) => {
                log_progress(
                    &self.options.progress,
                    &format!("Error processing HTML: {}", err),
                );
                return Err(err);
            }
        };

        let (html, data) = result.into_parts();
        let data = data.unwrap_or_default();

        log_progress(
            &self.options.progress,
            &format!("Saving HTML to: {}", output_html.display()),
        );
        write_text(output_html, &html)?;

        if let Some(path) = output_data {
            log_progress(
                &self.options.progress,
                &format!("Saving extraction data to: {}", path.display()),
            );
            write_json_pretty(path, &data)?;
        }

        Ok(ExtractReport {
            html_path: output_html.to_path_buf(),
            data_path: output_data.map(Path::to_path_buf),
            data,
            renderer,
            profile_fallback,
        })
    }

    /// Dispatches to exactly one renderer per the active configuration.
    async fn render(&self, content: &PageContent) -> Result<(RendererKind, bool, RenderResult)> {
        if !self.options.use_browser {
            let result = StaticRenderer::new().render(content)?;
            return Ok((RendererKind::Static, false, result));
        }

        let browser_options = BrowserOptions {
            node_command: self.options.node_command.clone(),
            headless: self.options.headless,
            navigation_timeout: self.options.navigation_timeout,
            network_idle_timeout: self.options.network_idle_timeout,
            process_timeout: self.options.process_timeout,
        };

        if let Some(name) = &self.options.profile {
            let profile_dir = resolve_profile_dir(name, &self.options.profile_root);
            let fallback = profile_dir.is_none();
            if fallback {
                log_progress(
                    &self.options.progress,
                    &format!(
                        "Warning: profile '{}' not found under {}; using an ephemeral browser context",
                        name,
                        self.options.profile_root.display()
                    ),
                );
            }
            let renderer = ProfileRenderer::new(
                browser_options,
                profile_dir,
                self.injector.clone(),
                self.options.progress.clone(),
            );
            let result = renderer.render(content).await?;
            Ok((RendererKind::Profile, fallback, result))
        } else {
            let renderer = EphemeralRenderer::new(
                browser_options,
                self.injector.clone(),
                self.options.progress.clone(),
            );
            let result = renderer.render(content).await?;
            Ok((RendererKind::Ephemeral, false, result))
        }
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, contents)?;
    Ok(())
}

fn write_json_pretty(path: &Path, data: &DataMap) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut json = serde_json::to_string_pretty(data)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}
