//! Profile-backed renderer: a persistent browser context rooted at a named
//! on-disk profile directory, with enrichment-script injection over a CDP
//! session. Produces HTML only; no extraction mapping.

use std::path::{Path, PathBuf};

use super::playwright::{ensure_node_available, ensure_playwright_available, run_script, PROFILE_SCRIPT};
use super::{log_progress, BrowserOptions};
use crate::injector::Injector;
use crate::types::{PageContent, ProgressFn, RenderResult};
use crate::{HxeError, Result};

/// Resolves a named profile to its directory under the profile root, if it
/// exists on disk. Profiles are created and populated by the browser engine;
/// this crate only checks for their presence.
pub fn resolve_profile_dir(name: &str, root: &Path) -> Option<PathBuf> {
    let dir = root.join(name);
    dir.is_dir().then_some(dir)
}

pub struct ProfileRenderer {
    options: BrowserOptions,
    /// Resolved profile directory; `None` downgrades to an ephemeral launch.
    profile_dir: Option<PathBuf>,
    injector: Injector,
    progress: Option<ProgressFn>,
}

impl ProfileRenderer {
    pub fn new(
        options: BrowserOptions,
        profile_dir: Option<PathBuf>,
        injector: Injector,
        progress: Option<ProgressFn>,
    ) -> Self {
        Self {
            options,
            profile_dir,
            injector,
            progress,
        }
    }

    /// Whether renders will use a persistent profile context.
    pub fn uses_persistent_profile(&self) -> bool {
        self.profile_dir.is_some()
    }

    /// Renders the content and returns the serialized post-enrichment DOM.
    pub async fn render(&self, content: &PageContent) -> Result<RenderResult> {
        ensure_node_available(&self.options.node_command).await?;
        ensure_playwright_available(&self.options.node_command).await?;

        let (source, is_url) = match content {
            PageContent::Url(url) => (url.as_str(), true),
            PageContent::Html(html) => (html.as_str(), false),
        };

        match &self.profile_dir {
            Some(dir) => log_progress(
                &self.progress,
                &format!("Rendering with persistent profile at {}", dir.display()),
            ),
            None => log_progress(&self.progress, "Rendering with ephemeral browser context"),
        }

        let input = serde_json::json!({
            "source": source,
            "isUrl": is_url,
            "profileDir": self.profile_dir.as_ref().map(|dir| dir.to_string_lossy()),
            "navTimeoutMs": self.options.navigation_timeout.as_millis() as u64,
            "idleTimeoutMs": self.options.network_idle_timeout.as_millis() as u64,
            "headless": self.options.headless,
            "injector": self.injector.script(),
        });

        let payload = run_script(
            &self.options.node_command,
            PROFILE_SCRIPT,
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

        Ok(RenderResult::HtmlOnly(html))
    }
}
