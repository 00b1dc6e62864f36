//! HTML Extractor and Enhancer (HXE) Library
//!
//! A library for rendering an HTML document (literal markup, local file, or
//! URL), running an enrichment script inside the page, and serializing the
//! post-render DOM back out, optionally with a JSON summary of structural
//! statistics. Three interchangeable rendering strategies are supported:
//! a persistent-profile browser, a disposable browser, and a no-browser
//! static fallback.
//!
//! # Module Overview
//!
//! - [`source`] - Source classification (literal HTML / file / URL)
//! - [`fetcher`] - HTTP fallback fetch for URL sources on the no-browser path
//! - [`injector`] - Enrichment-script loading
//! - [`browser`] - Playwright-backed renderers (profile and ephemeral)
//! - [`fallback`] - Static no-browser renderer
//! - [`extractor`] - Orchestrator tying source, renderer, and outputs together
//! - [`config`] - Configuration file support
//! - [`types`] - Core data types and structures
//!
//! # Example
//!
//! ```no_run
//! use hxe_lib::{Extractor, ExtractorOptions};
//!
//! # async fn example() -> hxe_lib::Result<()> {
//! let extractor = Extractor::new(ExtractorOptions::default())?;
//! let report = extractor
//!     .extract_and_enhance(
//!         "https://example.com",
//!         std::path::Path::new("out/page.html"),
//!         Some(std::path::Path::new("out/page.json")),
//!     )
//!     .await?;
//! println!("rendered with {} strategy", report.renderer.as_str());
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fallback;
pub mod fetcher;
pub mod injector;
pub mod source;
pub mod types;

pub use browser::{
    resolve_profile_dir, BrowserOptions, EphemeralRenderer, ProfileRenderer,
    DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_NETWORK_IDLE_TIMEOUT, DEFAULT_PROCESS_TIMEOUT,
};
pub use config::{Config, Timeouts, PROFILE_ROOT_ENV};
pub use error::{ErrorCategory, ErrorPayload, HxeError, Result};
pub use extractor::{ExtractReport, Extractor, ExtractorOptions};
pub use fallback::StaticRenderer;
pub use injector::{Injector, INJECTOR_ENV};
pub use source::Source;
pub use types::{
    DataMap, ExtractionData, Metadata, PageContent, ProgressFn, RenderResult, RendererKind,
    Statistics, DATA_ELEMENT_ID,
};
