use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum HxeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Source not found: {path}")]
    SourceNotFound { path: String },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl HxeError {
    pub fn render(message: impl Into<String>) -> Self {
        HxeError::Render(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            HxeError::Io(e) => ErrorPayload::new(
                ErrorCategory::Io,
                e.to_string(),
                "Check output paths/permissions.",
            ),
            HxeError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and retry.",
            ),
            HxeError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify URL format (e.g., https://example.com).",
            ),
            HxeError::SourceNotFound { path } => ErrorPayload::new(
                ErrorCategory::Source,
                format!("Source not found: {}", path),
                "Verify the file exists and is readable; use an absolute path if needed.",
            ),
            HxeError::Render(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("playwright npm package is missing") {
                    ErrorPayload::new(
                        ErrorCategory::Render,
                        msg.to_string(),
                        "Install Playwright (e.g., `npm install playwright` and `npx playwright install chromium`).",
                    )
                } else if lower.contains("chromium executable") {
                    ErrorPayload::new(
                        ErrorCategory::Render,
                        msg.to_string(),
                        "Run `npx playwright install chromium` (or `playwright install chromium`) to download the browser.",
                    )
                } else if lower.contains("not found on path") || lower.contains("node command") {
                    ErrorPayload::new(
                        ErrorCategory::Render,
                        msg.to_string(),
                        "Install Node.js and ensure the node binary is on PATH; rerun after installing Playwright if needed.",
                    )
                } else if lower.contains("timeout") || lower.contains("timed out") {
                    ErrorPayload::new(
                        ErrorCategory::Render,
                        msg.to_string(),
                        "Try increasing --nav-timeout/--network-idle-timeout/--process-timeout or ensure the page loads without blocking.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Render,
                        msg.to_string(),
                        "Re-run with --verbose for details, or use --no-playwright to fall back to the static renderer.",
                    )
                }
            }
            HxeError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Serialization,
                e.to_string(),
                "Check JSON inputs; run with --verbose for details.",
            ),
            HxeError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("injector") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Restore injector.js next to the hxe binary, or point at it with --injector or HXE_INJECTOR.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths and the config file; run with --verbose for details.",
                    )
                }
            }
            HxeError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, HxeError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Network,
    Source,
    Render,
    Serialization,
    Io,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_payload_includes_playwright_remediation() {
        let err = HxeError::Render(
            "Playwright npm package is missing; install with `npm install playwright`.".to_string(),
        );
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Render);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("npm install playwright"),
            "expected remediation to mention npm install playwright, got: {remediation}"
        );
    }

    #[test]
    fn render_payload_includes_timeout_hint() {
        let err = HxeError::Render("Playwright timed out after 45s".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.to_ascii_lowercase().contains("timeout"),
            "expected timeout remediation, got: {remediation}"
        );
    }

    #[test]
    fn render_payload_includes_node_install_hint() {
        let err = HxeError::Render(
            "Unable to spawn Playwright helper; 'node' was not found on PATH".to_string(),
        );
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.to_ascii_lowercase().contains("node"),
            "expected node install/path remediation, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_includes_injector_hint() {
        let err =
            HxeError::Config("JavaScript injector not found at /opt/hxe/injector.js".to_string());
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Config);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("injector.js"),
            "expected injector remediation, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_uses_default_remediation_for_other_messages() {
        let err = HxeError::Config("Some other config issue".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("Check flags/paths"),
            "expected default remediation for generic config errors"
        );
    }

    #[test]
    fn source_not_found_payload_mentions_path() {
        let err = HxeError::SourceNotFound {
            path: "missing.html".to_string(),
        };
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Source);
        assert!(payload.message.contains("missing.html"));
    }
}
