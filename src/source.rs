use std::path::{Path, PathBuf};

use url::Url;

/// A classified input source.
///
/// Classification happens exactly once per invocation and is total: any
/// string maps to one of the three variants. An existing file always wins
/// over URL syntax, so a path that also parses as a URL stays a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Literal HTML markup passed directly on the command line or API.
    Html(String),
    /// Path to an existing local file.
    File(PathBuf),
    /// Absolute URL with both a scheme and a host.
    Url(String),
}

impl Source {
    /// Classifies a raw source string. Never fails.
    pub fn classify(value: &str) -> Source {
        let path = Path::new(value);
        if path.is_file() {
            return Source::File(path.to_path_buf());
        }

        if is_url(value) {
            return Source::Url(value.to_string());
        }

        Source::Html(value.to_string())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Source::Html(_) => "html",
            Source::File(_) => "file",
            Source::Url(_) => "url",
        }
    }
}

/// URL check used for classification: must parse and carry a host.
/// Scheme-only strings like `mailto:x` or bare words do not qualify.
pub fn is_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => url.has_host(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn classifies_http_url() {
        let src = Source::classify("https://example.com/page");
        assert_eq!(src, Source::Url("https://example.com/page".to_string()));
    }

    #[test]
    fn classifies_literal_html() {
        let src = Source::classify("<html><body><p>x</p></body></html>");
        assert!(matches!(src, Source::Html(_)));
    }

    #[test]
    fn classifies_existing_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "<p>hi</p>").unwrap();
        let src = Source::classify(file.path().to_str().unwrap());
        assert!(matches!(src, Source::File(_)));
    }

    #[test]
    fn missing_path_falls_through_to_html() {
        let src = Source::classify("/tmp/definitely-not-a-real-file-xyz.html");
        assert!(matches!(src, Source::Html(_)));
    }

    #[test]
    fn existing_file_wins_over_url_syntax() {
        // A relative path that url::Url would reject anyway, but make the
        // precedence explicit with a name that contains a scheme separator.
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("https:page.html");
        std::fs::write(&path, "<p>x</p>").unwrap();
        let src = Source::classify(path.to_str().unwrap());
        assert!(matches!(src, Source::File(_)));
    }

    #[test]
    fn scheme_without_host_is_not_a_url() {
        assert!(!is_url("mailto:user@example.com"));
        assert!(!is_url("not a url"));
        assert!(!is_url(""));
    }

    #[test]
    fn classify_is_idempotent_for_urls() {
        let first = Source::classify("http://localhost:3000/dashboard");
        let second = Source::classify("http://localhost:3000/dashboard");
        assert_eq!(first, second);
    }
}
