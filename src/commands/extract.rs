use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use hxe_lib::{Extractor, ExtractorOptions, HxeError, ProgressFn, RendererKind};

use crate::settings::{load_config, resolve_extract_settings, ExtractFlagSources};

/// Run the extract command.
#[allow(clippy::too_many_arguments)]
pub async fn run_extract(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    verbose: bool,
    source: String,
    output: PathBuf,
    data: Option<PathBuf>,
    no_playwright: bool,
    no_headless: bool,
    profile: Option<String>,
    injector: Option<PathBuf>,
    nav_timeout: u64,
    network_idle_timeout: u64,
    process_timeout: u64,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return report_error(err),
    };

    let flags = ExtractFlagSources::from_args(raw_args);
    let resolved = resolve_extract_settings(
        no_headless,
        nav_timeout,
        network_idle_timeout,
        process_timeout,
        &config,
        &flags,
    );

    if verbose {
        eprintln!(
            "Effective config [{}]: headless={}, node={}, profile root={}, timeouts: nav={}s, network-idle={}s, process={}s",
            config_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "defaults".to_string()),
            resolved.headless,
            resolved.node_command,
            resolved.profile_root.display(),
            resolved.nav_timeout,
            resolved.network_idle_timeout,
            resolved.process_timeout,
        );
    }

    let progress: Option<ProgressFn> = if verbose {
        Some(Arc::new(|msg: &str| eprintln!("{msg}")))
    } else {
        None
    };

    let options = ExtractorOptions {
        use_browser: !no_playwright,
        headless: resolved.headless,
        profile,
        profile_root: resolved.profile_root,
        node_command: resolved.node_command,
        navigation_timeout: Duration::from_secs(resolved.nav_timeout),
        network_idle_timeout: Duration::from_secs(resolved.network_idle_timeout),
        process_timeout: Duration::from_secs(resolved.process_timeout),
        injector_path: injector,
        progress,
    };

    let extractor = match Extractor::new(options) {
        Ok(extractor) => extractor,
        Err(err) => return report_error(err),
    };

    let report = match extractor
        .extract_and_enhance(&source, &output, data.as_deref())
        .await
    {
        Ok(report) => report,
        Err(err) => return report_error(err),
    };

    println!("HTML processing complete!");
    println!("Enhanced HTML saved to: {}", report.html_path.display());
    if let Some(path) = &report.data_path {
        println!("Extraction data saved to: {}", path.display());
    }
    if verbose {
        let mode = match (report.renderer, report.profile_fallback) {
            (RendererKind::Profile, true) => "profile (ephemeral fallback)".to_string(),
            (kind, _) => kind.as_str().to_string(),
        };
        println!("Renderer: {mode}");
    }
    print_statistics(&report.data);

    ExitCode::SUCCESS
}

fn print_statistics(data: &hxe_lib::DataMap) {
    let Some(stats) = data.get("statistics").and_then(|v| v.as_object()) else {
        return;
    };

    if let Some(title) = data
        .get("metadata")
        .and_then(|m| m.get("title"))
        .and_then(|t| t.as_str())
    {
        if !title.is_empty() {
            println!("Title: {title}");
        }
    }

    let count = |key: &str| stats.get(key).and_then(|v| v.as_u64()).unwrap_or(0);
    println!(
        "Statistics: {} headings, {} links, {} images, {} tables, {} paragraphs",
        count("headings"),
        count("links"),
        count("images"),
        count("tables"),
        count("paragraphs"),
    );
}

fn report_error(err: HxeError) -> ExitCode {
    let payload = err.to_payload();
    eprintln!("Error: {}", payload.message);
    if let Some(hint) = payload.remediation {
        eprintln!("Hint: {hint}");
    }
    ExitCode::from(1)
}
