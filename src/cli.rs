use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hxe")]
#[command(
    version,
    about = "HTML Extractor and Enhancer - render, enrich, and snapshot HTML documents",
    long_about = "HTML Extractor and Enhancer (HXE)\n\nLoads an HTML document from literal markup, a local file, or a URL, renders it, runs the enrichment script inside the page, and writes the post-render DOM to a file (optionally with a JSON summary of structural statistics).\n\nBy default a headless browser renders the page; --profile selects a persistent browser profile, and --no-playwright skips the browser entirely in favor of a static HTML parser."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) to set defaults for headless mode/timeouts/profile root; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract and enhance an HTML document
    Extract {
        #[arg(help = "HTML content, file path, or URL")]
        source: String,

        #[arg(help = "Output file path for the enhanced HTML")]
        output: PathBuf,

        #[arg(
            long,
            value_name = "PATH",
            help = "Also write the extraction data as pretty-printed JSON to this path"
        )]
        data: Option<PathBuf>,

        #[arg(
            long,
            help = "Disable browser automation; parse with the static fallback renderer instead"
        )]
        no_playwright: bool,

        #[arg(long, help = "Disable headless mode (shows browser UI)")]
        no_headless: bool,

        #[arg(
            long,
            value_name = "NAME",
            help = "Render with a persistent browser profile of this name"
        )]
        profile: Option<String>,

        #[arg(
            long,
            value_name = "PATH",
            help = "Enrichment script path (default: HXE_INJECTOR env, then injector.js next to the binary)"
        )]
        injector: Option<PathBuf>,

        #[arg(
            long,
            default_value = "30",
            help = "Navigation timeout (seconds) for URL rendering"
        )]
        nav_timeout: u64,

        #[arg(
            long,
            default_value = "10",
            help = "Network idle timeout (seconds) for URL rendering"
        )]
        network_idle_timeout: u64,

        #[arg(
            long,
            default_value = "45",
            help = "Process timeout (seconds) for the Playwright invocation"
        )]
        process_timeout: u64,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
