mod cli;
mod commands;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::run_extract;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();

    match args.command {
        Commands::Extract {
            source,
            output,
            data,
            no_playwright,
            no_headless,
            profile,
            injector,
            nav_timeout,
            network_idle_timeout,
            process_timeout,
        } => {
            run_extract(
                &raw_args,
                args.config,
                args.verbose,
                source,
                output,
                data,
                no_playwright,
                no_headless,
                profile,
                injector,
                nav_timeout,
                network_idle_timeout,
                process_timeout,
            )
            .await
        }
    }
}
