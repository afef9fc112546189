//! Comic Downloader - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use comic_downloader::{
    catalog::{CatalogSource, ManifestSource},
    cli::Args,
    config::{validate_config, Config},
    download::{HttpTransport, Orchestrator},
    error::{exit_codes, Error, Result},
    output::{
        create_spinner, print_banner, print_config_summary, print_entry, print_entry_stats,
        print_error, print_info, print_run_stats, print_success, print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::Io(_) | Error::InvalidFilename(_) => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<i32> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            args.config.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;

    print_config_summary(
        &args.catalogs,
        &config.output_dir().display().to_string(),
        config.download.concurrency,
        config.download.overwrite,
    );

    let source: Arc<dyn CatalogSource> = Arc::new(ManifestSource::new());
    let transport = Arc::new(HttpTransport::new(&config.http)?);
    let orchestrator = Orchestrator::new(&config, source.clone(), transport);

    if args.list {
        let mut sources_failed = 0u64;
        for query in &args.catalogs {
            let spinner = create_spinner(&format!("Resolving {}", query));
            let resolved = source.resolve_catalog(query).await;
            spinner.finish_and_clear();

            match resolved {
                Ok(entry) => print_entry(&entry),
                Err(e) => {
                    print_error(&format!("Failed to resolve {}: {}", query, e));
                    sources_failed += 1;
                }
            }
        }
        return Ok(if sources_failed > 0 {
            exit_codes::SOME_SOURCES_FAILED
        } else {
            exit_codes::SUCCESS
        });
    }

    let selection = args.selection();
    if let Some((book, range)) = selection {
        print_info(&format!("Downloading book {} volumes {}", book, range));
    }

    let report = orchestrator
        .download_catalogs(&args.catalogs, selection)
        .await?;

    for query in &report.failed_queries {
        print_error(&format!("Catalog {} was not downloaded", query));
    }
    for (name, stats) in &report.entries {
        print_entry_stats(name, stats);
    }
    print_run_stats(&report.totals, report.sources_failed());

    if report.totals.has_failures() {
        print_warning("Some images or volumes failed, see the incomplete volumes above");
        return Ok(exit_codes::SOME_IMAGES_FAILED);
    }
    if report.sources_failed() > 0 {
        return Ok(exit_codes::SOME_SOURCES_FAILED);
    }

    print_success("All volumes complete");
    Ok(exit_codes::SUCCESS)
}
