//! Statistics reporting.

use console::style;

use crate::download::RunStats;

/// Print statistics for one catalog.
pub fn print_entry_stats(name: &str, stats: &RunStats) {
    println!();
    println!("{}", style(format!("Statistics for {}:", name)).bold());
    println!(
        "  Volumes:  {} downloaded, {} skipped",
        stats.volumes_downloaded, stats.volumes_skipped
    );
    println!("  Images:   {} downloaded", stats.images_downloaded);
    if stats.images_failed > 0 {
        println!("  Failed:   {} image(s)", style(stats.images_failed).red());
    }
}

/// Print aggregate statistics for the whole run.
pub fn print_run_stats(stats: &RunStats, sources_failed: u64) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Run Statistics:").bold());
    println!("  Volumes:  {} total", stats.total_volumes());
    println!("    downloaded: {}", stats.volumes_downloaded);
    println!("    skipped:    {} (already archived)", stats.volumes_skipped);
    if stats.volumes_empty > 0 {
        println!("    no images:  {}", style(stats.volumes_empty).yellow());
    }
    if stats.volumes_failed > 0 {
        println!("    failed:     {}", style(stats.volumes_failed).red());
    }
    println!("  Images:   {} downloaded", style(stats.images_downloaded).green());
    if stats.images_failed > 0 {
        println!("            {} failed", style(stats.images_failed).red());
    }
    println!("  Archives: {} written", stats.archives_written);
    if stats.archives_failed > 0 {
        println!("            {} failed", style(stats.archives_failed).red());
    }
    if sources_failed > 0 {
        println!("  Catalogs failed: {}", style(sources_failed).red());
    }
    if !stats.incomplete_volumes.is_empty() {
        println!("  Incomplete volumes:");
        for label in &stats.incomplete_volumes {
            println!("    - {}", label);
        }
    }
    println!("{}", style("═".repeat(50)).dim());
}
