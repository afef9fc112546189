//! Console output utilities.

use console::style;

use crate::catalog::Entry;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Comic Downloader                                  ║
║     Concurrent, resumable volume downloads            ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(
    catalogs: &[String],
    output_dir: &str,
    concurrency: usize,
    overwrite: bool,
) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Catalogs:    {}", catalogs.join(", "));
    println!("  Directory:   {}", output_dir);
    println!("  Concurrency: {}", concurrency);
    println!("  Overwrite:   {}", overwrite);
    println!();
}

/// Print an entry's metadata and its indexed volumes, book by book.
pub fn print_entry(entry: &Entry) {
    println!();
    println!("{}", style(format!("═══ {} ═══", entry.name)).bold());
    if let Some(author) = &entry.author {
        println!("  Author: {}", author);
    }
    for meta in &entry.metadata {
        println!("  {}: {}", meta.key, meta.value);
    }

    for (book_index, book) in entry.books.iter().enumerate() {
        println!();
        println!("{}", style(format!("[{}] {}", book_index, book.name)).cyan());
        for (row_index, vols) in book.vols.chunks(3).enumerate() {
            let line: Vec<String> = vols
                .iter()
                .enumerate()
                .map(|(i, v)| format!("{:>4}: {:<32}", row_index * 3 + i, v.name))
                .collect();
            println!("{}", line.join("").trim_end());
        }
    }
    println!();
}
