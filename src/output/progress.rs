//! Progress indicators.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
const VOLUME_TEMPLATE: &str =
    "{spinner:.green} {msg:<24!} [{bar:40.cyan/blue}] {pos}/{len} images ({eta})";

/// Spinner shown while a catalog is being resolved.
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Bar counting the images of one volume.
pub fn create_volume_bar(images: u64, volume: &str) -> ProgressBar {
    let bar = ProgressBar::new(images);
    let style = ProgressStyle::with_template(VOLUME_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    bar.set_style(style);
    bar.set_message(volume.to_string());
    bar
}
