//! Status lines on stderr: a right-aligned, coloured label and a message.
//!
//! Stdout is left alone so `--output -` stays machine-readable.

use std::io::Write;

use console::Style;

const LABEL_WIDTH: usize = 12;

/// Action status, e.g. `    Fetching https://...`, with a bold green label.
pub fn status(label: &str, message: &str) {
    print_status(Style::new().green().bold(), label, message);
}

/// Informational status with a bold cyan label.
pub fn status_info(label: &str, message: &str) {
    print_status(Style::new().cyan().bold(), label, message);
}

pub fn status_warn(label: &str, message: &str) {
    print_status(Style::new().yellow().bold(), label, message);
}

pub fn status_error(label: &str, message: &str) {
    print_status(Style::new().red().bold(), label, message);
}

fn print_status(style: Style, label: &str, message: &str) {
    let _ = writeln!(std::io::stderr(), "{}", format_status(&style, label, message));
}

fn format_status(style: &Style, label: &str, message: &str) -> String {
    format!(
        "{:>width$} {message}",
        style.apply_to(label),
        width = LABEL_WIDTH
    )
}
