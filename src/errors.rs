//! # Error Handling
//!
//! This module provides user-friendly error display functions for the
//! Redline CLI.

use colored::Colorize;

/// Display a network error with helpful suggestions
///
/// # Arguments
///
/// * `message` - The error message to display
pub fn display_network_error(message: &str) {
    eprintln!("{} Network error: {}", "✗".red().bold(), message);
    eprintln!();
    eprintln!("{}", "Possible causes:".yellow());
    eprintln!("  • No internet connection");
    eprintln!("  • Evaluation service is unreachable");
    eprintln!("  • Firewall blocking the connection");
    eprintln!();
    eprintln!(
        "{} Check your connection and try again.",
        "Tip:".cyan().bold()
    );
}

/// Display a configuration error with helpful suggestions
///
/// # Arguments
///
/// * `message` - The error message to display
pub fn display_config_error(message: &str) {
    eprintln!("{} Configuration error: {}", "✗".red().bold(), message);
    eprintln!();
    eprintln!("{}", "Possible causes:".yellow());
    eprintln!("  • No .redline/config.json in this project");
    eprintln!("  • Configuration file is malformed");
    eprintln!();
    eprintln!(
        "{} Check `.redline/config.json` and try again.",
        "Tip:".cyan().bold()
    );
}

/// Display a warning
///
/// # Arguments
///
/// * `message` - The warning message to display
pub fn display_warning(message: &str) {
    eprintln!("{} Warning: {}", "⚠".yellow().bold(), message);
}
