//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Color a 0-100 match confidence
pub fn color_confidence(confidence: u8) -> String {
    let formatted = format!("{}%", confidence);
    if confidence >= 80 {
        formatted.green().to_string()
    } else if confidence >= 60 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_formatting_keeps_the_percent_sign() {
        colored::control::set_override(false);
        assert_eq!(color_confidence(85), "85%");
        assert_eq!(color_confidence(70), "70%");
        assert_eq!(color_confidence(12), "12%");
    }
}
