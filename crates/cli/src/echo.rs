use owo_colors::OwoColorize;
use pagewright_core::{AnalysisReport, Status};

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Pagewright".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Extract, score and rewrite page content\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print a labelled detail line
pub fn print_detail(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

/// Print the score summary with the overall score colored by band
pub fn print_score_summary(report: &AnalysisReport) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Score Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    let overall = format!("{}/100", report.overall_score);
    let overall = if report.overall_score >= 80 {
        overall.bright_green().to_string()
    } else if report.overall_score >= 50 {
        overall.bright_yellow().to_string()
    } else {
        overall.bright_red().to_string()
    };
    eprintln!("  {} {}", "Overall:".dimmed(), overall);

    for category in &report.category_breakdown {
        let score = format!("{:>2}/{}", category.score, category.max_score);
        let score = match category.status {
            Status::Green => score.green().to_string(),
            Status::Yellow => score.yellow().to_string(),
            Status::Red => score.red().to_string(),
        };
        eprintln!("  {} {}", format!("{:<20}", category.category).dimmed(), score);
    }

    if !report.stuffing_alerts.is_empty() {
        print_warning(&format!("{} keyword stuffing alert(s)", report.stuffing_alerts.len()));
    }
    eprintln!();
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
