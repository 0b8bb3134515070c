use crate::scoring::{AnalysisReport, Status};
use std::fmt::Write as _;

/// Configuration for plain text reports
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Include the report header with the overall score
    pub include_header: bool,
    /// List each category's issues under its row
    pub include_issues: bool,
    /// Wrap suggestion lines at the given width (0 = no wrapping)
    pub line_width: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self { include_header: true, include_issues: true, line_width: 0 }
    }
}

/// Plain text formatter for analysis reports
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, report: &AnalysisReport) -> String {
        format_report(report, &self.config)
    }
}

fn status_marker(status: Status) -> &'static str {
    match status {
        Status::Green => "[ok]",
        Status::Yellow => "[!!]",
        Status::Red => "[xx]",
    }
}

/// Render an analysis report as plain text
pub fn format_report(report: &AnalysisReport, config: &TextConfig) -> String {
    let mut out = String::new();

    if config.include_header {
        let title = format!("SEO score: {}/100", report.overall_score);
        let _ = writeln!(out, "{}\n{}", title, "=".repeat(title.len()));
        let _ = writeln!(
            out,
            "Words: {} | Readability: {:.1} | H1 tags: {}\n",
            report.word_count, report.readability_score, report.h1_count
        );
    }

    for category in &report.category_breakdown {
        let _ = writeln!(
            out,
            "{} {:<20} {:>3}/{}",
            status_marker(category.status),
            category.category,
            category.score,
            category.max_score
        );
        if config.include_issues {
            for issue in &category.issues {
                let _ = writeln!(out, "       - {}", issue);
            }
        }
    }

    if !report.keyword_density.is_empty() {
        out.push_str("\nKeyword density\n");
        for (keyword, density) in &report.keyword_density {
            let _ = writeln!(out, "  {:<30} {:>6.2}%", keyword, density);
        }
    }

    if !report.stuffing_alerts.is_empty() {
        out.push_str("\nStuffing alerts\n");
        for alert in &report.stuffing_alerts {
            let _ = writeln!(
                out,
                "  \"{}\" at {}% ({:?} risk): {} uses, recommended at most {}",
                alert.keyword, alert.density, alert.penalty_risk, alert.current_count, alert.recommended_count
            );
        }
    }

    if !report.suggestions.is_empty() {
        out.push_str("\nSuggestions\n");
        for suggestion in &report.suggestions {
            let _ = writeln!(out, "{}", wrap_text(&format!("  * {}", suggestion), config.line_width, "    "));
        }
    }

    out.trim_end().to_string()
}

/// Greedy word wrap. Continuation lines carry `indent`.
fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    if width == 0 {
        return text.to_string();
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let prefix = if lines.is_empty() { "  " } else { indent };
        if current.is_empty() {
            current = format!("{}{}", prefix, word);
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = format!("{}{}", indent, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentNode, ContentTree, DocumentType, NodeKind};
    use crate::keywords::KeywordSpec;
    use crate::scoring::score;

    fn report() -> AnalysisReport {
        let mut tree = ContentTree::new("home", DocumentType::General);
        tree.seo_meta.title = "Frames".to_string();
        tree.insert_node(ContentNode::new(NodeKind::Paragraph, 0, "frames frames frames art"));
        score(&tree, &KeywordSpec::new(["frames", "matting"]))
    }

    #[test]
    fn test_format_report_sections() {
        let text = format_report(&report(), &TextConfig::default());

        assert!(text.starts_with("SEO score: "));
        assert!(text.contains("Title Optimization"));
        assert!(text.contains("Missing meta description"));
        assert!(text.contains("Keyword density"));
        assert!(text.contains("Stuffing alerts"));
        assert!(text.contains("Suggestions"));
    }

    #[test]
    fn test_text_formatter_uses_its_config() {
        let config = TextConfig { include_header: false, ..Default::default() };
        let formatter = TextFormatter::new(config.clone());

        assert_eq!(formatter.format(&report()), format_report(&report(), &config));
        assert!(!formatter.format(&report()).contains("SEO score"));
    }

    #[test]
    fn test_format_report_without_header_or_issues() {
        let config = TextConfig { include_header: false, include_issues: false, line_width: 0 };
        let text = format_report(&report(), &config);

        assert!(!text.contains("SEO score"));
        assert!(!text.contains("Missing meta description"));
        assert!(text.starts_with("[!!] Title Optimization"));
    }

    #[test]
    fn test_wrap_text() {
        let wrapped = wrap_text("  * one two three four five", 12, "    ");
        for line in wrapped.lines() {
            assert!(line.chars().count() <= 12, "line too long: {:?}", line);
        }
        assert!(wrapped.lines().skip(1).all(|l| l.starts_with("    ")));
        assert_eq!(wrap_text("as is", 0, ""), "as is");
    }
}
