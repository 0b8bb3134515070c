//! SEO scoring engine.
//!
//! [`score`] turns a [`ContentTree`] and a [`KeywordSpec`] into an
//! [`AnalysisReport`]: word count, keyword densities, a simplified
//! readability score, title and first-paragraph checks, keyword stuffing
//! alerts, and a 100-point score split across five weighted categories.
//!
//! Scoring is pure and deterministic. Every division guards a zero
//! denominator, so an empty page scores low but never fails.

use crate::content::{ContentTree, NodeKind};
use crate::keywords::KeywordSpec;
use crate::readability::{count_sentences, count_words, first_sentence, ratio, readability_score, round_to};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Configuration for the scoring engine
///
/// Ranges are inclusive unless noted. The defaults are the tuned values
/// the category weights were designed around.
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Title length (chars) earning full length credit
    pub title_optimal: RangeInclusive<usize>,
    /// Title length earning partial credit, upper bound exclusive
    pub title_acceptable: (usize, usize),
    /// Description length earning full credit
    pub description_optimal: RangeInclusive<usize>,
    /// Description length earning partial credit, upper bound exclusive
    pub description_acceptable: (usize, usize),
    /// First paragraph word count earning full credit
    pub first_paragraph_optimal: RangeInclusive<usize>,
    /// First paragraph word count earning partial credit, upper bound exclusive
    pub first_paragraph_acceptable: (usize, usize),
    /// Keyword density (%) earning a full share
    pub density_optimal: RangeInclusive<f64>,
    /// Keyword density (%) earning a partial share, upper bound exclusive
    pub density_acceptable: (f64, f64),
    /// Density (%) above which a stuffing alert is raised
    pub stuffing_threshold: f64,
    /// Density (%) above which a stuffing alert is medium severity
    pub stuffing_medium: f64,
    /// Density (%) above which a stuffing alert is high severity
    pub stuffing_high: f64,
    /// Density (%) used to compute the recommended keyword count
    pub target_density: f64,
    /// Word count earning full content-length credit
    pub content_words_full: usize,
    /// Word count earning partial content-length credit
    pub content_words_partial: usize,
    /// Readability earning full credit
    pub readability_good: f64,
    /// Readability earning partial credit
    pub readability_fair: f64,
    /// Lower-cased token the title should contain for local SEO
    pub locality_token: String,
    /// Human-readable locality suggested when the token is missing
    pub locality_label: String,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            title_optimal: 50..=60,
            title_acceptable: (40, 70),
            description_optimal: 150..=160,
            description_acceptable: (120, 170),
            first_paragraph_optimal: 150..=200,
            first_paragraph_acceptable: (100, 250),
            density_optimal: 1.0..=3.0,
            density_acceptable: (0.5, 5.0),
            stuffing_threshold: 4.0,
            stuffing_medium: 5.0,
            stuffing_high: 6.0,
            target_density: 3.0,
            content_words_full: 500,
            content_words_partial: 300,
            readability_good: 60.0,
            readability_fair: 40.0,
            locality_token: "houston".to_string(),
            locality_label: "Houston Heights".to_string(),
        }
    }
}

/// Traffic-light status of a check or category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Green,
    Yellow,
    Red,
}

impl Status {
    /// Status of a category score given its green and yellow floors
    fn from_score(score: f64, green: f64, yellow: f64) -> Self {
        if score >= green {
            Status::Green
        } else if score >= yellow {
            Status::Yellow
        } else {
            Status::Red
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Green => "green",
            Status::Yellow => "yellow",
            Status::Red => "red",
        }
    }
}

/// Stuffing alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Estimated search-engine penalty risk for a stuffed keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PenaltyRisk {
    Low,
    Medium,
    High,
}

/// Score of one weighted category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: String,
    pub score: u32,
    pub max_score: u32,
    pub status: Status,
    pub issues: Vec<String>,
}

/// Raised when a keyword's density exceeds the stuffing threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StuffingAlert {
    pub keyword: String,
    pub density: f64,
    pub severity: Severity,
    pub penalty_risk: PenaltyRisk,
    pub current_count: usize,
    pub recommended_count: usize,
}

/// Full SEO analysis of one content tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub word_count: usize,
    /// Keyword to density percentage, two decimals
    pub keyword_density: BTreeMap<String, f64>,
    pub readability_score: f64,
    /// Sum of category scores, 0-100
    pub overall_score: u32,
    pub category_breakdown: Vec<CategoryScore>,
    pub stuffing_alerts: Vec<StuffingAlert>,
    pub title_length: usize,
    pub title_status: Status,
    pub title_has_keyword: bool,
    pub first_paragraph_word_count: usize,
    pub first_paragraph_status: Status,
    pub keyword_in_first_sentence: bool,
    #[serde(rename = "hasH1")]
    pub has_h1: bool,
    #[serde(rename = "h1Count")]
    pub h1_count: usize,
    pub has_meta_description: bool,
    /// Flat suggestion list kept for older displays
    pub suggestions: Vec<String>,
}

impl AnalysisReport {
    /// Looks up a category by name
    pub fn category(&self, name: &str) -> Option<&CategoryScore> {
        self.category_breakdown.iter().find(|c| c.category == name)
    }
}

/// Category names in report order
pub const TITLE_CATEGORY: &str = "Title Optimization";
pub const META_CATEGORY: &str = "Meta Description";
pub const FIRST_PARAGRAPH_CATEGORY: &str = "First Paragraph";
pub const KEYWORD_CATEGORY: &str = "Keyword Density";
pub const CONTENT_CATEGORY: &str = "Content Quality";

/// Builds the whole-word matcher for a keyword.
///
/// The keyword is escaped, internal whitespace runs become `\s+`, and a
/// Unicode word boundary is asserted only on a side whose edge character
/// is a word character, so keywords like `c++` still match.
pub fn keyword_regex(keyword: &str) -> Option<Regex> {
    let parts: Vec<String> = keyword.split_whitespace().map(regex::escape).collect();
    if parts.is_empty() {
        return None;
    }

    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let trimmed = keyword.trim();
    let lead = if is_word(trimmed.chars().next()) { r"\b" } else { "" };
    let trail = if is_word(trimmed.chars().last()) { r"\b" } else { "" };

    RegexBuilder::new(&format!("{}{}{}", lead, parts.join(r"\s+"), trail))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Counts whole-word, case-insensitive occurrences of a keyword
pub fn count_keyword(corpus: &str, keyword: &str) -> usize {
    keyword_regex(keyword).map_or(0, |re| re.find_iter(corpus).count())
}

/// Title, description and every node text in document order, space separated
pub fn assemble_corpus(tree: &ContentTree) -> String {
    let mut parts = vec![tree.seo_meta.title.as_str(), tree.seo_meta.description.as_str()];
    parts.extend(tree.nodes_in_order().into_iter().map(|node| node.text.as_str()));
    parts.join(" ")
}

fn contains_any_keyword(text: &str, keywords: &KeywordSpec) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|kw| lower.contains(&kw.to_lowercase()))
}

fn in_half_open(value: usize, bounds: (usize, usize)) -> bool {
    value >= bounds.0 && value < bounds.1
}

/// Scores a tree with the default configuration.
///
/// # Example
///
/// ```rust
/// use pagewright_core::{ContentTree, DocumentType, KeywordSpec, score};
///
/// let mut tree = ContentTree::new("home", DocumentType::General);
/// tree.seo_meta.title = "Custom Picture Framing Houston Heights TX".to_string();
///
/// let report = score(&tree, &KeywordSpec::new(["shadow box"]));
/// assert_eq!(report.title_length, 41);
/// assert!(!report.title_has_keyword);
/// assert!(report.overall_score <= 100);
/// ```
pub fn score(tree: &ContentTree, keywords: &KeywordSpec) -> AnalysisReport {
    score_with_config(tree, keywords, &ScoreConfig::default())
}

/// Scores a tree against target keywords.
pub fn score_with_config(tree: &ContentTree, keywords: &KeywordSpec, config: &ScoreConfig) -> AnalysisReport {
    let corpus = assemble_corpus(tree);
    let word_count = count_words(&corpus);
    let readability = readability_score(word_count, count_sentences(&corpus));

    let mut keyword_density = BTreeMap::new();
    let mut keyword_counts = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let count = count_keyword(&corpus, keyword);
        let density = round_to(100.0 * ratio(count as f64, word_count as f64), 2);
        keyword_density.insert(keyword.clone(), density);
        keyword_counts.push((keyword.as_str(), count, density));
    }

    let title = &tree.seo_meta.title;
    let title_length = title.chars().count();
    let title_status = if config.title_optimal.contains(&title_length) {
        Status::Green
    } else if in_half_open(title_length, config.title_acceptable) {
        Status::Yellow
    } else {
        Status::Red
    };
    let title_has_keyword = contains_any_keyword(title, keywords);

    let first_paragraph = tree.first_paragraph();
    let first_paragraph_word_count = first_paragraph.map_or(0, |node| count_words(&node.text));
    let first_paragraph_status = if first_paragraph_word_count == 0 {
        Status::Red
    } else if config.first_paragraph_optimal.contains(&first_paragraph_word_count) {
        Status::Green
    } else if in_half_open(first_paragraph_word_count, config.first_paragraph_acceptable) {
        Status::Yellow
    } else {
        Status::Red
    };
    let keyword_in_first_sentence =
        first_paragraph.is_some_and(|node| contains_any_keyword(first_sentence(&node.text), keywords));

    let stuffing_alerts = keyword_counts
        .iter()
        .filter(|(_, _, density)| *density > config.stuffing_threshold)
        .map(|&(keyword, count, density)| {
            let (severity, penalty_risk) = if density > config.stuffing_high {
                (Severity::High, PenaltyRisk::High)
            } else if density > config.stuffing_medium {
                (Severity::Medium, PenaltyRisk::Medium)
            } else {
                (Severity::Low, PenaltyRisk::Low)
            };
            StuffingAlert {
                keyword: keyword.to_string(),
                density,
                severity,
                penalty_risk,
                current_count: count,
                recommended_count: (word_count as f64 * config.target_density / 100.0).floor() as usize,
            }
        })
        .collect();

    let h1_count = tree.count_of_kind(NodeKind::H1);
    let description_length = tree.seo_meta.description.chars().count();

    let category_breakdown = vec![
        title_category(title_length, title_has_keyword, config),
        meta_category(description_length, config),
        first_paragraph_category(first_paragraph_word_count, keyword_in_first_sentence, config),
        keyword_category(&keyword_counts, config),
        content_category(word_count, h1_count, readability, config),
    ];
    let overall_score = category_breakdown.iter().map(|c| c.score).sum();

    let suggestions = legacy_suggestions(tree, word_count, &keyword_counts, config);

    AnalysisReport {
        word_count,
        keyword_density,
        readability_score: readability,
        overall_score,
        category_breakdown,
        stuffing_alerts,
        title_length,
        title_status,
        title_has_keyword,
        first_paragraph_word_count,
        first_paragraph_status,
        keyword_in_first_sentence,
        has_h1: h1_count > 0,
        h1_count,
        has_meta_description: description_length > 0,
        suggestions,
    }
}

/// Title (20): 10 for length, 10 for containing a keyword
fn title_category(length: usize, has_keyword: bool, config: &ScoreConfig) -> CategoryScore {
    let mut score = 0;
    let mut issues = Vec::new();
    let (optimal_min, optimal_max) = (config.title_optimal.start(), config.title_optimal.end());

    if config.title_optimal.contains(&length) {
        score += 10;
    } else {
        if in_half_open(length, config.title_acceptable) {
            score += 5;
        }
        issues.push(format!(
            "Title length is {} chars (optimal: {}-{})",
            length, optimal_min, optimal_max
        ));
    }

    if has_keyword {
        score += 10;
    } else {
        issues.push("Title should include a target keyword".to_string());
    }

    CategoryScore {
        category: TITLE_CATEGORY.to_string(),
        score,
        max_score: 20,
        status: Status::from_score(score as f64, 15.0, 10.0),
        issues,
    }
}

/// Meta description (15): graded on length only
fn meta_category(length: usize, config: &ScoreConfig) -> CategoryScore {
    let mut issues = Vec::new();
    let (optimal_min, optimal_max) = (config.description_optimal.start(), config.description_optimal.end());
    let length_issue = || format!("Description length is {} chars (optimal: {}-{})", length, optimal_min, optimal_max);

    let score = if config.description_optimal.contains(&length) {
        15
    } else if in_half_open(length, config.description_acceptable) {
        issues.push(length_issue());
        10
    } else if length > 0 {
        issues.push(length_issue());
        5
    } else {
        issues.push("Missing meta description".to_string());
        0
    };

    CategoryScore {
        category: META_CATEGORY.to_string(),
        score,
        max_score: 15,
        status: Status::from_score(score as f64, 12.0, 8.0),
        issues,
    }
}

/// First paragraph (20): 10 for length, 10 for a keyword in the first sentence
fn first_paragraph_category(word_count: usize, keyword_in_first_sentence: bool, config: &ScoreConfig) -> CategoryScore {
    let mut score = 0;
    let mut issues = Vec::new();
    let (optimal_min, optimal_max) = (config.first_paragraph_optimal.start(), config.first_paragraph_optimal.end());

    if word_count == 0 {
        issues.push("No paragraphs found".to_string());
    } else if config.first_paragraph_optimal.contains(&word_count) {
        score += 10;
    } else {
        if in_half_open(word_count, config.first_paragraph_acceptable) {
            score += 5;
        }
        issues.push(format!(
            "First paragraph has {} words (optimal: {}-{})",
            word_count, optimal_min, optimal_max
        ));
    }

    if keyword_in_first_sentence {
        score += 10;
    } else {
        issues.push("Keyword should appear in first sentence".to_string());
    }

    CategoryScore {
        category: FIRST_PARAGRAPH_CATEGORY.to_string(),
        score,
        max_score: 20,
        status: Status::from_score(score as f64, 15.0, 10.0),
        issues,
    }
}

/// Keyword density (25): split evenly across keywords.
///
/// The status uses the unrounded sum; the reported score is rounded.
fn keyword_category(keyword_counts: &[(&str, usize, f64)], config: &ScoreConfig) -> CategoryScore {
    let mut raw_score = 0.0;
    let mut issues = Vec::new();
    let share_count = keyword_counts.len() as f64;
    let (optimal_min, optimal_max) = (config.density_optimal.start(), config.density_optimal.end());
    let (acceptable_min, acceptable_max) = config.density_acceptable;

    for &(keyword, _, density) in keyword_counts {
        if config.density_optimal.contains(&density) {
            raw_score += ratio(25.0, share_count);
        } else if density >= acceptable_min && density < acceptable_max {
            raw_score += ratio(12.0, share_count);
            let direction = if density < *optimal_min { "too low" } else { "too high" };
            issues.push(format!(
                "\"{}\" density {} ({}%, target: {}-{}%)",
                keyword, direction, density, optimal_min, optimal_max
            ));
        } else if density == 0.0 {
            issues.push(format!("\"{}\" not found in content", keyword));
        } else {
            issues.push(format!(
                "\"{}\" density critical ({}%, target: {}-{}%)",
                keyword, density, optimal_min, optimal_max
            ));
        }
    }

    CategoryScore {
        category: KEYWORD_CATEGORY.to_string(),
        score: raw_score.round() as u32,
        max_score: 25,
        status: Status::from_score(raw_score, 18.0, 12.0),
        issues,
    }
}

/// Content quality (20): 10 for length, 5 for a single H1, 5 for readability
fn content_category(word_count: usize, h1_count: usize, readability: f64, config: &ScoreConfig) -> CategoryScore {
    let mut score = 0;
    let mut issues = Vec::new();

    if word_count >= config.content_words_full {
        score += 10;
    } else if word_count >= config.content_words_partial {
        score += 5;
        issues.push(format!(
            "Content has {} words (recommended: {}+)",
            word_count, config.content_words_full
        ));
    } else {
        issues.push(format!(
            "Content too short ({} words, recommended: {}+)",
            word_count, config.content_words_full
        ));
    }

    match h1_count {
        1 => score += 5,
        0 => issues.push("Missing H1 heading".to_string()),
        n => issues.push(format!("Multiple H1 tags found ({}), should have exactly 1", n)),
    }

    if readability >= config.readability_good {
        score += 5;
    } else if readability >= config.readability_fair {
        score += 2;
        issues.push(format!(
            "Readability score is {:.1} (target: {}+)",
            readability, config.readability_good
        ));
    } else {
        issues.push(format!(
            "Readability score is low ({:.1}, target: {}+)",
            readability, config.readability_good
        ));
    }

    CategoryScore {
        category: CONTENT_CATEGORY.to_string(),
        score,
        max_score: 20,
        status: Status::from_score(score as f64, 15.0, 10.0),
        issues,
    }
}

/// Flat suggestion strings kept for displays that predate the category breakdown
fn legacy_suggestions(
    tree: &ContentTree, word_count: usize, keyword_counts: &[(&str, usize, f64)], config: &ScoreConfig,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if word_count < config.content_words_partial {
        suggestions.push(format!(
            "Content is too short. Aim for at least {} words for better SEO.",
            config.content_words_full
        ));
    }

    for &(keyword, _, density) in keyword_counts {
        if density < *config.density_optimal.start() {
            suggestions.push(format!(
                "Keyword \"{}\" density is low ({}%). Target: {}-{}%",
                keyword,
                density,
                config.density_optimal.start(),
                config.density_optimal.end()
            ));
        } else if density > config.stuffing_threshold {
            suggestions.push(format!(
                "KEYWORD STUFFING: \"{}\" density is too high ({}%). May trigger spam filters.",
                keyword, density
            ));
        }
    }

    if !tree.seo_meta.title.to_lowercase().contains(&config.locality_token) {
        suggestions.push(format!(
            "Consider adding \"{}\" to your title tag for local SEO.",
            config.locality_label
        ));
    }

    let description_length = tree.seo_meta.description.chars().count();
    if description_length < config.description_acceptable.0 {
        suggestions.push("Meta description is too short. Aim for 150-160 characters.".to_string());
    }
    if description_length > *config.description_optimal.end() {
        suggestions.push(format!(
            "Meta description is too long. Keep it under {} characters.",
            config.description_optimal.end()
        ));
    }

    suggestions
}
