//! Target keyword configuration.
//!
//! Keyword files are line based:
//!
//! ```text
//! # comments and blank lines are ignored
//! custom framing | 10
//! picture framing houston | 5
//! shadow box
//! ```
//!
//! A line is `keyword` or `keyword | priority`. Keywords are ordered by
//! priority (highest first), ties keep file order.

use crate::error::{PagewrightError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered list of target keywords, read-only input to scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSpec {
    keywords: Vec<String>,
}

impl KeywordSpec {
    /// Builds a spec, trimming entries and dropping blanks and
    /// case-insensitive duplicates while keeping first-seen order.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = Self::default();
        for keyword in keywords {
            spec.push(keyword);
        }
        spec
    }

    /// Appends a keyword unless it is blank or already present.
    pub fn push(&mut self, keyword: impl Into<String>) {
        let keyword = keyword.into().trim().to_string();
        if keyword.is_empty() {
            return;
        }
        let lower = keyword.to_lowercase();
        if self.keywords.iter().any(|k| k.to_lowercase() == lower) {
            return;
        }
        self.keywords.push(keyword);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.keywords.iter()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl<'a> IntoIterator for &'a KeywordSpec {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.keywords.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSpec {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Parser for keyword files
#[derive(Debug)]
pub struct KeywordParser;

impl KeywordParser {
    /// Parse a keyword file from disk
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<KeywordSpec> {
        let content = fs::read_to_string(&path).map_err(|e| {
            PagewrightError::ConfigError(format!("Cannot open file {}: {}", path.as_ref().display(), e))
        })?;
        Self::parse_string(&content)
    }

    /// Parse keyword configuration from a string
    pub fn parse_string(content: &str) -> Result<KeywordSpec> {
        let mut entries: Vec<(i64, String)> = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (keyword, priority) = match line.split_once('|') {
                Some((keyword, priority)) => {
                    let priority = priority.trim().parse::<i64>().map_err(|_| {
                        PagewrightError::ConfigError(format!(
                            "Parse error at line {}: invalid priority '{}'",
                            line_number,
                            priority.trim()
                        ))
                    })?;
                    (keyword.trim(), priority)
                }
                None => (line, 0),
            };

            if keyword.is_empty() {
                return Err(PagewrightError::ConfigError(format!(
                    "Parse error at line {}: missing keyword",
                    line_number
                )));
            }

            entries.push((priority, keyword.to_string()));
        }

        entries.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(entries.into_iter().map(|(_, keyword)| keyword).collect())
    }
}

/// Locates and loads `keywords.txt`
#[derive(Debug, Clone)]
pub struct KeywordLoader {
    /// Custom config directory, searched first
    custom_dir: Option<PathBuf>,
    /// Standard config directory (~/.config/pagewright)
    standard_dir: Option<PathBuf>,
}

impl KeywordLoader {
    pub const FILE_NAME: &'static str = "keywords.txt";

    /// Create a loader with no directories
    pub fn new() -> Self {
        Self { custom_dir: None, standard_dir: None }
    }

    /// Search `dir` before the standard directory
    pub fn custom_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.custom_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Replace the standard directory
    pub fn standard_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.standard_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Path of the first existing keyword file, if any
    pub fn find(&self) -> Option<PathBuf> {
        [&self.custom_dir, &self.standard_dir]
            .into_iter()
            .flatten()
            .map(|dir| dir.join(Self::FILE_NAME))
            .find(|path| path.exists())
    }

    /// Load the active keywords. No keyword file means no keywords.
    pub fn load(&self) -> Result<KeywordSpec> {
        match self.find() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading keyword file");
                KeywordParser::parse_file(&path)
            }
            None => Ok(KeywordSpec::default()),
        }
    }

    /// Default standard directory (~/.config/pagewright)
    fn default_standard_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("pagewright"))
    }
}

impl Default for KeywordLoader {
    fn default() -> Self {
        let mut loader = Self::new();
        loader.standard_dir = Self::default_standard_dir();
        loader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_spec_dedupes_case_insensitively() {
        let spec = KeywordSpec::new(["Custom Framing", "custom framing", "  ", " shadow box "]);
        assert_eq!(spec.as_slice(), &["Custom Framing".to_string(), "shadow box".to_string()]);
    }

    #[test]
    fn test_parse_string_priorities() {
        let content = r#"
# target keywords
shadow box
custom framing | 10
art framing | 5
museum glass | 10
"#;
        let spec = KeywordParser::parse_string(content).unwrap();
        assert_eq!(
            spec.as_slice(),
            &["custom framing", "museum glass", "art framing", "shadow box"].map(String::from)
        );
    }

    #[test]
    fn test_parse_string_invalid_priority() {
        let err = KeywordParser::parse_string("framing | high").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_parse_string_missing_keyword() {
        let err = KeywordParser::parse_string("\n | 3").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_loader_prefers_custom_dir() {
        let custom = TempDir::new().unwrap();
        let standard = TempDir::new().unwrap();
        fs::write(custom.path().join(KeywordLoader::FILE_NAME), "custom framing\n").unwrap();
        fs::write(standard.path().join(KeywordLoader::FILE_NAME), "standard\n").unwrap();

        let loader = KeywordLoader::new().custom_dir(custom.path()).standard_dir(standard.path());
        let spec = loader.load().unwrap();
        assert_eq!(spec.as_slice(), &["custom framing".to_string()]);
    }

    #[test]
    fn test_loader_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let spec = KeywordLoader::new().custom_dir(dir.path()).load().unwrap();
        assert!(spec.is_empty());
    }
}
