//! Literal find-and-replace across many pages.
//!
//! An edit targets the SEO attribute block, the node content payload, or
//! both. Every string leaf that contains the find text has all occurrences
//! replaced and is reported by its dotted path (`seoMeta.title`,
//! `content.paragraph_2.content`).
//!
//! [`execute`] is pure: it works on copies and returns a report alongside
//! the edited trees. [`commit_edit`] wires that to a [`PageStore`], where a
//! non-dry run is persisted as a single all-or-nothing batch.

use crate::content::{ContentTree, ContentValue, PageStatus};
use crate::store::PageStore;
use crate::{PagewrightError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

/// Top-level field group an edit may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetField {
    #[serde(alias = "seo_meta")]
    SeoMeta,
    Content,
}

impl TargetField {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetField::SeoMeta => "seoMeta",
            TargetField::Content => "content",
        }
    }
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "content" => Ok(TargetField::Content),
            "seometa" => Ok(TargetField::SeoMeta),
            _ => Err(format!("Invalid target field: {}. Valid options: content, seo-meta", s)),
        }
    }
}

/// A find-and-replace request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkEdit {
    /// Literal text to find. Never interpreted as a pattern.
    pub find: String,
    pub replace: String,
    pub targets: BTreeSet<TargetField>,
    /// Report only; never persist
    pub dry_run: bool,
}

impl BulkEdit {
    pub fn new(
        find: impl Into<String>, replace: impl Into<String>, targets: impl IntoIterator<Item = TargetField>,
    ) -> Self {
        Self { find: find.into(), replace: replace.into(), targets: targets.into_iter().collect(), dry_run: false }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Rejects requests that cannot do anything before any work starts.
    pub fn validate(&self) -> Result<()> {
        if self.find.is_empty() {
            return Err(PagewrightError::Validation("find text must not be empty".to_string()));
        }
        if self.targets.is_empty() {
            return Err(PagewrightError::Validation(
                "at least one target field is required".to_string(),
            ));
        }
        Ok(())
    }

    fn targets(&self, field: TargetField) -> bool {
        self.targets.contains(&field)
    }
}

/// Changes made to one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChange {
    pub slug: String,
    /// Dotted paths of every changed string leaf
    pub changes: Vec<String>,
}

/// Outcome of a bulk edit as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEditReport {
    pub dry_run: bool,
    pub affected_pages: Vec<DocumentChange>,
    pub total_affected: usize,
}

/// Report plus the edited copies of every affected page.
#[derive(Debug, Clone)]
pub struct BulkOutcome {
    pub report: BulkEditReport,
    /// Edited trees of affected pages only, each with its position in the
    /// input, in input order
    pub updated: Vec<(usize, ContentTree)>,
}

/// Applies an edit to one tree in place and returns the changed paths.
///
/// SEO fields are visited first, then the content payload.
pub fn apply_edit(tree: &mut ContentTree, edit: &BulkEdit) -> Vec<String> {
    let mut changes = Vec::new();

    if edit.targets(TargetField::SeoMeta) {
        for name in ["title", "description", "keywords", "canonicalUrl"] {
            if let Some(field) = tree.seo_meta.field_mut(name)
                && field.contains(&edit.find)
            {
                *field = field.replace(&edit.find, &edit.replace);
                changes.push(format!("seoMeta.{}", name));
            }
        }
    }

    if edit.targets(TargetField::Content) {
        let mut payload = tree.content_value();
        let before = changes.len();
        replace_leaves(&mut payload, "content", edit, &mut changes);
        if changes.len() > before {
            tree.apply_content_value(&payload);
        }
    }

    changes
}

/// Depth-first visitor over a content payload. Only text leaves change.
fn replace_leaves(value: &mut ContentValue, path: &str, edit: &BulkEdit, changes: &mut Vec<String>) {
    match value {
        ContentValue::Text(text) => {
            if text.contains(&edit.find) {
                *text = text.replace(&edit.find, &edit.replace);
                changes.push(path.to_string());
            }
        }
        ContentValue::Map(entries) => {
            for (key, child) in entries.iter_mut() {
                replace_leaves(child, &format!("{}.{}", path, key), edit, changes);
            }
        }
    }
}

/// Runs an edit over copies of `documents`.
///
/// Inputs are never mutated; a dry run and a real run produce the same
/// report, and only the caller decides whether to persist `updated`.
pub fn execute(documents: &[ContentTree], edit: &BulkEdit) -> Result<BulkOutcome> {
    edit.validate()?;
    if documents.is_empty() {
        return Err(PagewrightError::Validation("no documents selected".to_string()));
    }

    let mut affected_pages = Vec::new();
    let mut updated = Vec::new();

    for (index, document) in documents.iter().enumerate() {
        let mut copy = document.clone();
        let changes = apply_edit(&mut copy, edit);
        if !changes.is_empty() {
            affected_pages.push(DocumentChange { slug: copy.slug.clone(), changes });
            updated.push((index, copy));
        }
    }

    let total_affected = affected_pages.len();
    Ok(BulkOutcome { report: BulkEditReport { dry_run: edit.dry_run, affected_pages, total_affected }, updated })
}

/// Loads the selected pages, runs the edit, and persists the result as one
/// batch unless it is a dry run.
///
/// Repeated slugs are loaded once and slugs with no stored page are
/// skipped. A storage failure during the
/// batch leaves every page unchanged.
pub async fn commit_edit<S: PageStore>(store: &S, slugs: &[String], edit: &BulkEdit) -> Result<BulkEditReport> {
    edit.validate()?;
    if slugs.is_empty() {
        return Err(PagewrightError::Validation("no documents selected".to_string()));
    }

    let mut documents = Vec::with_capacity(slugs.len());
    let mut statuses = Vec::with_capacity(slugs.len());
    let mut seen = HashSet::new();
    for slug in slugs {
        if !seen.insert(slug.as_str()) {
            continue;
        }
        match store.load(slug).await? {
            Some(page) => {
                statuses.push(page.status);
                documents.push(page.tree);
            }
            None => tracing::warn!(slug = %slug, "bulk edit skipping unknown page"),
        }
    }

    let report = if documents.is_empty() {
        BulkEditReport { dry_run: edit.dry_run, affected_pages: Vec::new(), total_affected: 0 }
    } else {
        let outcome = execute(&documents, edit)?;
        if !edit.dry_run && !outcome.updated.is_empty() {
            let batch: Vec<(ContentTree, PageStatus)> = outcome
                .updated
                .into_iter()
                .map(|(index, tree)| {
                    let status = statuses.get(index).copied().unwrap_or_default();
                    (tree, status)
                })
                .collect();
            store.save_batch(&batch).await?;
        }
        outcome.report
    };

    tracing::debug!(
        find = %edit.find,
        dry_run = edit.dry_run,
        affected = report.total_affected,
        "bulk edit finished"
    );

    Ok(report)
}
