pub mod bulk;
pub mod content;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod ingest;
pub mod keywords;
pub mod readability;
pub mod reconstruct;
pub mod scoring;
pub mod store;

pub use bulk::{BulkEdit, BulkEditReport, BulkOutcome, DocumentChange, TargetField, apply_edit, commit_edit, execute};
pub use content::{ContentNode, ContentTree, ContentValue, DocumentType, NodeKind, PageStatus, SeoMeta};
pub use error::{PagewrightError, Result};
pub use extract::{
    ExtractConfig, extract, extract_file, extract_seo_meta, extract_with_config, identity_hint_from_path, strip_tags,
};
pub use fetch::FetchConfig;
#[cfg(feature = "fetch")]
pub use fetch::fetch_url;
pub use fetch::{fetch_file, fetch_stdin, identity_hint_from_url};
pub use formatters::{JsonConfig, JsonFormatter, TextConfig, TextFormatter, format_report, report_to_json, tree_to_json};
pub use ingest::{IngestReport, SourceDocument, extract_batch, ingest_paths};
pub use keywords::{KeywordLoader, KeywordParser, KeywordSpec};
pub use reconstruct::{RenderConfig, patch, patch_file, patch_with_config, render, render_with_config, to_pascal_case};
pub use scoring::{
    AnalysisReport, CategoryScore, PenaltyRisk, ScoreConfig, Severity, Status, StuffingAlert, score, score_with_config,
};
pub use store::{MemoryStore, PageFilter, PageStore, SavedVersion, StoredPage};
