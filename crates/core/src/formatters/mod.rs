pub mod json;
pub mod text;

pub use json::{JsonConfig, JsonFormatter, report_to_json, tree_to_json};
pub use text::{TextConfig, TextFormatter, format_report};
