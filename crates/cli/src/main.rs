mod echo;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use pagewright_core::{
    BulkEdit, ContentTree, ExtractConfig, FetchConfig, JsonConfig, JsonFormatter, KeywordLoader, KeywordParser,
    KeywordSpec, TargetField, TextConfig, TextFormatter, execute, extract, extract_with_config, fetch_stdin, fetch_url,
    identity_hint_from_path, identity_hint_from_url, patch_file, render, score, tree_to_json,
};

use crate::echo::{
    format_size, print_banner, print_detail, print_info, print_score_summary, print_step, print_success, print_warning,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for analysis reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

/// Extract, score, regenerate and bulk-edit page content
#[derive(Parser, Debug)]
#[command(name = "pagewright")]
#[command(author = "Pagewright Contributors")]
#[command(version)]
#[command(about = "Extract, score and rewrite page content from JSX-like markup", long_about = None)]
struct Cli {
    /// Print progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract content trees from page sources
    Extract {
        /// Source files, http(s) URLs, or "-" for stdin
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<String>,

        /// Write one <slug>.json per input into this directory (default: stdout)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Identity hint for stdin input
        #[arg(long, default_value = "stdin", value_name = "NAME")]
        name: String,

        /// Paragraphs at or below this many characters are skipped
        #[arg(long, default_value = "50", value_name = "NUM")]
        min_paragraph_chars: usize,

        /// HTTP timeout in seconds
        #[arg(long, default_value = "30", value_name = "SECS")]
        timeout: u64,

        /// Custom User-Agent for HTTP requests
        #[arg(long, value_name = "UA")]
        user_agent: Option<String>,
    },

    /// Score a content tree (JSON) or page source against target keywords
    Analyze {
        /// Tree JSON file, page source file, or "-" for stdin
        #[arg(value_name = "TREE_OR_SOURCE")]
        input: String,

        /// Target keyword (repeatable)
        #[arg(short = 'k', long = "keyword", value_name = "KEYWORD")]
        keywords: Vec<String>,

        /// Keyword file (`keyword | priority` per line)
        #[arg(long, value_name = "FILE")]
        keywords_file: Option<PathBuf>,

        /// Directory searched for keywords.txt before ~/.config/pagewright
        #[arg(long, value_name = "DIR")]
        config_dir: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text", value_name = "FORMAT")]
        format: ReportFormat,

        /// Wrap suggestions at this width (0 = no wrapping)
        #[arg(long, default_value = "0", value_name = "COLS")]
        width: usize,
    },

    /// Regenerate a page component from a content tree
    Render {
        /// Tree JSON file
        #[arg(value_name = "TREE")]
        tree: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Apply an edited content tree to an existing page source
    Patch {
        /// Original page source; rendered from scratch if missing
        #[arg(value_name = "ORIGINAL")]
        original: PathBuf,

        /// Edited tree JSON file
        #[arg(value_name = "TREE")]
        tree: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Find and replace literal text across content trees
    Bulk {
        /// Literal text to find
        #[arg(long, value_name = "TEXT")]
        find: String,

        /// Replacement text
        #[arg(long, default_value = "", value_name = "TEXT")]
        replace: String,

        /// Field group to edit: content, seo-meta (repeatable)
        #[arg(long = "field", value_name = "FIELD", default_values = ["content", "seo-meta"])]
        fields: Vec<TargetField>,

        /// Write the edited trees back (default: dry run)
        #[arg(long)]
        commit: bool,

        /// Tree JSON files
        #[arg(value_name = "TREE", required = true)]
        trees: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        print_banner();
    }

    match cli.command {
        Command::Extract { inputs, output, name, min_paragraph_chars, timeout, user_agent } => {
            let mut fetch_config = FetchConfig { timeout, ..Default::default() };
            if let Some(user_agent) = user_agent {
                fetch_config.user_agent = user_agent;
            }
            let config = ExtractConfig { min_paragraph_chars };
            run_extract(&inputs, output.as_deref(), &name, &config, &fetch_config, cli.verbose).await
        }
        Command::Analyze { input, keywords, keywords_file, config_dir, format, width } => {
            let keywords = load_keywords(keywords, keywords_file.as_deref(), config_dir.as_deref(), cli.verbose)?;
            run_analyze(&input, &keywords, format, width, cli.verbose)
        }
        Command::Render { tree, output } => {
            let tree = read_tree(&tree)?;
            write_output(output.as_deref(), &render(&tree), cli.verbose)
        }
        Command::Patch { original, tree, output } => {
            let tree = read_tree(&tree)?;
            if cli.verbose && !original.exists() {
                print_warning(&format!("{} not found, rendering from tree", original.display()));
            }
            let patched =
                patch_file(&original, &tree).with_context(|| format!("Failed to patch {}", original.display()))?;
            write_output(output.as_deref(), &patched, cli.verbose)
        }
        Command::Bulk { find, replace, fields, commit, trees } => {
            let edit = BulkEdit::new(find, replace, fields).dry_run(!commit);
            run_bulk(&trees, &edit, cli.verbose)
        }
    }
}

/// Reads one source and returns it with its identity hint
async fn read_source(input: &str, stdin_name: &str, fetch_config: &FetchConfig) -> anyhow::Result<(String, String)> {
    if input == "-" {
        let source = fetch_stdin().context("Failed to read from stdin")?;
        Ok((source, stdin_name.to_string()))
    } else if input.starts_with("http://") || input.starts_with("https://") {
        let url = url::Url::parse(input).with_context(|| format!("Invalid URL: {}", input))?;
        let source = fetch_url(input, fetch_config).await.with_context(|| format!("Failed to fetch {}", input))?;
        Ok((source, identity_hint_from_url(&url)))
    } else {
        let path = Path::new(input);
        let source = fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", input))?;
        Ok((source, identity_hint_from_path(path)))
    }
}

async fn run_extract(
    inputs: &[String], output: Option<&Path>, stdin_name: &str, config: &ExtractConfig, fetch_config: &FetchConfig,
    verbose: bool,
) -> anyhow::Result<()> {
    if let Some(dir) = output {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    let total = inputs.len();
    let mut successful = 0;

    for (step, input) in inputs.iter().enumerate() {
        if verbose {
            print_step(step + 1, total, &format!("Extracting {}", input.bright_white()));
        }

        let (source, hint) = match read_source(input, stdin_name, fetch_config).await {
            Ok(read) => read,
            Err(e) => {
                print_warning(&format!("{:#}", e));
                continue;
            }
        };

        let tree = extract_with_config(&source, &hint, config);
        if verbose {
            print_detail("Size", &format_size(source.len()));
            print_detail("Nodes", &tree.nodes.len().to_string());
            print_detail("Type", tree.document_type.as_str());
        }

        let json = JsonFormatter::new(JsonConfig { pretty: true }).tree(&tree).context("Failed to serialize tree")?;
        match output {
            Some(dir) => {
                let path = dir.join(format!("{}.json", tree.slug));
                fs::write(&path, json).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            }
            None => println!("{}", json),
        }
        successful += 1;
    }

    eprintln!("Extracted {}/{} sources", successful, total);
    if successful == 0 {
        bail!("No sources could be extracted");
    }

    Ok(())
}

/// Keyword file (explicit or discovered) first, then `-k` keywords
fn load_keywords(
    keywords: Vec<String>, keywords_file: Option<&Path>, config_dir: Option<&Path>, verbose: bool,
) -> anyhow::Result<KeywordSpec> {
    let mut spec = match keywords_file {
        Some(path) => KeywordParser::parse_file(path)
            .with_context(|| format!("Failed to load keywords from {}", path.display()))?,
        None if keywords.is_empty() => {
            let loader = match config_dir {
                Some(dir) => KeywordLoader::default().custom_dir(dir),
                None => KeywordLoader::default(),
            };
            if verbose && let Some(path) = loader.find() {
                print_info(&format!("Using keywords from {}", path.display()));
            }
            loader.load().context("Failed to load keyword file")?
        }
        None => KeywordSpec::default(),
    };

    for keyword in keywords {
        spec.push(keyword);
    }

    if verbose {
        print_detail("Keywords", &spec.as_slice().join(", "));
    }

    Ok(spec)
}

/// A tree JSON document, or page source extracted on the fly
fn load_tree_or_source(input: &str) -> anyhow::Result<ContentTree> {
    let (source, hint) = if input == "-" {
        (fetch_stdin().context("Failed to read from stdin")?, "stdin".to_string())
    } else {
        let path = Path::new(input);
        let source = fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", input))?;
        (source, identity_hint_from_path(path))
    };

    if source.trim_start().starts_with('{') {
        serde_json::from_str(&source).with_context(|| format!("Failed to parse content tree: {}", input))
    } else {
        Ok(extract(&source, &hint))
    }
}

fn run_analyze(input: &str, keywords: &KeywordSpec, format: ReportFormat, width: usize, verbose: bool) -> anyhow::Result<()> {
    let tree = load_tree_or_source(input)?;
    let report = score(&tree, keywords);

    if verbose {
        print_score_summary(&report);
    }

    let output = match format {
        ReportFormat::Text => TextFormatter::new(TextConfig { line_width: width, ..Default::default() }).format(&report),
        ReportFormat::Json => {
            JsonFormatter::new(JsonConfig { pretty: true }).report(&report).context("Failed to serialize report")?
        }
    };
    println!("{}", output);

    Ok(())
}

fn read_tree(path: &Path) -> anyhow::Result<ContentTree> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse content tree: {}", path.display()))
}

fn write_output(output: Option<&Path>, content: &str, verbose: bool) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            if verbose {
                print_success(&format!("Output written to {}", path.display().bright_white()));
            }
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn run_bulk(paths: &[PathBuf], edit: &BulkEdit, verbose: bool) -> anyhow::Result<()> {
    let documents: Vec<(PathBuf, ContentTree)> = paths
        .iter()
        .map(|path| read_tree(path).map(|tree| (path.clone(), tree)))
        .collect::<anyhow::Result<_>>()?;
    let trees: Vec<ContentTree> = documents.iter().map(|(_, tree)| tree.clone()).collect();

    let outcome = execute(&trees, edit)?;
    let report = JsonFormatter::new(JsonConfig { pretty: true }).value(&outcome.report);
    println!("{}", report.context("Failed to serialize report")?);

    if edit.dry_run {
        if verbose {
            print_info(&format!("Dry run: {} tree(s) would change", outcome.report.total_affected));
        }
        return Ok(());
    }

    let writes: Vec<(&Path, &ContentTree)> = outcome
        .updated
        .iter()
        .filter_map(|(index, tree)| documents.get(*index).map(|(path, _)| (path.as_path(), tree)))
        .collect();

    commit_files(&writes)?;

    if verbose {
        print_success(&format!("Updated {} tree file(s)", writes.len()));
    }

    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{}.pagewright-tmp", name))
}

/// Writes every tree to a temporary sibling, then renames them all into
/// place. A failed write removes the temporaries and leaves every file as
/// it was.
fn commit_files(writes: &[(&Path, &ContentTree)]) -> anyhow::Result<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(writes.len());

    for &(path, tree) in writes {
        let temp = temp_sibling(path);
        let result = tree_to_json(tree, true)
            .map_err(anyhow::Error::from)
            .and_then(|json| fs::write(&temp, json).map_err(anyhow::Error::from));

        if let Err(e) = result {
            let _ = fs::remove_file(&temp);
            for (staged_temp, _) in &staged {
                let _ = fs::remove_file(staged_temp);
            }
            return Err(e.context(format!("Failed to write {}; no files were changed", path.display())));
        }
        staged.push((temp, path));
    }

    for (temp, path) in staged {
        fs::rename(&temp, path).with_context(|| format!("Failed to replace {}", path.display()))?;
    }

    Ok(())
}
