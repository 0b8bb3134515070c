use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let path_arg = |name: &'static str, help: &'static str| {
        clap::Arg::new(name)
            .help(help)
            .value_parser(clap::value_parser!(PathBuf))
    };
    let output_arg = clap::arg!(-o --output <FILE> "Output file (default: stdout)")
        .value_parser(clap::value_parser!(PathBuf));
    let long_arg = |id: &'static str, long: &'static str, value: &'static str, help: &'static str| {
        clap::Arg::new(id).long(long).value_name(value).help(help)
    };

    let mut cmd = clap::Command::new("pagewright")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Pagewright Contributors")
        .about("Extract, score and rewrite page content from JSX-like markup")
        .arg(clap::arg!(-v --verbose "Print progress to stderr").global(true))
        .subcommand(
            clap::Command::new("extract")
                .about("Extract content trees from page sources")
                .arg(clap::arg!(<INPUT> ... "Source files, http(s) URLs, or '-' for stdin"))
                .arg(clap::arg!(-o --output <DIR> "Write one <slug>.json per input into this directory")
                    .value_parser(clap::value_parser!(PathBuf)))
                .arg(clap::arg!(--name <NAME> "Identity hint for stdin input").default_value("stdin"))
                .arg(long_arg("min_paragraph_chars", "min-paragraph-chars", "NUM",
                    "Paragraphs at or below this many characters are skipped")
                    .default_value("50"))
                .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
                .arg(long_arg("user_agent", "user-agent", "UA", "Custom User-Agent for HTTP requests")),
        )
        .subcommand(
            clap::Command::new("analyze")
                .about("Score a content tree (JSON) or page source against target keywords")
                .arg(clap::arg!(<TREE_OR_SOURCE> "Tree JSON file, page source file, or '-' for stdin"))
                .arg(clap::arg!(-k --keyword <KEYWORD> ... "Target keyword (repeatable)"))
                .arg(long_arg("keywords_file", "keywords-file", "FILE", "Keyword file")
                    .value_parser(clap::value_parser!(PathBuf)))
                .arg(long_arg("config_dir", "config-dir", "DIR", "Directory searched for keywords.txt")
                    .value_parser(clap::value_parser!(PathBuf)))
                .arg(clap::arg!(-f --format <FORMAT> "Output format (text, json)")
                    .default_value("text")
                    .value_parser(["text", "json"]))
                .arg(clap::arg!(--width <COLS> "Wrap suggestions at this width").default_value("0")),
        )
        .subcommand(
            clap::Command::new("render")
                .about("Regenerate a page component from a content tree")
                .arg(path_arg("TREE", "Tree JSON file").required(true))
                .arg(output_arg.clone()),
        )
        .subcommand(
            clap::Command::new("patch")
                .about("Apply an edited content tree to an existing page source")
                .arg(path_arg("ORIGINAL", "Original page source").required(true))
                .arg(path_arg("TREE", "Edited tree JSON file").required(true))
                .arg(output_arg),
        )
        .subcommand(
            clap::Command::new("bulk")
                .about("Find and replace literal text across content trees")
                .arg(clap::arg!(--find <TEXT> "Literal text to find").required(true))
                .arg(clap::arg!(--replace <TEXT> "Replacement text").default_value(""))
                .arg(clap::arg!(--field <FIELD> ... "Field group to edit").value_parser(["content", "seo-meta"]))
                .arg(clap::arg!(--commit "Write the edited trees back"))
                .arg(path_arg("TREE", "Tree JSON files").required(true).num_args(1..)),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "pagewright", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "pagewright", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "pagewright", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "pagewright", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
