use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bootc_core::{CompilerConfig, lex_file, lex_source, render_token_tree};
use clap::Parser;
use walkdir::WalkDir;

const SOURCE_EXTENSION: &str = "boot";

/// Lex bootc sources and print their token trees.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "PATH",
        help = "Source file, or a directory searched for .boot files (defaults to stdin)"
    )]
    input: Option<String>,

    #[arg(
        short,
        long,
        value_name = "PATH",
        help = "Where to write the token tree (defaults to stdout)"
    )]
    output: Option<String>,

    #[arg(long, help = "Also log the token tree to stderr")]
    dump_tokens: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_logging(config.debug_tokenizer || config.debug_asm);
    execute(cli, &config)
}

/// Environment flags, with `--dump-tokens` layered on top.
fn build_config(cli: &Cli) -> CompilerConfig {
    let mut config = CompilerConfig::from_env();
    config.debug_tokenizer |= cli.dump_tokens;
    config
}

fn init_logging(dump: bool) {
    let default_filter = if dump { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn execute(cli: Cli, config: &CompilerConfig) -> Result<()> {
    let mut rendered = String::new();
    match cli.input {
        Some(path) => {
            for file in collect_sources(Path::new(&path))? {
                let tree = lex_file(&file, config)
                    .with_context(|| format!("failed to lex {}", file.display()))?;
                rendered.push_str(&render_token_tree(&tree));
            }
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            let tree = lex_source("<stdin>", &buffer, config).context("failed to lex <stdin>")?;
            rendered.push_str(&render_token_tree(&tree));
        }
    }

    write_output(cli.output.as_deref(), rendered.as_bytes())
}

/// The input file itself, or every source file below a directory in sorted order.
fn collect_sources(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
            files.push(path.to_path_buf());
        }
    }
    log::debug!("found {} source files under {}", files.len(), root.display());
    Ok(files)
}

fn write_output(path: Option<&str>, bytes: &[u8]) -> Result<()> {
    let Some(path) = path else {
        io::stdout().write_all(bytes)?;
        return Ok(());
    };
    if let Some(parent) = PathBuf::from(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {parent:?}"))?;
        }
    }
    fs::write(path, bytes).with_context(|| format!("failed to write output file {path}"))?;
    Ok(())
}
