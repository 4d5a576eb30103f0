//! `quest_script` command line: lint quest scripts against lookup tables.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use log::{info, warn};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use quest_data::{LookupTables, validate_tables};
use quest_script::{
    Catalog, Diagnostic, LintConfig, Linter, Quest, QuestInfo, Severity, StaticQuestRegistry, load_tables,
};

const QUEST_EXTENSION: &str = "txt";

#[derive(Parser)]
#[command(author, version, about = "Semantic checks for quest scripts.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse quest scripts and report diagnostics.
    Lint(LintArgs),
}

#[derive(Args)]
struct LintArgs {
    /// Quest files, or directories searched recursively for `.txt` quest files.
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,
    /// TOML file with symbol shapes, action overloads and other lookup tables.
    #[arg(long, value_name = "FILE")]
    tables: Option<PathBuf>,
    /// TOML file with lint switches.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Output style.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Fail on warnings as well as errors.
    #[arg(long)]
    deny_warnings: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct FileReport<'a> {
    path: String,
    diagnostics: &'a [Diagnostic],
}

struct QuestFile {
    path: PathBuf,
    source: String,
    quest: Quest,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Lint(args) => {
            if run_lint(&args)? {
                process::exit(1);
            }
        },
    }
    Ok(())
}

/// Lint every requested file; returns true if the run should fail.
fn run_lint(args: &LintArgs) -> Result<bool> {
    let tables = match &args.tables {
        Some(path) => load_tables(path).with_context(|| format!("while loading lookup tables from {}", path.display()))?,
        None => {
            warn!("no lookup tables given; catalog-dependent checks are skipped");
            LookupTables::default()
        },
    };
    for problem in validate_tables(&tables) {
        warn!("lookup tables: {problem}");
    }
    let catalog = Catalog::new(&tables).context("while compiling lookup table templates")?;
    let config = match &args.config {
        Some(path) => LintConfig::load(path).with_context(|| format!("while loading lint config from {}", path.display()))?,
        None => LintConfig::default(),
    };

    let mut paths = Vec::new();
    for path in &args.paths {
        collect_quest_files(path, &mut paths)?;
    }
    if paths.is_empty() {
        bail!("no quest files found");
    }

    let services = catalog.services();
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let source = fs::read_to_string(&path).with_context(|| format!("while reading {}", path.display()))?;
        let identity = path.file_stem().and_then(|stem| stem.to_str());
        let quest = Quest::parse(&source, identity, &services);
        files.push(QuestFile { path, source, quest });
    }
    let registry = build_registry(&tables, &files);
    info!("linting {} files against {} known quests", files.len(), registry.len());

    let linter = Linter::new(services, config);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("while starting the async runtime")?;
    let cancellation = CancellationToken::new();

    let mut results = Vec::with_capacity(files.len());
    for file in &files {
        let diagnostics = runtime
            .block_on(linter.lint_with_registry(&file.quest, &registry, &cancellation))
            .with_context(|| format!("while linting {}", file.path.display()))?;
        results.push(diagnostics);
    }

    let count = |severity: Severity| results.iter().flatten().filter(|d| d.severity == severity).count();
    let errors = count(Severity::Error);
    let warnings = count(Severity::Warning);

    match args.format {
        OutputFormat::Json => {
            let reports: Vec<FileReport> = files
                .iter()
                .zip(&results)
                .map(|(file, diagnostics)| FileReport {
                    path: file.path.display().to_string(),
                    diagnostics,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        },
        OutputFormat::Text => {
            for (file, diagnostics) in files.iter().zip(&results) {
                for diagnostic in diagnostics {
                    print_diagnostic(&file.path, &file.source, diagnostic);
                }
            }
            let summary = format!("{} files: {errors} errors, {warnings} warnings", files.len());
            if errors > 0 {
                eprintln!("lint: {}", summary.red());
            } else if warnings > 0 {
                eprintln!("lint: {}", summary.yellow());
            } else {
                eprintln!("lint: {}", summary.green());
            }
        },
    }

    Ok(errors > 0 || (args.deny_warnings && warnings > 0))
}

/// Quests from the tables plus every linted file that declares a `Quest:` name.
fn build_registry(tables: &LookupTables, files: &[QuestFile]) -> StaticQuestRegistry {
    let mut registry = StaticQuestRegistry::new(tables.quests.iter().map(QuestInfo::from));
    for file in files {
        let Some(declared) = file.quest.preamble.quest_name() else {
            continue;
        };
        registry.insert(QuestInfo {
            name: declared.content().to_string(),
            source: file.quest.name.clone(),
            display_name: file
                .quest
                .preamble
                .directive("DisplayName")
                .map(|d| d.content().to_string()),
        });
    }
    registry
}

fn collect_quest_files(path: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    if !path.is_dir() {
        out.push(path.to_path_buf());
        return Ok(());
    }
    let mut entries: Vec<PathBuf> = fs::read_dir(path)
        .with_context(|| format!("while listing {}", path.display()))?
        .flatten()
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    for entry in entries {
        if entry.is_dir() {
            collect_quest_files(&entry, out)?;
        } else if entry
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(QUEST_EXTENSION))
        {
            out.push(entry);
        }
    }
    Ok(())
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
        Severity::Information => "info".blue().bold(),
        Severity::Hint => "hint".cyan(),
    }
}

fn print_diagnostic(path: &Path, source: &str, diagnostic: &Diagnostic) {
    let start = diagnostic.range.start;
    let end = diagnostic.range.end;
    println!(
        "{}:{}:{}: {}[{}]: {}",
        path.display(),
        start.line + 1,
        start.character + 1,
        severity_label(diagnostic.severity),
        diagnostic.code,
        diagnostic.message
    );
    if let Some(line) = source.lines().nth(start.line) {
        let width = if end.line == start.line {
            end.character.saturating_sub(start.character)
        } else {
            line.len().saturating_sub(start.character)
        };
        println!("  {line}");
        println!("  {}{}", " ".repeat(start.character), "^".repeat(width.max(1)).bright_red());
    }
    for related in diagnostic.related.iter().filter(|r| **r != diagnostic.range) {
        println!(
            "  {} {}:{}:{}",
            "also here:".dimmed(),
            path.display(),
            related.start.line + 1,
            related.start.character + 1
        );
    }
}
