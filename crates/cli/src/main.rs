use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use codesplit_core::{
    CodeSplitter, ErrorReport, KeywordClassifier, LanguageClassifier, SplitRequest, SplitterConfig,
    SplitterError,
};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "codesplit")]
#[command(about = "Split large source files into structure-aware chunks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Preferred maximum chunk size in characters (overrides MAX_CHUNK_SIZE)
    #[arg(long, global = true)]
    max_chunk_size: Option<usize>,

    /// Directory used as object store for `sourceKey` requests
    #[arg(long, global = true, env = "CODESPLIT_STORE_DIR")]
    store_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split code described by a JSON request, or a single file
    Split(SplitArgs),

    /// Print the language tag the keyword classifier assigns
    #[command(name = "detect-language")]
    DetectLanguage(DetectArgs),
}

#[derive(Args)]
struct SplitArgs {
    /// Inline JSON request (reads stdin when no input flag is given)
    #[arg(long, conflicts_with_all = ["request_file", "code_file"])]
    json: Option<String>,

    /// Path to file containing a JSON request
    #[arg(long, conflicts_with = "code_file")]
    request_file: Option<PathBuf>,

    /// Split this source file directly instead of reading a JSON request
    #[arg(long, requires = "analysis_id")]
    code_file: Option<PathBuf>,

    /// Analysis id for --code-file
    #[arg(long)]
    analysis_id: Option<String>,

    /// Language tag for --code-file (classified from content when omitted)
    #[arg(long)]
    language: Option<String>,

    /// Request id recorded in the summary metadata
    #[arg(long)]
    request_id: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct DetectArgs {
    /// Source file to classify (reads stdin when omitted)
    #[arg(long)]
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Split(ref args) => run_split(&cli, args),
        Commands::DetectLanguage(ref args) => run_detect(args),
    }
}

fn build_splitter(cli: &Cli) -> codesplit_core::Result<CodeSplitter> {
    let mut config = SplitterConfig::from_env().map_err(SplitterError::invalid_config)?;
    if let Some(limit) = cli.max_chunk_size {
        config = config.with_max_chunk_size(limit);
    }
    if let Some(dir) = &cli.store_dir {
        config = config.with_store_dir(dir);
    }

    let splitter = CodeSplitter::new(config)?;
    log::debug!("Splitting with limit {}", splitter.config().max_chunk_size);
    Ok(splitter)
}

fn run_split(cli: &Cli, args: &SplitArgs) -> Result<()> {
    let outcome = build_splitter(cli).and_then(|splitter| {
        let request = read_request(args)?;
        log::info!(
            "Split invoked for analysis {}",
            request.analysis_id.as_deref().unwrap_or("<missing>")
        );
        splitter.process(&request)
    });

    match outcome {
        Ok(summary) => print_json(&summary, args.pretty),
        Err(err) => {
            log::error!("Error in split: {err}");
            print_json(&ErrorReport::from(&err), args.pretty)?;
            std::process::exit(1);
        }
    }
}

fn read_request(args: &SplitArgs) -> codesplit_core::Result<SplitRequest> {
    if let Some(path) = &args.code_file {
        let code = read_source_file(path)?;
        return Ok(SplitRequest {
            analysis_id: args.analysis_id.clone(),
            code: Some(code),
            language: args.language.clone(),
            request_id: args.request_id.clone(),
            ..Default::default()
        });
    }

    let raw = if let Some(raw) = &args.json {
        raw.clone()
    } else if let Some(path) = &args.request_file {
        read_source_file(path)?
    } else {
        read_stdin()?
    };

    let mut request = SplitRequest::from_json(&raw)?;
    if args.request_id.is_some() {
        request.request_id = args.request_id.clone();
    }
    Ok(request)
}

fn run_detect(args: &DetectArgs) -> Result<()> {
    let code = match &args.file {
        Some(path) => read_source_file(path)?,
        None => read_stdin()?,
    };
    let language = KeywordClassifier::new().classify(&code);
    println!("{language}");
    Ok(())
}

fn read_source_file(path: &Path) -> codesplit_core::Result<String> {
    fs::read_to_string(path).map_err(|e| SplitterError::retrieval(path.display().to_string(), e))
}

fn read_stdin() -> codesplit_core::Result<String> {
    let mut raw = String::new();
    io::stdin()
        .read_to_string(&mut raw)
        .map_err(|e| SplitterError::retrieval("<stdin>", e))?;
    Ok(raw)
}

fn print_json(value: &impl Serialize, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}
