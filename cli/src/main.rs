//! pdf-outline CLI - outline extraction and section ranking

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use pdf_outline::render::write_json_atomic;
use pdf_outline::{
    Embedder, EmbedderConfig, EmbeddingProvider, JsonFormat, OutlineExtractor, OutlineOptions,
    PageSelection, RankOptions, RankingPipeline, RankingRequest, ReadOptions, ReaderRegistry,
};

/// Request file expected in every collection directory.
const REQUEST_FILE: &str = "challenge1b_input.json";
/// Result file written next to the request.
const RESULT_FILE: &str = "challenge1b_output.json";
/// Document subdirectory of a collection.
const DOCUMENT_DIR: &str = "PDFs";

type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "pdf-outline")]
#[command(version)]
#[command(about = "Extract PDF outlines and rank sections for a persona", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Embedding backend ("hashing" or "onnx")
    #[arg(long, global = true, env = "PDF_OUTLINE_EMBEDDER", default_value = "hashing")]
    embedder: EmbeddingProvider,

    /// Directory with model.onnx and tokenizer.json for the onnx backend
    #[arg(long, global = true, env = "PDF_OUTLINE_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Embedding vector dimension
    #[arg(long, global = true, env = "PDF_OUTLINE_EMBED_DIM", default_value = "384")]
    embed_dim: usize,

    /// Number of worker threads (defaults to one per core)
    #[arg(short, long, global = true, env = "PDF_OUTLINE_JOBS")]
    jobs: Option<usize>,

    /// Skip unreadable pages instead of failing the document
    #[arg(long, global = true)]
    lenient: bool,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long, global = true)]
    pages: Option<String>,

    /// Number of sections kept per ranking request
    #[arg(long, global = true, env = "PDF_OUTLINE_TOP_N", default_value = "5")]
    top_n: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a title and heading outline for every document in a directory
    Outline {
        /// Directory of PDF or layout JSON files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory for the outline JSON files
        #[arg(value_name = "OUTPUT_DIR", default_value = "output")]
        output: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Rank the sections of one collection against its request
    Rank {
        /// Collection directory holding the request file and a PDFs/ folder
        #[arg(value_name = "COLLECTION_DIR")]
        collection: PathBuf,
    },

    /// Rank every collection under a base directory
    Collections {
        /// Directory containing collection* subdirectories
        #[arg(value_name = "BASE_DIR", default_value = ".")]
        base: PathBuf,
    },

    /// Show layout statistics for one document
    Inspect {
        /// Input PDF or layout JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        cmd_version();
        return;
    }

    let pool = match build_pool(cli.global.jobs) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    };

    let mut config = EmbedderConfig::new()
        .with_provider(cli.global.embedder)
        .with_dimension(cli.global.embed_dim);
    if let Some(dir) = &cli.global.model_dir {
        config = config.with_model_dir(dir);
    }
    let embedder = match config.build() {
        Ok(embedder) => embedder,
        Err(e) => {
            eprintln!("{}: {}", "Embedder initialization failed".red().bold(), e);
            std::process::exit(1);
        }
    };

    let result = pool.install(|| match &cli.command {
        Commands::Outline {
            input,
            output,
            compact,
        } => cmd_outline(input, output, *compact, &cli.global, embedder),
        Commands::Rank { collection } => {
            cmd_rank(collection, &cli.global, embedder).map(|_| ())
        }
        Commands::Collections { base } => cmd_collections(base, &cli.global, embedder),
        Commands::Inspect { input } => cmd_inspect(input, &cli.global, embedder),
        Commands::Version => Ok(()),
    });

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_pool(jobs: Option<usize>) -> CliResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = jobs {
        builder = builder.num_threads(jobs);
    }
    Ok(builder.build()?)
}

fn read_options(global: &GlobalArgs) -> CliResult<ReadOptions> {
    let mut options = ReadOptions::new();
    if global.lenient {
        options = options.lenient();
    }
    if let Some(p) = &global.pages {
        let pages = PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?;
        options = options.with_pages(pages);
    }
    Ok(options)
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

/// Readable documents directly inside `dir`, sorted by name.
fn list_documents(dir: &Path, registry: &ReaderRegistry) -> CliResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && registry.supports_path(path))
        .collect();
    files.sort();
    Ok(files)
}

fn cmd_outline(
    input: &Path,
    output: &Path,
    compact: bool,
    global: &GlobalArgs,
    embedder: Arc<dyn Embedder>,
) -> CliResult<()> {
    let registry = ReaderRegistry::with_defaults();
    let options = read_options(global)?;
    let extractor = OutlineExtractor::new(embedder, OutlineOptions::default())?;
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let files = list_documents(input, &registry)?;
    if files.is_empty() {
        println!(
            "{} {}",
            "No supported documents in".yellow(),
            input.display()
        );
        return Ok(());
    }
    fs::create_dir_all(output)?;

    let pb = progress_bar(files.len());

    let outcomes: Vec<pdf_outline::Result<()>> = files
        .par_iter()
        .map(|path| {
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            let stem = path.file_stem().unwrap_or_default().to_string_lossy();
            let target = output.join(format!("{}.json", stem));

            let outcome = registry
                .read(path, &options)
                .and_then(|doc| extractor.extract(&doc))
                .and_then(|outline| write_json_atomic(&target, &outline, format));

            match &outcome {
                Ok(()) => log::info!("Wrote outline for {}", name),
                Err(e) => pb.println(format!("{} {}: {}", "Skipped".yellow(), name, e)),
            }
            pb.set_message(name.to_string());
            pb.inc(1);
            outcome
        })
        .collect();

    pb.finish_with_message("Done!");

    let mut failed = 0;
    for err in outcomes.into_iter().filter_map(Result::err) {
        if err.is_fatal() {
            return Err(err.into());
        }
        failed += 1;
    }
    println!(
        "\n{} {} of {} documents -> {}",
        "Outlined".green().bold(),
        files.len() - failed,
        files.len(),
        output.display()
    );
    Ok(())
}

fn cmd_rank(
    collection: &Path,
    global: &GlobalArgs,
    embedder: Arc<dyn Embedder>,
) -> CliResult<PathBuf> {
    let request_path = collection.join(REQUEST_FILE);
    let request = RankingRequest::from_json(&fs::read_to_string(&request_path)?)?;

    let pipeline = RankingPipeline::new(embedder, RankOptions::new().with_top_n(global.top_n))
        .with_read_options(read_options(global)?);

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Ranking {}...", collection.display()));
    let result = pipeline.run(&request, &collection.join(DOCUMENT_DIR))?;
    pb.finish_and_clear();

    let target = collection.join(RESULT_FILE);
    write_json_atomic(&target, &result, JsonFormat::Pretty)?;

    println!("{} {}", "Saved to".green(), target.display());
    let last = result.extracted_sections.len().saturating_sub(1);
    for (i, section) in result.extracted_sections.iter().enumerate() {
        let branch = if i == last { "└─" } else { "├─" };
        println!(
            "  {} #{} {} ({}, p.{})",
            branch.dimmed(),
            section.importance_rank,
            section.section_title,
            section.document.dimmed(),
            section.page_number
        );
    }
    Ok(target)
}

/// Subdirectories of `base` whose name starts with "collection", sorted.
fn list_collections(base: &Path) -> CliResult<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(base)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_lowercase().starts_with("collection"))
                    .unwrap_or(false)
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn cmd_collections(
    base: &Path,
    global: &GlobalArgs,
    embedder: Arc<dyn Embedder>,
) -> CliResult<()> {
    let collections = list_collections(base)?;
    if collections.is_empty() {
        println!("{} {}", "No collections found in".yellow(), base.display());
        return Ok(());
    }

    let mut done = 0;
    for dir in &collections {
        if !dir.join(REQUEST_FILE).is_file() {
            println!(
                "{} {} (no {})",
                "Skipped".yellow(),
                dir.display(),
                REQUEST_FILE
            );
            continue;
        }
        match cmd_rank(dir, global, embedder.clone()) {
            Ok(_) => done += 1,
            Err(e) => {
                if let Some(err) = e.downcast_ref::<pdf_outline::Error>() {
                    if err.is_fatal() {
                        return Err(e);
                    }
                }
                eprintln!("{} {}: {}", "Failed".red(), dir.display(), e);
            }
        }
    }

    println!(
        "\n{} {} of {} collections",
        "Done!".green().bold(),
        done,
        collections.len()
    );
    Ok(())
}

fn cmd_inspect(
    input: &Path,
    global: &GlobalArgs,
    embedder: Arc<dyn Embedder>,
) -> CliResult<()> {
    let doc = ReaderRegistry::with_defaults().read(input, &read_options(global)?)?;
    let extractor = OutlineExtractor::new(embedder, OutlineOptions::default())?;
    let profile = extractor.profile(&doc);

    println!("{}", "Document Layout".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), profile.pages);
    println!("{}: {}", "Words".bold(), profile.words);
    println!("{}: {}", "Lines".bold(), profile.lines);
    match profile.body_style {
        Some(style) => println!("{}: {}", "Body style".bold(), style),
        None => println!("{}: {}", "Body style".bold(), "none".dimmed()),
    }
    if !profile.title.is_empty() {
        println!("{}: {}", "Title".bold(), profile.title);
    }
    println!("{}: {}", "Heading candidates".bold(), profile.heading_candidates);

    let outline = extractor.extract(&doc)?;
    if !outline.outline.is_empty() {
        println!();
        println!("{}", "Outline".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for entry in &outline.outline {
            let indent = "  ".repeat(entry.level.depth().saturating_sub(1) as usize);
            println!(
                "{}{} {} {}",
                indent,
                entry.level.to_string().dimmed(),
                entry.text,
                format!("p.{}", entry.page).dimmed()
            );
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf-outline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outline extraction and persona-aware section ranking");
    println!();
    println!("License: MIT");
}
