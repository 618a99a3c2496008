//! Resume Editor CLI tool
//!
//! A command-line tool for moving a resume header between resume revisions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use resume_editor::layout::PaperSize;
use resume_editor::naming::{output_base, HEADER_PREFIX, OUTPUT_PREFIX};
use resume_editor::pdf::{
    extract_header, inspect, merge_header, ExtractOptions, MergeOptions,
    DEFAULT_HEADER_SCALE, DEFAULT_VERTICAL_OFFSET,
};
use resume_editor::reflow::Pdftocairo;

/// Log file written in the working directory, truncated on every run
const LOG_FILE: &str = "resume_editor_logfile.log";

/// Resume Editor - swap the header of a resume at any time
#[derive(Parser)]
#[command(name = "resume-editor")]
#[command(author, about, long_about = None, disable_version_flag = true)]
#[command(after_help = "EXAMPLES:
    # Pull the header off an old one-page resume
    resume-editor extract-header old.pdf 1

    # Put it on top of a new two-page resume
    resume-editor merge-resume header_1_old.pdf new.pdf 2 -o final.pdf

    # Both steps at once
    resume-editor complete old.pdf new.pdf 1")]
struct Cli {
    /// Silence terminal output (the log file is still written)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print version information and exit
    #[arg(short = 'v', long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the header from a previous resume
    ExtractHeader {
        /// Resume that contains the header
        resume: PathBuf,

        /// Number of pages in the resume (1 or 2)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=2))]
        pages: u32,

        /// Output PDF file (default: header_<pages>_<resume>.pdf)
        #[arg(short, long, value_name = "FILE")]
        output_file: Option<String>,

        /// Paper size the cropped header is re-flowed onto
        #[arg(long, default_value_t = PaperSize::A4)]
        paper: PaperSize,
    },

    /// Put a header on top of the first page of a resume
    MergeResume {
        /// File that contains the header
        header: PathBuf,

        /// File that contains the resume content and no header
        resume: PathBuf,

        /// Number of pages in the resume (1 or 2)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=2))]
        pages: u32,

        /// Output PDF file (default: output_<pages>_<resume>.pdf)
        #[arg(short, long, value_name = "FILE")]
        output_file: Option<String>,

        /// Scale applied to the header
        #[arg(long, default_value_t = DEFAULT_HEADER_SCALE)]
        header_scale: f32,

        /// Distance the page's lower edge is lowered after merging
        #[arg(long, default_value_t = DEFAULT_VERTICAL_OFFSET)]
        vertical_offset: f32,
    },

    /// Extract the header from one resume and merge it onto another
    Complete {
        /// Resume that contains the header
        header_source: PathBuf,

        /// File that contains the resume content and no header
        resume: PathBuf,

        /// Number of pages in the resume (1 or 2)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=2))]
        pages: u32,

        /// Output PDF file (default: output_<pages>_<resume>.pdf)
        #[arg(short, long, value_name = "FILE")]
        output_file: Option<String>,

        /// Paper size the cropped header is re-flowed onto
        #[arg(long, default_value_t = PaperSize::A4)]
        paper: PaperSize,

        /// Scale applied to the header
        #[arg(long, default_value_t = DEFAULT_HEADER_SCALE)]
        header_scale: f32,

        /// Distance the page's lower edge is lowered after merging
        #[arg(long, default_value_t = DEFAULT_VERTICAL_OFFSET)]
        vertical_offset: f32,
    },

    /// Show page count and first-page boxes of a PDF
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },

    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

fn main() {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", version_string());
        return;
    }

    if let Err(e) = init_logging(cli.quiet) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }

    let result = match cli.command {
        Some(Commands::ExtractHeader { resume, pages, output_file, paper }) => {
            cmd_extract(resume, pages, output_file, paper).map(drop)
        }
        Some(Commands::MergeResume {
            header, resume, pages, output_file, header_scale, vertical_offset,
        }) => {
            cmd_merge(header, resume, pages, output_file, header_scale, vertical_offset).map(drop)
        }
        Some(Commands::Complete {
            header_source, resume, pages, output_file, paper, header_scale, vertical_offset,
        }) => {
            cmd_complete(
                header_source, resume, pages, output_file, paper, header_scale, vertical_offset,
            )
            .map(drop)
        }
        Some(Commands::Info { input }) => {
            cmd_info(input)
        }
        Some(Commands::Unknown(args)) => {
            let name = args.first().map(String::as_str).unwrap_or("None");
            error!("{} is not a valid command", name);
            Ok(())
        }
        None => {
            error!("None is not a valid command");
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        // Without --quiet the stderr layer has already shown it
        if cli.quiet {
            eprintln!("Error: {:#}", e);
        }
        process::exit(1);
    }
}

fn version_string() -> String {
    format!(
        "{} {}\n   built for {}-{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::ARCH,
        std::env::consts::OS
    )
}

/// Log to a fresh log file, and to stderr unless quiet
fn init_logging(quiet: bool) -> Result<()> {
    let file = File::create(LOG_FILE)
        .with_context(|| format!("Failed to create log file {}", LOG_FILE))?;

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file));
    let console_layer = (!quiet).then(|| fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(())
}

/// Extract a header PDF from a resume
fn cmd_extract(
    resume: PathBuf,
    pages: u32,
    output_file: Option<String>,
    paper: PaperSize,
) -> Result<PathBuf> {
    let output_base = output_base(output_file.as_deref(), HEADER_PREFIX, pages, &resume)?;
    let reflower = Pdftocairo::locate()?;

    let options = ExtractOptions {
        source: resume.clone(),
        page_count: pages,
        output_base,
        paper,
    };

    let header = extract_header(&options, &reflower)
        .with_context(|| format!("Failed to extract header from {}", resume.display()))?;

    info!("Header: {}", header.display());
    Ok(header)
}

/// Merge a header PDF onto a resume
fn cmd_merge(
    header: PathBuf,
    resume: PathBuf,
    pages: u32,
    output_file: Option<String>,
    header_scale: f32,
    vertical_offset: f32,
) -> Result<PathBuf> {
    let output_base = output_base(output_file.as_deref(), OUTPUT_PREFIX, pages, &resume)?;

    let options = MergeOptions {
        header_path: header.clone(),
        template_path: resume.clone(),
        page_count: pages,
        output_base,
        header_scale,
        vertical_offset,
    };

    let output = merge_header(&options).with_context(|| {
        format!("Failed to merge {} onto {}", header.display(), resume.display())
    })?;

    info!("Output: {}", output.display());
    Ok(output)
}

/// Extract a header and merge it in one step
fn cmd_complete(
    header_source: PathBuf,
    resume: PathBuf,
    pages: u32,
    output_file: Option<String>,
    paper: PaperSize,
    header_scale: f32,
    vertical_offset: f32,
) -> Result<PathBuf> {
    info!("Step 1: Extracting header from {}...", header_source.display());
    let header = cmd_extract(header_source, pages, None, paper)?;

    info!("Step 2: Merging header onto {}...", resume.display());
    cmd_merge(header, resume, pages, output_file, header_scale, vertical_offset)
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> Result<()> {
    let details = inspect(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Pages: {}", details.page_count);
    println!(
        "MediaBox: [{} {} {} {}]",
        details.media_box.llx, details.media_box.lly, details.media_box.urx, details.media_box.ury
    );
    println!(
        "CropBox: [{} {} {} {}]",
        details.crop_box.llx, details.crop_box.lly, details.crop_box.urx, details.crop_box.ury
    );

    if let Some(title) = details.title {
        println!("Title: {}", title);
    }
    if let Some(author) = details.author {
        println!("Author: {}", author);
    }

    Ok(())
}
