//! afptools CLI - AFP page extraction and analysis tool

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use afptools::{
    analyze_files, detect_format_from_path, extract_file_with_options, render, AfpFile,
    AnalyzeOptions, Error, Framing, JsonFormat, ParseOptions,
};

/// Exit code for I/O and other errors.
const EXIT_FAILURE: i32 = 1;
/// Exit code when the input does not frame or nest correctly.
const EXIT_PARSE: i32 = 3;
/// Exit code for an invalid page selector.
const EXIT_RANGE: i32 = 4;
/// Exit code when the extractor rejects the selection.
const EXIT_EXTRACTION: i32 = 5;
/// Exit code when an analysis report contains errors.
const EXIT_ANALYSIS: i32 = 6;

#[derive(Parser)]
#[command(name = "afptools")]
#[command(version)]
#[command(about = "Extract pages from and analyse AFP print streams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a new AFP file containing only the selected pages
    Extract {
        /// Input AFP file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output AFP file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Pages to keep (e.g., "1:3, 5, 7:")
        #[arg(value_name = "PAGES")]
        pages: String,

        /// Record framing of the input
        #[arg(long, value_enum, default_value = "auto", env = "AFPTOOLS_FRAMING")]
        framing: FramingArg,
    },

    /// Print a structural report for each input
    Analyze {
        /// Input AFP files
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// List more fields and every page
        #[arg(short, long)]
        verbose: bool,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,

        /// Compact JSON output (no pretty-printing)
        #[arg(short, long, requires = "json")]
        compact: bool,

        /// Record framing of the inputs
        #[arg(long, value_enum, default_value = "auto", env = "AFPTOOLS_FRAMING")]
        framing: FramingArg,
    },

    /// Show format and page count of an AFP file
    Info {
        /// Input AFP file
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FramingArg {
    /// Detect from the first record
    Auto,
    /// Records without a carriage-control byte
    Bare,
    /// Records prefixed with 0x5A
    CarriageControl,
}

impl From<FramingArg> for Framing {
    fn from(arg: FramingArg) -> Self {
        match arg {
            FramingArg::Auto => Framing::Auto,
            FramingArg::Bare => Framing::Bare,
            FramingArg::CarriageControl => Framing::CarriageControl,
        }
    }
}

/// Outcome of a command that did not fail outright.
enum Outcome {
    Success,
    ReportedErrors,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            pages,
            framing,
        } => cmd_extract(&input, &output, &pages, framing),
        Commands::Analyze {
            inputs,
            verbose,
            json,
            compact,
            framing,
        } => cmd_analyze(&inputs, verbose, json, compact, framing),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(Outcome::Success)
        }
    };

    match result {
        Ok(Outcome::Success) => {}
        Ok(Outcome::ReportedErrors) => process::exit(EXIT_ANALYSIS),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            process::exit(exit_code(&e));
        }
    }
}

fn exit_code(err: &Error) -> i32 {
    match err {
        Error::Parse(_) => EXIT_PARSE,
        Error::Range(_) => EXIT_RANGE,
        Error::Extraction(_) => EXIT_EXTRACTION,
        _ => EXIT_FAILURE,
    }
}

fn cmd_extract(
    input: &Path,
    output: &Path,
    pages: &str,
    framing: FramingArg,
) -> afptools::Result<Outcome> {
    let options = ParseOptions::new().with_framing(framing.into());
    let summary = extract_file_with_options(input, output, pages, options)?;

    println!("{}: {}", "Total pages".bold(), summary.total_pages);
    println!(
        "{}: {} ({})",
        "Selected".bold(),
        summary.selected,
        summary.selected.len()
    );
    println!(
        "\n{} Wrote {} bytes to {}",
        "Done!".green().bold(),
        summary.bytes_written,
        output.display()
    );

    Ok(Outcome::Success)
}

fn cmd_analyze(
    inputs: &[PathBuf],
    verbose: bool,
    json: bool,
    compact: bool,
    framing: FramingArg,
) -> afptools::Result<Outcome> {
    let options = AnalyzeOptions::new()
        .with_framing(framing.into())
        .with_verbose(verbose);
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let mut outcome = Outcome::Success;
    for (input, result) in inputs.iter().zip(analyze_files(inputs, &options)) {
        let analysis = match result {
            Ok(analysis) => analysis,
            Err(e) => {
                eprintln!("{}: {}: {}", "Error".red().bold(), input.display(), e);
                outcome = Outcome::ReportedErrors;
                continue;
            }
        };

        if json {
            println!("{}", render::to_json(&analysis, format)?);
        } else {
            println!("{}", render::to_text(&analysis));
        }

        if analysis.has_errors() {
            outcome = Outcome::ReportedErrors;
        }
    }

    Ok(outcome)
}

fn cmd_info(input: &Path) -> afptools::Result<Outcome> {
    let format = detect_format_from_path(input)?;
    let file = AfpFile::open(input)?;
    let doc = file.parse()?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {} bytes", "Size".bold(), doc.byte_len());
    println!("{}: {}", "Fields".bold(), doc.fields().len());
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!(
        "{}: {} fields",
        "Preamble".bold(),
        doc.preamble().field_count()
    );
    println!("{}: {} fields", "Trailer".bold(), doc.trailer().field_count());

    Ok(Outcome::Success)
}

fn cmd_version() {
    println!("{} {}", "afptools".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("AFP page extraction and analysis tool");
}
