//! Inspect and generate sparsity pattern files

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sparsity::{PatternBuilder, PatternFile, PatternSummary, PrintPattern, SparsityPattern};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(about = "Sparsity pattern CLI - inspect, plot and generate pattern files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show shape statistics of a pattern file
    Info {
        /// Pattern file to inspect
        file: PathBuf,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write gnuplot points ("col -row") for every entry
    Gnuplot {
        /// Pattern file to plot
        file: PathBuf,
    },
    /// Write every row as "[row,c0,c1,...]"
    Print {
        /// Pattern file to print
        file: PathBuf,
    },
    /// Generate the five-point stencil pattern of a square grid
    Stencil {
        /// Grid points per side
        width: usize,

        /// Output pattern file
        out: PathBuf,
    },
}

fn main() {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()) {
        tracing::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> sparsity::Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.command {
        Commands::Info { file, json } => {
            let file = PatternFile::open(file)?;
            let summary = PatternSummary::from_structure(&file.view());
            if json {
                writeln!(out, "{}", summary.to_json()?)?;
            } else {
                writeln!(out, "{summary}")?;
            }
        }
        Commands::Gnuplot { file } => {
            PatternFile::open(file)?.view().print_gnuplot(&mut out)?;
        }
        Commands::Print { file } => {
            PatternFile::open(file)?.view().print(&mut out)?;
        }
        Commands::Stencil { width, out: path } => {
            let pattern = five_point_stencil(width)?;
            PatternFile::write(&path, &pattern)?;
            info!(width, path = %path.display(), "generated stencil pattern");
        }
    }

    out.flush()?;
    Ok(())
}

/// Couplings of the five-point Laplacian on a `width` x `width` grid
fn five_point_stencil(width: usize) -> sparsity::Result<SparsityPattern> {
    let n = width * width;
    let mut builder = PatternBuilder::new(n, n, 5)?;
    for i in 0..width {
        for j in 0..width {
            let row = i * width + j;
            if i > 0 {
                builder.add(row, row - width)?;
            }
            if i + 1 < width {
                builder.add(row, row + width)?;
            }
            if j > 0 {
                builder.add(row, row - 1)?;
            }
            if j + 1 < width {
                builder.add(row, row + 1)?;
            }
        }
    }
    Ok(builder.compress()?)
}
