mod caller;
mod cli;
mod counts;
mod error;
mod likelihood;
mod model;
mod output;
mod pileup;
mod pulldown;
mod reader;

use crate::caller::CallMethod;
use crate::error::Result;
use crate::output::OutputMode;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pull down pseudo-haploid genotypes from ancient DNA alignments at known SNPs.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Two-column list of sample name and indexed BAM/CRAM path.
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    bamlist: String,

    /// Sorted SNPs to pull down, as .snp, .snp.gz, .vcf or .vcf.gz.
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    snps: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputMode::Vcf)]
    output: OutputMode,

    /// How to pick one allele per sample and site.
    #[arg(short, long, value_enum, default_value_t = CallMethod::Random)]
    method: CallMethod,

    /// Random number generator seed.
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Sequencing error rate (for likelihood calculations).
    #[arg(short, long, default_value_t = 0.01)]
    error: f64,

    /// Deamination damage rate (for likelihood calculations).
    #[arg(short, long, default_value_t = 0.05)]
    damage: f64,

    /// Minimum base quality.
    #[arg(short = 'q', long, default_value_t = 30)]
    basequal: u8,

    /// Minimum mapping quality.
    #[arg(short = 'i', long, default_value_t = 0)]
    mapqual: u8,

    /// Add genotype likelihoods (GL) to VCF output.
    #[arg(long)]
    gl: bool,

    /// Write records here instead of standard output.
    #[arg(long = "out", value_hint = clap::ValueHint::FilePath)]
    out: Option<String>,
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    let run_spec = cli::build_run_spec(&args)?;
    run_spec.log_paths();
    cli::run(&run_spec)?;
    Ok(())
}

fn main() -> miette::Result<()> {
    // stdout carries the records, so diagnostics go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    try_main().into_diagnostic()
}
