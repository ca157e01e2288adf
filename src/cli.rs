use crate::Args;
use crate::caller::CallMethod;
use crate::error::{CustomError, Result};
use crate::likelihood::DamageModel;
use crate::output::{OutputMode, RecordEmitter};
use crate::pileup::{PileupReader, ReadFilter};
use crate::pulldown::{CallingConfig, pulldown};
use crate::reader::common::read_sample_list;
use crate::reader::{SiteSchema, open_site_reader};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// A validated run configuration.
#[derive(Debug, Clone)]
pub struct RunSpec {
    bamlist: PathBuf,
    snps: PathBuf,
    output: OutputMode,
    method: CallMethod,
    seed: u64,
    damage_model: DamageModel,
    read_filter: ReadFilter,
    likelihoods: bool,
    out: Option<PathBuf>,
}

impl RunSpec {
    pub fn log_paths(&self) {
        info!("BAMS: {}", self.bamlist.display());
        info!("SNPS: {}", self.snps.display());
        match &self.out {
            Some(path) => info!("OUT : {}", path.display()),
            None => info!("OUT : <stdout>"),
        }
    }

    /// Run settings echoed into the VCF header, in a fixed order.
    pub fn arguments(&self) -> Vec<(&'static str, String)> {
        vec![
            ("bamlist", self.bamlist.display().to_string()),
            ("snps", self.snps.display().to_string()),
            ("output", self.output.as_str().to_string()),
            ("method", self.method.as_str().to_string()),
            ("seed", self.seed.to_string()),
            ("error", self.damage_model.error_rate().to_string()),
            ("damage", self.damage_model.damage_rate().to_string()),
            ("basequal", self.read_filter.min_base_quality.to_string()),
            ("mapqual", self.read_filter.min_mapping_quality.to_string()),
            ("gl", self.likelihoods.to_string()),
        ]
    }

    pub fn calling_config(&self) -> CallingConfig {
        // Likelihoods only ever appear in VCF records
        let want_likelihoods = self.likelihoods && self.output == OutputMode::Vcf;
        CallingConfig {
            method: self.method,
            damage_model: want_likelihoods.then_some(self.damage_model),
            progress: true,
        }
    }

    fn open_output(&self) -> Result<Box<dyn Write>> {
        match &self.out {
            Some(path) => {
                let f = File::create(path).map_err(|e| CustomError::Write {
                    source: e,
                    path: path.clone(),
                })?;
                Ok(Box::new(BufWriter::new(f)))
            }
            None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
        }
    }
}

pub fn build_run_spec(args: &Args) -> Result<RunSpec> {
    let damage_model = DamageModel::new(args.error, args.damage)?;
    let snps = PathBuf::from(&args.snps);
    // Fail on an unsupported site list before touching any alignments
    SiteSchema::from_path(&snps)?;
    Ok(RunSpec {
        bamlist: PathBuf::from(&args.bamlist),
        snps,
        output: args.output,
        method: args.method,
        seed: args.seed,
        damage_model,
        read_filter: ReadFilter::new(args.basequal, args.mapqual),
        likelihoods: args.gl,
        out: args.out.as_ref().map(PathBuf::from),
    })
}

pub fn run(spec: &RunSpec) -> Result<()> {
    let samples = read_sample_list(&spec.bamlist)?;
    info!("Opening alignments for {} samples...", samples.len());
    let mut pileups = PileupReader::open(&samples, spec.read_filter)?;
    let mut sites = open_site_reader(&spec.snps)?;

    // A malformed first row fails the run before anything is written
    let first = sites.next().transpose()?;

    let mut emitter = RecordEmitter::new(spec.output, spec.open_output()?, spec.likelihoods);
    emitter.write_header(&pileups.sample_names(), &spec.arguments())?;

    let mut rng = StdRng::seed_from_u64(spec.seed);
    info!(
        "Pulling down {} with method {}...",
        sites.path().display(),
        spec.method.as_str()
    );
    let summary = pulldown(
        first.map(Ok).into_iter().chain(&mut sites),
        &mut pileups,
        &mut emitter,
        &spec.calling_config(),
        &mut rng,
    )?;

    info!(
        "Processed {} sites ({} non-SNP rows skipped)",
        summary.n_sites,
        sites.n_skipped()
    );
    for (sample, n_called) in pileups.sample_names().iter().zip(&summary.n_called) {
        info!("{sample}: called {n_called} of {} sites", summary.n_sites);
    }
    Ok(())
}
