use std::io::Write;

use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;

use crate::caller::CallMethod;
use crate::counts::count_alleles;
use crate::error::Result;
use crate::likelihood::DamageModel;
use crate::model::{GenotypeCall, Site};
use crate::output::{RecordEmitter, SampleRecord};
use crate::pileup::PileupReader;

#[derive(Debug, Clone, Copy)]
pub struct CallingConfig {
    pub method: CallMethod,
    /// Genotype likelihoods are computed only when a model is given.
    pub damage_model: Option<DamageModel>,
    pub progress: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PulldownSummary {
    pub n_sites: usize,
    /// Sites with a non-missing call, per sample.
    pub n_called: Vec<usize>,
}

/// Streams every site through pileup, counting, calling and output.
///
/// Sites are handled strictly in input order and samples in sample-list order,
/// so a given seed always reproduces the same calls.
pub fn pulldown<S, W, R>(
    sites: S,
    pileups: &mut PileupReader,
    emitter: &mut RecordEmitter<W>,
    config: &CallingConfig,
    rng: &mut R,
) -> Result<PulldownSummary>
where
    S: Iterator<Item = Result<Site>>,
    W: Write,
    R: Rng,
{
    let samples = pileups.sample_names();
    let mut summary = PulldownSummary {
        n_sites: 0,
        n_called: vec![0; samples.len()],
    };

    let pb = if config.progress {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {spinner} {pos} sites ({per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    let mut records = Vec::with_capacity(samples.len());
    let process = || -> Result<()> {
        for site in sites {
            let site = site?;
            let observations = pileups.observe(&site)?;

            records.clear();
            for (sample_idx, observation) in observations.iter().enumerate() {
                let counts = count_alleles(observation, &site);
                let call = config.method.call(counts, rng)?;
                if call != GenotypeCall::Missing {
                    summary.n_called[sample_idx] += 1;
                }
                records.push(SampleRecord {
                    call,
                    counts,
                    likelihoods: config
                        .damage_model
                        .map(|model| model.likelihoods(counts, &site)),
                });
            }
            emitter.write_site(&site, &samples, &records)?;

            summary.n_sites += 1;
            pb.inc(1);
        }
        Ok(())
    };
    let outcome = process();
    pb.finish_and_clear();

    // Records already written stay whole even when a later site fails
    let flushed = emitter.flush();
    outcome?;
    flushed?;
    Ok(summary)
}
