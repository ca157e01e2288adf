//! Per-site base observations from one alignment source per sample.
//!
//! An [`AlignmentSource`] reports every read overlapping a site; the
//! [`PileupReader`] applies the [`ReadFilter`] and keeps the surviving bases.

pub mod bam;

use tracing::debug;

use crate::error::Result;
use crate::model::{Observation, Site};
use crate::reader::common::SampleEntry;
use bam::BamSource;

/// Unmapped, secondary, QC-fail and duplicate reads.
pub const EXCLUDED_FLAGS: u16 = 0x4 | 0x100 | 0x200 | 0x400;

/// The aligned base of one read at the queried position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseCall {
    pub base: u8,
    pub quality: u8,
}

/// One read overlapping the queried position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PileupEntry {
    pub flags: u16,
    pub mapping_quality: u8,
    /// `None` when the read spans the position with a deletion or reference skip.
    pub call: Option<BaseCall>,
}

/// One sample's reads, opened once and queried site by site.
pub trait AlignmentSource {
    fn sample(&self) -> &str;

    /// All reads overlapping the 1-based position of `site`.
    fn pileup(&mut self, site: &Site) -> Result<Vec<PileupEntry>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadFilter {
    pub min_base_quality: u8,
    pub min_mapping_quality: u8,
}

impl ReadFilter {
    pub fn new(min_base_quality: u8, min_mapping_quality: u8) -> Self {
        Self {
            min_base_quality,
            min_mapping_quality,
        }
    }

    /// The base this read contributes to the observation, if any.
    pub fn accept(&self, entry: &PileupEntry) -> Option<u8> {
        if entry.flags & EXCLUDED_FLAGS != 0 {
            return None;
        }
        if entry.mapping_quality < self.min_mapping_quality {
            return None;
        }
        let call = entry.call?;
        if call.quality < self.min_base_quality {
            return None;
        }
        Some(call.base.to_ascii_uppercase())
    }
}

/// Holds every sample's alignment source, in sample-list order.
pub struct PileupReader {
    sources: Vec<Box<dyn AlignmentSource>>,
    filter: ReadFilter,
}

impl PileupReader {
    pub fn new(sources: Vec<Box<dyn AlignmentSource>>, filter: ReadFilter) -> Self {
        Self { sources, filter }
    }

    /// Opens an indexed alignment file for every sample. Fails on the first
    /// file that cannot be opened.
    pub fn open(samples: &[SampleEntry], filter: ReadFilter) -> Result<Self> {
        let mut sources: Vec<Box<dyn AlignmentSource>> = Vec::with_capacity(samples.len());
        for entry in samples {
            debug!(sample = %entry.name, path = %entry.path.display(), "opening alignments");
            sources.push(Box::new(BamSource::open(&entry.name, &entry.path)?));
        }
        Ok(Self::new(sources, filter))
    }

    pub fn sample_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.sample().to_string()).collect()
    }

    /// One observation per sample, in sample order.
    pub fn observe(&mut self, site: &Site) -> Result<Vec<Observation>> {
        let mut observations = Vec::with_capacity(self.sources.len());
        for source in self.sources.iter_mut() {
            let bases = source
                .pileup(site)?
                .iter()
                .filter_map(|entry| self.filter.accept(entry))
                .collect();
            observations.push(Observation { bases });
        }
        Ok(observations)
    }
}
