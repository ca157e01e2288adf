use std::path::{Path, PathBuf};

use rust_htslib::bam::{self, Read};
use tracing::debug;

use crate::error::{CustomError, Result};
use crate::model::Site;
use crate::pileup::{AlignmentSource, BaseCall, PileupEntry};

/// Lifts htslib's default cap of 8000 reads per column.
const MAX_PILEUP_DEPTH: u32 = i32::MAX as u32;

/// An indexed BAM/CRAM file for one sample.
pub struct BamSource {
    sample: String,
    path: PathBuf,
    reader: bam::IndexedReader,
}

impl BamSource {
    pub fn open(sample: &str, path: &impl AsRef<Path>) -> Result<Self> {
        let reader =
            bam::IndexedReader::from_path(path).map_err(|source| CustomError::AlignmentOpen {
                source,
                sample: sample.to_string(),
                path: path.as_ref().to_path_buf(),
            })?;
        Ok(Self {
            sample: sample.to_string(),
            path: path.as_ref().to_path_buf(),
            reader,
        })
    }
}

impl AlignmentSource for BamSource {
    fn sample(&self) -> &str {
        &self.sample
    }

    fn pileup(&mut self, site: &Site) -> Result<Vec<PileupEntry>> {
        let Some(tid) = self.reader.header().tid(site.chrom.as_bytes()) else {
            debug!(
                sample = %self.sample,
                path = %self.path.display(),
                chrom = %site.chrom,
                "contig not in alignment header"
            );
            return Ok(Vec::new());
        };
        let Ok(start) = u32::try_from(site.pos - 1) else {
            return Ok(Vec::new());
        };

        self.reader
            .fetch((tid, start, start + 1))
            .map_err(|source| CustomError::AlignmentFetch {
                source,
                sample: self.sample.clone(),
                chrom: site.chrom.clone(),
                pos: site.pos,
            })?;

        let mut entries = Vec::new();
        let mut pileups = self.reader.pileup();
        pileups.set_max_depth(MAX_PILEUP_DEPTH);
        for pileup in pileups {
            let pileup = pileup.map_err(|source| CustomError::Pileup {
                source,
                sample: self.sample.clone(),
                chrom: site.chrom.clone(),
                pos: site.pos,
            })?;
            // Columns either side of the site come from reads that overlap it
            if pileup.pos() < start {
                continue;
            }
            if pileup.pos() > start {
                break;
            }
            for alignment in pileup.alignments() {
                let record = alignment.record();
                let call = alignment.qpos().map(|qpos| BaseCall {
                    base: record.seq()[qpos],
                    quality: record.qual()[qpos],
                });
                entries.push(PileupEntry {
                    flags: record.flags(),
                    mapping_quality: record.mapq(),
                    call,
                });
            }
        }
        Ok(entries)
    }
}
