use std::io::Write;

use clap::ValueEnum;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use itertools::Itertools;

use crate::error::{CustomError, Result};
use crate::model::{AlleleCounts, GenotypeCall, GenotypeLikelihoods, Site};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Pseudo-haploid VCF with one column per sample.
    Vcf,
    /// `ID SAMPLE ref_count alt_count`, one line per site and sample.
    Readcounts,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Vcf => "vcf",
            OutputMode::Readcounts => "readcounts",
        }
    }
}

/// Everything emitted for one sample at one site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRecord {
    pub call: GenotypeCall,
    pub counts: AlleleCounts,
    pub likelihoods: Option<GenotypeLikelihoods>,
}

/// Writes records one complete line at a time.
pub enum RecordEmitter<W: Write> {
    Vcf { out: W, likelihoods: bool },
    Readcounts { out: csv::Writer<W> },
}

impl<W: Write> RecordEmitter<W> {
    pub fn new(mode: OutputMode, out: W, likelihoods: bool) -> Self {
        match mode {
            OutputMode::Vcf => RecordEmitter::Vcf { out, likelihoods },
            OutputMode::Readcounts => RecordEmitter::Readcounts {
                out: WriterBuilder::new()
                    .delimiter(b' ')
                    .has_headers(false)
                    .quote_style(QuoteStyle::Never)
                    .terminator(Terminator::Any(b'\n'))
                    .from_writer(out),
            },
        }
    }

    /// VCF meta lines and column header. Readcount output has no header.
    pub fn write_header(&mut self, samples: &[String], arguments: &[(&str, String)]) -> Result<()> {
        let RecordEmitter::Vcf { out, likelihoods } = self else {
            return Ok(());
        };
        let mut header = String::new();
        header.push_str("##fileformat=VCFv4.3\n");
        header.push_str(concat!("##source=", env!("CARGO_PKG_NAME"), "\n"));
        for (key, value) in arguments {
            header.push_str(&format!("##Argument=<{key}={value}>\n"));
        }
        header.push_str("##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n");
        if *likelihoods {
            header.push_str(
                "##FORMAT=<ID=GL,Number=G,Type=Float,Description=\"Genotype likelihoods\">\n",
            );
        }
        header.push_str("##FORMAT=<ID=AD,Number=2,Type=Integer,Description=\"Allele depth\">\n");
        header.push_str("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT");
        for sample in samples {
            header.push('\t');
            header.push_str(sample);
        }
        header.push('\n');
        out.write_all(header.as_bytes())
            .map_err(|e| CustomError::WriteOutput { source: e })
    }

    pub fn write_site(
        &mut self,
        site: &Site,
        samples: &[String],
        records: &[SampleRecord],
    ) -> Result<()> {
        debug_assert_eq!(samples.len(), records.len());
        match self {
            RecordEmitter::Vcf { out, likelihoods } => {
                let line = vcf_line(site, records, *likelihoods);
                out.write_all(line.as_bytes())
                    .map_err(|e| CustomError::WriteOutput { source: e })
            }
            RecordEmitter::Readcounts { out } => {
                for (sample, record) in samples.iter().zip(records) {
                    let ref_count = record.counts.ref_count.to_string();
                    let alt_count = record.counts.alt_count.to_string();
                    out.write_record([
                        site.id.as_str(),
                        sample.as_str(),
                        ref_count.as_str(),
                        alt_count.as_str(),
                    ])?;
                }
                Ok(())
            }
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        let flushed = match self {
            RecordEmitter::Vcf { out, .. } => out.flush(),
            RecordEmitter::Readcounts { out } => out.flush(),
        };
        flushed.map_err(|e| CustomError::WriteOutput { source: e })
    }
}

fn vcf_line(site: &Site, records: &[SampleRecord], likelihoods: bool) -> String {
    let format = if likelihoods { "GT:GL:AD" } else { "GT:AD" };
    let fixed = format!(
        "{}\t{}\t{}\t{}\t{}\t.\t.\t.\t{}",
        site.chrom, site.pos, site.id, site.ref_allele as char, site.alt_allele as char, format
    );
    let fields = records.iter().map(|record| {
        let mut field = format!("{call}|{call}", call = record.call);
        if likelihoods {
            let gl = record
                .likelihoods
                .map(|gl| gl.0.iter().map(|&l| format_likelihood(l)).join(","))
                .unwrap_or_else(|| ".".to_string());
            field.push(':');
            field.push_str(&gl);
        }
        field.push_str(&format!(
            ":{},{}",
            record.counts.ref_count, record.counts.alt_count
        ));
        field
    });
    let mut line = std::iter::once(fixed).chain(fields).join("\t");
    line.push('\n');
    line
}

/// Three decimals, without printing `-0.000`.
fn format_likelihood(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.3}")
}
