use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("could not read {path}")]
    ReadWithPath {
        #[source]
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("could not write to {path}")]
    Write {
        #[source]
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("could not write output records")]
    WriteOutput {
        #[source]
        source: std::io::Error,
    },

    #[error("could not write readcount record")]
    CsvWrite(#[from] csv::Error),

    #[error("site list {path} must end in .snp, .snp.gz, .vcf or .vcf.gz")]
    SiteListSchema { path: std::path::PathBuf },

    #[error("expected at least {expected} fields (got {n_fields}) in line {line_num} of .snp file")]
    EigenstratSnpFields {
        line_num: usize,
        n_fields: usize,
        expected: usize,
    },

    #[error("no #CHROM header line found in {path}")]
    VcfHeaderMissing { path: std::path::PathBuf },

    #[error("expected at least {expected} fields (got {n_fields}) in line {line_num} of .vcf file")]
    VcfFields {
        line_num: usize,
        n_fields: usize,
        expected: usize,
    },

    #[error("could not parse position \"{value}\" in line {line_num} of site list")]
    SitePosition {
        #[source]
        source: std::num::ParseIntError,
        line_num: usize,
        value: String,
    },

    #[error("position must be 1-based (got 0) in line {line_num} of site list")]
    SitePositionZero { line_num: usize },

    #[error("expected at least {expected} fields (got {n_fields}) in line {line_num} of sample list")]
    SampleListFields {
        line_num: usize,
        n_fields: usize,
        expected: usize,
    },

    #[error("need at least 1 sample (got {n_samples})")]
    SampleCount { n_samples: usize },

    #[error("could not open indexed alignment file {path} for sample {sample}")]
    AlignmentOpen {
        #[source]
        source: rust_htslib::errors::Error,
        sample: String,
        path: std::path::PathBuf,
    },

    #[error("could not fetch reads at {chrom}:{pos} for sample {sample}")]
    AlignmentFetch {
        #[source]
        source: rust_htslib::errors::Error,
        sample: String,
        chrom: String,
        pos: u64,
    },

    #[error("could not build pileup at {chrom}:{pos} for sample {sample}")]
    Pileup {
        #[source]
        source: rust_htslib::errors::Error,
        sample: String,
        chrom: String,
        pos: u64,
    },

    #[error("do not know how to call counts (ref={ref_count}, alt={alt_count})")]
    UnclassifiableCounts { ref_count: u32, alt_count: u32 },

    #[error("error rate must be at least 0 (got {value})")]
    ErrorRate { value: f64 },

    #[error("damage rate must be between 0 and 0.5 (got {value})")]
    DamageRate { value: f64 },

    #[error("error rate plus damage rate must not exceed 1 (got {error} + {damage})")]
    RateSum { error: f64, damage: f64 },
}

pub type Result<T> = std::result::Result<T, CustomError>;
