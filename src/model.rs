use std::fmt;

/// A biallelic SNP from the site list. Alleles are upper-case `A`, `C`, `G` or `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub chrom: String,
    /// 1-based position.
    pub pos: u64,
    pub id: String,
    pub ref_allele: u8,
    pub alt_allele: u8,
}

impl Site {
    /// Builds a site from raw allele strings, or `None` when the alleles are not
    /// two distinct single nucleotides.
    pub fn biallelic(
        chrom: &str,
        pos: u64,
        id: &str,
        ref_allele: &str,
        alt_allele: &str,
    ) -> Option<Self> {
        let ref_allele = single_nucleotide(ref_allele)?;
        let alt_allele = single_nucleotide(alt_allele)?;
        if ref_allele == alt_allele {
            return None;
        }
        Some(Self {
            chrom: chrom.to_string(),
            pos,
            id: id.to_string(),
            ref_allele,
            alt_allele,
        })
    }
}

fn single_nucleotide(allele: &str) -> Option<u8> {
    match allele.as_bytes() {
        [b] => match b.to_ascii_uppercase() {
            base @ (b'A' | b'C' | b'G' | b'T') => Some(base),
            _ => None,
        },
        _ => None,
    }
}

/// Base calls from every read that passed filtering at one site for one sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    pub bases: Vec<u8>,
}

#[cfg(test)]
impl From<&str> for Observation {
    fn from(bases: &str) -> Self {
        Self {
            bases: bases.as_bytes().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlleleCounts {
    pub ref_count: u32,
    pub alt_count: u32,
}

impl AlleleCounts {
    pub fn new(ref_count: u32, alt_count: u32) -> Self {
        Self {
            ref_count,
            alt_count,
        }
    }

    pub fn depth(&self) -> u32 {
        self.ref_count + self.alt_count
    }

    pub fn is_empty(&self) -> bool {
        self.depth() == 0
    }
}

/// Pseudo-haploid call: a single allele, or missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenotypeCall {
    Ref,
    Alt,
    Missing,
}

impl fmt::Display for GenotypeCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GenotypeCall::Ref => "0",
            GenotypeCall::Alt => "1",
            GenotypeCall::Missing => ".",
        };
        f.write_str(s)
    }
}

/// log10 likelihoods of (hom ref, het, hom alt), scaled so the largest is 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenotypeLikelihoods(pub [f64; 3]);
