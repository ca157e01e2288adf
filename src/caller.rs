use clap::ValueEnum;
use rand::Rng;

use crate::error::{CustomError, Result};
use crate::model::{AlleleCounts, GenotypeCall};

/// How a single pseudo-haploid allele is picked from the read counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CallMethod {
    /// Call alt with probability alt / (ref + alt).
    Random,
    /// Call the allele with more reads, breaking ties at random.
    Majority,
}

impl CallMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallMethod::Random => "random",
            CallMethod::Majority => "majority",
        }
    }

    /// Draws at most one value from `rng`, and none for an empty site.
    pub fn call<R: Rng>(&self, counts: AlleleCounts, rng: &mut R) -> Result<GenotypeCall> {
        match self {
            CallMethod::Random => random_call(counts, rng),
            CallMethod::Majority => Ok(majority_call(counts, rng)),
        }
    }
}

fn random_call<R: Rng>(counts: AlleleCounts, rng: &mut R) -> Result<GenotypeCall> {
    if counts.is_empty() {
        return Ok(GenotypeCall::Missing);
    }
    let alt_fraction = counts.alt_count as f64 / counts.depth() as f64;
    if !alt_fraction.is_finite() {
        return Err(CustomError::UnclassifiableCounts {
            ref_count: counts.ref_count,
            alt_count: counts.alt_count,
        });
    }
    if rng.r#gen::<f64>() < alt_fraction {
        Ok(GenotypeCall::Alt)
    } else {
        Ok(GenotypeCall::Ref)
    }
}

fn majority_call<R: Rng>(counts: AlleleCounts, rng: &mut R) -> GenotypeCall {
    if counts.is_empty() {
        return GenotypeCall::Missing;
    }
    match counts.ref_count.cmp(&counts.alt_count) {
        std::cmp::Ordering::Greater => GenotypeCall::Ref,
        std::cmp::Ordering::Less => GenotypeCall::Alt,
        std::cmp::Ordering::Equal => {
            if rng.r#gen::<f64>() < 0.5 {
                GenotypeCall::Ref
            } else {
                GenotypeCall::Alt
            }
        }
    }
}
