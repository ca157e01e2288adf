use crate::model::{AlleleCounts, Observation, Site};

/// Tallies reads supporting the site's ref and alt alleles.
///
/// Bases matching neither allele are dropped. No correction is made for depth or
/// duplicate reads.
pub fn count_alleles(observation: &Observation, site: &Site) -> AlleleCounts {
    let (mut ref_count, mut alt_count) = (0, 0);
    for &base in &observation.bases {
        if base == site.ref_allele {
            ref_count += 1;
        } else if base == site.alt_allele {
            alt_count += 1;
        }
    }
    AlleleCounts::new(ref_count, alt_count)
}
