use crate::error::{CustomError, Result};
use crate::model::{AlleleCounts, GenotypeLikelihoods, Site};

/// Direction of a ref->alt substitution relative to post-mortem deamination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Substitution {
    /// C->T or G->A: damage on a ref allele looks like alt.
    Deaminating,
    /// T->C or A->G: damage on an alt allele looks like ref.
    Restoring,
    Neutral,
}

impl Substitution {
    fn classify(ref_allele: u8, alt_allele: u8) -> Self {
        match (ref_allele, alt_allele) {
            (b'C', b'T') | (b'G', b'A') => Substitution::Deaminating,
            (b'T', b'C') | (b'A', b'G') => Substitution::Restoring,
            _ => Substitution::Neutral,
        }
    }
}

/// Binomial read model with a constant error rate and a deamination term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageModel {
    error_rate: f64,
    damage_rate: f64,
}

impl DamageModel {
    pub fn new(error_rate: f64, damage_rate: f64) -> Result<Self> {
        if !(error_rate >= 0.0) {
            return Err(CustomError::ErrorRate { value: error_rate });
        }
        if !(0.0..=0.5).contains(&damage_rate) {
            return Err(CustomError::DamageRate { value: damage_rate });
        }
        if error_rate + damage_rate > 1.0 {
            return Err(CustomError::RateSum {
                error: error_rate,
                damage: damage_rate,
            });
        }
        Ok(Self {
            error_rate,
            damage_rate,
        })
    }

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    pub fn damage_rate(&self) -> f64 {
        self.damage_rate
    }

    /// Probability that a read carries the alt allele under each of the
    /// genotypes 00, 01 and 11.
    pub fn alt_read_probabilities(&self, ref_allele: u8, alt_allele: u8) -> [f64; 3] {
        let (e, d) = (self.error_rate, self.damage_rate);
        match Substitution::classify(ref_allele, alt_allele) {
            Substitution::Deaminating => [e + d, 0.5 + d, 1.0 - e],
            Substitution::Restoring => [e, 0.5 - d, 1.0 - e - d],
            Substitution::Neutral => [e, 0.5, 1.0 - e],
        }
    }

    /// log10 genotype likelihoods for the counts at `site`, shifted so the best is 0.
    pub fn likelihoods(&self, counts: AlleleCounts, site: &Site) -> GenotypeLikelihoods {
        let probs = self.alt_read_probabilities(site.ref_allele, site.alt_allele);
        let n = counts.depth() as u64;
        let k = counts.alt_count as u64;
        let raw = probs.map(|p| log10_binomial_pmf(k, n, p));
        let best = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        GenotypeLikelihoods(raw.map(|l| l - best))
    }
}

/// log10 P(X = k) for X ~ Binomial(n, p), with 0 * log(0) taken as 0.
fn log10_binomial_pmf(k: u64, n: u64, p: f64) -> f64 {
    debug_assert!(k <= n);
    let ln_pmf = ln_choose(n, k) + xlogy(k, p) + xlogy(n - k, 1.0 - p);
    ln_pmf / std::f64::consts::LN_10
}

fn xlogy(x: u64, y: f64) -> f64 {
    if x == 0 { 0.0 } else { x as f64 * y.ln() }
}

fn ln_choose(n: u64, k: u64) -> f64 {
    let k = k.min(n - k);
    (1..=k)
        .map(|i| ((n - k + i) as f64).ln() - (i as f64).ln())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(ref_allele: &str, alt_allele: &str) -> Site {
        Site::biallelic("chr1", 100, "rs1", ref_allele, alt_allele).unwrap()
    }

    fn model(error_rate: f64, damage_rate: f64) -> DamageModel {
        DamageModel::new(error_rate, damage_rate).unwrap()
    }

    #[test]
    fn zero_depth_is_flat() {
        let gl = model(0.01, 0.05).likelihoods(AlleleCounts::new(0, 0), &site("C", "T"));
        assert_eq!(gl.0, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn best_genotype_is_always_zero() {
        let m = model(0.01, 0.05);
        for (ref_allele, alt_allele) in [("A", "G"), ("C", "T"), ("T", "C"), ("G", "C")] {
            let s = site(ref_allele, alt_allele);
            for ref_count in 0..12 {
                for alt_count in 0..12 {
                    if ref_count + alt_count == 0 {
                        continue;
                    }
                    let gl = m.likelihoods(AlleleCounts::new(ref_count, alt_count), &s);
                    let best = gl.0.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    assert_eq!(best, 0.0, "{ref_allele}>{alt_allele} {ref_count},{alt_count}");
                    assert!(gl.0.iter().all(|&l| l <= 0.0));
                }
            }
        }
    }

    #[test]
    fn matches_binomial_reference_values() {
        // 2 ref, 2 alt, A>G, no damage: p = 0.01, 0.5, 0.99
        let gl = model(0.01, 0.0).likelihoods(AlleleCounts::new(2, 2), &site("A", "G"));
        let expected_00 = 2.0 * (0.01f64.log10() + 0.99f64.log10()) - 4.0 * 0.5f64.log10();
        assert!((gl.0[0] - expected_00).abs() < 1e-9);
        assert_eq!(gl.0[1], 0.0);
        assert!((gl.0[2] - expected_00).abs() < 1e-9);
    }

    #[test]
    fn log10_pmf_agrees_with_direct_formula() {
        // C(10, 3) = 120
        let expected = (120.0 * 0.2f64.powi(3) * 0.8f64.powi(7)).log10();
        assert!((log10_binomial_pmf(3, 10, 0.2) - expected).abs() < 1e-12);
        assert_eq!(log10_binomial_pmf(0, 0, 0.3), 0.0);
    }

    #[test]
    fn impossible_genotypes_are_negative_infinity() {
        let gl = model(0.0, 0.0).likelihoods(AlleleCounts::new(3, 1), &site("A", "C"));
        assert_eq!(gl.0[0], f64::NEG_INFINITY);
        assert_eq!(gl.0[1], 0.0);
        assert_eq!(gl.0[2], f64::NEG_INFINITY);
    }

    #[test]
    fn deamination_raises_hom_ref_support_for_c_to_t() {
        let s = site("C", "T");
        let counts = AlleleCounts::new(8, 3);
        let l00: Vec<f64> = [0.0, 0.05, 0.1]
            .iter()
            .map(|&d| model(0.01, d).likelihoods(counts, &s).0[0])
            .collect();
        assert!(l00[0] < l00[1], "{l00:?}");
        assert!(l00[1] < l00[2], "{l00:?}");
    }

    #[test]
    fn damage_lowers_hom_alt_probability_for_t_to_c() {
        let low = model(0.01, 0.0).alt_read_probabilities(b'T', b'C');
        let high = model(0.01, 0.05).alt_read_probabilities(b'T', b'C');
        assert!(high[2] < low[2]);
        assert!(high[1] < low[1]);
        assert_eq!(high[0], low[0]);
    }

    #[test]
    fn probability_table() {
        let m = model(0.01, 0.05);
        let cases = [
            ((b'G', b'A'), [0.06, 0.55, 0.99]),
            ((b'A', b'G'), [0.01, 0.45, 0.94]),
            ((b'A', b'C'), [0.01, 0.5, 0.99]),
        ];
        for ((ref_allele, alt_allele), expected) in cases {
            let probs = m.alt_read_probabilities(ref_allele, alt_allele);
            for (p, q) in probs.iter().zip(expected) {
                assert!((p - q).abs() < 1e-12, "{probs:?} vs {expected:?}");
            }
        }
    }

    #[test]
    fn rejects_out_of_range_rates() {
        assert!(matches!(
            DamageModel::new(-0.1, 0.0),
            Err(CustomError::ErrorRate { .. })
        ));
        assert!(matches!(
            DamageModel::new(f64::NAN, 0.0),
            Err(CustomError::ErrorRate { .. })
        ));
        assert!(matches!(
            DamageModel::new(0.01, 0.6),
            Err(CustomError::DamageRate { .. })
        ));
        assert!(matches!(
            DamageModel::new(0.9, 0.2),
            Err(CustomError::RateSum { .. })
        ));
    }
}
