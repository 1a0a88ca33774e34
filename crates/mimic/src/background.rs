//! Background amino acid distribution used to draw replacement residues
//! when a peptide has to be point-mutated.

use crate::enzyme::CLEAVAGE_SITES;
use crate::Error;

pub const VALID_AA: [u8; 20] = [
    b'A', b'C', b'D', b'E', b'F', b'G', b'H', b'I', b'K', b'L', b'M', b'N', b'P', b'Q', b'R', b'S',
    b'T', b'V', b'W', b'Y',
];

/// Residues dropped from the distribution when similar amino acids are merged
pub const MERGED_PAIR: [u8; 2] = [b'I', b'L'];

/// Residue frequencies observed across UniProt, not normalized
pub const DEFAULT_FREQUENCIES: [(u8, f64); 20] = [
    (b'A', 0.081),
    (b'C', 0.015),
    (b'D', 0.054),
    (b'E', 0.061),
    (b'F', 0.040),
    (b'G', 0.068),
    (b'H', 0.022),
    (b'I', 0.057),
    (b'K', 0.056),
    (b'L', 0.093),
    (b'M', 0.025),
    (b'N', 0.045),
    (b'P', 0.049),
    (b'Q', 0.039),
    (b'R', 0.057),
    (b'S', 0.068),
    (b'T', 0.058),
    (b'V', 0.067),
    (b'W', 0.013),
    (b'Y', 0.032),
];

/// Rounding slack tolerated at the end of the cumulative walk
const EPSILON: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    /// Normalized probabilities, sorted by residue.
    ///
    /// # Invariant
    /// The ordering defines the cumulative buckets used by [`Background::sample`],
    /// so it must stay sorted.
    dist: Vec<(u8, f64)>,
}

impl Default for Background {
    fn default() -> Self {
        Self::load(&DEFAULT_FREQUENCIES, false).expect("default frequencies are valid")
    }
}

impl Background {
    /// Build a distribution from a raw frequency table.
    ///
    /// Cleavage residues are always removed, and so is [`MERGED_PAIR`] when
    /// `merge_similar` is set. The remaining frequencies are normalized to sum to 1.
    pub fn load(raw: &[(u8, f64)], merge_similar: bool) -> Result<Self, Error> {
        let mut dist = raw
            .iter()
            .map(|&(residue, p)| (residue.to_ascii_uppercase(), p))
            .filter(|(residue, _)| !CLEAVAGE_SITES.contains(residue))
            .filter(|(residue, _)| !merge_similar || !MERGED_PAIR.contains(residue))
            .collect::<Vec<_>>();

        dist.sort_by_key(|(residue, _)| *residue);
        if let Some(w) = dist.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(Error::Background(format!(
                "residue `{}` is listed twice",
                w[0].0 as char
            )));
        }
        if let Some((residue, p)) = dist.iter().find(|(_, p)| !p.is_finite() || *p < 0.0) {
            return Err(Error::Background(format!(
                "residue `{}` has invalid frequency {}",
                *residue as char, p
            )));
        }

        let sum = dist.iter().map(|(_, p)| p).sum::<f64>();
        if dist.is_empty() || sum <= 0.0 {
            return Err(Error::Background(
                "no probability mass left after removing excluded residues".into(),
            ));
        }
        if !sum.is_finite() {
            return Err(Error::Background(format!(
                "total frequency is not finite: {}",
                sum
            )));
        }
        dist.iter_mut().for_each(|(_, p)| *p /= sum);

        Ok(Self { dist })
    }

    /// Draw a residue given a uniform random value `u` in [0, 1)
    ///
    /// # Panics
    /// * if `u` lies outside of [0, 1]
    /// * if the cumulative walk runs out of residues before reaching `u`
    pub fn sample(&self, u: f64) -> u8 {
        assert!(
            (0.0..=1.0).contains(&u),
            "background draw outside of [0, 1]: {}",
            u
        );
        let mut cumulative = 0.0;
        for &(residue, p) in &self.dist {
            cumulative += p;
            if u <= cumulative {
                return residue;
            }
        }
        // Normalization may leave the final bucket a hair short of 1.0
        assert!(
            u - cumulative <= EPSILON,
            "background distribution is not normalized: {} > {}",
            u,
            cumulative
        );
        self.dist[self.dist.len() - 1].0
    }

    pub fn probability(&self, residue: u8) -> f64 {
        self.dist
            .binary_search_by_key(&residue, |(r, _)| *r)
            .map(|ix| self.dist[ix].1)
            .unwrap_or(0.0)
    }

    /// Retained residues, in sampling order
    pub fn residues(&self) -> impl Iterator<Item = u8> + '_ {
        self.dist.iter().map(|(residue, _)| *residue)
    }
}
