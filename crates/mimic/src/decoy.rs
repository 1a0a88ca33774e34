//! Decoy peptide generation.
//!
//! Every distinct real peptide is either kept as-is (a shared peptide), or
//! scrambled into a sequence that is not yet used by any real or decoy
//! peptide. Scrambling first tries random permutations of the peptide, and
//! falls back to point mutations drawn from the background distribution if
//! every permutation collides.

use crate::background::Background;
use crate::database::Parameters;
use crate::index::PeptideIndex;
use crate::Error;
use fnv::FnvHashSet;
use rand::Rng;
use std::borrow::Cow;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
/// Transform applied to peptides before checking them for collisions.
/// The emitted decoy sequence is never transformed.
pub enum Equivalence {
    Exact,
    /// I and N collapse to L, Q and K collapse to E
    Merged,
}

impl Equivalence {
    pub fn key<'a>(&self, peptide: &'a [u8]) -> Cow<'a, [u8]> {
        match self {
            Equivalence::Exact => Cow::Borrowed(peptide),
            Equivalence::Merged => Cow::Owned(
                peptide
                    .iter()
                    .map(|&aa| match aa {
                        b'I' | b'N' => b'L',
                        b'Q' | b'K' => b'E',
                        _ => aa,
                    })
                    .collect(),
            ),
        }
    }
}

/// Every peptide sequence consumed so far by real or decoy peptides.
/// Only ever grows.
pub struct UsedPeptides {
    set: FnvHashSet<Vec<u8>>,
    equivalence: Equivalence,
}

impl UsedPeptides {
    pub fn new(equivalence: Equivalence) -> Self {
        UsedPeptides {
            set: FnvHashSet::default(),
            equivalence,
        }
    }

    /// Returns true if `peptide` was already used. The peptide is marked as
    /// used if it was not, or unconditionally if `force` is set.
    pub fn check_and_mark(&mut self, peptide: &[u8], force: bool) -> bool {
        let key = self.equivalence.key(peptide);
        let used = self.set.contains(key.as_ref());
        if force || !used {
            self.set.insert(key.into_owned());
        }
        used
    }

    pub fn contains(&self, peptide: &[u8]) -> bool {
        self.set.contains(self.equivalence.key(peptide).as_ref())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
/// Outcome counts for one round of decoy generation
pub struct DecoyStats {
    /// Peptides kept unmodified
    pub shared: usize,
    /// Peptides accepted after shuffling
    pub shuffled: usize,
    /// Peptides accepted after point mutation
    pub mutated: usize,
    /// Peptides too short to retry, emitted despite colliding
    pub short_collisions: usize,
    /// Peptides that still collided after all shuffles and mutations
    pub exhausted: usize,
}

impl std::ops::AddAssign for DecoyStats {
    fn add_assign(&mut self, rhs: Self) {
        self.shared += rhs.shared;
        self.shuffled += rhs.shuffled;
        self.mutated += rhs.mutated;
        self.short_collisions += rhs.short_collisions;
        self.exhausted += rhs.exhausted;
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Outcome {
    Shuffled,
    Mutated,
    ShortCollision,
    Exhausted,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Phase {
    Scrambling { tries: usize },
    Mutating { tries: usize },
    Done(Outcome),
}

/// Shuffle `peptide` into `out` (Fisher-Yates), permuting every position
pub fn shuffle<R: Rng + ?Sized>(peptide: &[u8], out: &mut Vec<u8>, rng: &mut R) {
    out.clear();
    out.extend_from_slice(peptide);
    for i in (1..out.len()).rev() {
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }
}

/// Replace a single, uniformly chosen residue of `peptide` with a draw
/// from `background`
pub fn mutate<R: Rng + ?Sized>(peptide: &mut [u8], background: &Background, rng: &mut R) {
    if peptide.is_empty() {
        return;
    }
    let pos = rng.gen_range(0..peptide.len());
    peptide[pos] = background.sample(rng.gen::<f64>());
}

pub struct DecoyEngine {
    used: UsedPeptides,
    background: Background,
    shared_ratio: f64,
    min_len: usize,
    max_tries: usize,
}

impl DecoyEngine {
    /// Create an engine for one real database. Every real peptide is marked
    /// as used, so no decoy can ever reproduce one.
    pub fn new(parameters: &Parameters, real: &PeptideIndex) -> Result<Self, Error> {
        let equivalence = match parameters.merge_similar {
            true => Equivalence::Merged,
            false => Equivalence::Exact,
        };
        let mut used = UsedPeptides::new(equivalence);
        for peptide in real.peptides() {
            used.check_and_mark(peptide, true);
        }

        Ok(DecoyEngine {
            used,
            background: parameters.background()?,
            shared_ratio: parameters.shared_ratio,
            min_len: parameters.min_len,
            max_tries: parameters.max_tries,
        })
    }

    pub fn used(&self) -> &UsedPeptides {
        &self.used
    }

    /// Generate one decoy for every distinct peptide of `real`. Each decoy
    /// inherits the full slot set of its real peptide, so a peptide shared
    /// between proteins gets the same decoy everywhere it occurs.
    ///
    /// Random numbers are drawn peptide by peptide, in index order.
    pub fn round<R: Rng + ?Sized>(
        &mut self,
        real: &PeptideIndex,
        rng: &mut R,
    ) -> (PeptideIndex, DecoyStats) {
        let mut decoys = PeptideIndex::default();
        let mut stats = DecoyStats::default();

        for (peptide, slots) in real.iter() {
            let u = rng.gen::<f64>();
            let decoy = match u < self.shared_ratio {
                true => {
                    // Already marked as used when the engine was created
                    stats.shared += 1;
                    peptide.to_vec()
                }
                false => {
                    let (decoy, outcome) = self.scramble(peptide, rng);
                    match outcome {
                        Outcome::Shuffled => stats.shuffled += 1,
                        Outcome::Mutated => stats.mutated += 1,
                        Outcome::ShortCollision => stats.short_collisions += 1,
                        Outcome::Exhausted => {
                            log::debug!(
                                "gave up on peptide {}, emitting {}",
                                String::from_utf8_lossy(peptide),
                                String::from_utf8_lossy(&decoy)
                            );
                            stats.exhausted += 1
                        }
                    }
                    decoy
                }
            };
            decoys.extend(decoy, slots);
        }

        (decoys, stats)
    }

    fn scramble<R: Rng + ?Sized>(&mut self, peptide: &[u8], rng: &mut R) -> (Vec<u8>, Outcome) {
        let mut candidate = Vec::with_capacity(peptide.len());
        let mut phase = Phase::Scrambling { tries: 0 };

        loop {
            phase = match phase {
                Phase::Scrambling { tries } => {
                    shuffle(peptide, &mut candidate, rng);
                    let tries = tries + 1;
                    if !self.used.check_and_mark(&candidate, false) {
                        Phase::Done(Outcome::Shuffled)
                    } else if peptide.len() < self.min_len {
                        // Too few permutations to be worth retrying
                        Phase::Done(Outcome::ShortCollision)
                    } else if tries < self.max_tries {
                        Phase::Scrambling { tries }
                    } else {
                        candidate.clear();
                        candidate.extend_from_slice(peptide);
                        Phase::Mutating { tries: 0 }
                    }
                }
                Phase::Mutating { tries } => {
                    // Mutations accumulate on the previous candidate
                    mutate(&mut candidate, &self.background, rng);
                    let tries = tries + 1;
                    if !self.used.check_and_mark(&candidate, false) {
                        Phase::Done(Outcome::Mutated)
                    } else if tries < self.max_tries {
                        Phase::Mutating { tries }
                    } else {
                        Phase::Done(Outcome::Exhausted)
                    }
                }
                Phase::Done(outcome) => return (candidate, outcome),
            }
        }
    }
}
