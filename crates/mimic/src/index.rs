use crate::Error;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Hash, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[repr(transparent)]
/// Position of a peptide within the reassembly layout, unique across the
/// whole input database
pub struct SlotIx(pub u32);

#[derive(Clone, Default, Debug, PartialEq)]
/// Map from peptide sequence to every slot where that exact sequence occurs.
///
/// Iteration is in lexicographic order of the peptide sequence. Decoy
/// generation consumes random numbers in this order, so it must stay
/// deterministic for seeded runs to be reproducible.
pub struct PeptideIndex {
    inner: BTreeMap<Vec<u8>, BTreeSet<SlotIx>>,
}

impl PeptideIndex {
    /// Record that `peptide` occurs at `slot`
    ///
    /// # Panics
    /// If `slot` was already recorded for `peptide`: every slot is assigned
    /// exactly once during segmentation
    pub fn add_peptide(&mut self, peptide: &[u8], slot: SlotIx) {
        let inserted = self.inner.entry(peptide.to_vec()).or_default().insert(slot);
        assert!(
            inserted,
            "slot {} assigned twice to peptide {}",
            slot.0,
            String::from_utf8_lossy(peptide)
        );
    }

    /// Attach a whole set of slots to `peptide`, merging with any slots it
    /// already holds
    pub fn extend<'a, I>(&mut self, peptide: Vec<u8>, slots: I)
    where
        I: IntoIterator<Item = &'a SlotIx>,
    {
        self.inner
            .entry(peptide)
            .or_default()
            .extend(slots.into_iter().copied());
    }

    pub fn get(&self, peptide: &[u8]) -> Option<&BTreeSet<SlotIx>> {
        self.inner.get(peptide)
    }

    pub fn contains(&self, peptide: &[u8]) -> bool {
        self.inner.contains_key(peptide)
    }

    /// Number of distinct peptide sequences
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Total number of slots held across all peptides
    pub fn slots(&self) -> usize {
        self.inner.values().map(BTreeSet::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &BTreeSet<SlotIx>)> {
        self.inner.iter().map(|(k, v)| (k.as_slice(), v))
    }

    pub fn peptides(&self) -> impl Iterator<Item = &[u8]> {
        self.inner.keys().map(Vec::as_slice)
    }

    /// Invert the index: position `i` holds the peptide filling slot `i`.
    ///
    /// Fails if any slot in `0..n` is left unresolved, resolved more than
    /// once, or if a slot falls outside of that range.
    pub fn resolve(&self, n: usize) -> Result<Vec<&[u8]>, Error> {
        let mut resolved: Vec<Option<&[u8]>> = vec![None; n];
        for (peptide, slots) in self.iter() {
            for slot in slots {
                let cell = resolved.get_mut(slot.0 as usize).ok_or_else(|| {
                    Error::Slots(format!("slot {} is out of range 0..{}", slot.0, n))
                })?;
                if cell.is_some() {
                    return Err(Error::Slots(format!("slot {} resolved twice", slot.0)));
                }
                *cell = Some(peptide);
            }
        }

        resolved
            .into_iter()
            .enumerate()
            .map(|(ix, peptide)| {
                peptide.ok_or_else(|| Error::Slots(format!("slot {} is unresolved", ix)))
            })
            .collect()
    }
}
