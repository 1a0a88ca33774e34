/// Residues after which trypsin cleaves
pub const CLEAVAGE_SITES: [u8; 2] = [b'K', b'R'];

/// Stop codon marker, sometimes found at the end of translated sequences
pub const TERMINATOR: u8 = b'*';

#[inline]
pub fn is_cleavage_site(residue: u8) -> bool {
    CLEAVAGE_SITES.contains(&residue)
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
/// A piece of a segmented protein sequence
pub enum Piece<'s> {
    /// Stretch of non-cleavage residues, subject to scrambling
    Peptide(&'s str),
    /// Maximal run of consecutive cleavage residues, always kept verbatim
    Connector(&'s str),
}

impl<'s> Piece<'s> {
    pub fn as_str(&self) -> &'s str {
        match *self {
            Piece::Peptide(s) | Piece::Connector(s) => s,
        }
    }
}

/// Split a protein sequence into alternating peptides and connectors.
///
/// Concatenating the returned pieces reproduces `sequence` exactly, minus a
/// trailing [`TERMINATOR`] if one is present. A sequence without any cleavage
/// site yields a single peptide.
pub fn segment(sequence: &str) -> Vec<Piece<'_>> {
    let bytes = sequence.as_bytes();
    let len = match bytes.last() {
        Some(&TERMINATOR) => bytes.len() - 1,
        _ => bytes.len(),
    };

    let mut pieces = Vec::new();
    let mut last = 0;
    let mut pos = 0;
    while pos < len {
        if pos == 0 || is_cleavage_site(bytes[pos]) {
            if pos > last {
                pieces.push(Piece::Peptide(&sequence[last..pos]));
            }
            let run = bytes[pos..len]
                .iter()
                .take_while(|&&r| is_cleavage_site(r))
                .count();
            if run > 0 {
                pieces.push(Piece::Connector(&sequence[pos..pos + run]));
            }
            last = pos + run;
            pos += run.max(1);
        } else {
            pos += 1;
        }
    }

    if len > last {
        pieces.push(Piece::Peptide(&sequence[last..len]));
    }
    pieces
}
