use crate::background::{Background, DEFAULT_FREQUENCIES};
use crate::enzyme::{segment, Piece};
use crate::fasta::{Fasta, Record};
use crate::index::{PeptideIndex, SlotIx};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Deserialize, Default, Debug)]
/// Parameters used for generating the decoy database
pub struct Builder {
    /// Prefix for decoy protein headers
    pub prefix: Option<String>,
    /// Number of independent decoy databases to generate
    pub mult_factor: Option<usize>,
    /// Fraction of peptides that are kept unscrambled
    pub shared_ratio: Option<f64>,
    /// Treat I/L, N/L, Q/E and K/E as equal when checking for collisions,
    /// and never draw I or L as replacement residues
    pub merge_similar: Option<bool>,
    /// Peptides shorter than this are only shuffled once
    pub min_len: Option<usize>,
    /// Number of shuffle (and then mutation) attempts per peptide
    pub max_tries: Option<usize>,
    /// Width of sequence lines in the output
    pub line_len: Option<usize>,
    /// Seed for the random number generator. Runs without a seed are
    /// not reproducible
    pub seed: Option<u64>,
    /// Amino acid frequencies used to draw replacement residues
    pub aa_frequencies: Option<BTreeMap<char, f64>>,
    /// Path to fasta database
    pub fasta: Option<String>,
}

impl Builder {
    pub fn make_parameters(self) -> Result<Parameters, Error> {
        let mult_factor = self.mult_factor.unwrap_or(1);
        if !(1..=1000).contains(&mult_factor) {
            return Err(Error::Parameter(format!(
                "`mult_factor` must be between 1 and 1000, got {}",
                mult_factor
            )));
        }

        let shared_ratio = self.shared_ratio.unwrap_or(0.0);
        if !(0.0..=1.0).contains(&shared_ratio) {
            return Err(Error::Parameter(format!(
                "`shared_ratio` must be between 0.0 and 1.0, got {}",
                shared_ratio
            )));
        }

        let max_tries = self.max_tries.unwrap_or(10);
        if max_tries == 0 {
            return Err(Error::Parameter("`max_tries` must be at least 1".into()));
        }

        let aa_frequencies = match self.aa_frequencies {
            Some(freqs) => freqs
                .into_iter()
                .map(|(aa, p)| match aa.is_ascii_alphabetic() {
                    true => Ok((aa.to_ascii_uppercase(), p)),
                    false => Err(Error::Parameter(format!(
                        "`aa_frequencies` contains non-amino acid character: {}",
                        aa
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => DEFAULT_FREQUENCIES
                .iter()
                .map(|&(aa, p)| (aa as char, p))
                .collect(),
        };

        let parameters = Parameters {
            prefix: self.prefix.unwrap_or_else(|| "mimic|Random_".into()),
            mult_factor,
            shared_ratio,
            merge_similar: self.merge_similar.unwrap_or(false),
            min_len: self.min_len.unwrap_or(4),
            max_tries,
            line_len: self.line_len.unwrap_or(60).max(1),
            seed: self.seed,
            aa_frequencies,
            fasta: self.fasta,
        };

        // Surface normalization problems now, rather than mid-run
        parameters.background()?;
        Ok(parameters)
    }

    pub fn update_fasta(&mut self, fasta: String) {
        self.fasta = Some(fasta)
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct Parameters {
    pub prefix: String,
    pub mult_factor: usize,
    pub shared_ratio: f64,
    pub merge_similar: bool,
    pub min_len: usize,
    pub max_tries: usize,
    pub line_len: usize,
    pub seed: Option<u64>,
    aa_frequencies: Vec<(char, f64)>,
    pub fasta: Option<String>,
}

impl Default for Parameters {
    fn default() -> Self {
        Builder::default()
            .make_parameters()
            .expect("default parameters are valid")
    }
}

impl Parameters {
    pub fn background(&self) -> Result<Background, Error> {
        let raw = self
            .aa_frequencies
            .iter()
            .map(|&(aa, p)| (aa as u8, p))
            .collect::<Vec<_>>();
        Background::load(&raw, self.merge_similar)
    }

    /// Header naming for decoy round `round` (1-based)
    pub fn naming(&self, round: usize) -> Naming<'_> {
        let suffix = match self.mult_factor > 1 {
            true => format!("|shuffle_{}", round),
            false => String::new(),
        };
        Naming {
            prefix: &self.prefix,
            suffix,
        }
    }
}

/// Builds decoy protein headers as `{prefix}{counter}{suffix}`
pub struct Naming<'a> {
    pub prefix: &'a str,
    pub suffix: String,
}

impl<'a> Naming<'a> {
    pub fn header(&self, counter: usize) -> String {
        format!("{}{}{}", self.prefix, counter, self.suffix)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Start of the protein with the given (0-based) input position
    Header(usize),
    Connector(String),
    Slot(SlotIx),
}

/// A segmented protein database: the layout needed to reassemble every
/// protein, and the index of the real peptides filling its slots
pub struct Database {
    layout: Vec<Token>,
    slots: usize,
    proteins: usize,
    pub peptides: PeptideIndex,
}

impl Database {
    /// Segment every protein of `fasta`, in input order. Slot indices are
    /// assigned from a single counter, so no slot is ever shared by two
    /// peptides.
    pub fn build(fasta: &Fasta) -> Result<Database, Error> {
        if fasta.proteins.is_empty() {
            return Err(Error::EmptyDatabase);
        }

        let mut layout = Vec::new();
        let mut peptides = PeptideIndex::default();
        let mut slot = 0u32;

        for (ix, protein) in fasta.proteins.iter().enumerate() {
            if !protein.sequence.is_ascii() {
                return Err(Error::InvalidSequence {
                    accession: protein.accession.clone(),
                });
            }
            layout.push(Token::Header(ix));

            for piece in segment(&protein.sequence) {
                match piece {
                    Piece::Peptide(s) => {
                        peptides.add_peptide(s.as_bytes(), SlotIx(slot));
                        layout.push(Token::Slot(SlotIx(slot)));
                        slot += 1;
                    }
                    Piece::Connector(s) => layout.push(Token::Connector(s.into())),
                }
            }
        }

        log::trace!(
            "segmented {} proteins into {} peptides ({} distinct)",
            fasta.proteins.len(),
            slot,
            peptides.len()
        );

        Ok(Database {
            layout,
            slots: slot as usize,
            proteins: fasta.proteins.len(),
            peptides,
        })
    }

    /// Total number of peptide slots across all proteins
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Number of proteins, and so of records per assembled round
    pub fn proteins(&self) -> usize {
        self.proteins
    }

    pub fn layout(&self) -> &[Token] {
        &self.layout
    }

    /// Rebuild every protein, filling each slot with the peptide `index`
    /// holds for it. Connectors are copied verbatim.
    ///
    /// Fails if `index` leaves a slot unresolved or resolves it twice.
    pub fn assemble(&self, index: &PeptideIndex, naming: &Naming) -> Result<Vec<Record>, Error> {
        let resolved = index.resolve(self.slots)?;
        let mut records: Vec<Record> = Vec::with_capacity(self.proteins);

        for token in &self.layout {
            match token {
                Token::Header(ix) => records.push(Record {
                    header: naming.header(ix + 1),
                    sequence: Vec::new(),
                }),
                Token::Connector(s) => {
                    if let Some(record) = records.last_mut() {
                        record.sequence.extend_from_slice(s.as_bytes());
                    }
                }
                Token::Slot(slot) => {
                    if let Some(record) = records.last_mut() {
                        record
                            .sequence
                            .extend_from_slice(resolved[slot.0 as usize]);
                    }
                }
            }
        }
        Ok(records)
    }
}
