pub mod background;
pub mod database;
pub mod decoy;
pub mod enzyme;
pub mod fasta;
pub mod index;

use flate2::read::MultiGzDecoder;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    Json(serde_json::Error),
    /// Invalid value for a user-facing parameter
    Parameter(String),
    /// Amino acid frequency table cannot be normalized
    Background(String),
    /// No protein records were found in the input
    EmptyDatabase,
    /// Protein sequence contains non-ASCII characters
    InvalidSequence { accession: String },
    /// A slot index was left unresolved or resolved more than once
    Slots(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IO(e) => e.fmt(f),
            Self::Json(e) => e.fmt(f),
            Self::Parameter(s) => write!(f, "invalid parameter: {}", s),
            Self::Background(s) => write!(f, "invalid amino acid distribution: {}", s),
            Self::EmptyDatabase => write!(f, "no protein sequences found"),
            Self::InvalidSequence { accession } => {
                write!(f, "protein `{}` contains non-ASCII residues", accession)
            }
            Self::Slots(s) => write!(f, "corrupt peptide layout: {}", s),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IO(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IO(e)
    }
}

/// Does the path end in "gz" or "gzip"?
fn gzip_heuristic(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => ext.to_ascii_lowercase() == "gz" || ext.to_ascii_lowercase() == "gzip",
        _ => false,
    }
}

fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let mut contents = String::new();
    if gzip_heuristic(path) {
        MultiGzDecoder::new(file).read_to_string(&mut contents)?;
    } else {
        std::io::BufReader::new(file).read_to_string(&mut contents)?;
    }
    Ok(contents)
}

/// Read a (possibly gzipped) FASTA file from disk
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<fasta::Fasta, Error> {
    let contents = read_to_string(path)?;
    let fasta = fasta::Fasta::parse(contents);
    if fasta.proteins.is_empty() {
        return Err(Error::EmptyDatabase);
    }
    Ok(fasta)
}

pub fn read_json<P, T>(path: P) -> Result<T, Error>
where
    P: AsRef<Path>,
    T: for<'de> serde::Deserialize<'de>,
{
    let contents = read_to_string(path)?;
    serde_json::from_str(&contents).map_err(Error::Json)
}
