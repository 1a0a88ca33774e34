use std::io::Write;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Protein {
    /// First whitespace-delimited token of the header line
    pub accession: String,
    pub sequence: String,
}

pub struct Fasta {
    pub proteins: Vec<Protein>,
}

impl Fasta {
    // Parse a string into a fasta database
    //
    // Every header is kept, even if no sequence follows it, so that the
    // decoy database contains exactly one entry per input entry
    pub fn parse(contents: String) -> Fasta {
        let mut proteins = Vec::new();
        let mut last_id: Option<&str> = None;
        let mut s = String::new();

        for line in contents.as_str().lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(id) = line.strip_prefix('>') {
                if let Some(last_id) = last_id {
                    proteins.push(Protein {
                        accession: accession(last_id),
                        sequence: std::mem::take(&mut s),
                    });
                }
                last_id = Some(id);
            } else {
                s.push_str(&line.to_ascii_uppercase());
            }
        }

        if let Some(last_id) = last_id {
            proteins.push(Protein {
                accession: accession(last_id),
                sequence: s,
            });
        } else if !s.is_empty() {
            log::warn!("ignoring sequence data without a `>` header line");
        }

        Fasta { proteins }
    }
}

fn accession(id: &str) -> String {
    id.split_ascii_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// An output FASTA entry
pub struct Record {
    pub header: String,
    pub sequence: Vec<u8>,
}

/// Write records in FASTA format, wrapping sequences at `line_len` columns
pub fn write_records<W: Write>(
    wtr: &mut W,
    records: &[Record],
    line_len: usize,
) -> std::io::Result<()> {
    let line_len = line_len.max(1);
    for record in records {
        writeln!(wtr, ">{}", record.header)?;
        for line in record.sequence.chunks(line_len) {
            wtr.write_all(line)?;
            wtr.write_all(b"\n")?;
        }
    }
    Ok(())
}
