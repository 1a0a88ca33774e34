use super::input::Settings;
use anyhow::Context;
use log::info;
use mimic_core::database::Database;
use mimic_core::decoy::{DecoyEngine, DecoyStats};
use mimic_core::fasta::{write_records, Fasta};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::time::Instant;

pub struct Runner {
    pub database: Database,
    pub parameters: Settings,
    start: Instant,
}

impl Runner {
    pub fn new(parameters: Settings) -> anyhow::Result<Self> {
        let start = Instant::now();
        let path = parameters
            .database
            .fasta
            .clone()
            .context("`database.fasta` must be set")?;

        info!("reading fasta file and in-silico digesting proteins");
        let fasta = mimic_core::read_fasta(&path)
            .with_context(|| format!("Failed to build database from `{}`", path))?;

        let mut runner = Self::with_fasta(parameters, &fasta)
            .with_context(|| format!("Failed to build database from `{}`", path))?;
        runner.start = start;
        Ok(runner)
    }

    /// Build a runner from an already parsed database
    pub fn with_fasta(parameters: Settings, fasta: &Fasta) -> anyhow::Result<Self> {
        let start = Instant::now();
        let database = Database::build(fasta)?;
        info!(
            "digested {} proteins into {} peptides ({} distinct) in {:#?}",
            database.proteins(),
            database.slots(),
            database.peptides.len(),
            start.elapsed()
        );
        Ok(Self {
            database,
            parameters,
            start,
        })
    }

    /// Generate every decoy round, writing the decoy proteins to `wtr`.
    /// Real proteins are never written.
    pub fn run<W: Write>(&self, wtr: &mut W) -> anyhow::Result<DecoyStats> {
        let parameters = &self.parameters.database;
        let mut rng = match parameters.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut engine = DecoyEngine::new(parameters, &self.database.peptides)?;
        let mut total = DecoyStats::default();

        for round in 1..=parameters.mult_factor {
            info!("shuffling round: {}", round);
            let (decoys, stats) = engine.round(&self.database.peptides, &mut rng);
            log::debug!("round {}: {:?}", round, stats);
            if stats.exhausted > 0 {
                log::warn!(
                    "round {}: {} peptides still collide after {} shuffles and mutations",
                    round,
                    stats.exhausted,
                    parameters.max_tries
                );
            }

            let records = self
                .database
                .assemble(&decoys, &parameters.naming(round))
                .context("Failed to assemble decoy proteins")?;
            write_records(wtr, &records, parameters.line_len)
                .context("Failed to write decoy proteins")?;
            total += stats;
        }
        wtr.flush()?;

        info!(
            "generated {} decoy databases ({} shuffled, {} mutated, {} shared peptides) in {:#?}",
            parameters.mult_factor,
            total.shuffled,
            total.mutated,
            total.shared,
            self.start.elapsed()
        );
        Ok(total)
    }
}
