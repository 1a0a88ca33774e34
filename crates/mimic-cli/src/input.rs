use anyhow::{ensure, Context};
use clap::ArgMatches;
use mimic_core::database::{Builder, Parameters};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
/// Actual run parameters - may include overrides or default values not set by user
pub struct Settings {
    pub version: String,
    pub database: Parameters,
    /// Output FASTA path. Decoys are written to stdout if missing
    pub output: Option<String>,
}

#[derive(Deserialize, Default)]
/// Input parameters deserialized from JSON file
pub struct Input {
    #[serde(default)]
    pub database: Builder,
    pub output: Option<String>,
}

impl Input {
    pub fn from_arguments(matches: ArgMatches) -> anyhow::Result<Self> {
        let mut input = match matches.get_one::<String>("parameters") {
            Some(path) => Input::load(path)
                .with_context(|| format!("Failed to read parameters from `{path}`"))?,
            None => Input::default(),
        };

        // Handle JSON configuration overrides
        if let Some(fasta) = matches.get_one::<String>("fasta") {
            log::trace!("overriding `database.fasta` parameter.");
            input.database.update_fasta(fasta.into());
        }
        if let Some(prefix) = matches.get_one::<String>("prefix") {
            log::trace!("overriding `database.prefix` parameter.");
            input.database.prefix = Some(prefix.into());
        }
        if let Some(mult_factor) = matches.get_one::<u16>("mult-factor").copied() {
            log::trace!("overriding `database.mult_factor` parameter.");
            input.database.mult_factor = Some(mult_factor as usize);
        }
        if let Some(ratio) = matches.get_one::<f64>("shared-pept-ratio").copied() {
            log::trace!("overriding `database.shared_ratio` parameter.");
            input.database.shared_ratio = Some(ratio);
        }
        if let Some(seed) = matches.get_one::<u64>("seed").copied() {
            log::trace!("overriding `database.seed` parameter.");
            input.database.seed = Some(seed);
        }
        if matches.get_flag("merge-similar") {
            input.database.merge_similar = Some(true);
        }
        if let Some(output) = matches.get_one::<String>("output") {
            log::trace!("overriding `output` parameter.");
            input.output = Some(output.into());
        }

        ensure!(
            input.database.fasta.is_some(),
            "`database.fasta` must be set. For more information try '--help'"
        );

        Ok(input)
    }

    pub fn load<S: AsRef<str>>(path: S) -> anyhow::Result<Self> {
        mimic_core::read_json(path.as_ref()).map_err(anyhow::Error::from)
    }

    pub fn build(self) -> anyhow::Result<Settings> {
        let database = self.database.make_parameters()?;

        if database.shared_ratio >= 1.0 {
            log::warn!("`shared_ratio` is 1.0: every decoy peptide will equal its real peptide");
        }
        if database.seed.is_none() {
            log::info!("no random seed set, output will not be reproducible");
        }

        Ok(Settings {
            version: clap::crate_version!().into(),
            database,
            output: self.output,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deserialize() -> anyhow::Result<()> {
        let input: Input = serde_json::from_str(
            r#"{
                "database": {
                    "prefix": "decoy|",
                    "mult_factor": 3,
                    "shared_ratio": 0.25,
                    "seed": 42,
                    "fasta": "human.fasta"
                },
                "output": "decoys.fasta"
            }"#,
        )?;
        let settings = input.build()?;
        assert_eq!(settings.database.prefix, "decoy|");
        assert_eq!(settings.database.mult_factor, 3);
        assert_eq!(settings.database.shared_ratio, 0.25);
        assert_eq!(settings.database.seed, Some(42));
        assert_eq!(settings.database.fasta.as_deref(), Some("human.fasta"));
        assert_eq!(settings.output.as_deref(), Some("decoys.fasta"));
        Ok(())
    }

    #[test]
    fn defaults() -> anyhow::Result<()> {
        let input: Input = serde_json::from_str("{}")?;
        let settings = input.build()?;
        assert_eq!(settings.database.prefix, "mimic|Random_");
        assert_eq!(settings.database.mult_factor, 1);
        assert_eq!(settings.database.shared_ratio, 0.0);
        assert_eq!(settings.database.line_len, 60);
        assert!(settings.output.is_none());
        Ok(())
    }

    #[test]
    fn out_of_range() {
        let input: Input =
            serde_json::from_str(r#"{"database": {"shared_ratio": 2.0}}"#).unwrap();
        assert!(input.build().is_err());
    }
}
