use anyhow::Context;
use clap::{value_parser, Arg, Command, ValueHint};
use mimic_cli::input::Input;
use mimic_cli::runner::Runner;
use std::io::Write;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::default()
        .filter_level(log::LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("MIMIC_LOG", "error,mimic=info"))
        .init();

    let matches = Command::new("mimic")
        .version(clap::crate_version!())
        .about("Generate entrapment (mimic) protein databases by scrambling tryptic peptides")
        .arg(
            Arg::new("fasta")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Path to FASTA database. Overrides the FASTA file \
                     specified in the configuration file.",
                )
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("parameters")
                .long("parameters")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Path to configuration parameters (JSON file)")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("prefix")
                .short('p')
                .long("prefix")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Prefix to mimic proteins (default = \"mimic|Random_\")")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("mult-factor")
                .short('m')
                .long("mult-factor")
                .value_parser(value_parser!(u16).range(1..=1000))
                .help("Number of times the database should be multiplied (default = 1)")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("shared-pept-ratio")
                .short('s')
                .long("shared-pept-ratio")
                .value_parser(value_parser!(f64))
                .help(
                    "Ratio of shared peptides that will stay preserved in the \
                     mimic database (default = 0.0)",
                )
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Seed for the random number generator, for reproducible output")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("merge-similar")
                .long("merge-similar")
                .action(clap::ArgAction::SetTrue)
                .help("Treat I/L, N/L, Q/E and K/E as identical when checking for duplicate peptides"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Path where the mimic database will be written (default = stdout)")
                .value_hint(ValueHint::FilePath),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    let input = Input::from_arguments(matches)?;

    let runner = input.build().and_then(Runner::new)?;

    match &runner.parameters.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file `{}`", path))?;
            let mut wtr = std::io::BufWriter::new(file);
            runner.run(&mut wtr)?;
            wtr.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut wtr = std::io::BufWriter::new(stdout.lock());
            runner.run(&mut wtr)?;
            wtr.flush()?;
        }
    }

    Ok(())
}
