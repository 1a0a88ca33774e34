use mimic_cli::input::Input;
use mimic_cli::runner::Runner;
use mimic_core::fasta::Fasta;

fn settings(json: &str) -> anyhow::Result<mimic_cli::input::Settings> {
    let input: Input = serde_json::from_str(json)?;
    input.build()
}

#[test]
fn integration() -> anyhow::Result<()> {
    let parameters = settings(
        r#"{"database": {"fasta": "../../tests/Q99536.fasta", "mult_factor": 2, "seed": 7}}"#,
    )?;
    let runner = Runner::new(parameters)?;

    let mut output = Vec::new();
    let stats = runner.run(&mut output)?;
    assert_eq!(stats.shared, 0);
    assert_eq!(
        stats.shuffled + stats.mutated + stats.short_collisions + stats.exhausted,
        2 * runner.database.peptides.len()
    );

    let output = String::from_utf8(output)?;
    let decoys = Fasta::parse(output.clone());
    assert_eq!(decoys.proteins.len(), 2);
    assert_eq!(decoys.proteins[0].accession, "mimic|Random_1|shuffle_1");
    assert_eq!(decoys.proteins[1].accession, "mimic|Random_1|shuffle_2");
    for protein in &decoys.proteins {
        assert_eq!(protein.sequence.len(), 393);
    }
    assert!(output.lines().all(|line| line.len() <= 60 || line.starts_with('>')));

    Ok(())
}

#[test]
fn reproducible() -> anyhow::Result<()> {
    let run = || -> anyhow::Result<Vec<u8>> {
        let parameters = settings(r#"{"database": {"seed": 11}}"#)?;
        let fasta = Fasta::parse(">a\nMADEEKLPPGWEKRMSRSSGRVYYFNHITNASQWERPSGN\n".into());
        let mut output = Vec::new();
        Runner::with_fasta(parameters, &fasta)?.run(&mut output)?;
        Ok(output)
    };
    assert_eq!(run()?, run()?);
    Ok(())
}

#[test]
fn mkaaaakr() -> anyhow::Result<()> {
    let parameters = settings(r#"{"database": {"shared_ratio": 0.0, "seed": 1}}"#)?;
    let fasta = Fasta::parse(">prot1\nMKAAAAKR\n".into());
    let mut output = Vec::new();
    Runner::with_fasta(parameters, &fasta)?.run(&mut output)?;

    let output = String::from_utf8(output)?;
    let lines = output.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], ">mimic|Random_1");
    assert_eq!(&lines[1][..2], "MK");
    assert_eq!(&lines[1][6..], "KR");
    assert_eq!(lines[1].len(), 8);
    Ok(())
}

#[test]
fn fully_shared() -> anyhow::Result<()> {
    let parameters = settings(r#"{"database": {"shared_ratio": 1.0, "prefix": "shared_"}}"#)?;
    let fasta = Fasta::parse(">a\nMADEEKLPPGWEKR\n>b\nMSRSSGR\n".into());
    let mut output = Vec::new();
    Runner::with_fasta(parameters, &fasta)?.run(&mut output)?;
    assert_eq!(
        String::from_utf8(output)?,
        ">shared_1\nMADEEKLPPGWEKR\n>shared_2\nMSRSSGR\n"
    );
    Ok(())
}

#[test]
fn empty_database() -> anyhow::Result<()> {
    let parameters = settings("{}")?;
    assert!(Runner::with_fasta(parameters, &Fasta::parse(String::new())).is_err());
    Ok(())
}
