use mimic_core::database::{Builder, Database, Parameters};
use mimic_core::decoy::DecoyEngine;
use mimic_core::enzyme::is_cleavage_site;
use mimic_core::fasta::Fasta;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;

#[test]
fn q99536() -> Result<(), mimic_core::Error> {
    let fasta = mimic_core::read_fasta("../../tests/Q99536.fasta")?;
    assert_eq!(fasta.proteins.len(), 1);
    let real = &fasta.proteins[0].sequence;

    let database = Database::build(&fasta)?;
    let parameters = Parameters::default();
    let mut engine = DecoyEngine::new(&parameters, &database.peptides)?;
    let (decoys, stats) = engine.round(&database.peptides, &mut StdRng::seed_from_u64(1));
    assert_eq!(stats.shared, 0);
    assert_eq!(decoys.slots(), database.slots());

    let records = database.assemble(&decoys, &parameters.naming(1))?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].header, "mimic|Random_1");

    // Cleavage sites stay exactly where they were
    let decoy = &records[0].sequence;
    assert_eq!(decoy.len(), real.len());
    for (r, d) in real.bytes().zip(decoy.iter().copied()) {
        assert_eq!(is_cleavage_site(r), is_cleavage_site(d));
        if is_cleavage_site(r) {
            assert_eq!(r, d);
        }
    }
    assert_ne!(decoy.as_slice(), real.as_bytes());
    Ok(())
}

#[test]
fn mkaaaakr() -> Result<(), mimic_core::Error> {
    let fasta = Fasta::parse(">prot1\nMKAAAAKR\n".into());
    let database = Database::build(&fasta)?;
    let parameters = Parameters::default();
    let mut engine = DecoyEngine::new(&parameters, &database.peptides)?;
    let (decoys, _) = engine.round(&database.peptides, &mut StdRng::seed_from_u64(2));
    let records = database.assemble(&decoys, &parameters.naming(1))?;

    assert_eq!(records.len(), 1);
    assert!(records[0].header.starts_with("mimic|Random_"));
    assert!(records[0].header.ends_with('1'));

    let sequence = std::str::from_utf8(&records[0].sequence).unwrap();
    assert_eq!(sequence.len(), 8);
    assert_eq!(&sequence[1..2], "K");
    assert_eq!(&sequence[6..], "KR");
    // `M` can only shuffle to itself; `AAAA` has to be mutated
    assert_eq!(&sequence[..1], "M");
    assert_ne!(&sequence[2..6], "AAAA");
    assert!(!sequence[2..6].bytes().any(is_cleavage_site));
    Ok(())
}

#[test]
fn shared_peptides_decoy_consistently() -> Result<(), mimic_core::Error> {
    let fasta = Fasta::parse(
        ">a\nPEPTIDEKELVISLIVESR\n>b\nGGGGKPEPTIDER\n>c\nPEPTIDE\n".into(),
    );
    let database = Database::build(&fasta)?;
    let parameters = Builder {
        mult_factor: Some(2),
        ..Default::default()
    }
    .make_parameters()?;

    let mut engine = DecoyEngine::new(&parameters, &database.peptides)?;
    let mut rng = StdRng::seed_from_u64(3);
    for round in 1..=parameters.mult_factor {
        let (decoys, _) = engine.round(&database.peptides, &mut rng);
        let records = database.assemble(&decoys, &parameters.naming(round))?;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].header, format!("mimic|Random_1|shuffle_{}", round));

        let a = &records[0].sequence[..7];
        let b = &records[1].sequence[5..12];
        let c = &records[2].sequence[..];
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_ne!(a, b"PEPTIDE");
    }
    Ok(())
}

#[test]
fn missing_input() {
    assert!(matches!(
        mimic_core::read_fasta("../../tests/does-not-exist.fasta"),
        Err(mimic_core::Error::IO(_))
    ));
}

#[test]
fn gzipped_input() -> Result<(), mimic_core::Error> {
    let plain = "../../tests/Q99536.fasta";
    let path = std::env::temp_dir().join(format!("mimic-{}.fasta.gz", std::process::id()));

    let mut encoder = flate2::write::GzEncoder::new(
        std::fs::File::create(&path)?,
        flate2::Compression::default(),
    );
    encoder.write_all(&std::fs::read(plain)?)?;
    encoder.finish()?;

    let gzipped = mimic_core::read_fasta(&path);
    std::fs::remove_file(&path)?;

    let gzipped = gzipped?;
    let expected = mimic_core::read_fasta(plain)?;
    assert_eq!(gzipped.proteins.len(), 1);
    assert_eq!(gzipped.proteins, expected.proteins);
    Ok(())
}
