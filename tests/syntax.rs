use bibscript::error::line_col;
use bibscript::{Bibliography, Config, ErrorCode, Record, Warning};

macro_rules! test_file {
    ($fname:expr) => {{
        let input = std::fs::read_to_string($fname).unwrap();

        let bib = Bibliography::parse(&input);
        assert!(bib.is_ok(), "{:?}", bib);
        let bib = bib.unwrap();
        assert_eq!(bib.serialize(), input);

        let concatenated: String = bib.records().iter().map(Record::full).collect();
        assert_eq!(concatenated, input);
        bib
    }};
}

#[test]
fn test_syntax_sample() {
    let bib = test_file!("assets/sample.bib");
    assert!(bib.warnings().is_empty(), "{:?}", bib.warnings());
    assert_eq!(bib.records().len(), 8);

    let keys: Vec<_> = bib.entries().map(|entry| entry.key()).collect();
    assert_eq!(keys, vec!["doe2020", "smith19", "knuth84", "lee21"]);

    let specials = bib
        .records()
        .iter()
        .filter(|record| matches!(record, Record::Special(_)))
        .count();
    assert_eq!(specials, 3);
}

#[test]
fn test_syntax_malformed() {
    let input = std::fs::read_to_string("assets/malformed.bib").unwrap();
    let bib = test_file!("assets/malformed.bib");

    let keys: Vec<_> = bib.entries().map(|entry| entry.key()).collect();
    assert_eq!(keys, vec!["good1", "good2", "good1", ""]);

    let warnings = bib.warnings();
    assert_eq!(warnings.len(), 5, "{warnings:?}");
    assert!(matches!(
        &warnings[0],
        Warning::Skipped { key: Some(key), code: ErrorCode::UnterminatedBlock, .. } if key == "broken"
    ));
    assert!(matches!(&warnings[1], Warning::TrailingText { key, .. } if key == "good2"));
    assert!(matches!(&warnings[2], Warning::Unkeyed { entry_type, .. } if entry_type == "misc"));
    assert!(matches!(&warnings[3], Warning::DuplicateKey { key, .. } if key == "good1"));
    assert!(matches!(&warnings[4], Warning::MissingKey { .. }));

    // every offset points at the text it describes
    let Some(offset) = warnings[1].offset() else {
        panic!("trailing text has an offset")
    };
    assert!(input[offset..].starts_with("stray text"));
    let Some(offset) = warnings[3].offset() else {
        panic!("duplicate key has an offset")
    };
    assert!(input[offset..].starts_with("@article{good1,\n  title = {Duplicate key}"));
}

#[test]
fn test_syntax_malformed_strict() {
    let input = std::fs::read_to_string("assets/malformed.bib").unwrap();
    let err = Bibliography::parse_with(&input, &Config::strict()).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnterminatedBlock);
    assert_eq!(err.key.as_deref(), Some("broken"));
    assert_eq!(line_col(&input, err.position), (7, 11));
}
