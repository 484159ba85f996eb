use bibscript::{Bibliography, Record, Wrapped};

fn sample() -> (String, Bibliography) {
    let input = std::fs::read_to_string("assets/sample.bib").unwrap();
    let bib = Bibliography::parse(&input).unwrap();
    (input, bib)
}

#[test]
fn test_edit_is_local() {
    let (input, mut bib) = sample();

    let entry = bib.entry_mut("doe2020").unwrap();
    assert!(entry.set("title", "Replaced"));
    assert!(entry.set("YEAR", "2021"));

    let expected = input
        .replace(
            "{A {Nested} Title with \\{escaped\\} braces}",
            "{Replaced}",
        )
        .replace("year      = 2020,", "year      = 2021,");
    assert_eq!(bib.serialize(), expected);
}

#[test]
fn test_edit_string_list() {
    let (input, mut bib) = sample();
    let entry = bib.entry_mut("smith19").unwrap();
    assert_eq!(
        entry.get("title").unwrap().value(),
        "\"Quoted \" # {and braced} # \" parts\""
    );
    entry.set("title", "{Plain}");
    assert_eq!(
        bib.serialize(),
        input.replace("\"Quoted \" # {and braced} # \" parts\"", "{Plain}")
    );
}

#[test]
fn test_edit_every_field() {
    let (input, mut bib) = sample();
    for entry in bib.entries_mut() {
        for field in entry.fields_mut() {
            let value = field.value().to_owned();
            field.set_value("");
            field.set_value(&value);
        }
    }
    assert_eq!(bib.serialize(), input);
}

#[test]
fn test_raw_records() {
    let (_, mut bib) = sample();
    let Record::Raw(header) = &bib.records()[0] else {
        panic!("expected the file header to be raw text")
    };
    assert!(header.value().starts_with("% Exported"));

    bib.records_mut()[0] = Record::Raw(Wrapped::new(""));
    assert!(bib.serialize().starts_with("@string{jchem"));
}

#[test]
fn test_views() {
    let (_, bib) = sample();
    let refs: Vec<_> = bib.entries().map(|entry| entry.reference()).collect();
    assert_eq!(
        refs,
        vec!["jchem 12, 100 (2020)", "1901.00001", "knuth84", "lee21"]
    );

    let knuth = bib.entry("knuth84").unwrap();
    assert_eq!(knuth.field_values()["publisher"], "Addison-Wesley");
    assert_eq!(
        knuth.summary().to_string(),
        "@book, knuth84\n\ttitle     : The \\TeX book\n\tpublisher : Addison-Wesley\n\tyear      : 1984"
    );
}
