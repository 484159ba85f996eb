//! # Description of the record syntax
//! A reference grammar for the records understood by [`parse`](crate::parse), written as a
//! [pest](https://pest.rs) grammar. The cursor parser is the implementation; this module exists to
//! state the accepted shape explicitly, and the tests check that the two agree.
//!
//! ## Whitespace and identifiers
//! 1. Whitespace is any ASCII char accepted by `u8::is_ascii_whitespace`. It is never skipped
//!    implicitly, since every byte belongs to some piece of the record.
//!    ```ignore
//!    ws_char = _{ " " | "\t" | "\n" | "\r" | "\x0C" }
//!    ```
//! 2. An identifier char is any non-ASCII char, or a printable ASCII char other than
//!    `{}(),=\#%"`. Entry types, field keys and bare words are runs of identifier chars, so
//!    `journal-URL` is a field key and `-5` is a bare word.
//!
//! ## Blocks
//! 1. A `\` escapes the following char, unless it is a newline.
//!    ```ignore
//!    escape = _{ "\\" ~ (!"\n" ~ ANY)? }
//!    ```
//! 2. A curly block has balanced brackets. A `"` inside it has no special meaning.
//!    ```ignore
//!    curly = @{ "{" ~ (curly | escape | !("{" | "}" | "\\") ~ ANY)* ~ "}" }
//!    ```
//! 3. A quoted block ends at the first `"` outside of brackets.
//!    ```ignore
//!    quoted = @{ "\"" ~ (curly | escape | !("{" | "}" | "\\" | "\"") ~ ANY)* ~ "\"" }
//!    ```
//!
//! ## Values and fields
//! 1. A value is a list of tokens joined by `#`. A field may have an empty value.
//!    ```ignore
//!    value = @{ token ~ (ws ~ "#" ~ ws ~ token)* }
//!    field = { field_key ~ ws ~ "=" ~ ws ~ value? ~ ws }
//!    ```
//! 2. An entry is `@type{key,` followed by comma separated fields and a closing `}`. Anything
//!    after the closing bracket is kept as trailing text.
//!    ```ignore
//!    entry = { SOI ~ "@" ~ entry_type ~ "{" ~ entry_key ~ "," ~ ws ~ fields ~ "}" ~ ANY* ~ EOI }
//!    ```
//!
//! ## Differences from the cursor parser
//! The cursor parser is more lenient than this grammar. It skips stray chars between fields,
//! reads bare words separated only by whitespace as one value, and classifies `@comment`,
//! `@string` and `@preamble` records before looking at their bodies.
use pest_derive::Parser;

/// A simple automatically derived pest parser.
#[derive(Parser)]
#[grammar = "syntax/bibtex.pest"] // relative to src
pub struct BibtexParser;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_record;
    use crate::record::Record;
    use pest::Parser;

    const ENTRIES: &[&str] = &[
        "@article{key:0,\n  author = \"Anonymous\",\n  title = {A title},\n  year = 2014,\n}\n\n",
        "@a{k, t = {a{b}c}, u = {a\\}b}}",
        "@a{k, t = \"foo\" # bar # \"baz\" , u = x}",
        "@a{k, t = {A} # \" and \" # {B},\n}",
        "@a{k, t = , u = {}}",
        "@a{k, journal-URL = {x}, year = -5, ISSN-L = 0000-0000}",
        "@a{k,\n\ttitle   =  {T} ,\n\tyear=1999 }",
        "@book{,}\n",
    ];

    #[test]
    fn test_grammar_accepts() {
        for input in ENTRIES {
            assert!(
                BibtexParser::parse(Rule::entry, input).is_ok(),
                "grammar rejected {input:?}"
            );
        }
    }

    #[test]
    fn test_grammar_rejects() {
        for input in [
            "@a{k, t = {x}",
            "@a{k, t {x}}",
            "@a{k, t = \"a}\"}",
            "@a{k, t = (x)}",
            "preamble",
        ] {
            assert!(BibtexParser::parse(Rule::entry, input).is_err());
            assert!(!matches!(parse_record(input), Ok(Record::Entry(_))));
        }
    }

    #[test]
    fn test_fields_agree() {
        for input in ENTRIES {
            let Ok(Record::Entry(entry)) = parse_record(input) else {
                panic!("parser rejected {input:?}");
            };

            let mut pairs = BibtexParser::parse(Rule::entry, input).unwrap();
            let mut expected = Vec::new();
            for pair in pairs.next().unwrap().into_inner() {
                if pair.as_rule() == Rule::field {
                    let mut inner = pair.into_inner();
                    let key = inner.next().unwrap().as_str();
                    let value = inner.next().map(|p| p.as_str()).unwrap_or_default();
                    expected.push((key.to_owned(), value.to_owned()));
                }
            }

            let found: Vec<_> = entry
                .fields()
                .map(|field| {
                    let close = if field.value.head() == "{" { "}" } else { "" };
                    (
                        field.name().to_owned(),
                        format!("{}{}{close}", field.value.head(), field.value()),
                    )
                })
                .collect();
            assert_eq!(found, expected);
        }
    }
}
