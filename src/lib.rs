//! # bibscript
//! Lossless, format-preserving reading and editing of `.bib` files.
//!
//! A file is split into records at every line that begins with `@`. Each record is parsed into
//! pieces of original text which remember which part of themselves is the logical value. Editing
//! a field value only changes the bytes of that value: indentation, alignment, comments and
//! anything the parser does not understand are written back exactly as they were read.
//!
//! ```
//! use bibscript::Bibliography;
//!
//! let input = "@article{doe20,\n  title   = {Old Title},\n  journal = \"J. Chem.\",\n}\n";
//! let mut bib = Bibliography::parse(input).unwrap();
//!
//! let entry = bib.entry_mut("doe20").unwrap();
//! entry.set("title", "New Title");
//!
//! assert_eq!(
//!     bib.serialize(),
//!     "@article{doe20,\n  title   = {New Title},\n  journal = \"J. Chem.\",\n}\n"
//! );
//! ```
//!
//! Records which cannot be parsed are kept as raw text by default, so loading never loses data.
//! See [`Config`] to abort instead.
#![cfg_attr(docsrs, feature(doc_cfg))]

/// The collection of records making up a file.
pub mod bibliography;

/// Load options.
pub mod config;

/// Warnings about recoverable problems.
pub mod diagnostic;

/// Error types for parsing.
pub mod error;

pub mod fs;

/// Record parsing.
pub mod parse;

/// Representations of records and fields.
pub mod record;

#[cfg(feature = "syntax")]
#[cfg_attr(docsrs, doc(cfg(feature = "syntax")))]
pub mod syntax;

pub mod view;

/// Text with an editable value region.
pub mod wrapped;

// re-exports
pub use bibliography::Bibliography;
pub use config::{Config, OnError};
pub use diagnostic::Warning;
pub use error::{Error, ErrorCode, Result};
pub use record::{Entry, EntryKind, Field, Part, Record, SpecialEntry};
pub use wrapped::Wrapped;
