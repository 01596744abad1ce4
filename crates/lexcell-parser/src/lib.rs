//! # Lexcell Parser
//!
//! Parser for lexical spreadsheet cells. A cell such as
//! `/ta/ [ta.'ʔa] ['ta] (cabello púbico){4}` packs transcriptions, free
//! variants, comments and source citations into one string; this crate turns
//! it into structured [`ParsedFormEntry`] records.
//!
//! The pipeline per cell:
//!
//! 1. **Clean** - NFC-normalise, trim, turn line breaks into separators
//! 2. **Split** - cut the cell into elements at top-level separators
//! 3. **Extract** - assign each bracketed group to its field
//! 4. **Scan variants** - split transcriptions at variant markers
//! 5. **Resolve sources** - namespace source keys by language
//!
//! Failures are per element and recoverable: the element is reported as an
//! [`ElementOutcome::Failed`] and parsing continues.
//!
//! ## Usage
//!
//! ```
//! use lexcell_parser::{CellParser, ElementOutcome, ParserConfig, RawCell};
//!
//! let parser = CellParser::new(ParserConfig::default());
//! let cell = RawCell::new("[dʒi'tɨka] {2} ~ [ʒi'tɨka] {2}");
//!
//! for outcome in parser.parse(&cell, Some("abui"), "Sheet1.D7") {
//!     match outcome {
//!         ElementOutcome::Form(entry) => {
//!             assert_eq!(entry.phonetic.as_deref(), Some("dʒi'tɨka"));
//!             assert_eq!(entry.variants, vec!["~[ʒi'tɨka]"]);
//!         }
//!         ElementOutcome::Elided => {}
//!         ElementOutcome::Failed(err) => panic!("{err}"),
//!     }
//! }
//! ```

pub mod bracket;
mod cell;
pub mod config;
pub mod error;
pub mod fields;
pub mod separator;
pub mod source;
mod span;
pub mod variant;

pub use cell::{CellForms, CellParser, ElementOutcome, ParsedFormEntry, RawCell, clean_cell_value};
pub use config::{Field, FieldSpec, ParserConfig};
pub use error::{CellError, CellErrorKind, Diagnostic, ParseError};
pub use source::SourceRef;
pub use span::Span;
