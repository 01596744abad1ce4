//! Lexcell Core Types and Definitions
//!
//! This crate provides the data model shared by the lexcell parser and the
//! cognate tooling. It includes:
//!
//! - **Forms**: Word forms with their segment sequences ([`Form`])
//! - **Cognates**: Cognate sets and judgements ([`CognateSet`], [`CognateJudgement`])
//! - **Segment slices**: The `start:end` range notation over segments ([`SegmentSlice`])
//! - **Alignments**: Gap-padded segment sequences ([`Alignment`])
//! - **Identifiers**: Identifier normalisation and allocation ([`identifier`] module)

pub mod alignment;
pub mod cognate;
pub mod form;
pub mod identifier;
pub mod slice;

pub use alignment::{Alignment, GAP};
pub use cognate::{CognateJudgement, CognateSet};
pub use form::{Form, Segment};
pub use slice::{SegmentSlice, SliceError};
