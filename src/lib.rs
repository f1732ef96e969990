#![feature(portable_simd)]
//! Streaming tokenizer and parser glue for DNS zone master files (RFC 1035
//! §5, RFC 3597 generic notation).
//!
//! The crate is organized leaves-first, following the two-stage pipeline
//! from raw bytes to structured records:
//!
//! - [`tables`] / [`bitops`] — byte classification and the bit-parallel
//!   primitives (`prefix_xor`, `find_escaped`, `follows`) the scanner is
//!   built from.
//! - [`scanner`] — the SIMD block scanner: one 64-byte input block in,
//!   one structural bitmask out.
//! - [`window`] — the growable, compactable byte buffer the scanner reads
//!   from, refilled from a file or an in-memory string.
//! - [`tape`] — the index tape connecting the scanner's producer side to
//!   the materializer's consumer side.
//! - [`lexer`] — [`lexer::Tokenizer`], the token materializer and
//!   `$INCLUDE` stack: turns tape records into [`lexer::Token`]s.
//! - [`parser`] — [`parser::Parser`], the record-level glue on top of the
//!   tokenizer: owner/class/type/TTL scanning, `$ORIGIN`/`$TTL`/`$INCLUDE`
//!   directive handling, and RFC 3597 generic RDATA notation.
//! - [`error`] — the crate-wide [`error::ScanError`] and the log-callback
//!   types.

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(feature = "snmalloc")]
#[global_allocator]
static GLOBAL: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

pub mod bitops;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod scanner;
pub mod tables;
pub mod tape;
pub mod window;

pub use error::ScanError;
pub use lexer::{Token, Tokenizer};
pub use parser::{
    have_string, scan_class, scan_name, scan_owner, scan_ttl, scan_type, Class,
    GenericOnlyTypeTable, LogSink, Options, Parser, RdataHandler, Record, RecordSink, TypeTable,
};
