//! Block scanner (C4).
//!
//! Turns one 64-byte input block into a `u64` "token-start" bitmask plus the
//! region masks (`in_quoted`, `in_comment`) needed by the index tape and the
//! token materializer. Four 16-lane `Simd<u8,16>` compares assemble each
//! per-predicate mask, the same width `simd_utils.rs` uses per iteration;
//! the bit-parallel combination logic that turns those masks into regions
//! and token starts is scalar `u64` arithmetic, since `find_escaped` and
//! `prefix_xor` are defined over a fixed 64-bit register (§9.1).

use std::simd::prelude::*;

use crate::bitops::{find_escaped, follows, prefix_xor_with_carry};
use crate::tables::{self, BLOCK_SIZE};

/// State carried from one block to the next so scanning can resume at any
/// 64-byte boundary without re-scanning earlier input (§4.4's "Indexer
/// state"). Colocated in one `Copy` struct so callers can snapshot,
/// compare, or replay it — e.g. to prove P2 (boundary independence) by
/// constructing two carries and checking they converge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanCarry {
    /// Parity of a backslash run straddling the previous block boundary.
    pub is_escaped: u64,
    /// Whether the byte just past the end of the previous block was
    /// inside an open quoted string.
    pub in_quoted: bool,
    /// Whether the byte just past the end of the previous block was
    /// inside an open comment.
    pub in_comment: bool,
    /// Whether the last byte of the previous block was part of a
    /// contiguous (unquoted) token.
    pub follows_contiguous: bool,
    /// Newline count buffered while inside a multi-line quoted string or
    /// parenthesized group, flushed by the materializer on a record
    /// boundary so reported line numbers stay exact (P5).
    pub lines: u32,
}

/// The classification result for one 64-byte block. Each field is a
/// bitmask with bit `i` describing byte `i` of the block.
#[derive(Debug, Clone, Copy, Default)]
pub struct Block {
    /// Token-start positions: every byte the materializer should treat as
    /// beginning a new structural element.
    pub bits: u64,
    /// Raw newline positions (used for line accounting).
    pub newline: u64,
    /// Bytes currently inside an open quoted string, inclusive of the
    /// opening quote.
    pub in_quoted: u64,
    /// Bytes currently inside an open comment, inclusive of the leading
    /// `;`.
    pub in_comment: u64,
}

#[inline]
fn mask64_eq(input: &[u8; BLOCK_SIZE], needle: u8) -> u64 {
    let mut mask = 0u64;
    for (chunk_idx, chunk) in input.chunks_exact(16).enumerate() {
        let lanes = Simd::<u8, 16>::from_slice(chunk);
        let bits = lanes.simd_eq(Simd::splat(needle)).to_bitmask();
        mask |= bits << (chunk_idx * 16);
    }
    mask
}

#[inline]
fn mask64_blank(input: &[u8; BLOCK_SIZE]) -> u64 {
    let mut mask = 0u64;
    for (chunk_idx, chunk) in input.chunks_exact(16).enumerate() {
        let lanes = Simd::<u8, 16>::from_slice(chunk);
        let bits = tables::simd_is_blank(lanes).to_bitmask();
        mask |= bits << (chunk_idx * 16);
    }
    mask
}

#[inline]
fn mask64_special(input: &[u8; BLOCK_SIZE]) -> u64 {
    let mut mask = 0u64;
    for (chunk_idx, chunk) in input.chunks_exact(16).enumerate() {
        let lanes = Simd::<u8, 16>::from_slice(chunk);
        let bits = tables::simd_is_special(lanes).to_bitmask();
        mask |= bits << (chunk_idx * 16);
    }
    mask
}

/// Resolves quote/comment region toggles for one block from the unescaped
/// quote, semicolon and newline masks, given the in_quoted/in_comment
/// state carried in from the previous block. Returns `(quote_toggle,
/// comment_toggle)`: masks suitable for `prefix_xor_with_carry` to derive
/// the new region masks.
///
/// Quotes and comments interact: a semicolon inside an open quote is not a
/// comment opener, and a quote inside an open comment is not a string
/// opener. This walks the merged, ascending set of quote/semicolon/newline
/// positions once, resolving each event against the running in_quoted/
/// in_comment state — extract lowest set bit, resolve, clear, repeat, the
/// same shape the structural-index scanners in this codebase use for
/// position extraction.
pub fn find_delimiters(
    quote: u64,
    semicolon: u64,
    newline: u64,
    in_quoted_carry: bool,
    in_comment_carry: bool,
) -> (u64, u64) {
    let mut events = quote | semicolon | newline;
    let mut quote_toggle = 0u64;
    let mut comment_toggle = 0u64;
    let mut in_quoted = in_quoted_carry;
    let mut in_comment = in_comment_carry;

    while events != 0 {
        let pos = events & events.wrapping_neg();
        if quote & pos != 0 {
            if !in_comment {
                quote_toggle |= pos;
                in_quoted = !in_quoted;
            }
        } else if semicolon & pos != 0 {
            if !in_quoted && !in_comment {
                comment_toggle |= pos;
                in_comment = true;
            }
        } else if in_comment {
            comment_toggle |= pos;
            in_comment = false;
        }
        events &= events - 1;
    }

    (quote_toggle, comment_toggle)
}

/// Scans one full 64-byte block, updating `carry` in place and returning
/// the derived [`Block`]. Implements §4.4 steps 1-8.
pub fn scan_block(input: &[u8; BLOCK_SIZE], carry: &mut ScanCarry) -> Block {
    let newline = mask64_eq(input, b'\n');
    let backslash = mask64_eq(input, b'\\');
    let raw_quote = mask64_eq(input, b'"');
    let raw_semicolon = mask64_eq(input, b';');

    let escaped = find_escaped(backslash, &mut carry.is_escaped);
    let quote = raw_quote & !escaped;
    let semicolon = raw_semicolon & !escaped;

    let (quote_toggle, comment_toggle) =
        find_delimiters(quote, semicolon, newline, carry.in_quoted, carry.in_comment);

    let in_quoted_mask = prefix_xor_with_carry(quote_toggle, carry.in_quoted);
    let in_comment_mask = prefix_xor_with_carry(comment_toggle, carry.in_comment);
    carry.in_quoted = (in_quoted_mask >> 63) & 1 != 0;
    carry.in_comment = (in_comment_mask >> 63) & 1 != 0;

    let excluded = escaped | in_quoted_mask | in_comment_mask;
    let blank = mask64_blank(input) & !excluded;
    let special = mask64_special(input) & !excluded & !newline; // newline handled separately below
    let newline_live = newline & !excluded;

    let contiguous = !(blank | special | newline_live | quote_toggle) & !(in_quoted_mask | in_comment_mask);
    let follows_contiguous = follows(contiguous, &mut carry.follows_contiguous);

    let bits = (contiguous & !follows_contiguous)
        | (quote_toggle & in_quoted_mask)
        | special
        | newline_live;

    Block {
        bits,
        newline,
        in_quoted: in_quoted_mask,
        in_comment: in_comment_mask,
    }
}
