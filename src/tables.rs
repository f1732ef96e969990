//! Byte-classification tables (C1).
//!
//! Two 16-lane SIMD needle sets describe, for the CONTIGUOUS context, which
//! bytes are "blank" (space, tab) and which are "special" (`\n`, `"`, `(`,
//! `)`, `;`) — tested the way `simd_utils.rs` tests "is this byte one of a
//! fixed small set" (a splat-compare-OR chain), not a PSHUFB nibble lookup.
//! A third table, `CLASSIFY`, is a plain `[ByteClass; 256]` used after a
//! token's first byte to detect start-of-line continuation (§4.1).
//!
//! All tables are `const`: classification never depends on runtime
//! configuration, so there is no lazy-initialization step to pay for.

use std::simd::prelude::*;

/// Number of bytes in one scanner block (§2's "Block size" tuning constant).
pub const BLOCK_SIZE: usize = 64;

/// The class a byte belongs to once it is the *first* byte of a token —
/// used by the materializer to decide `start_of_line` continuation and by
/// the scanner's delimiter search to tell quotes from semicolons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    Blank,
    Special,
    Contiguous,
    Quote,
    Backslash,
    Semicolon,
    LineFeed,
}

const fn build_classify() -> [ByteClass; 256] {
    let mut table = [ByteClass::Contiguous; 256];
    table[b' ' as usize] = ByteClass::Blank;
    table[b'\t' as usize] = ByteClass::Blank;
    table[b'\n' as usize] = ByteClass::LineFeed;
    table[b'(' as usize] = ByteClass::Special;
    table[b')' as usize] = ByteClass::Special;
    table[b'"' as usize] = ByteClass::Quote;
    table[b';' as usize] = ByteClass::Semicolon;
    table[b'\\' as usize] = ByteClass::Backslash;
    table
}

/// Per-byte class lookup, built once at compile time.
pub static CLASSIFY: [ByteClass; 256] = build_classify();

/// `true` for bytes the CONTIGUOUS-context scanner treats as blank (space, tab).
#[inline]
pub fn simd_is_blank(chunk: Simd<u8, 16>) -> Mask<i8, 16> {
    chunk.simd_eq(Simd::splat(b' ')) | chunk.simd_eq(Simd::splat(b'\t'))
}

/// `true` for bytes the CONTIGUOUS-context scanner treats as special
/// (newline, open/close paren, quote, semicolon).
#[inline]
pub fn simd_is_special(chunk: Simd<u8, 16>) -> Mask<i8, 16> {
    chunk.simd_eq(Simd::splat(b'\n'))
        | chunk.simd_eq(Simd::splat(b'('))
        | chunk.simd_eq(Simd::splat(b')'))
        | chunk.simd_eq(Simd::splat(b'"'))
        | chunk.simd_eq(Simd::splat(b';'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_table_matches_spec_classes() {
        assert_eq!(CLASSIFY[b' ' as usize], ByteClass::Blank);
        assert_eq!(CLASSIFY[b'\t' as usize], ByteClass::Blank);
        assert_eq!(CLASSIFY[b'\n' as usize], ByteClass::LineFeed);
        assert_eq!(CLASSIFY[b'(' as usize], ByteClass::Special);
        assert_eq!(CLASSIFY[b')' as usize], ByteClass::Special);
        assert_eq!(CLASSIFY[b'"' as usize], ByteClass::Quote);
        assert_eq!(CLASSIFY[b';' as usize], ByteClass::Semicolon);
        assert_eq!(CLASSIFY[b'\\' as usize], ByteClass::Backslash);
        assert_eq!(CLASSIFY[b'a' as usize], ByteClass::Contiguous);
        assert_eq!(CLASSIFY[b'0' as usize], ByteClass::Contiguous);
    }

    #[test]
    fn blank_and_special_are_disjoint_over_full_byte_range() {
        for b in 0u8..=255 {
            let chunk = Simd::<u8, 16>::splat(b);
            let is_blank = simd_is_blank(chunk).test(0);
            let is_special = simd_is_special(chunk).test(0);
            assert!(!(is_blank && is_special), "byte {b:#04x} is both");
        }
    }
}
