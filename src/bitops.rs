//! Bit-parallel scanning primitives (C2).
//!
//! These operate on the 64-bit structural bitmasks the block scanner
//! derives from a 64-byte block (one bit per byte). They are the same
//! carry-propagating tricks `simd_utils.rs` and the CSV structural scanner
//! in the retrieval pack use: a prefix-xor to turn "is this byte inside a
//! quoted run" into a toggle count, and an overflowing-add trick to find
//! runs of backslashes of odd length without a byte-at-a-time loop.

/// Even-bit mask, used by [`find_escaped`] to tell odd-length backslash runs
/// from even-length ones.
const EVEN_BITS: u64 = 0x5555_5555_5555_5555;

/// Computes the running (carry-in) XOR-prefix of `bits`: bit `i` of the
/// result is the parity of `bits[0..=i]`. Used to turn a bitmask of quote
/// positions into a bitmask of "inside a quoted span" positions.
///
/// `carry` is the parity carried in from the previous block; it is not
/// just a boolean toggle because the standard "clmul by all-ones" trick
/// (`bits.wrapping_mul(u64::MAX) ^ carry_broadcast`) folds the carry in as
/// the low bit of the multiplicand, which is exactly `carry as u64`.
#[inline]
pub fn prefix_xor(bits: u64) -> u64 {
    // carry-free 64x64->64 multiply by all-ones is the standard
    // clmul(bits, -1) trick for a prefix xor across one word.
    let mut x = bits;
    x ^= x << 1;
    x ^= x << 2;
    x ^= x << 4;
    x ^= x << 8;
    x ^= x << 16;
    x ^= x << 32;
    x
}

/// Prefix-xor with an explicit carry-in from the previous block, returning
/// the computed mask. `carry` is the last bit of the previous block's
/// prefix-xor result (0 or 1).
#[inline]
pub fn prefix_xor_with_carry(bits: u64, carry: bool) -> u64 {
    let x = prefix_xor(bits);
    if carry {
        !x
    } else {
        x
    }
}

/// `follows(bits, carry)` returns a mask where bit `i` is set iff bit `i-1`
/// of `bits` was set (bit 0 takes `carry` as its predecessor). Used to ask
/// "does this byte immediately follow a backslash/quote/etc" across a
/// 64-bit block boundary.
#[inline]
pub fn follows(bits: u64, carry: &mut bool) -> u64 {
    let result = (bits << 1) | (*carry as u64);
    *carry = (bits >> 63) & 1 != 0;
    result
}

/// Identifies bytes that are escaped by an odd-length run of preceding
/// backslashes (RFC 1035 `\c` / `\DDD` escapes), carrying the odd/even
/// parity of any backslash run that straddles the block boundary.
///
/// `backslash` is the structural mask of backslash-byte positions in this
/// block. `is_escaped` is carried in as the previous block's overflow
/// (0 or 1) and updated in place for the next call.
///
/// This is the classic simdjson "find_escaped" algorithm: clear bits that
/// are already known-escaped, separate odd-starting backslash runs from
/// even-starting ones via an overflowing add, then fold the result back
/// through the even-bit mask to recover which *follower* bytes are escaped.
#[inline]
pub fn find_escaped(backslash: u64, is_escaped: &mut u64) -> u64 {
    let backslash = backslash & !*is_escaped;
    if backslash == 0 {
        let escaped = *is_escaped;
        *is_escaped = 0;
        return escaped;
    }
    let follows_escape = (backslash << 1) | *is_escaped;
    let odd_sequence_starts = backslash & !EVEN_BITS & !follows_escape;
    let (sequences_starting_on_even_bits, carry) = odd_sequence_starts.overflowing_add(backslash);
    *is_escaped = carry as u64;
    let invert_mask = sequences_starting_on_even_bits << 1;
    (EVEN_BITS ^ invert_mask) & follows_escape
}

/// Clears the lowest set bit of `mask`, returning the new mask. Used by the
/// tape producer to drain one structural position at a time without a
/// branch per byte.
#[inline]
pub fn clear_lowest_bit(mask: u64) -> u64 {
    mask & (mask.wrapping_sub(1))
}

/// Index (0-based, from the low end) of the lowest set bit, or `None` if
/// `mask` is zero.
#[inline]
pub fn lowest_bit_index(mask: u64) -> Option<u32> {
    if mask == 0 {
        None
    } else {
        Some(mask.trailing_zeros())
    }
}
