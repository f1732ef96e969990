//! Index tape (C5).
//!
//! The producer (driven by the block scanner) appends one [`IndexRecord`]
//! per structural byte position; the consumer (the token materializer in
//! `lexer.rs`) drains them in order. Offsets are stored as absolute stream
//! positions (`u64`), never as pointers into the window buffer, so a
//! `Window::compact()` never needs to rebase anything already on the tape
//! — the deliberate improvement over pointer-based tapes called out for
//! this rewrite.

use crate::bitops::clear_lowest_bit;
use crate::scanner::{Block, ScanCarry};

/// Number of structural indexes the fast-path unroll in the original
/// design assumed per block; kept here only as the tuning constant used to
/// size [`Tape`]'s backing storage, since this rewrite's producer loop is
/// a plain ascending bit drain rather than an unrolled fixed-width one.
pub const BLOCK_INDEXES: usize = 5;

/// Capacity of the tape's backing ring, large enough to hold several
/// blocks' worth of indexes between materializer drains.
pub const TAPE_SIZE: usize = 256 * BLOCK_INDEXES + 64;

/// One entry on the index tape: the absolute byte offset of a structural
/// position, plus any newline count buffered since the previous entry
/// (newlines swallowed inside a quoted string or comment, see
/// `ScanCarry::lines`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRecord {
    pub offset: u64,
    pub lines: u32,
}

/// A monotone FIFO of [`IndexRecord`]s. Grows by the block, drains one
/// record at a time.
#[derive(Debug, Default)]
pub struct Tape {
    records: std::collections::VecDeque<IndexRecord>,
}

impl Tape {
    pub fn new() -> Self {
        Tape {
            records: std::collections::VecDeque::with_capacity(TAPE_SIZE),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn push(&mut self, record: IndexRecord) {
        self.records.push_back(record);
    }

    pub fn pop(&mut self) -> Option<IndexRecord> {
        self.records.pop_front()
    }

    pub fn peek(&self) -> Option<&IndexRecord> {
        self.records.front()
    }

    /// Removes the most recently pushed record. Used when a contiguous or
    /// quoted run is still open at the end of a buffer: the scanner must
    /// re-derive that index after the next refill rather than emit it
    /// twice (§4.5 termination).
    pub fn withdraw_last(&mut self) {
        self.records.pop_back();
    }
}

/// Drains one scanned block's structural bits into `tape`, merging in any
/// newlines swallowed inside quoted/comment regions so each record's
/// `lines` field stays exact (P5).
///
/// `swallowed_newlines` is the mask of newline positions in this block
/// that did *not* get their own structural bit (i.e. were inside an open
/// quoted string or comment for their entire extent). `carry.lines` is
/// read for any newlines swallowed since the last emitted record (which
/// may have been in a previous block) and is left holding the remainder
/// for the next call.
pub fn drain_block(
    base_offset: u64,
    block: &Block,
    swallowed_newlines: u64,
    carry: &mut ScanCarry,
    tape: &mut Tape,
) {
    let mut bits = block.bits;
    let mut swallowed = swallowed_newlines;
    let mut pending_lines = carry.lines;
    carry.lines = 0;

    while bits != 0 {
        let bit_pos = bits.trailing_zeros();
        let mut lines_here = pending_lines;
        pending_lines = 0;
        while swallowed != 0 && swallowed.trailing_zeros() <= bit_pos {
            lines_here += 1;
            swallowed = clear_lowest_bit(swallowed);
        }
        tape.push(IndexRecord {
            offset: base_offset + bit_pos as u64,
            lines: lines_here,
        });
        bits = clear_lowest_bit(bits);
    }

    carry.lines = pending_lines + swallowed.count_ones();
}
