#![no_main]
use libfuzzer_sys::fuzz_target;
use zonescan::scanner::{scan_block, ScanCarry};
use zonescan::tables::BLOCK_SIZE;

fuzz_target!(|data: &[u8]| {
    // Drives the block scanner directly over arbitrary 64-byte-aligned
    // input, threading carry state across blocks the way `lexer.rs`'s
    // `Frame::fill_tape` does, to catch panics in the bit-parallel
    // primitives independent of the window/tape machinery around them.
    let mut carry = ScanCarry::default();
    for chunk in data.chunks(BLOCK_SIZE) {
        let mut block_bytes = [0u8; BLOCK_SIZE];
        block_bytes[..chunk.len()].copy_from_slice(chunk);
        let _ = scan_block(&block_bytes, &mut carry);
    }
});
