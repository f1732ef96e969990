#![no_main]
use libfuzzer_sys::fuzz_target;
use zonescan::bitops::{find_escaped, follows, prefix_xor_with_carry};
use zonescan::scanner::find_delimiters;

fuzz_target!(|data: &[u8]| {
    // Exercises the bit-parallel primitives directly on arbitrary 64-bit
    // masks built from the fuzzer's bytes, independent of the block
    // scanner and window — the narrowest fuzz surface in this crate,
    // mirroring how the teacher's per-function fuzz targets isolate one
    // primitive at a time.
    if data.len() < 24 {
        return;
    }
    let a = u64::from_le_bytes(data[0..8].try_into().unwrap());
    let b = u64::from_le_bytes(data[8..16].try_into().unwrap());
    let c = u64::from_le_bytes(data[16..24].try_into().unwrap());

    let mut is_escaped = 0u64;
    let _ = find_escaped(a, &mut is_escaped);
    let _ = find_escaped(a, &mut is_escaped);

    let mut carry = false;
    let _ = follows(a, &mut carry);

    let _ = prefix_xor_with_carry(a, data[0] & 1 == 1);

    // quote & semicolon must be disjoint per find_delimiters' precondition
    // (§4.4 step 5); clear the overlap rather than skip the input so every
    // byte string still exercises the function.
    let quote = a & !b;
    let _ = find_delimiters(quote, b, c, data[0] & 1 == 1, data[0] & 2 == 2);
});
