#![no_main]
use libfuzzer_sys::fuzz_target;
use zonescan::lexer::{Token, Tokenizer};

fuzz_target!(|data: &[u8]| {
    // The tokenizer only promises to terminate and never panic on
    // arbitrary bytes, not to accept them: the grammar is byte-oriented
    // and performs no UTF-8 validation (spec §1's non-goal).
    let mut tok = Tokenizer::open_str("fuzz", data, true);
    for _ in 0..1_000_000 {
        match tok.lex() {
            Ok(Token::EndOfFile) => break,
            Ok(_) => continue,
            Err(_) => break,
        }
    }
});
