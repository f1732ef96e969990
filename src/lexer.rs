//! Token materializer and include stack (C6 / C7).
//!
//! `Tokenizer` owns the live scan state (window, carry, tape) for the
//! current file and a stack of suspended includer frames. `lex()` is the
//! single public entry point: it keeps the tape topped up from the block
//! scanner and turns the next structural tape record into a [`Token`],
//! handling end-of-buffer refill, parenthesized grouping, and `$INCLUDE`
//! push/pop along the way.

use std::path::Path;

use crate::error::{ScanError, SyntaxError};
use crate::scanner::{scan_block, Block, ScanCarry};
use crate::tables::{self, ByteClass, BLOCK_SIZE};
use crate::tape::{drain_block, Tape};
use crate::window::Window;

/// How deep `$INCLUDE` may nest before the tokenizer refuses to push
/// another frame. The original scanner has no such limit; this rewrite
/// adds one deliberately (§9.4).
pub const MAX_INCLUDE_DEPTH: usize = 16;

/// A token yielded by [`Tokenizer::lex`]. Borrows its content, if any,
/// from the tokenizer's internal window buffer — callers must consume a
/// token before requesting the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Contiguous(&'a [u8]),
    Quoted(&'a [u8]),
    LineFeed,
    EndOfFile,
}

/// Per-file scan state, one per entry on the include stack.
struct Frame {
    window: Window,
    name: String,
    carry: ScanCarry,
    tape: Tape,
    /// Absolute offset up to which the block scanner has already run.
    scan_cursor: u64,
    grouped: bool,
    start_of_line: bool,
    line: u32,
}

impl Frame {
    fn open(name: String, window: Window) -> Self {
        let offset = window.offset();
        Frame {
            window,
            name,
            carry: ScanCarry::default(),
            tape: Tape::new(),
            scan_cursor: offset,
            grouped: false,
            start_of_line: true,
            line: 1,
        }
    }

    /// Reads one byte at an absolute stream offset known to still be
    /// resident in the window (i.e. not yet released via `release_through`).
    fn raw(&self, offset: u64) -> u8 {
        let local = (offset - self.window.offset()) as usize;
        self.window.available()[local]
    }

    /// Drops window bytes up to (not including) `offset`, compacting the
    /// buffer. Called once the materializer has fully extracted a token
    /// and no longer needs the bytes before it.
    fn release_through(&mut self, offset: u64) {
        if offset > self.window.offset() {
            self.window.advance((offset - self.window.offset()) as usize);
            self.window.compact();
        }
    }

    /// Runs the block scanner forward over any window bytes not yet
    /// scanned, appending structural records to `self.tape`. Stops at the
    /// first point fewer than `BLOCK_SIZE` bytes are available and the
    /// window has not yet settled at EOF (more data may still arrive).
    fn fill_tape(&mut self) -> Result<(), ScanError> {
        loop {
            if self.tape.len() > 0 {
                return Ok(());
            }
            let available_from_cursor =
                (self.window.offset() + self.window.available().len() as u64)
                    .saturating_sub(self.scan_cursor) as usize;

            if available_from_cursor >= BLOCK_SIZE {
                let local = (self.scan_cursor - self.window.offset()) as usize;
                let mut block_bytes = [0u8; BLOCK_SIZE];
                block_bytes.copy_from_slice(&self.window.available()[local..local + BLOCK_SIZE]);
                self.scan_one_block(&block_bytes, BLOCK_SIZE);
                continue;
            }

            if self.window.at_eof() {
                if available_from_cursor == 0 {
                    return Ok(());
                }
                let local = (self.scan_cursor - self.window.offset()) as usize;
                let remaining = &self.window.available()[local..];
                let tail_len = remaining.len();
                let mut block_bytes = [0u8; BLOCK_SIZE];
                block_bytes[..tail_len].copy_from_slice(remaining);
                self.scan_one_block(&block_bytes, tail_len);
                if self.carry.in_quoted {
                    return Err(ScanError::syntax(
                        SyntaxError::UnterminatedQuoted,
                        self.name.clone(),
                        self.line,
                    ));
                }
                return Ok(());
            }

            self.window.refill()?;
        }
    }

    /// Scans one 64-byte (possibly zero-padded tail) block and advances
    /// `scan_cursor` by `real_len`, the number of genuine input bytes it
    /// contained (may be less than `BLOCK_SIZE` for the final block).
    fn scan_one_block(&mut self, block_bytes: &[u8; BLOCK_SIZE], real_len: usize) {
        let base_offset = self.scan_cursor;
        let block: Block = scan_block(block_bytes, &mut self.carry);
        let cutoff = if real_len < BLOCK_SIZE {
            (1u64 << real_len) - 1
        } else {
            u64::MAX
        };
        let bits = block.bits & cutoff;
        let newline = block.newline & cutoff;
        let trimmed = Block {
            bits,
            newline,
            in_quoted: block.in_quoted,
            in_comment: block.in_comment,
        };
        let swallowed_newlines = newline & !bits;
        drain_block(base_offset, &trimmed, swallowed_newlines, &mut self.carry, &mut self.tape);
        self.scan_cursor += real_len as u64;
    }

    /// Scans a contiguous (unquoted) token starting at `start`, skipping
    /// over backslash-escaped bytes verbatim (P3), and returns its
    /// exclusive end offset.
    fn scan_contiguous_end(&self, start: u64) -> u64 {
        let mut pos = start;
        let limit = self.window.offset() + self.window.available().len() as u64;
        while pos < limit {
            let byte = self.raw(pos);
            match tables::CLASSIFY[byte as usize] {
                ByteClass::Backslash => pos += 2,
                ByteClass::Contiguous => pos += 1,
                _ => break,
            }
        }
        pos.min(limit)
    }

    /// Scans quoted-string content starting just after the opening quote,
    /// honoring backslash escapes, and returns the offset of the closing
    /// quote (exclusive end of content) plus the number of unescaped
    /// newlines seen inside it.
    fn scan_quoted_end(&self, content_start: u64) -> Result<(u64, u32), ScanError> {
        let mut pos = content_start;
        let limit = self.window.offset() + self.window.available().len() as u64;
        let mut newlines = 0u32;
        while pos < limit {
            let byte = self.raw(pos);
            match byte {
                b'\\' => pos += 2,
                b'"' => return Ok((pos, newlines)),
                b'\n' => {
                    newlines += 1;
                    pos += 1;
                }
                _ => pos += 1,
            }
        }
        Err(ScanError::syntax(
            SyntaxError::UnterminatedQuoted,
            self.name.clone(),
            self.line + newlines,
        ))
    }
}

/// Drives the block scanner and token materializer for a (possibly
/// `$INCLUDE`-nested) zone file.
pub struct Tokenizer {
    frame: Frame,
    includers: Vec<Frame>,
    no_includes: bool,
}

impl Tokenizer {
    pub fn open(path: impl AsRef<Path>, no_includes: bool) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let window = Window::open(path)?;
        let name = path.display().to_string();
        Ok(Tokenizer {
            frame: Frame::open(name, window),
            includers: Vec::new(),
            no_includes,
        })
    }

    pub fn open_str(origin_label: &str, text: impl AsRef<[u8]>, no_includes: bool) -> Self {
        let window = Window::open_bytes(text);
        Tokenizer {
            frame: Frame::open(origin_label.to_string(), window),
            includers: Vec::new(),
            no_includes,
        }
    }

    pub fn current_file(&self) -> &str {
        &self.frame.name
    }

    pub fn current_line(&self) -> u32 {
        self.frame.line
    }

    pub fn start_of_line(&self) -> bool {
        self.frame.start_of_line
    }

    /// Pushes `path` as a new includer frame. Fails with
    /// [`ScanError::NotPermitted`] past [`MAX_INCLUDE_DEPTH`], and with
    /// [`ScanError::NotImplemented`] if includes were disabled by
    /// `Options::no_includes`.
    pub fn push_include(&mut self, path: impl AsRef<Path>) -> Result<(), ScanError> {
        if self.no_includes {
            return Err(ScanError::NotImplemented("$INCLUDE"));
        }
        if self.includers.len() >= MAX_INCLUDE_DEPTH {
            return Err(ScanError::NotPermitted("$INCLUDE nesting too deep"));
        }
        let path = path.as_ref();
        let window = Window::open(path)?;
        let name = path.display().to_string();
        let new_frame = Frame::open(name, window);
        let old_frame = std::mem::replace(&mut self.frame, new_frame);
        self.includers.push(old_frame);
        Ok(())
    }

    fn pop_include(&mut self) -> bool {
        match self.includers.pop() {
            Some(parent) => {
                self.frame = parent;
                true
            }
            None => false,
        }
    }

    /// Returns the next token, advancing past it. Implements §4.6's state
    /// machine.
    pub fn lex(&mut self) -> Result<Token<'_>, ScanError> {
        loop {
            self.frame.fill_tape()?;

            let Some(record) = self.frame.tape.peek().copied() else {
                if self.frame.grouped {
                    return Err(ScanError::syntax(
                        SyntaxError::MissingClosingBrace,
                        self.frame.name.clone(),
                        self.frame.line,
                    ));
                }
                if self.pop_include() {
                    continue;
                }
                return Ok(Token::EndOfFile);
            };

            self.frame.line += record.lines;
            let byte = self.frame.raw(record.offset);

            match tables::CLASSIFY[byte as usize] {
                ByteClass::LineFeed => {
                    self.frame.tape.pop();
                    self.frame.release_through(record.offset + 1);
                    let next_byte_is_start = true; // next token, if any, begins a fresh line
                    self.frame.start_of_line = next_byte_is_start;
                    self.frame.line += 1;
                    if self.frame.grouped {
                        continue;
                    }
                    return Ok(Token::LineFeed);
                }
                ByteClass::Quote => {
                    self.frame.tape.pop();
                    let content_start = record.offset + 1;
                    let (content_end, inner_newlines) = self.frame.scan_quoted_end(content_start)?;
                    self.frame.line += inner_newlines;
                    self.frame.start_of_line = false;
                    // The scanner also raises a structural bit at the closing
                    // quote's own offset (unescaped, outside `in_quoted_mask`),
                    // leaving a stale tape record behind it; drop it here so it
                    // doesn't resurface as a bogus Quote on the next lex() call.
                    while self.frame.tape.peek().is_some_and(|r| r.offset <= content_end) {
                        self.frame.tape.pop();
                    }
                    self.frame.release_through(record.offset);
                    let local_start = (content_start - self.frame.window.offset()) as usize;
                    let local_end = (content_end - self.frame.window.offset()) as usize;
                    return Ok(Token::Quoted(&self.frame.window.available()[local_start..local_end]));
                }
                ByteClass::Special if byte == b'(' => {
                    self.frame.tape.pop();
                    if self.frame.grouped {
                        return Err(ScanError::syntax(
                            SyntaxError::NestedOpeningBrace,
                            self.frame.name.clone(),
                            self.frame.line,
                        ));
                    }
                    self.frame.grouped = true;
                    self.frame.release_through(record.offset + 1);
                    self.frame.start_of_line = false;
                    continue;
                }
                ByteClass::Special if byte == b')' => {
                    self.frame.tape.pop();
                    if !self.frame.grouped {
                        return Err(ScanError::syntax(
                            SyntaxError::MissingOpeningBrace,
                            self.frame.name.clone(),
                            self.frame.line,
                        ));
                    }
                    self.frame.grouped = false;
                    self.frame.release_through(record.offset + 1);
                    self.frame.start_of_line = false;
                    continue;
                }
                _ => {
                    self.frame.tape.pop();
                    self.frame.start_of_line = false;
                    let end = self.frame.scan_contiguous_end(record.offset);
                    self.frame.release_through(record.offset);
                    let local_start = (record.offset - self.frame.window.offset()) as usize;
                    let local_end = (end - self.frame.window.offset()) as usize;
                    return Ok(Token::Contiguous(&self.frame.window.available()[local_start..local_end]));
                }
            }
        }
    }
}
