//! File/buffer window (C3).
//!
//! The scanner never sees an unbounded file: it sees a `Window`, a growable
//! byte buffer that is refilled from an underlying reader in fixed chunks
//! and periodically compacted so fully-consumed bytes at the front are
//! dropped. This mirrors the teacher's buffer-before-SIMD-chunking
//! discipline in `simd_utils.rs` (load full chunks, handle the remainder
//! separately) but applied at the I/O layer instead of the instruction
//! layer.
//!
//! Invariant I4 (NUL-termination): the byte immediately after the last
//! valid byte in the window is always readable and, once EOF has been
//! reached, is `0`. This lets the scanner's tail block run the same
//! 64-byte SIMD path as a full block without a separate bounds-checked
//! scalar loop for the last few bytes.

use std::fs::File;
use std::io::Read as _;
use std::path::{Path, PathBuf};

use crate::error::ScanError;

/// Bytes pulled from the reader per `refill()` call (§6's `WINDOW_SIZE`
/// tuning constant).
pub const WINDOW_SIZE: usize = 16384;

/// Tri-state EOF tracking: a reader can report EOF exactly once, after
/// which further `refill()` calls are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EofState {
    NotYetReached,
    ReachedThisRefill,
    Settled,
}

/// A growable, compactable read window over a file or in-memory buffer.
pub struct Window {
    buf: Vec<u8>,
    /// Byte offset of `buf[0]` in the logical (uncompacted) stream.
    base_offset: u64,
    /// Number of bytes in `buf` the caller has consumed and may be dropped
    /// on the next `compact()`.
    consumed: usize,
    reader: Option<File>,
    path: Option<PathBuf>,
    eof: EofState,
}

impl Window {
    /// Opens `path` for streaming reads.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ScanError::Io {
            path: Some(path.to_path_buf()),
            source,
        })?;
        let metadata = file.metadata().map_err(|source| ScanError::Io {
            path: Some(path.to_path_buf()),
            source,
        })?;
        if !metadata.is_file() {
            return Err(ScanError::NotAFile(path.to_path_buf()));
        }
        Ok(Window {
            buf: Vec::with_capacity(WINDOW_SIZE + 1),
            base_offset: 0,
            consumed: 0,
            reader: Some(file),
            path: Some(path.to_path_buf()),
            eof: EofState::NotYetReached,
        })
    }

    /// Wraps an in-memory byte buffer as a window with no underlying
    /// reader; the full buffer is treated as already at EOF. Used for
    /// `$INCLUDE`-free in-memory zone input and for tests. Takes raw bytes,
    /// not `&str`: the grammar is byte-oriented and performs no UTF-8
    /// validation or normalization (§1's non-goals).
    pub fn open_bytes(data: impl AsRef<[u8]>) -> Self {
        let data = data.as_ref();
        let mut buf = Vec::with_capacity(data.len() + 1);
        buf.extend_from_slice(data);
        buf.push(0);
        Window {
            buf,
            base_offset: 0,
            consumed: 0,
            reader: None,
            path: None,
            eof: EofState::Settled,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Bytes available to the scanner right now: `buf[consumed..len-1]`
    /// (the trailing byte is reserved for the NUL terminator, see I4).
    pub fn available(&self) -> &[u8] {
        let end = self.valid_len();
        &self.buf[self.consumed..end]
    }

    /// Whether the reader (if any) has been fully drained and the window
    /// holds the final NUL-terminated remainder.
    pub fn at_eof(&self) -> bool {
        self.eof == EofState::Settled && self.available().is_empty()
    }

    /// The logical stream offset of `available()[0]`.
    pub fn offset(&self) -> u64 {
        self.base_offset + self.consumed as u64
    }

    /// Marks `n` bytes of `available()` as consumed by the scanner.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.consumed + n <= self.valid_len());
        self.consumed += n;
    }

    /// Drops the consumed prefix, shifting remaining bytes to the front.
    /// Offsets already recorded on the index tape are never rebased by
    /// this call: the tape stores absolute stream offsets (see `tape.rs`),
    /// not pointers into `buf`.
    pub fn compact(&mut self) {
        if self.consumed == 0 {
            return;
        }
        self.buf.drain(0..self.consumed);
        self.base_offset += self.consumed as u64;
        self.consumed = 0;
    }

    /// Pulls up to `WINDOW_SIZE` more bytes from the reader, appending
    /// them after the current valid region and re-placing the NUL
    /// terminator. A no-op once EOF has settled.
    pub fn refill(&mut self) -> Result<usize, ScanError> {
        if self.eof == EofState::Settled {
            return Ok(0);
        }
        let Some(reader) = self.reader.as_mut() else {
            self.eof = EofState::Settled;
            return Ok(0);
        };

        // Drop the placeholder NUL (if any) before appending fresh bytes.
        if self.buf.last() == Some(&0) && !self.buf.is_empty() {
            self.buf.pop();
        }

        let start = self.buf.len();
        self.buf.resize(start + WINDOW_SIZE, 0);
        let mut total_read = 0usize;
        loop {
            match reader.read(&mut self.buf[start + total_read..]) {
                Ok(0) => break,
                Ok(n) => {
                    total_read += n;
                    if start + total_read == self.buf.len() {
                        break;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(ScanError::Io {
                        path: self.path.clone(),
                        source,
                    });
                }
            }
        }
        self.buf.truncate(start + total_read);
        if total_read < WINDOW_SIZE {
            self.eof = EofState::Settled;
        }
        self.buf.push(0);
        Ok(total_read)
    }

    /// Length of `buf` excluding the reserved trailing NUL.
    fn valid_len(&self) -> usize {
        self.buf.len().saturating_sub(1)
    }
}
