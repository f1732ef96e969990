//! Parser glue exposed to RDATA handlers (C9).
//!
//! `Tokenizer::lex` yields CONTIGUOUS/QUOTED/LINE_FEED/END_OF_FILE tokens;
//! everything in this module turns that stream into [`Record`]s and feeds
//! them to a caller-supplied [`RecordSink`]. Per-RR-type RDATA parsing is
//! deliberately an external collaborator (§1): this module defines the
//! [`RdataHandler`]/[`TypeTable`] seam a caller plugs their own codecs
//! into, and fully implements only the one RDATA encoding the tokenizer
//! itself understands without help — RFC 3597 generic notation.

use std::path::{Path, PathBuf};

use crate::error::{LogCategory, LogEvent, ScanError, SemanticError, SyntaxError};
use crate::lexer::Token;
use crate::lexer::Tokenizer;

/// DNS record class, as carried in a zone file's optional class field
/// (§6's `default_class`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    In,
    Cs,
    Ch,
    Hs,
    /// RFC 3597 generic class notation, `CLASS<n>`.
    Generic(u16),
}

impl Class {
    /// The class's 16-bit wire value (§6: IN=1, CS=2, CH=3, HS=4).
    pub fn value(self) -> u16 {
        match self {
            Class::In => 1,
            Class::Cs => 2,
            Class::Ch => 3,
            Class::Hs => 4,
            Class::Generic(n) => n,
        }
    }

    fn from_mnemonic(bytes: &[u8]) -> Option<Class> {
        if bytes.eq_ignore_ascii_case(b"IN") {
            Some(Class::In)
        } else if bytes.eq_ignore_ascii_case(b"CS") {
            Some(Class::Cs)
        } else if bytes.eq_ignore_ascii_case(b"CH") {
            Some(Class::Ch)
        } else if bytes.eq_ignore_ascii_case(b"HS") {
            Some(Class::Hs)
        } else {
            parse_generic_prefixed(bytes, b"CLASS").map(Class::Generic)
        }
    }
}

/// Parses an RFC 3597 `TYPE<n>` or `CLASS<n>` generic mnemonic: `prefix`
/// followed by one or more ASCII digits and nothing else.
fn parse_generic_prefixed(bytes: &[u8], prefix: &[u8]) -> Option<u16> {
    if bytes.len() <= prefix.len() || !bytes[..prefix.len()].eq_ignore_ascii_case(prefix) {
        return None;
    }
    let digits = &bytes[prefix.len()..];
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse::<u16>().ok()
}

/// One fully-parsed resource record, borrowing its owner name and RDATA
/// from buffers owned by the [`Parser`] that produced it (§6's "buffers
/// passed are valid only for the duration of the call").
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub owner: &'a [u8],
    pub rr_type: u16,
    pub class: Class,
    pub ttl: u32,
    pub rdlength: u16,
    pub rdata: &'a [u8],
}

/// The record-acceptance callback (§6). A negative return aborts parsing
/// with that error code, propagated as [`ScanError::Semantic`].
pub trait RecordSink {
    fn accept(&mut self, record: &Record<'_>) -> i32;
}

impl<F: FnMut(&Record<'_>) -> i32> RecordSink for F {
    fn accept(&mut self, record: &Record<'_>) -> i32 {
        self(record)
    }
}

/// The log callback (§6): receives warnings/info/errors as they are
/// raised, without aborting parsing (except for the error that triggered
/// the abort itself, which is also returned from `parse`).
pub trait LogSink {
    fn write(&mut self, event: &LogEvent<'_>);
}

impl<F: FnMut(&LogEvent<'_>)> LogSink for F {
    fn write(&mut self, event: &LogEvent<'_>) {
        self(event)
    }
}

/// A no-op log sink, used when `Options` carries no `log` callback.
#[derive(Default)]
pub struct NullLogSink;
impl LogSink for NullLogSink {
    fn write(&mut self, _event: &LogEvent<'_>) {}
}

/// A type-specific RDATA codec, supplied by the caller for every RR type
/// it wants textual (non-generic) RDATA support for. This is the
/// out-of-scope "per-RR-type RDATA parser" from §1: this crate calls it,
/// never implements one.
pub trait RdataHandler {
    /// Consumes CONTIGUOUS/QUOTED tokens (stopping before the terminating
    /// LINE_FEED/EOF) and appends the type's wire-format RDATA to `out`.
    /// `first` is the content of the RDATA's first token, already read by
    /// the dispatcher to decide this was not generic notation — copied
    /// out as an owned buffer rather than re-lexed, since the tokenizer
    /// cannot rewind.
    fn parse(&self, first: &[u8], tokenizer: &mut Tokenizer, out: &mut Vec<u8>) -> Result<(), ScanError>;

    /// Validates RDATA that arrived via RFC 3597 generic notation (P6:
    /// the generic form must round-trip to the same record as the
    /// type-specific textual form). The default accepts any byte string,
    /// since structural validation is itself type-specific and thus also
    /// an external collaborator.
    fn check_generic(&self, _rdata: &[u8]) -> Result<(), ScanError> {
        Ok(())
    }
}

/// The type-mnemonic-to-RDATA-handler registry a [`Parser`] dispatches
/// through (§4.8's "type descriptor"). Callers implement this over
/// whichever RR types they care about; an empty table still fully
/// supports RFC 3597 generic notation for every type.
pub trait TypeTable {
    /// Resolves a mnemonic (`"A"`, `"MX"`, a bare `"TYPE65280"`, ...) to
    /// its 16-bit RR type value.
    fn lookup(&self, mnemonic: &[u8]) -> Option<u16> {
        parse_generic_prefixed(mnemonic, b"TYPE")
    }

    /// Returns the handler registered for `rr_type`, if any. Types with no
    /// handler can still be parsed via generic notation; they cannot be
    /// parsed via type-specific textual RDATA.
    fn handler_for(&self, rr_type: u16) -> Option<&dyn RdataHandler>;
}

/// A [`TypeTable`] with no registered handlers: every RR type must be
/// written in RFC 3597 generic notation. Useful for tests and for callers
/// that only care about the tokenizer/dispatch machinery.
#[derive(Default)]
pub struct GenericOnlyTypeTable;
impl TypeTable for GenericOnlyTypeTable {
    fn handler_for(&self, _rr_type: u16) -> Option<&dyn RdataHandler> {
        None
    }
}

/// Options controlling a [`Parser`] (§6).
pub struct Options {
    /// The zone's initial origin; required, becomes the implicit root for
    /// `@` owners and relative names the tokenizer does not canonicalize.
    pub origin: Vec<u8>,
    pub default_ttl: u32,
    pub default_class: Class,
    /// Lax mode: degrade several semantic errors to warnings.
    pub secondary: bool,
    pub no_includes: bool,
    /// Accept BIND-style `1h2m3s` duration literals in TTL fields.
    pub friendly_ttls: bool,
    pub log_categories: LogCategory,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            origin: Vec::new(),
            default_ttl: 3600,
            default_class: Class::In,
            secondary: false,
            no_includes: false,
            friendly_ttls: false,
            log_categories: LogCategory::ERROR | LogCategory::WARNING,
        }
    }
}

/// Parses a plain decimal TTL, or (when `friendly` is set) a BIND-style
/// `1h2m3s` duration: a sequence of `<digits><unit>` pairs where unit is
/// one of `w`/`d`/`h`/`m`/`s` (case-insensitive), summed in seconds.
pub fn scan_ttl(token: &[u8], friendly: bool) -> Result<u32, SemanticError> {
    if token.is_empty() {
        return Err(SemanticError::TtlOutOfRange);
    }
    if token.iter().all(u8::is_ascii_digit) {
        return token
            .iter()
            .try_fold(0u32, |acc, &b| {
                acc.checked_mul(10)?.checked_add((b - b'0') as u32)
            })
            .ok_or(SemanticError::TtlOutOfRange);
    }
    if !friendly {
        return Err(SemanticError::TtlOutOfRange);
    }
    let mut total: u32 = 0;
    let mut digits: u32 = 0;
    let mut have_digits = false;
    for &b in token {
        if b.is_ascii_digit() {
            digits = digits
                .checked_mul(10)
                .and_then(|v| v.checked_add((b - b'0') as u32))
                .ok_or(SemanticError::TtlOutOfRange)?;
            have_digits = true;
            continue;
        }
        if !have_digits {
            return Err(SemanticError::TtlOutOfRange);
        }
        let unit = match b.to_ascii_lowercase() {
            b'w' => 604_800,
            b'd' => 86_400,
            b'h' => 3_600,
            b'm' => 60,
            b's' => 1,
            _ => return Err(SemanticError::TtlOutOfRange),
        };
        total = total
            .checked_add(digits.checked_mul(unit).ok_or(SemanticError::TtlOutOfRange)?)
            .ok_or(SemanticError::TtlOutOfRange)?;
        digits = 0;
        have_digits = false;
    }
    if have_digits {
        return Err(SemanticError::TtlOutOfRange);
    }
    Ok(total)
}

/// Decodes a domain-name token's raw bytes (the owner, or a name-typed
/// RDATA field such as an `MX` exchange or `CNAME` target) into its literal
/// form, applying RFC 1035 escape decoding. The tokenizer draws no
/// distinction between a name token and a character-string token — both
/// arrive as CONTIGUOUS or QUOTED — so this is `unescape` under the name
/// RDATA handlers reach for when scanning a name field (§4.8/§6).
pub fn scan_name(raw: &[u8]) -> Result<Vec<u8>, ScanError> {
    unescape(raw)
}

/// Resolves an owner-name token, expanding a bare `@` to `origin` the way
/// `parse_record`'s start-of-line handling does, and decoding escapes
/// otherwise (§4.8 step 1).
pub fn scan_owner(raw: &[u8], origin: &[u8]) -> Result<Vec<u8>, ScanError> {
    if raw == b"@" {
        Ok(origin.to_vec())
    } else {
        unescape(raw)
    }
}

/// Resolves a class mnemonic token (`IN`, `CH`, `CLASS<n>`, ...) to a
/// [`Class`], or `None` if the token is not a recognized class — in which
/// case the caller should treat it as belonging to the next field instead
/// (§4.8 step 3: class and type may appear in either order).
pub fn scan_class(mnemonic: &[u8]) -> Option<Class> {
    Class::from_mnemonic(mnemonic)
}

/// Resolves a type mnemonic token (`A`, `MX`, `TYPE<n>`, ...) to its 16-bit
/// RR type value via the caller's [`TypeTable`] (§4.8 step 3).
pub fn scan_type<T: TypeTable + ?Sized>(mnemonic: &[u8], types: &T) -> Option<u16> {
    types.lookup(mnemonic)
}

/// Returns the content bytes of whichever token kind carries text —
/// CONTIGUOUS or QUOTED are interchangeable as `<character-string>`
/// sources once escapes have been applied; this is the `have_string`
/// helper RDATA handlers use so they need not match on token kind
/// themselves.
pub fn have_string<'a>(token: &Token<'a>) -> Option<&'a [u8]> {
    match *token {
        Token::Contiguous(b) | Token::Quoted(b) => Some(b),
        _ => None,
    }
}

/// Decodes one RFC 1035 `\c` / `\DDD` escape sequence starting at
/// `bytes[*pos]` (which must be the backslash), advancing `*pos` past it
/// and appending the decoded byte to `out`.
fn decode_escape(bytes: &[u8], pos: &mut usize, out: &mut Vec<u8>) -> Result<(), ScanError> {
    debug_assert_eq!(bytes[*pos], b'\\');
    let rest = &bytes[*pos + 1..];
    if rest.len() >= 3 && rest[..3].iter().all(u8::is_ascii_digit) {
        let value = (rest[0] - b'0') as u32 * 100 + (rest[1] - b'0') as u32 * 10 + (rest[2] - b'0') as u32;
        if value > 255 {
            return Err(ScanError::syntax(SyntaxError::BadEscape, String::new(), 0));
        }
        out.push(value as u8);
        *pos += 4;
    } else if let Some(&c) = rest.first() {
        out.push(c);
        *pos += 2;
    } else {
        return Err(ScanError::syntax(SyntaxError::BadEscape, String::new(), 0));
    }
    Ok(())
}

/// Applies RFC 1035 escape decoding to a raw token's bytes, producing the
/// literal content a domain-name label or character-string actually holds.
pub fn unescape(raw: &[u8]) -> Result<Vec<u8>, ScanError> {
    let mut out = Vec::with_capacity(raw.len());
    let mut pos = 0;
    while pos < raw.len() {
        if raw[pos] == b'\\' {
            decode_escape(raw, &mut pos, &mut out)?;
        } else {
            out.push(raw[pos]);
            pos += 1;
        }
    }
    Ok(out)
}

/// Decodes a contiguous run of hex digits (RFC 3597 generic RDATA), two
/// digits per byte, ignoring nothing — unlike whitespace-separated
/// mnemonic tokens, all hex tokens in a generic-notation record are
/// concatenated before decoding.
fn decode_hex(digits: &[u8]) -> Result<Vec<u8>, SemanticError> {
    if digits.len() % 2 != 0 {
        return Err(SemanticError::BadDirective);
    }
    let mut out = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks_exact(2) {
        let hi = (pair[0] as char).to_digit(16).ok_or(SemanticError::BadDirective)?;
        let lo = (pair[1] as char).to_digit(16).ok_or(SemanticError::BadDirective)?;
        out.push((hi * 16 + lo) as u8);
    }
    Ok(out)
}

/// Drives the token stream to completion, parsing records and directives
/// and feeding each record to a [`RecordSink`] (§4.8, §6's `parse`).
pub struct Parser<'t, T: TypeTable> {
    tokenizer: Tokenizer,
    options: Options,
    origin: Vec<u8>,
    default_ttl: u32,
    default_class: Class,
    last_owner: Vec<u8>,
    last_ttl: u32,
    rdata_buf: Vec<u8>,
    types: &'t T,
}

impl<'t, T: TypeTable> Parser<'t, T> {
    pub fn new(tokenizer: Tokenizer, options: Options, types: &'t T) -> Self {
        let origin = options.origin.clone();
        let default_ttl = options.default_ttl;
        let default_class = options.default_class;
        Parser {
            tokenizer,
            options,
            origin,
            default_ttl,
            default_class,
            last_owner: Vec::new(),
            last_ttl: 0,
            rdata_buf: Vec::new(),
            types,
        }
    }

    pub fn open(path: impl AsRef<Path>, options: Options, types: &'t T) -> Result<Self, ScanError> {
        let no_includes = options.no_includes;
        let tokenizer = Tokenizer::open(path, no_includes)?;
        Ok(Self::new(tokenizer, options, types))
    }

    pub fn open_str(text: impl AsRef<[u8]>, options: Options, types: &'t T) -> Result<Self, ScanError> {
        let no_includes = options.no_includes;
        let tokenizer = Tokenizer::open_str("<string>", text, no_includes);
        Ok(Self::new(tokenizer, options, types))
    }

    fn warn(&self, log: &mut dyn LogSink, message: String) {
        if self.options.log_categories.contains(LogCategory::WARNING) {
            log.write(&LogEvent {
                file: file!(),
                line: line!(),
                function: "Parser::parse",
                category: LogCategory::WARNING,
                message: &message,
            });
        }
    }

    fn err(&self, kind: SemanticError) -> ScanError {
        ScanError::semantic(kind, self.tokenizer.current_file().to_string(), self.tokenizer.current_line())
    }

    /// Drives parsing to completion, feeding every successfully-parsed
    /// record to `sink`. Directives (`$ORIGIN`/`$TTL`/`$INCLUDE`) are
    /// consumed internally and never reach the sink.
    pub fn parse<S: RecordSink>(&mut self, sink: &mut S) -> Result<(), ScanError> {
        self.parse_with_log(sink, &mut NullLogSink)
    }

    pub fn parse_with_log<S: RecordSink>(
        &mut self,
        sink: &mut S,
        log: &mut dyn LogSink,
    ) -> Result<(), ScanError> {
        loop {
            let start_of_line = self.tokenizer.start_of_line();
            let token = self.tokenizer.lex()?;
            match token {
                Token::EndOfFile => return Ok(()),
                Token::LineFeed => continue,
                Token::Contiguous(bytes) if start_of_line && bytes.first() == Some(&b'$') => {
                    let bytes = bytes.to_vec();
                    self.parse_directive(&bytes, log)?;
                }
                Token::Contiguous(_) | Token::Quoted(_) => {
                    self.parse_record(token, start_of_line, sink, log)?;
                }
            }
        }
    }

    /// Runs `parse_directive_inner`, and in lax mode (`Options::secondary`)
    /// degrades the semantic errors it raises to a warning plus a resync to
    /// the next line instead of aborting the whole parse (§6's `secondary`).
    /// Syntax errors (malformed escapes, unbalanced groups) are never
    /// degraded: lax mode forgives zone-authoring mistakes, not a tokenizer
    /// that can no longer find its place in the input.
    fn parse_directive(&mut self, directive: &[u8], log: &mut dyn LogSink) -> Result<(), ScanError> {
        match self.parse_directive_inner(directive) {
            Err(ScanError::Semantic(kind, ..)) if self.options.secondary => {
                self.warn(log, format!("ignoring directive: {kind}"));
                self.skip_to_line_end()
            }
            other => other,
        }
    }

    fn parse_directive_inner(&mut self, directive: &[u8]) -> Result<(), ScanError> {
        if directive.eq_ignore_ascii_case(b"$ORIGIN") {
            let name = self.expect_contiguous()?;
            self.origin = scan_name(&name)?;
            self.skip_to_line_end()?;
        } else if directive.eq_ignore_ascii_case(b"$TTL") {
            let ttl_token = self.expect_contiguous()?;
            self.default_ttl = scan_ttl(&ttl_token, self.options.friendly_ttls).map_err(|e| self.err(e))?;
            self.skip_to_line_end()?;
        } else if directive.eq_ignore_ascii_case(b"$INCLUDE") {
            let path_token = self.expect_contiguous()?;
            let path = PathBuf::from(String::from_utf8_lossy(&path_token).into_owned());
            // An optional second argument overrides the origin within the
            // included file only; §1 scopes $INCLUDE's own semantics out,
            // but the stack-reshaping effect on the token stream is in
            // scope, so the push itself happens here.
            match self.tokenizer.lex()? {
                Token::Contiguous(origin_bytes) => {
                    self.origin = scan_name(origin_bytes)?;
                }
                Token::LineFeed | Token::EndOfFile => {}
                Token::Quoted(_) => return Err(self.err(SemanticError::BadDirective)),
            }
            self.tokenizer.push_include(&path)?;
        } else {
            return Err(self.err(SemanticError::BadDirective));
        }
        Ok(())
    }

    fn expect_contiguous(&mut self) -> Result<Vec<u8>, ScanError> {
        match self.tokenizer.lex()? {
            Token::Contiguous(b) => Ok(b.to_vec()),
            _ => Err(self.err(SemanticError::BadDirective)),
        }
    }

    fn skip_to_line_end(&mut self) -> Result<(), ScanError> {
        loop {
            match self.tokenizer.lex()? {
                Token::LineFeed | Token::EndOfFile => return Ok(()),
                _ => continue,
            }
        }
    }

    /// Resyncs to the next line in lax mode, given a token already lexed
    /// while looking for a mandatory field that turned out to be missing.
    /// Avoids swallowing a line that `already_lexed` already ended.
    fn resync_to_line_end(&mut self, already_lexed: Token<'_>) -> Result<(), ScanError> {
        match already_lexed {
            Token::LineFeed | Token::EndOfFile => Ok(()),
            _ => self.skip_to_line_end(),
        }
    }

    fn parse_record<S: RecordSink>(
        &mut self,
        first_token: Token<'_>,
        start_of_line: bool,
        sink: &mut S,
        log: &mut dyn LogSink,
    ) -> Result<(), ScanError> {
        let owner_bytes;
        let mut next_token;
        if start_of_line {
            let raw = match first_token {
                Token::Contiguous(b) | Token::Quoted(b) => b,
                _ => unreachable!("caller only forwards textual tokens"),
            };
            owner_bytes = scan_owner(raw, &self.origin)?;
            self.last_owner = owner_bytes;
            next_token = self.tokenizer.lex()?;
        } else {
            next_token = first_token;
        }

        let mut ttl: Option<u32> = None;
        let mut class: Option<Class> = None;

        // TTL and class may appear in either order before the mandatory
        // type mnemonic (§4.8 step 2-3).
        for _ in 0..2 {
            match next_token {
                Token::Contiguous(bytes) if ttl.is_none() && bytes.first().is_some_and(u8::is_ascii_digit) => {
                    match scan_ttl(bytes, self.options.friendly_ttls) {
                        Ok(v) => ttl = Some(v),
                        Err(e) if self.options.secondary => {
                            self.warn(log, format!("ignoring malformed TTL field: {e}"));
                        }
                        Err(e) => return Err(self.err(e)),
                    }
                    next_token = self.tokenizer.lex()?;
                }
                Token::Contiguous(bytes) if class.is_none() => {
                    if let Some(c) = scan_class(bytes) {
                        class = Some(c);
                        next_token = self.tokenizer.lex()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }

        let type_bytes = match next_token {
            Token::Contiguous(bytes) => bytes.to_vec(),
            other if self.options.secondary => {
                self.warn(log, "record has no type field, ignoring".to_string());
                return self.resync_to_line_end(other);
            }
            _ => return Err(self.err(SemanticError::UnknownType(String::new()))),
        };
        let rr_type = match scan_type(&type_bytes, self.types) {
            Some(t) => t,
            None if self.options.secondary => {
                self.warn(
                    log,
                    format!(
                        "unknown record type {:?}, ignoring record",
                        String::from_utf8_lossy(&type_bytes)
                    ),
                );
                return self.skip_to_line_end();
            }
            None => {
                return Err(self
                    .err(SemanticError::UnknownType(String::from_utf8_lossy(&type_bytes).into_owned())))
            }
        };
        let handler = self.types.handler_for(rr_type);

        let ttl = ttl.unwrap_or_else(|| {
            if self.last_ttl != 0 {
                self.last_ttl
            } else {
                self.default_ttl
            }
        });
        self.last_ttl = ttl;
        let class = class.unwrap_or(self.default_class);

        self.rdata_buf.clear();
        let rdlength = self.parse_rdata(rr_type, handler, log)?;

        let record = Record {
            owner: &self.last_owner,
            rr_type,
            class,
            ttl,
            rdlength,
            rdata: &self.rdata_buf,
        };
        let code = sink.accept(&record);
        if code < 0 {
            return Err(self.err(SemanticError::RejectedBySink(code)));
        }
        Ok(())
    }

    /// Parses the RDATA portion of a record, writing wire-format bytes
    /// into `self.rdata_buf` and returning `rdlength`. Recognizes RFC 3597
    /// generic notation (`\#`) directly; otherwise delegates to `handler`.
    fn parse_rdata(
        &mut self,
        rr_type: u16,
        handler: Option<&dyn RdataHandler>,
        log: &mut dyn LogSink,
    ) -> Result<u16, ScanError> {
        let token = self.tokenizer.lex()?;
        match token {
            Token::LineFeed | Token::EndOfFile => Ok(0),
            Token::Contiguous(b"\\#") => {
                let len_token = self.expect_contiguous()?;
                let rdlength: u16 = std::str::from_utf8(&len_token)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| self.err(SemanticError::BadDirective))?;

                let mut hex = Vec::new();
                loop {
                    match self.tokenizer.lex()? {
                        Token::Contiguous(b) => hex.extend_from_slice(b),
                        Token::LineFeed | Token::EndOfFile => break,
                        Token::Quoted(_) => return Err(self.err(SemanticError::BadDirective)),
                    }
                }
                let decoded = decode_hex(&hex).map_err(|e| self.err(e))?;
                if decoded.len() != rdlength as usize {
                    return Err(self.err(SemanticError::BadDirective));
                }
                if let Some(handler) = handler {
                    handler.check_generic(&decoded)?;
                } else {
                    self.warn(
                        log,
                        format!("TYPE{rr_type} accepted via generic notation with no registered handler to validate it"),
                    );
                }
                self.rdata_buf.extend_from_slice(&decoded);
                Ok(rdlength)
            }
            other => {
                let Some(handler) = handler else {
                    return Err(ScanError::NotImplemented("textual RDATA for this type"));
                };
                // The tokenizer has no native "unget": the first RDATA
                // token is already consumed, so its bytes are copied out
                // and handed to the handler instead of being re-lexed.
                let first_owned: Vec<u8> = have_string(&other).map(<[u8]>::to_vec).unwrap_or_default();
                let before = self.rdata_buf.len();
                handler.parse(&first_owned, &mut self.tokenizer, &mut self.rdata_buf)?;
                let written = self.rdata_buf.len() - before;
                u16::try_from(written).map_err(|_| self.err(SemanticError::BadDirective))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CollectSink {
        records: Vec<(Vec<u8>, u16, u32, Vec<u8>)>,
    }

    impl RecordSink for CollectSink {
        fn accept(&mut self, record: &Record<'_>) -> i32 {
            self.records.push((
                record.owner.to_vec(),
                record.rr_type,
                record.ttl,
                record.rdata.to_vec(),
            ));
            0
        }
    }

    #[test]
    fn scan_ttl_parses_plain_decimal() {
        assert_eq!(scan_ttl(b"3600", false).unwrap(), 3600);
    }

    #[test]
    fn scan_ttl_rejects_friendly_form_unless_enabled() {
        assert!(scan_ttl(b"1h", false).is_err());
        assert_eq!(scan_ttl(b"1h", true).unwrap(), 3600);
    }

    #[test]
    fn scan_ttl_friendly_form_sums_units() {
        assert_eq!(scan_ttl(b"1h2m3s", true).unwrap(), 3600 + 120 + 3);
    }

    #[test]
    fn class_generic_mnemonic_round_trips() {
        assert_eq!(scan_class(b"CLASS1"), Some(Class::Generic(1)));
        assert_eq!(scan_class(b"in"), Some(Class::In));
        assert_eq!(scan_class(b"frobnicate"), None);
    }

    #[test]
    fn scan_owner_expands_bare_at_to_origin() {
        assert_eq!(scan_owner(b"@", b"example.com.").unwrap(), b"example.com.");
        assert_eq!(scan_owner(b"www", b"example.com.").unwrap(), b"www");
    }

    #[test]
    fn scan_type_resolves_generic_mnemonic() {
        let types = GenericOnlyTypeTable;
        assert_eq!(scan_type(b"TYPE65280", &types), Some(65280));
        assert_eq!(scan_type(b"bogus", &types), None);
    }

    #[test]
    fn unescape_decodes_decimal_and_char_escapes() {
        assert_eq!(unescape(b"a\\.b").unwrap(), b"a.b");
        assert_eq!(unescape(b"\\065").unwrap(), b"A");
    }

    #[test]
    fn generic_notation_record_parses_and_round_trips_hex() {
        let types = GenericOnlyTypeTable;
        let options = Options {
            origin: b"example.com.".to_vec(),
            ..Default::default()
        };
        let mut parser = Parser::open_str("www IN A \\# 4 c0000201\n", options, &types).unwrap();
        let mut sink = CollectSink { records: Vec::new() };
        parser.parse(&mut sink).unwrap();
        assert_eq!(sink.records.len(), 1);
        let (owner, rr_type, ttl, rdata) = &sink.records[0];
        assert_eq!(owner, b"www");
        assert_eq!(*rr_type, 1);
        assert_eq!(*ttl, 3600);
        assert_eq!(rdata, &vec![0xc0, 0x00, 0x02, 0x01]);
    }

    #[test]
    fn dollar_ttl_updates_default_for_subsequent_records() {
        let types = GenericOnlyTypeTable;
        let options = Options {
            origin: b"example.com.".to_vec(),
            ..Default::default()
        };
        let mut parser = Parser::open_str(
            "$TTL 60\nwww IN TYPE1 \\# 4 c0000201\n",
            options,
            &types,
        )
        .unwrap();
        let mut sink = CollectSink { records: Vec::new() };
        parser.parse(&mut sink).unwrap();
        assert_eq!(sink.records[0].2, 60);
    }

    #[test]
    fn at_owner_resolves_to_current_origin() {
        let types = GenericOnlyTypeTable;
        let options = Options {
            origin: b"example.com.".to_vec(),
            ..Default::default()
        };
        let mut parser = Parser::open_str("@ IN TYPE1 \\# 0\n", options, &types).unwrap();
        let mut sink = CollectSink { records: Vec::new() };
        parser.parse(&mut sink).unwrap();
        assert_eq!(sink.records[0].0, b"example.com.");
    }

    #[test]
    fn unknown_type_without_generic_notation_is_a_semantic_error() {
        let types = GenericOnlyTypeTable;
        let options = Options {
            origin: b"example.com.".to_vec(),
            ..Default::default()
        };
        let mut parser = Parser::open_str("www IN A 192.0.2.1\n", options, &types).unwrap();
        let mut sink = CollectSink { records: Vec::new() };
        let err = parser.parse(&mut sink).unwrap_err();
        assert!(matches!(err, ScanError::NotImplemented(_)));
    }

    #[test]
    fn unknown_type_aborts_parse_unless_secondary_is_set() {
        let types = GenericOnlyTypeTable;
        let options = Options {
            origin: b"example.com.".to_vec(),
            ..Default::default()
        };
        let mut parser =
            Parser::open_str("www IN BOGUS \\# 0\ngood IN TYPE1 \\# 0\n", options, &types).unwrap();
        let mut sink = CollectSink { records: Vec::new() };
        let err = parser.parse(&mut sink).unwrap_err();
        assert!(matches!(err, ScanError::Semantic(SemanticError::UnknownType(_), ..)));

        let types = GenericOnlyTypeTable;
        let options = Options {
            origin: b"example.com.".to_vec(),
            secondary: true,
            ..Default::default()
        };
        let mut parser =
            Parser::open_str("www IN BOGUS \\# 0\ngood IN TYPE1 \\# 0\n", options, &types).unwrap();
        let mut sink = CollectSink { records: Vec::new() };
        let mut saw_unknown_type_warning = false;
        parser
            .parse_with_log(&mut sink, &mut |event: &crate::error::LogEvent<'_>| {
                assert_eq!(event.category, LogCategory::WARNING);
                if event.message.contains("unknown record type") {
                    saw_unknown_type_warning = true;
                }
            })
            .unwrap();
        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].0, b"good");
        assert!(saw_unknown_type_warning);
    }

    #[test]
    fn unknown_directive_aborts_parse_unless_secondary_is_set() {
        let types = GenericOnlyTypeTable;
        let options = Options {
            origin: b"example.com.".to_vec(),
            ..Default::default()
        };
        let mut parser = Parser::open_str("$BOGUS foo\n", options, &types).unwrap();
        let mut sink = CollectSink { records: Vec::new() };
        let err = parser.parse(&mut sink).unwrap_err();
        assert!(matches!(err, ScanError::Semantic(SemanticError::BadDirective, ..)));

        let options = Options {
            origin: b"example.com.".to_vec(),
            secondary: true,
            ..Default::default()
        };
        let mut parser =
            Parser::open_str("$BOGUS foo\ngood IN TYPE1 \\# 0\n", options, &types).unwrap();
        let mut sink = CollectSink { records: Vec::new() };
        parser.parse(&mut sink).unwrap();
        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].0, b"good");
    }
}
