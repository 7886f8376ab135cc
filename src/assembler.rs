//! Two-pass 6502 assembly.
//!
//! [`assemble`] drives the whole pipeline. Pass 1 walks the source one line
//! at a time: each line is a directive, a label definition (optionally
//! followed by an instruction), an instruction, or blank; anything else is
//! a syntax error. Instructions and data are appended to the current memory
//! chunk; operands naming labels without a definition yet emit placeholders
//! and record patch sites. Pass 2 rewrites those sites once the whole source
//! has been read.
//!
//! All state lives in one [`Assembler`] value created per call, so the entry
//! point is a plain function and concurrent assemblies never share anything.

pub mod symbol_table;

mod directives;
mod encoder;
mod fixups;
mod numbers;

use std::fmt;

use crate::charset::Charset;
use crate::chunk::MemChunk;
use fixups::FixupTable;
use symbol_table::{is_valid_label, SymbolTable};

/// Classification of assembly errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unparseable line, malformed directive, label or string literal.
    Syntax,

    /// Unknown mnemonic or a label that never gets defined.
    UnknownSymbol,

    /// Label defined more than once.
    Redefinition,

    /// Value outside its byte/word range, branch beyond +/-127, address
    /// above $FFFF.
    Range,

    /// Code or data emitted before any `.pc` directive.
    Order,

    /// Mnemonic does not support the addressing mode the operand implies.
    ModeMismatch,

    /// Chunk overflow past the 64 KiB address space.
    Internal,
}

impl ErrorKind {
    fn label(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "Syntax Error",
            ErrorKind::UnknownSymbol => "Unknown Symbol",
            ErrorKind::Redefinition => "Duplicate Label",
            ErrorKind::Range => "Range Error",
            ErrorKind::Order => "Missing Address",
            ErrorKind::ModeMismatch => "Addressing Mode Mismatch",
            ErrorKind::Internal => "Internal Error",
        }
    }
}

/// An error that aborted an [`assemble`] call.
///
/// Carries everything a front-end needs for a report: the 1-based source
/// line, the offending line's text, a short message and an optional longer
/// hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyError {
    /// Error classification.
    pub kind: ErrorKind,

    /// Source line the error occurred on (1-indexed).
    pub line_number: u32,

    /// The offending line, surrounding whitespace trimmed.
    pub line_content: String,

    /// Short human-readable message.
    pub message: String,

    /// Optional verbose explanation.
    pub hint: Option<String>,
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {}: {} - {}",
            self.line_number,
            self.kind.label(),
            self.message
        )
    }
}

impl std::error::Error for AssemblyError {}

/// Complete output from assembling source code.
#[derive(Debug, Clone)]
pub struct AssemblerOutput {
    /// Finalized memory chunks, in source order.
    pub chunks: Vec<MemChunk>,
}

/// A line-scoped error before the driver attaches source context.
#[derive(Debug, Clone)]
struct LineError {
    kind: ErrorKind,
    message: String,
    hint: Option<String>,
}

impl LineError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            hint: None,
        }
    }

    fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownSymbol, message)
    }

    fn range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Range, message)
    }

    fn mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ModeMismatch, message)
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    fn at(self, line_number: u32, line_content: String) -> AssemblyError {
        AssemblyError {
            kind: self.kind,
            line_number,
            line_content,
            message: self.message,
            hint: self.hint,
        }
    }
}

/// Assemble 6502 source text into memory chunks.
///
/// # Examples
///
/// ```
/// use asm64::assemble;
///
/// let output = assemble(".pc = $1000\n    LDA #$05\n    RTS").unwrap();
/// let chunk = &output.chunks[0];
/// assert_eq!(chunk.start_address(), 0x1000);
/// assert_eq!(chunk.data(), &[0xA9, 0x05, 0x60]);
/// ```
///
/// Errors carry the offending line and an optional hint:
///
/// ```
/// use asm64::assemble;
///
/// let err = assemble(".pc = $1000\n    LDA #$05 #$06").unwrap_err();
/// assert_eq!(err.line_number, 2);
/// assert_eq!(err.line_content, "LDA #$05 #$06");
/// ```
pub fn assemble(source: &str) -> Result<AssemblerOutput, AssemblyError> {
    Assembler::new().run(source)
}

/// All pass-local assembly state; one instance per [`assemble`] call.
struct Assembler {
    /// Address the next emitted byte will load at. Meaningless until the
    /// first `.pc`; emission is rejected while no chunk is open.
    pc: u16,

    /// Charset applied to `.text` literals.
    charset: Charset,

    /// Chunk currently being appended to; `None` until the first `.pc`.
    current: Option<MemChunk>,

    /// Finalized chunks, in source order.
    chunks: Vec<MemChunk>,

    symbols: SymbolTable,
    fixups: FixupTable,

    /// Trimmed source lines, kept for error reports.
    source_lines: Vec<String>,
}

impl Assembler {
    fn new() -> Self {
        Self {
            pc: 0,
            charset: Charset::Ascii,
            current: None,
            chunks: Vec::new(),
            symbols: SymbolTable::new(),
            fixups: FixupTable::new(),
            source_lines: Vec::new(),
        }
    }

    fn run(mut self, source: &str) -> Result<AssemblerOutput, AssemblyError> {
        for (index, raw) in source.lines().enumerate() {
            let number = (index + 1) as u32;
            let line = raw.trim().to_string();
            self.source_lines.push(line.clone());
            if let Err(err) = self.process_line(&line, number) {
                return Err(err.at(number, line));
            }
        }

        if let Some(mut chunk) = self.current.take() {
            chunk.finalize();
            self.chunks.push(chunk);
        }

        if let Err((line, err)) = self.fixups.resolve(&self.symbols, &mut self.chunks) {
            let content = self
                .source_lines
                .get(line as usize - 1)
                .cloned()
                .unwrap_or_default();
            return Err(err.at(line, content));
        }

        Ok(AssemblerOutput {
            chunks: self.chunks,
        })
    }

    /// Classify and process one trimmed source line.
    fn process_line(&mut self, line: &str, number: u32) -> Result<(), LineError> {
        if line.is_empty() {
            return Ok(());
        }
        if line.starts_with('.') {
            return self.directive(line);
        }

        let code = strip_comment(line).trim_end();
        if code.is_empty() {
            return Ok(());
        }
        let code = code.to_ascii_uppercase();

        let rest = self.take_label(&code, number)?.trim_start();
        if rest.is_empty() {
            return Ok(());
        }
        self.instruction(rest, number)
    }

    /// Peel a leading `NAME:` label definition off the line, binding the
    /// name to the current program counter. Returns whatever follows.
    fn take_label<'a>(&mut self, code: &'a str, number: u32) -> Result<&'a str, LineError> {
        let Some(colon) = code.find(':') else {
            return Ok(code);
        };
        let candidate = &code[..colon];
        if candidate.contains(char::is_whitespace) {
            // The colon belongs to something later on the line.
            return Ok(code);
        }

        if !is_valid_label(candidate) {
            return Err(LineError::syntax(format!(
                "Incorrect label definition: {candidate}"
            ))
            .with_hint(
                "Labels must start with a letter, followed by letters, digits, '_' or '!'.",
            ));
        }

        if let Err(existing) = self.symbols.define(candidate, self.pc, number) {
            return Err(LineError::new(
                ErrorKind::Redefinition,
                format!("Label already defined: {candidate}"),
            )
            .with_hint(format!(
                "'{}' was first defined on line {}.",
                existing.name, existing.defined_at
            )));
        }

        Ok(&code[colon + 1..])
    }

    /// The open chunk, or the error every emission before `.pc` gets.
    fn require_chunk(&mut self) -> Result<&mut MemChunk, LineError> {
        self.current.as_mut().ok_or_else(|| {
            LineError::new(
                ErrorKind::Order,
                "Instruction reached without address specification",
            )
            .with_hint("Specify a starting address with the .pc directive.")
        })
    }

    /// Append one byte to the open chunk and advance the program counter.
    fn emit_byte(&mut self, value: u8) -> Result<(), LineError> {
        let chunk = self.require_chunk()?;
        chunk.push_byte(value).map_err(|overflow| {
            LineError::new(ErrorKind::Internal, format!("Internal error: {overflow}"))
        })?;
        self.pc = self.pc.wrapping_add(1);
        Ok(())
    }

    /// Append a little-endian word.
    fn emit_word(&mut self, value: u16) -> Result<(), LineError> {
        self.emit_byte((value & 0xFF) as u8)?;
        self.emit_byte((value >> 8) as u8)
    }
}

/// Drop a trailing `;` comment. Not applied to `.text` lines, where `;` may
/// appear inside the string literal.
fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(position) => &line[..position],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comment_lines_are_ignored() {
        let output = assemble("\n   \n; just a comment\n.pc = $1000\nNOP ; note\n").unwrap();
        assert_eq!(output.chunks.len(), 1);
        assert_eq!(output.chunks[0].data(), &[0xEA]);
    }

    #[test]
    fn unclassifiable_line_is_a_syntax_error() {
        let err = assemble(".pc = $1000\n!?#").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.line_number, 2);
        assert_eq!(err.line_content, "!?#");
    }

    #[test]
    fn label_applies_to_following_instruction_on_same_line() {
        let output = assemble(".pc = $1000\nSTART: LDA #$01\nJMP START").unwrap();
        assert_eq!(output.chunks[0].data(), &[0xA9, 0x01, 0x4C, 0x00, 0x10]);
    }

    #[test]
    fn invalid_label_candidate_is_reported() {
        let err = assemble(".pc = $1000\n1BAD: NOP").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains("1BAD"));
    }

    #[test]
    fn error_display_includes_line_and_kind() {
        let err = assemble("NOP").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Order);
        let text = err.to_string();
        assert!(text.contains("Line 1"));
        assert!(text.contains("Missing Address"));
    }

    #[test]
    fn labels_may_bind_before_the_first_pc_directive() {
        // A label definition is not an emission; it binds to address 0.
        let output = assemble("ZERO:\n.pc = $1000\nLDA ZERO").unwrap();
        assert_eq!(output.chunks[0].data(), &[0xAD, 0x00, 0x00]);
    }
}
