//! # asm64 - MOS 6502 cross-assembler
//!
//! A two-pass assembler for the MOS 6502. Source text goes in; a list of
//! contiguous memory chunks, each with its load address, comes out, ready
//! to be written as C64-style `.prg` blocks (load address prepended,
//! little-endian).
//!
//! ## Quick Start
//!
//! ```rust
//! use asm64::assemble;
//!
//! let source = r#"
//! .pc = $1000
//!     LDX #$00
//! LOOP:
//!     INX
//!     BNE LOOP
//!     RTS
//! "#;
//!
//! let output = assemble(source).unwrap();
//! let chunk = &output.chunks[0];
//! assert_eq!(chunk.start_address(), 0x1000);
//! assert_eq!(chunk.data(), &[0xA2, 0x00, 0xE8, 0xD0, 0xFD, 0x60]);
//! ```
//!
//! ## Source language
//!
//! One statement per line: a directive (`.pc`, `.byte`, `.word`, `.text`,
//! `.ascii`, `.petscii`, `.screen`), a `NAME:` label definition (optionally
//! followed by an instruction), or a `MNE [operand]` instruction. Trailing
//! `;` comments are allowed everywhere except inside `.text` literals.
//! Mnemonics and directives are case-insensitive; labels fold to upper case.
//!
//! Operands support `$` hex, `%` binary and decimal literals, label
//! references (forward references are patched after the final line), `#<` /
//! `#>` byte extraction, and `*±N` branch targets relative to the current
//! program counter.
//!
//! ## Modules
//!
//! - [`assembler`] - the two-pass engine and its error surface
//! - [`chunk`] - memory chunk container
//! - [`opcodes`] - static mnemonic table
//! - [`addressing`] - addressing mode enumeration
//! - [`charset`] - ASCII / PETSCII / screen-code translation

pub mod addressing;
pub mod assembler;
pub mod charset;
pub mod chunk;
pub mod opcodes;

// Re-export the public API surface.
pub use addressing::AddressingMode;
pub use assembler::{assemble, AssemblerOutput, AssemblyError, ErrorKind};
pub use charset::Charset;
pub use chunk::MemChunk;
pub use opcodes::{Opcode, OPCODE_TABLE};
