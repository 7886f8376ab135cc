//! # Addressing Modes
//!
//! The eleven operand encodings this assembler emits. Each mode is pinned to
//! a fixed column of the opcode table, so mode classification can index the
//! per-mnemonic code vector directly.

/// Number of opcode-table columns; one per addressing mode.
pub const MODE_COLUMNS: usize = 11;

/// 6502 addressing mode enumeration.
///
/// The addressing mode determines how many bytes follow an opcode and how
/// the CPU computes the effective address. Accumulator operations share the
/// implicit column: `ASL` with no operand is the accumulator form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// 8-bit constant operand.
    ///
    /// Example: LDA #$10
    Immediate,

    /// 8-bit address in the zero page ($00-$FF).
    ///
    /// Example: LDA $80
    ZeroPage,

    /// Zero page address indexed by X.
    ///
    /// Example: LDA $80,X
    ZeroPageX,

    /// Zero page address indexed by Y.
    ///
    /// Example: LDX $80,Y
    ZeroPageY,

    /// Full 16-bit address.
    ///
    /// Example: STA $0200
    Absolute,

    /// 16-bit address indexed by X.
    ///
    /// Example: LDA $1234,X
    AbsoluteX,

    /// 16-bit address indexed by Y.
    ///
    /// Example: LDA $1234,Y
    AbsoluteY,

    /// Indexed indirect: (ZP + X) then dereference.
    ///
    /// Example: LDA ($40,X)
    IndirectX,

    /// Indirect indexed: ZP dereference then + Y.
    ///
    /// Example: LDA ($40),Y
    IndirectY,

    /// No operand; also covers accumulator operations.
    ///
    /// Examples: CLC, RTS, LSR
    Implicit,

    /// Signed 8-bit displacement from the address after the branch.
    ///
    /// Example: BNE loop
    Relative,
}

impl AddressingMode {
    /// Column of this mode in the opcode table's code vector.
    pub fn column(self) -> usize {
        match self {
            AddressingMode::Immediate => 0,
            AddressingMode::ZeroPage => 1,
            AddressingMode::ZeroPageX => 2,
            AddressingMode::ZeroPageY => 3,
            AddressingMode::Absolute => 4,
            AddressingMode::AbsoluteX => 5,
            AddressingMode::AbsoluteY => 6,
            AddressingMode::IndirectX => 7,
            AddressingMode::IndirectY => 8,
            AddressingMode::Implicit => 9,
            AddressingMode::Relative => 10,
        }
    }
}
