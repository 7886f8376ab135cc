//! # Opcode Table
//!
//! The static mnemonic table that serves as the single source of truth for
//! instruction encoding. Each entry carries one code per addressing-mode
//! column (see [`AddressingMode::column`]).
//!
//! A column value of `0x00` means "mode not supported for this mnemonic".
//! That sentinel is sound because no legal opcode placed in these columns has
//! the byte value 0x00: the only 0x00 opcode is BRK, which this assembler
//! does not emit (and which is therefore absent from the table: 55 rows for
//! the 56 official mnemonics).

use crate::addressing::{AddressingMode, MODE_COLUMNS};

/// Opcode byte emitted for `JMP (addr)`, the only plain-indirect instruction.
pub const JMP_INDIRECT: u8 = 0x6C;

/// One mnemonic with its code for every addressing-mode column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    /// Three-letter instruction name, uppercase.
    pub mnemonic: &'static str,

    /// Opcode byte per addressing-mode column; 0x00 = unsupported.
    pub codes: [u8; MODE_COLUMNS],
}

impl Opcode {
    /// The opcode byte for `mode`, or `None` when the mnemonic does not
    /// support it.
    pub fn code(&self, mode: AddressingMode) -> Option<u8> {
        match self.codes[mode.column()] {
            0 => None,
            byte => Some(byte),
        }
    }

    /// True for the eight conditional branches, which interpret a plain
    /// address operand as a relative displacement target.
    pub fn is_branch(&self) -> bool {
        self.codes[AddressingMode::Relative.column()] != 0
    }
}

const fn op(mnemonic: &'static str, codes: [u8; MODE_COLUMNS]) -> Opcode {
    Opcode { mnemonic, codes }
}

/// The full instruction set, one row per mnemonic.
#[rustfmt::skip]
pub const OPCODE_TABLE: [Opcode; 55] = [
    //        imm   zp    zpx   zpy   abs   absx  absy  inx   iny   imp   rel
    op("ADC", [0x69, 0x65, 0x75, 0x00, 0x6D, 0x7D, 0x79, 0x61, 0x71, 0x00, 0x00]),
    op("AND", [0x29, 0x25, 0x35, 0x00, 0x2D, 0x3D, 0x39, 0x21, 0x31, 0x00, 0x00]),
    op("ASL", [0x00, 0x06, 0x16, 0x00, 0x0E, 0x1E, 0x00, 0x00, 0x00, 0x0A, 0x00]),
    op("BIT", [0x00, 0x24, 0x00, 0x00, 0x2C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    op("BPL", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10]),
    op("BMI", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x30]),
    op("BVC", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x50]),
    op("BVS", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x70]),
    op("BCC", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x90]),
    op("BCS", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xB0]),
    op("BNE", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xD0]),
    op("BEQ", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0]),
    op("CMP", [0xC9, 0xC5, 0xD5, 0x00, 0xCD, 0xDD, 0xD9, 0xC1, 0xD1, 0x00, 0x00]),
    op("CPX", [0xE0, 0xE4, 0x00, 0x00, 0xEC, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    op("CPY", [0xC0, 0xC4, 0x00, 0x00, 0xCC, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    op("DEC", [0x00, 0xC6, 0xD6, 0x00, 0xCE, 0xDE, 0x00, 0x00, 0x00, 0x00, 0x00]),
    op("EOR", [0x49, 0x45, 0x55, 0x00, 0x4D, 0x5D, 0x59, 0x41, 0x51, 0x00, 0x00]),
    op("CLC", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x00]),
    op("SEC", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x38, 0x00]),
    op("CLI", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x58, 0x00]),
    op("SEI", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x78, 0x00]),
    op("CLV", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xB8, 0x00]),
    op("CLD", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xD8, 0x00]),
    op("SED", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF8, 0x00]),
    op("INC", [0x00, 0xE6, 0xF6, 0x00, 0xEE, 0xFE, 0x00, 0x00, 0x00, 0x00, 0x00]),
    op("JMP", [0x00, 0x00, 0x00, 0x00, 0x4C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    op("JSR", [0x00, 0x00, 0x00, 0x00, 0x20, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    op("LDA", [0xA9, 0xA5, 0xB5, 0x00, 0xAD, 0xBD, 0xB9, 0xA1, 0xB1, 0x00, 0x00]),
    op("LDX", [0xA2, 0xA6, 0x00, 0xB6, 0xAE, 0x00, 0xBE, 0x00, 0x00, 0x00, 0x00]),
    op("LDY", [0xA0, 0xA4, 0xB4, 0x00, 0xAC, 0xBC, 0x00, 0x00, 0x00, 0x00, 0x00]),
    op("LSR", [0x00, 0x46, 0x56, 0x00, 0x4E, 0x5E, 0x00, 0x00, 0x00, 0x4A, 0x00]),
    op("NOP", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xEA, 0x00]),
    op("ORA", [0x09, 0x05, 0x15, 0x00, 0x0D, 0x1D, 0x19, 0x01, 0x11, 0x00, 0x00]),
    op("TAX", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xAA, 0x00]),
    op("TXA", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x8A, 0x00]),
    op("DEX", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xCA, 0x00]),
    op("INX", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xE8, 0x00]),
    op("TAY", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xA8, 0x00]),
    op("TYA", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x98, 0x00]),
    op("DEY", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x88, 0x00]),
    op("INY", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x00]),
    op("ROR", [0x00, 0x66, 0x76, 0x00, 0x6E, 0x7E, 0x00, 0x00, 0x00, 0x6A, 0x00]),
    op("ROL", [0x00, 0x26, 0x36, 0x00, 0x2E, 0x3E, 0x00, 0x00, 0x00, 0x2A, 0x00]),
    op("RTI", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00]),
    op("RTS", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x60, 0x00]),
    op("SBC", [0xE9, 0xE5, 0xF5, 0x00, 0xED, 0xFD, 0xF9, 0xE1, 0xF1, 0x00, 0x00]),
    op("STA", [0x00, 0x85, 0x95, 0x00, 0x8D, 0x9D, 0x99, 0x81, 0x91, 0x00, 0x00]),
    op("TXS", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x9A, 0x00]),
    op("TSX", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xBA, 0x00]),
    op("PHA", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x48, 0x00]),
    op("PLA", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x68, 0x00]),
    op("PHP", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x08, 0x00]),
    op("PLP", [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x28, 0x00]),
    op("STX", [0x00, 0x86, 0x00, 0x96, 0x8E, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    op("STY", [0x00, 0x84, 0x94, 0x00, 0x8C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
];

/// Look up a mnemonic (already uppercased) in the table.
pub fn lookup(mnemonic: &str) -> Option<&'static Opcode> {
    OPCODE_TABLE.iter().find(|entry| entry.mnemonic == mnemonic)
}

/// Mnemonics that only exist in the implicit column and take no operand.
pub fn is_implied_only(mnemonic: &str) -> bool {
    matches!(
        mnemonic,
        "CLC" | "SEC" | "CLI" | "SEI" | "CLV" | "CLD" | "SED" | "TAX" | "TXA" | "DEX" | "INX"
            | "TAY" | "TYA" | "DEY" | "INY" | "RTI" | "RTS" | "TXS" | "TSX" | "PHA" | "PLA"
            | "PHP" | "PLP" | "NOP"
    )
}

/// Shift/rotate mnemonics whose bare form operates on the accumulator.
pub fn accepts_accumulator(mnemonic: &str) -> bool {
    matches!(mnemonic, "ROL" | "ROR" | "ASL" | "LSR")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::AddressingMode;

    #[test]
    fn lookup_finds_every_row() {
        assert_eq!(OPCODE_TABLE.len(), 55);
        for entry in &OPCODE_TABLE {
            assert_eq!(lookup(entry.mnemonic).unwrap().mnemonic, entry.mnemonic);
        }
        assert!(lookup("XYZ").is_none());
        assert!(lookup("lda").is_none(), "lookup expects uppercase input");
    }

    #[test]
    fn spot_check_standard_encodings() {
        let lda = lookup("LDA").unwrap();
        assert_eq!(lda.code(AddressingMode::Immediate), Some(0xA9));
        assert_eq!(lda.code(AddressingMode::Absolute), Some(0xAD));
        assert_eq!(lda.code(AddressingMode::IndirectY), Some(0xB1));
        assert_eq!(lda.code(AddressingMode::ZeroPageY), None);

        let sta = lookup("STA").unwrap();
        assert_eq!(sta.code(AddressingMode::Immediate), None);
        assert_eq!(sta.code(AddressingMode::Absolute), Some(0x8D));

        let jmp = lookup("JMP").unwrap();
        assert_eq!(jmp.code(AddressingMode::Absolute), Some(0x4C));

        assert_eq!(
            lookup("RTS").unwrap().code(AddressingMode::Implicit),
            Some(0x60)
        );
        assert_eq!(
            lookup("LDX").unwrap().code(AddressingMode::ZeroPageY),
            Some(0xB6)
        );
    }

    #[test]
    fn branches_only_populate_the_relative_column() {
        for mnemonic in ["BPL", "BMI", "BVC", "BVS", "BCC", "BCS", "BNE", "BEQ"] {
            let entry = lookup(mnemonic).unwrap();
            assert!(entry.is_branch());
            for mode in [
                AddressingMode::Immediate,
                AddressingMode::ZeroPage,
                AddressingMode::Absolute,
                AddressingMode::Implicit,
            ] {
                assert_eq!(entry.code(mode), None, "{mnemonic} should be branch-only");
            }
        }
        assert!(!lookup("LDA").unwrap().is_branch());
    }

    #[test]
    fn mnemonic_classes_are_consistent_with_the_table() {
        for entry in &OPCODE_TABLE {
            if is_implied_only(entry.mnemonic) {
                assert!(entry.code(AddressingMode::Implicit).is_some());
                assert!(!entry.is_branch());
            }
            if accepts_accumulator(entry.mnemonic) {
                assert!(entry.code(AddressingMode::Implicit).is_some());
                assert!(entry.code(AddressingMode::ZeroPage).is_some());
            }
        }
    }
}
