//! Property-based tests for the assembler.
//!
//! These pin down the invariants the encoder must hold:
//! - the three number bases agree on every in-range value
//! - zero-page vs absolute selection follows operand magnitude
//! - branch displacement bytes always decode back to the target
//! - data directives account for every element
//! - arbitrary input never panics

use asm64::assemble;
use proptest::prelude::*;

proptest! {
    /// Hex, decimal and binary immediates produce identical bytes.
    #[test]
    fn prop_number_bases_agree_for_immediates(value in 0u8..=255u8) {
        let hex = assemble(&format!(".pc = $1000\nLDA #${value:02X}")).unwrap();
        let dec = assemble(&format!(".pc = $1000\nLDA #{value}")).unwrap();
        let bin = assemble(&format!(".pc = $1000\nLDA #%{value:08b}")).unwrap();

        prop_assert_eq!(hex.chunks[0].data(), &[0xA9, value]);
        prop_assert_eq!(hex.chunks[0].data(), dec.chunks[0].data());
        prop_assert_eq!(hex.chunks[0].data(), bin.chunks[0].data());
    }

    /// Page-zero operands select zero-page addressing (2 bytes).
    #[test]
    fn prop_zero_page_for_small_operands(addr in 0u8..=255u8) {
        let output = assemble(&format!(".pc = $1000\nLDA ${addr:02X}")).unwrap();
        prop_assert_eq!(output.chunks[0].data(), &[0xA5, addr]);
    }

    /// Operands above $FF select absolute addressing (3 bytes, little-endian).
    #[test]
    fn prop_absolute_for_large_operands(addr in 0x100u16..=0xFFFFu16) {
        let output = assemble(&format!(".pc = $1000\nLDA ${addr:04X}")).unwrap();
        prop_assert_eq!(
            output.chunks[0].data(),
            &[0xAD, (addr & 0xFF) as u8, (addr >> 8) as u8]
        );
    }

    /// Every representable branch displacement round-trips through a
    /// numeric target address.
    #[test]
    fn prop_branch_displacements_round_trip(offset in -128i32..=127i32) {
        let target = (0x1002 + offset) as u16;
        let output = assemble(&format!(".pc = $1000\nBNE ${target:04X}")).unwrap();
        let bytes = output.chunks[0].data();
        prop_assert_eq!(bytes.len(), 2);
        prop_assert_eq!(bytes[0], 0xD0);
        prop_assert_eq!(bytes[1] as i8 as i32, offset);
    }

    /// `#<` and `#>` extract exactly the low and high halves.
    #[test]
    fn prop_low_high_extraction(value in 0u16..=0xFFFFu16) {
        let low = assemble(&format!(".pc = $1000\nLDA #<${value:04X}")).unwrap();
        let high = assemble(&format!(".pc = $1000\nLDA #>${value:04X}")).unwrap();
        prop_assert_eq!(low.chunks[0].data(), &[0xA9, (value & 0xFF) as u8]);
        prop_assert_eq!(high.chunks[0].data(), &[0xA9, (value >> 8) as u8]);
    }

    /// `.byte` emits exactly one byte per element, in order.
    #[test]
    fn prop_byte_directive_accounts_for_every_element(values in proptest::collection::vec(0u8..=255u8, 1..16)) {
        let list = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let output = assemble(&format!(".pc = $1000\n.byte {list}")).unwrap();
        prop_assert_eq!(output.chunks[0].data(), values.as_slice());
    }

    /// `.word` emits each value low byte first.
    #[test]
    fn prop_word_directive_is_little_endian(value in 0u16..=0xFFFFu16) {
        let output = assemble(&format!(".pc = $1000\n.word {value}")).unwrap();
        prop_assert_eq!(
            output.chunks[0].data(),
            &[(value & 0xFF) as u8, (value >> 8) as u8]
        );
    }

    /// The assembler returns a result, never panics, for arbitrary input.
    #[test]
    fn prop_no_panic_on_arbitrary_source(source in "\\PC{0,60}") {
        let _ = assemble(&source);
    }

    /// Same, for inputs biased toward assembler-looking lines.
    #[test]
    fn prop_no_panic_on_assembler_shaped_input(
        mnemonic in "[A-Za-z]{1,4}",
        operand in "[#$%()*,<>A-Za-z0-9_! ]{0,12}",
    ) {
        let source = format!(".pc = $1000\n{mnemonic} {operand}");
        let _ = assemble(&source);
    }
}
