//! Grammar-biased fuzz target.
//!
//! Raw byte soup rarely makes it past line classification, so this target
//! spends its entropy on lines that look like real source: mnemonics from
//! the instruction set, the seven directives, label definitions and the
//! operand shapes the encoder classifies. Forward references, charset
//! switches and range errors all get exercised; the only requirement is
//! that nothing panics.

#![no_main]

use asm64::assemble;
use libfuzzer_sys::fuzz_target;

const MNEMONICS: &[&str] = &[
    "LDA", "STA", "LDX", "STX", "LDY", "STY", "ADC", "SBC", "CMP", "AND", "ORA", "EOR", "ASL",
    "LSR", "ROL", "ROR", "INC", "DEC", "BNE", "BEQ", "BCC", "BCS", "BPL", "BMI", "JMP", "JSR",
    "NOP", "RTS", "INX", "DEY", "TAX", "PHA", "BRK", "XYZ",
];

/// Render one operand shape from two bytes of input.
fn operand(select: u8, value: u16) -> String {
    match select % 12 {
        0 => String::new(),
        1 => format!("#${:02X}", value as u8),
        2 => format!("#<L{}", value % 8),
        3 => format!("#>L{}", value % 8),
        4 => format!("${:02X}", value as u8),
        5 => format!("${value:04X}"),
        6 => format!("${value:04X},X"),
        7 => format!("L{},Y", value % 8),
        8 => format!("(${:02X},X)", value as u8),
        9 => format!("(${:02X}),Y", value as u8),
        10 => format!("(L{})", value % 8),
        _ => {
            if value % 2 == 0 {
                format!("*+{}", value % 160)
            } else {
                format!("*-{}", value % 160)
            }
        }
    }
}

/// Render one source line from four bytes of input.
fn line(quad: &[u8]) -> String {
    let value = u16::from_le_bytes([quad[2], quad[3]]);
    match quad[0] % 10 {
        0 => format!("L{}:", quad[1] % 8),
        1 => format!(".pc = ${value:04X}"),
        2 => format!(".byte {}, ${:02X}, %{:b}", quad[1], quad[2], quad[3]),
        3 => format!(".word {value}"),
        4 => [".ascii", ".petscii", ".screen"][quad[1] as usize % 3].to_string(),
        5 => format!(".text \"B{}\\\"Q;\"", quad[1] as char),
        6 => format!(
            "L{}: {} {} ; tail",
            quad[1] % 8,
            MNEMONICS[quad[2] as usize % MNEMONICS.len()],
            operand(quad[3], value)
        ),
        _ => format!(
            "    {} {}",
            MNEMONICS[quad[1] as usize % MNEMONICS.len()],
            operand(quad[2], value)
        ),
    }
}

fuzz_target!(|data: &[u8]| {
    let mut source = String::from(".pc = $1000\n");
    for quad in data.chunks_exact(4) {
        source.push_str(&line(quad));
        source.push('\n');
    }
    // Errors (unresolved Ln labels, bad modes, ranges) are expected;
    // panics are not.
    let _ = assemble(&source);
});
