//! Instruction encoding.
//!
//! The operand is first classified into its syntactic frame (immediate,
//! plain address, indexed, indirect forms), then the core text inside the frame
//! is resolved to a value: a numeric literal, a `*` expression, or a label
//! reference. The frame plus the resolved value select the opcode-table
//! column and the operand bytes.
//!
//! Label references in address frames always encode as absolute (2-byte)
//! operands whether or not the label is known yet; only `#<` and `#>`
//! produce single-byte label operands. This keeps instruction layout
//! independent of definition order, which is what makes the placeholder
//! model sound.

use super::fixups::{PatchKind, PatchSite};
use super::numbers::parse_number;
use super::symbol_table::is_valid_label;
use super::{Assembler, LineError};
use crate::addressing::AddressingMode;
use crate::opcodes::{self, Opcode, JMP_INDIRECT};

/// Which part of an immediate operand's value is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BytePart {
    Full,
    Low,
    High,
}

/// Syntactic shape of an operand; `core` is the text inside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame<'a> {
    Immediate { part: BytePart, core: &'a str },
    Plain { core: &'a str },
    IndexedX { core: &'a str },
    IndexedY { core: &'a str },
    Indirect { core: &'a str },
    IndexedIndirect { core: &'a str },
    IndirectIndexed { core: &'a str },
}

/// A frame core resolved to a concrete operand value.
struct ResolvedValue {
    value: u16,
    /// Absolute encoding required regardless of magnitude (label operands).
    force_absolute: bool,
}

impl Assembler {
    /// Encode `MNE [operand]`; the line is already uppercased and
    /// label-stripped.
    pub(super) fn instruction(&mut self, line: &str, number: u32) -> Result<(), LineError> {
        let (mnemonic, operand) =
            split_mnemonic(line).ok_or_else(|| LineError::syntax("Syntax error"))?;

        // Emission before the first .pc is rejected ahead of mnemonic
        // validation.
        self.require_chunk()?;

        let opcode = opcodes::lookup(mnemonic)
            .ok_or_else(|| LineError::unknown(format!("Unknown instruction {mnemonic}")))?;

        if opcodes::is_implied_only(mnemonic) {
            if !operand.is_empty() {
                return Err(LineError::mismatch("Unknown instruction")
                    .with_hint("This instruction is not supposed to have an operand."));
            }
            return self.emit_byte(opcode.codes[AddressingMode::Implicit.column()]);
        }

        if operand.is_empty() {
            if opcodes::accepts_accumulator(mnemonic) {
                return self.emit_byte(opcode.codes[AddressingMode::Implicit.column()]);
            }
            return Err(LineError::mismatch("Unknown instruction"));
        }

        self.encode_addressed(opcode, operand, number)
    }

    fn encode_addressed(
        &mut self,
        opcode: &Opcode,
        operand: &str,
        number: u32,
    ) -> Result<(), LineError> {
        let frame = classify_frame(operand)
            .ok_or_else(|| LineError::mismatch("Unknown instruction"))?;

        match frame {
            Frame::Immediate { part, core } => {
                let value = self.immediate_value(part, core, operand, number)?;
                let code = self.mode_code(opcode, AddressingMode::Immediate)?;
                self.emit_byte(code)?;
                self.emit_byte(value)
            }

            Frame::Plain { core } => {
                let resolved = self.resolve_address(opcode, core, operand, number, true)?;
                if opcode.is_branch() {
                    return self.encode_branch(opcode, resolved.value);
                }
                if resolved.value < 0x100 && !resolved.force_absolute {
                    let code = self.mode_code(opcode, AddressingMode::ZeroPage)?;
                    self.emit_byte(code)?;
                    self.emit_byte(resolved.value as u8)
                } else {
                    let code = self.mode_code(opcode, AddressingMode::Absolute)?;
                    self.emit_byte(code)?;
                    self.emit_word(resolved.value)
                }
            }

            Frame::IndexedX { core } => {
                let resolved = self.resolve_address(opcode, core, operand, number, false)?;
                self.encode_indexed(
                    opcode,
                    resolved,
                    AddressingMode::ZeroPageX,
                    AddressingMode::AbsoluteX,
                )
            }

            Frame::IndexedY { core } => {
                let resolved = self.resolve_address(opcode, core, operand, number, false)?;
                self.encode_indexed(
                    opcode,
                    resolved,
                    AddressingMode::ZeroPageY,
                    AddressingMode::AbsoluteY,
                )
            }

            Frame::Indirect { core } => {
                // Plain indirect is only ever JMP ($addr); the byte is fixed.
                let resolved = self.resolve_address(opcode, core, operand, number, false)?;
                self.emit_byte(JMP_INDIRECT)?;
                self.emit_word(resolved.value)
            }

            Frame::IndexedIndirect { core } => {
                let value = self.page_zero_value(core, operand)?;
                let code = self.mode_code(opcode, AddressingMode::IndirectX)?;
                self.emit_byte(code)?;
                self.emit_byte(value)
            }

            Frame::IndirectIndexed { core } => {
                let value = self.page_zero_value(core, operand)?;
                let code = self.mode_code(opcode, AddressingMode::IndirectY)?;
                self.emit_byte(code)?;
                self.emit_byte(value)
            }
        }
    }

    /// Opcode byte for `mode`, or the mismatch error used wherever the
    /// mnemonic lacks the inferred mode.
    fn mode_code(&self, opcode: &Opcode, mode: AddressingMode) -> Result<u8, LineError> {
        opcode
            .code(mode)
            .ok_or_else(|| LineError::mismatch("Unknown instruction"))
    }

    fn encode_branch(&mut self, opcode: &Opcode, target: u16) -> Result<(), LineError> {
        let offset = target as i32 - (self.pc as i32 + 2);
        if !(-128..=127).contains(&offset) {
            return Err(LineError::range("Branch out of range")
                .with_hint("You can only jump +/-127 bytes with a branch instruction."));
        }
        let code = opcode.codes[AddressingMode::Relative.column()];
        self.emit_byte(code)?;
        self.emit_byte(offset as i8 as u8)
    }

    fn encode_indexed(
        &mut self,
        opcode: &Opcode,
        resolved: ResolvedValue,
        zero_page: AddressingMode,
        absolute: AddressingMode,
    ) -> Result<(), LineError> {
        let use_zero_page = resolved.value < 0x100
            && !resolved.force_absolute
            && opcode.code(zero_page).is_some();
        if use_zero_page {
            let code = opcode.codes[zero_page.column()];
            self.emit_byte(code)?;
            self.emit_byte(resolved.value as u8)
        } else {
            let code = self.mode_code(opcode, absolute)?;
            self.emit_byte(code)?;
            self.emit_word(resolved.value)
        }
    }

    /// Resolve an immediate core to the byte that will be emitted.
    fn immediate_value(
        &mut self,
        part: BytePart,
        core: &str,
        operand: &str,
        number: u32,
    ) -> Result<u8, LineError> {
        if is_valid_label(core) {
            let kind = match part {
                // A plain `#LABEL` forward reference patches as the low byte;
                // label addresses only fit an immediate via `#<`/`#>` anyway.
                BytePart::Full | BytePart::Low => PatchKind::Low8,
                BytePart::High => PatchKind::High8,
            };
            let (address, pending) = self.label_operand(core, kind, number);
            if pending {
                return Ok(match kind {
                    PatchKind::High8 => (address >> 8) as u8,
                    _ => (address & 0xFF) as u8,
                });
            }
            return extract_immediate(address as u32, part, operand);
        }

        let value = parse_number(core)
            .ok_or_else(|| LineError::syntax(format!("Invalid number type: {operand}")))?;
        extract_immediate(value, part, operand)
    }

    /// Resolve an address-frame core: number, `*` expression (plain frame
    /// only), or label reference.
    fn resolve_address(
        &mut self,
        opcode: &Opcode,
        core: &str,
        operand: &str,
        number: u32,
        allow_star: bool,
    ) -> Result<ResolvedValue, LineError> {
        if is_valid_label(core) {
            let kind = if opcode.is_branch() {
                PatchKind::BranchRel8
            } else {
                PatchKind::Abs16
            };
            let (value, _pending) = self.label_operand(core, kind, number);
            return Ok(ResolvedValue {
                value,
                force_absolute: true,
            });
        }

        if allow_star {
            if let Some(rest) = core.strip_prefix('*') {
                return Ok(ResolvedValue {
                    value: self.star_expression(rest.trim_start())?,
                    force_absolute: false,
                });
            }
        }

        let value = parse_number(core)
            .ok_or_else(|| LineError::syntax(format!("Invalid number type: {operand}")))?;
        if value > 0xFFFF {
            return Err(LineError::range(format!(
                "Value out of range ({value}/${value:x}): {operand}"
            ))
            .with_hint("Address value must fall between 0 and 65535/$ffff."));
        }
        Ok(ResolvedValue {
            value: value as u16,
            force_absolute: false,
        })
    }

    /// `*`, `*+N` or `*-N` with decimal N, relative to the current pc.
    fn star_expression(&self, rest: &str) -> Result<u16, LineError> {
        if rest.is_empty() {
            return Ok(self.pc);
        }
        let invalid = || LineError::syntax(format!("Invalid number type: *{rest}"));
        let (negative, digits) = if let Some(digits) = rest.strip_prefix('+') {
            (false, digits.trim_start())
        } else if let Some(digits) = rest.strip_prefix('-') {
            (true, digits.trim_start())
        } else {
            return Err(invalid());
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let distance: u32 = digits.parse().map_err(|_| invalid())?;
        if distance > 127 {
            return Err(LineError::range("Branch out of range")
                .with_hint("You can only jump +/-127 bytes with a branch instruction."));
        }
        if negative {
            Ok(self.pc.wrapping_sub(distance as u16))
        } else {
            Ok(self.pc.wrapping_add(distance as u16))
        }
    }

    /// Core of a `($nn,X)` / `($nn),Y` frame: a number that fits one page.
    fn page_zero_value(&self, core: &str, operand: &str) -> Result<u8, LineError> {
        let value = parse_number(core)
            .ok_or_else(|| LineError::syntax(format!("Invalid number type: {operand}")))?;
        if value > 0xFF {
            return Err(
                LineError::range(format!("Address out of range: {operand}"))
                    .with_hint("Address must fall between $0 and $FF."),
            );
        }
        Ok(value as u8)
    }

    /// Look up a label operand, recording a patch site when it is not yet
    /// defined. Returns the address (the current pc as placeholder for
    /// pending references) and whether a site was recorded.
    fn label_operand(&mut self, name: &str, kind: PatchKind, line: u32) -> (u16, bool) {
        if let Some(address) = self.symbols.lookup(name) {
            return (address, false);
        }
        self.fixups.record(
            name,
            PatchSite {
                chunk: self.chunks.len(),
                address: self.pc.wrapping_add(1),
                kind,
                line,
            },
        );
        (self.pc, true)
    }
}

/// Extract the emitted byte from a resolved immediate value, range-checked.
fn extract_immediate(value: u32, part: BytePart, operand: &str) -> Result<u8, LineError> {
    let selected = match part {
        BytePart::Full => value,
        BytePart::Low => value & 0xFF,
        BytePart::High => (value & 0xFF00) >> 8,
    };
    if selected > 0xFF {
        return Err(LineError::range(format!(
            "Value out of range ({selected}/${selected:x}): {operand}"
        ))
        .with_hint("Value must fall between 0 and 255/$ff."));
    }
    Ok(selected as u8)
}

/// Split `MNE [operand]`: exactly three letters, then optional operand text.
fn split_mnemonic(line: &str) -> Option<(&str, &str)> {
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    if head.len() == 3 && head.bytes().all(|b| b.is_ascii_alphabetic()) {
        Some((head, rest))
    } else {
        None
    }
}

/// Classify the syntactic frame of an operand. Returns `None` for shapes
/// that match no addressing mode.
fn classify_frame(operand: &str) -> Option<Frame<'_>> {
    if let Some(rest) = operand.strip_prefix('#') {
        let rest = rest.trim_start();
        if let Some(core) = rest.strip_prefix('<') {
            return Some(Frame::Immediate {
                part: BytePart::Low,
                core: core.trim_start(),
            });
        }
        if let Some(core) = rest.strip_prefix('>') {
            return Some(Frame::Immediate {
                part: BytePart::High,
                core: core.trim_start(),
            });
        }
        return Some(Frame::Immediate {
            part: BytePart::Full,
            core: rest,
        });
    }

    if let Some(body) = operand.strip_prefix('(') {
        let close = body.find(')')?;
        let inside = body[..close].trim();
        let after = body[close + 1..].trim();

        if after.is_empty() {
            return match split_index(inside) {
                Some((core, "X")) => Some(Frame::IndexedIndirect { core }),
                Some(_) => None,
                None => Some(Frame::Indirect { core: inside }),
            };
        }
        let index = after.strip_prefix(',')?.trim();
        if index == "Y" && !inside.contains(',') {
            return Some(Frame::IndirectIndexed { core: inside });
        }
        return None;
    }

    match split_index(operand) {
        Some((core, "X")) => Some(Frame::IndexedX { core }),
        Some((core, "Y")) => Some(Frame::IndexedY { core }),
        Some(_) => None,
        None => Some(Frame::Plain { core: operand }),
    }
}

/// Split `core , INDEX` on the last comma; both halves trimmed.
fn split_index(text: &str) -> Option<(&str, &str)> {
    let (core, index) = text.rsplit_once(',')?;
    Some((core.trim(), index.trim()))
}
