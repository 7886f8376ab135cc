//! Directive handling: `.pc`, `.byte`, `.word`, `.text` and the charset
//! switches.
//!
//! Comments are stripped before `.pc`/`.byte`/`.word` parse their arguments.
//! `.text` keeps the raw line because a `;` may legitimately appear inside
//! the string literal; its grammar requires the closing quote to end the
//! line instead.

use super::{numbers::parse_number, strip_comment, Assembler, LineError};
use crate::charset::Charset;
use crate::chunk::MemChunk;

/// Width of a `.byte` / `.word` data element.
#[derive(Clone, Copy, PartialEq, Eq)]
enum DataWidth {
    Byte,
    Word,
}

impl Assembler {
    /// Process a line that starts with `.`.
    pub(super) fn directive(&mut self, line: &str) -> Result<(), LineError> {
        let keyword: String = line[1..]
            .chars()
            .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
            .collect();
        if keyword.is_empty() {
            return Err(LineError::syntax("Syntax error").with_hint(
                "'.' must be followed by a valid keyword.\n\
                 Valid keywords are: .pc, .byte, .word, .text, .ascii, .petscii, .screen",
            ));
        }
        let rest = &line[1 + keyword.len()..];

        match keyword.to_ascii_lowercase().as_str() {
            "text" => self.text_directive(rest),
            "ascii" => {
                self.charset = Charset::Ascii;
                Ok(())
            }
            "petscii" => {
                self.charset = Charset::Petscii;
                Ok(())
            }
            "screen" => {
                self.charset = Charset::Screen;
                Ok(())
            }
            "pc" => self.pc_directive(strip_comment(rest).trim()),
            "byte" => self.data_directive(strip_comment(rest).trim(), DataWidth::Byte),
            "word" => self.data_directive(strip_comment(rest).trim(), DataWidth::Word),
            other => Err(LineError::syntax(format!(
                "Unrecognized directive '.{other}'"
            ))
            .with_hint(
                "Recognized keywords: .pc, .byte, .word, .text, .ascii, .petscii, .screen",
            )),
        }
    }

    /// `.pc = $HHHH`: close the current chunk (if any) and open a new one.
    fn pc_directive(&mut self, args: &str) -> Result<(), LineError> {
        let bad_format = || {
            LineError::syntax("Syntax error").with_hint(
                "Correct .pc format: .pc = $ADDR, where ADDR is a hexadecimal number \
                 between 0 and FFFF. White space is allowed around the equal sign.",
            )
        };

        let digits = args
            .strip_prefix('=')
            .map(str::trim)
            .and_then(|value| value.strip_prefix('$'))
            .ok_or_else(bad_format)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad_format());
        }

        let address = u32::from_str_radix(digits, 16).unwrap_or(u32::MAX);
        if address > 0xFFFF {
            return Err(LineError::range(format!("Address out of range: ${digits}"))
                .with_hint("Address must be in range $0-$FFFF."));
        }

        self.pc = address as u16;
        if let Some(mut chunk) = self.current.take() {
            chunk.finalize();
            self.chunks.push(chunk);
        }
        self.current = Some(MemChunk::new(self.pc));
        Ok(())
    }

    /// `.byte v1, v2, ...` / `.word v1, v2, ...`.
    fn data_directive(&mut self, args: &str, width: DataWidth) -> Result<(), LineError> {
        let format_error = || {
            let formats = match width {
                DataWidth::Byte => {
                    "Values may be decimal (0-255), hexadecimal ($0-$FF) or binary \
                     (%0-%11111111), separated by commas."
                }
                DataWidth::Word => {
                    "Values may be decimal (0-65535), hexadecimal ($0-$FFFF) or binary \
                     (%0-%1111111111111111), separated by commas."
                }
            };
            LineError::syntax("Invalid number format").with_hint(formats)
        };

        if args.is_empty() {
            return Err(format_error());
        }

        let mut values = Vec::new();
        for element in args.split(',') {
            let element = element.trim();
            let value = parse_number(element).ok_or_else(format_error)?;
            values.push((value, element));
        }

        self.require_chunk()?;

        for (value, element) in values {
            match width {
                DataWidth::Byte => {
                    if value > 0xFF {
                        return Err(LineError::range(format!("Value out of range: {element}"))
                            .with_hint("Value must fit into 8 bits. $0-$FF or 0-255 or %0-%11111111."));
                    }
                    self.emit_byte(value as u8)?;
                }
                DataWidth::Word => {
                    if value > 0xFFFF {
                        return Err(LineError::range(format!("Value out of range: {element}"))
                            .with_hint(
                                "Value must fit into 16 bits. $0-$FFFF or 0-65535 or \
                                 %0-%1111111111111111.",
                            ));
                    }
                    self.emit_word(value as u16)?;
                }
            }
        }
        Ok(())
    }

    /// `.text "..."`: translate the literal through the active charset.
    fn text_directive(&mut self, rest: &str) -> Result<(), LineError> {
        let bad_format = || {
            LineError::syntax("Syntax error").with_hint(
                "Valid syntax for .text directive: .text \"your text here\"\n\
                 Quotation marks inside the string must be escaped as \\\".\n\
                 Note: comments are not allowed after a .text directive.",
            )
        };

        // The keyword must be followed by whitespace, then a quoted literal
        // that runs to the end of the line.
        if !rest.starts_with(|ch: char| ch.is_whitespace()) {
            return Err(bad_format());
        }
        let body = rest.trim_start();
        if body.len() < 2 || !body.starts_with('"') || !body.ends_with('"') {
            return Err(bad_format());
        }
        let literal = &body[1..body.len() - 1];

        let mut decoded = String::with_capacity(literal.len());
        let mut chars = literal.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some('"') => decoded.push('"'),
                    Some('\\') => decoded.push('\\'),
                    _ => {
                        return Err(LineError::syntax("Syntax error")
                            .with_hint("Unrecognized use of backslash character."))
                    }
                },
                '"' => {
                    return Err(LineError::syntax("Syntax error").with_hint(
                        "Only one string per line is allowed. Additional quotation marks \
                         must be escaped with a backslash character.",
                    ))
                }
                _ => decoded.push(ch),
            }
        }

        self.require_chunk()?;
        let charset = self.charset;
        for ch in decoded.chars() {
            self.emit_byte(charset.encode(ch))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::assembler::{assemble, ErrorKind};

    #[test]
    fn pc_opens_and_rolls_chunks() {
        let output = assemble(".pc = $1000\nNOP\n.pc = $2000\nNOP").unwrap();
        assert_eq!(output.chunks.len(), 2);
        assert_eq!(output.chunks[0].start_address(), 0x1000);
        assert_eq!(output.chunks[1].start_address(), 0x2000);
        assert_eq!(output.chunks[0].data(), &[0xEA]);
        assert_eq!(output.chunks[1].data(), &[0xEA]);
    }

    #[test]
    fn pc_accepts_flexible_spacing_and_case() {
        for source in [".pc = $1000\nNOP", ".PC=$1000\nNOP", "  .pc =  $1000\nNOP"] {
            let output = assemble(source).unwrap();
            assert_eq!(output.chunks[0].start_address(), 0x1000);
        }
    }

    #[test]
    fn pc_rejects_out_of_range_and_malformed_addresses() {
        let err = assemble(".pc = $10000").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Range);

        for source in [".pc", ".pc = 1000", ".pc $1000", ".pc = $XYZ"] {
            let err = assemble(source).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Syntax, "source: {source}");
        }
    }

    #[test]
    fn byte_emits_all_three_bases() {
        let output = assemble(".pc = $1000\n.byte 1, $02, %11").unwrap();
        assert_eq!(output.chunks[0].data(), &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn word_emits_little_endian_pairs() {
        let output = assemble(".pc = $1000\n.word $1234, 65535, %1").unwrap();
        assert_eq!(output.chunks[0].data(), &[0x34, 0x12, 0xFF, 0xFF, 0x01, 0x00]);
    }

    #[test]
    fn data_values_are_range_checked() {
        let err = assemble(".pc = $1000\n.byte 256").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Range);

        let err = assemble(".pc = $1000\n.word $10000").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Range);
    }

    #[test]
    fn data_rejects_malformed_lists() {
        for source in [
            ".pc = $1000\n.byte",
            ".pc = $1000\n.byte 1,,2",
            ".pc = $1000\n.byte 1, 2,",
            ".pc = $1000\n.byte $GG",
        ] {
            let err = assemble(source).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Syntax, "source: {source}");
        }
    }

    #[test]
    fn data_before_pc_is_an_order_error() {
        let err = assemble(".byte 1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Order);
    }

    #[test]
    fn text_translates_through_the_active_charset() {
        let output = assemble(".pc = $1000\n.text \"HELLO\"").unwrap();
        assert_eq!(output.chunks[0].data(), &[0x48, 0x45, 0x4C, 0x4C, 0x4F]);

        let output = assemble(".pc = $1000\n.petscii\n.text \"HELLO\"").unwrap();
        assert_eq!(output.chunks[0].data(), &[0x68, 0x65, 0x6C, 0x6C, 0x6F]);

        let output = assemble(".pc = $1000\n.screen\n.text \"hello\"").unwrap();
        assert_eq!(output.chunks[0].data(), &[0x08, 0x05, 0x0C, 0x0C, 0x0F]);
    }

    #[test]
    fn text_keeps_semicolons_and_decodes_escapes() {
        let output = assemble(".pc = $1000\n.text \"a;b\"").unwrap();
        assert_eq!(output.chunks[0].data(), &[0x61, 0x3B, 0x62]);

        let output = assemble(".pc = $1000\n.text \"a\\\"b\\\\c\"").unwrap();
        assert_eq!(output.chunks[0].data(), &[0x61, 0x22, 0x62, 0x5C, 0x63]);
    }

    #[test]
    fn text_rejects_bad_escapes_and_stray_quotes() {
        let err = assemble(".pc = $1000\n.text \"a\\nb\"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);

        let err = assemble(".pc = $1000\n.text \"a\"b\"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);

        let err = assemble(".pc = $1000\n.text nope").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn charset_switch_applies_to_later_text_only() {
        let output = assemble(
            ".pc = $1000\n.text \"A\"\n.petscii\n.text \"A\"\n.ascii\n.text \"A\"",
        )
        .unwrap();
        assert_eq!(output.chunks[0].data(), &[0x41, 0x61, 0x41]);
    }

    #[test]
    fn unrecognized_directive_is_reported() {
        let err = assemble(".pc = $1000\n.origin $2000").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains(".origin"));
        assert!(err.hint.is_some());

        // The whole keyword token is reported, underscores included.
        let err = assemble(".pc = $1000\n.FOO_BAR 1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains(".foo_bar"), "message: {}", err.message);
    }
}
