//! Raw-input fuzz target.
//!
//! Hands the mutator's bytes to the assembler as text, with no shaping.
//! Because emission is rejected until a `.pc` directive, a second run
//! prepends one so inputs that would otherwise die at the order check can
//! reach the directive handler, label recorder and encoder.

#![no_main]

use asm64::assemble;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let source = String::from_utf8_lossy(data);
    let _ = assemble(&source);

    let mut opened = String::with_capacity(source.len() + 12);
    opened.push_str(".pc = $1000\n");
    opened.push_str(&source);
    let _ = assemble(&opened);
});
