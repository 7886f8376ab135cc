//! Command-line front-end: assemble a source file and write each non-empty
//! chunk as a `block-<addr>.prg` file, load address prepended little-endian.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use asm64::{assemble, AssemblyError, MemChunk};

#[derive(Parser, Debug)]
#[command(
    name = "asm64",
    version,
    about = "6502 cross-assembler producing loadable .prg memory blocks",
    long_about = "Assembles 6502 source into one binary block per .pc segment.\n\
                  Each non-empty block is written to block-<addr>.prg with its\n\
                  load address prepended little-endian, C64 style."
)]
struct Cli {
    /// Input assembly source file
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.input) {
        Ok(text) => text,
        Err(err) => {
            println!("File open error: {}: {}", cli.input.display(), err);
            process::exit(1);
        }
    };

    let output = match assemble(&source) {
        Ok(output) => output,
        Err(err) => {
            report_error(&err);
            process::exit(1);
        }
    };

    for (index, chunk) in output.chunks.iter().enumerate() {
        println!("block #{}:", index + 1);
        println!("address = ${:x}", chunk.start_address());
        println!("length = ${:x}", chunk.len());

        if chunk.is_empty() {
            println!();
            continue;
        }

        let file_name = format!("block-{:x}.prg", chunk.start_address());
        println!("filename: {file_name}");
        println!();

        dump_chunk(chunk);
        println!();

        if let Err(err) = write_chunk(&file_name, chunk) {
            println!("Write error: {file_name}: {err}");
            process::exit(1);
        }
    }
}

fn report_error(err: &AssemblyError) {
    println!("Error: {} in line {}", err.message, err.line_number);
    println!("\"{}\"", err.line_content);
    if let Some(hint) = &err.hint {
        println!();
        println!("Hint: {hint}");
    }
}

/// Print the chunk contents, sixteen bytes per row.
fn dump_chunk(chunk: &MemChunk) {
    for (index, byte) in chunk.data().iter().enumerate() {
        print!("{byte:02X} ");
        if index % 16 == 15 {
            println!();
        }
    }
    println!();
}

/// Write a chunk as a .prg file: start address little-endian, then data.
fn write_chunk(file_name: &str, chunk: &MemChunk) -> std::io::Result<()> {
    let mut contents = Vec::with_capacity(chunk.len() + 2);
    contents.push((chunk.start_address() & 0xFF) as u8);
    contents.push((chunk.start_address() >> 8) as u8);
    contents.extend_from_slice(chunk.data());
    fs::write(file_name, contents)
}
