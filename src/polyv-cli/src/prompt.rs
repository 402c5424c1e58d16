//! Strict Yes/No terminal prompts.
//!
//! Invalid input re-prompts; the loop only ends on a valid answer or EOF.

use std::io::{self, BufRead, Write};

/// Ask a Yes/Y/No/N question on stdin/stdout.
pub fn prompt_yes_no(question: &str) -> io::Result<bool> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    ask(&mut stdin.lock(), &mut stdout, question)
}

/// Prompt loop over arbitrary reader/writer, so tests can drive it.
pub fn ask<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
) -> io::Result<bool> {
    loop {
        write!(writer, "{question} (Yes/Y or No/N): ")?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before a valid answer",
            ));
        }

        match line.trim().to_lowercase().as_str() {
            "yes" | "y" => return Ok(true),
            "no" | "n" => return Ok(false),
            _ => {
                writeln!(writer, "Response not understood. Please answer with Yes/Y or No/N.")?;
            }
        }
    }
}
