//! Reading textual bytecode into code words.
//!
//! The wire format is a stream of whitespace-separated decimal integers,
//! one opcode or operand word each; line breaks carry no meaning and
//! blank lines are ignored. A token that does not parse as an integer is
//! a reported fault with its line number, never a silently skipped word.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use secd_foundation::{Error, Result};

/// Reads code words from a buffered reader.
pub fn read_words<R: BufRead>(reader: R) -> Result<Vec<i64>> {
    let mut words = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        for token in line.split_whitespace() {
            let word: i64 = token.parse().map_err(|_| {
                Error::parse(format!("expected an integer, found {token:?}"), index + 1)
            })?;
            words.push(word);
        }
    }
    Ok(words)
}

/// Reads code words from a file.
pub fn load_file(path: &Path) -> Result<Vec<i64>> {
    let file = File::open(path)?;
    read_words(BufReader::new(file))
}

/// Reads code words from standard input.
pub fn load_stdin() -> Result<Vec<i64>> {
    let stdin = io::stdin();
    read_words(stdin.lock())
}
