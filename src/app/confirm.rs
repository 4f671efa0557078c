//! Interactive confirmation for mutating verbs.

use std::io::{BufRead, Write};

/// Print `prompt` and read one whitespace-delimited token.
///
/// Returns true only when the token is exactly `y`. Read errors count as no.
pub fn confirm<R, W>(prompt: &str, input: &mut R, output: &mut W) -> bool
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    if write!(output, "{prompt} (y/n) ").and_then(|_| output.flush()).is_err() {
        return false;
    }
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(_) => line.split_whitespace().next() == Some("y"),
        Err(_) => false,
    }
}
