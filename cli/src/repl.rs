use std::io::{self, Write};

const PROMPT: &str = "bulwark> ";

/// Read one line from stdin after printing the prompt.
/// Returns `None` at end of input.
pub fn readline() -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{PROMPT}")?;
    stdout.flush()?;

    let mut buffer = String::new();
    let read = io::stdin().read_line(&mut buffer)?;
    Ok((read > 0).then_some(buffer))
}
