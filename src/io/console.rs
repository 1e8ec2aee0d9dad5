use std::io::{self, BufRead, Write};

use crate::io::{ServiceError, ServiceResult};

/// Line-oriented text input and output.
pub trait Console {
    /// Writes `text` followed by a line break.
    fn write_line(&mut self, text: &str) -> ServiceResult<()>;

    /// Writes `text` without a line break, such as a prompt.
    fn write(&mut self, text: &str) -> ServiceResult<()>;

    /// Reads one line without its line end, or `None` at end of input.
    fn read_line(&mut self) -> ServiceResult<Option<String>>;
}

/// The process's standard input and output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write_line(&mut self, text: &str) -> ServiceResult<()> {
        writeln!(io::stdout(), "{text}").map_err(ServiceError::Output)
    }

    fn write(&mut self, text: &str) -> ServiceResult<()> {
        let mut stdout = io::stdout();
        write!(stdout, "{text}").and_then(|()| stdout.flush()).map_err(ServiceError::Output)
    }

    fn read_line(&mut self) -> ServiceResult<Option<String>> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line).map_err(ServiceError::Output)?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}
