use std::io::BufRead;

use crate::app::Result;

/// Answers a yes/no question the caller has already printed.
pub trait Confirm {
    fn confirm(&mut self) -> Result<bool>;
}

/// Reads the answer as a line of input. Only `y`/`yes` count as agreement;
/// end of input declines.
pub struct LineConfirm<R>(pub R);

impl<R: BufRead> Confirm for LineConfirm<R> {
    fn confirm(&mut self) -> Result<bool> {
        let mut line = String::new();
        if self.0.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        let answer = line.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

/// Fixed answer, for `--yes` and non-interactive use.
pub struct AlwaysConfirm(pub bool);

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self) -> Result<bool> {
        Ok(self.0)
    }
}
