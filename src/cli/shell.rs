//! Line-oriented interactive shell.
//!
//! Each input line is split on whitespace and parsed with the same clap
//! command tree as the one-shot CLI, plus `exit`/`quit`. Errors are printed
//! and the shell carries on; only `exit`, `quit` or end of input ends it.

use std::io::{BufRead, Write};

use clap::{ColorChoice, Parser, Subcommand};

use crate::app::{AppContext, ErrorClass, Result};
use crate::cli::commands::{self, Session};
use crate::cli::Command;
use crate::workflow::LineConfirm;

pub const PROMPT: &str = "> ";

#[derive(Parser, Debug)]
#[command(
    name = "brief",
    no_binary_name = true,
    disable_version_flag = true,
    color = ColorChoice::Never
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    #[command(flatten)]
    Run(Command),
    /// Leave the shell
    #[command(visible_alias = "quit")]
    Exit,
}

/// What the shell does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell<'a, R, W> {
    ctx: &'a AppContext,
    session: Session,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(ctx: &'a AppContext, input: R, out: W) -> Self {
        Self {
            session: Session::new(&ctx.config),
            ctx,
            input,
            out,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until `exit`, `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.out, "Welcome to brief - RSS/Article Reader with TTS")?;
        writeln!(self.out, "Type `help` for commands and `exit` to leave")?;

        loop {
            write!(self.out, "{}", PROMPT)?;
            self.out.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.out)?;
                break;
            }

            if self.run_line(&line).await? == Flow::Exit {
                break;
            }
        }

        writeln!(self.out, "Goodbye!")?;
        Ok(())
    }

    /// Parse and execute one line. Command failures are reported on the
    /// output; only failures writing to it are returned.
    pub async fn run_line(&mut self, line: &str) -> Result<Flow> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => match parsed.command {
                ShellCommand::Exit => return Ok(Flow::Exit),
                ShellCommand::Run(command) => command,
            },
            Err(e) => {
                // Covers `help` and `--help` as well as usage errors.
                write!(self.out, "{}", e)?;
                return Ok(Flow::Continue);
            }
        };

        tracing::debug!("Running {:?}", command);
        let result = commands::execute(
            self.ctx,
            &mut self.session,
            command,
            &mut LineConfirm(&mut self.input),
            &mut self.out,
        )
        .await;

        if let Err(e) = result {
            match e.class() {
                ErrorClass::Storage => tracing::error!("Command failed: {}", e),
                _ => tracing::info!("Command rejected: {}", e),
            }
            writeln!(self.out, "Error: {}", e)?;
        }

        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ArticleCommand, FeedCommand};

    fn parse(line: &str) -> std::result::Result<ShellCommand, clap::Error> {
        let words: Vec<&str> = line.split_whitespace().collect();
        ShellLine::try_parse_from(words).map(|l| l.command)
    }

    #[test]
    fn test_shell_line_is_consistent() {
        use clap::CommandFactory;
        ShellLine::command().debug_assert();
    }

    #[test]
    fn test_parse_exit_and_quit() {
        assert!(matches!(parse("exit").unwrap(), ShellCommand::Exit));
        assert!(matches!(parse("quit").unwrap(), ShellCommand::Exit));
    }

    #[test]
    fn test_parse_shared_commands() {
        match parse("rss delete 1-3 *").unwrap() {
            ShellCommand::Run(Command::Feed(FeedCommand::Delete { selection, yes })) => {
                assert_eq!(selection, vec!["1-3", "*"]);
                assert!(!yes);
            }
            other => panic!("unexpected {:?}", other),
        }

        match parse("article set-speed 1.5").unwrap() {
            ShellCommand::Run(Command::Article(ArticleCommand::SetSpeed { value })) => {
                assert_eq!(value, "1.5");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_help_is_an_error_to_render() {
        let err = parse("help").unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(err.to_string().contains("article"));
    }

    #[test]
    fn test_unknown_verb() {
        assert!(parse("article frobnicate").is_err());
    }
}
