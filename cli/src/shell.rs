use crate::args::Command;
use crate::args::OutputFormat;
use crate::args::ShellLine;
use crate::execute;
use clap::Parser;
use kbnav_core::Navigator;
use std::io::Write as _;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tracing::debug;

const PROMPT: &str = "kbnav> ";

/// What one input line asks the shell to do.
#[derive(Debug)]
enum LineAction {
    Skip,
    Quit,
    Run(Command),
    /// Parse failure or help text, printed verbatim.
    Print(String),
}

fn parse_line(line: &str) -> LineAction {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => LineAction::Skip,
        ["quit"] | ["exit"] => LineAction::Quit,
        _ => match ShellLine::try_parse_from(words) {
            Ok(ShellLine {
                command: Command::Shell,
            }) => LineAction::Print("already in a shell".to_string()),
            Ok(parsed) => LineAction::Run(parsed.command),
            Err(err) => LineAction::Print(err.render().to_string()),
        },
    }
}

/// Reads commands from stdin until EOF or `quit`, sharing one navigator.
pub(crate) async fn run_shell(navigator: &Navigator, format: OutputFormat) -> anyhow::Result<()> {
    if let Err(err) = navigator.initialize().await {
        eprintln!("initial load failed: {err}");
    }
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{PROMPT}");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        match parse_line(&line) {
            LineAction::Skip => {}
            LineAction::Quit => break,
            LineAction::Print(text) => println!("{}", text.trim_end()),
            LineAction::Run(command) => {
                debug!(?command, "shell command");
                match execute(navigator, command).await {
                    Ok(report) => print!("{}", report.render(format)?),
                    Err(err) => eprintln!("error: {err:#}"),
                }
            }
        }
    }
    Ok(())
}
