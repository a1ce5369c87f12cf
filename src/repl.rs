//! Line-oriented operator console driving one engine session.

use std::str::FromStr;

use ifu_engine::{Escalation, IfuBackend, IfuEngine, Operation, Outcome, SearchMode, VoteDirection};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan(String),
    Search(String),
    Ask(String),
    Chat(String),
    Vote(VoteDirection),
    Votes,
    Clear,
    Context,
    Health,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`, type `help`")]
    Unknown(String),
    #[error("usage: vote up|down")]
    VoteUsage,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map(|(n, r)| (n, r.trim()))
            .unwrap_or((line, ""));

        // Empty arguments are passed on; the engine decides what that means.
        Ok(match name.to_ascii_lowercase().as_str() {
            "scan" => Command::Scan(rest.to_string()),
            "search" | "s" => Command::Search(rest.to_string()),
            "ask" | "a" => Command::Ask(rest.to_string()),
            "chat" => Command::Chat(rest.to_string()),
            "vote" => Command::Vote(rest.parse().map_err(|_| CommandError::VoteUsage)?),
            "votes" => Command::Votes,
            "clear" => Command::Clear,
            "context" | "ctx" => Command::Context,
            "health" => Command::Health,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        })
    }
}

pub const HELP: &str = "\
commands:
  scan <code>        interpret a scanned code and set the device context
  search <keyword>   keyword search in the current IFU
  ask <question>     ask a question about the current IFU
  chat <question>    free-form question to the assistant
  vote up|down       rate the current answer
  votes              show the helpful/not helpful tally
  context            show the current device
  clear              forget device and results
  health             probe the backend
  quit";

/// Reads commands from stdin until EOF or `quit`.
pub async fn run<B: IfuBackend>(engine: &IfuEngine<B>) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", render::banner());

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(cmd) => execute(engine, cmd).await,
            Err(e) => println!("{}", render::notice(&e.to_string())),
        }
    }
    Ok(())
}

async fn execute<B: IfuBackend>(engine: &IfuEngine<B>, cmd: Command) {
    match cmd {
        Command::Scan(raw) => match engine.scan(&raw).await {
            Ok(Some(identity)) => {
                println!("{}", render::identity(&identity));
                show_tally(engine).await;
            }
            Ok(None) => debug!("scan result superseded"),
            Err(e) => escalate(engine, Operation::Scan, Outcome::Failed(&e)),
        },
        Command::Search(keyword) => search(engine, &keyword, SearchMode::Search).await,
        Command::Ask(question) => search(engine, &question, SearchMode::Ask).await,
        Command::Chat(text) => match engine.chat(&text, None).await {
            Ok(answer) if answer.trim().is_empty() => {
                escalate(engine, Operation::Chat, Outcome::Empty)
            }
            Ok(answer) => println!("{}", render::answer(&answer)),
            Err(e) => escalate(engine, Operation::Chat, Outcome::Failed(&e)),
        },
        Command::Vote(direction) => match engine.vote(direction).await {
            Ok(tally) => println!("{}", render::tally(&tally)),
            Err(e) => escalate(engine, Operation::VoteSubmit, Outcome::Failed(&e)),
        },
        Command::Votes => show_tally(engine).await,
        Command::Clear => {
            engine.clear();
            println!("{}", render::notice("context cleared"));
        }
        Command::Context => println!("{}", render::identity(&engine.context())),
        Command::Health => println!("{}", render::health(&engine.health().await)),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

async fn search<B: IfuBackend>(engine: &IfuEngine<B>, keyword: &str, mode: SearchMode) {
    match engine.search(keyword, mode).await {
        Ok(Some(board)) if board.items.is_empty() => {
            escalate(engine, Operation::Search(mode), Outcome::Empty)
        }
        Ok(Some(board)) => println!("{}", render::board(&board)),
        Ok(None) => debug!("search result superseded"),
        Err(e) => escalate(engine, Operation::Search(mode), Outcome::Failed(&e)),
    }
}

async fn show_tally<B: IfuBackend>(engine: &IfuEngine<B>) {
    match engine.fetch_votes().await {
        Ok(tally) => println!("{}", render::tally(&tally)),
        Err(e) => escalate(engine, Operation::VoteFetch, Outcome::Failed(&e)),
    }
}

fn escalate<B: IfuBackend>(engine: &IfuEngine<B>, op: Operation, outcome: Outcome<'_>) {
    let escalation: Escalation = engine.escalate(op, outcome);
    if let Some(text) = render::escalation(&escalation) {
        println!("{text}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_take_the_rest_of_the_line() {
        assert_eq!(
            "scan  {\"model\": \"Vista 300\"} ".parse::<Command>(),
            Ok(Command::Scan("{\"model\": \"Vista 300\"}".into()))
        );
        assert_eq!(
            "ASK why is it beeping?".parse::<Command>(),
            Ok(Command::Ask("why is it beeping?".into()))
        );
        assert_eq!("search".parse::<Command>(), Ok(Command::Search(String::new())));
    }

    #[test]
    fn vote_requires_a_direction() {
        assert_eq!("vote up".parse::<Command>(), Ok(Command::Vote(VoteDirection::Up)));
        assert_eq!("vote".parse::<Command>(), Err(CommandError::VoteUsage));
        assert_eq!("vote sideways".parse::<Command>(), Err(CommandError::VoteUsage));
    }

    #[test]
    fn aliases_and_unknowns() {
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
        assert_eq!("ctx".parse::<Command>(), Ok(Command::Context));
        assert_eq!(
            "grep x".parse::<Command>(),
            Err(CommandError::Unknown("grep".into()))
        );
    }
}
