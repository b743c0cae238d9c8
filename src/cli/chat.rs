use std::sync::Arc;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::{DefaultEditor, Editor, Helper};

use crate::ai::chat::models::{ChatMessage, MessageId, Role};
use crate::ai::chat::{Chat, ChatOutcome, Rejection};
use crate::ai::relay::{Relay, RelayConfig};
use crate::core::{AppConfig, logging};

const HELP: &str = "\
Commands:
  /list         show the conversation with message ids
  /edit <id>    rewrite one of your messages and get a fresh reply
  /cancel       stop editing
  /delete <id>  remove a message
  /help         show this help
  /quit         exit
Anything else is sent as a message.";

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Message(&'a str),
    List,
    Edit(MessageId),
    Cancel,
    Delete(MessageId),
    Help,
    Quit,
    Invalid(String),
}

fn parse_id(arg: Option<&str>, usage: &str) -> Result<MessageId, String> {
    arg.and_then(|s| s.parse().ok())
        .map(MessageId)
        .ok_or_else(|| format!("Usage: {}", usage))
}

fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::Message(line);
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();
    match name {
        "list" => Input::List,
        "cancel" => Input::Cancel,
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        "edit" => parse_id(arg, "/edit <id>").map_or_else(Input::Invalid, Input::Edit),
        "delete" => parse_id(arg, "/delete <id>").map_or_else(Input::Invalid, Input::Delete),
        other => Input::Invalid(format!("Unknown command /{}, try /help", other)),
    }
}

fn format_message(msg: &ChatMessage) -> String {
    let who = match msg.role {
        Role::User => "you",
        Role::Assistant => "bot",
    };
    format!("#{} [{}] {}: {}", msg.id, msg.timestamp, who, msg.content)
}

fn remember<H: Helper, I: History>(rl: &mut Editor<H, I>, line: &str) -> Result<()> {
    if !rl.add_history_entry(line)? {
        tracing::debug!("Skipped history entry");
    }
    Ok(())
}

fn print_reply(chat: &Chat, outcome: &ChatOutcome) {
    if let Some(msg) = chat.conversation().get(outcome.reply_id) {
        println!("{}", format_message(msg));
    }
}

pub async fn run() -> Result<()> {
    logging::init("warn");
    let config = AppConfig::default();
    if config.llm_api_key.is_none() {
        eprintln!("GROQ_API_KEY is not set, replies will fail");
    }

    let relay = Arc::new(Relay::new(RelayConfig::from(&config)));
    let mut chat = Chat::new(relay);
    let mut rl = DefaultEditor::new()?;

    println!("{}", HELP);

    loop {
        let readline = match chat.conversation().editing() {
            Some(draft) => {
                rl.readline_with_initial(&format!("edit #{}> ", draft.id), (draft.text.as_str(), ""))
            }
            None => rl.readline(">>> "),
        };
        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        remember(&mut rl, &line)?;

        match parse_input(&line) {
            Input::Message(text) => {
                let editing = chat.conversation().editing().map(|d| d.id);
                let result = match editing {
                    Some(id) => chat.save_edit(id, text).await,
                    None => chat.submit(text).await,
                };
                match result {
                    Ok(outcome) => print_reply(&chat, &outcome),
                    // Blank input is ignored
                    Err(Rejection::Empty) => {}
                    Err(rejection) => println!("! {}", rejection),
                }
            }
            Input::List => {
                for msg in chat.conversation().messages() {
                    println!("{}", format_message(msg));
                }
            }
            Input::Edit(id) => {
                let content = chat.conversation().get(id).map(|m| m.content.clone());
                let started = content
                    .map(|content| chat.conversation_mut().begin_edit(id, &content))
                    .unwrap_or(false);
                if !started {
                    println!("! Message #{} can't be edited", id);
                }
            }
            Input::Cancel => chat.conversation_mut().cancel_edit(),
            Input::Delete(id) => {
                if chat.conversation_mut().delete(id).is_none() {
                    println!("! No message #{}", id);
                }
            }
            Input::Help => println!("{}", HELP),
            Input::Quit => break,
            Input::Invalid(msg) => println!("! {}", msg),
        }
    }

    Ok(())
}
