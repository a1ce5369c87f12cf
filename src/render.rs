//! Terminal rendering for the operator console.

use colored::Colorize;
use ifu_engine::{Escalation, HealthStatus, ResolvedIdentity, SearchBoard, VoteTally};
use scan_payload::unescape_newlines;

pub fn banner() -> String {
    format!(
        "{} type `help` for commands",
        "IFU scout".bold().cyan()
    )
}

pub fn notice(text: &str) -> String {
    text.yellow().to_string()
}

pub fn identity(id: &ResolvedIdentity) -> String {
    if id.is_empty() {
        return notice("no device context");
    }
    let field = |name: &str, value: &str| {
        let value = if value.is_empty() { "-" } else { value };
        format!("  {:<12}{}", name.dimmed(), value)
    };
    [
        "device".bold().to_string(),
        field("model", &id.model),
        field("document", &id.assistantid),
        field("container", &id.containerid),
        field("type", &id.device_type),
    ]
    .join("\n")
}

/// Numbered hits; snippets get their escaped newlines expanded and are indented.
pub fn board(board: &SearchBoard) -> String {
    let mut out = format!(
        "{} `{}` ({} hits)",
        board.mode.to_string().bold(),
        board.keyword,
        board.items.len()
    );
    for (i, item) in board.items.iter().enumerate() {
        out.push_str(&format!(
            "\n{:>3}. {} {}",
            i + 1,
            item.doc.green(),
            format!("p.{}", item.page).dimmed()
        ));
        if let Some(snippet) = item.snippet.as_deref() {
            for line in unescape_newlines(snippet).lines() {
                out.push_str("\n     ");
                out.push_str(line);
            }
        }
    }
    out
}

pub fn answer(text: &str) -> String {
    unescape_newlines(text)
}

pub fn tally(t: &VoteTally) -> String {
    format!("helpful {}  not helpful {}", t.up.to_string().green(), t.down.to_string().red())
}

pub fn health(s: &HealthStatus) -> String {
    let flag = if s.ok { "UP".green().bold() } else { "DOWN".red().bold() };
    format!("{flag} {} ({} ms) {}", s.endpoint, s.latency_ms, s.message)
}

/// `None` for silent escalations.
pub fn escalation(e: &Escalation) -> Option<String> {
    match e {
        Escalation::Silent => None,
        Escalation::Transient { message } => Some(notice(message)),
        Escalation::Blocking {
            detail,
            suggestion,
            help_ref,
            suggest_help,
        } => {
            let mut out = format!("{} {}\n{}", "error:".red().bold(), detail, suggestion);
            if *suggest_help {
                out.push_str(&format!("\nhelp: {help_ref}"));
            }
            Some(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifu_engine::{SearchMode, SearchResultItem};
    use std::sync::Arc;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn snippets_are_unescaped_and_indented() {
        plain();
        let b = SearchBoard {
            keyword: "alarm".into(),
            mode: SearchMode::Search,
            items: Arc::from(vec![SearchResultItem {
                doc: "Manual.pdf".into(),
                page: 7,
                snippet: Some("High pressure\\nCheck tubing".into()),
            }]),
        };
        assert_eq!(
            board(&b),
            "search `alarm` (1 hits)\n  1. Manual.pdf p.7\n     High pressure\n     Check tubing"
        );
    }

    #[test]
    fn silent_renders_nothing_and_blocking_names_help() {
        plain();
        assert_eq!(escalation(&Escalation::Silent), None);
        let text = escalation(&Escalation::Blocking {
            detail: "error 500".into(),
            suggestion: "Please try again later or consult the help guide.".into(),
            help_ref: "/help".into(),
            suggest_help: true,
        })
        .unwrap();
        assert_eq!(
            text,
            "error: error 500\nPlease try again later or consult the help guide.\nhelp: /help"
        );
    }

    #[test]
    fn empty_fields_show_a_dash() {
        plain();
        let text = identity(&ResolvedIdentity::from_model("Vista 300"));
        assert!(text.contains("Vista 300"));
        assert!(text.lines().any(|l| l.trim_end().ends_with('-') && l.contains("document")));
    }
}
