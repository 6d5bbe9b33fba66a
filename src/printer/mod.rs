//! Printers for operation results and errors.

use std::io;

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use serde_json::Value;

use crate::helpers::GraphQlError;

pub struct ResultPrinter {
    pub pretty: bool,
    pub color: bool,
}

impl ResultPrinter {
    /// Pretty JSON and colored errors when attached to a terminal.
    pub fn for_terminal() -> Self {
        Self {
            pretty: io::stdout().is_terminal(),
            color: io::stderr().is_terminal(),
        }
    }

    pub fn render(&self, value: &Value) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| value.to_string())
    }

    pub fn render_error(&self, err: &anyhow::Error) -> String {
        let text = match err.downcast_ref::<GraphQlError>() {
            Some(gql) => gql
                .messages
                .iter()
                .map(|m| format!("GraphQL error: {}", m))
                .collect::<Vec<_>>()
                .join("\n"),
            None => format!("error: {:#}", err),
        };
        if self.color {
            format!("{}", text.red())
        } else {
            text
        }
    }

    pub fn print(&self, value: &Value) {
        println!("{}", self.render(value));
    }

    pub fn print_error(&self, err: &anyhow::Error) {
        eprintln!("{}", self.render_error(err));
    }
}
