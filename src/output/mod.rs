use serde::Serialize;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum OutputMode {
    Text,
    Json,
}

/// Writes command results to stdout, either as a summary line or as pretty JSON.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(json: bool) -> Self {
        let mode = if json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        Self { mode }
    }

    pub fn emit<T: Serialize>(&self, text_line: &str, json_value: &T) -> AppResult<()> {
        println!("{}", self.render(text_line, json_value)?);
        Ok(())
    }

    /// Text mode prints one line per entry, or `empty_line` when there are none.
    pub fn emit_lines<T: Serialize>(
        &self,
        lines: &[String],
        empty_line: &str,
        json_value: &T,
    ) -> AppResult<()> {
        println!("{}", self.render(&text_block(lines, empty_line), json_value)?);
        Ok(())
    }

    fn render<T: Serialize>(&self, text_line: &str, json_value: &T) -> AppResult<String> {
        match self.mode {
            OutputMode::Text => Ok(text_line.to_string()),
            OutputMode::Json => Ok(serde_json::to_string_pretty(json_value)?),
        }
    }
}

fn text_block(lines: &[String], empty_line: &str) -> String {
    if lines.is_empty() {
        return empty_line.to_string();
    }

    lines.join("\n")
}
