//! Table output formatting for CLI commands
//!
//! Renders MCP tools, configured servers and search results with comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{ServerDescriptor, ToolInfo, TransportKind, XhsPost};
use crate::infrastructure::logging::SecretScrubber;

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format the tools reported by `tools/list`
    pub fn format_tools(&self, tools: &[ToolInfo]) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("Tool").add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
        ]);

        for tool in tools {
            let description = tool.description.as_deref().unwrap_or("-");
            table.add_row(vec![
                self.accent(Cell::new(&tool.name), Color::Cyan),
                Cell::new(truncate_text(description, 60)),
            ]);
        }

        table.to_string()
    }

    /// Format a server descriptor; secret-looking env values are masked.
    pub fn format_server(&self, descriptor: &ServerDescriptor) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("Field").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        let transport = match descriptor.transport() {
            TransportKind::Stdio => "stdio",
            TransportKind::Http => "http",
            TransportKind::Unreachable => "none",
        };
        let command = std::iter::once(descriptor.command.as_str())
            .chain(descriptor.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");

        table.add_row(vec![Cell::new("key"), Cell::new(&descriptor.key)]);
        table.add_row(vec![Cell::new("name"), Cell::new(&descriptor.name)]);
        table.add_row(vec![Cell::new("transport"), Cell::new(transport)]);
        table.add_row(vec![Cell::new("command"), Cell::new(command)]);
        for (name, value) in SecretScrubber::scrub_env(&descriptor.env) {
            table.add_row(vec![Cell::new(format!("env.{name}")), Cell::new(value)]);
        }

        table.to_string()
    }

    /// Format search results
    pub fn format_posts(&self, posts: &[XhsPost]) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Author").add_attribute(Attribute::Bold),
            Cell::new("Likes").add_attribute(Attribute::Bold),
            Cell::new("URL").add_attribute(Attribute::Bold),
        ]);

        for (index, post) in posts.iter().enumerate() {
            let author = if post.author.is_empty() { "-" } else { &post.author };
            table.add_row(vec![
                Cell::new(index + 1),
                Cell::new(truncate_text(&post.title, 40)),
                Cell::new(author),
                Cell::new(post.likes),
                self.accent(Cell::new(&post.post_url), Color::Blue),
            ]);
        }

        table.to_string()
    }

    fn accent(&self, cell: Cell, color: Color) -> Cell {
        if self.use_colors {
            cell.fg(color)
        } else {
            cell
        }
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

/// Shorten to `max_chars` characters, ending in "..." when cut.
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
