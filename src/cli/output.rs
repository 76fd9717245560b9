//! Terminal output formatting with colors
//!
//! Status messages go to stderr and respect NO_COLOR, CLICOLOR and
//! CLICOLOR_FORCE automatically. Data goes to the writer handed in by the
//! caller so `--silent` can swap in a sink.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use colored::Colorize;
use itertools::Itertools;
use serde_json::Value;
use termtree::Tree;

use crate::domain::{CommandNode, ResourceSummary};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Data output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_nested(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => items.iter().any(|v| v.is_object() || v.is_array()),
        _ => false,
    }
}

/// Print an object as `key: value` lines; nested objects and lists of
/// objects are indented under their key.
pub fn print_dict(out: &mut dyn Write, value: &Value, indent: usize) -> io::Result<()> {
    let pad = " ".repeat(indent);
    let Value::Object(map) = value else {
        return writeln!(out, "{pad}{}", scalar(value));
    };
    for (key, v) in map {
        if !is_nested(v) {
            let text = match v {
                Value::Array(items) => items.iter().map(scalar).join(", "),
                _ => scalar(v),
            };
            writeln!(out, "{pad}{key}: {text}")?;
            continue;
        }
        writeln!(out, "{pad}{key}:")?;
        match v {
            Value::Array(items) => {
                for item in items {
                    print_dict(out, item, indent + 2)?;
                }
            }
            _ => print_dict(out, v, indent + 2)?,
        }
    }
    Ok(())
}

/// Print listed resources: `id name` lines, or the full objects with
/// `details`.
pub fn print_items(out: &mut dyn Write, items: &[Value], details: bool) -> io::Result<()> {
    for item in items {
        let summary = ResourceSummary::from_value(item);
        writeln!(out, "{} {}", summary.id.bold(), summary.name)?;
        if details {
            print_dict(out, item, 2)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn print_json(out: &mut dyn Write, value: &Value) -> io::Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(out, "{text}")
}

/// Print response headers (`--with-output` on deletes).
pub fn print_headers(out: &mut dyn Write, headers: &BTreeMap<String, String>) -> io::Result<()> {
    for (name, value) in headers {
        writeln!(out, "{name}: {value}")?;
    }
    Ok(())
}

/// Print items `page_size` at a time, waiting for Enter between pages.
/// End of input or `q` stops paging.
pub fn page_items(
    out: &mut dyn Write,
    input: &mut dyn BufRead,
    items: &[Value],
    page_size: usize,
    details: bool,
) -> io::Result<()> {
    let mut pages = items.chunks(page_size.max(1)).peekable();
    while let Some(page) = pages.next() {
        print_items(out, page, details)?;
        if pages.peek().is_none() {
            break;
        }
        write!(out, "{}", "-- more (Enter to continue, q to quit) --".dimmed())?;
        out.flush()?;
        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 || answer.trim().eq_ignore_ascii_case("q") {
            writeln!(out)?;
            break;
        }
    }
    Ok(())
}

fn tree_of<H>(node: &CommandNode<H>) -> Tree<String> {
    let label = if node.description().is_empty() {
        node.name().to_string()
    } else {
        format!("{} - {}", node.name().bold(), node.description())
    };
    Tree::new(label).with_leaves(node.children().iter().map(tree_of))
}

/// Render a command (sub)tree.
pub fn render_tree<H>(node: &CommandNode<H>) -> String {
    tree_of(node).to_string()
}
