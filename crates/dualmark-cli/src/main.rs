use anyhow::{Context, Result};
use dualmark_config::{Config, DefaultMode};
use dualmark_engine::markup;
use dualmark_engine::parsing;
use std::io::Read;
use std::{env, process};

enum Output {
    Markdown,
    Markup,
    Text,
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let (input_path, requested) = match args.len() {
        2 => (args[1].clone(), None),
        3 => (args[1].clone(), Some(args[2].clone())),
        _ => {
            eprintln!("Usage: {} <input-file|-> [markdown|markup|text]", args[0]);
            eprintln!("Converts a document between Markdown and markup.");
            eprintln!("With no output format, the configured default mode decides.");
            process::exit(1);
        }
    };

    let output = match requested.as_deref() {
        Some("markdown") => Output::Markdown,
        Some("markup") => Output::Markup,
        Some("text") => Output::Text,
        Some(other) => {
            eprintln!("Unknown output format: {other}");
            process::exit(1);
        }
        // No explicit format: follow the configured default mode.
        None => match Config::load() {
            Ok(Some(config)) if config.default_mode == DefaultMode::Markdown => Output::Markdown,
            Ok(_) => Output::Markup,
            Err(e) => {
                eprintln!("Error: failed to load config file: {e}");
                process::exit(1);
            }
        },
    };

    let content = if input_path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading stdin")?;
        buffer
    } else {
        std::fs::read_to_string(&input_path)
            .with_context(|| format!("reading {input_path}"))?
    };

    // Markup input is sanitized and heuristically converted before it
    // reaches the structural parser; Markdown goes straight in.
    let markdown = if markup::looks_like_markup(&content) {
        markup::markup_to_markdown(&markup::sanitize(&content))
    } else {
        content
    };
    let ast = parsing::parse_document(&markdown);

    let rendered = match output {
        Output::Markdown => parsing::serialize_markdown(&ast),
        Output::Markup => markup::serialize_markup(&ast),
        Output::Text => ast.plain_text(),
    };
    println!("{rendered}");
    Ok(())
}
