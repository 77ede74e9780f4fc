//! Demo driver: load a text document, then answer questions from stdin.
//!
//! Pages are split on form-feed characters (`\x0c`), the convention used by
//! text dumps of paginated documents; a file without form feeds is treated
//! as a single page.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use chat_core::{ChatConfig, DocChat, IndicatifProgress, InMemoryPages};
use llm_service::{Backoff, GeminiConfig, GeminiService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file when present.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let path = std::env::args()
        .nth(1)
        .context("usage: doc-chat <document.txt>")?;

    let raw = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
    let byte_size = raw.len() as u64;
    let pages: Vec<String> = raw.split('\x0c').map(str::to_string).collect();
    let name = std::path::Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(path.clone());

    let svc = Arc::new(GeminiService::new(GeminiConfig::from_env()?)?);
    let mut chat = DocChat::with_gemini(svc, Backoff::from_env(), ChatConfig::from_env());

    let source = InMemoryPages::with_byte_size(name, pages, byte_size);
    let summary = chat.ingest(&source, &IndicatifProgress::bar()).await?;

    println!(
        "{} {} ({} pages, {} segments)",
        "loaded".green().bold(),
        summary.name.bold(),
        summary.page_count,
        summary.segment_count
    );
    println!("{}", "ask away (empty line to quit)".dimmed());

    let stdin = std::io::stdin();
    loop {
        print!("{} ", ">".cyan().bold());
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            break;
        }

        let answer = chat.ask(question).await;
        println!("{answer}\n");
    }

    Ok(())
}
