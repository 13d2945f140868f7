use colored::Colorize;
use humansize::{format_size, DECIMAL};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::classify::RejectReason;
use crate::document::FinalDocument;
use crate::wire::HistoryEntry;

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub fn show_rejection(reason: RejectReason) {
    eprintln!("{} {}", "[REJECTED]".red().bold(), reason.message());
}

pub fn show_written(path: &str, doc: &FinalDocument) {
    eprintln!(
        "{} {}  ({})",
        "[WRITTEN]".green().bold(),
        path,
        format_size(doc.code.len(), DECIMAL)
    );
}

fn first_line(s: &str, max: usize) -> String {
    let line = s.lines().next().unwrap_or("");
    if line.chars().count() > max {
        format!("{}…", line.chars().take(max).collect::<String>())
    } else {
        line.to_string()
    }
}

pub fn show_history(entries: &[HistoryEntry]) {
    println!("\n=== HISTORY ===");
    if entries.is_empty() {
        println!("(no entries)");
        return;
    }
    for (i, e) in entries.iter().enumerate() {
        println!(
            "{}. {}  {}  {}",
            i + 1,
            e.created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            format!("[{}]", e.language.to_uppercase()).cyan().bold(),
            first_line(&e.prompt, 80)
        );
        println!("   {} {}", e.id.dimmed(), format_size(e.response.len(), DECIMAL));
    }
    println!();
}
