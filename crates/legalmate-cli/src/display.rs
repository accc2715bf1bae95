//! Vertical card display for analysed documents.

use legalmate_core::AnalysisResult;
use legalmate_store::{DocumentPage, DocumentRecord};

const MAX_LIST_ITEMS: usize = 10;
const PREVIEW_CHARS: usize = 200;

// ── Public API ──

pub fn print_record_card(record: &DocumentRecord) {
    println!("=== {} ===", record.filename);
    println!("  {:<14} {}", "id", record.id);
    println!(
        "  {:<14} {}",
        "uploaded",
        record.upload_time.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  {:<14} {}", "status", record.status);
    println!();
    print_analysis(&record.analysis);
}

pub fn print_analysis_card(title: &str, result: &AnalysisResult) {
    println!("=== {title} ===");
    println!();
    print_analysis(result);
}

pub fn print_page(page: &DocumentPage) {
    if page.documents.is_empty() {
        println!("No documents (page {}).", page.page);
        return;
    }
    for doc in &page.documents {
        println!(
            "{}  {}  {:<9}  {}",
            doc.id,
            doc.upload_time.format("%Y-%m-%d %H:%M"),
            doc.status,
            doc.filename
        );
    }
    println!();
    let shown_to = (page.page - 1) * page.limit + page.documents.len();
    print!("Showing {}-{} of {}", shown_to + 1 - page.documents.len(), shown_to, page.total);
    if page.has_next {
        print!(" (next: --page {})", page.page + 1);
    }
    println!();
}

// ── Section rendering ──

fn print_analysis(result: &AnalysisResult) {
    println!("Summary");
    println!("  {}", result.summary());
    println!();

    print_list("Risks", result.risks());

    if !result.entities().is_empty() {
        println!("Entities");
        for (category, mentions) in result.entities().iter() {
            println!("  {:<14} {}", category, format_items(mentions));
        }
        println!();
    }

    if let Some(clauses) = result.clauses() {
        print_list("Clauses", clauses);
    }

    println!("Text");
    println!("  {}", preview(result.text().as_str()));
}

fn print_list(header: &str, items: &[String]) {
    println!("{header}");
    if items.is_empty() {
        println!("  (none)");
    }
    for item in items.iter().take(MAX_LIST_ITEMS) {
        println!("  - {item}");
    }
    if items.len() > MAX_LIST_ITEMS {
        println!("  … and {} more", items.len() - MAX_LIST_ITEMS);
    }
    println!();
}

fn format_items(items: &[String]) -> String {
    let mut out = items
        .iter()
        .take(MAX_LIST_ITEMS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if items.len() > MAX_LIST_ITEMS {
        out.push_str(&format!(", … (+{})", items.len() - MAX_LIST_ITEMS));
    }
    out
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
