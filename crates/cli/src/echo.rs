use owo_colors::OwoColorize;
use quge_core::Book;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "Quge".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Download serialized novels from biquge-family sites\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// One progress line per finished chapter
pub fn print_chapter(index: usize, total: usize, title: &str, bytes: usize) {
    let width = total.to_string().len();
    let counter = format!("[{:>width$}/{}]", index + 1, total, width = width);

    if bytes == 0 {
        eprintln!("{} {} {}", counter.dimmed(), title.bright_yellow(), "(empty)".dimmed());
    } else {
        eprintln!("{} {} {}", counter.dimmed(), title.bright_white(), format_size(bytes).dimmed());
    }
}

/// Print the assembled book summary
pub fn print_book_summary(book: &Book, elapsed: std::time::Duration) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Book Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("  {} {}", "Title:".dimmed(), book.title.bright_white());
    eprintln!("  {} {}", "Chapters:".dimmed(), book.chapters.len().to_string().bright_white());
    eprintln!("  {} {}", "Size:".dimmed(), format_size(book.total_bytes()).bright_white());
    eprintln!("  {} {:.2}s\n", "Elapsed:".dimmed(), elapsed.as_secs_f64());
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
