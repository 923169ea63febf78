use terminal_size::{terminal_size, Height, Width};

// Render a listing as an ASCII table.
// Returns true if a table was printed, false otherwise (e.g. JSON output
// forced via env), so the caller can fall back to raw JSON.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) -> bool {
    // Honor env override to force JSON output
    if std::env::var("WARDEN_OUTPUT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false) {
        return false;
    }

    let termw = get_terminal_width();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count().min(termw)).collect();
    for r in rows {
        for (i, cell) in r.iter().enumerate().take(headers.len()) {
            let w = cell.chars().count();
            if w > widths[i] { widths[i] = w.min(termw); }
        }
    }

    let sep = build_separator(&widths);
    println!("{}", fit_line_to_width(&sep, termw));
    println!("{}", fit_line_to_width(&build_header_row(headers, &widths), termw));
    println!("{}", fit_line_to_width(&sep, termw));
    for r in rows {
        println!("{}", fit_line_to_width(&build_row(r, &widths), termw));
    }
    println!("{}", fit_line_to_width(&sep, termw));
    println!("rows: {}", rows.len());

    true
}

fn build_separator(widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('+');
    for w in widths {
        s.push_str(&"-".repeat(*w + 2));
        s.push('+');
    }
    s
}

fn build_row(cells: &[String], widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('|');
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).cloned().unwrap_or_default();
        let text = truncate(&cell, *w);
        s.push(' ');
        if is_numeric_like(&cell) {
            let pad = w.saturating_sub(text.chars().count());
            s.push_str(&" ".repeat(pad));
            s.push_str(&text);
        } else {
            s.push_str(&text);
            let pad = w.saturating_sub(text.chars().count());
            s.push_str(&" ".repeat(pad));
        }
        s.push(' ');
        s.push('|');
    }
    s
}

// Header row with column names colored green; padding uses the visible width
// of the uncolored text.
fn build_header_row(headers: &[&str], widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('|');
    for (i, w) in widths.iter().enumerate() {
        let text = truncate(headers.get(i).copied().unwrap_or_default(), *w);
        s.push(' ');
        s.push_str(&format!("\x1b[32m{}\x1b[0m", text));
        let pad = w.saturating_sub(text.chars().count());
        s.push_str(&" ".repeat(pad));
        s.push(' ');
        s.push('|');
    }
    s
}

fn truncate(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max { return s.to_string(); }
    if max <= 1 { return "…".to_string(); }
    s.chars().take(max - 1).collect::<String>() + "…"
}

fn is_numeric_like(s: &str) -> bool {
    // crude detection for aligning numbers to the right
    let st = s.trim();
    if st.is_empty() { return false; }
    let mut has_digit = false;
    for ch in st.chars() {
        if ch.is_ascii_digit() { has_digit = true; continue; }
        if ".-+eE,_".contains(ch) { continue; }
        return false;
    }
    has_digit
}

fn get_terminal_width() -> usize {
    if let Some((Width(w), Height(_h))) = terminal_size() {
        return (w.saturating_sub(4)) as usize;
    }
    80
}

fn fit_line_to_width(s: &str, maxw: usize) -> String {
    // Truncation only matters for very narrow terminals; ANSI color lives in
    // the header row, which stays short for these fixed listings.
    if s.chars().count() <= maxw { return s.to_string(); }
    truncate(s, maxw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_matches_widths() {
        assert_eq!(build_separator(&[1, 2]), "+---+----+");
    }

    #[test]
    fn rows_pad_and_align() {
        let row = build_row(&["ab".into(), "7".into()], &[4, 3]);
        assert_eq!(row, "| ab   |   7 |");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("ab", 4), "ab");
    }
}
