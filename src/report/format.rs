//! Small text helpers shared by the reporters.

use std::borrow::Cow;

/// Format an integer with comma thousands separators.
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Strip the `_dataset.csv` / `.csv` suffix from a file name.
pub fn table_stem(filename: &str) -> &str {
    filename
        .strip_suffix("_dataset.csv")
        .or_else(|| filename.strip_suffix(".csv"))
        .unwrap_or(filename)
}

/// Display name of a table: stem with underscores as spaces, title-cased.
pub fn table_title(filename: &str) -> String {
    table_stem(filename)
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Escape text for a Markdown table cell.
pub fn escape_cell(text: &str) -> Cow<'_, str> {
    if text.contains('|') {
        Cow::Owned(text.replace('|', "\\|"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Pad `text` to `width` characters, left or right aligned.
pub fn pad(text: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{text:>width$}")
    } else {
        format!("{text:<width$}")
    }
}
