//! Text helpers for catalog content.

/// Convert catalog synopsis HTML into plain text.
pub fn strip_html(content: &str) -> String {
    nanohtml2text::html2text(content).trim().to_string()
}

/// Build a display title from a slug: `hanh-dong` becomes `Hanh Dong`.
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
