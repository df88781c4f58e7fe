/// Collapses every run of whitespace (newlines and tabs included) to one
/// space and trims both ends. Idempotent.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Filesystem-safe form of an identifier: keeps alphanumerics, spaces,
/// hyphens and underscores, then trims trailing whitespace.
pub fn sanitize_filename(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    kept.trim_end().to_string()
}
