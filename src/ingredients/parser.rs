/// Characters that separate ingredient names in free-text input
pub const DELIMITERS: [char; 5] = ['\n', ',', '，', '、', '/'];

fn is_delimiter(c: char) -> bool {
    DELIMITERS.contains(&c)
}

/// Split free text into trimmed, non-empty ingredient names.
///
/// Runs of delimiters collapse; order is preserved and duplicates are kept.
pub fn split(raw: &str) -> Vec<String> {
    raw.split(is_delimiter)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}
