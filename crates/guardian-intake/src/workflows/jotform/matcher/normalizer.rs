/// Lowercased, trimmed label with invisible characters removed and whitespace collapsed.
pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{00a0}'], " ");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_label;

    #[test]
    fn strips_invisible_characters_and_case() {
        assert_eq!(normalize_label("\u{feff}  Reference 2\u{00a0}Name "), "reference 2 name");
        assert_eq!(normalize_label("ZIP   Code"), "zip code");
        assert_eq!(normalize_label("   "), "");
    }
}
