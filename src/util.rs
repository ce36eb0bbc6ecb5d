pub fn truncate_label(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let prefix = chars.by_ref().take(max_chars).collect::<String>();
    if chars.next().is_some() {
        format!("{}…", prefix.trim_end())
    } else {
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_label;

    #[test]
    fn short_labels_pass_through() {
        assert_eq!(truncate_label("Overview", 24), "Overview");
    }

    #[test]
    fn long_labels_get_an_ellipsis() {
        let label = truncate_label("A very long section title that keeps going", 12);
        assert_eq!(label, "A very long…");
    }

    #[test]
    fn truncation_is_char_safe() {
        assert_eq!(truncate_label("héllo wörld", 5), "héllo…");
    }
}
