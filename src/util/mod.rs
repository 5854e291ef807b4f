pub(crate) const EXCERPT_CHARS: usize = 100;

pub(crate) fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Morning",
        12..=17 => "Afternoon",
        _ => "Evening",
    }
}

pub(crate) fn current_hour() -> u32 {
    // Browser local timezone.
    js_sys::Date::new_0().get_hours()
}

/// First `max_chars` characters of `content`, with `...` appended when truncated.
pub(crate) fn excerpt(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

pub(crate) fn note_count_label(count: usize) -> String {
    if count == 1 {
        "1 Note".to_string()
    } else {
        format!("{count} Notes")
    }
}

/// Any typed term counts as a search, even one made of spaces.
pub(crate) fn empty_list_message(search_term: &str) -> &'static str {
    if search_term.is_empty() {
        "No notes yet. Create your first note!"
    } else {
        "No notes match your search"
    }
}

pub(crate) fn check_passwords_match(password: &str, confirm: &str) -> Result<(), &'static str> {
    if password == confirm {
        Ok(())
    } else {
        Err("Passwords don't match")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_boundaries() {
        assert_eq!(greeting_for_hour(0), "Morning");
        assert_eq!(greeting_for_hour(11), "Morning");
        assert_eq!(greeting_for_hour(12), "Afternoon");
        assert_eq!(greeting_for_hour(17), "Afternoon");
        assert_eq!(greeting_for_hour(18), "Evening");
        assert_eq!(greeting_for_hour(23), "Evening");
    }

    #[test]
    fn test_excerpt_short_content_untouched() {
        assert_eq!(excerpt("hello", EXCERPT_CHARS), "hello");
        let exact = "a".repeat(EXCERPT_CHARS);
        assert_eq!(excerpt(&exact, EXCERPT_CHARS), exact);
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let long = "é".repeat(EXCERPT_CHARS + 5);
        let out = excerpt(&long, EXCERPT_CHARS);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), EXCERPT_CHARS + 3);
    }

    #[test]
    fn test_note_count_label() {
        assert_eq!(note_count_label(0), "0 Notes");
        assert_eq!(note_count_label(1), "1 Note");
        assert_eq!(note_count_label(7), "7 Notes");
    }

    #[test]
    fn test_empty_list_message_counts_spaces_as_search() {
        assert_eq!(empty_list_message(""), "No notes yet. Create your first note!");
        assert_eq!(empty_list_message(" "), "No notes match your search");
        assert_eq!(empty_list_message("milk"), "No notes match your search");
    }

    #[test]
    fn test_password_mismatch() {
        assert!(check_passwords_match("secret", "secret").is_ok());
        assert_eq!(check_passwords_match("secret", "secreT"), Err("Passwords don't match"));
    }
}
