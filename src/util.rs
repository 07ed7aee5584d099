//! Shared utility functions used across the codebase.

/// Parse an environment variable as a boolean, returning `default` if unset.
///
/// Recognises `1`, `true`, `yes`, `y`, `on` (case-insensitive) as `true`;
/// any other value maps to `false`.
pub fn env_var_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => parse_bool(&value),
        Err(_) => default,
    }
}

/// Boolean parsing shared by the env and file config loaders.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// Truncate `text` to at most `max_chars` characters, appending `...` when cut.
///
/// Always splits on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Milliseconds as a float, for duration fields reported to callers.
pub fn duration_ms(duration: std::time::Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_truthy_values() {
        for value in ["1", "true", "YES", " y ", "On"] {
            assert!(parse_bool(value), "{value} should be true");
        }
        for value in ["0", "false", "off", "", "maybe"] {
            assert!(!parse_bool(value), "{value} should be false");
        }
    }

    #[test]
    fn env_var_bool_falls_back_to_default_when_unset() {
        assert!(env_var_bool("RECONFLOW_TEST_UNSET_FLAG_7F3A", true));
        assert!(!env_var_bool("RECONFLOW_TEST_UNSET_FLAG_7F3A", false));
    }

    #[test]
    fn truncate_chars_keeps_short_text() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
    }

    #[test]
    fn truncate_chars_cuts_on_char_boundary() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll...");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語...");
    }

    #[test]
    fn duration_ms_is_fractional() {
        let ms = duration_ms(std::time::Duration::from_micros(1500));
        assert!((ms - 1.5).abs() < 1e-9);
    }
}
