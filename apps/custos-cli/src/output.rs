//! Status-line formatting for the terminal
//!
//! Small println helpers keeping the user-facing output uniform across
//! commands. Honors the NO_COLOR convention; logging goes to stderr via
//! tracing, these stay on stdout (warnings excepted).

fn use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Green-checkmark line for a completed step.
pub fn print_success(message: &str) {
    if use_color() {
        println!("\x1b[32m✓\x1b[0m {}", message);
    } else {
        println!("OK: {}", message);
    }
}

/// Yellow warning line, on stderr.
pub fn print_warning(message: &str) {
    if use_color() {
        eprintln!("\x1b[33mWarning:\x1b[0m {}", message);
    } else {
        eprintln!("Warning: {}", message);
    }
}

/// Blue informational line for a non-terminal step.
pub fn print_info(message: &str) {
    if use_color() {
        println!("\x1b[34mℹ\x1b[0m {}", message);
    } else {
        println!("Info: {}", message);
    }
}

/// Indented `key: value` line, key in bold.
pub fn print_key_value(key: &str, value: &str) {
    if use_color() {
        println!("  \x1b[1m{}:\x1b[0m {}", key, value);
    } else {
        println!("  {}: {}", key, value);
    }
}

/// Cap a label at `max` characters, marking the cut with an ellipsis.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let cut: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_strings_alone() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly-10", 10), "exactly-10");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate("a-longer-value", 8), "a-longe…");
    }
}
