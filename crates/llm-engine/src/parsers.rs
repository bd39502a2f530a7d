//! Best-effort parsing of free-text model output.

/// Split a comma- or newline-delimited answer into ordered items.
///
/// Bullets, list numbering and wrapping quotes are stripped; empty items are
/// dropped.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(|c| c == ',' || c == '\n')
        .map(clean_item)
        .filter(|item| !item.is_empty())
        .collect()
}

fn clean_item(item: &str) -> String {
    let mut s = item.trim();
    s = s.trim_start_matches(|c| c == '-' || c == '*' || c == '•').trim_start();

    // "1." / "2)" numbering
    let digits = s.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &s[digits..];
        if let Some(stripped) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            s = stripped.trim_start();
        }
    }

    s.trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim()
        .trim_end_matches('.')
        .to_string()
}

/// Remove a surrounding Markdown code fence (```` ```html ... ``` ````).
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    // Drop the language tag on the opening line.
    let body = match after_open.find('\n') {
        Some(newline) => &after_open[newline + 1..],
        None => after_open,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
        .to_string()
}

/// Normalize a single-token classification answer: trimmed, lower-cased,
/// with surrounding quotes and punctuation removed.
pub fn normalize_token(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_list() {
        assert_eq!(
            parse_list("Tech-savvy millennials, Small business owners,Remote workers"),
            vec!["Tech-savvy millennials", "Small business owners", "Remote workers"]
        );
    }

    #[test]
    fn bulleted_and_numbered_lines() {
        let raw = "- Marathon runners\n* Gym beginners\n3. \"Busy parents\"\n\n";
        assert_eq!(
            parse_list(raw),
            vec!["Marathon runners", "Gym beginners", "Busy parents"]
        );
    }

    #[test]
    fn hyphenated_items_survive() {
        assert_eq!(parse_list("Health-conscious seniors"), vec!["Health-conscious seniors"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse_list("  ,\n , ").is_empty());
    }

    #[test]
    fn fenced_html() {
        let raw = "```html\n<div>Hi</div>\n```";
        assert_eq!(strip_code_fences(raw), "<div>Hi</div>");
        assert_eq!(strip_code_fences("<p>plain</p>"), "<p>plain</p>");
    }

    #[test]
    fn token_normalization() {
        assert_eq!(normalize_token("  'Generate_Content'.\n"), "generate_content");
        assert_eq!(normalize_token("COMPLETE"), "complete");
    }
}
