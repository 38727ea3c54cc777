//! Terminal output helpers: highlighted JSON and table cells.

use colored::Colorize;

/// Prints `value` as pretty JSON with syntax highlighting.
pub fn print_highlighted_json(value: &serde_json::Value) {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{}", highlight_json(&pretty));
}

/// Colours a pretty-printed JSON document.
///
/// Keys are cyan, strings green, numbers yellow, `true`/`false`/`null`
/// magenta. Punctuation is left as-is.
#[must_use]
pub fn highlight_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len() * 2);
    let mut chars = json.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                let mut literal = String::from('"');
                let mut escaped = false;
                for next in chars.by_ref() {
                    literal.push(next);
                    if escaped {
                        escaped = false;
                    } else if next == '\\' {
                        escaped = true;
                    } else if next == '"' {
                        break;
                    }
                }
                // A string followed by a colon is an object key.
                let is_key = chars.clone().find(|c| !c.is_whitespace()) == Some(':');
                let colored =
                    if is_key { literal.cyan().to_string() } else { literal.green().to_string() };
                out.push_str(&colored);
            }
            c if c == '-' || c.is_ascii_alphanumeric() => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next == '.' || next == '+' || next == '-' || next.is_ascii_alphanumeric() {
                        word.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let colored = match word.as_str() {
                    "true" | "false" | "null" => word.magenta().to_string(),
                    _ => word.yellow().to_string(),
                };
                out.push_str(&colored);
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Formats a boolean as a coloured tick or cross.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value { "✓".green().to_string() } else { "✗".red().to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> String {
        let mut out = String::new();
        let mut chars = highlight_json(text).chars().collect::<Vec<_>>().into_iter();
        while let Some(ch) = chars.next() {
            if ch == '\u{1b}' {
                chars.by_ref().find(|c| *c == 'm');
            } else {
                out.push(ch);
            }
        }
        out
    }

    #[test]
    fn test_highlight_preserves_text() {
        let json = "{\n  \"id\": \"clock-1\",\n  \"x\": -4,\n  \"ok\": true,\n  \"v\": null\n}";
        assert_eq!(plain(json), json);
    }

    #[test]
    fn test_highlight_handles_escaped_quotes() {
        let json = r#"{"text": "say \"hi\"", "n": 1.5e3}"#;
        assert_eq!(plain(json), json);
    }

    #[test]
    fn test_format_bool() {
        assert!(format_bool(true).contains('✓'));
        assert!(format_bool(false).contains('✗'));
    }
}
