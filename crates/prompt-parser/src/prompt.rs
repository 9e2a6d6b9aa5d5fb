//! The system prompt and response cleanup helpers

/// Instructs the model to emit a bare JSON action array.
pub const SYSTEM_PROMPT: &str = r#"You translate a natural-language browser test instruction into a JSON array of actions. Respond with the JSON array only, no prose and no Markdown fences.

Each action is an object:
  {"action": "...", "target": "...", "value": "...", "timeout_secs": 30}

Allowed "action" values:
  navigate          target = URL to open
  click             target = visible name of the button or link
  type              target = field descriptor, value = text to type
  wait_for_element  target = element descriptor, timeout_secs = wait bound
  verify_text       value = text that must be visible on the page
  verify_url        value = substring the current URL must contain

Omit fields an action does not use. Keep targets short: the visible label,
not a CSS selector."#;

/// Strip Markdown code fences and any prose around the JSON array.
pub fn extract_json(content: &str) -> &str {
    let mut body = content.trim();

    if let Some(rest) = body.strip_prefix("```") {
        // Drop the info string ("json") up to the first newline, and the
        // closing fence.
        body = rest
            .split_once('\n')
            .map(|(_, tail)| tail)
            .unwrap_or(rest);
        body = body.trim_end().trim_end_matches("```").trim();
    }

    if !body.starts_with('[') {
        if let (Some(open), Some(close)) = (body.find('['), body.rfind(']')) {
            if open < close {
                body = &body[open..=close];
            }
        }
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_bare_arrays_through() {
        assert_eq!(extract_json(r#"[{"action":"click"}]"#), r#"[{"action":"click"}]"#);
    }

    #[test]
    fn strips_fences_with_and_without_info_string() {
        let fenced = "```json\n[1, 2]\n```";
        assert_eq!(extract_json(fenced), "[1, 2]");

        let plain = "```\n[1, 2]\n```";
        assert_eq!(extract_json(plain), "[1, 2]");
    }

    #[test]
    fn extracts_the_array_out_of_surrounding_prose() {
        let chatty = "Here is your test plan:\n[{\"action\":\"click\"}]\nGood luck!";
        assert_eq!(extract_json(chatty), r#"[{"action":"click"}]"#);
    }
}
