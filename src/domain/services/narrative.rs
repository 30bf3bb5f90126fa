//! Narrative text helpers
//!
//! Stories are authored hard-wrapped in content files. Single newlines are
//! joined into spaces, blank lines separate paragraphs, and a carriage return
//! forces a line break in the final message.

use std::collections::HashMap;

use crate::domain::value_objects::PlayerIdentity;

/// Emotes attached to a move that missed.
pub const MISS_EMOTES: [&str; 2] = ["¯\\_(ツ)_/¯", "(╯°□°）╯︵ ┻━┻"];

/// Join hard-wrapped lines, keep paragraph breaks, collapse runs of three or
/// more newlines, then turn `\r` into real line breaks.
pub fn normalize_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\n' {
            out.push(c);
            continue;
        }
        let mut run = 1;
        while chars.next_if_eq(&'\n').is_some() {
            run += 1;
        }
        if run == 2 {
            out.push_str("\n\n");
        } else {
            out.push(' ');
        }
    }

    out.trim().replace('\r', "\n")
}

/// Values available to bribe templates.
pub fn template_values(identity: &PlayerIdentity, bot_name: &str) -> HashMap<&'static str, String> {
    HashMap::from([
        ("NAME", identity.name.clone()),
        ("DISPLAY_NAME", identity.display_name.clone()),
        ("DISCRIMINATOR", identity.discriminator.clone()),
        ("BOTNAME", bot_name.to_string()),
    ])
}

/// Replace `$NAME` and `${NAME}` placeholders. Unknown or malformed
/// placeholders are left untouched and `$$` becomes a literal `$`.
pub fn substitute(template: &str, values: &HashMap<&'static str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(stripped) = after.strip_prefix('$') {
            out.push('$');
            rest = stripped;
            continue;
        }

        let (name, consumed) = match after.strip_prefix('{') {
            Some(braced) => match braced.find('}') {
                Some(end) if is_identifier(&braced[..end]) => (&braced[..end], end + 2),
                _ => ("", 0),
            },
            None => {
                let len = identifier_len(after);
                (&after[..len], len)
            }
        };

        match values.get(name) {
            Some(value) if consumed > 0 => {
                out.push_str(value);
                rest = &after[consumed..];
            }
            _ => {
                out.push('$');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn identifier_len(s: &str) -> usize {
    let mut len = 0;
    for (i, c) in s.char_indices() {
        let valid = c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit());
        if !valid {
            break;
        }
        len = i + c.len_utf8();
    }
    len
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && identifier_len(s) == s.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_newlines() {
        let text = "This is an example.\nJoined to the last line.\n\nNew paragraph.\n\n\nCollapsed.";
        assert_eq!(
            normalize_newlines(text),
            "This is an example. Joined to the last line.\n\nNew paragraph. Collapsed."
        );
    }

    #[test]
    fn test_normalize_forces_carriage_return_breaks() {
        assert_eq!(normalize_newlines("\n  one\rtwo  \n"), "one\ntwo");
    }

    #[test]
    fn test_substitute_known_placeholders() {
        let identity = PlayerIdentity::new("pomlover").with_display_name("Pom Lover");
        let values = template_values(&identity, "Pombot");

        assert_eq!(
            substitute("${DISPLAY_NAME} slips $BOTNAME a coin, says $NAME.", &values),
            "Pom Lover slips Pombot a coin, says pomlover."
        );
    }

    #[test]
    fn test_substitute_leaves_unknown_and_escapes_dollars() {
        let values = template_values(&PlayerIdentity::new("x"), "bot");

        assert_eq!(substitute("costs $$5 and ${GOLD}", &values), "costs $5 and ${GOLD}");
        assert_eq!(substitute("trailing $", &values), "trailing $");
        assert_eq!(substitute("${NAME", &values), "${NAME");
    }
}
