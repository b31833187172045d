//! `{placeholder}` substitution for agent and task text.

use ck_protocol::crew_models::Inputs;

/// Replace every `{name}` whose name is in `inputs` with the rendered value.
///
/// Placeholders are identifiers (`[A-Za-z_][A-Za-z0-9_]*`). Unknown names and
/// braces that do not enclose an identifier are copied through unchanged, so
/// JSON or code samples inside a description survive.
pub fn interpolate(template: &str, inputs: &Inputs) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find('}') {
            Some(close) if is_identifier(&after[..close]) => {
                let name = &after[..close];
                match inputs.get(name) {
                    Some(value) => out.push_str(&value.render()),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_known_placeholders() {
        let inputs = Inputs::new().with("topic", "X").with("current_year", "2026");
        assert_eq!(
            interpolate("D {topic} in {current_year}", &inputs),
            "D X in 2026"
        );
    }

    #[test]
    fn test_unknown_placeholder_left_verbatim() {
        let inputs = Inputs::new().with("topic", "X");
        assert_eq!(interpolate("{topic} / {audience}", &inputs), "X / {audience}");
    }

    #[test]
    fn test_list_renders_as_bullets() {
        let inputs = Inputs::new().with(
            "requirements",
            vec!["fast".to_string(), "safe".to_string()],
        );
        assert_eq!(
            interpolate("Needs:\n{requirements}", &inputs),
            "Needs:\n- fast\n- safe"
        );
    }

    #[test]
    fn test_non_identifier_braces_untouched() {
        let inputs = Inputs::new().with("topic", "X");
        let template = r#"Return {"topic": "{topic}"} and { spaced } or {"#;
        assert_eq!(
            interpolate(template, &inputs),
            r#"Return {"topic": "X"} and { spaced } or {"#
        );
    }
}
