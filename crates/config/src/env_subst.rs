/// Replace `${ENV_VAR}` and `${ENV_VAR:-fallback}` placeholders in config text.
///
/// Unresolvable variables without a fallback are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Replace placeholders using a custom lookup function.
fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' || chars.peek() != Some(&'{') {
            result.push(ch);
            continue;
        }
        chars.next(); // '{'

        let mut body = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            if c == '}' {
                closed = true;
                break;
            }
            body.push(c);
        }

        if !closed || body.is_empty() {
            result.push_str("${");
            result.push_str(&body);
            continue;
        }

        let (name, fallback) = match body.split_once(":-") {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (body.as_str(), None),
        };

        match (lookup(name), fallback) {
            (Some(val), _) => result.push_str(&val),
            (None, Some(fallback)) => result.push_str(fallback),
            (None, None) => {
                result.push_str("${");
                result.push_str(&body);
                result.push('}');
            },
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "KLINTAR_TEST_TOKEN" => Some("abc".to_string()),
            _ => None,
        }
    }

    #[test]
    fn substitutes_known_var() {
        assert_eq!(
            substitute_env_with(r#"token = "${KLINTAR_TEST_TOKEN}""#, lookup),
            r#"token = "abc""#
        );
    }

    #[test]
    fn leaves_unknown_var() {
        assert_eq!(
            substitute_env_with("${KLINTAR_MISSING}", lookup),
            "${KLINTAR_MISSING}"
        );
    }

    #[test]
    fn uses_fallback_when_unset() {
        assert_eq!(substitute_env_with("${KLINTAR_MISSING:-3001}", lookup), "3001");
        assert_eq!(substitute_env_with("${KLINTAR_TEST_TOKEN:-x}", lookup), "abc");
        assert_eq!(substitute_env_with("${KLINTAR_MISSING:-}", lookup), "");
    }

    #[test]
    fn malformed_placeholder_is_literal() {
        assert_eq!(substitute_env_with("cost: ${unterminated", lookup), "cost: ${unterminated");
        assert_eq!(substitute_env_with("$5 and ${}", lookup), "$5 and ${");
    }

    #[test]
    fn no_placeholders() {
        assert_eq!(substitute_env("plain text"), "plain text");
    }
}
