//! `{{key}}` placeholder substitution

use crate::config::Configuration;

/// Replace every `{{key}}` marker for each configured key.
///
/// The text is scanned once, left to right, so values are never re-scanned:
/// a value that itself contains `{{other}}` is inserted verbatim. Markers for
/// keys that are not configured pass through untouched.
pub fn substitute(text: &str, config: &Configuration) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let hit = after
            .find("}}")
            .and_then(|end| config.get(&after[..end]).map(|value| (end, value)));

        match hit {
            Some((end, value)) => {
                out.push_str(&value.to_string());
                rest = &after[end + 2..];
            }
            // Not a known marker: keep one brace and rescan from the next one
            None => {
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigValue;

    fn config(pairs: &[(&str, ConfigValue)]) -> Configuration {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_replaces_all_occurrences() {
        let c = config(&[("name", ConfigValue::from("World"))]);
        assert_eq!(
            substitute("Hello {{name}}, bye {{name}}!", &c),
            "Hello World, bye World!"
        );
    }

    #[test]
    fn test_numbers_and_bools_render_canonically() {
        let c = config(&[
            ("port", ConfigValue::Number(3000.0)),
            ("ssl", ConfigValue::Bool(true)),
        ]);
        assert_eq!(substitute("{{port}}:{{ssl}}", &c), "3000:true");
    }

    #[test]
    fn test_unknown_markers_pass_through() {
        let c = config(&[("name", ConfigValue::from("app"))]);
        assert_eq!(substitute("{{name}} {{other}}", &c), "app {{other}}");
    }

    #[test]
    fn test_near_misses_are_untouched() {
        let c = config(&[("name", ConfigValue::from("app"))]);
        let text = "{name} {{ name }} {{{name}}} $name";
        assert_eq!(substitute(text, &c), "{name} {{ name }} {app} $name");
    }

    #[test]
    fn test_regex_characters_in_values_are_literal() {
        let c = config(&[("pattern", ConfigValue::from("$1.*"))]);
        assert_eq!(substitute("x={{pattern}}", &c), "x=$1.*");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let early = config(&[
            ("a", ConfigValue::from("{{b}}")),
            ("b", ConfigValue::from("X")),
        ]);
        let late = config(&[
            ("z", ConfigValue::from("{{b}}")),
            ("b", ConfigValue::from("X")),
        ]);
        assert_eq!(substitute("{{a}}|{{b}}", &early), "{{b}}|X");
        assert_eq!(substitute("{{z}}|{{b}}", &late), "{{b}}|X");
    }

    #[test]
    fn test_adjacent_and_unclosed_markers() {
        let c = config(&[
            ("a", ConfigValue::from("1")),
            ("b", ConfigValue::from("2")),
        ]);
        assert_eq!(substitute("{{a}}{{b}}", &c), "12");
        assert_eq!(substitute("{{a {{b}}", &c), "{{a 2");
        assert_eq!(substitute("tail {{a", &c), "tail {{a");
    }

    #[test]
    fn test_multibyte_text_is_preserved() {
        let c = config(&[("name", ConfigValue::from("app"))]);
        assert_eq!(substitute("héllo {{name}} ✓ {{", &c), "héllo app ✓ {{");
    }

    #[test]
    fn test_empty_config_is_identity() {
        let text = "keep {{everything}} as is\n";
        assert_eq!(substitute(text, &Configuration::new()), text);
    }
}
