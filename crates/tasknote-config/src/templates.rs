//! Configuration template for `tasknote init`.
//!
//! The template is stored as a valid TOML file and handed out commented-out, so a
//! freshly initialized config behaves exactly like the built-in defaults.

/// Configuration template (valid TOML).
const TEMPLATE: &str = include_str!("../templates/config.toml");

/// Returns the configuration template as a commented-out example.
pub fn config_template() -> String {
    comment_template(TEMPLATE)
}

/// Prefixes every non-empty, non-comment line with `# `.
fn comment_template(template: &str) -> String {
    template
        .lines()
        .map(|line| {
            if line.is_empty() || line.starts_with('#') {
                format!("{line}\n")
            } else {
                format!("# {line}\n")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{Config, parse::parse_config_str};

    #[test]
    fn template_parses_as_valid_toml() {
        let result = parse_config_str(TEMPLATE, Path::new("template.toml"));
        assert!(result.is_ok(), "template failed to parse: {result:?}");
    }

    #[test]
    fn template_matches_defaults() {
        let raw = parse_config_str(TEMPLATE, Path::new("template.toml")).unwrap();
        let from_template = Config::from_raw(raw, Path::new("/base")).unwrap();
        let defaults = Config::defaults_in(Path::new("/base"));
        assert_eq!(from_template.storage, defaults.storage);
        assert_eq!(from_template.index, defaults.index);
        assert_eq!(from_template.search, defaults.search);
    }

    #[test]
    fn commented_template_is_all_comments() {
        let commented = config_template();
        assert!(
            commented
                .lines()
                .all(|line| line.is_empty() || line.starts_with('#'))
        );
    }

    #[test]
    fn comment_template_handles_section_headers() {
        let result = comment_template("[section]\nkey = \"value\"\n");
        assert_eq!(result, "# [section]\n# key = \"value\"\n");
    }
}
