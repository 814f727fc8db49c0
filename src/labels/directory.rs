use std::collections::HashMap;

use regex::Regex;

use super::settings::LabelSettings;
use super::ConfigError;

/// What the settings file says about a single label name. Every name in the
/// directory carries exactly one classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The settings control this label's color and description.
    Managed { color: String, description: String },
    /// This label is retired; issues move to `to` before it is deleted.
    ReplaceSource { to: String },
    /// Matched labels are unmanaged but exempt from deletion.
    Ignore,
}

#[derive(Debug)]
struct IgnorePattern {
    raw: String,
    regex: Regex,
}

/// The authoritative classification map built from a `LabelSettings`
/// document. Construction is a pure, deterministic function of the settings;
/// any name claiming two classifications is a fatal configuration error.
#[derive(Debug)]
pub struct LabelDirectory {
    entries: HashMap<String, Classification>,
    /// Managed names and replace sources in document order, so derived plans
    /// are reproducible.
    managed: Vec<String>,
    replace_sources: Vec<String>,
    ignore_patterns: Vec<IgnorePattern>,
}

impl LabelDirectory {
    pub fn build(settings: &LabelSettings) -> Result<Self, ConfigError> {
        let mut entries = HashMap::new();
        let mut managed = Vec::new();
        let mut replace_sources = Vec::new();
        let mut ignore_patterns = Vec::new();

        for label in &settings.labels {
            if entries.contains_key(&label.name) {
                return Err(ConfigError::DuplicateLabelName(label.name.clone()));
            }
            entries.insert(
                label.name.clone(),
                Classification::Managed {
                    color: label.color.clone(),
                    description: label.desc.clone(),
                },
            );
            managed.push(label.name.clone());
        }

        for rule in &settings.replace {
            if entries.contains_key(&rule.from) {
                return Err(ConfigError::DuplicateLabelName(rule.from.clone()));
            }
            // Targets must be declared as labels in the same settings file.
            // A `to` pointing at another replace source is not resolved.
            match entries.get(&rule.to) {
                Some(Classification::Managed { .. }) => {}
                _ => return Err(ConfigError::ReplaceTargetNotFound(rule.to.clone())),
            }
            entries.insert(
                rule.from.clone(),
                Classification::ReplaceSource {
                    to: rule.to.clone(),
                },
            );
            replace_sources.push(rule.from.clone());
        }

        for pattern in &settings.ignore {
            let compiled = compile_glob(pattern);
            if entries.contains_key(&compiled) {
                return Err(ConfigError::DuplicateLabelName(pattern.clone()));
            }
            let regex = Regex::new(&format!("^{compiled}$")).map_err(|source| {
                ConfigError::BadIgnorePattern {
                    pattern: pattern.clone(),
                    source,
                }
            })?;
            entries.insert(compiled, Classification::Ignore);
            ignore_patterns.push(IgnorePattern {
                raw: pattern.clone(),
                regex,
            });
        }

        Ok(LabelDirectory {
            entries,
            managed,
            replace_sources,
            ignore_patterns,
        })
    }

    pub fn classify(&self, name: &str) -> Option<&Classification> {
        self.entries.get(name)
    }

    /// Managed labels as `(name, color, description)`, in document order.
    pub fn managed(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.managed
            .iter()
            .filter_map(|name| match self.entries.get(name) {
                Some(Classification::Managed { color, description }) => {
                    Some((name.as_str(), color.as_str(), description.as_str()))
                }
                _ => None,
            })
    }

    /// Replace rules as `(from, to)`, in document order.
    pub fn replace_sources(&self) -> impl Iterator<Item = (&str, &str)> {
        self.replace_sources
            .iter()
            .filter_map(|from| match self.entries.get(from) {
                Some(Classification::ReplaceSource { to }) => {
                    Some((from.as_str(), to.as_str()))
                }
                _ => None,
            })
    }

    /// Raw ignore patterns as written by the operator.
    pub fn ignore_patterns(&self) -> impl Iterator<Item = &str> {
        self.ignore_patterns.iter().map(|p| p.raw.as_str())
    }

    /// The first ignore pattern matching `name`, if any. Patterns are
    /// anchored: `won*` matches `wontfix` but not `awontfix`.
    pub fn matches_ignore(&self, name: &str) -> Option<&str> {
        self.ignore_patterns
            .iter()
            .find(|p| p.regex.is_match(name))
            .map(|p| p.raw.as_str())
    }
}

/// Translate a shell-style glob into a regex body: `*` matches any substring,
/// everything else is literal.
fn compile_glob(pattern: &str) -> String {
    pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::settings::{DesiredLabel, ReplaceRule};

    fn desired(name: &str, color: &str, desc: &str) -> DesiredLabel {
        DesiredLabel {
            name: name.to_string(),
            color: color.to_string(),
            desc: desc.to_string(),
        }
    }

    fn replace(from: &str, to: &str) -> ReplaceRule {
        ReplaceRule {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn builds_all_three_classifications() {
        let settings = LabelSettings {
            labels: vec![desired("bug", "d73a4a", "Something broken")],
            replace: vec![replace("defect", "bug")],
            ignore: vec!["won*".to_string()],
        };
        let directory = LabelDirectory::build(&settings).unwrap();

        assert_eq!(
            directory.classify("bug"),
            Some(&Classification::Managed {
                color: "d73a4a".to_string(),
                description: "Something broken".to_string(),
            })
        );
        assert_eq!(
            directory.classify("defect"),
            Some(&Classification::ReplaceSource {
                to: "bug".to_string()
            })
        );
        assert_eq!(directory.matches_ignore("wontfix"), Some("won*"));
        assert_eq!(directory.classify("unrelated"), None);
    }

    #[test]
    fn duplicate_desired_label_is_rejected() {
        let settings = LabelSettings {
            labels: vec![desired("bug", "d73a4a", ""), desired("bug", "ffffff", "")],
            ..Default::default()
        };
        let err = LabelDirectory::build(&settings).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateLabelName(name) if name == "bug"));
    }

    #[test]
    fn replace_source_clashing_with_desired_label_is_rejected() {
        let settings = LabelSettings {
            labels: vec![desired("bug", "d73a4a", ""), desired("issue", "ffffff", "")],
            replace: vec![replace("bug", "issue")],
            ..Default::default()
        };
        let err = LabelDirectory::build(&settings).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateLabelName(name) if name == "bug"));
    }

    #[test]
    fn replace_target_must_be_a_desired_label() {
        let settings = LabelSettings {
            replace: vec![replace("old", "new")],
            ..Default::default()
        };
        let err = LabelDirectory::build(&settings).unwrap_err();
        assert!(matches!(err, ConfigError::ReplaceTargetNotFound(name) if name == "new"));
    }

    #[test]
    fn replace_target_is_not_resolved_through_another_replace() {
        // `b` transitively reaches managed `c`, but single-pass validation
        // only accepts targets that are themselves managed.
        let settings = LabelSettings {
            labels: vec![desired("c", "ffffff", "")],
            replace: vec![replace("b", "c"), replace("a", "b")],
            ..Default::default()
        };
        let err = LabelDirectory::build(&settings).unwrap_err();
        assert!(matches!(err, ConfigError::ReplaceTargetNotFound(name) if name == "b"));
    }

    #[test]
    fn compiled_ignore_pattern_colliding_with_a_label_is_rejected() {
        let settings = LabelSettings {
            labels: vec![desired("bug", "d73a4a", "")],
            ignore: vec!["bug".to_string()],
            ..Default::default()
        };
        let err = LabelDirectory::build(&settings).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateLabelName(name) if name == "bug"));
    }

    #[test]
    fn ignore_patterns_are_anchored_and_literal_outside_stars() {
        let settings = LabelSettings {
            ignore: vec!["won*".to_string(), "v1.0".to_string()],
            ..Default::default()
        };
        let directory = LabelDirectory::build(&settings).unwrap();

        assert_eq!(directory.matches_ignore("wontfix"), Some("won*"));
        assert_eq!(directory.matches_ignore("won"), Some("won*"));
        assert_eq!(directory.matches_ignore("awontfix"), None);
        // The dot is literal, not a regex wildcard.
        assert_eq!(directory.matches_ignore("v1.0"), Some("v1.0"));
        assert_eq!(directory.matches_ignore("v1x0"), None);
    }

    #[test]
    fn iteration_preserves_document_order() {
        let settings = LabelSettings {
            labels: vec![
                desired("zeta", "111111", ""),
                desired("alpha", "222222", ""),
            ],
            replace: vec![replace("z-old", "zeta"), replace("a-old", "alpha")],
            ..Default::default()
        };
        let directory = LabelDirectory::build(&settings).unwrap();

        let managed: Vec<&str> = directory.managed().map(|(name, _, _)| name).collect();
        assert_eq!(managed, vec!["zeta", "alpha"]);
        let sources: Vec<&str> = directory.replace_sources().map(|(from, _)| from).collect();
        assert_eq!(sources, vec!["z-old", "a-old"]);
    }
}
