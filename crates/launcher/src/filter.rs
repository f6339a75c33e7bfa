use regex::Regex;

#[derive(Debug, Clone)]
enum IncludeRule {
    Wildcard(Regex),
    Substring(String),
}

/// Configured allow-list restricting which discovered package ids and
/// archive names are surfaced. An empty rule set admits everything.
#[derive(Debug, Clone, Default)]
pub struct InclusionFilter {
    rules: Vec<IncludeRule>,
}

impl InclusionFilter {
    pub fn from_patterns(patterns: &[String]) -> Self {
        let rules = patterns
            .iter()
            .map(|pattern| pattern.trim().to_ascii_lowercase())
            .filter(|pattern| !pattern.is_empty())
            .filter_map(|pattern| {
                if pattern.contains('*') || pattern.contains('?') {
                    return wildcard_to_regex(pattern.as_str()).map(IncludeRule::Wildcard);
                }
                Some(IncludeRule::Substring(pattern))
            })
            .collect();
        Self { rules }
    }

    pub fn admits(&self, name: &str) -> bool {
        if self.rules.is_empty() {
            return true;
        }
        let lowered = name.to_ascii_lowercase();
        self.rules.iter().any(|rule| match rule {
            IncludeRule::Wildcard(regex) => regex.is_match(lowered.as_str()),
            IncludeRule::Substring(needle) => lowered.contains(needle.as_str()),
        })
    }
}

fn wildcard_to_regex(pattern: &str) -> Option<Regex> {
    let mut regex = String::from("^");
    for ch in pattern.chars() {
        match ch {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            '\\' | '.' | '+' | '(' | ')' | '{' | '}' | '[' | ']' | '^' | '$' | '|' => {
                regex.push('\\');
                regex.push(ch);
            }
            _ => regex.push(ch),
        }
    }
    regex.push('$');
    Regex::new(regex.as_str()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(patterns: &[&str]) -> InclusionFilter {
        let patterns: Vec<String> = patterns.iter().map(|value| value.to_string()).collect();
        InclusionFilter::from_patterns(patterns.as_slice())
    }

    #[test]
    fn should_admit_everything_without_patterns() {
        assert!(filter(&[]).admits("com.anything.at.all"));
    }

    #[test]
    fn should_match_plain_patterns_as_substrings_case_insensitive() {
        let filter = filter(&["leclick"]);
        assert!(filter.admits("be.LeClick.demoa"));
        assert!(!filter.admits("com.whatsapp"));
    }

    #[test]
    fn should_anchor_wildcard_patterns() {
        let filter = filter(&["demo*"]);
        assert!(filter.admits("demoapp"));
        assert!(!filter.admits("mydemoapp"));
    }

    #[test]
    fn should_escape_regex_meta_chars_in_wildcards() {
        let filter = filter(&["be.leclick.*"]);
        assert!(filter.admits("be.leclick.demoa"));
        assert!(!filter.admits("beXleclickXdemoa"));
    }

    #[test]
    fn should_admit_when_any_pattern_matches() {
        let filter = filter(&["whatsapp", "leclick"]);
        assert!(filter.admits("com.whatsapp"));
        assert!(filter.admits("be.leclick.demoa"));
        assert!(!filter.admits("com.android.settings"));
    }
}
