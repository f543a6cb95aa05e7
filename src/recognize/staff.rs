use std::collections::HashMap;

use strsim::normalized_levenshtein;
use unicode_normalization::UnicodeNormalization;

use crate::registry::StaffRegistry;

const R_SUFFIX: &str = "(R)";
const MIN_TOKEN_CHARS: usize = 3;
const MIN_FUZZY_CHARS: usize = 5;

/// Structural words that show up in roster tables but are never names.
static EXCLUDED_TOKENS: &[&str] = &[
    "SHIFT", "DUTY", "DATE", "TIME", "DAY", "STAFF", "NAME", "TYPE", "REMARKS", "REMARK", "EDITED",
];

/// Registry index entry for one base name: the plain form and the `(R)` form,
/// each stored as the registry spelled it.
#[derive(Debug, Default, Clone)]
struct BaseForms {
    plain: Option<String>,
    relief: Option<String>,
}

/// Resolves raw tokens to canonical staff names.
///
/// Built per import from the registry. Holds no state beyond its indexes.
#[derive(Debug, Clone)]
pub struct StaffMatcher {
    exact: HashMap<String, String>,
    by_base: HashMap<String, BaseForms>,
    fuzzy_threshold: Option<f64>,
}

impl StaffMatcher {
    pub fn new(registry: &dyn StaffRegistry, fuzzy_threshold: Option<f64>) -> Self {
        let mut exact = HashMap::new();
        let mut by_base: HashMap<String, BaseForms> = HashMap::new();

        for name in registry.names() {
            let normalized = normalize(name);
            if normalized.is_empty() {
                continue;
            }
            exact.entry(normalized.clone()).or_insert_with(|| name.clone());

            let (base, relief) = split_suffix(&normalized);
            let forms = by_base.entry(base.to_string()).or_default();
            let slot = if relief {
                &mut forms.relief
            } else {
                &mut forms.plain
            };
            slot.get_or_insert_with(|| name.clone());
        }

        Self {
            exact,
            by_base,
            fuzzy_threshold,
        }
    }

    /// Returns the registry spelling of the staff member the token names.
    pub fn match_name(&self, text: &str) -> Option<&str> {
        let token = normalize(text);
        if is_excluded(&token) {
            return None;
        }

        if let Some(name) = self.exact.get(&token) {
            return Some(name.as_str());
        }

        let (base, relief) = split_suffix(&token);
        if let Some(forms) = self.by_base.get(base) {
            // Only the form the token asked for; the other one is a different identity.
            return if relief {
                forms.relief.as_deref()
            } else {
                forms.plain.as_deref()
            };
        }

        self.fuzzy_match(base, relief)
    }

    pub fn is_staff(&self, text: &str) -> bool {
        self.match_name(text).is_some()
    }

    fn fuzzy_match(&self, base: &str, relief: bool) -> Option<&str> {
        let threshold = self.fuzzy_threshold?;
        if base.chars().count() < MIN_FUZZY_CHARS {
            return None;
        }

        let mut best: Option<(f64, &str)> = None;
        let mut tied = false;

        for (candidate, forms) in &self.by_base {
            let target = if relief { &forms.relief } else { &forms.plain };
            let Some(target) = target.as_deref() else {
                continue;
            };

            let score = normalized_levenshtein(base, candidate);
            if score < threshold {
                continue;
            }
            match best {
                Some((best_score, _)) if score < best_score => {}
                Some((best_score, best_name)) if score == best_score => {
                    if best_name != target {
                        tied = true;
                    }
                }
                _ => {
                    best = Some((score, target));
                    tied = false;
                }
            }
        }

        if tied {
            tracing::debug!(token = base, "ambiguous fuzzy staff match");
            return None;
        }
        best.map(|(_, name)| name)
    }
}

/// NFKC, trim, collapse whitespace, upper-case, and tighten a trailing `( R )`.
pub fn normalize(text: &str) -> String {
    let folded: String = text.nfkc().collect();
    let collapsed = folded.split_whitespace().collect::<Vec<_>>().join(" ");
    let upper = collapsed.to_uppercase();

    match strip_loose_suffix(&upper) {
        Some(base) => format!("{base}{R_SUFFIX}"),
        None => upper,
    }
}

/// Recognizes `(R)`, `( R )` and `(R )` at the end, returning the trimmed base.
fn strip_loose_suffix(upper: &str) -> Option<&str> {
    let rest = upper.strip_suffix(')')?.trim_end();
    let rest = rest.strip_suffix('R')?.trim_end();
    let rest = rest.strip_suffix('(')?;
    let base = rest.trim_end();
    (!base.is_empty()).then_some(base)
}

fn split_suffix(normalized: &str) -> (&str, bool) {
    match normalized.strip_suffix(R_SUFFIX) {
        Some(base) => (base.trim_end(), true),
        None => (normalized, false),
    }
}

fn is_excluded(token: &str) -> bool {
    if token.chars().count() < MIN_TOKEN_CHARS {
        return true;
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    EXCLUDED_TOKENS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_tightens_suffix() {
        assert_eq!(normalize("  Narayya ( r ) "), "NARAYYA(R)");
        assert_eq!(normalize("narayya"), "NARAYYA");
        assert_eq!(normalize("Mary   Jane"), "MARY JANE");
    }

    #[test]
    fn bare_suffix_is_not_a_name() {
        assert_eq!(normalize("(R)"), "(R)");
        assert!(is_excluded("12345"));
        assert!(is_excluded("SHIFT"));
        assert!(!is_excluded("RAM"));
    }
}
