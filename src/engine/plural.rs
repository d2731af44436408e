//! Plural surface forms
//!
//! Derives exactly one plural candidate per token from a fixed cascade of
//! suffix rules. The first rule whose ending matches wins; classical
//! endings are listed before the generic English ones so that
//! `nucleus -> nuclei` is produced instead of `nucleuses`.

/// How a rule recognises the end of a token
enum Ending {
    /// Any of these literal (ASCII) suffixes
    Any(&'static [&'static str]),
    /// `y` preceded by something other than a vowel
    ConsonantY,
}

/// A single suffix rule: drop `strip` trailing bytes, then add `append`
struct Rule {
    ending: Ending,
    strip: usize,
    append: &'static str,
}

const RULES: &[Rule] = &[
    Rule { ending: Ending::Any(&["us"]), strip: 2, append: "i" },
    Rule { ending: Ending::Any(&["um"]), strip: 2, append: "a" },
    Rule { ending: Ending::Any(&["on"]), strip: 2, append: "a" },
    Rule { ending: Ending::Any(&["ex", "ix"]), strip: 2, append: "ices" },
    Rule { ending: Ending::Any(&["is"]), strip: 2, append: "es" },
    Rule { ending: Ending::Any(&["ma"]), strip: 2, append: "mata" },
    Rule { ending: Ending::Any(&["men"]), strip: 3, append: "mina" },
    Rule { ending: Ending::Any(&["x"]), strip: 1, append: "ces" },
    Rule { ending: Ending::ConsonantY, strip: 1, append: "ies" },
    Rule { ending: Ending::Any(&["s", "x", "z", "ch", "sh"]), strip: 0, append: "es" },
];

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// A token together with its rule-derived plural
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralForms {
    pub singular: String,
    pub plural: String,
}

impl PluralForms {
    /// Compute the plural candidate for `token`
    ///
    /// Suffixes are tested case-insensitively when `case_insensitive` is
    /// set; the candidate always keeps the token's own casing for the
    /// retained stem.
    pub fn of(token: &str, case_insensitive: bool) -> Self {
        let plural = RULES
            .iter()
            .find(|rule| rule.matches(token, case_insensitive))
            .map(|rule| format!("{}{}", &token[..token.len() - rule.strip], rule.append))
            .unwrap_or_else(|| format!("{}s", token));

        Self {
            singular: token.to_string(),
            plural,
        }
    }

    /// Regex alternation matching either form literally
    pub fn pattern(&self) -> String {
        format!(
            "(?:{}|{})",
            fancy_regex::escape(&self.singular),
            fancy_regex::escape(&self.plural)
        )
    }
}

impl Rule {
    fn matches(&self, token: &str, case_insensitive: bool) -> bool {
        match self.ending {
            Ending::Any(suffixes) => suffixes
                .iter()
                .any(|suffix| ends_with(token, suffix, case_insensitive)),
            Ending::ConsonantY => {
                let mut rev = token.chars().rev();
                let last = rev.next();
                let before = rev.next();
                let is_y = match last {
                    Some('y') => true,
                    Some('Y') => case_insensitive,
                    _ => false,
                };
                let consonant = before.is_some_and(|c| {
                    let c = if case_insensitive { c.to_ascii_lowercase() } else { c };
                    !VOWELS.contains(&c)
                });
                is_y && consonant
            }
        }
    }
}

/// ASCII suffix test that never slices through a multi-byte character
fn ends_with(token: &str, suffix: &str, case_insensitive: bool) -> bool {
    let Some(start) = token.len().checked_sub(suffix.len()) else {
        return false;
    };
    if !token.is_char_boundary(start) {
        return false;
    }
    let tail = &token[start..];
    if case_insensitive {
        tail.eq_ignore_ascii_case(suffix)
    } else {
        tail == suffix
    }
}
