use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use odmiana_protocol::{CasingClass, CasingPolicy};

/// Prefix of transliterated Arabic names (`al-Jork`), kept lowercase in front of a capital.
pub const HYPHEN_PREFIX: &str = "al-";

/// Universal POS label the corpus uses for adjectives.
pub const ADJECTIVE_UPOS: &str = "ADJ";

/// Infers how a single token was cased.
pub fn classify_token(token: &str, policy: CasingPolicy) -> CasingClass {
    let first = match token.chars().next() {
        Some(c) => c,
        None => return CasingClass::Unknown,
    };

    if first.is_uppercase() {
        return CasingClass::Capitalized;
    }

    if policy.contains(CasingPolicy::HYPHEN_PREFIX) {
        let capital_follows = token
            .strip_prefix(HYPHEN_PREFIX)
            .and_then(|rest| rest.chars().next())
            .is_some_and(char::is_uppercase);
        if capital_follows {
            return CasingClass::HyphenPrefixedCapital;
        }
    }

    if first.is_lowercase() {
        CasingClass::Lowercase
    } else {
        CasingClass::Unknown
    }
}

/// Classifies every token of a phrase.
///
/// `first_upos` is the corpus part of speech of the phrase's first form. A phrase that is a
/// single adjective is forced to lowercase when the policy asks for it.
pub fn classify_phrase<S: AsRef<str>>(
    tokens: &[S],
    first_upos: Option<&str>,
    policy: CasingPolicy,
) -> Vec<CasingClass> {
    if policy.contains(CasingPolicy::LONE_ADJECTIVE_LOWERCASE)
        && tokens.len() == 1
        && first_upos == Some(ADJECTIVE_UPOS)
    {
        return vec![CasingClass::Lowercase];
    }

    tokens
        .iter()
        .map(|token| classify_token(token.as_ref(), policy))
        .collect()
}

/// Re-applies a casing class to a generated form.
pub fn apply_casing(form: &str, class: CasingClass) -> String {
    match class {
        CasingClass::Capitalized => {
            let mut chars = form.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        CasingClass::HyphenPrefixedCapital => {
            let mut chars = form.chars();
            let prefix: String = chars.by_ref().take(3).collect();
            match chars.next() {
                Some(fourth) => {
                    let mut out = prefix;
                    out.extend(fourth.to_uppercase());
                    out.extend(chars);
                    out
                }
                // Too short to carry a capital after the prefix
                None => prefix,
            }
        }
        CasingClass::Lowercase => form.to_lowercase(),
        CasingClass::Unknown => form.to_string(),
    }
}
