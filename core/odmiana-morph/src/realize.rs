use alloc::string::{String, ToString};
use alloc::vec::Vec;

use odmiana_protocol::{CasingClass, Tag};

use crate::casing::apply_casing;

/// Inflector output meaning "no form could be produced".
pub const UNRESOLVED_FORM: &str = "?";
/// Inflector output meaning "a form was guessed but must not be used".
pub const GUESSED_FORM: &str = "<guessed-form>";

/// Turns a token into the surface form carrying `tag`.
///
/// Failure is reported in-band through [`UNRESOLVED_FORM`] or [`GUESSED_FORM`].
pub trait Inflector {
    fn inflect(&self, token: &str, tag: &Tag) -> String;
}

impl<F> Inflector for F
where
    F: Fn(&str, &Tag) -> String,
{
    fn inflect(&self, token: &str, tag: &Tag) -> String {
        self(token, tag)
    }
}

pub fn is_failure_sentinel(form: &str) -> bool {
    form == UNRESOLVED_FORM || form == GUESSED_FORM
}

/// Realizes one token. Without a tag, or when the inflector fails, the original
/// token comes back verbatim and is never re-cased.
pub fn realize_token<I: Inflector + ?Sized>(
    inflector: &I,
    token: &str,
    tag: Option<&Tag>,
    class: CasingClass,
) -> String {
    let Some(tag) = tag else {
        return token.to_string();
    };

    let form = inflector.inflect(token, tag);
    if is_failure_sentinel(&form) {
        return token.to_string();
    }

    let cased = apply_casing(&form, class);
    if is_failure_sentinel(&cased) {
        return token.to_string();
    }
    cased
}

/// Realizes a phrase position by position. Stops at the shortest of the three inputs.
pub fn realize<I, S>(
    inflector: &I,
    tokens: &[S],
    tags: &[Option<Tag>],
    classes: &[CasingClass],
) -> Vec<String>
where
    I: Inflector + ?Sized,
    S: AsRef<str>,
{
    tokens
        .iter()
        .zip(tags)
        .zip(classes)
        .map(|((token, tag), class)| realize_token(inflector, token.as_ref(), tag.as_ref(), *class))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> Tag {
        s.parse().unwrap()
    }

    fn identity(token: &str, _tag: &Tag) -> String {
        token.to_string()
    }

    #[test]
    fn test_sentinels_fall_back_to_original() {
        let guessed = |_: &str, _: &Tag| GUESSED_FORM.to_string();
        let unresolved = |_: &str, _: &Tag| UNRESOLVED_FORM.to_string();
        let t = tag("subst:sg:m3");

        assert_eq!(realize_token(&guessed, "Kraków", Some(&t), CasingClass::Capitalized), "Kraków");
        assert_eq!(realize_token(&unresolved, "Kraków", Some(&t), CasingClass::Lowercase), "Kraków");
        // Sentinel is detected before casing, so the hyphen rule cannot disguise it
        assert_eq!(
            realize_token(&guessed, "al-Jork", Some(&t), CasingClass::HyphenPrefixedCapital),
            "al-Jork"
        );
    }

    #[test]
    fn test_sentinel_produced_by_casing_falls_back() {
        let shouting = |_: &str, _: &Tag| "<GUESSED-FORM>".to_string();
        let t = tag("subst:sg:m3");
        assert_eq!(realize_token(&shouting, "dom", Some(&t), CasingClass::Lowercase), "dom");
    }

    #[test]
    fn test_missing_tag_keeps_token() {
        let shouting = |token: &str, _: &Tag| token.to_uppercase();
        assert_eq!(realize_token(&shouting, "Jork", None, CasingClass::Lowercase), "Jork");
    }

    #[test]
    fn test_casing_applies_to_inflected_form() {
        let locative = |_: &str, _: &Tag| "jorku".to_string();
        let t = tag("subst:sg:loc:m3");
        assert_eq!(realize_token(&locative, "Jork", Some(&t), CasingClass::Capitalized), "Jorku");
        assert_eq!(
            realize_token(&locative, "Jork", Some(&t), CasingClass::HyphenPrefixedCapital),
            "jorKu"
        );
    }

    #[test]
    fn test_realize_phrase() {
        let tokens = ["Nowy", "Jork"];
        let tags = [Some(tag("adj:nom:sg:m3")), Some(tag("subst:sg:m3"))];
        let classes = [CasingClass::Capitalized, CasingClass::Capitalized];

        assert_eq!(realize(&identity, &tokens, &tags, &classes), vec!["Nowy", "Jork"]);
    }

    #[test]
    fn test_realize_truncates_to_shortest_input() {
        let tokens = ["Nowy", "Jork", "City"];
        let tags = [Some(tag("adj:nom:sg:m3")), Some(tag("subst:sg:m3"))];
        let classes = [CasingClass::Capitalized; 3];

        assert_eq!(realize(&identity, &tokens, &tags, &classes).len(), 2);
    }

    #[test]
    fn test_trait_object_inflector() {
        let inflector: &dyn Inflector = &identity;
        let out = realize_token(inflector, "dom", Some(&tag("subst:sg:m3")), CasingClass::Capitalized);
        assert_eq!(out, "Dom");
    }
}
