use odmiana_protocol::{PartOfSpeech, Tag};

/// Consistency pass over statistical tagger output.
///
/// With exactly one noun in the phrase, every adjective takes the noun's last field
/// (gender). Otherwise the tags are returned unchanged. Empty slots are skipped.
pub fn repair(tags: Vec<Option<Tag>>) -> Vec<Option<Tag>> {
    let mut nouns = tags
        .iter()
        .flatten()
        .filter(|tag| *tag.pos() == PartOfSpeech::Noun);

    let gender = match (nouns.next(), nouns.next()) {
        (Some(noun), None) => noun.last_field().map(str::to_string),
        _ => None,
    };
    let Some(gender) = gender else {
        return tags;
    };

    tags.into_iter()
        .map(|slot| {
            slot.map(|tag| match tag.pos() {
                PartOfSpeech::Adjective => tag.with_last_field(&gender),
                PartOfSpeech::Noun | PartOfSpeech::Other(_) => tag,
            })
        })
        .collect()
}
