use odmiana_protocol::{ArchivedDictionary, Tag, TagIndex};

use crate::pipeline::PhraseInput;

/// Sequence tagger consulted when agreement cannot decide.
///
/// Returns one tag index per form of the phrase span.
pub trait StatisticalTagger {
    fn predict(&self, phrase: &PhraseInput) -> Vec<TagIndex>;
}

impl<F> StatisticalTagger for F
where
    F: Fn(&PhraseInput) -> Vec<TagIndex>,
{
    fn predict(&self, phrase: &PhraseInput) -> Vec<TagIndex> {
        self(phrase)
    }
}

/// Replays predictions computed ahead of time and shipped with each phrase.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrecomputedTagger;

impl StatisticalTagger for PrecomputedTagger {
    fn predict(&self, phrase: &PhraseInput) -> Vec<TagIndex> {
        phrase.predictions.clone()
    }
}

/// Tagger output index -> tag. Indices whose tag does not parse map to nothing.
#[derive(Debug, Default, Clone)]
pub struct TagTable {
    tags: Vec<Option<Tag>>,
}

impl TagTable {
    pub fn from_strings<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: tags.into_iter().map(|tag| tag.as_ref().parse().ok()).collect(),
        }
    }

    pub fn from_archive(dict: &ArchivedDictionary) -> Self {
        Self::from_strings(dict.tagset.iter().map(|tag| tag.as_str()))
    }

    pub fn tag(&self, index: TagIndex) -> Option<&Tag> {
        self.tags.get(index.index())?.as_ref()
    }

    pub fn map(&self, indices: &[TagIndex]) -> Vec<Option<Tag>> {
        indices.iter().map(|index| self.tag(*index).cloned()).collect()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
