use rkyv::{Archive, Deserialize, Serialize};
use crate::ids::TagIndex;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// One analysis of a surface form: `form` is an inflection of `lemma` carrying `tag`.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct DictEntry {
    pub form: String,
    pub lemma: String,
    pub tag: String,
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Dictionary {
    pub version: u32,
    pub entries: Vec<DictEntry>,
    /// Tag strings indexed by the statistical tagger's output indices.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tagset: Vec<String>,
}

impl Dictionary {
    pub fn tag_string(&self, index: TagIndex) -> Option<&str> {
        self.tagset.get(index.index()).map(String::as_str)
    }
}

impl ArchivedDictionary {
    pub fn tag_string(&self, index: TagIndex) -> Option<&str> {
        self.tagset.get(index.index()).map(|s| s.as_str())
    }
}
