use std::collections::BTreeSet;

use odmiana_protocol::Tag;

/// Basic data about the token (Source of Truth)
#[derive(Debug, Clone)]
pub struct TokenData {
    pub text: String,
    /// Index of the token in its phrase. Entity order in the world is not phrase order.
    pub position: usize,
}

/// Every reading the dictionary allows for the token. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    pub tags: BTreeSet<Tag>,
}

impl Candidates {
    pub fn new(tags: BTreeSet<Tag>) -> Self {
        Self { tags }
    }
}

/// Agreement role a token can play in a noun-headed phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgreementRole {
    /// All readings are nouns; the phrase head.
    Head,
    /// All readings are adjectives.
    Modifier,
}
