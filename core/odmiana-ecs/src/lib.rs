pub mod components;
pub mod systems;

use std::collections::{BTreeSet, HashMap};

use hecs::{Entity, World};
use odmiana_protocol::Tag;

use components::{Candidates, TokenData};
use systems::agreement::{check_agreement, Resolution};

/// Morphological lookup: every tag the dictionary allows for a surface form.
///
/// An empty set is a meaningful answer ("no known reading").
pub trait TagDictionary {
    fn candidate_tags(&self, token: &str) -> BTreeSet<Tag>;
}

impl TagDictionary for HashMap<String, BTreeSet<Tag>> {
    fn candidate_tags(&self, token: &str) -> BTreeSet<Tag> {
        self.get(token).cloned().unwrap_or_default()
    }
}

/// The tokens of one phrase, each an entity with its dictionary readings.
pub struct PhraseWorld {
    world: World,
    len: usize,
}

impl Default for PhraseWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhraseWorld {
    pub fn new() -> Self {
        Self { world: World::new(), len: 0 }
    }

    /// Spawns every form with the readings `dictionary` gives it.
    pub fn from_forms<S, D>(forms: &[S], dictionary: &D) -> Self
    where
        S: AsRef<str>,
        D: TagDictionary + ?Sized,
    {
        let mut world = Self::new();
        for form in forms {
            let form = form.as_ref();
            world.add_token(form.to_string(), dictionary.candidate_tags(form));
        }
        world
    }

    /// Add the next token of the phrase
    pub fn add_token(&mut self, text: String, candidates: BTreeSet<Tag>) -> Entity {
        self.insert_token(text, self.len, candidates)
    }

    /// Add a token at an explicit phrase position.
    pub fn insert_token(&mut self, text: String, position: usize, candidates: BTreeSet<Tag>) -> Entity {
        self.len = self.len.max(position + 1);
        self.world.spawn((TokenData { text, position }, Candidates::new(candidates)))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Forms the dictionary has no reading for, in phrase order.
    pub fn unknown_forms(&self) -> Vec<String> {
        let mut query = self.world.query::<(&TokenData, &Candidates)>();
        let mut unknown: Vec<(usize, String)> = query
            .iter()
            .filter(|(_id, (_, candidates))| candidates.tags.is_empty())
            .map(|(_id, (data, _))| (data.position, data.text.clone()))
            .collect();
        unknown.sort_by_key(|(position, _)| *position);
        unknown.into_iter().map(|(_, text)| text).collect()
    }

    /// Run the agreement system over the phrase
    pub fn resolve(&self) -> Resolution {
        check_agreement(&self.world)
    }
}
