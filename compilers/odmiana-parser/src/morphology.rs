use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use odmiana_ecs::TagDictionary;
use odmiana_morph::{Inflector, UNRESOLVED_FORM};
use odmiana_protocol::{ArchivedDictEntry, Dictionary, EntryId, Tag};
use rkyv::{AlignedVec, Archived};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary archive {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("dictionary archive failed validation")]
    InvalidArchive,
}

/// Owned bytes of a compiled dictionary, validated once on load.
pub struct DictionaryArchive {
    bytes: AlignedVec,
}

impl DictionaryArchive {
    pub fn open(path: &Path) -> Result<Self, DictionaryError> {
        let raw = fs::read(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&raw)
    }

    pub fn from_bytes(raw: &[u8]) -> Result<Self, DictionaryError> {
        // rkyv needs the root aligned, a plain Vec<u8> does not guarantee that
        let mut bytes = AlignedVec::with_capacity(raw.len());
        bytes.extend_from_slice(raw);

        rkyv::check_archived_root::<Dictionary>(&bytes).map_err(|_| DictionaryError::InvalidArchive)?;
        Ok(Self { bytes })
    }

    pub fn dictionary(&self) -> &Archived<Dictionary> {
        // SAFETY: the bytes passed check_archived_root in from_bytes and are never mutated
        unsafe { rkyv::archived_root::<Dictionary>(&self.bytes) }
    }
}

/// Form and lemma indexes over an archived dictionary.
///
/// Serves both directions: analysis (form -> tags) for agreement and generation
/// (form + tag -> form of the same lemma) for realization.
pub struct Analyzer<'a> {
    dict: &'a Archived<Dictionary>,
    by_form: HashMap<&'a str, Vec<EntryId>>,
    by_lemma: HashMap<&'a str, Vec<EntryId>>,
}

impl<'a> Analyzer<'a> {
    pub fn new(dict: &'a Archived<Dictionary>) -> Self {
        let mut by_form: HashMap<&'a str, Vec<EntryId>> = HashMap::new();
        let mut by_lemma: HashMap<&'a str, Vec<EntryId>> = HashMap::new();

        for (i, entry) in dict.entries.iter().enumerate() {
            let id = EntryId(i as u32);
            by_form.entry(entry.form.as_str()).or_default().push(id);
            by_lemma.entry(entry.lemma.as_str()).or_default().push(id);
        }

        Self { dict, by_form, by_lemma }
    }

    fn entry(&self, id: EntryId) -> &'a ArchivedDictEntry {
        &self.dict.entries[id.index()]
    }

    /// Entries for a surface form; the lowercased form is tried when the exact one is unknown.
    pub fn analyses(&self, form: &str) -> impl Iterator<Item = &'a ArchivedDictEntry> + '_ {
        let ids = match self.by_form.get(form) {
            Some(ids) => ids.as_slice(),
            None => self
                .by_form
                .get(form.to_lowercase().as_str())
                .map(Vec::as_slice)
                .unwrap_or_default(),
        };
        ids.iter().map(|id| self.entry(*id))
    }

    /// Lemmas a surface form may belong to, in sorted order.
    pub fn lemmas(&self, form: &str) -> BTreeSet<&'a str> {
        self.analyses(form).map(|entry| entry.lemma.as_str()).collect()
    }

    /// Form of `lemma` whose tag is exactly `tag`.
    pub fn generate(&self, lemma: &str, tag: &Tag) -> Option<&'a str> {
        let wanted = tag.to_string();
        self.by_lemma
            .get(lemma)?
            .iter()
            .map(|id| self.entry(*id))
            .find(|entry| entry.tag.as_str() == wanted)
            .map(|entry| entry.form.as_str())
    }
}

impl TagDictionary for Analyzer<'_> {
    fn candidate_tags(&self, token: &str) -> BTreeSet<Tag> {
        // Unparsable tags in the archive are not readings
        self.analyses(token)
            .filter_map(|entry| entry.tag.as_str().parse().ok())
            .collect()
    }
}

impl Inflector for Analyzer<'_> {
    fn inflect(&self, token: &str, tag: &Tag) -> String {
        self.lemmas(token)
            .into_iter()
            .find_map(|lemma| self.generate(lemma, tag))
            .unwrap_or(UNRESOLVED_FORM)
            .to_string()
    }
}
