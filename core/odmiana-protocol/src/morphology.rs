use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use bitflags::bitflags;

/// Separator between the fields of a serialized tag (`subst:sg:nom:m3`).
pub const FIELD_SEPARATOR: char = ':';

/// Part of speech, read from field 0 of a tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartOfSpeech {
    /// `subst`
    Noun,
    /// `adj`
    Adjective,
    /// Any other category, kept verbatim so the tag prints back unchanged.
    Other(String),
}

impl PartOfSpeech {
    pub const NOUN_LABEL: &'static str = "subst";
    pub const ADJECTIVE_LABEL: &'static str = "adj";

    pub fn from_label(label: &str) -> Self {
        match label {
            Self::NOUN_LABEL => PartOfSpeech::Noun,
            Self::ADJECTIVE_LABEL => PartOfSpeech::Adjective,
            other => PartOfSpeech::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PartOfSpeech::Noun => Self::NOUN_LABEL,
            PartOfSpeech::Adjective => Self::ADJECTIVE_LABEL,
            PartOfSpeech::Other(label) => label.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    Empty,
    EmptyField { position: usize },
}

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagError::Empty => write!(f, "empty tag"),
            TagError::EmptyField { position } => write!(f, "empty tag field at position {}", position),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TagError {}

/// A morphological tag: part of speech plus the ordered attribute fields that follow it.
///
/// Field positions are what carry meaning (number, case, gender, ...), so fields are
/// addressed by index. Index 0 is the part of speech, matching the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    pos: PartOfSpeech,
    attributes: Vec<String>,
}

impl Tag {
    pub fn new(pos: PartOfSpeech, attributes: Vec<String>) -> Self {
        Self { pos, attributes }
    }

    pub fn pos(&self) -> &PartOfSpeech {
        &self.pos
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Number of fields including the part of speech.
    pub fn field_count(&self) -> usize {
        self.attributes.len() + 1
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(self.pos.label()),
            n => self.attributes.get(n - 1).map(String::as_str),
        }
    }

    /// Last attribute field. A bare part-of-speech tag has none.
    pub fn last_field(&self) -> Option<&str> {
        self.attributes.last().map(String::as_str)
    }

    /// Copy of this tag with its last attribute replaced.
    /// A bare part-of-speech tag is returned unchanged.
    pub fn with_last_field(&self, value: &str) -> Tag {
        let mut tag = self.clone();
        if let Some(last) = tag.attributes.last_mut() {
            *last = value.to_string();
        }
        tag
    }
}

impl FromStr for Tag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TagError::Empty);
        }

        let mut parts = s.split(FIELD_SEPARATOR);
        let pos = match parts.next() {
            Some(label) if !label.is_empty() => PartOfSpeech::from_label(label),
            _ => return Err(TagError::EmptyField { position: 0 }),
        };

        let mut attributes = Vec::new();
        for (i, field) in parts.enumerate() {
            if field.is_empty() {
                return Err(TagError::EmptyField { position: i + 1 });
            }
            attributes.push(field.to_string());
        }

        Ok(Tag { pos, attributes })
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pos.label())?;
        for field in &self.attributes {
            write!(f, "{}{}", FIELD_SEPARATOR, field)?;
        }
        Ok(())
    }
}

/// How a token was cased in the source phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub enum CasingClass {
    /// First letter uppercase (`Kraków`).
    Capitalized,
    /// Literal `al-` prefix followed by an uppercase letter (`al-Jork`).
    HyphenPrefixedCapital,
    /// First letter lowercase.
    Lowercase,
    /// Anything else (digits, punctuation); left untouched.
    Unknown,
}

bitflags! {
    /// Corpus-specific casing heuristics that can be switched off.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct CasingPolicy: u8 {
        /// Recognise `al-X` as a hyphen-prefixed capital.
        const HYPHEN_PREFIX = 1;
        /// Force a one-token adjectival phrase to lowercase.
        const LONE_ADJECTIVE_LOWERCASE = 2;
    }
}

impl Default for CasingPolicy {
    fn default() -> Self {
        CasingPolicy::all()
    }
}
