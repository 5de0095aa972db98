use std::collections::BTreeSet;

use hecs::World;
use odmiana_protocol::{PartOfSpeech, Tag};

use crate::components::{AgreementRole, Candidates, TokenData};

/// Separator inside a compound gender value (`m1.m2`).
pub const GENDER_SEPARATOR: char = '.';

/// Case label written into every resolved adjective tag, whatever case was agreed on.
pub const ADJECTIVE_CASE_LABEL: &str = "nom";

/// Field read as gender from adjective readings. Nouns use their last field.
const ADJECTIVE_GENDER_FIELD: usize = 3;

/// (secondary attribute, single gender)
pub type AgreementPair = (String, String);

/// Outcome of the agreement pass over one phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No consistent reading could be inferred; the caller should fall back.
    Undetermined,
    /// One tag per token, in phrase order.
    Resolved(Vec<Tag>),
}

impl Resolution {
    pub fn is_undetermined(&self) -> bool {
        matches!(self, Resolution::Undetermined)
    }

    pub fn into_tags(self) -> Option<Vec<Tag>> {
        match self {
            Resolution::Undetermined => None,
            Resolution::Resolved(tags) => Some(tags),
        }
    }
}

/// Expands compound genders: `("sg", "m1.m2")` becomes `("sg", "m1")` and `("sg", "m2")`.
pub fn split_genders<I>(pairs: I) -> BTreeSet<AgreementPair>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut split = BTreeSet::new();
    for (secondary, genders) in pairs {
        for gender in genders.split(GENDER_SEPARATOR) {
            split.insert((secondary.clone(), gender.to_string()));
        }
    }
    split
}

/// Runs agreement over every token in the world, in phrase order.
pub fn check_agreement(world: &World) -> Resolution {
    let mut query = world.query::<(&TokenData, &Candidates)>();
    let mut tokens: Vec<(usize, &Candidates)> = query
        .iter()
        .map(|(_id, (data, candidates))| (data.position, candidates))
        .collect();
    tokens.sort_by_key(|(position, _)| *position);

    resolve_candidates(tokens.into_iter().map(|(_, candidates)| &candidates.tags))
}

/// The agreement decision itself, over candidate sets in phrase order.
pub fn resolve_candidates<'a, I>(phrase: I) -> Resolution
where
    I: IntoIterator<Item = &'a BTreeSet<Tag>>,
{
    let mut roles = Vec::new();
    let mut head: Option<BTreeSet<AgreementPair>> = None;
    let mut modifiers = Vec::new();

    for candidates in phrase {
        let Some(role) = classify(candidates) else {
            return Resolution::Undetermined;
        };

        match role {
            AgreementRole::Head => {
                if head.is_some() {
                    // No unique head
                    return Resolution::Undetermined;
                }
                let Some(pairs) = agreement_pairs(candidates, role) else {
                    return Resolution::Undetermined;
                };
                head = Some(pairs);
            }
            AgreementRole::Modifier => {
                let Some(pairs) = agreement_pairs(candidates, role) else {
                    return Resolution::Undetermined;
                };
                modifiers.push(pairs);
            }
        }
        roles.push(role);
    }

    let Some(mut common) = head else {
        return Resolution::Undetermined;
    };
    for pairs in &modifiers {
        common.retain(|pair| pairs.contains(pair));
    }

    // BTreeSet iterates in lexicographic order, so the first pair is the tie-break
    let Some((secondary, gender)) = common.into_iter().next() else {
        return Resolution::Undetermined;
    };

    let tags = roles
        .into_iter()
        .map(|role| match role {
            AgreementRole::Head => Tag::new(PartOfSpeech::Noun, vec![secondary.clone(), gender.clone()]),
            AgreementRole::Modifier => Tag::new(
                PartOfSpeech::Adjective,
                vec![ADJECTIVE_CASE_LABEL.to_string(), secondary.clone(), gender.clone()],
            ),
        })
        .collect();

    Resolution::Resolved(tags)
}

fn classify(candidates: &BTreeSet<Tag>) -> Option<AgreementRole> {
    if candidates.is_empty() {
        return None;
    }
    if candidates.iter().all(|tag| *tag.pos() == PartOfSpeech::Noun) {
        Some(AgreementRole::Head)
    } else if candidates.iter().all(|tag| *tag.pos() == PartOfSpeech::Adjective) {
        Some(AgreementRole::Modifier)
    } else {
        None
    }
}

/// Gender-split pairs of all readings. `None` if a reading lacks the fields.
fn agreement_pairs(candidates: &BTreeSet<Tag>, role: AgreementRole) -> Option<BTreeSet<AgreementPair>> {
    let mut pairs = Vec::with_capacity(candidates.len());
    for tag in candidates {
        let secondary = tag.field(1)?;
        let gender = match role {
            AgreementRole::Head => tag.last_field()?,
            AgreementRole::Modifier => tag.field(ADJECTIVE_GENDER_FIELD)?,
        };
        pairs.push((secondary.to_string(), gender.to_string()));
    }
    Some(split_genders(pairs))
}
