#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod casing;
pub mod realize;

pub use casing::{apply_casing, classify_phrase, classify_token, HYPHEN_PREFIX};
pub use realize::{
    is_failure_sentinel, realize, realize_token, Inflector, GUESSED_FORM, UNRESOLVED_FORM,
};
