pub mod lexicon;
pub mod pipeline;
pub mod tagger;

pub use lexicon::{Lexicon, LexiconError, LEXICON_SEPARATOR};
pub use pipeline::{
    Pipeline, PipelineConfig, PipelineStats, PhraseInput, PhraseRecord, Route,
};
pub use tagger::{PrecomputedTagger, StatisticalTagger, TagTable};
