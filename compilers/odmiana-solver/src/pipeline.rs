use std::ops::AddAssign;

use odmiana_ecs::systems::agreement::Resolution;
use odmiana_ecs::systems::repair::repair;
use odmiana_ecs::{PhraseWorld, TagDictionary};
use odmiana_morph::{classify_phrase, realize, Inflector};
use odmiana_parser::{substitute_forms, Lexer, Reassembly};
use odmiana_protocol::{CasingPolicy, Tag, TagIndex};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::lexicon::Lexicon;
use crate::tagger::{StatisticalTagger, TagTable};

/// One phrase of the corpus with everything the pipeline needs to re-inflect it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhraseInput {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub document_id: String,
    pub phrase: String,
    #[serde(default)]
    pub lemma: String,
    /// Diagnostic tag the corpus carries for the phrase.
    #[serde(default)]
    pub tag: String,
    /// Corpus forms of the phrase span, in order.
    pub forms: Vec<String>,
    /// Universal POS of each form.
    #[serde(default)]
    pub upos: Vec<String>,
    /// Statistical tagger output for the span.
    #[serde(default)]
    pub predictions: Vec<TagIndex>,
}

impl PhraseInput {
    pub fn new<S: Into<String>>(phrase: impl Into<String>, forms: impl IntoIterator<Item = S>) -> Self {
        Self {
            phrase: phrase.into(),
            forms: forms.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// How a phrase's result was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Lexicon,
    RuleBased,
    Statistical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhraseRecord {
    pub id: String,
    pub document_id: String,
    pub phrase: String,
    pub lemma: String,
    pub result: String,
    pub original_tag: String,
    /// Tags used for realization; `None` for lexicon hits, `None` slots for unmapped predictions.
    pub resolved_tags: Option<Vec<Option<String>>>,
    pub route: Route,
    /// Realized forms and token slots did not line up.
    pub partial: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub lexicon: usize,
    pub rule_based: usize,
    pub statistical: usize,
    pub partial_reassemblies: usize,
}

impl PipelineStats {
    pub fn record(&mut self, record: &PhraseRecord) {
        match record.route {
            Route::Lexicon => self.lexicon += 1,
            Route::RuleBased => self.rule_based += 1,
            Route::Statistical => self.statistical += 1,
        }
        if record.partial {
            self.partial_reassemblies += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.lexicon + self.rule_based + self.statistical
    }
}

impl AddAssign for PipelineStats {
    fn add_assign(&mut self, other: Self) {
        self.lexicon += other.lexicon;
        self.rule_based += other.rule_based;
        self.statistical += other.statistical;
        self.partial_reassemblies += other.partial_reassemblies;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    pub casing: CasingPolicy,
}

/// Lexicon fast path, then agreement, then the statistical tagger with repair.
///
/// All collaborators are borrowed read-only, so one pipeline can serve many threads.
pub struct Pipeline<'a> {
    lexicon: &'a Lexicon,
    dictionary: &'a (dyn TagDictionary + Sync),
    tagger: &'a (dyn StatisticalTagger + Sync),
    tag_table: &'a TagTable,
    inflector: &'a (dyn Inflector + Sync),
    lexer: Lexer,
    config: PipelineConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        lexicon: &'a Lexicon,
        dictionary: &'a (dyn TagDictionary + Sync),
        tagger: &'a (dyn StatisticalTagger + Sync),
        tag_table: &'a TagTable,
        inflector: &'a (dyn Inflector + Sync),
    ) -> Self {
        Self {
            lexicon,
            dictionary,
            tagger,
            tag_table,
            inflector,
            lexer: Lexer::new(),
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn process(&self, input: &PhraseInput) -> PhraseRecord {
        if let Some(result) = self.lexicon.get(&input.phrase) {
            debug!(phrase = %input.phrase, "lexicon hit");
            return self.record(input, result.to_string(), None, Route::Lexicon, false);
        }

        let (route, tags) = self.resolve_tags(input);

        let tokens = self.lexer.tokenize(&input.phrase);
        let texts: Vec<&str> = tokens.iter().map(|token| token.text).collect();
        let classes = classify_phrase(
            &texts,
            input.upos.first().map(String::as_str),
            self.config.casing,
        );
        let forms = realize(self.inflector, &texts, &tags, &classes);

        let reassembly = substitute_forms(&input.phrase, &tokens, &forms);
        if let Reassembly::Partial { filled, slots, forms, .. } = &reassembly {
            warn!(
                phrase = %input.phrase,
                filled = *filled,
                slots = *slots,
                forms = *forms,
                "realized forms do not match token slots, keeping leftover text"
            );
        }
        let partial = reassembly.is_partial();

        let resolved = tags
            .iter()
            .map(|tag| tag.as_ref().map(Tag::to_string))
            .collect();
        self.record(input, reassembly.into_text(), Some(resolved), route, partial)
    }

    /// Processes phrases on the rayon pool. Records come back in input order.
    pub fn run_batch(&self, inputs: &[PhraseInput]) -> (Vec<PhraseRecord>, PipelineStats) {
        let records: Vec<PhraseRecord> = inputs.par_iter().map(|input| self.process(input)).collect();

        let mut stats = PipelineStats::default();
        for record in &records {
            stats.record(record);
        }
        (records, stats)
    }

    fn resolve_tags(&self, input: &PhraseInput) -> (Route, Vec<Option<Tag>>) {
        let world = PhraseWorld::from_forms(input.forms.as_slice(), self.dictionary);
        match world.resolve() {
            Resolution::Resolved(tags) => {
                debug!(phrase = %input.phrase, "agreement resolved");
                (Route::RuleBased, tags.into_iter().map(Some).collect())
            }
            Resolution::Undetermined => {
                let indices = self.tagger.predict(input);
                debug!(
                    phrase = %input.phrase,
                    unknown = ?world.unknown_forms(),
                    predictions = indices.len(),
                    "falling back to tagger"
                );
                (Route::Statistical, repair(self.tag_table.map(&indices)))
            }
        }
    }

    fn record(
        &self,
        input: &PhraseInput,
        result: String,
        resolved_tags: Option<Vec<Option<String>>>,
        route: Route,
        partial: bool,
    ) -> PhraseRecord {
        PhraseRecord {
            id: input.id.clone(),
            document_id: input.document_id.clone(),
            phrase: input.phrase.clone(),
            lemma: input.lemma.clone(),
            result,
            original_tag: input.tag.clone(),
            resolved_tags,
            route,
            partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashMap};
    use odmiana_morph::{GUESSED_FORM, UNRESOLVED_FORM};
    use odmiana_protocol::PartOfSpeech;

    fn dictionary() -> HashMap<String, BTreeSet<Tag>> {
        let mut dict = HashMap::new();
        let entries: [(&str, &[&str]); 4] = [
            ("Nowy", &["adj:sg:nom:m3", "adj:sg:gen:m3"]),
            ("Jork", &["subst:sg:nom:m3"]),
            ("Polski", &["adj:sg:nom:m1:pos"]),
            ("Kraków", &["subst:sg:nom:m3", "subst:sg:acc:m3"]),
        ];
        for (form, tags) in entries {
            dict.insert(form.to_string(), tags.iter().map(|t| t.parse().unwrap()).collect());
        }
        dict
    }

    fn tag_table() -> TagTable {
        TagTable::from_strings(["adj:sg:nom:f", "subst:sg:nom:m3", "adj:sg:nom:m1:pos"])
    }

    fn identity(token: &str, _tag: &Tag) -> String {
        token.to_string()
    }

    struct UnreachableDictionary;

    impl TagDictionary for UnreachableDictionary {
        fn candidate_tags(&self, token: &str) -> BTreeSet<Tag> {
            panic!("dictionary consulted for {token}")
        }
    }

    fn unreachable_tagger(input: &PhraseInput) -> Vec<TagIndex> {
        panic!("tagger consulted for {}", input.phrase)
    }

    fn no_predictions(_: &PhraseInput) -> Vec<TagIndex> {
        Vec::new()
    }

    #[test]
    fn test_lexicon_short_circuit() {
        let lexicon: Lexicon = [("Nowy Jork".to_string(), "Nowym Jorku".to_string())].into_iter().collect();
        let table = tag_table();
        let pipeline = Pipeline::new(&lexicon, &UnreachableDictionary, &unreachable_tagger, &table, &identity);

        let record = pipeline.process(&PhraseInput::new("Nowy Jork", ["Nowy", "Jork"]));
        assert_eq!(record.result, "Nowym Jorku");
        assert_eq!(record.route, Route::Lexicon);
        assert_eq!(record.resolved_tags, None);
    }

    #[test]
    fn test_rule_based_route() {
        let lexicon = Lexicon::new();
        let dict = dictionary();
        let table = tag_table();
        let pipeline = Pipeline::new(&lexicon, &dict, &unreachable_tagger, &table, &identity);

        let record = pipeline.process(&PhraseInput::new("Nowy Jork", ["Nowy", "Jork"]));
        assert_eq!(record.result, "Nowy Jork");
        assert_eq!(record.route, Route::RuleBased);
        // Pair is (field[1], gender) = ("sg", "m3"), not ("nom", "m3")
        assert_eq!(
            record.resolved_tags,
            Some(vec![Some("adj:nom:sg:m3".to_string()), Some("subst:sg:m3".to_string())])
        );
        assert!(!record.partial);
    }

    #[test]
    fn test_non_breaking_space_keeps_tags_aligned() {
        let lexicon = Lexicon::new();
        let dict = dictionary();
        let table = tag_table();
        let locative = |token: &str, tag: &Tag| match tag.pos() {
            PartOfSpeech::Noun => format!("{}u", token.to_lowercase()),
            _ => token.to_lowercase(),
        };
        let pipeline = Pipeline::new(&lexicon, &dict, &unreachable_tagger, &table, &locative);

        let record = pipeline.process(&PhraseInput::new("Nowy\u{a0}Jork", ["Nowy", "Jork"]));
        assert_eq!(record.result, "Nowy\u{a0}Jorku");
        assert!(!record.partial);
    }

    #[test]
    fn test_statistical_route_repairs_and_substitutes() {
        let lexicon = Lexicon::new();
        let dict: HashMap<String, BTreeSet<Tag>> = HashMap::new();
        let table = tag_table();
        let tagger = |_: &PhraseInput| vec![TagIndex(0), TagIndex(1)];
        let locative = |token: &str, tag: &Tag| match tag.pos() {
            PartOfSpeech::Noun => format!("{}u", token.to_lowercase()),
            _ => UNRESOLVED_FORM.to_string(),
        };
        let pipeline = Pipeline::new(&lexicon, &dict, &tagger, &table, &locative);

        let record = pipeline.process(&PhraseInput::new("Nowy Jork", ["Nowy", "Jork"]));
        assert_eq!(record.route, Route::Statistical);
        assert_eq!(record.result, "Nowy Jorku");
        // Adjective took the noun's gender
        assert_eq!(
            record.resolved_tags,
            Some(vec![Some("adj:sg:nom:m3".to_string()), Some("subst:sg:nom:m3".to_string())])
        );
    }

    #[test]
    fn test_unmapped_prediction_keeps_token() {
        let lexicon = Lexicon::new();
        let dict: HashMap<String, BTreeSet<Tag>> = HashMap::new();
        let table = tag_table();
        let tagger = |_: &PhraseInput| vec![TagIndex(99), TagIndex(1)];
        let shout = |token: &str, _: &Tag| token.to_uppercase();
        let pipeline = Pipeline::new(&lexicon, &dict, &tagger, &table, &shout);

        let record = pipeline.process(&PhraseInput::new("nowy jork", ["nowy", "jork"]));
        // Lowercase class re-applied to the inflected form; the untagged token is left alone
        assert_eq!(record.result, "nowy jork");
        assert_eq!(record.resolved_tags, Some(vec![None, Some("subst:sg:nom:m3".to_string())]));
    }

    #[test]
    fn test_sentinel_keeps_original_token() {
        let lexicon = Lexicon::new();
        let dict = dictionary();
        let table = tag_table();
        let guessing = |_: &str, _: &Tag| GUESSED_FORM.to_string();
        let pipeline = Pipeline::new(&lexicon, &dict, &unreachable_tagger, &table, &guessing);

        let record = pipeline.process(&PhraseInput::new("Kraków", ["Kraków"]));
        assert_eq!(record.route, Route::RuleBased);
        assert_eq!(record.result, "Kraków");
    }

    #[test]
    fn test_lone_adjective_is_lowercased() {
        let lexicon = Lexicon::new();
        let dict = dictionary();
        let table = tag_table();
        let tagger = |_: &PhraseInput| vec![TagIndex(2)];
        let genitive = |_: &str, _: &Tag| "Polskiego".to_string();
        let pipeline = Pipeline::new(&lexicon, &dict, &tagger, &table, &genitive);

        let input = PhraseInput {
            upos: vec!["ADJ".to_string()],
            ..PhraseInput::new("Polski", ["Polski"])
        };
        assert_eq!(pipeline.process(&input).result, "polskiego");

        let keep_case = pipeline.with_config(PipelineConfig { casing: CasingPolicy::HYPHEN_PREFIX });
        assert_eq!(keep_case.process(&input).result, "Polskiego");
    }

    #[test]
    fn test_partial_reassembly_keeps_leftover_text() {
        let lexicon = Lexicon::new();
        let dict = dictionary();
        let table = tag_table();
        let suffixed = |token: &str, _: &Tag| format!("{}em", token.to_lowercase());
        let pipeline = Pipeline::new(&lexicon, &dict, &unreachable_tagger, &table, &suffixed);

        // Two corpus forms resolve two tags, the phrase text has three tokens
        let input = PhraseInput::new("Nowy Jork City", ["Nowy", "Jork"]);
        let record = pipeline.process(&input);
        assert!(record.partial);
        assert_eq!(record.result, "Nowyem Jorkem City");
    }

    #[test]
    fn test_run_batch_keeps_order_and_counts_routes() {
        let lexicon: Lexicon = [("Krakowie".to_string(), "Kraków".to_string())].into_iter().collect();
        let dict = dictionary();
        let table = tag_table();
        let pipeline = Pipeline::new(&lexicon, &dict, &no_predictions, &table, &identity);

        let inputs: Vec<PhraseInput> = vec![
            PhraseInput { id: "0".into(), ..PhraseInput::new("Krakowie", ["Krakowie"]) },
            PhraseInput { id: "1".into(), ..PhraseInput::new("Nowy Jork", ["Nowy", "Jork"]) },
            PhraseInput { id: "2".into(), ..PhraseInput::new("Wisła", ["Wisła"]) },
            PhraseInput { id: "3".into(), ..PhraseInput::new("Nowy Jork City", ["Nowy", "Jork"]) },
        ];

        let (records, stats) = pipeline.run_batch(&inputs);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3"]);

        assert_eq!(records[0].result, "Kraków");
        // No predictions: nothing to realize, original text survives as a partial write
        assert_eq!(records[2].result, "Wisła");

        assert_eq!(
            stats,
            PipelineStats { lexicon: 1, rule_based: 2, statistical: 1, partial_reassemblies: 2 }
        );
        assert_eq!(stats.total(), 4);
    }

    #[test]
    fn test_stats_add_assign() {
        let mut total = PipelineStats { lexicon: 1, ..Default::default() };
        total += PipelineStats { statistical: 2, partial_reassemblies: 1, ..Default::default() };
        assert_eq!(total.total(), 3);
        assert_eq!(total.partial_reassemblies, 1);
    }
}
