use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use odmiana_parser::{Analyzer, DictionaryArchive};
use odmiana_protocol::{CasingPolicy, Dictionary};
use odmiana_solver::{
    Lexicon, PhraseInput, PhraseRecord, Pipeline, PipelineConfig, PrecomputedTagger, TagTable,
};
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Re-inflects multi-word phrases")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compiles a JSON dictionary to an rkyv binary
    Compile {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Runs a JSON-lines corpus through the pipeline
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Compiled dictionary (see `compile`)
    #[arg(short, long, value_name = "FILE")]
    dictionary: PathBuf,

    /// Precomputed `phrase --- result` pairs
    #[arg(short, long, value_name = "FILE")]
    lexicon: Option<PathBuf>,

    /// Corpus phrases, one JSON object per line
    #[arg(long, value_name = "FILE")]
    data: PathBuf,

    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Write full JSON records instead of TSV
    #[arg(long)]
    json: bool,

    /// Do not treat `al-X` as a hyphen-prefixed capital
    #[arg(long)]
    no_hyphen_prefix: bool,

    /// Do not lowercase phrases made of a single adjective
    #[arg(long)]
    no_lone_adjective_lowercase: bool,
}

impl RunArgs {
    fn config(&self) -> PipelineConfig {
        let mut casing = CasingPolicy::default();
        casing.set(CasingPolicy::HYPHEN_PREFIX, !self.no_hyphen_prefix);
        casing.set(CasingPolicy::LONE_ADJECTIVE_LOWERCASE, !self.no_lone_adjective_lowercase);
        PipelineConfig { casing }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Compile { input, output } => compile(&input, &output),
        Command::Run(args) => run(&args),
    }
}

fn compile(input: &Path, output: &Path) -> anyhow::Result<()> {
    info!("Reading JSON from {:?}...", input);
    let input_data = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;

    let dict: Dictionary = serde_json::from_str(&input_data)
        .with_context(|| format!("parsing dictionary {}", input.display()))?;

    info!(
        "Compiling dictionary version {} with {} entries and {} tagger tags...",
        dict.version,
        dict.entries.len(),
        dict.tagset.len()
    );

    let mut serializer = AllocSerializer::<256>::default();
    serializer
        .serialize_value(&dict)
        .map_err(|e| anyhow::anyhow!("rkyv serialization failed: {:?}", e))?;
    let bytes = serializer.into_serializer().into_inner();

    fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;

    info!("Binary written to {:?}", output);
    Ok(())
}

fn run(args: &RunArgs) -> anyhow::Result<()> {
    let archive = DictionaryArchive::open(&args.dictionary)?;
    let analyzer = Analyzer::new(archive.dictionary());
    let tag_table = TagTable::from_archive(archive.dictionary());
    info!(tags = tag_table.len(), "dictionary loaded from {:?}", args.dictionary);

    let lexicon = match &args.lexicon {
        Some(path) => Lexicon::load(path)?,
        None => Lexicon::new(),
    };
    info!(entries = lexicon.len(), "lexicon ready");

    let inputs = read_corpus(&args.data)?;

    let pipeline = Pipeline::new(&lexicon, &analyzer, &PrecomputedTagger, &tag_table, &analyzer)
        .with_config(args.config());
    let (records, stats) = pipeline.run_batch(&inputs);

    write_records(&args.output, &records, args.json)?;

    info!(
        total = stats.total(),
        lexicon = stats.lexicon,
        rule_based = stats.rule_based,
        statistical = stats.statistical,
        partial_reassemblies = stats.partial_reassemblies,
        "Done."
    );
    Ok(())
}

fn read_corpus(path: &Path) -> anyhow::Result<Vec<PhraseInput>> {
    let file = File::open(path).with_context(|| format!("opening corpus {}", path.display()))?;

    let mut inputs = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let input: PhraseInput = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid phrase record", path.display(), i + 1))?;
        inputs.push(input);
    }
    Ok(inputs)
}

fn write_records(path: &Path, records: &[PhraseRecord], json: bool) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);

    for record in records {
        if json {
            serde_json::to_writer(&mut out, record)?;
            writeln!(out)?;
        } else {
            writeln!(
                out,
                "{}\t{}\t{}\t{}",
                record.id, record.document_id, record.phrase, record.result
            )?;
        }
    }
    out.flush()?;
    Ok(())
}
