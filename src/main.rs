//! `overlap` batch runner.
//!
//! Reads a JSON corpus (see [`CorpusFile`]), runs one batch and writes the
//! report document as pretty JSON to `OVERLAP_OUTPUT_PATH` or stdout.
//!
//! ```text
//! overlap [corpus.json]
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use mimalloc::MiMalloc;

use overlap::config::{EngineConfig, IoConfig};
use overlap::corpus::{CorpusFile, SegmentRecord};
use overlap::embedding::{EmbeddingOracle, HashOracle};
use overlap::engine::MatchEngine;
use overlap::report::ReportDocument;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Stub dimension used when the corpus carries no vectors.
const STUB_EMBEDDING_DIM: usize = 384;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = EngineConfig::from_env()?;
    let mut io = IoConfig::from_env();
    if let Some(path) = std::env::args().nth(1) {
        io.corpus_path = Some(PathBuf::from(path));
    }
    io.validate()?;

    let corpus_path = io
        .corpus_path
        .clone()
        .context("no corpus given: pass a path or set OVERLAP_CORPUS_PATH")?;

    tracing::info!(
        corpus = %corpus_path.display(),
        execution = ?config.execution,
        cross_language = config.cross_language,
        "Overlap starting"
    );

    let json = std::fs::read_to_string(&corpus_path)
        .with_context(|| format!("failed to read corpus {}", corpus_path.display()))?;
    let corpus = CorpusFile::from_json_str(&json).context("invalid corpus document")?;

    let stub = !corpus.has_vectors();
    let (records, precomputed) = corpus.into_parts();
    let oracle: Arc<dyn EmbeddingOracle> = if stub {
        tracing::warn!("Corpus has no vectors, running oracle in stub mode (exact copies only)");
        Arc::new(HashOracle::new(
            config.embedding_dim.unwrap_or(STUB_EMBEDDING_DIM),
        ))
    } else {
        Arc::new(precomputed)
    };

    run(config, oracle, records, &io)
}

fn run(
    config: EngineConfig,
    oracle: Arc<dyn EmbeddingOracle>,
    records: Vec<SegmentRecord>,
    io: &IoConfig,
) -> anyhow::Result<()> {
    let engine = MatchEngine::new(config, oracle)?;
    let batch = engine.run(records)?;
    let document = ReportDocument::from_batch(&batch);
    let json = document.to_json_pretty()?;

    match &io.output_path {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write report {}", path.display()))?;
            tracing::info!(output = %path.display(), pairs = document.pairs.len(), "Report written");
        }
        None => println!("{json}"),
    }

    Ok(())
}
