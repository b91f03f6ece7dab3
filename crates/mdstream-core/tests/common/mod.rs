use mdstream_core::{Assembler, AssemblerConfig, AssemblerDiff, BlockSnapshot, Tokenizer};

/// Feeds each chunk through a fresh `Tokenizer`/`Assembler` pair and returns
/// every diff produced, including the one from `finish`. Mirrors how a real
/// host drives the pipeline: one `apply` per `feed`, with no out-of-band
/// knowledge of block ids ahead of time.
pub fn drive(chunks: &[&str]) -> Vec<AssemblerDiff> {
    drive_with(AssemblerConfig::default(), chunks)
}

pub fn drive_with(config: AssemblerConfig, chunks: &[&str]) -> Vec<AssemblerDiff> {
    let mut tokenizer = Tokenizer::new();
    let mut assembler = Assembler::new(config);
    let mut diffs: Vec<AssemblerDiff> = chunks.iter().map(|c| assembler.apply(tokenizer.feed(c))).collect();
    diffs.push(assembler.apply(tokenizer.finish()));
    diffs
}

/// Runs the full text through in one chunk and returns the final block
/// snapshot list.
pub fn snapshot_of(text: &str) -> Vec<BlockSnapshot> {
    let mut tokenizer = Tokenizer::new();
    let mut assembler = Assembler::new(AssemblerConfig::default());
    assembler.apply(tokenizer.feed(text));
    assembler.apply(tokenizer.finish());
    assembler.make_snapshot()
}

/// Feeds `text` once per split point in `cuts` (byte offsets, ascending) and
/// returns the final snapshot — used to check that chunk boundaries never
/// change the result.
pub fn snapshot_rechunked(text: &str, cuts: &[usize]) -> Vec<BlockSnapshot> {
    let mut tokenizer = Tokenizer::new();
    let mut assembler = Assembler::new(AssemblerConfig::default());
    let mut start = 0;
    for &cut in cuts {
        assembler.apply(tokenizer.feed(&text[start..cut]));
        start = cut;
    }
    assembler.apply(tokenizer.feed(&text[start..]));
    assembler.apply(tokenizer.finish());
    assembler.make_snapshot()
}

pub fn plain_text_of(snapshot: &[BlockSnapshot]) -> Vec<String> {
    snapshot
        .iter()
        .map(|b| {
            b.inline_runs
                .as_ref()
                .map(|runs| runs.iter().map(|r| r.text.as_str()).collect::<String>())
                .unwrap_or_default()
        })
        .collect()
}
