use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::Result;
use webindexer_concurrent::ConcurrentFrequencyTable;

/// Converts every HTML page named in `urls_mapping` (`filename\turl` lines, as written by
/// `flatten`) to plain text under `out_dir`, and writes `out_dir/token_frequency` as
/// `token\tcount` lines accumulated over the whole corpus.
pub fn run(urls_dir: &Path, urls_mapping: &Path, out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)?;

    let mapping_file = fs::File::open(urls_mapping)?;
    let frequencies = ConcurrentFrequencyTable::new();

    let mut processed = 0usize;
    for line in BufReader::new(mapping_file).lines() {
        let line = line?;
        let Some((filename, _url)) = line.split_once('\t') else {
            continue;
        };

        let raw = match fs::read_to_string(urls_dir.join(filename)) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(filename = %filename, error = %e, "failed to open page for extraction");
                continue;
            }
        };
        let text = webindexer_htmltext::inner_text(&raw);

        let out_path = out_dir.join(format!("{}.txt", processed + 1));
        fs::write(&out_path, format!("{text}\n"))?;

        for token in text.split_whitespace() {
            frequencies.add_word(token, 1);
        }
        processed += 1;
    }

    let mut token_frequency = fs::File::create(out_dir.join("token_frequency"))?;
    for (token, count) in frequencies.snapshot() {
        writeln!(token_frequency, "{token}\t{count}")?;
    }

    tracing::info!(processed, "extract finished");
    Ok(())
}
