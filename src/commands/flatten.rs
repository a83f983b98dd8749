use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::Result;
use webindexer_urlutil::{add_html_extension, preprocess};

/// Copies every page named in `site_dir/ready_urls.txt` into `out_dir` as `1.html, 2.html, …`
/// and records the mapping as `<filename>\t<url>` lines in `out_dir/urls`.
pub fn run(site_dir: &Path, out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)?;

    let urls_list = fs::File::open(site_dir.join("ready_urls.txt"))?;
    let mut mapping = fs::File::create(out_dir.join("urls"))?;

    let mut processed = 0usize;
    for line in BufReader::new(urls_list).lines() {
        let url = line?;
        let url = url.trim();
        if url.is_empty() {
            continue;
        }

        let raw_path = site_dir.join(add_html_extension(&preprocess(url)));
        let file_name = format!("{}.html", processed + 1);
        let new_path = out_dir.join(&file_name);

        match fs::copy(&raw_path, &new_path) {
            Ok(_) => {
                writeln!(mapping, "{file_name}\t{url}")?;
                processed += 1;
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "failed to copy page during flatten");
            }
        }
    }

    tracing::info!(processed, "flatten finished");
    Ok(())
}
