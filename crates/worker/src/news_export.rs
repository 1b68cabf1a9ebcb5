use anyhow::Context;
use std::io::Write;

use ratecmp_core::news::Headline;

/// Writes a `title,link` table. The header is always written, so an empty crawl still
/// produces a valid table.
pub fn write_csv<W: Write>(out: W, headlines: &[Headline]) -> anyhow::Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["title", "link"])
        .context("failed to write CSV header")?;
    for h in headlines {
        w.write_record([h.title.as_str(), h.link.as_str()])
            .context("failed to write CSV row")?;
    }
    w.flush().context("failed to flush CSV output")?;
    Ok(())
}
