use std::{io::Write, path::Path};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use extraction::AggregateResult;

/// Path argument that selects standard output.
const STDOUT_PATH: &str = "-";

/// Writes `result` as pretty-printed JSON to `out`, or to stdout when `out` is "-".
///
/// Files are replaced atomically, so readers never observe partial output.
pub fn write_json(result: &AggregateResult, out: &Path) -> Result<()> {
    if out == Path::new(STDOUT_PATH) {
        return write_to(std::io::stdout().lock(), result).with_context(|| "writing to stdout");
    }

    let mut file =
        AtomicWriteFile::open(out).with_context(|| format!("opening output file {out:?}"))?;
    write_to(&mut file, result).with_context(|| format!("writing output file {out:?}"))?;
    file.commit()
        .with_context(|| format!("committing output file {out:?}"))
}

fn write_to<W: Write>(mut writer: W, result: &AggregateResult) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Single line JSON object describing a fatal error.
pub fn error_json(err: &anyhow::Error) -> String {
    serde_json::json!({ "error": format!("{err:#}") }).to_string()
}
