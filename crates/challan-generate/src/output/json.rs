use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use challan_core::ViolationRecord;

use crate::errors::GenerationError;

/// Overwrite `path` with the records as a pretty-printed JSON array.
pub fn write_records_json(path: &Path, records: &[ViolationRecord]) -> Result<(), GenerationError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
