use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use challan_core::{RecordColumn, ViolationRecord};

/// Overwrite `path` with a header row and one row per record.
pub fn write_records_csv(
    path: &Path,
    columns: &[RecordColumn],
    records: &[ViolationRecord],
) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let mut writer = csv_writer(CountingWriter::new(writer));

    write_header(&mut writer, columns)?;
    write_rows(&mut writer, columns, records)?;

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

/// Append rows to `path`, writing the header first only when the file is
/// created by this call.
pub fn append_records_csv(
    path: &Path,
    columns: &[RecordColumn],
    records: &[ViolationRecord],
) -> Result<u64, csv::Error> {
    let fresh = !path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(csv::Error::from)?;
    let mut writer = csv_writer(CountingWriter::new(BufWriter::new(file)));

    if fresh {
        write_header(&mut writer, columns)?;
    }
    write_rows(&mut writer, columns, records)?;

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

fn csv_writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(inner)
}

fn write_header<W: Write>(
    writer: &mut csv::Writer<W>,
    columns: &[RecordColumn],
) -> Result<(), csv::Error> {
    writer.write_record(columns.iter().map(RecordColumn::name))
}

fn write_rows<W: Write>(
    writer: &mut csv::Writer<W>,
    columns: &[RecordColumn],
    records: &[ViolationRecord],
) -> Result<(), csv::Error> {
    for record in records {
        let row: Vec<String> = columns.iter().map(|col| col.field(record)).collect();
        writer.write_record(&row)?;
    }
    Ok(())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
