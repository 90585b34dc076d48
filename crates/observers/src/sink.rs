//! Row-oriented tick sinks and the run summary writer.

use std::{
    borrow::Cow,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use keel_core::Record;
use keel_solvers::simulation::Summary;

/// Columns written when a CSV sink is created without an explicit header:
/// the state, the applied control, the environment, and the total forces.
pub const DEFAULT_COLUMNS: [&str; 16] = [
    "t",
    "x",
    "y",
    "psi",
    "u",
    "v",
    "r",
    "rpm",
    "rudder_angle",
    "wind_speed",
    "wind_dir_from",
    "current_speed",
    "current_dir_to",
    "X",
    "Y",
    "N",
];

/// A destination for tick records.
pub trait TickSink {
    /// Writes one record.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying writer.
    fn write_tick(&mut self, record: &Record) -> io::Result<()>;

    /// Flushes buffered output.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying writer.
    fn flush(&mut self) -> io::Result<()>;
}

/// A destination for the run summary.
pub trait SummarySink {
    /// Writes the summary.
    ///
    /// # Errors
    ///
    /// Returns any I/O or serialization error.
    fn write_summary(&mut self, summary: &Summary) -> io::Result<()>;
}

/// Writes tick records as comma-separated rows under a fixed header.
///
/// The header is either given up front or taken from the keys of the first
/// record. Keys missing from a later record are written as `0`; keys not in
/// the header are dropped.
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    writer: W,
    columns: Option<Vec<Cow<'static, str>>>,
}

impl CsvSink<BufWriter<File>> {
    /// Creates a buffered CSV file whose header is taken from the first record.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps a writer; the header is taken from the first record.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            columns: None,
        }
    }

    /// Wraps a writer and writes `columns` as the header immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be written.
    pub fn with_columns<I, S>(writer: W, columns: I) -> io::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        let mut sink = Self::new(writer);
        let columns: Vec<_> = columns.into_iter().map(Into::into).collect();
        sink.write_header(&columns)?;
        sink.columns = Some(columns);
        Ok(sink)
    }

    /// Wraps a writer using [`DEFAULT_COLUMNS`] as the header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be written.
    pub fn with_default_columns(writer: W) -> io::Result<Self> {
        Self::with_columns(writer, DEFAULT_COLUMNS)
    }

    /// The header, once known.
    pub fn columns(&self) -> Option<&[Cow<'static, str>]> {
        self.columns.as_deref()
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_header(&mut self, columns: &[Cow<'static, str>]) -> io::Result<()> {
        writeln!(self.writer, "{}", columns.join(","))
    }
}

impl<W: Write> TickSink for CsvSink<W> {
    fn write_tick(&mut self, record: &Record) -> io::Result<()> {
        let columns = match self.columns.take() {
            Some(columns) => columns,
            None => {
                let columns: Vec<Cow<'static, str>> =
                    record.keys().map(|key| Cow::Owned(key.to_owned())).collect();
                self.write_header(&columns)?;
                columns
            }
        };

        let row: Vec<String> = columns
            .iter()
            .map(|column| record.get(column).to_string())
            .collect();
        self.columns = Some(columns);
        writeln!(self.writer, "{}", row.join(","))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Writes tick records as JSON Lines, one object per record.
#[derive(Debug)]
pub struct JsonlSink<W: Write> {
    writer: W,
}

impl JsonlSink<BufWriter<File>> {
    /// Creates a buffered JSON Lines file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> TickSink for JsonlSink<W> {
    fn write_tick(&mut self, record: &Record) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Writes the summary as a pretty-printed JSON document.
#[derive(Debug)]
pub struct JsonSummaryWriter<W: Write> {
    writer: W,
}

impl JsonSummaryWriter<BufWriter<File>> {
    /// Creates the summary file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> JsonSummaryWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SummarySink for JsonSummaryWriter<W> {
    fn write_summary(&mut self, summary: &Summary) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, summary)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}
