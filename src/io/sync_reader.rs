//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over transaction records from any
//! [`Read`] source. Delegates CSV format concerns to the csv_format module.
//!
//! # Design
//!
//! The header row is read and resolved into a [`ColumnMap`] when the reader
//! is created, so a missing column fails before any data row is touched.
//! Data rows are then read one at a time into a reused `StringRecord`.
//!
//! ```no_run
//! use budget_guardian::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("transactions.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Read transaction: {:?}", record),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, missing columns) are returned from the constructors
//! - Row validation errors are yielded as `Err` items carrying the row index
//! - [`parse`] collects fail-fast: the first bad row aborts the whole parse

use crate::io::csv_format::{convert_row, ColumnMap};
use crate::types::{GuardianError, TransactionRecord};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Synchronous CSV reader
#[derive(Debug)]
pub struct SyncReader<R> {
    reader: csv::Reader<R>,
    columns: ColumnMap,
    record: StringRecord,
    row: usize,
}

impl SyncReader<File> {
    /// Open a CSV file for streaming iteration
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if nothing exists at `path`
    /// - `IoError` if the file cannot be opened for another reason
    /// - `MissingColumn` / `ParseError` if the header row is unusable
    pub fn new(path: &Path) -> Result<Self, GuardianError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => GuardianError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => GuardianError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), e),
            },
        })?;

        Self::from_reader(file)
    }
}

impl<R: Read> SyncReader<R> {
    /// Wrap an arbitrary reader
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields (headers included)
    /// - Allow flexible field counts (for the optional segment column)
    /// - Use an 8KB buffer for efficient I/O
    pub fn from_reader(reader: R) -> Result<Self, GuardianError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(reader);

        let columns = ColumnMap::from_headers(reader.headers()?.iter())?;

        Ok(Self {
            reader,
            columns,
            record: StringRecord::new(),
            row: 0,
        })
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }
}

impl<R: Read> Iterator for SyncReader<R> {
    type Item = Result<TransactionRecord, GuardianError>;

    /// Read and validate the next data row
    ///
    /// # Returns
    ///
    /// * `Some(Ok(TransactionRecord))` - Successfully validated record
    /// * `Some(Err(GuardianError))` - Structural or validation error
    /// * `None` - End of input reached
    fn next(&mut self) -> Option<Self::Item> {
        let row = self.row;

        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                self.row += 1;
                Some(convert_row(row, &self.record, &self.columns))
            }
            Err(e) => {
                self.row += 1;
                Some(Err(e.into()))
            }
        }
    }
}

/// Parse a whole CSV input into records, failing on the first invalid row
pub fn parse<R: Read>(reader: R) -> Result<Vec<TransactionRecord>, GuardianError> {
    SyncReader::from_reader(reader)?.collect()
}
