//! Asynchronous CSV reader with batch interface
//!
//! Provides batched, index-tagged transaction records from an async source.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - the csv_format module for header resolution and row conversion
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of (row index, TransactionRecord)
//!                  ↓
//!           csv_format module
//!           (ColumnMap, convert_row)
//! ```
//!
//! Reading is fail-fast like the synchronous reader: the first invalid row
//! turns the whole batch into an error.

use crate::core::parallel::Indexed;
use crate::io::csv_format::{convert_row, ColumnMap};
use crate::types::{GuardianError, TransactionRecord};
use csv_async::{AsyncReaderBuilder, StringRecord, Trim};
use futures::io::AsyncRead;

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin + Send> {
    csv_reader: csv_async::AsyncReader<R>,
    columns: ColumnMap,
    next_row: usize,
}

impl<R: AsyncRead + Unpin + Send> AsyncReader<R> {
    /// Create a new AsyncReader and resolve the header row
    ///
    /// # Errors
    ///
    /// Returns `MissingColumn` or `ParseError` if the header row is unusable.
    pub async fn new(reader: R) -> Result<Self, GuardianError> {
        let mut csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .create_reader(reader);

        let columns = ColumnMap::from_headers(csv_reader.headers().await?.iter())?;

        Ok(Self {
            csv_reader,
            columns,
            next_row: 0,
        })
    }

    /// Read up to `batch_size` records
    ///
    /// # Returns
    ///
    /// Records tagged with their zero-based data-row index. An empty vector
    /// means the end of the input was reached.
    pub async fn read_batch(
        &mut self,
        batch_size: usize,
    ) -> Result<Vec<Indexed<TransactionRecord>>, GuardianError> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut record = StringRecord::new();

        while batch.len() < batch_size {
            if !self.csv_reader.read_record(&mut record).await? {
                break;
            }

            let row = self.next_row;
            self.next_row += 1;
            batch.push((row, convert_row(row, &record, &self.columns)?));
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;
    use rust_decimal::Decimal;

    const HEADER: &str = "id,timestamp,description,amount,balance\n";

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let csv_content = format!(
            "{}1,2025-01-01,Coffee,-4.50,95.50\n2,2025-01-02,Rent,-500,600\n3,2025-01-03,Salary,2000,2600\n",
            HEADER
        );
        let mut reader = AsyncReader::new(Cursor::new(csv_content.into_bytes()))
            .await
            .unwrap();

        let batch = reader.read_batch(2).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].0, 0);
        assert_eq!(batch[0].1.id, 1);
        assert_eq!(batch[1].0, 1);
        assert_eq!(batch[1].1.amount, Decimal::new(-500, 0));

        let batch = reader.read_batch(2).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].0, 2);
        assert_eq!(batch[0].1.id, 3);

        let batch = reader.read_batch(2).await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let mut reader = AsyncReader::new(Cursor::new(HEADER.as_bytes()))
            .await
            .unwrap();

        let batch = reader.read_batch(10).await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_missing_column() {
        let result = AsyncReader::new(Cursor::new("id,amount,balance\n".as_bytes())).await;
        assert_eq!(
            result.err(),
            Some(GuardianError::missing_column("timestamp"))
        );
    }

    #[tokio::test]
    async fn test_async_reader_invalid_record_fails_batch() {
        let csv_content = format!(
            "{}1,2025-01-01,Coffee,-4.50,95.50\n2,not-a-date,Rent,-500,600\n",
            HEADER
        );
        let mut reader = AsyncReader::new(Cursor::new(csv_content.into_bytes()))
            .await
            .unwrap();

        let result = reader.read_batch(10).await;
        assert_eq!(
            result,
            Err(GuardianError::validation(
                1,
                "timestamp",
                "not-a-date",
                "not a recognised date"
            ))
        );
    }

    #[tokio::test]
    async fn test_async_reader_whitespace_and_case() {
        let csv_content = " Index , Date , Description , Amount , Balance , Segment \n  4 , 01/15/2025 ,  ATM  , -60 , 40 , retail \n";
        let mut reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()))
            .await
            .unwrap();

        let batch = reader.read_batch(10).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].1.id, 4);
        assert_eq!(batch[0].1.description, "ATM");
        assert_eq!(batch[0].1.segment.as_deref(), Some("retail"));
    }
}
