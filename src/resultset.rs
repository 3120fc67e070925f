use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::sync::Arc;

use tracing::debug;

use crate::columns::Columns;
use crate::error::{Error, Result, eyre};
use crate::protocol::{RawRow, ResultResponse};
use crate::row::Row;

/// The rows of one query response, consumed front to back.
///
/// Built once from a decoded RESULT body and never refilled; fetching a
/// row removes it for good. Responses without tabular data (void, `USE`
/// acknowledgments) still build a result set so callers handle every
/// query outcome through the same cursor.
///
/// Not for sharing: consumption needs `&mut self`, and iterating uses
/// the batch up.
#[derive(Debug)]
pub struct ResultSet {
    columns: Arc<Columns>,
    rows: VecDeque<RawRow>,
}

impl ResultSet {
    fn empty() -> Self {
        Self {
            columns: Columns::shared_empty(),
            rows: VecDeque::new(),
        }
    }

    /// Build the result set for one RESULT response.
    ///
    /// A Prepared body is a usage error: preparation has its own path
    /// and cannot answer a plain query. A SchemaChange body never
    /// completes a query either; it is rejected as a protocol
    /// violation.
    pub fn from_response(response: ResultResponse) -> Result<Self> {
        match response {
            ResultResponse::Void => Ok(Self::empty()),
            ResultResponse::SetKeyspace(keyspace) => {
                debug!(%keyspace, "keyspace switched");
                Ok(Self::empty())
            }
            ResultResponse::Rows { columns, rows } => {
                debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
                Ok(Self {
                    columns: Arc::new(columns),
                    rows: rows.into(),
                })
            }
            ResultResponse::Prepared { .. } => Err(Error::BadUsageError(
                "prepared-statement response where a result set was expected".to_owned(),
            )),
            ResultResponse::SchemaChange {
                change,
                keyspace,
                table,
            } => Err(Error::ProtocolViolation(eyre!(
                "SCHEMA_CHANGE ({change} {keyspace}.{table}) cannot complete a query"
            ))),
        }
    }

    /// Column metadata shared by every row of this result set.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// True once every row has been fetched. Pure, repeatable.
    pub fn is_exhausted(&self) -> bool {
        self.rows.is_empty()
    }

    /// Remove and return the next row, `None` once exhausted.
    pub fn fetch_one(&mut self) -> Option<Row> {
        let data = self.rows.pop_front()?;
        Some(Row::new(Arc::clone(&self.columns), data))
    }

    /// Drain every remaining row, in server order.
    pub fn fetch_all(&mut self) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.rows.len());
        while let Some(row) = self.fetch_one() {
            rows.push(row);
        }
        rows
    }
}

impl Iterator for ResultSet {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.fetch_one()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rows.len(), Some(self.rows.len()))
    }
}

impl ExactSizeIterator for ResultSet {}

impl FusedIterator for ResultSet {}
