use std::sync::Arc;

use crate::columns::{ColumnSpec, Columns};
use crate::error::{Error, Result};
use crate::protocol::RawRow;
use crate::value::{FromCql, Value};

/// One row of a result set, bound to the column metadata of its batch.
///
/// Cells stay undecoded until accessed; decoding never consumes them,
/// only `ResultSet::fetch_one` moves the cursor.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<Columns>,
    data: RawRow,
}

impl Row {
    pub(crate) fn new(columns: Arc<Columns>, data: RawRow) -> Self {
        debug_assert_eq!(columns.len(), data.len());
        Self { columns, data }
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw payload of the cell at `index`. `None` is NULL.
    pub fn bytes(&self, index: usize) -> Result<Option<&[u8]>> {
        match self.data.0.get(index) {
            Some(cell) => Ok(cell.as_deref()),
            None => Err(self.out_of_range(index)),
        }
    }

    /// Whether the cell at `index` is NULL.
    pub fn is_null(&self, index: usize) -> Result<bool> {
        Ok(self.bytes(index)?.is_none())
    }

    /// Decode the cell at `index` into the dynamic value form.
    pub fn value(&self, index: usize) -> Result<Value<'_>> {
        let spec = self.spec(index)?;
        Value::parse(&spec.data_type, self.bytes(index)?)
    }

    /// Decode the cell at `index` as `T`.
    pub fn get<'a, T: FromCql<'a>>(&'a self, index: usize) -> Result<T> {
        let spec = self.spec(index)?;
        T::from_cql(spec, self.bytes(index)?)
    }

    /// Decode the cell under the column called `name` as `T`.
    pub fn get_by_name<'a, T: FromCql<'a>>(&'a self, name: &str) -> Result<T> {
        let index = self
            .columns
            .index_of(name)
            .ok_or_else(|| Error::BadUsageError(format!("no column {name} in this result set")))?;
        self.get(index)
    }

    fn spec(&self, index: usize) -> Result<&ColumnSpec> {
        self.columns.get(index).ok_or_else(|| self.out_of_range(index))
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::BadUsageError(format!(
            "column index {index} out of range, the result set has {} columns",
            self.columns.len()
        ))
    }
}
