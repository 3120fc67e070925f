use std::fmt;
use std::sync::{Arc, LazyLock};

static EMPTY: LazyLock<Arc<Columns>> = LazyLock::new(|| Arc::new(Columns::new(Vec::new())));

/// A CQL data type as declared in rows metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// Server-side custom type, identified by its class name.
    Custom(String),
    Ascii,
    Bigint,
    Blob,
    Boolean,
    Counter,
    Decimal,
    Double,
    Float,
    Int,
    Text,
    Timestamp,
    Uuid,
    Varchar,
    Varint,
    Timeuuid,
    Inet,
    List(Box<DataType>),
    Map(Box<DataType>, Box<DataType>),
    Set(Box<DataType>),
}

impl DataType {
    /// Maps a parameterless `[option]` id. Custom and the collection
    /// types carry parameters and are handled by the wire reader.
    pub fn from_simple_id(id: u16) -> Option<Self> {
        match id {
            0x0001 => Some(Self::Ascii),
            0x0002 => Some(Self::Bigint),
            0x0003 => Some(Self::Blob),
            0x0004 => Some(Self::Boolean),
            0x0005 => Some(Self::Counter),
            0x0006 => Some(Self::Decimal),
            0x0007 => Some(Self::Double),
            0x0008 => Some(Self::Float),
            0x0009 => Some(Self::Int),
            0x000a => Some(Self::Text),
            0x000b => Some(Self::Timestamp),
            0x000c => Some(Self::Uuid),
            0x000d => Some(Self::Varchar),
            0x000e => Some(Self::Varint),
            0x000f => Some(Self::Timeuuid),
            0x0010 => Some(Self::Inet),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(class) => write!(f, "'{class}'"),
            Self::Ascii => f.write_str("ascii"),
            Self::Bigint => f.write_str("bigint"),
            Self::Blob => f.write_str("blob"),
            Self::Boolean => f.write_str("boolean"),
            Self::Counter => f.write_str("counter"),
            Self::Decimal => f.write_str("decimal"),
            Self::Double => f.write_str("double"),
            Self::Float => f.write_str("float"),
            Self::Int => f.write_str("int"),
            Self::Text => f.write_str("text"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::Uuid => f.write_str("uuid"),
            Self::Varchar => f.write_str("varchar"),
            Self::Varint => f.write_str("varint"),
            Self::Timeuuid => f.write_str("timeuuid"),
            Self::Inet => f.write_str("inet"),
            Self::List(elem) => write!(f, "list<{elem}>"),
            Self::Map(key, value) => write!(f, "map<{key}, {value}>"),
            Self::Set(elem) => write!(f, "set<{elem}>"),
        }
    }
}

/// One column of a result set: where it lives and its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub keyspace: String,
    pub table: String,
    pub name: String,
    pub data_type: DataType,
}

/// Ordered column metadata of one result set.
///
/// Immutable once built; the batch and every row fetched from it share
/// one instance. The order is the server's and is the canonical column
/// order for positional access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    specs: Vec<ColumnSpec>,
}

impl Columns {
    pub fn new(specs: Vec<ColumnSpec>) -> Self {
        Self { specs }
    }

    /// The process-wide instance backing results that carry no rows.
    pub fn shared_empty() -> Arc<Self> {
        Arc::clone(&EMPTY)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ColumnSpec> {
        self.specs.get(index)
    }

    /// Position of the first column with this name, in server order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|spec| spec.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnSpec> {
        self.specs.iter()
    }
}
