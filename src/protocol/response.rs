use std::fmt;

use tracing::debug;

use crate::columns::{ColumnSpec, Columns, DataType};
use crate::constant::{
    self, ExceptionCode, Opcode, RESULT_KIND_PREPARED, RESULT_KIND_ROWS, RESULT_KIND_SCHEMA_CHANGE,
    RESULT_KIND_SET_KEYSPACE, RESULT_KIND_VOID, ROWS_FLAG_GLOBAL_TABLES_SPEC,
};
use crate::error::{Error, Result, eyre};
use crate::protocol::frame::{FrameFlags, FrameHeader};
use crate::protocol::primitive::{
    read_bytes, read_int, read_short, read_short_bytes, read_string, read_string_multimap,
};

/// One row of a Rows result, cells still undecoded. `None` cells are NULL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow(pub Vec<Option<Vec<u8>>>);

impl RawRow {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Body of an ERROR response: the server's error code and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrPayload {
    pub code: ExceptionCode,
    pub message: String,
}

impl ErrPayload {
    pub fn decode(body: &[u8]) -> Result<Self> {
        let (raw_code, rest) = read_int(body)?;
        let (message, _rest) = read_string(rest)?;
        let code = ExceptionCode::from_code(raw_code)
            .ok_or_else(|| Error::ProtocolViolation(eyre!("unknown error code: 0x{raw_code:04x}")))?;
        Ok(Self {
            code,
            message: message.to_owned(),
        })
    }
}

impl fmt::Display for ErrPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04x}): {}", self.code, self.code.code(), self.message)
    }
}

/// A decoded server frame body, tagged by opcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Error(ErrPayload),
    Ready,
    /// The server wants credentials; carries the authenticator class.
    Authenticate(String),
    /// Startup options supported by the server, as sent.
    Supported(Vec<(String, Vec<String>)>),
    Result(ResultResponse),
    /// A pushed event; only the event type is kept, the session layer
    /// re-reads the payload if it subscribed.
    Event(String),
}

impl Response {
    /// Decode one response body. `body` is the frame payload after the
    /// 8-byte header, uncompressed.
    pub fn decode(opcode: Opcode, body: &[u8]) -> Result<Self> {
        match opcode {
            Opcode::Error => Ok(Self::Error(ErrPayload::decode(body)?)),
            Opcode::Ready => Ok(Self::Ready),
            Opcode::Authenticate => {
                let (authenticator, _rest) = read_string(body)?;
                Ok(Self::Authenticate(authenticator.to_owned()))
            }
            Opcode::Supported => {
                let (options, _rest) = read_string_multimap(body)?;
                Ok(Self::Supported(options))
            }
            Opcode::Result => Ok(Self::Result(ResultResponse::decode(body)?)),
            Opcode::Event => {
                let (event_type, _rest) = read_string(body)?;
                Ok(Self::Event(event_type.to_owned()))
            }
            other => Err(Error::ProtocolViolation(eyre!(
                "request opcode 0x{:02x} in a response frame",
                other as u8
            ))),
        }
    }

    /// Protocol name of the response, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Error(_) => "ERROR",
            Self::Ready => "READY",
            Self::Authenticate(_) => "AUTHENTICATE",
            Self::Supported(_) => "SUPPORTED",
            Self::Result(_) => "RESULT",
            Self::Event(_) => "EVENT",
        }
    }
}

/// Decode a whole frame: header checks, then body dispatch by opcode.
pub fn decode_frame(header: &FrameHeader, body: &[u8]) -> Result<Response> {
    if header.version != constant::RESPONSE_VERSION {
        return Err(Error::ProtocolViolation(eyre!(
            "unexpected version byte 0x{:02x} in a response frame",
            header.version
        )));
    }
    if body.len() != header.body_len() {
        return Err(Error::ProtocolViolation(eyre!(
            "frame announces {} body bytes but {} were read",
            header.body_len(),
            body.len()
        )));
    }
    let flags = FrameFlags::from_bits_truncate(header.flags);
    if flags.contains(FrameFlags::COMPRESSED) {
        return Err(Error::ProtocolViolation(eyre!(
            "compressed frame, but no compression was negotiated"
        )));
    }
    let body = if flags.contains(FrameFlags::TRACING) {
        // a traced response starts with a 16-byte trace id
        if body.len() < 16 {
            return Err(Error::ProtocolViolation(eyre!(
                "tracing flag set on a {}-byte body, no room for a trace id",
                body.len()
            )));
        }
        debug!("dropping the trace id of a traced response");
        &body[16..]
    } else {
        body
    };
    let opcode = Opcode::from_u8(header.opcode).ok_or_else(|| {
        Error::ProtocolViolation(eyre!("unknown opcode: 0x{:02x}", header.opcode))
    })?;
    Response::decode(opcode, body)
}

/// Body of a RESULT response, tagged by its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultResponse {
    Void,
    Rows { columns: Columns, rows: Vec<RawRow> },
    SetKeyspace(String),
    Prepared { id: Vec<u8>, bind_markers: Columns },
    SchemaChange { change: String, keyspace: String, table: String },
}

impl ResultResponse {
    pub fn decode(body: &[u8]) -> Result<Self> {
        let (kind, rest) = read_int(body)?;
        match kind {
            RESULT_KIND_VOID => Ok(Self::Void),
            RESULT_KIND_ROWS => {
                let (columns, rest) = read_rows_metadata(rest)?;
                let (rows, _rest) = read_rows_content(&columns, rest)?;
                Ok(Self::Rows { columns, rows })
            }
            RESULT_KIND_SET_KEYSPACE => {
                let (keyspace, _rest) = read_string(rest)?;
                Ok(Self::SetKeyspace(keyspace.to_owned()))
            }
            RESULT_KIND_PREPARED => {
                let (id, rest) = read_short_bytes(rest)?;
                let (bind_markers, _rest) = read_rows_metadata(rest)?;
                Ok(Self::Prepared {
                    id: id.to_vec(),
                    bind_markers,
                })
            }
            RESULT_KIND_SCHEMA_CHANGE => {
                let (change, rest) = read_string(rest)?;
                let (keyspace, rest) = read_string(rest)?;
                let (table, _rest) = read_string(rest)?;
                Ok(Self::SchemaChange {
                    change: change.to_owned(),
                    keyspace: keyspace.to_owned(),
                    table: table.to_owned(),
                })
            }
            other => Err(Error::ProtocolViolation(eyre!(
                "unknown result kind: 0x{other:04x}"
            ))),
        }
    }
}

/// Read the metadata block of a Rows or Prepared result: flags, column
/// count, then one spec per column (keyspace and table once up front
/// when the global flag is set).
fn read_rows_metadata(data: &[u8]) -> Result<(Columns, &[u8])> {
    let (flags, data) = read_int(data)?;
    let (column_count, data) = read_int(data)?;
    let count = usize::try_from(column_count)
        .map_err(|_| Error::ProtocolViolation(eyre!("negative column count: {column_count}")))?;

    let (global_spec, mut data) = if (flags & ROWS_FLAG_GLOBAL_TABLES_SPEC) != 0 {
        let (keyspace, rest) = read_string(data)?;
        let (table, rest) = read_string(rest)?;
        (Some((keyspace.to_owned(), table.to_owned())), rest)
    } else {
        (None, data)
    };

    // the count is wire data; a spec takes at least 4 bytes
    let mut specs = Vec::with_capacity(count.min(data.len() / 4));
    for _ in 0..count {
        let (keyspace, table, rest) = match &global_spec {
            Some((keyspace, table)) => (keyspace.clone(), table.clone(), data),
            None => {
                let (keyspace, rest) = read_string(data)?;
                let (table, rest) = read_string(rest)?;
                (keyspace.to_owned(), table.to_owned(), rest)
            }
        };
        let (name, rest) = read_string(rest)?;
        let (data_type, rest) = read_data_type(rest, false)?;
        specs.push(ColumnSpec {
            keyspace,
            table,
            name: name.to_owned(),
            data_type,
        });
        data = rest;
    }
    Ok((Columns::new(specs), data))
}

/// Read a type `[option]`. Collection element types must be simple in v1,
/// so with `element` set a collection id is a violation.
fn read_data_type(data: &[u8], element: bool) -> Result<(DataType, &[u8])> {
    let (id, rest) = read_short(data)?;
    match id {
        0x0000 => {
            let (class, rest) = read_string(rest)?;
            Ok((DataType::Custom(class.to_owned()), rest))
        }
        0x0020 | 0x0021 | 0x0022 if element => Err(Error::ProtocolViolation(eyre!(
            "collection type option 0x{id:04x} inside another collection"
        ))),
        0x0020 => {
            let (elem, rest) = read_data_type(rest, true)?;
            Ok((DataType::List(Box::new(elem)), rest))
        }
        0x0021 => {
            let (key, rest) = read_data_type(rest, true)?;
            let (value, rest) = read_data_type(rest, true)?;
            Ok((DataType::Map(Box::new(key), Box::new(value)), rest))
        }
        0x0022 => {
            let (elem, rest) = read_data_type(rest, true)?;
            Ok((DataType::Set(Box::new(elem)), rest))
        }
        other => match DataType::from_simple_id(other) {
            Some(data_type) => Ok((data_type, rest)),
            None => Err(Error::ProtocolViolation(eyre!(
                "unknown type option: 0x{other:04x}"
            ))),
        },
    }
}

/// Read the row block: a count, then `columns.len()` cells per row.
fn read_rows_content<'a>(columns: &Columns, data: &'a [u8]) -> Result<(Vec<RawRow>, &'a [u8])> {
    let (rows_count, mut data) = read_int(data)?;
    let count = usize::try_from(rows_count)
        .map_err(|_| Error::ProtocolViolation(eyre!("negative rows count: {rows_count}")))?;
    if columns.is_empty() && count > 0 {
        // zero-column rows consume no bytes, so the count cannot be checked
        return Err(Error::ProtocolViolation(eyre!(
            "{count} rows announced with no columns"
        )));
    }
    // the count is wire data; a cell takes at least 4 bytes (its length prefix)
    let mut rows = Vec::with_capacity(count.min(data.len() / 4));
    for _ in 0..count {
        let mut cells = Vec::with_capacity(columns.len());
        for _ in 0..columns.len() {
            let (cell, rest) = read_bytes(data)?;
            cells.push(cell.map(|bytes| bytes.to_vec()));
            data = rest;
        }
        rows.push(RawRow(cells));
    }
    Ok((rows, data))
}
