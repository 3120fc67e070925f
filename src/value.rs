use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use zerocopy::FromBytes;
use zerocopy::byteorder::big_endian::{F32 as F32BE, F64 as F64BE, I32 as I32BE, I64 as I64BE};

use crate::columns::{ColumnSpec, DataType};
use crate::error::{Error, Result, eyre};

/// One decoded cell, borrowing from the undecoded row payload.
///
/// Types without a dedicated variant (blob, decimal, varint,
/// collections, custom types) stay as raw `Bytes`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Null,
    Boolean(bool),
    Int(i32),
    Bigint(i64),
    Float(f32),
    Double(f64),
    /// Milliseconds since the epoch.
    Timestamp(i64),
    Text(&'a str),
    Bytes(&'a [u8]),
    Inet(IpAddr),
}

impl<'a> Value<'a> {
    /// Decode one cell according to its declared type. `None` is NULL.
    pub fn parse(data_type: &DataType, bytes: Option<&'a [u8]>) -> Result<Self> {
        let Some(bytes) = bytes else {
            return Ok(Value::Null);
        };
        match data_type {
            DataType::Boolean => match bytes {
                [byte] => Ok(Value::Boolean(*byte != 0)),
                _ => Err(invalid_length("boolean", 1, bytes.len())),
            },
            DataType::Int => Ok(Value::Int(decode_i32(bytes)?)),
            DataType::Bigint | DataType::Counter => Ok(Value::Bigint(decode_i64("bigint", bytes)?)),
            DataType::Timestamp => Ok(Value::Timestamp(decode_i64("timestamp", bytes)?)),
            DataType::Float => {
                let value = F32BE::read_from_bytes(bytes)
                    .map_err(|_| invalid_length("float", 4, bytes.len()))?;
                Ok(Value::Float(value.get()))
            }
            DataType::Double => {
                let value = F64BE::read_from_bytes(bytes)
                    .map_err(|_| invalid_length("double", 8, bytes.len()))?;
                Ok(Value::Double(value.get()))
            }
            DataType::Ascii | DataType::Text | DataType::Varchar => {
                Ok(Value::Text(decode_str(bytes)?))
            }
            DataType::Inet => Ok(Value::Inet(decode_inet(bytes)?)),
            _ => Ok(Value::Bytes(bytes)),
        }
    }
}

fn invalid_length(what: &str, expected: usize, got: usize) -> Error {
    Error::ProtocolViolation(eyre!("invalid {what} length: {got}, expected {expected}"))
}

fn decode_i32(bytes: &[u8]) -> Result<i32> {
    let value =
        I32BE::read_from_bytes(bytes).map_err(|_| invalid_length("int", 4, bytes.len()))?;
    Ok(value.get())
}

fn decode_i64(what: &str, bytes: &[u8]) -> Result<i64> {
    let value = I64BE::read_from_bytes(bytes).map_err(|_| invalid_length(what, 8, bytes.len()))?;
    Ok(value.get())
}

fn decode_str(bytes: &[u8]) -> Result<&str> {
    simdutf8::basic::from_utf8(bytes)
        .map_err(|_| Error::ProtocolViolation(eyre!("invalid UTF-8 in a text cell")))
}

fn decode_inet(bytes: &[u8]) -> Result<IpAddr> {
    match bytes {
        &[a, b, c, d] => Ok(IpAddr::V4(Ipv4Addr::new(a, b, c, d))),
        _ => match <[u8; 16]>::try_from(bytes) {
            Ok(octets) => Ok(IpAddr::V6(Ipv6Addr::from(octets))),
            Err(_) => Err(Error::ProtocolViolation(eyre!(
                "invalid inet length: {}, expected 4 or 16",
                bytes.len()
            ))),
        },
    }
}

/// Conversion from one raw cell into a typed value.
///
/// Implementations check the column's declared type and reject a
/// mismatch as a usage error rather than reinterpreting the bytes.
/// NULL only converts into an `Option`.
pub trait FromCql<'a>: Sized {
    fn from_cql(spec: &ColumnSpec, bytes: Option<&'a [u8]>) -> Result<Self>;
}

fn not_null<'a>(spec: &ColumnSpec, bytes: Option<&'a [u8]>, target: &str) -> Result<&'a [u8]> {
    bytes.ok_or_else(|| {
        Error::BadUsageError(format!(
            "Cannot decode NULL column {} to {target}, use an Option",
            spec.name
        ))
    })
}

fn mismatch(spec: &ColumnSpec, target: &str) -> Error {
    Error::BadUsageError(format!(
        "Cannot decode CQL type {} to {target}",
        spec.data_type
    ))
}

impl<'a> FromCql<'a> for i32 {
    fn from_cql(spec: &ColumnSpec, bytes: Option<&'a [u8]>) -> Result<Self> {
        let bytes = not_null(spec, bytes, "i32")?;
        match spec.data_type {
            DataType::Int => decode_i32(bytes),
            _ => Err(mismatch(spec, "i32")),
        }
    }
}

impl<'a> FromCql<'a> for i64 {
    fn from_cql(spec: &ColumnSpec, bytes: Option<&'a [u8]>) -> Result<Self> {
        let bytes = not_null(spec, bytes, "i64")?;
        match spec.data_type {
            DataType::Bigint | DataType::Counter | DataType::Timestamp => {
                decode_i64("bigint", bytes)
            }
            _ => Err(mismatch(spec, "i64")),
        }
    }
}

impl<'a> FromCql<'a> for bool {
    fn from_cql(spec: &ColumnSpec, bytes: Option<&'a [u8]>) -> Result<Self> {
        let bytes = not_null(spec, bytes, "bool")?;
        match spec.data_type {
            DataType::Boolean => match bytes {
                [byte] => Ok(*byte != 0),
                _ => Err(invalid_length("boolean", 1, bytes.len())),
            },
            _ => Err(mismatch(spec, "bool")),
        }
    }
}

impl<'a> FromCql<'a> for f32 {
    fn from_cql(spec: &ColumnSpec, bytes: Option<&'a [u8]>) -> Result<Self> {
        let bytes = not_null(spec, bytes, "f32")?;
        match spec.data_type {
            DataType::Float => {
                let value = F32BE::read_from_bytes(bytes)
                    .map_err(|_| invalid_length("float", 4, bytes.len()))?;
                Ok(value.get())
            }
            _ => Err(mismatch(spec, "f32")),
        }
    }
}

impl<'a> FromCql<'a> for f64 {
    fn from_cql(spec: &ColumnSpec, bytes: Option<&'a [u8]>) -> Result<Self> {
        let bytes = not_null(spec, bytes, "f64")?;
        match spec.data_type {
            DataType::Double => {
                let value = F64BE::read_from_bytes(bytes)
                    .map_err(|_| invalid_length("double", 8, bytes.len()))?;
                Ok(value.get())
            }
            _ => Err(mismatch(spec, "f64")),
        }
    }
}

impl<'a> FromCql<'a> for &'a str {
    fn from_cql(spec: &ColumnSpec, bytes: Option<&'a [u8]>) -> Result<Self> {
        let bytes = not_null(spec, bytes, "&str")?;
        match spec.data_type {
            DataType::Ascii | DataType::Text | DataType::Varchar => decode_str(bytes),
            _ => Err(mismatch(spec, "&str")),
        }
    }
}

impl<'a> FromCql<'a> for String {
    fn from_cql(spec: &ColumnSpec, bytes: Option<&'a [u8]>) -> Result<Self> {
        <&str>::from_cql(spec, bytes).map(str::to_owned)
    }
}

/// Raw escape hatch: yields the cell bytes whatever the declared type.
impl<'a> FromCql<'a> for &'a [u8] {
    fn from_cql(spec: &ColumnSpec, bytes: Option<&'a [u8]>) -> Result<Self> {
        not_null(spec, bytes, "&[u8]")
    }
}

impl<'a> FromCql<'a> for Vec<u8> {
    fn from_cql(spec: &ColumnSpec, bytes: Option<&'a [u8]>) -> Result<Self> {
        <&[u8]>::from_cql(spec, bytes).map(<[u8]>::to_vec)
    }
}

impl<'a> FromCql<'a> for IpAddr {
    fn from_cql(spec: &ColumnSpec, bytes: Option<&'a [u8]>) -> Result<Self> {
        let bytes = not_null(spec, bytes, "IpAddr")?;
        match spec.data_type {
            DataType::Inet => decode_inet(bytes),
            _ => Err(mismatch(spec, "IpAddr")),
        }
    }
}

impl<'a> FromCql<'a> for Value<'a> {
    fn from_cql(spec: &ColumnSpec, bytes: Option<&'a [u8]>) -> Result<Self> {
        Value::parse(&spec.data_type, bytes)
    }
}

impl<'a, T: FromCql<'a>> FromCql<'a> for Option<T> {
    fn from_cql(spec: &ColumnSpec, bytes: Option<&'a [u8]>) -> Result<Self> {
        bytes
            .map(|raw| T::from_cql(spec, Some(raw)))
            .transpose()
    }
}

#[cfg(feature = "with-uuid")]
impl<'a> FromCql<'a> for uuid::Uuid {
    fn from_cql(spec: &ColumnSpec, bytes: Option<&'a [u8]>) -> Result<Self> {
        let bytes = not_null(spec, bytes, "Uuid")?;
        match spec.data_type {
            DataType::Uuid | DataType::Timeuuid => uuid::Uuid::from_slice(bytes)
                .map_err(|_| invalid_length("uuid", 16, bytes.len())),
            _ => Err(mismatch(spec, "Uuid")),
        }
    }
}
