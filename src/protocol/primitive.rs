use zerocopy::FromBytes;
use zerocopy::byteorder::big_endian::{I32 as I32BE, U16 as U16BE};

use crate::error::{Error, Result, eyre};

fn truncated(what: &str, need: usize, have: usize) -> Error {
    Error::ProtocolViolation(eyre!("truncated {what}: needs {need} bytes, {have} left"))
}

/// Read a `[int]`, a 4-byte big-endian signed integer
pub fn read_int(data: &[u8]) -> Result<(i32, &[u8])> {
    if data.len() < 4 {
        return Err(truncated("[int]", 4, data.len()));
    }
    let value = I32BE::ref_from_bytes(&data[..4])
        .map_err(|_| truncated("[int]", 4, data.len()))?
        .get();
    Ok((value, &data[4..]))
}

/// Read a `[short]`, a 2-byte big-endian unsigned integer
pub fn read_short(data: &[u8]) -> Result<(u16, &[u8])> {
    if data.len() < 2 {
        return Err(truncated("[short]", 2, data.len()));
    }
    let value = U16BE::ref_from_bytes(&data[..2])
        .map_err(|_| truncated("[short]", 2, data.len()))?
        .get();
    Ok((value, &data[2..]))
}

/// Read a `[string]`, a `[short]` length followed by UTF-8 bytes
pub fn read_string(data: &[u8]) -> Result<(&str, &[u8])> {
    let (len, rest) = read_short(data)?;
    let len = len as usize;
    if rest.len() < len {
        return Err(truncated("[string]", len, rest.len()));
    }
    let value = simdutf8::basic::from_utf8(&rest[..len])
        .map_err(|_| Error::ProtocolViolation(eyre!("invalid UTF-8 in [string]")))?;
    Ok((value, &rest[len..]))
}

/// Read a `[bytes]`, an `[int]` length followed by that many bytes.
/// A negative length is NULL.
pub fn read_bytes(data: &[u8]) -> Result<(Option<&[u8]>, &[u8])> {
    let (len, rest) = read_int(data)?;
    let Ok(len) = usize::try_from(len) else {
        return Ok((None, rest));
    };
    if rest.len() < len {
        return Err(truncated("[bytes]", len, rest.len()));
    }
    Ok((Some(&rest[..len]), &rest[len..]))
}

/// Read a `[short bytes]`, a `[short]` length followed by that many bytes
pub fn read_short_bytes(data: &[u8]) -> Result<(&[u8], &[u8])> {
    let (len, rest) = read_short(data)?;
    let len = len as usize;
    if rest.len() < len {
        return Err(truncated("[short bytes]", len, rest.len()));
    }
    Ok((&rest[..len], &rest[len..]))
}

/// Read a `[string list]`, a `[short]` count of `[string]`s
pub fn read_string_list(data: &[u8]) -> Result<(Vec<String>, &[u8])> {
    let (count, mut data) = read_short(data)?;
    let mut values = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (value, rest) = read_string(data)?;
        values.push(value.to_owned());
        data = rest;
    }
    Ok((values, data))
}

/// Read a `[string multimap]`, a `[short]` count of `[string]` keys each
/// followed by a `[string list]`
pub fn read_string_multimap(data: &[u8]) -> Result<(Vec<(String, Vec<String>)>, &[u8])> {
    let (count, mut data) = read_short(data)?;
    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (key, rest) = read_string(data)?;
        let (values, rest) = read_string_list(rest)?;
        entries.push((key.to_owned(), values));
        data = rest;
    }
    Ok((entries, data))
}
