use std::fmt;

/// Version byte of a request frame (protocol v1).
pub const REQUEST_VERSION: u8 = 0x01;
/// Version byte of a response frame (protocol v1).
pub const RESPONSE_VERSION: u8 = 0x81;

/// Kind tag of a RESULT body, the first `[int]` after the header.
pub const RESULT_KIND_VOID: i32 = 0x0001;
pub const RESULT_KIND_ROWS: i32 = 0x0002;
pub const RESULT_KIND_SET_KEYSPACE: i32 = 0x0003;
pub const RESULT_KIND_PREPARED: i32 = 0x0004;
pub const RESULT_KIND_SCHEMA_CHANGE: i32 = 0x0005;

/// Rows metadata flag: one keyspace/table pair applies to every column.
pub const ROWS_FLAG_GLOBAL_TABLES_SPEC: i32 = 0x0001;

/// CQL frame opcodes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Error = 0x00,
    Startup = 0x01,
    Ready = 0x02,
    Authenticate = 0x03,
    Credentials = 0x04,
    Options = 0x05,
    Supported = 0x06,
    Query = 0x07,
    Result = 0x08,
    Prepare = 0x09,
    Execute = 0x0a,
    Register = 0x0b,
    Event = 0x0c,
}

impl Opcode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Error),
            0x01 => Some(Self::Startup),
            0x02 => Some(Self::Ready),
            0x03 => Some(Self::Authenticate),
            0x04 => Some(Self::Credentials),
            0x05 => Some(Self::Options),
            0x06 => Some(Self::Supported),
            0x07 => Some(Self::Query),
            0x08 => Some(Self::Result),
            0x09 => Some(Self::Prepare),
            0x0a => Some(Self::Execute),
            0x0b => Some(Self::Register),
            0x0c => Some(Self::Event),
            _ => None,
        }
    }
}

/// Error codes of an ERROR response
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionCode {
    ServerError = 0x0000,
    ProtocolError = 0x000a,
    BadCredentials = 0x0100,
    Unavailable = 0x1000,
    Overloaded = 0x1001,
    IsBootstrapping = 0x1002,
    TruncateError = 0x1003,
    WriteTimeout = 0x1100,
    ReadTimeout = 0x1200,
    SyntaxError = 0x2000,
    Unauthorized = 0x2100,
    Invalid = 0x2200,
    ConfigError = 0x2300,
    AlreadyExists = 0x2400,
    Unprepared = 0x2500,
}

impl ExceptionCode {
    pub fn from_code(value: i32) -> Option<Self> {
        match value {
            0x0000 => Some(Self::ServerError),
            0x000a => Some(Self::ProtocolError),
            0x0100 => Some(Self::BadCredentials),
            0x1000 => Some(Self::Unavailable),
            0x1001 => Some(Self::Overloaded),
            0x1002 => Some(Self::IsBootstrapping),
            0x1003 => Some(Self::TruncateError),
            0x1100 => Some(Self::WriteTimeout),
            0x1200 => Some(Self::ReadTimeout),
            0x2000 => Some(Self::SyntaxError),
            0x2100 => Some(Self::Unauthorized),
            0x2200 => Some(Self::Invalid),
            0x2300 => Some(Self::ConfigError),
            0x2400 => Some(Self::AlreadyExists),
            0x2500 => Some(Self::Unprepared),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExceptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ServerError => "server error",
            Self::ProtocolError => "protocol error",
            Self::BadCredentials => "bad credentials",
            Self::Unavailable => "unavailable",
            Self::Overloaded => "overloaded",
            Self::IsBootstrapping => "is bootstrapping",
            Self::TruncateError => "truncate error",
            Self::WriteTimeout => "write timeout",
            Self::ReadTimeout => "read timeout",
            Self::SyntaxError => "syntax error",
            Self::Unauthorized => "unauthorized",
            Self::Invalid => "invalid query",
            Self::ConfigError => "config error",
            Self::AlreadyExists => "already exists",
            Self::Unprepared => "unprepared",
        };
        f.write_str(name)
    }
}
