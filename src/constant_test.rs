use crate::constant::{ExceptionCode, Opcode, REQUEST_VERSION, RESPONSE_VERSION};

#[test]
fn test_version_bytes_differ_by_the_direction_bit() {
    assert_eq!(
        RESPONSE_VERSION,
        REQUEST_VERSION | 0x80,
        "a response is the request version with the direction bit set"
    );
}

#[test]
fn test_opcode_mapping_is_closed_over_v1() {
    let known = [
        Opcode::Error,
        Opcode::Startup,
        Opcode::Ready,
        Opcode::Authenticate,
        Opcode::Credentials,
        Opcode::Options,
        Opcode::Supported,
        Opcode::Query,
        Opcode::Result,
        Opcode::Prepare,
        Opcode::Execute,
        Opcode::Register,
        Opcode::Event,
    ];
    for opcode in known {
        assert_eq!(
            Opcode::from_u8(opcode as u8),
            Some(opcode),
            "opcode 0x{:02x} must map back to itself",
            opcode as u8
        );
    }
    assert_eq!(known.len(), 13, "v1 defines exactly 13 opcodes");
    assert_eq!(Opcode::from_u8(0x0d), None, "0x0d is the first unused opcode");
}

#[test]
fn test_exception_code_mapping() {
    assert_eq!(ExceptionCode::from_code(0x0000), Some(ExceptionCode::ServerError));
    assert_eq!(ExceptionCode::from_code(0x000a), Some(ExceptionCode::ProtocolError));
    assert_eq!(ExceptionCode::from_code(0x1200), Some(ExceptionCode::ReadTimeout));
    assert_eq!(ExceptionCode::from_code(0x2500), Some(ExceptionCode::Unprepared));
    assert_eq!(ExceptionCode::from_code(0x3000), None);
    assert_eq!(ExceptionCode::ReadTimeout.code(), 0x1200);
}

#[test]
fn test_exception_code_names_are_lowercase_protocol_names() {
    assert_eq!(ExceptionCode::ServerError.to_string(), "server error");
    assert_eq!(ExceptionCode::WriteTimeout.to_string(), "write timeout");
    assert_eq!(ExceptionCode::AlreadyExists.to_string(), "already exists");
}
