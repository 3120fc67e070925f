pub mod frame;
pub mod primitive;
mod response;

pub use frame::{FrameFlags, FrameHeader, HEADER_LEN};
pub use response::{ErrPayload, RawRow, Response, ResultResponse, decode_frame};
