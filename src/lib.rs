pub mod columns;
pub mod constant;
pub mod error;
pub mod protocol;
pub mod row;
pub mod value;

mod future;
mod resultset;

pub use future::{QueryFuture, ResponseCallback, ResponseSink};
pub use resultset::ResultSet;

#[cfg(test)]
mod constant_test;
