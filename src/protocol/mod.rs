//! MDC wire protocol: command encoding and response decoding

pub mod command;
pub mod response;

pub use command::{Command, InputSource};
pub use response::{Ack, decode};
