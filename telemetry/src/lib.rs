#![cfg_attr(target_os = "none", no_std)] // this is imported by the firmware, so no standard library

pub mod bitpack;
mod codec;
mod decoded;
mod error;
mod field;
pub mod link;
pub mod quantize;
mod representation;
mod schema;
mod source;

pub use bitpack::{WordReader, WordWriter, Words, MAX_WORDS};
pub use codec::*;
pub use decoded::*;
pub use error::*;
pub use field::*;
pub use representation::*;
pub use schema::*;
pub use source::*;
