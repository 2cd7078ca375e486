//! Ground tooling for the flight core: sensor log replay, hex dump decoding
//! and the local configuration file.

pub mod ground;
pub mod replay;
pub mod settings;
