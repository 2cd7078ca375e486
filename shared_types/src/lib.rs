#![cfg_attr(target_os="none", no_std)] // this is imported by the firmware, so no standard library

pub mod common;
pub use common::*;

pub mod failures;
pub use failures::*;

pub mod record;
pub use record::*;

pub mod sensors;
pub use sensors::*;

pub mod settings;
pub use settings::*;
