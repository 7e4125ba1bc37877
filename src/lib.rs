// Copyright (c) 2016-2021 Fabian Schuiki

//! A hardware description language compiler middle end.

// Re-export everything from the common crate.
pub extern crate vesta_common as common;
pub use crate::common::*;

// Pull in the language crates.
pub extern crate vesta_vhdl as vhdl;
