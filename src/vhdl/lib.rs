// Copyright (c) 2016-2021 Fabian Schuiki

//! This crate implements the VHDL middle end of the vesta compiler.
//!
//! It sits between the analyzed tree the parser and name resolver produce and
//! the elaboration that follows: the [evaluator](eval) partially executes
//! function calls so that generics, array bounds, initial values, and guard
//! expressions reduce to literals, and the [bounds checker](bounds) verifies
//! indices, slices, aggregates, assignments, and case choices against their
//! declaring types.

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate typed_arena;
pub extern crate vesta_common as common;

#[macro_use]
pub mod arenas;
pub mod bounds;
pub mod builtin;
pub mod eval;
pub mod konst;
pub mod tree;
pub mod ty;
