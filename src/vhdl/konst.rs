// Copyright (c) 2016-2021 Fabian Schuiki

//! This module implements constant value queries for VHDL.
//!
//! The folding predicates recognize subtrees that have already been reduced
//! to a literal form and extract their value. They follow trivial references,
//! e.g. a reference to an enumeration literal, but never evaluate anything;
//! that is the business of the [evaluator](crate::eval).

use crate::tree::{Literal, Tree, TreeData};
use crate::ty::{Range, RangeKind};
use vesta_common::name::Name;

/// Check whether a node is in fully reduced form.
///
/// This holds for any literal, and for references that resolve to a boolean
/// value.
pub fn folded(t: &Tree) -> bool {
    match t.data {
        TreeData::Literal(_) => true,
        TreeData::Ref { .. } => folded_bool(t).is_some(),
        _ => false,
    }
}

/// The value of an integer literal.
pub fn folded_int(t: &Tree) -> Option<i64> {
    match t.data {
        TreeData::Literal(Literal::Int(v)) => Some(v),
        _ => None,
    }
}

/// The value of a real literal.
pub fn folded_real(t: &Tree) -> Option<f64> {
    match t.data {
        TreeData::Literal(Literal::Real(v)) => Some(v),
        _ => None,
    }
}

/// The position of an enumeration literal or a reference to one.
pub fn folded_enum(t: &Tree) -> Option<usize> {
    match t.data {
        TreeData::EnumLit { pos, .. } => Some(pos),
        TreeData::Ref { decl, .. } => match decl.data {
            TreeData::EnumLit { pos, .. } => Some(pos),
            _ => None,
        },
        _ => None,
    }
}

/// The value of a reference to one of the `BOOLEAN` literals.
pub fn folded_bool(t: &Tree) -> Option<bool> {
    let decl = match t.data {
        TreeData::Ref { decl, .. } => decl,
        _ => return None,
    };
    match decl.data {
        TreeData::EnumLit { pos, .. } => {
            let is_bool = decl
                .ty
                .and_then(|ty| ty.as_enum())
                .map_or(false, |e| e.is_boolean());
            if is_bool {
                Some(pos != 0)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// The characters of a string literal.
pub fn folded_str<'a>(t: &'a Tree) -> Option<&'a [Name]> {
    match t.data {
        TreeData::Literal(Literal::Str(ref chars)) => Some(chars),
        _ => None,
    }
}

/// The number of values a range covers.
///
/// Null ranges have length zero. Returns `None` when either bound is not an
/// integer literal or the range has no static direction.
pub fn folded_length(r: Range) -> Option<i64> {
    let left = folded_int(r.left)?;
    let right = folded_int(r.right)?;
    let length = match r.kind {
        RangeKind::To => right.checked_sub(left)?.checked_add(1)?,
        RangeKind::Downto => left.checked_sub(right)?.checked_add(1)?,
        RangeKind::Expr => return None,
    };
    Some(length.max(0))
}

/// The bounds of a range, normalized such that the lower bound comes first.
pub fn folded_bounds(r: Range) -> Option<(i64, i64)> {
    let left = folded_int(r.left)?;
    let right = folded_int(r.right)?;
    match r.kind {
        RangeKind::To => Some((left, right)),
        RangeKind::Downto => Some((right, left)),
        RangeKind::Expr => None,
    }
}

/// The integer value of a node the semantic pass has already folded.
///
/// Accepts integer literals and references to enumeration literals, whose
/// position is the value. Anything else is an internal inconsistency.
pub fn assume_int(t: &Tree) -> i64 {
    folded_int(t)
        .or_else(|| folded_enum(t).map(|pos| pos as i64))
        .unwrap_or_else(|| panic!("expression at {} is not a literal", t.span))
}
