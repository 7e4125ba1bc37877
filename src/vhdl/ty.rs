// Copyright (c) 2016-2021 Fabian Schuiki

//! This module implements VHDL types.
//!
//! Types come in two flavours: base types as declared by a type declaration,
//! and subtypes which refine another type with additional constraints. Scalar
//! types carry a single directed range; array types carry one range per
//! dimension. Range bounds are expression trees, since the bounds of a type
//! are not necessarily static.

use crate::tree::Tree;
use std::fmt;
use vesta_common::name::{get_name_table, Name};

/// The direction of a range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeKind {
    /// An ascending range `left to right`.
    To,
    /// A descending range `left downto right`.
    Downto,
    /// A range given by an expression or attribute, with no static direction.
    Expr,
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RangeKind::To => write!(f, "to"),
            RangeKind::Downto => write!(f, "downto"),
            RangeKind::Expr => write!(f, "range"),
        }
    }
}

/// A directed range with expression bounds.
#[derive(Clone, Copy, Debug)]
pub struct Range<'t> {
    /// The direction of the range.
    pub kind: RangeKind,
    /// The left bound.
    pub left: &'t Tree<'t>,
    /// The right bound.
    pub right: &'t Tree<'t>,
}

impl<'t> Range<'t> {
    /// Create a new range.
    pub fn new(kind: RangeKind, left: &'t Tree<'t>, right: &'t Tree<'t>) -> Range<'t> {
        Range {
            kind: kind,
            left: left,
            right: right,
        }
    }
}

/// A VHDL type.
#[derive(Debug)]
pub enum Ty<'t> {
    /// An integer type.
    Int(IntTy<'t>),
    /// A real type.
    Real(RealTy<'t>),
    /// A physical type.
    Physical(PhysicalTy<'t>),
    /// An enumeration type.
    Enum(EnumTy),
    /// A constrained array type.
    Array(ArrayTy<'t>),
    /// An unconstrained array type.
    UArray(UArrayTy<'t>),
    /// A subtype of another type.
    Subtype(SubtypeTy<'t>),
    /// An access type.
    Access(&'t Ty<'t>),
    /// A file type.
    File(&'t Ty<'t>),
    /// A record type.
    Record(RecordTy<'t>),
}

/// An integer type.
#[derive(Debug)]
pub struct IntTy<'t> {
    /// The name of the type, if it was declared with one.
    pub name: Option<Name>,
    /// The range of values.
    pub range: Range<'t>,
}

/// A real type.
#[derive(Debug)]
pub struct RealTy<'t> {
    /// The name of the type, if it was declared with one.
    pub name: Option<Name>,
    /// The range of values.
    pub range: Range<'t>,
}

/// A physical type such as `TIME`.
#[derive(Debug)]
pub struct PhysicalTy<'t> {
    /// The name of the type, if it was declared with one.
    pub name: Option<Name>,
    /// The range of values, expressed in the primary unit.
    pub range: Range<'t>,
    /// The name of the primary unit.
    pub primary: Name,
}

/// An enumeration type.
///
/// Carries the literal names in declaration order; the position of a literal
/// is its index in this list.
#[derive(Debug)]
pub struct EnumTy {
    /// The name of the type, if it was declared with one.
    pub name: Option<Name>,
    /// The literals, in declaration order.
    pub lits: Vec<Name>,
}

impl EnumTy {
    /// Check whether this is the predefined `BOOLEAN` type.
    pub fn is_boolean(&self) -> bool {
        self.name == Some(get_name_table().intern("boolean", false))
    }
}

/// A constrained array type.
#[derive(Debug)]
pub struct ArrayTy<'t> {
    /// The index ranges, one per dimension.
    pub dims: Vec<Range<'t>>,
    /// The element type.
    pub elem: &'t Ty<'t>,
}

/// An unconstrained array type.
#[derive(Debug)]
pub struct UArrayTy<'t> {
    /// The index types, one per dimension.
    pub index: Vec<&'t Ty<'t>>,
    /// The element type.
    pub elem: &'t Ty<'t>,
}

/// A subtype of another type.
#[derive(Debug)]
pub struct SubtypeTy<'t> {
    /// The name of the subtype, if it was declared with one.
    pub name: Option<Name>,
    /// The type being constrained.
    pub base: &'t Ty<'t>,
    /// The constraint ranges. Empty if the subtype merely renames its base.
    pub constraints: Vec<Range<'t>>,
}

/// A record type.
#[derive(Debug)]
pub struct RecordTy<'t> {
    /// The name of the type, if it was declared with one.
    pub name: Option<Name>,
    /// The fields, in declaration order.
    pub fields: Vec<(Name, &'t Ty<'t>)>,
}

impl<'t> Ty<'t> {
    /// Check if this is an integer type, resolving subtypes.
    pub fn is_integer(&self) -> bool {
        match *self {
            Ty::Int(_) => true,
            Ty::Subtype(ref st) => st.base.is_integer(),
            _ => false,
        }
    }

    /// Check if this is a real type, resolving subtypes.
    pub fn is_real(&self) -> bool {
        match *self {
            Ty::Real(_) => true,
            Ty::Subtype(ref st) => st.base.is_real(),
            _ => false,
        }
    }

    /// Check if this is an enumeration type, resolving subtypes.
    pub fn is_enum(&self) -> bool {
        match *self {
            Ty::Enum(_) => true,
            Ty::Subtype(ref st) => st.base.is_enum(),
            _ => false,
        }
    }

    /// Check if this is an array type, resolving subtypes.
    pub fn is_array(&self) -> bool {
        match *self {
            Ty::Array(_) | Ty::UArray(_) => true,
            Ty::Subtype(ref st) => st.base.is_array(),
            _ => false,
        }
    }

    /// Check if this is a record type, resolving subtypes.
    pub fn is_record(&self) -> bool {
        match *self {
            Ty::Record(_) => true,
            Ty::Subtype(ref st) => st.base.is_record(),
            _ => false,
        }
    }

    /// Check if this is an unconstrained array type, i.e. one whose index
    /// ranges are deferred to the object declaration.
    pub fn is_unconstrained(&self) -> bool {
        match *self {
            Ty::UArray(_) => true,
            Ty::Subtype(ref st) => st.constraints.is_empty() && st.base.is_unconstrained(),
            _ => false,
        }
    }

    /// The number of dimension ranges this type carries.
    pub fn dims(&self) -> usize {
        match *self {
            Ty::Int(_) | Ty::Real(_) | Ty::Physical(_) => 1,
            Ty::Array(ref a) => a.dims.len(),
            Ty::UArray(ref a) => a.index.len(),
            Ty::Subtype(ref st) => {
                if st.constraints.is_empty() {
                    st.base.dims()
                } else {
                    st.constraints.len()
                }
            }
            _ => 0,
        }
    }

    /// The range of dimension `i`, if the type has one.
    pub fn dim(&self, i: usize) -> Option<Range<'t>> {
        match *self {
            Ty::Int(ref t) if i == 0 => Some(t.range),
            Ty::Real(ref t) if i == 0 => Some(t.range),
            Ty::Physical(ref t) if i == 0 => Some(t.range),
            Ty::Array(ref a) => a.dims.get(i).copied(),
            Ty::Subtype(ref st) => {
                if st.constraints.is_empty() {
                    st.base.dim(i)
                } else {
                    st.constraints.get(i).copied()
                }
            }
            _ => None,
        }
    }

    /// The element type of an array type, resolving subtypes.
    pub fn elem(&self) -> Option<&'t Ty<'t>> {
        match *self {
            Ty::Array(ref a) => Some(a.elem),
            Ty::UArray(ref a) => Some(a.elem),
            Ty::Subtype(ref st) => st.base.elem(),
            _ => None,
        }
    }

    /// The index type of dimension `i` of an unconstrained array type.
    pub fn index_constr(&self, i: usize) -> Option<&'t Ty<'t>> {
        match *self {
            Ty::UArray(ref a) => a.index.get(i).copied(),
            Ty::Subtype(ref st) => st.base.index_constr(i),
            _ => None,
        }
    }

    /// Resolve subtypes down to the base type.
    pub fn base_recur(&self) -> &Ty<'t> {
        match *self {
            Ty::Subtype(ref st) => st.base.base_recur(),
            _ => self,
        }
    }

    /// The enumeration data of this type, resolving subtypes.
    pub fn as_enum(&self) -> Option<&EnumTy> {
        match *self.base_recur() {
            Ty::Enum(ref e) => Some(e),
            _ => None,
        }
    }

    /// The name this type was declared with, if any.
    pub fn name(&self) -> Option<Name> {
        match *self {
            Ty::Int(ref t) => t.name,
            Ty::Real(ref t) => t.name,
            Ty::Physical(ref t) => t.name,
            Ty::Enum(ref t) => t.name,
            Ty::Record(ref t) => t.name,
            Ty::Subtype(ref st) => st.name.or_else(|| st.base.name()),
            _ => None,
        }
    }

    /// A textual description of the kind of type.
    pub fn kind_desc(&self) -> &'static str {
        match *self {
            Ty::Int(_) => "integer type",
            Ty::Real(_) => "real type",
            Ty::Physical(_) => "physical type",
            Ty::Enum(_) => "enumeration type",
            Ty::Array(_) => "array type",
            Ty::UArray(_) => "unconstrained array type",
            Ty::Subtype(_) => "subtype",
            Ty::Access(_) => "access type",
            Ty::File(_) => "file type",
            Ty::Record(_) => "record type",
        }
    }
}

impl<'t> fmt::Display for Ty<'t> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.kind_desc()),
        }
    }
}
