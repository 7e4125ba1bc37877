// Copyright (c) 2016-2021 Fabian Schuiki

//! Builtin types, operations, and attributes.
//!
//! Function declarations that implement a predefined VHDL operator carry a
//! [`Builtin`] tag naming the operation. The constant folder dispatches on
//! this tag to reduce calls over literal operands without ever looking at a
//! function body.

use crate::tree::{Arenas, Tree, TreeData};
use crate::ty::{EnumTy, IntTy, Range, RangeKind, RealTy, Ty};
use std::collections::HashMap;
use std::fmt;
use vesta_common::name::{get_name_table, Name};
use vesta_common::source::INVALID_SPAN;

/// A builtin operation.
///
/// The operand kinds a builtin applies to are determined by the folder: the
/// same `Eq` tag serves integer, boolean, real, and enumeration equality.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// Addition `+`.
    Add,
    /// Subtraction `-`.
    Sub,
    /// Multiplication `*`.
    Mul,
    /// Division `/`.
    Div,
    /// Modulus `mod`.
    Mod,
    /// Remainder `rem`.
    Rem,
    /// Negative sign `-`.
    Neg,
    /// Positive sign `+`.
    Identity,
    /// Power `**`.
    Exp,
    /// The predefined `MINIMUM` function.
    Min,
    /// The predefined `MAXIMUM` function.
    Max,
    /// Equality `=`.
    Eq,
    /// Inequality `/=`.
    Neq,
    /// Less than `<`.
    Lt,
    /// Less than or equal `<=`.
    Leq,
    /// Greater than `>`.
    Gt,
    /// Greater than or equal `>=`.
    Geq,
    /// Negation `not`.
    Not,
    /// Logical `and`.
    And,
    /// Logical `nand`.
    Nand,
    /// Logical `or`.
    Or,
    /// Logical `nor`.
    Nor,
    /// Logical `xor`.
    Xor,
    /// Logical `xnor`.
    Xnor,
    /// Universal real times universal integer.
    MulRI,
    /// Universal integer times universal real.
    MulIR,
    /// Universal real divided by universal integer.
    DivRI,
    /// Element-wise array equality `=`.
    ArrayEq,
    /// Element-wise array inequality `/=`.
    ArrayNeq,
}

impl Builtin {
    /// Map a name to a builtin operation.
    ///
    /// Returns `None` if no such operation exists.
    pub fn from_name(name: Name) -> Option<Builtin> {
        TBL.get(&name).map(|&b| b)
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Builtin::Add => "add",
            Builtin::Sub => "sub",
            Builtin::Mul => "mul",
            Builtin::Div => "div",
            Builtin::Mod => "mod",
            Builtin::Rem => "rem",
            Builtin::Neg => "neg",
            Builtin::Identity => "identity",
            Builtin::Exp => "exp",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Eq => "eq",
            Builtin::Neq => "neq",
            Builtin::Lt => "lt",
            Builtin::Leq => "leq",
            Builtin::Gt => "gt",
            Builtin::Geq => "geq",
            Builtin::Not => "not",
            Builtin::And => "and",
            Builtin::Nand => "nand",
            Builtin::Or => "or",
            Builtin::Nor => "nor",
            Builtin::Xor => "xor",
            Builtin::Xnor => "xnor",
            Builtin::MulRI => "mulri",
            Builtin::MulIR => "mulir",
            Builtin::DivRI => "divri",
            Builtin::ArrayEq => "aeq",
            Builtin::ArrayNeq => "aneq",
        };
        write!(f, "{}", name)
    }
}

// A static table that maps operation names to the actual builtin.
lazy_static! {
    static ref TBL: HashMap<Name, Builtin> = {
        let mut tbl = HashMap::new();
        let nt = get_name_table();
        let ops = [
            ("add", Builtin::Add),
            ("sub", Builtin::Sub),
            ("mul", Builtin::Mul),
            ("div", Builtin::Div),
            ("mod", Builtin::Mod),
            ("rem", Builtin::Rem),
            ("neg", Builtin::Neg),
            ("identity", Builtin::Identity),
            ("exp", Builtin::Exp),
            ("min", Builtin::Min),
            ("max", Builtin::Max),
            ("eq", Builtin::Eq),
            ("neq", Builtin::Neq),
            ("lt", Builtin::Lt),
            ("leq", Builtin::Leq),
            ("gt", Builtin::Gt),
            ("geq", Builtin::Geq),
            ("not", Builtin::Not),
            ("and", Builtin::And),
            ("nand", Builtin::Nand),
            ("or", Builtin::Or),
            ("nor", Builtin::Nor),
            ("xor", Builtin::Xor),
            ("xnor", Builtin::Xnor),
            ("mulri", Builtin::MulRI),
            ("mulir", Builtin::MulIR),
            ("divri", Builtin::DivRI),
            ("aeq", Builtin::ArrayEq),
            ("aneq", Builtin::ArrayNeq),
        ];
        for &(name, b) in ops.iter() {
            tbl.insert(nt.intern(name, false), b);
        }
        tbl
    };
}

/// A predefined attribute the bounds checker knows about.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PredefAttr {
    /// The `'LENGTH` attribute.
    Length,
    /// The `'LOW` attribute.
    Low,
    /// The `'HIGH` attribute.
    High,
    /// The `'LEFT` attribute.
    Left,
    /// The `'RIGHT` attribute.
    Right,
}

impl PredefAttr {
    /// Map a name to a predefined attribute.
    pub fn from_name(name: Name) -> Option<PredefAttr> {
        let nt = get_name_table();
        let attrs = [
            ("length", PredefAttr::Length),
            ("low", PredefAttr::Low),
            ("high", PredefAttr::High),
            ("left", PredefAttr::Left),
            ("right", PredefAttr::Right),
        ];
        attrs
            .iter()
            .find(|&&(n, _)| nt.intern(n, false) == name)
            .map(|&(_, a)| a)
    }
}

/// The predefined types and literals of the `STANDARD` package.
///
/// These are allocated per context since they live in the same arenas as the
/// rest of the tree.
pub struct Standard<'t> {
    /// The predefined `BOOLEAN` type.
    pub boolean: &'t Ty<'t>,
    /// The declaration of the literal `FALSE`.
    pub false_lit: &'t Tree<'t>,
    /// The declaration of the literal `TRUE`.
    pub true_lit: &'t Tree<'t>,
    /// The universal integer type.
    pub universal_int: &'t Ty<'t>,
    /// The universal real type.
    pub universal_real: &'t Ty<'t>,
}

impl<'t> Standard<'t> {
    /// Allocate the predefined types and literals into `arenas`.
    pub fn new(arenas: &'t Arenas<'t>) -> Standard<'t> {
        let nt = get_name_table();

        let false_name = nt.intern("false", false);
        let true_name = nt.intern("true", false);
        let boolean: &'t Ty<'t> = arenas.ty.alloc(Ty::Enum(EnumTy {
            name: Some(nt.intern("boolean", false)),
            lits: vec![false_name, true_name],
        }));
        let false_lit = arenas.tree.alloc(Tree {
            span: INVALID_SPAN,
            ty: Some(boolean),
            data: TreeData::EnumLit {
                name: false_name,
                pos: 0,
            },
        });
        let true_lit = arenas.tree.alloc(Tree {
            span: INVALID_SPAN,
            ty: Some(boolean),
            data: TreeData::EnumLit {
                name: true_name,
                pos: 1,
            },
        });

        let universal_int = {
            let left = arenas.tree.alloc(Tree {
                span: INVALID_SPAN,
                ty: None,
                data: TreeData::Literal(crate::tree::Literal::Int(i64::min_value())),
            });
            let right = arenas.tree.alloc(Tree {
                span: INVALID_SPAN,
                ty: None,
                data: TreeData::Literal(crate::tree::Literal::Int(i64::max_value())),
            });
            arenas.ty.alloc(Ty::Int(IntTy {
                name: Some(nt.intern("universal_integer", false)),
                range: Range::new(RangeKind::To, left, right),
            }))
        };
        let universal_real = {
            let left = arenas.tree.alloc(Tree {
                span: INVALID_SPAN,
                ty: None,
                data: TreeData::Literal(crate::tree::Literal::Real(std::f64::MIN)),
            });
            let right = arenas.tree.alloc(Tree {
                span: INVALID_SPAN,
                ty: None,
                data: TreeData::Literal(crate::tree::Literal::Real(std::f64::MAX)),
            });
            arenas.ty.alloc(Ty::Real(RealTy {
                name: Some(nt.intern("universal_real", false)),
                range: Range::new(RangeKind::To, left, right),
            }))
        };

        Standard {
            boolean: boolean,
            false_lit: false_lit,
            true_lit: true_lit,
            universal_int: universal_int,
            universal_real: universal_real,
        }
    }
}
