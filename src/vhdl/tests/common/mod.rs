// Copyright (c) 2016-2021 Fabian Schuiki
#![allow(dead_code)]

//! Utilities for middle end tests.

pub use vesta_common::Session;
pub use vesta_vhdl::builtin::{Builtin, PredefAttr};
pub use vesta_vhdl::tree::*;
pub use vesta_vhdl::ty::*;
pub use vesta_vhdl::{bounds, eval, konst};

use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;
use vesta_common::name::{get_name_table, Name};
use vesta_common::source::{Source, Span};

/// Create a fresh session, arenas, and context, and bind a [`Builder`] over
/// them to the given identifier.
macro_rules! fixture {
    ($b:ident) => {
        let sess = Session::new();
        let arenas = Arenas::new();
        let cx = Context::new(&sess, &arenas);
        let $b = Builder::new(&cx);
    };
}

/// Collect the messages of all diagnostics emitted into a session.
pub fn collect_messages(sess: &Session) -> Rc<RefCell<Vec<String>>> {
    let messages = Rc::new(RefCell::new(Vec::new()));
    let clone = messages.clone();
    sess.set_reporter(move |d| clone.borrow_mut().push(d.get_message().clone()));
    messages
}

/// Constructs trees the way the analysis passes would.
///
/// Every node gets a distinct span so diagnostics can be told apart.
pub struct Builder<'e, 't> {
    pub cx: &'e Context<'t>,
    offset: Cell<usize>,
}

impl<'e, 't> Builder<'e, 't> {
    pub fn new(cx: &'e Context<'t>) -> Builder<'e, 't> {
        Builder {
            cx: cx,
            offset: Cell::new(0),
        }
    }

    pub fn name(&self, s: &str) -> Name {
        get_name_table().intern(s, false)
    }

    pub fn span(&self) -> Span {
        let begin = self.offset.get();
        self.offset.set(begin + 1);
        Span::new(Source(1), begin, begin + 1)
    }

    pub fn node(&self, ty: Option<&'t Ty<'t>>, data: TreeData<'t>) -> &'t Tree<'t> {
        self.cx.alloc(Tree {
            span: self.span(),
            ty: ty,
            data: data,
        })
    }

    // Types

    pub fn int_ty(&self, name: &str, kind: RangeKind, left: i64, right: i64) -> &'t Ty<'t> {
        let range = self.range(kind, left, right);
        self.cx.alloc_ty(Ty::Int(IntTy {
            name: Some(self.name(name)),
            range: range,
        }))
    }

    pub fn int_subtype(
        &self,
        name: &str,
        base: &'t Ty<'t>,
        kind: RangeKind,
        left: i64,
        right: i64,
    ) -> &'t Ty<'t> {
        let range = self.range(kind, left, right);
        self.cx.alloc_ty(Ty::Subtype(SubtypeTy {
            name: Some(self.name(name)),
            base: base,
            constraints: vec![range],
        }))
    }

    pub fn enum_ty(&self, name: &str, lits: &[&str]) -> (&'t Ty<'t>, Vec<&'t Tree<'t>>) {
        let ty = self.cx.alloc_ty(Ty::Enum(EnumTy {
            name: Some(self.name(name)),
            lits: lits.iter().map(|l| self.name(l)).collect(),
        }));
        let decls = lits
            .iter()
            .enumerate()
            .map(|(pos, l)| {
                self.node(
                    Some(ty),
                    TreeData::EnumLit {
                        name: self.name(l),
                        pos: pos,
                    },
                )
            })
            .collect();
        (ty, decls)
    }

    /// A constrained array type whose dimension bounds are typed with the
    /// index subtype, as the analysis pass would produce.
    pub fn array_ty(
        &self,
        index: &'t Ty<'t>,
        kind: RangeKind,
        left: i64,
        right: i64,
        elem: &'t Ty<'t>,
    ) -> &'t Ty<'t> {
        let l = self.node(Some(index), TreeData::Literal(Literal::Int(left)));
        let r = self.node(Some(index), TreeData::Literal(Literal::Int(right)));
        self.cx.alloc_ty(Ty::Array(ArrayTy {
            dims: vec![Range::new(kind, l, r)],
            elem: elem,
        }))
    }

    pub fn uarray_ty(&self, index: &'t Ty<'t>, elem: &'t Ty<'t>) -> &'t Ty<'t> {
        self.cx.alloc_ty(Ty::UArray(UArrayTy {
            index: vec![index],
            elem: elem,
        }))
    }

    pub fn range(&self, kind: RangeKind, left: i64, right: i64) -> Range<'t> {
        Range::new(kind, self.int(left), self.int(right))
    }

    // Expressions

    pub fn int(&self, value: i64) -> &'t Tree<'t> {
        self.node(
            Some(self.cx.std.universal_int),
            TreeData::Literal(Literal::Int(value)),
        )
    }

    pub fn int_of(&self, ty: &'t Ty<'t>, value: i64) -> &'t Tree<'t> {
        self.node(Some(ty), TreeData::Literal(Literal::Int(value)))
    }

    pub fn real(&self, value: f64) -> &'t Tree<'t> {
        self.node(
            Some(self.cx.std.universal_real),
            TreeData::Literal(Literal::Real(value)),
        )
    }

    pub fn str_lit(&self, ty: Option<&'t Ty<'t>>, chars: &str) -> &'t Tree<'t> {
        let chars = chars
            .chars()
            .map(|c| get_name_table().intern(&c.to_string(), true))
            .collect();
        self.node(ty, TreeData::Literal(Literal::Str(chars)))
    }

    pub fn refer(&self, decl: &'t Tree<'t>) -> &'t Tree<'t> {
        self.node(
            decl.ty,
            TreeData::Ref {
                name: decl.ident().expect("declaration has no name"),
                decl: decl,
            },
        )
    }

    pub fn call(
        &self,
        decl: &'t Tree<'t>,
        ret_ty: Option<&'t Ty<'t>>,
        params: Vec<&'t Tree<'t>>,
    ) -> &'t Tree<'t> {
        self.node(
            ret_ty,
            TreeData::Fcall {
                decl: decl,
                params: params,
            },
        )
    }

    /// A call to a declaration of the given builtin operation.
    pub fn call_builtin(
        &self,
        builtin: Builtin,
        ret_ty: Option<&'t Ty<'t>>,
        params: Vec<&'t Tree<'t>>,
    ) -> &'t Tree<'t> {
        let decl = self.node(
            None,
            TreeData::FuncDecl {
                name: self.name(&format!("\"{}\"", builtin)),
                ports: vec![],
                builtin: Some(builtin),
            },
        );
        self.call(decl, ret_ty, params)
    }

    // Declarations

    pub fn signal(&self, name: &str, ty: &'t Ty<'t>, init: Option<&'t Tree<'t>>) -> &'t Tree<'t> {
        self.node(
            Some(ty),
            TreeData::SignalDecl {
                name: self.name(name),
                init: init,
            },
        )
    }

    pub fn variable(
        &self,
        name: &str,
        ty: &'t Ty<'t>,
        init: Option<&'t Tree<'t>>,
    ) -> &'t Tree<'t> {
        self.node(
            Some(ty),
            TreeData::VarDecl {
                name: self.name(name),
                init: init,
            },
        )
    }

    pub fn constant(&self, name: &str, ty: &'t Ty<'t>, init: &'t Tree<'t>) -> &'t Tree<'t> {
        self.node(
            Some(ty),
            TreeData::ConstDecl {
                name: self.name(name),
                init: Some(init),
            },
        )
    }

    pub fn port(&self, name: &str, ty: &'t Ty<'t>, default: Option<&'t Tree<'t>>) -> &'t Tree<'t> {
        self.node(
            Some(ty),
            TreeData::PortDecl {
                name: self.name(name),
                default: default,
            },
        )
    }

    pub fn func(
        &self,
        name: &str,
        ports: Vec<&'t Tree<'t>>,
        decls: Vec<&'t Tree<'t>>,
        stmts: Vec<&'t Tree<'t>>,
    ) -> &'t Tree<'t> {
        self.node(
            None,
            TreeData::FuncBody {
                name: self.name(name),
                ports: ports,
                decls: decls,
                stmts: stmts,
                builtin: None,
            },
        )
    }

    // Statements

    pub fn ret(&self, value: &'t Tree<'t>) -> &'t Tree<'t> {
        self.node(None, TreeData::Return { value: Some(value) })
    }

    pub fn if_stmt(
        &self,
        cond: &'t Tree<'t>,
        then_stmts: Vec<&'t Tree<'t>>,
        else_stmts: Vec<&'t Tree<'t>>,
    ) -> &'t Tree<'t> {
        self.node(
            None,
            TreeData::If {
                cond: cond,
                then_stmts: then_stmts,
                else_stmts: else_stmts,
            },
        )
    }

    pub fn while_stmt(
        &self,
        label: &str,
        cond: Option<&'t Tree<'t>>,
        stmts: Vec<&'t Tree<'t>>,
    ) -> &'t Tree<'t> {
        self.node(
            None,
            TreeData::While {
                label: self.name(label),
                cond: cond,
                stmts: stmts,
            },
        )
    }

    pub fn for_stmt(
        &self,
        label: &str,
        decl: &'t Tree<'t>,
        range: Range<'t>,
        stmts: Vec<&'t Tree<'t>>,
    ) -> &'t Tree<'t> {
        self.node(
            None,
            TreeData::For {
                label: self.name(label),
                decl: decl,
                range: range,
                stmts: stmts,
            },
        )
    }

    pub fn assign(&self, target: &'t Tree<'t>, value: &'t Tree<'t>) -> &'t Tree<'t> {
        self.node(
            None,
            TreeData::VarAssign {
                target: target,
                value: value,
            },
        )
    }

    pub fn exit(&self, label: &str, cond: Option<&'t Tree<'t>>) -> &'t Tree<'t> {
        self.node(
            None,
            TreeData::Exit {
                label: self.name(label),
                cond: cond,
            },
        )
    }

    pub fn named_assoc(&self, name: &'t Tree<'t>, value: &'t Tree<'t>) -> Assoc<'t> {
        Assoc {
            span: self.span(),
            kind: AssocKind::Named(name),
            value: value,
        }
    }

    pub fn range_assoc(&self, range: Range<'t>, value: &'t Tree<'t>) -> Assoc<'t> {
        Assoc {
            span: self.span(),
            kind: AssocKind::Range(range),
            value: value,
        }
    }

    pub fn pos_assoc(&self, value: &'t Tree<'t>) -> Assoc<'t> {
        Assoc {
            span: self.span(),
            kind: AssocKind::Pos,
            value: value,
        }
    }

    pub fn others_assoc(&self, value: &'t Tree<'t>) -> Assoc<'t> {
        Assoc {
            span: self.span(),
            kind: AssocKind::Others,
            value: value,
        }
    }

    pub fn case(&self, value: &'t Tree<'t>, assocs: Vec<Assoc<'t>>) -> &'t Tree<'t> {
        self.node(
            None,
            TreeData::Case {
                value: value,
                assocs: assocs,
            },
        )
    }

    /// A binary operator expression, as the overload resolver would lower it:
    /// a call to the builtin's declaration.
    pub fn binop(
        &self,
        builtin: Builtin,
        ret_ty: Option<&'t Ty<'t>>,
        lhs: &'t Tree<'t>,
        rhs: &'t Tree<'t>,
    ) -> &'t Tree<'t> {
        self.call_builtin(builtin, ret_ty, vec![lhs, rhs])
    }
}
