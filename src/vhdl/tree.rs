// Copyright (c) 2016-2021 Fabian Schuiki

//! The tree representation of an analyzed design.
//!
//! The parser and name resolver hand the middle end a tree of nodes with
//! resolved references and attached types. Nodes are tagged with a coarse
//! kind; literals and associations carry a secondary tag. The middle end
//! never mutates the tree, with the sole exception of the elide-bounds
//! marker on array references; the evaluator produces replacement subtrees
//! instead.

use crate::builtin::{Builtin, PredefAttr, Standard};
use crate::ty::{Range, Ty};
use std::cell::Cell;
use std::fmt;
use vesta_common::errors::{DiagBuilder2, DiagEmitter};
use vesta_common::name::Name;
use vesta_common::source::Span;
use vesta_common::util::{HasDesc, HasSpan};
use vesta_common::Session;

/// A node in the tree.
#[derive(Debug)]
pub struct Tree<'t> {
    /// The source location of the node.
    pub span: Span,
    /// The type of the node, for expressions and typed declarations.
    pub ty: Option<&'t Ty<'t>>,
    /// The kind of the node and its children.
    pub data: TreeData<'t>,
}

/// The different kinds of nodes.
#[derive(Debug)]
pub enum TreeData<'t> {
    // Declarations

    /// A signal declaration.
    SignalDecl {
        /// The name of the signal.
        name: Name,
        /// The initial value.
        init: Option<&'t Tree<'t>>,
    },
    /// A variable declaration.
    VarDecl {
        /// The name of the variable.
        name: Name,
        /// The initial value.
        init: Option<&'t Tree<'t>>,
    },
    /// A constant declaration.
    ConstDecl {
        /// The name of the constant.
        name: Name,
        /// The value of the constant.
        init: Option<&'t Tree<'t>>,
    },
    /// A subprogram formal parameter.
    PortDecl {
        /// The name of the parameter.
        name: Name,
        /// The default value.
        default: Option<&'t Tree<'t>>,
    },
    /// An enumeration literal.
    EnumLit {
        /// The name of the literal.
        name: Name,
        /// The position within the declaring enumeration type.
        pos: usize,
    },
    /// A function declaration without a body.
    FuncDecl {
        /// The name of the function.
        name: Name,
        /// The formal parameters.
        ports: Vec<&'t Tree<'t>>,
        /// The builtin operation this function implements, if any.
        builtin: Option<Builtin>,
    },
    /// A function body.
    FuncBody {
        /// The name of the function.
        name: Name,
        /// The formal parameters.
        ports: Vec<&'t Tree<'t>>,
        /// The local declarations.
        decls: Vec<&'t Tree<'t>>,
        /// The statements.
        stmts: Vec<&'t Tree<'t>>,
        /// The builtin operation this function implements, if any.
        builtin: Option<Builtin>,
    },
    /// A procedure declaration.
    ProcDecl {
        /// The name of the procedure.
        name: Name,
        /// The formal parameters.
        ports: Vec<&'t Tree<'t>>,
    },
    /// An alias declaration.
    AliasDecl {
        /// The name of the alias.
        name: Name,
        /// The aliased object.
        target: &'t Tree<'t>,
    },

    // Statements

    /// An if statement.
    If {
        /// The condition.
        cond: &'t Tree<'t>,
        /// The statements of the true branch.
        then_stmts: Vec<&'t Tree<'t>>,
        /// The statements of the false branch.
        else_stmts: Vec<&'t Tree<'t>>,
    },
    /// A case statement.
    Case {
        /// The discriminating expression.
        value: &'t Tree<'t>,
        /// The choices.
        assocs: Vec<Assoc<'t>>,
    },
    /// A while loop, or a plain loop if no condition is present.
    While {
        /// The label of the loop.
        label: Name,
        /// The iteration condition.
        cond: Option<&'t Tree<'t>>,
        /// The statements of the loop body.
        stmts: Vec<&'t Tree<'t>>,
    },
    /// A for loop.
    For {
        /// The label of the loop.
        label: Name,
        /// The declaration of the induction variable.
        decl: &'t Tree<'t>,
        /// The iteration range.
        range: Range<'t>,
        /// The statements of the loop body.
        stmts: Vec<&'t Tree<'t>>,
    },
    /// A return statement.
    Return {
        /// The returned value.
        value: Option<&'t Tree<'t>>,
    },
    /// An exit statement.
    Exit {
        /// The label of the loop to exit. Name resolution fills in the label
        /// of the enclosing loop if the statement does not name one.
        label: Name,
        /// The exit condition.
        cond: Option<&'t Tree<'t>>,
    },
    /// A block statement.
    Block {
        /// The declarations of the block.
        decls: Vec<&'t Tree<'t>>,
        /// The statements of the block.
        stmts: Vec<&'t Tree<'t>>,
    },
    /// A variable assignment.
    VarAssign {
        /// The assignment target.
        target: &'t Tree<'t>,
        /// The assigned value.
        value: &'t Tree<'t>,
    },
    /// A signal assignment.
    SigAssign {
        /// The assignment target.
        target: &'t Tree<'t>,
        /// The values of the waveform elements.
        waveforms: Vec<&'t Tree<'t>>,
    },
    /// A procedure call.
    Pcall {
        /// The called procedure.
        decl: &'t Tree<'t>,
        /// The actual parameters, positionally.
        params: Vec<&'t Tree<'t>>,
    },

    // Expressions

    /// A literal.
    Literal(Literal),
    /// A reference to a declaration.
    Ref {
        /// The name being referred to.
        name: Name,
        /// The referenced declaration.
        decl: &'t Tree<'t>,
    },
    /// A function call.
    Fcall {
        /// The called function.
        decl: &'t Tree<'t>,
        /// The actual parameters, positionally.
        params: Vec<&'t Tree<'t>>,
    },
    /// An indexed access into an array.
    ArrayRef {
        /// The accessed array.
        value: &'t Tree<'t>,
        /// The index expressions, one per dimension.
        indices: Vec<&'t Tree<'t>>,
        /// Set by the bounds checker when all indices are static and in
        /// bounds, allowing the backend to omit the runtime check.
        elide_bounds: Cell<bool>,
    },
    /// A slice of an array.
    ArraySlice {
        /// The sliced array.
        value: &'t Tree<'t>,
        /// The slice range.
        range: Range<'t>,
    },
    /// An aggregate.
    Aggregate {
        /// The element associations.
        assocs: Vec<Assoc<'t>>,
        /// Whether the aggregate was declared with an unconstrained array
        /// type and had its constraint derived from context.
        unconstrained: bool,
    },
    /// A type conversion. The target type is the node's type.
    TypeConv {
        /// The converted expression.
        value: &'t Tree<'t>,
    },
    /// A reference to an attribute of a named entity.
    AttrRef {
        /// The prefix the attribute is applied to.
        prefix: &'t Tree<'t>,
        /// The name of the attribute.
        attr: Name,
        /// The predefined attribute this resolves to, if any.
        predef: Option<PredefAttr>,
        /// The attribute arguments.
        params: Vec<&'t Tree<'t>>,
    },
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// An integer literal.
    Int(i64),
    /// A real literal.
    Real(f64),
    /// A string literal, as a sequence of character literal names.
    Str(Vec<Name>),
    /// A physical literal, as a multiple of the named unit.
    Physical(i64, Name),
}

/// An element association in an aggregate or a choice in a case statement.
#[derive(Debug)]
pub struct Assoc<'t> {
    /// The source location of the association.
    pub span: Span,
    /// The kind of association.
    pub kind: AssocKind<'t>,
    /// The associated value; an expression in aggregates, a statement in
    /// case statements.
    pub value: &'t Tree<'t>,
}

/// The different kinds of associations.
#[derive(Debug)]
pub enum AssocKind<'t> {
    /// A positional association.
    Pos,
    /// A named association `choice =>`.
    Named(&'t Tree<'t>),
    /// A range association `low to high =>`.
    Range(Range<'t>),
    /// A catch-all association `others =>`.
    Others,
}

impl<'t> Tree<'t> {
    /// The name this node declares or refers to, if any.
    pub fn ident(&self) -> Option<Name> {
        match self.data {
            TreeData::SignalDecl { name, .. }
            | TreeData::VarDecl { name, .. }
            | TreeData::ConstDecl { name, .. }
            | TreeData::PortDecl { name, .. }
            | TreeData::EnumLit { name, .. }
            | TreeData::FuncDecl { name, .. }
            | TreeData::FuncBody { name, .. }
            | TreeData::ProcDecl { name, .. }
            | TreeData::AliasDecl { name, .. }
            | TreeData::Ref { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl<'t> HasSpan for Tree<'t> {
    fn span(&self) -> Span {
        self.span
    }
}

impl<'t> HasDesc for Tree<'t> {
    fn desc(&self) -> &'static str {
        match self.data {
            TreeData::SignalDecl { .. } => "signal declaration",
            TreeData::VarDecl { .. } => "variable declaration",
            TreeData::ConstDecl { .. } => "constant declaration",
            TreeData::PortDecl { .. } => "parameter declaration",
            TreeData::EnumLit { .. } => "enumeration literal",
            TreeData::FuncDecl { .. } => "function declaration",
            TreeData::FuncBody { .. } => "function body",
            TreeData::ProcDecl { .. } => "procedure declaration",
            TreeData::AliasDecl { .. } => "alias declaration",
            TreeData::If { .. } => "if statement",
            TreeData::Case { .. } => "case statement",
            TreeData::While { .. } => "while loop",
            TreeData::For { .. } => "for loop",
            TreeData::Return { .. } => "return statement",
            TreeData::Exit { .. } => "exit statement",
            TreeData::Block { .. } => "block statement",
            TreeData::VarAssign { .. } => "variable assignment",
            TreeData::SigAssign { .. } => "signal assignment",
            TreeData::Pcall { .. } => "procedure call",
            TreeData::Literal(_) => "literal",
            TreeData::Ref { .. } => "name",
            TreeData::Fcall { .. } => "function call",
            TreeData::ArrayRef { .. } => "indexed name",
            TreeData::ArraySlice { .. } => "slice",
            TreeData::Aggregate { .. } => "aggregate",
            TreeData::TypeConv { .. } => "type conversion",
            TreeData::AttrRef { .. } => "attribute reference",
        }
    }
}

impl<'t> fmt::Display for Tree<'t> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.ident() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.desc()),
        }
    }
}

/// Visit `t` and all of its children in pre-order.
///
/// Reference back-links to declarations are not followed; a declaration is
/// visited where it is declared. Recursion follows tree depth, so trees
/// nested deeper than the thread's stack allows are not supported.
pub fn walk<'t>(t: &'t Tree<'t>, f: &mut dyn FnMut(&'t Tree<'t>)) {
    f(t);
    match t.data {
        TreeData::SignalDecl { init, .. }
        | TreeData::VarDecl { init, .. }
        | TreeData::ConstDecl { init, .. } => {
            walk_opt(init, f);
        }
        TreeData::PortDecl { default, .. } => {
            walk_opt(default, f);
        }
        TreeData::EnumLit { .. } | TreeData::Literal(_) | TreeData::Ref { .. } => (),
        TreeData::FuncDecl { ref ports, .. } | TreeData::ProcDecl { ref ports, .. } => {
            walk_list(ports, f);
        }
        TreeData::FuncBody {
            ref ports,
            ref decls,
            ref stmts,
            ..
        } => {
            walk_list(ports, f);
            walk_list(decls, f);
            walk_list(stmts, f);
        }
        TreeData::AliasDecl { target, .. } => {
            walk(target, f);
        }
        TreeData::If {
            cond,
            ref then_stmts,
            ref else_stmts,
        } => {
            walk(cond, f);
            walk_list(then_stmts, f);
            walk_list(else_stmts, f);
        }
        TreeData::Case { value, ref assocs } => {
            walk(value, f);
            walk_assocs(assocs, f);
        }
        TreeData::While { cond, ref stmts, .. } => {
            walk_opt(cond, f);
            walk_list(stmts, f);
        }
        TreeData::For {
            decl,
            range,
            ref stmts,
            ..
        } => {
            walk(decl, f);
            walk_range(range, f);
            walk_list(stmts, f);
        }
        TreeData::Return { value } => {
            walk_opt(value, f);
        }
        TreeData::Exit { cond, .. } => {
            walk_opt(cond, f);
        }
        TreeData::Block {
            ref decls,
            ref stmts,
        } => {
            walk_list(decls, f);
            walk_list(stmts, f);
        }
        TreeData::VarAssign { target, value } => {
            walk(target, f);
            walk(value, f);
        }
        TreeData::SigAssign {
            target,
            ref waveforms,
        } => {
            walk(target, f);
            walk_list(waveforms, f);
        }
        TreeData::Pcall { ref params, .. } | TreeData::Fcall { ref params, .. } => {
            walk_list(params, f);
        }
        TreeData::ArrayRef {
            value, ref indices, ..
        } => {
            walk(value, f);
            walk_list(indices, f);
        }
        TreeData::ArraySlice { value, range } => {
            walk(value, f);
            walk_range(range, f);
        }
        TreeData::Aggregate { ref assocs, .. } => {
            walk_assocs(assocs, f);
        }
        TreeData::TypeConv { value } => {
            walk(value, f);
        }
        TreeData::AttrRef {
            prefix, ref params, ..
        } => {
            walk(prefix, f);
            walk_list(params, f);
        }
    }
}

fn walk_opt<'t>(t: Option<&'t Tree<'t>>, f: &mut dyn FnMut(&'t Tree<'t>)) {
    if let Some(t) = t {
        walk(t, f);
    }
}

fn walk_list<'t>(list: &[&'t Tree<'t>], f: &mut dyn FnMut(&'t Tree<'t>)) {
    for t in list {
        walk(t, f);
    }
}

fn walk_range<'t>(r: Range<'t>, f: &mut dyn FnMut(&'t Tree<'t>)) {
    walk(r.left, f);
    walk(r.right, f);
}

fn walk_assocs<'t>(assocs: &[Assoc<'t>], f: &mut dyn FnMut(&'t Tree<'t>)) {
    for a in assocs {
        match a.kind {
            AssocKind::Named(name) => walk(name, f),
            AssocKind::Range(r) => walk_range(r, f),
            AssocKind::Pos | AssocKind::Others => (),
        }
        walk(a.value, f);
    }
}

make_arenas! {
    /// The arenas the middle end allocates nodes into.
    pub struct Arenas<'t> {
        tree: Tree<'t>,
        ty: Ty<'t>,
    }
}

/// The context both the evaluator and the bounds checker operate in.
///
/// Bundles the session, the arenas replacement nodes are allocated into, and
/// the predefined types and literals of the `STANDARD` package.
pub struct Context<'t> {
    /// The session diagnostics are emitted into.
    pub sess: &'t Session,
    /// The arenas nodes are allocated into.
    pub arenas: &'t Arenas<'t>,
    /// The predefined types and literals.
    pub std: Standard<'t>,
}

impl<'t> Context<'t> {
    /// Create a new context.
    pub fn new(sess: &'t Session, arenas: &'t Arenas<'t>) -> Context<'t> {
        Context {
            sess: sess,
            arenas: arenas,
            std: Standard::new(arenas),
        }
    }

    /// Allocate a tree node.
    pub fn alloc(&self, tree: Tree<'t>) -> &'t Tree<'t> {
        self.arenas.tree.alloc(tree)
    }

    /// Allocate a type.
    pub fn alloc_ty(&self, ty: Ty<'t>) -> &'t Ty<'t> {
        self.arenas.ty.alloc(ty)
    }

    /// Create an integer literal carrying the span and type of `like`.
    pub fn int_lit(&self, like: &'t Tree<'t>, value: i64) -> &'t Tree<'t> {
        self.alloc(Tree {
            span: like.span,
            ty: like.ty,
            data: TreeData::Literal(Literal::Int(value)),
        })
    }

    /// Create a real literal carrying the span and type of `like`.
    pub fn real_lit(&self, like: &'t Tree<'t>, value: f64) -> &'t Tree<'t> {
        self.alloc(Tree {
            span: like.span,
            ty: like.ty,
            data: TreeData::Literal(Literal::Real(value)),
        })
    }

    /// Create a reference to the boolean literal `TRUE` or `FALSE`, carrying
    /// the span of `like`.
    pub fn bool_lit(&self, like: &'t Tree<'t>, value: bool) -> &'t Tree<'t> {
        let lit = if value {
            self.std.true_lit
        } else {
            self.std.false_lit
        };
        self.alloc(Tree {
            span: like.span,
            ty: Some(self.std.boolean),
            data: TreeData::Ref {
                name: lit.ident().unwrap(),
                decl: lit,
            },
        })
    }
}

impl<'t> DiagEmitter for Context<'t> {
    fn emit(&self, diag: DiagBuilder2) {
        self.sess.emit(diag)
    }
}
