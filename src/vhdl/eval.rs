// Copyright (c) 2016-2021 Fabian Schuiki

//! Partial evaluation of function calls at elaboration time.
//!
//! The evaluator reduces calls over statically known operands to literals, so
//! that generics, array bounds, initial values, and guard expressions are
//! plain values by the time elaboration runs. It interprets a fixed catalogue
//! of builtin operations as well as user-defined function bodies over scalar
//! types. Evaluation is best-effort: any construct outside the supported
//! subset aborts the attempt and the original call is returned unchanged, to
//! be evaluated at run time instead.

use crate::builtin::Builtin;
use crate::konst::{self, folded, folded_bool, folded_int, folded_real, folded_str};
use crate::tree::{AssocKind, Context, Tree, TreeData};
use crate::ty::RangeKind;
use vesta_common::errors::{DiagBuilder2, DiagEmitter};
use vesta_common::name::Name;
use vesta_common::source::Span;
use vesta_common::util::HasDesc;

/// The maximum number of loop iterations the evaluator performs before it
/// concludes that a fold does not terminate.
pub const MAX_ITERS: usize = 1000;

/// Try to reduce a function call to a literal.
///
/// Returns the replacement literal if folding succeeded, or `call` itself
/// unchanged otherwise. Idempotent; may be called any number of times on the
/// same node.
pub fn eval<'t>(cx: &Context<'t>, call: &'t Tree<'t>) -> &'t Tree<'t> {
    debug_assert!(matches!(call.data, TreeData::Fcall { .. }));
    trace!("eval {}", call);
    let mut vt = Vtable::new();
    let result = Evaluator { cx: cx }.fcall(call, &mut vt);
    if vt.failed {
        call
    } else {
        result
    }
}

/// A stack of binding frames.
///
/// Each function call being interpreted pushes a frame that maps the names of
/// formals and locals to their current value. Lookups walk the stack from the
/// innermost frame outwards, which gives lexical shadowing.
struct Vtable<'t> {
    frames: Vec<Frame<'t>>,
    /// Set as soon as any construct refuses to fold; sticky for the rest of
    /// the evaluation attempt.
    failed: bool,
    /// The label of the loop a pending exit statement targets.
    exit: Option<Name>,
    /// The value of an executed return statement.
    result: Option<&'t Tree<'t>>,
}

struct Frame<'t> {
    bindings: Vec<(Name, &'t Tree<'t>)>,
}

impl<'t> Vtable<'t> {
    fn new() -> Vtable<'t> {
        Vtable {
            frames: Vec::new(),
            failed: false,
            exit: None,
            result: None,
        }
    }

    fn push(&mut self) {
        self.frames.push(Frame {
            bindings: Vec::new(),
        });
    }

    fn pop(&mut self) {
        self.frames.pop();
        self.result = None;
    }

    /// Bind a name in the innermost frame, replacing an existing binding of
    /// the same name in that frame.
    fn bind(&mut self, name: Name, value: &'t Tree<'t>) {
        let frame = match self.frames.last_mut() {
            Some(f) => f,
            None => return,
        };
        for binding in &mut frame.bindings {
            if binding.0 == name {
                binding.1 = value;
                return;
            }
        }
        frame.bindings.push((name, value));
    }

    fn get(&self, name: Name) -> Option<&'t Tree<'t>> {
        for frame in self.frames.iter().rev() {
            for &(n, v) in &frame.bindings {
                if n == name {
                    return Some(v);
                }
            }
        }
        None
    }
}

struct Evaluator<'e, 't> {
    cx: &'e Context<'t>,
}

impl<'e, 't> Evaluator<'e, 't> {
    /// Give up on the current evaluation attempt.
    ///
    /// Emits a warning pinpointing the offending expression if the session
    /// has evaluation debugging enabled.
    fn give_up<S: Into<String>>(&self, vt: &mut Vtable<'t>, span: Span, msg: S) {
        if self.cx.sess.opts.eval_debug {
            self.cx.emit(DiagBuilder2::warning(msg).span(span));
        }
        vt.failed = true;
    }

    fn expr(&self, t: &'t Tree<'t>, vt: &mut Vtable<'t>) -> &'t Tree<'t> {
        match t.data {
            TreeData::Fcall { .. } => self.fcall(t, vt),
            TreeData::Ref { .. } => self.reference(t, vt),
            TreeData::TypeConv { .. } => self.type_conv(t, vt),
            _ => t,
        }
    }

    fn fcall(&self, t: &'t Tree<'t>, vt: &mut Vtable<'t>) -> &'t Tree<'t> {
        let (decl, params) = match t.data {
            TreeData::Fcall { decl, ref params } => (decl, params),
            _ => unreachable!(),
        };
        let builtin = match decl.data {
            TreeData::FuncDecl { builtin, .. } | TreeData::FuncBody { builtin, .. } => builtin,
            _ => {
                self.give_up(vt, t.span, "call target is not a function");
                return t;
            }
        };

        let builtin = match builtin {
            Some(b) => b,
            None => return self.user_fcall(t, decl, params, vt),
        };

        let args: Vec<&'t Tree<'t>> = params.iter().map(|p| self.expr(p, vt)).collect();

        match builtin {
            Builtin::MulRI | Builtin::MulIR | Builtin::DivRI => {
                return self.fcall_universal(t, builtin, &args)
            }
            _ => (),
        }

        // Pick the reducer by the first operand category all arguments fold
        // into, in the order integer, boolean, real, enumeration, string.
        if let Some(iargs) = args.iter().map(|a| folded_int(a)).collect::<Option<Vec<_>>>() {
            self.fcall_int(t, builtin, &iargs)
        } else if let Some(bargs) = args
            .iter()
            .map(|a| folded_bool(a))
            .collect::<Option<Vec<_>>>()
        {
            self.fcall_log(t, builtin, &bargs)
        } else if let Some(rargs) = args
            .iter()
            .map(|a| folded_real(a))
            .collect::<Option<Vec<_>>>()
        {
            self.fcall_real(t, builtin, &rargs)
        } else if let Some(eargs) = args
            .iter()
            .map(|a| konst::folded_enum(a))
            .collect::<Option<Vec<_>>>()
        {
            self.fcall_enum(t, builtin, &eargs)
        } else if args.iter().all(|a| folded_str(a).is_some()) {
            self.fcall_str(t, builtin, &args)
        } else {
            t
        }
    }

    /// Interpret a call to a user-defined function.
    fn user_fcall(
        &self,
        t: &'t Tree<'t>,
        decl: &'t Tree<'t>,
        params: &[&'t Tree<'t>],
        vt: &mut Vtable<'t>,
    ) -> &'t Tree<'t> {
        let (ports, decls, stmts) = match decl.data {
            TreeData::FuncBody {
                ref ports,
                ref decls,
                ref stmts,
                ..
            } => (ports, decls, stmts),
            // A declaration without a body cannot be interpreted.
            _ => return t,
        };

        // Only scalar functions can be evaluated.
        if t.ty.map_or(false, |ty| ty.is_array()) {
            return t;
        }

        // Evaluate the actuals, falling back to the formal's default where no
        // actual was supplied. Every operand must reduce for the call to be
        // interpretable.
        let mut args = Vec::with_capacity(ports.len());
        for (i, port) in ports.iter().enumerate() {
            let actual = params.get(i).copied().or_else(|| match port.data {
                TreeData::PortDecl { default, .. } => default,
                _ => None,
            });
            let actual = match actual {
                Some(a) => a,
                None => return t,
            };
            let value = self.expr(actual, vt);
            if !folded(value) {
                return t;
            }
            args.push(value);
        }

        vt.push();
        for (port, arg) in ports.iter().zip(args) {
            if let Some(name) = port.ident() {
                vt.bind(name, arg);
            }
        }
        self.func_body(decls, stmts, vt);
        let result = vt.result;
        vt.pop();

        match result {
            Some(r) if folded(r) => r,
            _ => t,
        }
    }

    fn func_body(&self, decls: &[&'t Tree<'t>], stmts: &[&'t Tree<'t>], vt: &mut Vtable<'t>) {
        for decl in decls {
            if let TreeData::VarDecl {
                name,
                init: Some(init),
            } = decl.data
            {
                let value = self.expr(init, vt);
                vt.bind(name, value);
            }
        }
        self.stmts(stmts, vt);
    }

    fn stmts(&self, list: &[&'t Tree<'t>], vt: &mut Vtable<'t>) {
        for stmt in list {
            self.stmt(stmt, vt);
            if vt.failed || vt.result.is_some() || vt.exit.is_some() {
                return;
            }
        }
    }

    fn stmt(&self, t: &'t Tree<'t>, vt: &mut Vtable<'t>) {
        match t.data {
            TreeData::Return { .. } => self.return_stmt(t, vt),
            TreeData::If { .. } => self.if_stmt(t, vt),
            TreeData::Case { .. } => self.case_stmt(t, vt),
            TreeData::While { .. } => self.while_stmt(t, vt),
            TreeData::For { .. } => self.for_stmt(t, vt),
            TreeData::VarAssign { .. } => self.var_assign(t, vt),
            TreeData::Block { .. } => self.block(t, vt),
            TreeData::Exit { .. } => self.exit_stmt(t, vt),
            _ => self.give_up(vt, t.span, format!("cannot evaluate {}", t.desc())),
        }
    }

    fn return_stmt(&self, t: &'t Tree<'t>, vt: &mut Vtable<'t>) {
        debug_assert!(vt.result.is_none());
        match t.data {
            TreeData::Return { value: Some(value) } => {
                vt.result = Some(self.expr(value, vt));
            }
            _ => self.give_up(vt, t.span, "cannot evaluate return without value"),
        }
    }

    fn if_stmt(&self, t: &'t Tree<'t>, vt: &mut Vtable<'t>) {
        let (cond, then_stmts, else_stmts) = match t.data {
            TreeData::If {
                cond,
                ref then_stmts,
                ref else_stmts,
            } => (cond, then_stmts, else_stmts),
            _ => unreachable!(),
        };
        let cond = self.expr(cond, vt);
        match folded_bool(cond) {
            Some(true) => self.stmts(then_stmts, vt),
            Some(false) => self.stmts(else_stmts, vt),
            None => self.give_up(vt, cond.span, "cannot constant fold expression"),
        }
    }

    fn case_stmt(&self, t: &'t Tree<'t>, vt: &mut Vtable<'t>) {
        let (value, assocs) = match t.data {
            TreeData::Case { value, ref assocs } => (value, assocs),
            _ => unreachable!(),
        };

        if value.ty.map_or(false, |ty| ty.is_array()) {
            return self.give_up(vt, value.span, "cannot constant fold array case");
        }

        let value_int = match folded_int(self.expr(value, vt)) {
            Some(v) => v,
            None => return self.give_up(vt, value.span, "cannot constant fold expression"),
        };

        for a in assocs {
            match a.kind {
                AssocKind::Named(name) => {
                    let cmp = match folded_int(self.expr(name, vt)) {
                        Some(v) => v,
                        None => {
                            return self.give_up(vt, name.span, "cannot constant fold expression")
                        }
                    };
                    if cmp == value_int {
                        self.stmt(a.value, vt);
                        return;
                    }
                }
                AssocKind::Others => {
                    self.stmt(a.value, vt);
                    return;
                }
                _ => return self.give_up(vt, a.span, "cannot evaluate case choice"),
            }
        }
    }

    fn while_stmt(&self, t: &'t Tree<'t>, vt: &mut Vtable<'t>) {
        let (label, cond, stmts) = match t.data {
            TreeData::While {
                label,
                cond,
                ref stmts,
            } => (label, cond, stmts),
            _ => unreachable!(),
        };
        let mut iters = 0;
        while vt.result.is_none() {
            let mut cond_b = true;
            if let Some(cond) = cond {
                match folded_bool(self.expr(cond, vt)) {
                    Some(b) => cond_b = b,
                    None => {
                        return self.give_up(vt, cond.span, "cannot constant fold expression")
                    }
                }
            }

            if !cond_b || vt.failed {
                break;
            }
            iters += 1;
            if iters == MAX_ITERS {
                self.cx
                    .emit(DiagBuilder2::warning("iteration limit exceeded").span(t.span));
                vt.failed = true;
                break;
            }

            self.stmts(stmts, vt);

            if let Some(exit) = vt.exit {
                if exit == label {
                    vt.exit = None;
                }
                break;
            }
        }
    }

    fn for_stmt(&self, t: &'t Tree<'t>, vt: &mut Vtable<'t>) {
        let (label, decl, range, stmts) = match t.data {
            TreeData::For {
                label,
                decl,
                range,
                ref stmts,
            } => (label, decl, range, stmts),
            _ => unreachable!(),
        };
        if range.kind == RangeKind::Expr {
            vt.failed = true;
            return;
        }

        let left = self.expr(range.left, vt);
        let right = self.expr(range.right, vt);

        let (lefti, righti) = match (folded_int(left), folded_int(right)) {
            (Some(l), Some(r)) => (l, r),
            _ => {
                vt.failed = true;
                return;
            }
        };

        // A null range iterates zero times.
        if (range.kind == RangeKind::To && lefti > righti)
            || (range.kind == RangeKind::Downto && lefti < righti)
        {
            return;
        }

        let name = match decl.ident() {
            Some(n) => n,
            None => {
                vt.failed = true;
                return;
            }
        };

        let mut ival = lefti;
        loop {
            vt.bind(name, self.cx.int_lit(left, ival));
            self.stmts(stmts, vt);
            if let Some(exit) = vt.exit {
                if exit == label {
                    vt.exit = None;
                }
                break;
            }
            if vt.failed || vt.result.is_some() || ival == righti {
                break;
            }
            ival += match range.kind {
                RangeKind::To => 1,
                _ => -1,
            };
        }
    }

    fn var_assign(&self, t: &'t Tree<'t>, vt: &mut Vtable<'t>) {
        let (target, value) = match t.data {
            TreeData::VarAssign { target, value } => (target, value),
            _ => unreachable!(),
        };
        let decl = match target.data {
            TreeData::Ref { decl, .. } => decl,
            _ => return self.give_up(vt, target.span, "cannot evaluate this target"),
        };
        let updated = self.expr(value, vt);
        if !folded(updated) {
            return self.give_up(vt, value.span, "cannot constant fold expression");
        }
        if let Some(name) = decl.ident() {
            vt.bind(name, updated);
        }
    }

    fn block(&self, t: &'t Tree<'t>, vt: &mut Vtable<'t>) {
        let (decls, stmts) = match t.data {
            TreeData::Block {
                ref decls,
                ref stmts,
            } => (decls, stmts),
            _ => unreachable!(),
        };
        if !decls.is_empty() {
            return self.give_up(vt, t.span, "cannot evaluate block with declarations");
        }
        self.stmts(stmts, vt);
    }

    fn exit_stmt(&self, t: &'t Tree<'t>, vt: &mut Vtable<'t>) {
        let (label, cond) = match t.data {
            TreeData::Exit { label, cond } => (label, cond),
            _ => unreachable!(),
        };
        if let Some(cond) = cond {
            match folded_bool(self.expr(cond, vt)) {
                Some(true) => (),
                Some(false) => return,
                None => return self.give_up(vt, cond.span, "cannot constant fold expression"),
            }
        }
        vt.exit = Some(label);
    }

    fn reference(&self, t: &'t Tree<'t>, vt: &mut Vtable<'t>) -> &'t Tree<'t> {
        let decl = match t.data {
            TreeData::Ref { decl, .. } => decl,
            _ => unreachable!(),
        };
        match decl.data {
            TreeData::ConstDecl {
                init: Some(init), ..
            } => self.expr(init, vt),
            _ => match decl.ident().and_then(|name| vt.get(name)) {
                Some(binding) => binding,
                None => t,
            },
        }
    }

    fn type_conv(&self, t: &'t Tree<'t>, vt: &mut Vtable<'t>) -> &'t Tree<'t> {
        let value = match t.data {
            TreeData::TypeConv { value } => self.expr(value, vt),
            _ => unreachable!(),
        };
        let (from, to) = match (value.ty, t.ty) {
            (Some(from), Some(to)) => (from, to),
            _ => return t,
        };

        if from.is_integer() && to.is_real() {
            if let Some(v) = folded_int(value) {
                return self.cx.real_lit(t, v as f64);
            }
        } else if from.is_real() && to.is_integer() {
            // Truncates towards zero.
            if let Some(v) = folded_real(value) {
                return self.cx.int_lit(t, v as i64);
            }
        }

        t
    }

    // Builtin reducers. Each returns the call unchanged if the operation does
    // not apply to the operand category.

    fn fcall_int(&self, t: &'t Tree<'t>, builtin: Builtin, args: &[i64]) -> &'t Tree<'t> {
        let cx = self.cx;
        match (builtin, args) {
            (Builtin::Mul, &[a, b]) => cx.int_lit(t, a.wrapping_mul(b)),
            (Builtin::Div, &[a, b]) => match a.checked_div(b) {
                Some(v) => cx.int_lit(t, v),
                None => t,
            },
            (Builtin::Add, &[a, b]) => cx.int_lit(t, a.wrapping_add(b)),
            (Builtin::Sub, &[a, b]) => cx.int_lit(t, a.wrapping_sub(b)),
            (Builtin::Neg, &[a]) => cx.int_lit(t, a.wrapping_neg()),
            (Builtin::Identity, &[a]) => cx.int_lit(t, a),
            (Builtin::Eq, &[a, b]) => cx.bool_lit(t, a == b),
            (Builtin::Neq, &[a, b]) => cx.bool_lit(t, a != b),
            (Builtin::Lt, &[a, b]) => cx.bool_lit(t, a < b),
            (Builtin::Leq, &[a, b]) => cx.bool_lit(t, a <= b),
            (Builtin::Gt, &[a, b]) => cx.bool_lit(t, a > b),
            (Builtin::Geq, &[a, b]) => cx.bool_lit(t, a >= b),
            (Builtin::Exp, &[a, b]) => {
                if a == 0 {
                    return cx.int_lit(t, 0);
                } else if b == 0 {
                    return cx.int_lit(t, 1);
                } else if b < 0 {
                    return t;
                }
                // Exponentiation by squaring.
                let mut result: i64 = 1;
                let mut a = a;
                let mut b = b;
                while b != 0 {
                    if b & 1 != 0 {
                        result = result.wrapping_mul(a);
                    }
                    a = a.wrapping_mul(a);
                    b >>= 1;
                }
                cx.int_lit(t, result)
            }
            (Builtin::Min, _) if !args.is_empty() => {
                cx.int_lit(t, args.iter().fold(args[0], |r, &a| r.min(a)))
            }
            (Builtin::Max, _) if !args.is_empty() => {
                cx.int_lit(t, args.iter().fold(args[0], |r, &a| r.max(a)))
            }
            (Builtin::Mod, &[a, b]) => match a.wrapping_abs().checked_rem(b.wrapping_abs()) {
                Some(v) => cx.int_lit(t, v),
                None => t,
            },
            (Builtin::Rem, &[a, b]) => match a.checked_rem(b) {
                Some(v) => cx.int_lit(t, v),
                None => t,
            },
            _ => t,
        }
    }

    fn fcall_log(&self, t: &'t Tree<'t>, builtin: Builtin, args: &[bool]) -> &'t Tree<'t> {
        let cx = self.cx;
        match (builtin, args) {
            (Builtin::Not, &[a]) => cx.bool_lit(t, !a),
            (Builtin::And, &[a, b]) => cx.bool_lit(t, a && b),
            (Builtin::Nand, &[a, b]) => cx.bool_lit(t, !(a && b)),
            (Builtin::Or, &[a, b]) => cx.bool_lit(t, a || b),
            (Builtin::Nor, &[a, b]) => cx.bool_lit(t, !(a || b)),
            (Builtin::Xor, &[a, b]) => cx.bool_lit(t, a ^ b),
            (Builtin::Xnor, &[a, b]) => cx.bool_lit(t, !(a ^ b)),
            (Builtin::Eq, &[a, b]) => cx.bool_lit(t, a == b),
            (Builtin::Neq, &[a, b]) => cx.bool_lit(t, a != b),
            _ => t,
        }
    }

    fn fcall_real(&self, t: &'t Tree<'t>, builtin: Builtin, args: &[f64]) -> &'t Tree<'t> {
        let cx = self.cx;
        match (builtin, args) {
            (Builtin::Mul, &[a, b]) => cx.real_lit(t, a * b),
            (Builtin::Div, &[a, b]) => cx.real_lit(t, a / b),
            (Builtin::Add, &[a, b]) => cx.real_lit(t, a + b),
            (Builtin::Sub, &[a, b]) => cx.real_lit(t, a - b),
            (Builtin::Neg, &[a]) => cx.real_lit(t, -a),
            (Builtin::Identity, &[a]) => cx.real_lit(t, a),
            (Builtin::Eq, &[a, b]) => cx.bool_lit(t, a == b),
            (Builtin::Neq, &[a, b]) => cx.bool_lit(t, a != b),
            (Builtin::Gt, &[a, b]) => cx.bool_lit(t, a > b),
            (Builtin::Lt, &[a, b]) => cx.bool_lit(t, a < b),
            _ => t,
        }
    }

    fn fcall_enum(&self, t: &'t Tree<'t>, builtin: Builtin, args: &[usize]) -> &'t Tree<'t> {
        let cx = self.cx;
        match (builtin, args) {
            (Builtin::Eq, &[a, b]) => cx.bool_lit(t, a == b),
            (Builtin::Neq, &[a, b]) => cx.bool_lit(t, a != b),
            (Builtin::Lt, &[a, b]) => cx.bool_lit(t, a < b),
            (Builtin::Leq, &[a, b]) => cx.bool_lit(t, a <= b),
            (Builtin::Gt, &[a, b]) => cx.bool_lit(t, a > b),
            (Builtin::Geq, &[a, b]) => cx.bool_lit(t, a >= b),
            _ => t,
        }
    }

    fn fcall_str(&self, t: &'t Tree<'t>, builtin: Builtin, args: &[&'t Tree<'t>]) -> &'t Tree<'t> {
        let cx = self.cx;
        match (builtin, args) {
            (Builtin::ArrayEq, &[a, b]) | (Builtin::ArrayNeq, &[a, b]) => {
                let invert = builtin == Builtin::ArrayNeq;
                let lchars = folded_str(a).unwrap();
                let rchars = folded_str(b).unwrap();
                cx.bool_lit(t, (lchars == rchars) != invert)
            }
            _ => t,
        }
    }

    /// Reduce the mixed universal integer/real operations.
    ///
    /// The semantic pass only produces these over literal universal operands,
    /// so failing to fold one is an internal inconsistency.
    fn fcall_universal(&self, t: &'t Tree<'t>, builtin: Builtin, args: &[&'t Tree<'t>]) -> &'t Tree<'t> {
        match (builtin, args) {
            (Builtin::MulRI, &[a, b]) => {
                if let (Some(r), Some(i)) = (folded_real(a), folded_int(b)) {
                    return self.cx.real_lit(t, r * i as f64);
                }
            }
            (Builtin::MulIR, &[a, b]) => {
                if let (Some(i), Some(r)) = (folded_int(a), folded_real(b)) {
                    return self.cx.real_lit(t, r * i as f64);
                }
            }
            (Builtin::DivRI, &[a, b]) => {
                if let (Some(r), Some(i)) = (folded_real(a), folded_int(b)) {
                    return self.cx.real_lit(t, r / i as f64);
                }
            }
            _ => (),
        }
        self.cx
            .emit(DiagBuilder2::fatal("universal expression cannot be evaluated").span(t.span));
        panic!("universal expression at {} cannot be evaluated", t.span);
    }
}
