// Copyright (c) 2016-2021 Fabian Schuiki

//! Static bounds and choice checking.
//!
//! The checker walks an analyzed tree and verifies that array indices, slice
//! ranges, aggregate associations, assignments, and case choices lie within
//! the ranges of their declaring types, wherever those ranges are statically
//! known. Violations are reported through the session's diagnostic sink and
//! counted; the tree itself is never modified, except that array references
//! whose indices are all static and in bounds are marked so the backend may
//! omit the runtime check. Whatever cannot be decided here is left for the
//! runtime to diagnose.

use crate::builtin::PredefAttr;
use crate::konst::{
    assume_int, folded_bounds, folded_enum, folded_int, folded_length, folded_real, folded_str,
};
use crate::tree::{self, Assoc, AssocKind, Context, Literal, Tree, TreeData};
use crate::ty::{RangeKind, Ty};
use vesta_common::errors::{DiagBuilder2, DiagEmitter};
use vesta_common::source::Span;

/// Check a top-level tree.
///
/// Diagnostics accumulate in the context's session; a non-zero
/// `Session::error_count` afterwards means the tree is rejected. The check is
/// idempotent and may be repeated on the same tree.
pub fn check<'t>(cx: &Context<'t>, top: &'t Tree<'t>) {
    debug!("bounds checking {}", top);
    let checker = Checker { cx: cx };
    tree::walk(top, &mut |t| checker.check_node(t));
}

struct Checker<'e, 't> {
    cx: &'e Context<'t>,
}

impl<'e, 't> Checker<'e, 't> {
    fn error<S: Into<String>>(&self, span: Span, msg: S) {
        self.cx.emit(DiagBuilder2::error(msg).span(span));
    }

    fn check_node(&self, t: &'t Tree<'t>) {
        match t.data {
            TreeData::Fcall { .. } | TreeData::Pcall { .. } => self.call_args(t),
            TreeData::ArrayRef { .. } => self.array_ref(t),
            TreeData::ArraySlice { .. } => self.array_slice(t),
            TreeData::Aggregate { .. } => self.aggregate(t),
            TreeData::SignalDecl { .. } | TreeData::ConstDecl { .. } | TreeData::VarDecl { .. } => {
                self.decl(t)
            }
            TreeData::SigAssign { .. } => self.sig_assign(t),
            TreeData::VarAssign { .. } => self.var_assign(t),
            TreeData::Case { .. } => self.case_stmt(t),
            TreeData::Literal(Literal::Str(_)) => self.string_literal(t),
            TreeData::TypeConv { .. } => self.type_conv(t),
            TreeData::AttrRef { .. } => self.attr_ref(t),
            _ => (),
        }
    }

    /// Check that a string literal has as many characters as its constrained
    /// subtype requires.
    fn string_literal(&self, t: &'t Tree<'t>) {
        let ty = match t.ty {
            Some(ty) if !ty.is_unconstrained() => ty,
            _ => return,
        };
        let chars = match folded_str(t) {
            Some(chars) => chars,
            None => return,
        };
        let expect = match ty.dim(0).and_then(folded_length) {
            Some(l) => l,
            None => return,
        };
        if expect != chars.len() as i64 {
            self.error(
                t.span,
                format!(
                    "expected {} elements in string literal but have {}",
                    expect,
                    chars.len()
                ),
            );
        }
    }

    /// Check the actual parameters of a call against the formals.
    fn call_args(&self, t: &'t Tree<'t>) {
        let (decl, params) = match t.data {
            TreeData::Fcall { decl, ref params } | TreeData::Pcall { decl, ref params } => {
                (decl, params)
            }
            _ => unreachable!(),
        };
        let ports = match decl.data {
            TreeData::FuncDecl { ref ports, .. }
            | TreeData::FuncBody { ref ports, .. }
            | TreeData::ProcDecl { ref ports, .. } => ports,
            _ => return,
        };

        for (value, port) in params.iter().zip(ports.iter()) {
            let ftype = match port.ty {
                Some(ty) => ty,
                None => continue,
            };
            let atype = match value.ty {
                Some(ty) => ty,
                None => continue,
            };

            if ftype.is_array() {
                // Check the lengths of constrained array parameters.
                if atype.is_unconstrained() || ftype.is_unconstrained() {
                    continue;
                }
                let ndims = ftype.dims();
                for i in 0..ndims {
                    let formal_len = ftype.dim(i).and_then(folded_length);
                    let actual_len = atype.dim(i).and_then(folded_length);
                    let (formal_len, actual_len) = match (formal_len, actual_len) {
                        (Some(f), Some(a)) => (f, a),
                        _ => continue,
                    };
                    if actual_len != formal_len {
                        if ndims > 1 {
                            self.error(
                                value.span,
                                format!(
                                    "actual length {} for dimension {} does not match formal \
                                     length {}",
                                    actual_len,
                                    i + 1,
                                    formal_len
                                ),
                            );
                        } else {
                            self.error(
                                value.span,
                                format!(
                                    "actual length {} does not match formal length {}",
                                    actual_len, formal_len
                                ),
                            );
                        }
                    }
                }
            } else if ftype.is_integer() {
                let ival = match folded_int(value) {
                    Some(v) => v,
                    None => continue,
                };
                let r = match ftype.dim(0) {
                    Some(r) => r,
                    None => continue,
                };
                let (low, high) = match folded_bounds(r) {
                    Some(b) => b,
                    None => continue,
                };
                if ival < low || ival > high {
                    let (first, last) = match r.kind {
                        RangeKind::To => (low, high),
                        _ => (high, low),
                    };
                    self.error(
                        value.span,
                        format!(
                            "value {} out of bounds {} {} {} for parameter {}",
                            ival,
                            first,
                            r.kind,
                            last,
                            port.ident().map(|n| n.to_string()).unwrap_or_default()
                        ),
                    );
                }
            }
        }
    }

    /// Check static indices of an array reference against the dimension
    /// ranges, and mark the node when every index is static and in bounds.
    fn array_ref(&self, t: &'t Tree<'t>) {
        let (value, indices, elide_bounds) = match t.data {
            TreeData::ArrayRef {
                value,
                ref indices,
                ref elide_bounds,
            } => (value, indices, elide_bounds),
            _ => unreachable!(),
        };
        let value_ty = match value.ty {
            Some(ty) if !ty.is_unconstrained() => ty,
            _ => return,
        };

        let mut nstatic = 0;
        for (i, index_expr) in indices.iter().enumerate() {
            let index = match folded_int(index_expr) {
                Some(v) => v,
                None => continue,
            };
            let b = match value_ty.dim(i) {
                Some(b) if b.kind != RangeKind::Expr => b,
                _ => continue,
            };
            let (left, right) = match (folded_int(b.left), folded_int(b.right)) {
                (Some(l), Some(r)) => (l, r),
                _ => continue,
            };
            let (low, high) = match b.kind {
                RangeKind::To => (left, right),
                _ => (right, left),
            };
            if index < low || index > high {
                let name = match value.data {
                    TreeData::Ref { name, .. } => format!("{} ", name),
                    _ => String::new(),
                };
                self.error(
                    t.span,
                    format!(
                        "array {}index {} out of bounds {} {} {}",
                        name, index, left, b.kind, right
                    ),
                );
            } else {
                nstatic += 1;
            }
        }

        if nstatic == indices.len() {
            elide_bounds.set(true);
        }
    }

    /// Check the endpoints of a slice against the sliced value's range.
    fn array_slice(&self, t: &'t Tree<'t>) {
        let (value, r) = match t.data {
            TreeData::ArraySlice { value, range } => (value, range),
            _ => unreachable!(),
        };
        let value_ty = match value.ty {
            Some(ty) if !ty.is_unconstrained() => ty,
            _ => return,
        };
        let b = match value_ty.dim(0) {
            Some(b) if b.kind != RangeKind::Expr => b,
            _ => return,
        };
        if r.kind == RangeKind::Expr {
            return;
        }
        let (b_left, b_right) = match (folded_int(b.left), folded_int(b.right)) {
            (Some(l), Some(r)) => (l, r),
            _ => return,
        };

        let left_error = folded_int(r.left).map_or(false, |r_left| match b.kind {
            RangeKind::To => r_left < b_left,
            _ => r_left > b_left,
        });
        let right_error = folded_int(r.right).map_or(false, |r_right| match b.kind {
            RangeKind::To => r_right > b_right,
            _ => r_right < b_right,
        });

        if left_error || right_error {
            let name = match value.data {
                TreeData::Ref { name, .. } => format!("{} ", name),
                _ => String::new(),
            };
            let (side, index) = if left_error {
                ("left", folded_int(r.left).unwrap())
            } else {
                ("right", folded_int(r.right).unwrap())
            };
            self.error(
                t.span,
                format!(
                    "{}slice {} index {} out of bounds {} {} {}",
                    name, side, index, b_left, b.kind, b_right
                ),
            );
        }
    }

    /// Report `i` when it folds to a value outside `[low, high]`.
    fn within(&self, i: &'t Tree<'t>, kind: RangeKind, what: &str, low: i64, high: i64) {
        if let Some(value) = folded_int(i) {
            if value < low || value > high {
                let (first, last) = match kind {
                    RangeKind::To => (low, high),
                    _ => (high, low),
                };
                self.error(
                    i.span,
                    format!(
                        "{} index {} out of bounds {} {} {}",
                        what, value, first, kind, last
                    ),
                );
            }
        }
    }

    /// Check the associations of an array aggregate against the tightest
    /// statically known index bounds, and the element count against the
    /// expected length.
    fn aggregate(&self, t: &'t Tree<'t>) {
        let (assocs, unconstrained) = match t.data {
            TreeData::Aggregate {
                ref assocs,
                unconstrained,
            } => (assocs, unconstrained),
            _ => unreachable!(),
        };
        let ty = match t.ty {
            Some(ty) if ty.is_array() => ty,
            _ => return,
        };
        if ty.is_unconstrained() {
            return;
        }
        let type_r = match ty.dim(0) {
            Some(r) => r,
            None => return,
        };

        // Find the tightest bounds for the index.
        let bounds = if unconstrained {
            // The constraint was derived from context; measure against the
            // range of the base type's index subtype instead.
            let base = ty.base_recur();
            match base
                .index_constr(0)
                .filter(|index| !index.is_enum())
                .and_then(|index| index.dim(0))
                .and_then(folded_bounds)
            {
                Some(b) => b,
                None => return,
            }
        } else {
            match folded_bounds(type_r) {
                Some(b) => b,
                None => return,
            }
        };
        let (low, high) = bounds;

        // Check for out of bounds indices and count the elements the
        // associations contribute.
        let mut known_elem_count = true;
        let mut nelems: i64 = 0;
        for a in assocs {
            match a.kind {
                AssocKind::Named(name) => {
                    self.within(name, type_r.kind, "aggregate", low, high);
                    nelems += 1;
                }
                AssocKind::Range(r) => {
                    self.within(r.left, r.kind, "aggregate", low, high);
                    self.within(r.right, r.kind, "aggregate", low, high);
                    match folded_length(r) {
                        Some(length) => nelems += length,
                        None => known_elem_count = false,
                    }
                }
                AssocKind::Others => known_elem_count = false,
                AssocKind::Pos => nelems += 1,
            }
        }

        // Check the actual against the expected element count.
        if known_elem_count {
            if let Some(expect) = folded_length(type_r) {
                if expect != nelems {
                    self.error(
                        t.span,
                        format!(
                            "expected {} elements in aggregate but have {}",
                            expect, nelems
                        ),
                    );
                }
            }
        }

        // Each sub-aggregate of a multi-dimensional unconstrained array
        // aggregate must have the same length.
        if ty.dims() > 1 && unconstrained {
            let mut length = None;
            for a in assocs {
                let this_length = match a
                    .value
                    .ty
                    .and_then(|ty| ty.dim(0))
                    .and_then(folded_length)
                {
                    Some(l) => l,
                    None => break,
                };
                match length {
                    None => length = Some(this_length),
                    Some(l) if l != this_length => {
                        self.error(
                            a.span,
                            format!(
                                "length of sub-aggregate {} does not match expected length {}",
                                this_length, l
                            ),
                        );
                    }
                    Some(_) => (),
                }
            }
        }
    }

    /// Check that the dimension ranges of an array declaration do not
    /// violate the index subtype's own constraint.
    fn decl(&self, t: &'t Tree<'t>) {
        let ty = match t.ty {
            Some(ty) => ty,
            None => return,
        };
        if !ty.is_array() || ty.is_unconstrained() {
            return;
        }

        for i in 0..ty.dims() {
            let dim = match ty.dim(i) {
                Some(d) => d,
                None => continue,
            };
            let cons = match dim.left.ty {
                Some(c) => c,
                None => continue,
            };
            if cons.is_enum() {
                continue;
            }
            let bounds = match cons.dim(0) {
                Some(b) => b,
                None => continue,
            };

            let folded = (
                folded_int(dim.left),
                folded_int(dim.right),
                folded_int(bounds.left),
                folded_int(bounds.right),
            );
            let (dim_left, dim_right, bounds_left, bounds_right) = match folded {
                (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
                _ => continue,
            };

            // Null ranges elude the constraint entirely.
            let is_null = match dim.kind {
                RangeKind::To => dim_left > dim_right,
                RangeKind::Downto => dim_left < dim_right,
                RangeKind::Expr => continue,
            };
            if is_null {
                continue;
            }

            if dim_left < bounds_left {
                self.error(
                    dim.left.span,
                    format!("left index {} violates constraint {}", dim_left, cons),
                );
            }
            if dim_right > bounds_right {
                self.error(
                    dim.right.span,
                    format!("right index {} violates constraint {}", dim_right, cons),
                );
            }
        }
    }

    fn sig_assign(&self, t: &'t Tree<'t>) {
        if let TreeData::SigAssign {
            target,
            ref waveforms,
        } = t.data
        {
            for value in waveforms {
                self.assignment(target, value);
            }
        }
    }

    fn var_assign(&self, t: &'t Tree<'t>) {
        if let TreeData::VarAssign { target, value } = t.data {
            self.assignment(target, value);
        }
    }

    /// Check an assignment of `value` to `target`.
    fn assignment(&self, target: &'t Tree<'t>, value: &'t Tree<'t>) {
        let (target_ty, value_ty) = match (target.ty, value.ty) {
            (Some(t), Some(v)) => (t, v),
            _ => return,
        };

        // If both sides are constrained arrays, every dimension's length
        // must match.
        let check_array_length = target_ty.is_array()
            && !target_ty.is_unconstrained()
            && !value_ty.is_unconstrained();
        if check_array_length {
            for i in 0..target_ty.dims() {
                let target_w = target_ty.dim(i).and_then(folded_length);
                let value_w = value_ty.dim(i).and_then(folded_length);
                if let (Some(target_w), Some(value_w)) = (target_w, value_w) {
                    if target_w != value_w {
                        if i > 0 {
                            self.error(
                                value.span,
                                format!(
                                    "length of dimension {} of value {} does not match length \
                                     of target {}",
                                    i + 1,
                                    value_w,
                                    target_w
                                ),
                            );
                        } else {
                            self.error(
                                value.span,
                                format!(
                                    "length of value {} does not match length of target {}",
                                    value_w, target_w
                                ),
                            );
                        }
                    }
                }
            }
        }

        // A scalar subtype target constrains the assigned value.
        let check_scalar_subtype_range = !target_ty.is_array()
            && !target_ty.is_record()
            && matches!(*target_ty, Ty::Subtype(_));
        if check_scalar_subtype_range {
            let r = match target_ty.dim(0) {
                Some(r) => r,
                None => return,
            };

            if let Some(ivalue) = folded_int(value) {
                if let (Some(left), Some(right)) = (folded_int(r.left), folded_int(r.right)) {
                    match r.kind {
                        RangeKind::To => {
                            if ivalue < left || ivalue > right {
                                self.error(
                                    value.span,
                                    format!(
                                        "value {} out of target bounds {} to {}",
                                        ivalue, left, right
                                    ),
                                );
                            }
                        }
                        RangeKind::Downto => {
                            if ivalue > left || ivalue < right {
                                self.error(
                                    value.span,
                                    format!(
                                        "value {} out of target bounds {} downto {}",
                                        ivalue, left, right
                                    ),
                                );
                            }
                        }
                        RangeKind::Expr => (),
                    }
                }
            }

            if let Some(pos) = folded_enum(value) {
                if let (Some(left), Some(right)) = (folded_enum(r.left), folded_enum(r.right)) {
                    let value_base = match value_ty.as_enum() {
                        Some(e) => e,
                        None => return,
                    };
                    let target_base = match target_ty.as_enum() {
                        Some(e) => e,
                        None => return,
                    };
                    let lit = |base: &crate::ty::EnumTy, pos: usize| {
                        base.lits
                            .get(pos)
                            .map(|n| n.to_string())
                            .unwrap_or_default()
                    };
                    match r.kind {
                        RangeKind::To => {
                            if pos < left || pos > right {
                                self.error(
                                    value.span,
                                    format!(
                                        "value {} out of target bounds {} to {}",
                                        lit(value_base, pos),
                                        lit(target_base, left),
                                        lit(target_base, right)
                                    ),
                                );
                            }
                        }
                        RangeKind::Downto => {
                            if pos > left || pos < right {
                                self.error(
                                    value.span,
                                    format!(
                                        "value {} out of target bounds {} downto {}",
                                        lit(value_base, pos),
                                        lit(target_base, left),
                                        lit(target_base, right)
                                    ),
                                );
                            }
                        }
                        RangeKind::Expr => (),
                    }
                }
            }
        }
    }

    /// Check the choices of a case statement for duplicates and coverage.
    fn case_stmt(&self, t: &'t Tree<'t>) {
        let (value, assocs) = match t.data {
            TreeData::Case { value, ref assocs } => (value, assocs),
            _ => unreachable!(),
        };
        let ty = match value.ty {
            Some(ty) => ty,
            None => return,
        };

        if ty.is_enum() {
            self.case_enum(t, ty, assocs);
        } else if ty.is_integer() {
            self.case_integer(t, ty, assocs);
        } else if ty.is_array() {
            self.case_array(t, ty, assocs);
        }
    }

    /// Check that the choices cover all literals of an enumerated type.
    fn case_enum(&self, t: &'t Tree<'t>, ty: &'t Ty<'t>, assocs: &[Assoc<'t>]) {
        let base = match ty.as_enum() {
            Some(e) => e,
            None => return,
        };

        // An enum subtype restricts the covered positions to its constraint.
        let (low, high) = if let Ty::Subtype(_) = *ty {
            let r = match ty.dim(0) {
                Some(r) if r.kind == RangeKind::To => r,
                _ => return,
            };
            match (folded_enum(r.left), folded_enum(r.right)) {
                (Some(l), Some(h)) => (l, h),
                _ => return,
            }
        } else {
            if base.lits.is_empty() {
                return;
            }
            (0, base.lits.len() - 1)
        };
        if high < low || high >= base.lits.len() {
            return;
        }
        let nlits = high - low + 1;

        let mut have = vec![false; nlits];
        let mut have_others = false;

        for a in assocs {
            let name_tree = match a.kind {
                AssocKind::Others => {
                    have_others = true;
                    continue;
                }
                AssocKind::Named(name) => name,
                _ => continue,
            };
            let name = match name_tree.ident() {
                Some(n) => n,
                None => continue,
            };
            for i in low..=high {
                if base.lits[i] == name {
                    if have[i - low] {
                        self.error(
                            name_tree.span,
                            format!("choice {} appears multiple times in case statement", name),
                        );
                    } else {
                        have[i - low] = true;
                    }
                }
            }
        }

        if !have_others {
            for i in low..=high {
                if !have[i - low] {
                    self.error(
                        t.span,
                        format!("missing choice {} in case statement", base.lits[i]),
                    );
                }
            }
        }
    }

    /// Check that the choices cover the full range of an integer type,
    /// without overlap.
    fn case_integer(&self, t: &'t Tree<'t>, ty: &'t Ty<'t>, assocs: &[Assoc<'t>]) {
        let (tlow, thigh) = match ty.dim(0).and_then(folded_bounds) {
            Some(b) => b,
            None => return,
        };

        let mut have_others = false;
        let mut covered: Vec<Interval> = Vec::new();

        for a in assocs {
            let (low, high) = match a.kind {
                AssocKind::Others => {
                    have_others = true;
                    continue;
                }
                AssocKind::Named(name) => {
                    let v = assume_int(name);
                    (v, v)
                }
                AssocKind::Range(r) => match r.kind {
                    RangeKind::To => (assume_int(r.left), assume_int(r.right)),
                    RangeKind::Downto => (assume_int(r.right), assume_int(r.left)),
                    RangeKind::Expr => continue,
                },
                AssocKind::Pos => continue,
            };

            if low < tlow || high > thigh {
                self.error(
                    a.span,
                    format!(
                        "value {} outside {} bounds {} to {}",
                        if low < tlow { low } else { high },
                        ty,
                        tlow,
                        thigh
                    ),
                );
            } else {
                self.cover(&mut covered, a.span, low, high);
            }
        }

        if !have_others {
            let mut msg = format!(
                "case choices do not cover the following values of {}:",
                ty
            );
            let mut missing = false;
            let mut walk = tlow;
            for it in &covered {
                if it.low != walk {
                    fmt_missing(&mut msg, walk, it.low - 1);
                    missing = true;
                }
                walk = it.high.saturating_add(1);
            }
            if walk <= thigh {
                fmt_missing(&mut msg, walk, thigh);
                missing = true;
            }
            if missing {
                self.error(t.span, msg);
            }
        }
    }

    /// Add `[low, high]` to the list of covered intervals, reporting overlap
    /// with already covered values and coalescing adjacent intervals.
    fn cover(&self, covered: &mut Vec<Interval>, span: Span, low: i64, high: i64) {
        let mut i = 0;
        while i < covered.len() && covered[i].low <= high {
            let it = covered[i];
            if low <= it.high && it.low <= high {
                let rlow = low.max(it.low);
                let rhigh = high.min(it.high);
                if rlow == rhigh {
                    self.error(span, format!("value {} is already covered", rlow));
                } else {
                    self.error(
                        span,
                        format!("range {} to {} is already covered", rlow, rhigh),
                    );
                }
                return;
            } else if Some(high) == it.low.checked_sub(1) {
                covered[i].low = low;
                return;
            } else if Some(low) == it.high.checked_add(1) {
                covered[i].high = high;
                return;
            }
            i += 1;
        }
        covered.insert(
            i,
            Interval {
                low: low,
                high: high,
            },
        );
    }

    /// Check that the choices of an array case cover every possible value.
    fn case_array(&self, t: &'t Tree<'t>, ty: &'t Ty<'t>, assocs: &[Assoc<'t>]) {
        let elem = match ty.elem() {
            Some(e) => e,
            None => return,
        };
        let elemsz = match *elem {
            Ty::Subtype(_) | Ty::Array(_) | Ty::Int(_) => {
                match elem.dim(0).and_then(folded_bounds) {
                    Some((low, high)) => high - low + 1,
                    None => return,
                }
            }
            Ty::Enum(ref e) => e.lits.len() as i64,
            _ => return,
        };

        let length = match ty.dim(0).and_then(folded_length) {
            Some(l) => l,
            None => return,
        };

        let expect = if elemsz > i32::max_value() as i64 {
            i64::max_value()
        } else {
            ipow(elemsz, length)
        };

        let mut have: i64 = 0;
        for a in assocs {
            match a.kind {
                AssocKind::Others => have = expect,
                AssocKind::Named(_) | AssocKind::Range(_) => have += 1,
                AssocKind::Pos => (),
            }
        }

        if have < expect {
            if expect == i64::max_value() {
                self.error(t.span, "choices do not cover all possible values");
            } else {
                self.error(
                    t.span,
                    format!("choices cover only {} of {} possible values", have, expect),
                );
            }
        }
    }

    /// Check a folded type conversion result against the target subtype.
    fn type_conv(&self, t: &'t Tree<'t>) {
        let value = match t.data {
            TreeData::TypeConv { value } => value,
            _ => unreachable!(),
        };
        let (from, to) = match (value.ty, t.ty) {
            (Some(from), Some(to)) => (from, to),
            _ => return,
        };
        if !to.is_integer() {
            return;
        }

        let (ival, argstr) = if from.is_real() {
            match folded_real(value) {
                Some(rval) => (rval as i64, format!("{}", rval)),
                None => return,
            }
        } else if from.is_integer() {
            match folded_int(value) {
                Some(ival) => (ival, format!("{}", ival)),
                None => return,
            }
        } else {
            return;
        };

        let (b_low, b_high) = match to.dim(0).and_then(folded_bounds) {
            Some(b) => b,
            None => return,
        };
        if ival < b_low || ival > b_high {
            self.error(
                value.span,
                format!(
                    "type conversion argument {} out of bounds {} to {}",
                    argstr, b_low, b_high
                ),
            );
        }
    }

    /// Check the dimension argument of a range attribute.
    fn attr_ref(&self, t: &'t Tree<'t>) {
        let (prefix, predef, params) = match t.data {
            TreeData::AttrRef {
                prefix,
                predef,
                ref params,
                ..
            } => (prefix, predef, params),
            _ => unreachable!(),
        };
        match predef {
            Some(
                PredefAttr::Length
                | PredefAttr::Low
                | PredefAttr::High
                | PredefAttr::Left
                | PredefAttr::Right,
            ) => (),
            None => return,
        }
        let dim_tree = match params.first() {
            Some(p) => *p,
            None => return,
        };
        let ty = match prefix.ty {
            Some(ty) if ty.is_array() && !ty.is_unconstrained() => ty,
            _ => return,
        };
        if let Some(dim) = folded_int(dim_tree) {
            if dim < 1 || dim > ty.dims() as i64 {
                self.error(
                    dim_tree.span,
                    format!("invalid dimension {} for type {}", dim, ty),
                );
            }
        }
    }
}

/// An interval of already covered case choices.
#[derive(Clone, Copy)]
struct Interval {
    low: i64,
    high: i64,
}

/// Append a missing interval to the coverage report.
fn fmt_missing(msg: &mut String, low: i64, high: i64) {
    use std::fmt::Write;
    if low == high {
        write!(msg, "\n    {}", low).unwrap();
    } else {
        write!(msg, "\n    {} to {}", low, high).unwrap();
    }
}

/// Saturating integer exponentiation.
///
/// Values that do not fit an `i64` saturate to `i64::MAX`, which the caller
/// treats as "more choices than could ever be listed".
fn ipow(base: i64, exp: i64) -> i64 {
    if exp < 0 {
        return i64::max_value();
    }
    let exp = if exp > u32::max_value() as i64 {
        u32::max_value()
    } else {
        exp as u32
    };
    base.checked_pow(exp).unwrap_or(i64::max_value())
}
