// Copyright (c) 2016-2021 Fabian Schuiki

//! Tests for static bounds and choice checking.

#[macro_use]
mod common;
use crate::common::*;
use std::cell::Cell;

fn integer<'e, 't>(b: &Builder<'e, 't>) -> &'t Ty<'t> {
    b.int_ty(
        "integer",
        RangeKind::To,
        i32::min_value() as i64,
        i32::max_value() as i64,
    )
}

/// `bit_vector(left to right)` with its index bounds typed `natural`.
fn bit_vector<'e, 't>(b: &Builder<'e, 't>, left: i64, right: i64) -> &'t Ty<'t> {
    let natural = b.int_ty("natural", RangeKind::To, 0, i32::max_value() as i64);
    let (bit, _) = b.enum_ty("bit", &["'0'", "'1'"]);
    b.array_ty(natural, RangeKind::To, left, right, bit)
}

#[test]
fn array_ref_out_of_bounds() {
    fixture!(b);
    let a = b.signal("a", bit_vector(&b, 0, 7), None);
    let bad = b.node(
        None,
        TreeData::ArrayRef {
            value: b.refer(a),
            indices: vec![b.int(9)],
            elide_bounds: Cell::new(false),
        },
    );
    let messages = collect_messages(b.cx.sess);
    bounds::check(b.cx, bad);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(messages.borrow()[0], "array a index 9 out of bounds 0 to 7");
    match bad.data {
        TreeData::ArrayRef { ref elide_bounds, .. } => assert!(!elide_bounds.get()),
        _ => unreachable!(),
    }
}

#[test]
fn array_ref_static_in_bounds_elides_check() {
    fixture!(b);
    let a = b.signal("a", bit_vector(&b, 0, 7), None);
    let good = b.node(
        None,
        TreeData::ArrayRef {
            value: b.refer(a),
            indices: vec![b.int(3)],
            elide_bounds: Cell::new(false),
        },
    );
    bounds::check(b.cx, good);
    assert_eq!(b.cx.sess.error_count(), 0);
    match good.data {
        TreeData::ArrayRef { ref elide_bounds, .. } => assert!(elide_bounds.get()),
        _ => unreachable!(),
    }
}

#[test]
fn array_ref_dynamic_index_is_not_elided() {
    fixture!(b);
    let integer = integer(&b);
    let a = b.signal("a", bit_vector(&b, 0, 7), None);
    let i = b.signal("i", integer, None);
    let dynamic = b.node(
        None,
        TreeData::ArrayRef {
            value: b.refer(a),
            indices: vec![b.refer(i)],
            elide_bounds: Cell::new(false),
        },
    );
    bounds::check(b.cx, dynamic);
    assert_eq!(b.cx.sess.error_count(), 0);
    match dynamic.data {
        TreeData::ArrayRef { ref elide_bounds, .. } => assert!(!elide_bounds.get()),
        _ => unreachable!(),
    }
}

#[test]
fn check_is_idempotent() {
    fixture!(b);
    let a = b.signal("a", bit_vector(&b, 0, 7), None);
    let bad = b.node(
        None,
        TreeData::ArrayRef {
            value: b.refer(a),
            indices: vec![b.int(9)],
            elide_bounds: Cell::new(false),
        },
    );
    bounds::check(b.cx, bad);
    let first = b.cx.sess.error_count();
    bounds::check(b.cx, bad);
    assert_eq!(b.cx.sess.error_count(), 2 * first);
}

#[test]
fn array_slice_bounds() {
    fixture!(b);
    let a = b.signal("a", bit_vector(&b, 0, 7), None);

    // In bounds.
    let good = b.node(
        None,
        TreeData::ArraySlice {
            value: b.refer(a),
            range: b.range(RangeKind::To, 2, 5),
        },
    );
    bounds::check(b.cx, good);
    assert_eq!(b.cx.sess.error_count(), 0);

    // A null slice in the reverse direction is not an error.
    let null = b.node(
        None,
        TreeData::ArraySlice {
            value: b.refer(a),
            range: b.range(RangeKind::Downto, 2, 5),
        },
    );
    bounds::check(b.cx, null);
    assert_eq!(b.cx.sess.error_count(), 0);

    // Right endpoint past the end.
    let messages = collect_messages(b.cx.sess);
    let bad = b.node(
        None,
        TreeData::ArraySlice {
            value: b.refer(a),
            range: b.range(RangeKind::To, 2, 9),
        },
    );
    bounds::check(b.cx, bad);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(
        messages.borrow()[0],
        "a slice right index 9 out of bounds 0 to 7"
    );
}

#[test]
fn string_literal_length() {
    fixture!(b);
    let ty = bit_vector(&b, 0, 7);
    let good = b.str_lit(Some(ty), "10101010");
    bounds::check(b.cx, good);
    assert_eq!(b.cx.sess.error_count(), 0);

    let messages = collect_messages(b.cx.sess);
    let bad = b.str_lit(Some(ty), "101");
    bounds::check(b.cx, bad);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(
        messages.borrow()[0],
        "expected 8 elements in string literal but have 3"
    );
}

#[test]
fn call_integer_argument_range() {
    fixture!(b);
    let integer = integer(&b);
    let small = b.int_subtype("small", integer, RangeKind::To, 0, 15);
    let x = b.port("x", small, None);
    let f = b.func("f", vec![x], vec![], vec![]);

    let good = b.call(f, Some(integer), vec![b.int_of(integer, 7)]);
    bounds::check(b.cx, good);
    assert_eq!(b.cx.sess.error_count(), 0);

    let messages = collect_messages(b.cx.sess);
    let bad = b.call(f, Some(integer), vec![b.int_of(integer, 99)]);
    bounds::check(b.cx, bad);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(
        messages.borrow()[0],
        "value 99 out of bounds 0 to 15 for parameter x"
    );
}

#[test]
fn call_array_argument_length() {
    fixture!(b);
    let formal_ty = bit_vector(&b, 0, 7);
    let actual_ty = bit_vector(&b, 0, 3);
    let x = b.port("x", formal_ty, None);
    let f = b.func("f", vec![x], vec![], vec![]);
    let a = b.signal("a", actual_ty, None);

    let messages = collect_messages(b.cx.sess);
    let bad = b.call(f, None, vec![b.refer(a)]);
    bounds::check(b.cx, bad);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(
        messages.borrow()[0],
        "actual length 4 does not match formal length 8"
    );
}

#[test]
fn aggregate_bounds() {
    fixture!(b);
    let ty = bit_vector(&b, 0, 3);
    let (_, bit_lits) = b.enum_ty("bit", &["'0'", "'1'"]);
    let zero = || b.refer(bit_lits[0]);

    // (0 => '0', 1 => '0', 2 => '0', 3 => '0') is complete.
    let good = b.node(
        Some(ty),
        TreeData::Aggregate {
            assocs: (0..4).map(|i| b.named_assoc(b.int(i), zero())).collect(),
            unconstrained: false,
        },
    );
    bounds::check(b.cx, good);
    assert_eq!(b.cx.sess.error_count(), 0);

    // A named choice out of bounds.
    let messages = collect_messages(b.cx.sess);
    let bad = b.node(
        Some(ty),
        TreeData::Aggregate {
            assocs: vec![b.named_assoc(b.int(9), zero()), b.others_assoc(zero())],
            unconstrained: false,
        },
    );
    bounds::check(b.cx, bad);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(messages.borrow()[0], "aggregate index 9 out of bounds 0 to 3");
}

#[test]
fn aggregate_element_count() {
    fixture!(b);
    let ty = bit_vector(&b, 0, 3);
    let (_, bit_lits) = b.enum_ty("bit", &["'0'", "'1'"]);
    let zero = || b.refer(bit_lits[0]);

    // Three positional elements for a four element array.
    let messages = collect_messages(b.cx.sess);
    let bad = b.node(
        Some(ty),
        TreeData::Aggregate {
            assocs: (0..3).map(|_| b.pos_assoc(zero())).collect(),
            unconstrained: false,
        },
    );
    bounds::check(b.cx, bad);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(
        messages.borrow()[0],
        "expected 4 elements in aggregate but have 3"
    );

    // An others choice makes the count unknowable.
    let ok = b.node(
        Some(ty),
        TreeData::Aggregate {
            assocs: vec![b.pos_assoc(zero()), b.others_assoc(zero())],
            unconstrained: false,
        },
    );
    bounds::check(b.cx, ok);
    assert_eq!(b.cx.sess.error_count(), 1);

    // Range choices contribute their length.
    let ranged = b.node(
        Some(ty),
        TreeData::Aggregate {
            assocs: vec![
                b.range_assoc(b.range(RangeKind::To, 0, 2), zero()),
                b.named_assoc(b.int(3), zero()),
            ],
            unconstrained: false,
        },
    );
    bounds::check(b.cx, ranged);
    assert_eq!(b.cx.sess.error_count(), 1);
}

#[test]
fn assignment_array_length() {
    fixture!(b);
    let t8 = bit_vector(&b, 0, 7);
    let t4 = bit_vector(&b, 0, 3);
    let target = b.signal("t", t8, None);
    let value = b.signal("v", t4, None);

    let messages = collect_messages(b.cx.sess);
    let assign = b.node(
        None,
        TreeData::SigAssign {
            target: b.refer(target),
            waveforms: vec![b.refer(value)],
        },
    );
    bounds::check(b.cx, assign);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(
        messages.borrow()[0],
        "length of value 4 does not match length of target 8"
    );
}

#[test]
fn assignment_scalar_subtype_range() {
    fixture!(b);
    let integer = integer(&b);
    let small = b.int_subtype("small", integer, RangeKind::To, 0, 15);
    let v = b.variable("v", small, None);

    let good = b.assign(b.refer(v), b.int_of(integer, 15));
    bounds::check(b.cx, good);
    assert_eq!(b.cx.sess.error_count(), 0);

    let messages = collect_messages(b.cx.sess);
    let bad = b.assign(b.refer(v), b.int_of(integer, 16));
    bounds::check(b.cx, bad);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(messages.borrow()[0], "value 16 out of target bounds 0 to 15");

    // Descending constraints check the other way around.
    let down = b.int_subtype("down", integer, RangeKind::Downto, 15, 8);
    let v = b.variable("v", down, None);
    let bad = b.assign(b.refer(v), b.int_of(integer, 7));
    bounds::check(b.cx, bad);
    assert_eq!(b.cx.sess.error_count(), 2);
    assert_eq!(
        messages.borrow()[1],
        "value 7 out of target bounds 15 downto 8"
    );
}

#[test]
fn assignment_enum_subtype_range() {
    fixture!(b);
    let (state, lits) = b.enum_ty("state", &["idle", "busy", "done", "fail"]);
    // subtype active is state range busy to done;
    let active = b.cx.alloc_ty(Ty::Subtype(SubtypeTy {
        name: Some(b.name("active")),
        base: state,
        constraints: vec![Range::new(
            RangeKind::To,
            b.refer(lits[1]),
            b.refer(lits[2]),
        )],
    }));
    let v = b.variable("v", active, None);

    let good = b.assign(b.refer(v), b.refer(lits[2]));
    bounds::check(b.cx, good);
    assert_eq!(b.cx.sess.error_count(), 0);

    let messages = collect_messages(b.cx.sess);
    let bad = b.assign(b.refer(v), b.refer(lits[3]));
    bounds::check(b.cx, bad);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(
        messages.borrow()[0],
        "value fail out of target bounds busy to done"
    );
}

#[test]
fn declaration_range_violates_index_constraint() {
    fixture!(b);
    let (bit, _) = b.enum_ty("bit", &["'0'", "'1'"]);
    let natural = b.int_ty("natural", RangeKind::To, 0, i32::max_value() as i64);
    let ty = b.array_ty(natural, RangeKind::To, -1, 7, bit);

    let messages = collect_messages(b.cx.sess);
    let decl = b.signal("a", ty, None);
    bounds::check(b.cx, decl);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(
        messages.borrow()[0],
        "left index -1 violates constraint natural"
    );

    // A null range is not checked.
    let null_ty = b.array_ty(natural, RangeKind::To, 7, -1, bit);
    let decl = b.signal("n", null_ty, None);
    bounds::check(b.cx, decl);
    assert_eq!(b.cx.sess.error_count(), 1);
}

#[test]
fn case_integer_missing_choices() {
    fixture!(b);
    let integer = integer(&b);
    let small = b.int_subtype("small", integer, RangeKind::To, 0, 7);
    let i = b.signal("i", small, None);
    let null = b.node(
        None,
        TreeData::Block {
            decls: vec![],
            stmts: vec![],
        },
    );

    let messages = collect_messages(b.cx.sess);
    let case = b.case(
        b.refer(i),
        vec![
            b.named_assoc(b.int(0), null),
            b.range_assoc(b.range(RangeKind::To, 2, 5), null),
        ],
    );
    bounds::check(b.cx, case);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(
        messages.borrow()[0],
        "case choices do not cover the following values of small:\n    1\n    6 to 7"
    );
}

#[test]
fn case_integer_full_coverage() {
    fixture!(b);
    let integer = integer(&b);
    let small = b.int_subtype("small", integer, RangeKind::To, 0, 7);
    let i = b.signal("i", small, None);
    let null = b.node(
        None,
        TreeData::Block {
            decls: vec![],
            stmts: vec![],
        },
    );

    // Adjacent ranges and values coalesce into full coverage.
    let case = b.case(
        b.refer(i),
        vec![
            b.range_assoc(b.range(RangeKind::To, 0, 3), null),
            b.named_assoc(b.int(4), null),
            b.range_assoc(b.range(RangeKind::To, 5, 7), null),
        ],
    );
    bounds::check(b.cx, case);
    assert_eq!(b.cx.sess.error_count(), 0);

    // An others choice covers whatever is left.
    let case = b.case(
        b.refer(i),
        vec![b.named_assoc(b.int(3), null), b.others_assoc(null)],
    );
    bounds::check(b.cx, case);
    assert_eq!(b.cx.sess.error_count(), 0);
}

#[test]
fn case_integer_duplicate_coverage() {
    fixture!(b);
    let integer = integer(&b);
    let small = b.int_subtype("small", integer, RangeKind::To, 0, 7);
    let i = b.signal("i", small, None);
    let null = b.node(
        None,
        TreeData::Block {
            decls: vec![],
            stmts: vec![],
        },
    );

    let messages = collect_messages(b.cx.sess);
    let case = b.case(
        b.refer(i),
        vec![
            b.range_assoc(b.range(RangeKind::To, 0, 4), null),
            b.range_assoc(b.range(RangeKind::To, 3, 5), null),
            b.others_assoc(null),
        ],
    );
    bounds::check(b.cx, case);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(messages.borrow()[0], "range 3 to 4 is already covered");

    let case = b.case(
        b.refer(i),
        vec![
            b.named_assoc(b.int(2), null),
            b.named_assoc(b.int(2), null),
            b.others_assoc(null),
        ],
    );
    bounds::check(b.cx, case);
    assert_eq!(b.cx.sess.error_count(), 2);
    assert_eq!(messages.borrow()[1], "value 2 is already covered");
}

#[test]
fn case_integer_choice_outside_type() {
    fixture!(b);
    let integer = integer(&b);
    let small = b.int_subtype("small", integer, RangeKind::To, 0, 7);
    let i = b.signal("i", small, None);
    let null = b.node(
        None,
        TreeData::Block {
            decls: vec![],
            stmts: vec![],
        },
    );

    let messages = collect_messages(b.cx.sess);
    let case = b.case(
        b.refer(i),
        vec![b.named_assoc(b.int(9), null), b.others_assoc(null)],
    );
    bounds::check(b.cx, case);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(messages.borrow()[0], "value 9 outside small bounds 0 to 7");
}

#[test]
fn case_enum_coverage() {
    fixture!(b);
    let (state, lits) = b.enum_ty("state", &["idle", "busy", "done"]);
    let s = b.signal("s", state, None);
    let null = b.node(
        None,
        TreeData::Block {
            decls: vec![],
            stmts: vec![],
        },
    );

    // All literals listed.
    let case = b.case(
        b.refer(s),
        (0..3).map(|i| b.named_assoc(b.refer(lits[i]), null)).collect(),
    );
    bounds::check(b.cx, case);
    assert_eq!(b.cx.sess.error_count(), 0);

    // A missing literal without others.
    let messages = collect_messages(b.cx.sess);
    let case = b.case(
        b.refer(s),
        vec![
            b.named_assoc(b.refer(lits[0]), null),
            b.named_assoc(b.refer(lits[1]), null),
        ],
    );
    bounds::check(b.cx, case);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(messages.borrow()[0], "missing choice done in case statement");

    // A duplicate choice.
    let case = b.case(
        b.refer(s),
        vec![
            b.named_assoc(b.refer(lits[0]), null),
            b.named_assoc(b.refer(lits[0]), null),
            b.others_assoc(null),
        ],
    );
    bounds::check(b.cx, case);
    assert_eq!(b.cx.sess.error_count(), 2);
    assert_eq!(
        messages.borrow()[1],
        "choice idle appears multiple times in case statement"
    );
}

#[test]
fn case_enum_subtype_coverage() {
    fixture!(b);
    let (state, lits) = b.enum_ty("state", &["idle", "busy", "done", "fail"]);
    let active = b.cx.alloc_ty(Ty::Subtype(SubtypeTy {
        name: Some(b.name("active")),
        base: state,
        constraints: vec![Range::new(
            RangeKind::To,
            b.refer(lits[1]),
            b.refer(lits[2]),
        )],
    }));
    let s = b.signal("s", active, None);
    let null = b.node(
        None,
        TreeData::Block {
            decls: vec![],
            stmts: vec![],
        },
    );

    // Only the constrained positions need covering.
    let case = b.case(
        b.refer(s),
        vec![
            b.named_assoc(b.refer(lits[1]), null),
            b.named_assoc(b.refer(lits[2]), null),
        ],
    );
    bounds::check(b.cx, case);
    assert_eq!(b.cx.sess.error_count(), 0);
}

#[test]
fn case_array_coverage() {
    fixture!(b);
    let ty = bit_vector(&b, 0, 1);
    let s = b.signal("s", ty, None);
    let null = b.node(
        None,
        TreeData::Block {
            decls: vec![],
            stmts: vec![],
        },
    );

    // Two of four possible two-bit values.
    let messages = collect_messages(b.cx.sess);
    let case = b.case(
        b.refer(s),
        vec![
            b.named_assoc(b.str_lit(Some(ty), "00"), null),
            b.named_assoc(b.str_lit(Some(ty), "11"), null),
        ],
    );
    bounds::check(b.cx, case);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(
        messages.borrow()[0],
        "choices cover only 2 of 4 possible values"
    );

    // An others choice satisfies the remainder.
    let case = b.case(
        b.refer(s),
        vec![
            b.named_assoc(b.str_lit(Some(ty), "00"), null),
            b.others_assoc(null),
        ],
    );
    bounds::check(b.cx, case);
    assert_eq!(b.cx.sess.error_count(), 1);
}

#[test]
fn type_conversion_bounds() {
    fixture!(b);
    let integer = integer(&b);
    let small = b.int_subtype("small", integer, RangeKind::To, 0, 15);

    let good = b.node(
        Some(small),
        TreeData::TypeConv {
            value: b.real(12.3),
        },
    );
    bounds::check(b.cx, good);
    assert_eq!(b.cx.sess.error_count(), 0);

    let messages = collect_messages(b.cx.sess);
    let bad = b.node(
        Some(small),
        TreeData::TypeConv {
            value: b.real(99.5),
        },
    );
    bounds::check(b.cx, bad);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert_eq!(
        messages.borrow()[0],
        "type conversion argument 99.5 out of bounds 0 to 15"
    );
}

#[test]
fn attribute_dimension_argument() {
    fixture!(b);
    let a = b.signal("a", bit_vector(&b, 0, 7), None);

    let good = b.node(
        None,
        TreeData::AttrRef {
            prefix: b.refer(a),
            attr: b.name("length"),
            predef: Some(PredefAttr::Length),
            params: vec![b.int(1)],
        },
    );
    bounds::check(b.cx, good);
    assert_eq!(b.cx.sess.error_count(), 0);

    let messages = collect_messages(b.cx.sess);
    let bad = b.node(
        None,
        TreeData::AttrRef {
            prefix: b.refer(a),
            attr: b.name("length"),
            predef: Some(PredefAttr::Length),
            params: vec![b.int(2)],
        },
    );
    bounds::check(b.cx, bad);
    assert_eq!(b.cx.sess.error_count(), 1);
    assert!(messages.borrow()[0].starts_with("invalid dimension 2 for type"));
}

#[test]
fn errors_accumulate_across_checks() {
    fixture!(b);
    let a = b.signal("a", bit_vector(&b, 0, 7), None);
    let mk_bad = |index: i64| {
        b.node(
            None,
            TreeData::ArrayRef {
                value: b.refer(a),
                indices: vec![b.int(index)],
                elide_bounds: Cell::new(false),
            },
        )
    };
    bounds::check(b.cx, mk_bad(9));
    bounds::check(b.cx, mk_bad(-1));
    assert_eq!(b.cx.sess.error_count(), 2);
}
