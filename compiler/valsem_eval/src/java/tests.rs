use pretty_assertions::assert_eq;

use super::*;

#[test]
fn string_hash_matches_jvm() {
    assert_eq!(string_hash(""), 0);
    assert_eq!(string_hash("a"), 97);
    assert_eq!(string_hash("hello"), 99_162_322);
    // Wraps past i32::MAX.
    assert_eq!(string_hash("polygenelubricants"), i32::MIN);
}

#[test]
fn long_fold() {
    assert_eq!(fold_long(0), 0);
    assert_eq!(fold_long(1), 1);
    assert_eq!(fold_long(-1), 0);
    assert_eq!(fold_long(1 << 32), 1);
}

#[test]
fn nan_bits_are_canonical() {
    let odd_nan = f32::from_bits(0x7fc0_0001);
    assert_eq!(float_to_int_bits(odd_nan), float_to_int_bits(f32::NAN));
    assert_ne!(float_to_int_bits(0.0), float_to_int_bits(-0.0));
    assert_eq!(double_to_long_bits(1.0), 0x3ff0_0000_0000_0000);
}

#[test]
fn doubles_format_like_the_jvm() {
    let cases = [
        (1.0, "1.0"),
        (-2.5, "-2.5"),
        (100.0, "100.0"),
        (0.1, "0.1"),
        (0.001, "0.001"),
        (1.0e-4, "1.0E-4"),
        (1.0e7, "1.0E7"),
        (1_234_567.0, "1234567.0"),
        (1.5e10, "1.5E10"),
        (0.0, "0.0"),
        (-0.0, "-0.0"),
        (f64::INFINITY, "Infinity"),
        (f64::NEG_INFINITY, "-Infinity"),
        (f64::NAN, "NaN"),
    ];
    for (d, expected) in cases {
        assert_eq!(format_double(d), expected, "{d:?}");
    }
}

#[test]
fn floats_use_shortest_float_digits() {
    assert_eq!(format_float(0.1), "0.1");
    assert_eq!(format_float(3.0), "3.0");
    assert_eq!(format_float(-0.0), "-0.0");
    assert_eq!(format_float(1.0e10), "1.0E10");
}

#[test]
fn chars_render_as_text() {
    assert_eq!(char_string(u16::from(b'x')), "x");
    assert_eq!(char_string(0xd800), "\u{fffd}");
}

#[test]
fn identity_strings_are_hex() {
    assert_eq!(identity_string("Point", 255), "Point@ff");
    assert_eq!(identity_string("[I", -1), "[I@ffffffff");
}

// ── Primitive arrays ──

#[test]
fn array_equals_by_content() {
    let a = ArrayValue::Int(vec![1, 2, 3]);
    assert_eq!(prim_array_equals(&a, &ArrayValue::Int(vec![1, 2, 3])), Some(true));
    assert_eq!(prim_array_equals(&a, &ArrayValue::Int(vec![1, 2, 4])), Some(false));
    assert_eq!(prim_array_equals(&a, &ArrayValue::Int(vec![1, 2])), Some(false));
    assert_eq!(prim_array_equals(&a, &ArrayValue::Long(vec![1, 2, 3])), None);
}

#[test]
fn float_arrays_equal_by_canonical_bits() {
    let zero = ArrayValue::Double(vec![0.0]);
    let neg_zero = ArrayValue::Double(vec![-0.0]);
    assert_eq!(prim_array_equals(&zero, &neg_zero), Some(false));
    let nan = ArrayValue::Float(vec![f32::NAN]);
    let odd_nan = ArrayValue::Float(vec![f32::from_bits(0x7fc0_0001)]);
    assert_eq!(prim_array_equals(&nan, &odd_nan), Some(true));
}

#[test]
fn array_hash_matches_jvm() {
    assert_eq!(prim_array_hash(&ArrayValue::Int(vec![])), Some(1));
    assert_eq!(
        prim_array_hash(&ArrayValue::Int(vec![1, 2, 3])),
        Some(((31 + 1) * 31 + 2) * 31 + 3)
    );
    assert_eq!(
        prim_array_hash(&ArrayValue::Boolean(vec![true])),
        Some(31 + 1231)
    );
    assert_eq!(prim_array_hash(&ArrayValue::Object(vec![])), None);
}

#[test]
fn array_to_string_lists_content() {
    assert_eq!(
        prim_array_to_string(&ArrayValue::Int(vec![1, 2, 3])).unwrap(),
        "[1, 2, 3]"
    );
    assert_eq!(
        prim_array_to_string(&ArrayValue::Char(vec![u16::from(b'h'), u16::from(b'i')])).unwrap(),
        "[h, i]"
    );
    assert_eq!(
        prim_array_to_string(&ArrayValue::Double(vec![1.0, 0.5])).unwrap(),
        "[1.0, 0.5]"
    );
    assert_eq!(prim_array_to_string(&ArrayValue::Long(vec![])).unwrap(), "[]");
}
