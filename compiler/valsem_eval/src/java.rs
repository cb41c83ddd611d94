//! JVM library semantics the derived code relies on.
//!
//! `String.hashCode`, the boxed-primitive hashes, `Float.toString` and
//! `Double.toString`, and the primitive overloads of `Arrays.equals`,
//! `Arrays.hashCode` and `Arrays.toString`. Object arrays need virtual
//! dispatch and live on [`Runtime`](crate::Runtime).

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::ArrayValue;

/// `String.hashCode`: a fold by 31 over UTF-16 code units.
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(i32::from(c)))
}

/// `(int) (bits ^ (bits >>> 32))`
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    reason = "bit-level reinterpretation is the point"
)]
pub fn fold_long(bits: i64) -> i32 {
    (bits ^ ((bits as u64) >> 32) as i64) as i32
}

/// `Float.floatToIntBits`: raw bits with every NaN collapsed to one.
#[expect(clippy::cast_possible_wrap, reason = "bit-level reinterpretation")]
pub fn float_to_int_bits(f: f32) -> i32 {
    if f.is_nan() {
        0x7fc0_0000
    } else {
        f.to_bits() as i32
    }
}

/// `Double.doubleToLongBits`: raw bits with every NaN collapsed to one.
#[expect(clippy::cast_possible_wrap, reason = "bit-level reinterpretation")]
pub fn double_to_long_bits(d: f64) -> i64 {
    if d.is_nan() {
        0x7ff8_0000_0000_0000
    } else {
        d.to_bits() as i64
    }
}

/// `Boolean.hashCode`.
pub fn boolean_hash(b: bool) -> i32 {
    if b {
        1231
    } else {
        1237
    }
}

/// A UTF-16 code unit as a string. Lone surrogates become U+FFFD.
pub fn char_string(c: u16) -> String {
    String::from_utf16_lossy(&[c])
}

/// Stable hash of an allocation address, standing in for
/// `System.identityHashCode`.
#[expect(clippy::cast_possible_truncation, reason = "identity hashes are 32 bits")]
pub fn identity_hash<T: ?Sized>(ptr: *const T) -> i32 {
    let mut hasher = FxHasher::default();
    ptr.cast::<()>().hash(&mut hasher);
    let h = hasher.finish();
    (h ^ (h >> 32)) as i32
}

/// `Object.toString` for a value without its own: `Class@hex`.
pub fn identity_string(class: &str, hash: i32) -> String {
    format!("{class}@{hash:x}")
}

// ── Floating-point formatting ──

/// `Float.toString`.
pub fn format_float(f: f32) -> String {
    if f.is_nan() {
        return "NaN".to_owned();
    }
    java_decimal(f.is_sign_negative(), f.is_infinite(), f == 0.0, &format!("{:e}", f.abs()))
}

/// `Double.toString`.
pub fn format_double(d: f64) -> String {
    if d.is_nan() {
        return "NaN".to_owned();
    }
    java_decimal(d.is_sign_negative(), d.is_infinite(), d == 0.0, &format!("{:e}", d.abs()))
}

/// Lay out the shortest round-tripping digits the way the JVM does:
/// plain decimal for magnitudes in `[1e-3, 1e7)`, otherwise `d.dddE±n`.
/// At least one digit always follows the point.
fn java_decimal(negative: bool, infinite: bool, zero: bool, sci: &str) -> String {
    let sign = if negative { "-" } else { "" };
    if infinite {
        return format!("{sign}Infinity");
    }
    if zero {
        return format!("{sign}0.0");
    }

    // `sci` is `d[.ddd]e[-]n`.
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    if (-3..7).contains(&exp) {
        if exp >= 0 {
            let point = usize::try_from(exp).unwrap_or(0) + 1;
            let mut int_part = digits.chars().take(point).collect::<String>();
            while int_part.len() < point {
                int_part.push('0');
            }
            let frac: String = digits.chars().skip(point).collect();
            let frac = if frac.is_empty() { "0".to_owned() } else { frac };
            format!("{sign}{int_part}.{frac}")
        } else {
            let zeros = "0".repeat(usize::try_from(-exp - 1).unwrap_or(0));
            format!("{sign}0.{zeros}{digits}")
        }
    } else {
        let (first, rest) = digits.split_at(1.min(digits.len()));
        let rest = if rest.is_empty() { "0" } else { rest };
        format!("{sign}{first}.{rest}E{exp}")
    }
}

// ── Primitive arrays ──

/// `Arrays.equals` for two primitive arrays of the same element type.
///
/// Returns `None` when the element types differ. Floating-point elements
/// compare by `floatToIntBits`/`doubleToLongBits`.
pub fn prim_array_equals(a: &ArrayValue, b: &ArrayValue) -> Option<bool> {
    Some(match (a, b) {
        (ArrayValue::Boolean(a), ArrayValue::Boolean(b)) => a == b,
        (ArrayValue::Byte(a), ArrayValue::Byte(b)) => a == b,
        (ArrayValue::Short(a), ArrayValue::Short(b)) => a == b,
        (ArrayValue::Char(a), ArrayValue::Char(b)) => a == b,
        (ArrayValue::Int(a), ArrayValue::Int(b)) => a == b,
        (ArrayValue::Long(a), ArrayValue::Long(b)) => a == b,
        (ArrayValue::Float(a), ArrayValue::Float(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b)
                    .all(|(x, y)| float_to_int_bits(*x) == float_to_int_bits(*y))
        }
        (ArrayValue::Double(a), ArrayValue::Double(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b)
                    .all(|(x, y)| double_to_long_bits(*x) == double_to_long_bits(*y))
        }
        _ => return None,
    })
}

fn fold_hash(hashes: impl Iterator<Item = i32>) -> i32 {
    hashes.fold(1i32, |acc, h| acc.wrapping_mul(31).wrapping_add(h))
}

/// `Arrays.hashCode` for a primitive array. `None` for object arrays.
pub fn prim_array_hash(a: &ArrayValue) -> Option<i32> {
    Some(match a {
        ArrayValue::Boolean(v) => fold_hash(v.iter().map(|&b| boolean_hash(b))),
        ArrayValue::Byte(v) => fold_hash(v.iter().map(|&b| i32::from(b))),
        ArrayValue::Short(v) => fold_hash(v.iter().map(|&s| i32::from(s))),
        ArrayValue::Char(v) => fold_hash(v.iter().map(|&c| i32::from(c))),
        ArrayValue::Int(v) => fold_hash(v.iter().copied()),
        ArrayValue::Long(v) => fold_hash(v.iter().map(|&l| fold_long(l))),
        ArrayValue::Float(v) => fold_hash(v.iter().map(|&f| float_to_int_bits(f))),
        ArrayValue::Double(v) => fold_hash(v.iter().map(|&d| fold_long(double_to_long_bits(d)))),
        ArrayValue::Object(_) => return None,
    })
}

/// `Arrays.toString` for a primitive array. `None` for object arrays.
pub fn prim_array_to_string(a: &ArrayValue) -> Option<String> {
    let items: Vec<String> = match a {
        ArrayValue::Boolean(v) => v.iter().map(ToString::to_string).collect(),
        ArrayValue::Byte(v) => v.iter().map(ToString::to_string).collect(),
        ArrayValue::Short(v) => v.iter().map(ToString::to_string).collect(),
        ArrayValue::Char(v) => v.iter().map(|&c| char_string(c)).collect(),
        ArrayValue::Int(v) => v.iter().map(ToString::to_string).collect(),
        ArrayValue::Long(v) => v.iter().map(ToString::to_string).collect(),
        ArrayValue::Float(v) => v.iter().map(|&f| format_float(f)).collect(),
        ArrayValue::Double(v) => v.iter().map(|&d| format_double(d)).collect(),
        ArrayValue::Object(_) => return None,
    };
    Some(bracketed(&items))
}

/// `[a, b, c]`
pub fn bracketed(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests;
