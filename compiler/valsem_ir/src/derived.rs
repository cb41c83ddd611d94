//! Derived operation definitions.
//!
//! [`DerivedOp`] names the three operations this workspace derives and
//! describes their signature shape; [`MemberOrigin`] records whether a class
//! already has the operation and who wrote it.

/// An operation derived from a class's field list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DerivedOp {
    /// `equals(other: Any?): Boolean`
    Equals,
    /// `hashCode(): Int`
    HashCode,
    /// `toString(): String`
    ToString,
}

impl DerivedOp {
    /// Every derived operation, in generation order.
    pub const ALL: &'static [DerivedOp] = &[DerivedOp::ToString, DerivedOp::Equals, DerivedOp::HashCode];

    /// Number of derived operations.
    pub const COUNT: usize = 3;

    /// Parse a method name into a `DerivedOp`.
    pub fn from_name(s: &str) -> Option<DerivedOp> {
        match s {
            "equals" => Some(DerivedOp::Equals),
            "hashCode" => Some(DerivedOp::HashCode),
            "toString" => Some(DerivedOp::ToString),
            _ => None,
        }
    }

    /// The method name of this operation.
    pub fn method_name(self) -> &'static str {
        match self {
            DerivedOp::Equals => "equals",
            DerivedOp::HashCode => "hashCode",
            DerivedOp::ToString => "toString",
        }
    }

    /// Signature shape of the generated method.
    pub fn shape(self) -> DerivedMethodShape {
        match self {
            DerivedOp::Equals => DerivedMethodShape::BinaryPredicate,
            DerivedOp::HashCode => DerivedMethodShape::UnaryToInt,
            DerivedOp::ToString => DerivedMethodShape::UnaryToStr,
        }
    }
}

/// Signature shape of a derived method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DerivedMethodShape {
    /// `(self, other) -> bool`
    BinaryPredicate,
    /// `(self) -> int`
    UnaryToInt,
    /// `(self) -> str`
    UnaryToStr,
}

impl DerivedMethodShape {
    /// Whether the method receives an `other` parameter.
    pub fn has_other(self) -> bool {
        matches!(self, DerivedMethodShape::BinaryPredicate)
    }

    /// Number of parameters including `self`.
    pub fn param_count(self) -> usize {
        if self.has_other() {
            2
        } else {
            1
        }
    }
}

/// Where an existing member of a class comes from.
///
/// Only `NotPresent` and `Synthesized` members are replaced by a derived
/// implementation; a `UserDefined` member opts that single operation out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum MemberOrigin {
    /// The class has no such member at all.
    #[default]
    NotPresent,
    /// The member is the compiler's inherited/synthesized default.
    Synthesized,
    /// The user wrote this member.
    UserDefined,
}

impl MemberOrigin {
    /// Whether a derived implementation should be generated.
    pub fn needs_generation(self) -> bool {
        !matches!(self, MemberOrigin::UserDefined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_round_trip() {
        for &op in DerivedOp::ALL {
            assert_eq!(DerivedOp::from_name(op.method_name()), Some(op));
        }
        assert_eq!(DerivedOp::from_name("compareTo"), None);
    }

    #[test]
    fn count_matches_all_len() {
        assert_eq!(DerivedOp::COUNT, DerivedOp::ALL.len());
    }

    #[test]
    fn shapes() {
        assert_eq!(DerivedOp::Equals.shape().param_count(), 2);
        assert_eq!(DerivedOp::HashCode.shape().param_count(), 1);
        assert_eq!(
            DerivedOp::ToString.shape(),
            DerivedMethodShape::UnaryToStr
        );
    }

    #[test]
    fn only_user_defined_members_opt_out() {
        assert!(MemberOrigin::NotPresent.needs_generation());
        assert!(MemberOrigin::Synthesized.needs_generation());
        assert!(!MemberOrigin::UserDefined.needs_generation());
    }
}
