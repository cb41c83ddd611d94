//! Class declarations as resolved by the host.
//!
//! A `ClassDecl` is the host's view of one declared type: its shape flags,
//! constructors, declared fields and the origin of each derivable member.
//! It is read-only once built.

use bitflags::bitflags;

use crate::{DerivedOp, MemberOrigin, Name, Span, TypeRef};

bitflags! {
    /// Shape properties of a declared class.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ClassFlags: u8 {
        /// Carries the opt-in marker annotation.
        const MARKED = 1 << 0;
        /// A native data class: the compiler already generates value members.
        const DATA = 1 << 1;
        /// An inline/zero-cost value wrapper.
        const INLINE = 1 << 2;
        /// A non-static nested class holding an outer-instance reference.
        const INNER = 1 << 3;
    }
}

/// A constructor parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamDecl {
    pub name: Name,
    pub ty: TypeRef,
    /// The parameter declares a property (`val`/`var`) and binds a field.
    /// Plain parameters do not participate in derivation.
    pub is_property: bool,
}

impl ParamDecl {
    /// A parameter that binds a field of the same name.
    pub fn property(name: Name, ty: TypeRef) -> Self {
        ParamDecl {
            name,
            ty,
            is_property: true,
        }
    }

    /// A plain constructor parameter.
    pub fn plain(name: Name, ty: TypeRef) -> Self {
        ParamDecl {
            name,
            ty,
            is_property: false,
        }
    }
}

/// A constructor signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstructorDecl {
    pub is_primary: bool,
    pub params: Vec<ParamDecl>,
}

impl ConstructorDecl {
    pub fn primary(params: Vec<ParamDecl>) -> Self {
        ConstructorDecl {
            is_primary: true,
            params,
        }
    }

    pub fn secondary(params: Vec<ParamDecl>) -> Self {
        ConstructorDecl {
            is_primary: false,
            params,
        }
    }
}

/// A declared field of a class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDecl {
    pub name: Name,
    pub ty: TypeRef,
}

/// Origin of each derivable member on a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct MemberTable {
    pub equals: MemberOrigin,
    pub hash_code: MemberOrigin,
    pub to_string: MemberOrigin,
}

impl MemberTable {
    /// Every member inherited from the root class, none user-written.
    pub fn synthesized() -> Self {
        MemberTable {
            equals: MemberOrigin::Synthesized,
            hash_code: MemberOrigin::Synthesized,
            to_string: MemberOrigin::Synthesized,
        }
    }

    pub fn get(&self, op: DerivedOp) -> MemberOrigin {
        match op {
            DerivedOp::Equals => self.equals,
            DerivedOp::HashCode => self.hash_code,
            DerivedOp::ToString => self.to_string,
        }
    }

    pub fn set(&mut self, op: DerivedOp, origin: MemberOrigin) {
        match op {
            DerivedOp::Equals => self.equals = origin,
            DerivedOp::HashCode => self.hash_code = origin,
            DerivedOp::ToString => self.to_string = origin,
        }
    }
}

/// One declared class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassDecl {
    pub name: Name,
    pub span: Span,
    pub flags: ClassFlags,
    pub constructors: Vec<ConstructorDecl>,
    pub fields: Vec<FieldDecl>,
    pub members: MemberTable,
}

impl ClassDecl {
    /// A marked class with no constructors, fields or user-written members.
    pub fn new(name: Name, span: Span) -> Self {
        ClassDecl {
            name,
            span,
            flags: ClassFlags::MARKED,
            constructors: Vec::new(),
            fields: Vec::new(),
            members: MemberTable::synthesized(),
        }
    }

    /// Look up a declared field by name.
    pub fn field(&self, name: Name) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Add a primary constructor whose parameters are all properties, and
    /// declare the matching fields.
    #[must_use]
    pub fn with_primary(mut self, params: impl IntoIterator<Item = (Name, TypeRef)>) -> Self {
        let params: Vec<ParamDecl> = params
            .into_iter()
            .map(|(name, ty)| ParamDecl::property(name, ty))
            .collect();
        for param in &params {
            self.fields.push(FieldDecl {
                name: param.name,
                ty: param.ty.clone(),
            });
        }
        self.constructors.push(ConstructorDecl::primary(params));
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: ClassFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_member(mut self, op: DerivedOp, origin: MemberOrigin) -> Self {
        self.members.set(op, origin);
        self
    }
}
