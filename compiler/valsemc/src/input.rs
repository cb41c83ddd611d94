//! TOML class tables.
//!
//! The driver has no parser for a host language; classes arrive already
//! resolved, one `[[class]]` table each:
//!
//! ```toml
//! [[class]]
//! name = "Point"
//! modifiers = ["inner"]          # data | inline | inner
//! user_defined = ["toString"]    # written by hand, not derived
//!
//! [[class.constructor]]
//! params = [
//!     { name = "x", type = "int" },
//!     { name = "scale", type = "double", property = false },
//! ]
//! ```
//!
//! Property parameters declare a field of the same name and type unless
//! the class lists one under `fields` already.

use std::ops::Range;

use serde::Deserialize;
use toml::Spanned;
use valsem_derive::ClassTable;
use valsem_ir::{
    ClassDecl, ClassFlags, ConstructorDecl, DerivedOp, FieldDecl, MemberOrigin, ParamDecl, Span,
    SpanError, StringInterner, TypeRef,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassFile {
    #[serde(default, rename = "class")]
    classes: Vec<RawClass>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClass {
    name: Spanned<String>,
    #[serde(default = "default_true")]
    marked: bool,
    #[serde(default)]
    modifiers: Vec<Spanned<String>>,
    #[serde(default, rename = "constructor")]
    constructors: Vec<RawConstructor>,
    #[serde(default)]
    fields: Vec<RawField>,
    #[serde(default)]
    user_defined: Vec<Spanned<String>>,
    #[serde(default)]
    absent: Vec<Spanned<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConstructor {
    #[serde(default = "default_true")]
    primary: bool,
    #[serde(default)]
    params: Vec<RawParam>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawParam {
    name: String,
    #[serde(rename = "type")]
    ty: Spanned<String>,
    #[serde(default = "default_true")]
    property: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    ty: Spanned<String>,
}

fn default_true() -> bool {
    true
}

/// A class table that could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("invalid class table: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("`{text}` is not a type")]
    InvalidType { text: String, span: Range<usize> },

    #[error("`{text}` cannot be the type of a field or parameter")]
    VoidType { text: String, span: Range<usize> },

    #[error("unknown modifier `{text}`: expected `data`, `inline` or `inner`")]
    UnknownModifier { text: String, span: Range<usize> },

    #[error("unknown member `{text}`: expected `equals`, `hashCode` or `toString`")]
    UnknownMember { text: String, span: Range<usize> },

    #[error("class `{name}` is declared twice")]
    DuplicateClass { name: String, span: Range<usize> },

    #[error(transparent)]
    Span(#[from] SpanError),
}

impl InputError {
    /// Byte range in the input the error points at, if known.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            InputError::Toml(e) => e.span(),
            InputError::InvalidType { span, .. }
            | InputError::VoidType { span, .. }
            | InputError::UnknownModifier { span, .. }
            | InputError::UnknownMember { span, .. }
            | InputError::DuplicateClass { span, .. } => Some(span.clone()),
            InputError::Span(_) => None,
        }
    }
}

/// Parse `text` into a class table, interning names through `interner`.
///
/// Class spans cover the quoted class name in `text`.
pub fn load_classes(text: &str, interner: &StringInterner) -> Result<ClassTable, InputError> {
    let file: ClassFile = toml::from_str(text)?;
    let mut table = ClassTable::new();
    for raw in file.classes {
        let range = raw.name.span();
        let class = lower_class(raw, interner)?;
        let name = class.name;
        table
            .insert(class)
            .map_err(|_| InputError::DuplicateClass {
                name: interner.lookup(name).to_owned(),
                span: range,
            })?;
    }
    tracing::debug!(classes = table.len(), "loaded class table");
    Ok(table)
}

fn lower_class(raw: RawClass, interner: &StringInterner) -> Result<ClassDecl, InputError> {
    let span = Span::try_from_range(raw.name.span())?;
    let mut class = ClassDecl::new(interner.intern(raw.name.get_ref()), span);
    if !raw.marked {
        class.flags.remove(ClassFlags::MARKED);
    }
    for modifier in &raw.modifiers {
        class.flags |= parse_modifier(modifier)?;
    }

    for field in raw.fields {
        let name = interner.intern(&field.name);
        if class.field(name).is_none() {
            let ty = parse_type(&field.ty, interner)?;
            class.fields.push(FieldDecl { name, ty });
        }
    }

    for ctor in raw.constructors {
        let mut params = Vec::with_capacity(ctor.params.len());
        for param in ctor.params {
            params.push(ParamDecl {
                name: interner.intern(&param.name),
                ty: parse_type(&param.ty, interner)?,
                is_property: param.property,
            });
        }
        for param in params.iter().filter(|p| p.is_property) {
            if class.field(param.name).is_none() {
                class.fields.push(FieldDecl {
                    name: param.name,
                    ty: param.ty.clone(),
                });
            }
        }
        class.constructors.push(ConstructorDecl {
            is_primary: ctor.primary,
            params,
        });
    }

    for member in &raw.user_defined {
        class.members.set(parse_member(member)?, MemberOrigin::UserDefined);
    }
    for member in &raw.absent {
        class.members.set(parse_member(member)?, MemberOrigin::NotPresent);
    }
    Ok(class)
}

/// Parse a field or parameter type. `void` is a type but holds no value.
fn parse_type(text: &Spanned<String>, interner: &StringInterner) -> Result<TypeRef, InputError> {
    match TypeRef::parse(text.get_ref(), interner) {
        Some(ty) if ty.is_void() => Err(InputError::VoidType {
            text: text.get_ref().clone(),
            span: text.span(),
        }),
        Some(ty) => Ok(ty),
        None => Err(InputError::InvalidType {
            text: text.get_ref().clone(),
            span: text.span(),
        }),
    }
}

fn parse_modifier(text: &Spanned<String>) -> Result<ClassFlags, InputError> {
    match text.get_ref().as_str() {
        "data" => Ok(ClassFlags::DATA),
        "inline" | "value" => Ok(ClassFlags::INLINE),
        "inner" => Ok(ClassFlags::INNER),
        other => Err(InputError::UnknownModifier {
            text: other.to_owned(),
            span: text.span(),
        }),
    }
}

fn parse_member(text: &Spanned<String>) -> Result<DerivedOp, InputError> {
    DerivedOp::from_name(text.get_ref()).ok_or_else(|| InputError::UnknownMember {
        text: text.get_ref().clone(),
        span: text.span(),
    })
}
