//! Target type expressions.

use std::fmt;

/// A structural type expression in the generated declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsType {
    /// `boolean`.
    Boolean,
    /// `number`.
    Number,
    /// `string`.
    String,
    /// `any`, for untyped JSON.
    Any,
    /// `never`, for fields whose type could not be resolved.
    Never,
    /// `null`.
    Null,
    /// Reference to a generated type.
    Reference(String),
    /// Type of one property of a generated type: `Author["id"]`.
    IndexedAccess {
        /// Referenced type identifier.
        object: String,
        /// Property name.
        key: String,
    },
    /// Single-quoted string literal type.
    StringLiteral(String),
    /// Array of the inner type.
    Array(Box<TsType>),
    /// Union of the member types.
    Union(Vec<TsType>),
}

impl TsType {
    /// Creates a reference to a generated type.
    #[must_use]
    pub fn reference(identifier: impl Into<String>) -> Self {
        Self::Reference(identifier.into())
    }

    /// Creates an array of `item`.
    #[must_use]
    pub fn array(item: Self) -> Self {
        Self::Array(Box::new(item))
    }

    /// Creates a union of `members`, flattening nested unions.
    ///
    /// A single member is returned unwrapped.
    #[must_use]
    pub fn union(members: impl IntoIterator<Item = Self>) -> Self {
        let mut flat = Vec::new();
        for member in members {
            match member {
                Self::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Self::Union(flat)
        }
    }

    /// Widens the type with `null`, once.
    #[must_use]
    pub fn nullable(self) -> Self {
        if self.contains_null() {
            self
        } else {
            Self::union([self, Self::Null])
        }
    }

    fn contains_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Union(members) => members.contains(&Self::Null),
            _ => false,
        }
    }
}

impl fmt::Display for TsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("boolean"),
            Self::Number => f.write_str("number"),
            Self::String => f.write_str("string"),
            Self::Any => f.write_str("any"),
            Self::Never => f.write_str("never"),
            Self::Null => f.write_str("null"),
            Self::Reference(identifier) => f.write_str(identifier),
            Self::IndexedAccess { object, key } => {
                write!(f, "{object}[\"{}\"]", escape(key, '"'))
            }
            Self::StringLiteral(value) => write!(f, "'{}'", escape(value, '\'')),
            Self::Array(item) => match item.as_ref() {
                Self::Union(_) => write!(f, "({item})[]"),
                _ => write!(f, "{item}[]"),
            },
            Self::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
        }
    }
}

/// Escapes `value` for a literal delimited by `quote`.
///
/// Line terminators and other control characters are written as escape
/// sequences so the literal stays on one line.
#[must_use]
pub fn escape(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' | '\u{2029}' => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c if c == '\\' || c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
