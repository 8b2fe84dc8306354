//! Scalar type mapping.

use crate::error::ResolveError;
use crate::typescript::types::TsType;
use schemagen_schema::FieldKind;

/// Maps a schema field kind to its target type.
///
/// # Errors
/// Returns `ResolveError::UnsupportedFieldType` for `alias`, `binary`,
/// `geometry` (any subtype) and unrecognized kinds.
pub fn scalar_type(kind: &FieldKind) -> Result<TsType, ResolveError> {
    match kind {
        FieldKind::Boolean => Ok(TsType::Boolean),
        kind if kind.is_numeric() => Ok(TsType::Number),
        kind if kind.is_temporal() => Ok(TsType::String),
        FieldKind::Text | FieldKind::String | FieldKind::Uuid | FieldKind::Hash => {
            Ok(TsType::String)
        }
        FieldKind::Json => Ok(TsType::Any),
        FieldKind::Csv => Ok(TsType::array(TsType::String)),
        _ => Err(ResolveError::unsupported(kind.schema_name())),
    }
}
