//! TypeScript declaration generation.

pub mod choices;
pub mod index;
pub mod model;
pub mod relations;
pub mod scalar;
pub mod types;

pub use choices::{ChoiceFailure, ChoiceResolver};
pub use index::IndexEmitter;
pub use model::{FieldResolution, ModelEmitter, ModelUnit, ResolvedField};
pub use relations::{RelationClassifier, RelationType};
pub use scalar::scalar_type;
pub use types::TsType;
