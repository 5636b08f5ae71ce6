mod loader;
mod mapper;
mod relations;
mod statements;

pub use loader::load_relations;
pub use mapper::EntityMapper;
pub use relations::{Relation, RelationKind};
pub use statements::{validate_identifier, IDENTITY_FIELD};
