//! Graph insert statements and the targets values are attached to.

mod attach;
mod pattern;

pub use attach::{Attachable, attach_values};
pub use pattern::{
    AttributeStatement, Has, InsertStatement, RelationStatement, RolePlayer, ThingStatement,
    UnboundVariable,
};
