//! Entity field storage and change tracking

pub mod dirty;
pub mod dynamic;
pub mod error;
pub mod layout;
pub mod store;

pub use dynamic::{ArenaCooldown, ChangeKind, DynamicArray, DynamicFields};
pub use error::FieldError;
pub use layout::UpdateFieldFlags;
pub use store::FieldStore;
