//! Domain layer for servicebook - normalization, editing, ordering, repository traits

pub mod catalog;
pub mod editor;
pub mod normalize;
pub mod ordering;
pub mod repository;

pub use editor::{
    BrakeCorner, DeleteConfirmation, EditSession, FieldEdit, ScalarField, ServiceCategory,
    ServiceFlag,
};
pub use normalize::normalize_record;
pub use ordering::sort_newest_first;
pub use repository::{IdentityProvider, RecordStore};
