pub mod merge;
pub mod model;
pub mod ordering;
pub mod validation;

pub use merge::{apply_update, new_record};
pub use model::{Category, Pos, Priority, Status, Todo};
pub use ordering::{ListFilter, compare_for_listing, owner_listing};
pub use validation::{
    CreateTodoRequest, FieldError, FieldErrorCode, FieldErrors, UpdateTodoRequest,
};
