//! Modal forms opened from the console views. Each dialog only collects
//! input; the view that opened it performs the backend and overlay calls.

mod confirm;
pub use confirm::ConfirmDialog;

mod add_user;
pub use add_user::AddUserDialog;

mod edit_user;
pub use edit_user::{EditLevelDialog, EditTargetDialog};

mod assign_projects;
pub use assign_projects::AssignProjectsDialog;
