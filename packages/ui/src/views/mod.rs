mod modal_overlay;
pub use modal_overlay::ModalOverlay;

mod console_layout;
pub use console_layout::ConsoleLayoutView;

mod users;
pub use users::UsersView;

mod assigned_tasks;
pub use assigned_tasks::AssignedTasksView;

mod reports;
pub use reports::ReportsView;

mod assign_role;
pub use assign_role::AssignRoleView;
