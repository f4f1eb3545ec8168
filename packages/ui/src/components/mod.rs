//! Form widgets and toasts shared by the console views.

mod button;
pub use button::{Button, ButtonVariant};

mod input;
pub use input::{Input, Label};

mod toast;
pub use toast::{use_toast, ToastOptions, ToastProvider};
