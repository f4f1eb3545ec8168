use dioxus::prelude::*;

use crate::components::{Button, ButtonVariant};

#[component]
pub fn ConfirmDialog(
    title: String,
    message: String,
    #[props(default = "Confirm".to_string())] confirm_label: String,
    #[props(default)] destructive: bool,
    #[props(default)] busy: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        div {
            class: "dialog",
            h2 { class: "dialog-title", "{title}" }
            p { class: "dialog-message", "{message}" }
            div {
                class: "dialog-actions",
                Button {
                    variant: if destructive { ButtonVariant::Destructive } else { ButtonVariant::Primary },
                    disabled: busy,
                    onclick: move |_| on_confirm.call(()),
                    if busy { "Working..." } else { "{confirm_label}" }
                }
                Button {
                    variant: ButtonVariant::Outline,
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
            }
        }
    }
}
