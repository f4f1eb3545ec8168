use api::User;
use dioxus::prelude::*;
use store::Level;

use crate::components::{Button, ButtonVariant, Label};

/// Free-text target for one user. Saving blank text is refused; use
/// `on_clear` to remove a target.
#[component]
pub fn EditTargetDialog(
    user: User,
    current: Option<String>,
    on_save: EventHandler<String>,
    on_clear: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let has_target = current.is_some();
    let mut text = use_signal(move || current.unwrap_or_default());
    let blank = text().trim().is_empty();

    rsx! {
        div {
            class: "dialog",
            h2 { class: "dialog-title", "Edit Target" }
            p { class: "dialog-subtitle", "{user.display_name()} ({user.email})" }
            div {
                class: "field",
                Label { html_for: "target-description", "Target description" }
                textarea {
                    id: "target-description",
                    class: "textarea",
                    rows: 4,
                    placeholder: "e.g. 200 tasks per day",
                    value: text(),
                    oninput: move |evt| text.set(evt.value()),
                }
            }
            div {
                class: "dialog-actions",
                Button {
                    variant: ButtonVariant::Primary,
                    disabled: blank,
                    onclick: move |_| on_save.call(text()),
                    "Save"
                }
                if has_target {
                    Button {
                        variant: ButtonVariant::Destructive,
                        onclick: move |_| on_clear.call(()),
                        "Remove"
                    }
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

#[component]
pub fn EditLevelDialog(
    user: User,
    current: Level,
    on_save: EventHandler<Level>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut level = use_signal(move || current);

    rsx! {
        div {
            class: "dialog",
            h2 { class: "dialog-title", "Edit Level" }
            p { class: "dialog-subtitle", "{user.display_name()} ({user.email})" }
            div {
                class: "field",
                Label { html_for: "user-level", "Level" }
                select {
                    id: "user-level",
                    class: "select",
                    value: level().label(),
                    onchange: move |evt| {
                        if let Some(picked) = Level::from_label(&evt.value()) {
                            level.set(picked);
                        }
                    },
                    for choice in Level::ALL {
                        option { key: "{choice}", value: choice.label(), "{choice}" }
                    }
                }
            }
            div {
                class: "dialog-actions",
                Button {
                    variant: ButtonVariant::Primary,
                    onclick: move |_| on_save.call(level()),
                    "Save"
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
