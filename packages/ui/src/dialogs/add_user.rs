use api::NewUser;
use dioxus::prelude::*;

use crate::components::{Button, ButtonVariant, Input, Label};

/// Roles an admin may pick for a new account.
const ROLE_CHOICES: [&str; 2] = [NewUser::DEFAULT_ROLE, "Client"];

/// Form for creating an account. Only admins get a role choice; everyone
/// else creates `User` accounts.
#[component]
pub fn AddUserDialog(
    caller_is_admin: bool,
    #[props(default)] busy: bool,
    on_create: EventHandler<NewUser>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut email = use_signal(String::new);
    let mut first_name = use_signal(String::new);
    let mut last_name = use_signal(String::new);
    let mut role = use_signal(|| NewUser::DEFAULT_ROLE.to_string());
    let mut error = use_signal(|| Option::<&str>::None);

    let handle_submit = move |_| {
        if email().trim().is_empty() {
            error.set(Some("Email is required."));
            return;
        }
        error.set(None);
        on_create.call(NewUser::for_caller(
            &email(),
            &first_name(),
            &last_name(),
            &role(),
            caller_is_admin,
        ));
    };

    rsx! {
        div {
            class: "dialog",
            h2 { class: "dialog-title", "Add New User" }

            div {
                class: "field",
                Label { html_for: "new-user-email", "Email" }
                Input {
                    id: "new-user-email",
                    r#type: "email",
                    placeholder: "name@example.com",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }
            }
            div {
                class: "field-row",
                div {
                    class: "field",
                    Label { html_for: "new-user-first", "First name" }
                    Input {
                        id: "new-user-first",
                        r#type: "text",
                        value: first_name(),
                        oninput: move |evt: FormEvent| first_name.set(evt.value()),
                    }
                }
                div {
                    class: "field",
                    Label { html_for: "new-user-last", "Last name" }
                    Input {
                        id: "new-user-last",
                        r#type: "text",
                        value: last_name(),
                        oninput: move |evt: FormEvent| last_name.set(evt.value()),
                    }
                }
            }
            if caller_is_admin {
                div {
                    class: "field",
                    Label { html_for: "new-user-role", "Role" }
                    select {
                        id: "new-user-role",
                        class: "select",
                        value: role(),
                        onchange: move |evt| role.set(evt.value()),
                        for choice in ROLE_CHOICES {
                            option { key: "{choice}", value: "{choice}", "{choice}" }
                        }
                    }
                }
            }
            if let Some(message) = error() {
                p { class: "field-error", "{message}" }
            }

            div {
                class: "dialog-actions",
                Button {
                    variant: ButtonVariant::Primary,
                    disabled: busy,
                    onclick: handle_submit,
                    if busy { "Adding..." } else { "Add User" }
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
