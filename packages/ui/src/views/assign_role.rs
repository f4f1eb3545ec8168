use api::roles::grant_with_probe;
use api::{Action, AdminBackend, Role, RoleGrant};
use dioxus::prelude::*;

use crate::components::{use_toast, Button, ButtonVariant, Input, Label, ToastOptions};
use crate::{log_activity, use_activity_log, use_console, LogLevel};

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

/// Offered when the backend cannot list its roles.
const FALLBACK_ROLES: [(&str, &str, &str); 8] = [
    ("general", "General", "General access to basic features"),
    ("labeling-interface", "Labeling Interface", "Access to labeling tools and interface"),
    ("annotation", "Annotation", "Create and manage annotations"),
    ("model", "Model", "Access to ML models and predictions"),
    ("predictions", "Predictions", "View and manage model predictions"),
    ("cloud-storage", "Cloud Storage", "Access to cloud storage settings"),
    ("webhooks", "Webhooks", "Configure and manage webhooks"),
    ("danger-zone", "Danger Zone", "Critical system settings and operations"),
];

fn fallback_roles() -> Vec<Role> {
    FALLBACK_ROLES
        .into_iter()
        .map(|(name, display_name, description)| Role {
            name: name.to_string(),
            display_name: Some(display_name.to_string()),
            description: Some(description.to_string()),
            ..Role::default()
        })
        .collect()
}

/// Grant roles to an account by email.
#[component]
pub fn AssignRoleView() -> Element {
    let console = use_console();
    let mut activity_log = use_activity_log();

    let mut email = use_signal(String::new);
    let mut selected = use_signal(Vec::<String>::new);
    let toast = use_toast();
    let mut submitting = use_signal(|| false);

    let roles = use_resource(move || async move {
        let client = match console.peek().client() {
            Ok(client) => client,
            Err(_) => return fallback_roles(),
        };
        match client.available_roles().await {
            Ok(roles) if !roles.is_empty() => roles,
            Ok(_) => fallback_roles(),
            Err(error) => {
                tracing::warn!(%error, "available roles unavailable, offering defaults");
                fallback_roles()
            }
        }
    });

    let handle_submit = move |_| {
        let grant = match RoleGrant::new(&email(), &selected()) {
            Ok(grant) => grant,
            Err(message) => {
                toast.error(message, ToastOptions::new());
                return;
            }
        };
        spawn(async move {
            let client = match console.peek().client() {
                Ok(client) => client,
                Err(message) => {
                    toast.error(message, ToastOptions::new());
                    return;
                }
            };
            submitting.set(true);
            let result = grant_with_probe(&client, &grant).await;
            submitting.set(false);
            match result {
                Ok(response) => {
                    let message = response
                        .message
                        .unwrap_or_else(|| format!("Roles assigned to {}.", grant.email));
                    tracing::info!(email = %grant.email, roles = ?grant.selected_roles, "roles granted");
                    log_activity(&mut activity_log, LogLevel::Success, &message);
                    toast.success(message, ToastOptions::new());
                    email.set(String::new());
                    selected.set(Vec::new());
                }
                Err(error) => {
                    tracing::error!(%error, email = %grant.email, "role grant failed");
                    log_activity(
                        &mut activity_log,
                        LogLevel::Error,
                        &format!("Granting roles to {} failed: {error}", grant.email),
                    );
                    toast.error(error.user_message(Action::GrantRoles), ToastOptions::new());
                }
            }
        });
    };

    let available = roles().unwrap_or_default();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "view-page narrow",
            div {
                class: "view-header",
                div {
                    h1 { "Assign Roles" }
                    p { class: "muted", "Grant one or more roles to an existing account." }
                }
            }


            div {
                class: "card",
                div {
                    class: "field",
                    Label { html_for: "grant-email", "Email" }
                    Input {
                        id: "grant-email",
                        r#type: "email",
                        placeholder: "name@example.com",
                        value: email(),
                        oninput: move |evt: FormEvent| email.set(evt.value()),
                    }
                }

                div {
                    class: "field",
                    span { class: "field-label", "Roles" }
                    if roles.read().is_none() {
                        p { class: "muted", "Loading roles..." }
                    }
                    for role in available {
                        label {
                            key: "{role.name}",
                            class: "role-option",
                            input {
                                r#type: "checkbox",
                                checked: selected().contains(&role.name),
                                onchange: {
                                    let name = role.name.clone();
                                    move |evt: FormEvent| {
                                        let mut chosen = selected.write();
                                        chosen.retain(|held| *held != name);
                                        if evt.checked() {
                                            chosen.push(name.clone());
                                        }
                                    }
                                },
                            }
                            span { class: "cell-name", "{role.label()}" }
                            if let Some(description) = role.description.as_deref() {
                                span { class: "muted", " {description}" }
                            }
                        }
                    }
                }

                div {
                    class: "dialog-actions",
                    Button {
                        variant: ButtonVariant::Primary,
                        disabled: submitting(),
                        onclick: handle_submit,
                        if submitting() { "Assigning..." } else { "Assign Roles" }
                    }
                }
            }
        }
    }
}
