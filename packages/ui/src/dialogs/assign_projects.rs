use api::assignment::toggle;
use api::{Project, ProjectId, User};
use dioxus::prelude::*;

use crate::components::{Button, ButtonVariant};

/// Project picker for one user. `projects` is `None` while the list is
/// still loading.
#[component]
pub fn AssignProjectsDialog(
    user: User,
    projects: Option<Vec<Project>>,
    initial: Vec<ProjectId>,
    #[props(default)] busy: bool,
    on_assign: EventHandler<Vec<ProjectId>>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut selected = use_signal(move || initial);
    let nothing_selected = selected().is_empty();

    rsx! {
        div {
            class: "dialog",
            h2 { class: "dialog-title", "Assign Projects" }
            p { class: "dialog-subtitle", "{user.display_name()} ({user.email})" }

            div {
                class: "project-picker",
                match projects {
                    None => rsx! { p { class: "muted", "Loading projects..." } },
                    Some(list) if list.is_empty() => rsx! {
                        p { class: "muted", "No projects available to assign." }
                    },
                    Some(list) => rsx! {
                        for project in list {
                            label {
                                key: "{project.id}",
                                class: "project-option",
                                input {
                                    r#type: "checkbox",
                                    checked: selected().contains(&project.id),
                                    onchange: move |_| toggle(&mut selected.write(), project.id),
                                }
                                span { class: "project-option-title", "{project.label()}" }
                                if let Some(description) = project.description.as_deref().filter(|d| !d.trim().is_empty()) {
                                    span { class: "muted", " {description}" }
                                }
                            }
                        }
                    },
                }
            }

            p { class: "muted", "{selected().len()} selected" }

            div {
                class: "dialog-actions",
                Button {
                    variant: ButtonVariant::Primary,
                    disabled: busy || nothing_selected,
                    onclick: move |_| on_assign.call(selected()),
                    if busy { "Assigning..." } else { "Assign" }
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
