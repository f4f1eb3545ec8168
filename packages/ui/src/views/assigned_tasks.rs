use api::assignment::{assignment_groups, resolve_projects, AssignmentEditor, AssignmentGroup, AssignmentReport};
use api::{Action, AdminBackend, Project, ProjectId, UserId};
use dioxus::prelude::*;

use crate::components::{use_toast, Button, ButtonVariant, ToastOptions};
use crate::dialogs::ConfirmDialog;
use crate::icons::FaXmark;
use crate::{log_activity, log_save, use_activity_log, use_console, use_session, Icon, LogLevel};

use super::ModalOverlay;

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

#[derive(Clone, Debug, PartialEq)]
enum PendingUnassign {
    One { user: UserId, name: String, project: ProjectId, title: String },
    All { user: UserId, name: String },
}

/// Project assignments recorded in the overlay, grouped per user, with the
/// caller's own assignments on top.
#[component]
pub fn AssignedTasksView() -> Element {
    let console = use_console();
    let session = use_session();
    let mut activity_log = use_activity_log();

    let mut projects = use_signal(Vec::<Project>::new);
    let mut groups = use_signal(Vec::<AssignmentGroup>::new);
    let mut own = use_signal(Vec::<ProjectId>::new);
    let mut loading = use_signal(|| true);
    let mut reload = use_signal(|| 0u32);
    let toast = use_toast();
    let mut pending = use_signal(|| Option::<PendingUnassign>::None);
    let mut busy = use_signal(|| false);

    let _loader = use_resource(move || async move {
        let _ = reload();
        let session = session();
        let console = console.peek().clone();
        loading.set(true);

        let records = console.overlay.records().await;
        groups.set(assignment_groups(
            &records,
            &session.page_users,
            session.me.as_ref(),
            session.caller_is_admin,
        ));
        own.set(match session.me.as_ref() {
            Some(me) => console.overlay.assigned_projects(me.id).await,
            None => Vec::new(),
        });

        match console.client() {
            Ok(client) => match client.list_projects(console.projects_page_size()).await {
                Ok(list) => projects.set(list),
                Err(error) => {
                    tracing::error!(%error, "failed to load projects");
                    log_activity(
                        &mut activity_log,
                        LogLevel::Error,
                        &format!("Loading projects failed: {error}"),
                    );
                    toast.error(error.user_message(Action::FetchProjects), ToastOptions::new());
                }
            },
            Err(message) => toast.error(message, ToastOptions::new()),
        }
        loading.set(false);
    });

    let handle_confirm = move |_| {
        let Some(request) = pending() else {
            return;
        };
        spawn(async move {
            let console = console.peek().clone();
            let client = match console.client() {
                Ok(client) => client,
                Err(message) => {
                    toast.error(message, ToastOptions::new());
                    pending.set(None);
                    return;
                }
            };
            let editor = AssignmentEditor::new(&client, &console.overlay);
            busy.set(true);
            let (report, action, done) = match &request {
                PendingUnassign::One { user, name, project, title } => (
                    editor.unassign(*user, *project).await,
                    Action::UnassignProject,
                    format!("Unassigned {title} from {name}."),
                ),
                PendingUnassign::All { user, name } => (
                    editor.unassign_all(*user).await,
                    Action::UnassignAll,
                    format!("Unassigned all projects from {name}."),
                ),
            };
            busy.set(false);
            pending.set(None);
            match report_unassign(&mut activity_log, &report, action, done) {
                Ok(message) => toast.success(message, ToastOptions::new()),
                Err(message) => toast.error(message, ToastOptions::new()),
            }
            reload += 1;
        });
    };

    let project_list = projects();
    let own_projects = resolve_projects(&project_list, &own());
    let group_list = groups();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "view-page",
            div {
                class: "view-header",
                div {
                    h1 { "Assigned Tasks" }
                    p { class: "muted", "Projects handed out from this console, per user." }
                }
                Button {
                    variant: ButtonVariant::Outline,
                    onclick: move |_| reload += 1,
                    "Refresh"
                }
            }


            if !own_projects.is_empty() {
                section {
                    class: "card",
                    h3 { "Assigned to you" }
                    ul {
                        class: "project-list",
                        for project in own_projects {
                            li { key: "{project.id}", "{project.label()}" }
                        }
                    }
                }
            }

            if loading() || session().loading {
                div { class: "empty-state", "Loading assignments..." }
            } else if group_list.is_empty() {
                div { class: "empty-state", "No project assignments yet." }
            } else {
                for group in group_list {
                    section {
                        key: "{group.user_id}",
                        class: "card",
                        div {
                            class: "card-header",
                            div {
                                div { class: "cell-name", "{group.info.display_name()}" }
                                div { class: "muted", "{group.info.email}" }
                            }
                            Button {
                                variant: ButtonVariant::Destructive,
                                title: "Unassign all projects from this user",
                                onclick: {
                                    let (user, name) = (group.user_id, group.info.display_name());
                                    move |_| pending.set(Some(PendingUnassign::All { user, name: name.clone() }))
                                },
                                "Unassign All"
                            }
                        }
                        ul {
                            class: "project-list",
                            for project in resolve_projects(&project_list, &group.projects) {
                                li {
                                    key: "{project.id}",
                                    span { "{project.label()}" }
                                    span { class: "status-badge active", "Assigned" }
                                    button {
                                        class: "icon-button danger",
                                        title: "Unassign this project",
                                        onclick: {
                                            let request = PendingUnassign::One {
                                                user: group.user_id,
                                                name: group.info.display_name(),
                                                project: project.id,
                                                title: project.label(),
                                            };
                                            move |_| pending.set(Some(request.clone()))
                                        },
                                        Icon { icon: FaXmark, width: 11, height: 11 }
                                    }
                                }
                            }
                        }
                        if group.projects.len() > resolve_projects(&project_list, &group.projects).len() {
                            p {
                                class: "muted",
                                "Some assigned projects are no longer on the server."
                            }
                        }
                    }
                }
            }
        }

        if let Some(request) = pending() {
            ModalOverlay {
                on_close: move |_| pending.set(None),
                ConfirmDialog {
                    title: "Unassign projects",
                    message: match request {
                        PendingUnassign::One { name, title, .. } => format!("Unassign {title} from {name}?"),
                        PendingUnassign::All { name, .. } => format!("Unassign all projects from {name}?"),
                    },
                    confirm_label: "Unassign",
                    destructive: true,
                    busy: busy(),
                    on_confirm: handle_confirm,
                    on_cancel: move |_| pending.set(None),
                }
            }
        }
    }
}

/// Logs the outcome of an unassign and returns the message to toast.
fn report_unassign(
    activity_log: &mut Signal<crate::ActivityLog>,
    report: &AssignmentReport,
    action: Action,
    done: String,
) -> Result<String, String> {
    if !report.membership_failures.is_empty() {
        log_activity(
            activity_log,
            LogLevel::Warning,
            &format!(
                "Membership not removed for projects {:?}; it may not have existed",
                report.membership_failures
            ),
        );
    }
    log_save(activity_log, "Project assignments", report.overlay);
    if report.overlay.is_persisted() {
        log_activity(activity_log, LogLevel::Success, &done);
        Ok(done)
    } else {
        Err(action.failure_message())
    }
}
