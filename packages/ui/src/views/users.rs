//! User directory: the paginated users table, its filters and every row
//! action (target, level, project assignment, delete).

use std::collections::BTreeMap;

use api::assignment::{assignable_projects, AssignmentEditor};
use api::directory::{delete_users, fetch_page, DirectoryFilter, Selection};
use api::roles::{resolve_roles, role_label_of, RoleMap};
use api::{Action, AdminBackend, NewUser, Project, ProjectId, User, UserId};
use dioxus::prelude::*;
use store::{Level, LevelFilter, Overlay, UserStatusFilter};

use crate::components::{use_toast, Button, ButtonVariant, Input, ToastOptions};
use crate::dialogs::{AddUserDialog, AssignProjectsDialog, ConfirmDialog, EditLevelDialog, EditTargetDialog};
use crate::icons::{FaPen, FaPlus, FaTrashCan, FaXmark};
use crate::{
    log_activity, log_save, use_activity_log, use_console, use_session, Icon, LogLevel,
    OverlayStore,
};

use super::ModalOverlay;

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

/// Overlay columns shown in the table.
#[derive(Clone, Debug, Default, PartialEq)]
struct OverlayColumns {
    targets: BTreeMap<UserId, String>,
    levels: BTreeMap<UserId, Level>,
}

impl OverlayColumns {
    async fn read(overlay: &Overlay<OverlayStore>) -> Self {
        Self {
            targets: overlay.targets().await,
            levels: overlay.levels().await,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum UserDialog {
    AddUser,
    ConfirmDelete,
    EditTarget(User),
    EditLevel(User),
    Assign(User),
}

#[derive(Clone, Debug, PartialEq)]
enum RowAction {
    EditTarget(User),
    ClearTarget(UserId),
    EditLevel(User),
    Assign(User),
}

#[component]
pub fn UsersView() -> Element {
    let console = use_console();
    let mut session = use_session();
    let mut activity_log = use_activity_log();

    let mut page = use_signal(|| 1u32);
    let mut reload = use_signal(|| 0u32);
    let mut users = use_signal(Vec::<User>::new);
    let mut count = use_signal(|| 0u64);
    let mut total_pages = use_signal(|| 1u32);
    let mut loading = use_signal(|| true);
    let mut load_error = use_signal(|| Option::<String>::None);
    let mut roles = use_signal(RoleMap::new);
    let mut roles_loading = use_signal(|| false);
    let mut columns = use_signal(OverlayColumns::default);

    let mut search = use_signal(String::new);
    let mut status_filter = use_signal(UserStatusFilter::default);
    let mut level_filter = use_signal(LevelFilter::default);
    let mut selection = use_signal(Selection::new);

    let toast = use_toast();
    let mut dialog = use_signal(|| Option::<UserDialog>::None);
    let mut busy = use_signal(|| false);
    let mut dialog_projects = use_signal(|| Option::<Vec<Project>>::None);
    let mut dialog_initial = use_signal(Vec::<ProjectId>::new);

    // Persisted filters, read once.
    let _filters = use_resource(move || async move {
        let overlay = console.peek().overlay.clone();
        status_filter.set(overlay.user_filter().await);
        level_filter.set(overlay.level_filter().await);
    });

    // Directory page, then overlay columns, then roles one user at a time.
    let _directory = use_resource(move || async move {
        let _ = reload();
        let page = page();
        let console = console.peek().clone();

        loading.set(true);
        load_error.set(None);
        let client = match console.client() {
            Ok(client) => client,
            Err(message) => {
                load_error.set(Some(message));
                loading.set(false);
                return;
            }
        };

        let listing = match fetch_page(&client, page, console.directory_page_size()).await {
            Ok(listing) => listing,
            Err(error) => {
                tracing::error!(%error, page, "failed to load users");
                log_activity(
                    &mut activity_log,
                    LogLevel::Error,
                    &format!("Loading users failed: {error}"),
                );
                load_error.set(Some(error.user_message(Action::FetchUsers)));
                loading.set(false);
                return;
            }
        };

        count.set(listing.count);
        total_pages.set(listing.total_pages);
        {
            let mut session = session.write();
            session.caller_is_admin = listing.caller_is_admin;
            session.page_users = listing.users.clone();
        }
        users.set(listing.users.clone());
        selection.write().clear();
        columns.set(OverlayColumns::read(&console.overlay).await);
        loading.set(false);

        roles_loading.set(true);
        roles.set(resolve_roles(&client, &listing.users).await);
        roles_loading.set(false);
    });

    let refresh_columns = move || {
        spawn(async move {
            let overlay = console.peek().overlay.clone();
            columns.set(OverlayColumns::read(&overlay).await);
        });
    };

    let on_status_change = move |evt: FormEvent| {
        let Some(filter) = UserStatusFilter::from_label(&evt.value()) else {
            return;
        };
        status_filter.set(filter);
        spawn(async move {
            let outcome = console.peek().overlay.set_user_filter(filter).await;
            log_save(&mut activity_log, "User filter", outcome);
        });
    };

    let on_level_change = move |evt: FormEvent| {
        let Some(filter) = LevelFilter::from_label(&evt.value()) else {
            return;
        };
        level_filter.set(filter);
        spawn(async move {
            let outcome = console.peek().overlay.set_level_filter(filter).await;
            log_save(&mut activity_log, "Level filter", outcome);
        });
    };

    let handle_delete = move |_| {
        spawn(async move {
            let console = console.peek().clone();
            let client = match console.client() {
                Ok(client) => client,
                Err(message) => {
                    toast.error(message, ToastOptions::new());
                    return;
                }
            };
            let ids = selection.peek().ids().to_vec();
            busy.set(true);
            let outcome = delete_users(&client, &console.overlay, &ids).await;
            busy.set(false);
            dialog.set(None);

            match outcome.error {
                Some(error) => {
                    log_activity(
                        &mut activity_log,
                        LogLevel::Error,
                        &format!("Deleted {} of {} users, then: {error}", outcome.deleted.len(), ids.len()),
                    );
                    toast.error(error.user_message(Action::DeleteUsers), ToastOptions::new());
                }
                None => {
                    log_activity(
                        &mut activity_log,
                        LogLevel::Success,
                        &format!("Deleted {} user(s)", outcome.deleted.len()),
                    );
                    toast.success(
                        format!("Deleted {} user(s).", outcome.deleted.len()),
                        ToastOptions::new(),
                    );
                }
            }
            if !outcome.deleted.is_empty() {
                reload += 1;
            }
        });
    };

    let handle_add_user = move |new_user: NewUser| {
        spawn(async move {
            let client = match console.peek().client() {
                Ok(client) => client,
                Err(message) => {
                    toast.error(message, ToastOptions::new());
                    return;
                }
            };
            busy.set(true);
            let result = client.create_user(&new_user).await;
            busy.set(false);
            match result {
                Ok(()) => {
                    tracing::info!(email = %new_user.email, role = %new_user.role, "user created");
                    log_activity(
                        &mut activity_log,
                        LogLevel::Success,
                        &format!("Added {} as {}", new_user.email, new_user.role),
                    );
                    toast.success(format!("Added {}.", new_user.email), ToastOptions::new());
                    dialog.set(None);
                    reload += 1;
                }
                Err(error) => {
                    tracing::error!(%error, email = %new_user.email, "create user failed");
                    log_activity(
                        &mut activity_log,
                        LogLevel::Error,
                        &format!("Adding {} failed: {error}", new_user.email),
                    );
                    toast.error(error.user_message(Action::AddUser), ToastOptions::new());
                }
            }
        });
    };

    let save_target = move |(user_id, text): (UserId, String)| {
        spawn(async move {
            let outcome = console.peek().overlay.set_target(user_id, &text).await;
            log_save(&mut activity_log, "Target", outcome);
            dialog.set(None);
            refresh_columns();
        });
    };

    let clear_target = move |user_id: UserId| {
        spawn(async move {
            let outcome = console.peek().overlay.clear_target(user_id).await;
            log_save(&mut activity_log, "Target", outcome);
            dialog.set(None);
            refresh_columns();
        });
    };

    let save_level = move |(user_id, level): (UserId, Level)| {
        spawn(async move {
            let outcome = console.peek().overlay.set_level(user_id, level).await;
            log_save(&mut activity_log, "Level", outcome);
            dialog.set(None);
            refresh_columns();
        });
    };

    let open_assign = move |user: User| {
        spawn(async move {
            let console = console.peek().clone();
            dialog_projects.set(None);
            dialog_initial.set(console.overlay.assigned_projects(user.id).await);
            dialog.set(Some(UserDialog::Assign(user)));

            let client = match console.client() {
                Ok(client) => client,
                Err(message) => {
                    toast.error(message, ToastOptions::new());
                    dialog_projects.set(Some(Vec::new()));
                    return;
                }
            };
            match client.list_projects(console.projects_page_size()).await {
                Ok(projects) => {
                    let (caller, caller_is_admin) = {
                        let session = session.peek();
                        (session.me.as_ref().map(|me| me.id), session.caller_is_admin)
                    };
                    let assignments = console.overlay.assignments().await;
                    dialog_projects.set(Some(assignable_projects(
                        projects,
                        caller,
                        caller_is_admin,
                        &assignments,
                    )));
                }
                Err(error) => {
                    tracing::error!(%error, "failed to load projects");
                    log_activity(
                        &mut activity_log,
                        LogLevel::Error,
                        &format!("Loading projects failed: {error}"),
                    );
                    toast.error(error.user_message(Action::FetchProjects), ToastOptions::new());
                    dialog_projects.set(Some(Vec::new()));
                }
            }
        });
    };

    let handle_assign = move |(user, projects): (User, Vec<ProjectId>)| {
        spawn(async move {
            let console = console.peek().clone();
            let client = match console.client() {
                Ok(client) => client,
                Err(message) => {
                    toast.error(message, ToastOptions::new());
                    return;
                }
            };
            busy.set(true);
            let report = AssignmentEditor::new(&client, &console.overlay)
                .assign(&user, &projects)
                .await;
            busy.set(false);
            dialog.set(None);

            if !report.membership_failures.is_empty() {
                log_activity(
                    &mut activity_log,
                    LogLevel::Warning,
                    &format!(
                        "Membership not created for projects {:?} of {}; they may already exist",
                        report.membership_failures, user.email
                    ),
                );
            }
            log_save(&mut activity_log, "Project assignments", report.overlay);
            if report.overlay.is_persisted() {
                toast.success(
                    format!("Assigned {} project(s) to {}.", projects.len(), user.display_name()),
                    ToastOptions::new(),
                );
            } else {
                toast.error(Action::AssignProjects.failure_message(), ToastOptions::new());
            }
        });
    };

    let on_row_action = move |action: RowAction| match action {
        RowAction::EditTarget(user) => dialog.set(Some(UserDialog::EditTarget(user))),
        RowAction::ClearTarget(user_id) => clear_target(user_id),
        RowAction::EditLevel(user) => dialog.set(Some(UserDialog::EditLevel(user))),
        RowAction::Assign(user) => open_assign(user),
    };

    let filter = DirectoryFilter {
        search: search(),
        status: status_filter(),
        level: level_filter(),
    };
    let all_users = users();
    let cols = columns();
    let visible: Vec<User> = filter
        .apply(&all_users, &cols.levels)
        .into_iter()
        .cloned()
        .collect();
    let visible_ids: Vec<UserId> = visible.iter().map(|user| user.id).collect();
    let all_checked = selection().covers(&visible_ids);
    let selected_count = selection().len();
    let caller_is_admin = session().caller_is_admin;
    let role_map = roles();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "view-page",
            div {
                class: "view-header",
                div {
                    h1 { "Manage Users" }
                    p {
                        class: "muted",
                        "Manage users and map them to the level they work at."
                    }
                }
                div {
                    class: "view-header-actions",
                    if selected_count > 0 {
                        Button {
                            variant: ButtonVariant::Destructive,
                            onclick: move |_| dialog.set(Some(UserDialog::ConfirmDelete)),
                            Icon { icon: FaTrashCan, width: 12, height: 12 }
                            " Delete ({selected_count})"
                        }
                    }
                    Button {
                        variant: ButtonVariant::Primary,
                        onclick: move |_| dialog.set(Some(UserDialog::AddUser)),
                        Icon { icon: FaPlus, width: 12, height: 12 }
                        " Add User"
                    }
                }
            }


            div {
                class: "filter-bar",
                Input {
                    class: "input filter-search",
                    r#type: "search",
                    placeholder: "Search by name or email",
                    value: search(),
                    oninput: move |evt: FormEvent| search.set(evt.value()),
                }
                select {
                    class: "select",
                    value: level_filter().label(),
                    onchange: on_level_change,
                    for choice in LevelFilter::options() {
                        option { key: "{choice.label()}", value: choice.label(), "{choice.label()}" }
                    }
                }
                select {
                    class: "select",
                    value: status_filter().label(),
                    onchange: on_status_change,
                    for choice in UserStatusFilter::ALL {
                        option { key: "{choice.label()}", value: choice.label(), "{choice.label()}" }
                    }
                }
            }

            if loading() {
                div { class: "empty-state", "Loading users..." }
            } else if let Some(message) = load_error() {
                div {
                    class: "error-state",
                    h3 { "Error Loading Users" }
                    p { "{message}" }
                    Button {
                        variant: ButtonVariant::Outline,
                        onclick: move |_| reload += 1,
                        "Retry"
                    }
                }
            } else if visible.is_empty() {
                div {
                    class: "empty-state",
                    if search().trim().is_empty() {
                        "No users available."
                    } else {
                        "No users found matching your search."
                    }
                }
            } else {
                table {
                    class: "data-table",
                    thead {
                        tr {
                            th {
                                input {
                                    r#type: "checkbox",
                                    checked: all_checked,
                                    onchange: {
                                        let ids = visible_ids.clone();
                                        move |_| selection.write().toggle_all(&ids)
                                    },
                                }
                            }
                            th { "ID" }
                            th { "Name" }
                            th { "Role" }
                            th { "Status" }
                            th { "Target" }
                            th { "Level" }
                            th { "Projects" }
                        }
                    }
                    tbody {
                        for user in visible {
                            DirectoryRow {
                                key: "{user.id}",
                                role: role_label_of(&role_map, user.id),
                                roles_loading: roles_loading(),
                                target: cols.targets.get(&user.id).cloned(),
                                level: cols.levels.get(&user.id).copied().unwrap_or_default(),
                                selected: selection().contains(user.id),
                                on_toggle: move |id: UserId| selection.write().toggle(id),
                                on_action: on_row_action,
                                user,
                            }
                        }
                    }
                }

                div {
                    class: "pagination",
                    Button {
                        variant: ButtonVariant::Outline,
                        disabled: page() <= 1,
                        onclick: move |_| page -= 1,
                        "Previous"
                    }
                    span { class: "muted", "Page {page} of {total_pages} ({count} users)" }
                    Button {
                        variant: ButtonVariant::Outline,
                        disabled: page() >= total_pages(),
                        onclick: move |_| page += 1,
                        "Next"
                    }
                }
            }
        }

        match dialog() {
            None => rsx! {},
            Some(UserDialog::AddUser) => rsx! {
                ModalOverlay {
                    on_close: move |_| dialog.set(None),
                    AddUserDialog {
                        caller_is_admin,
                        busy: busy(),
                        on_create: handle_add_user,
                        on_cancel: move |_| dialog.set(None),
                    }
                }
            },
            Some(UserDialog::ConfirmDelete) => rsx! {
                ModalOverlay {
                    on_close: move |_| dialog.set(None),
                    ConfirmDialog {
                        title: "Delete users",
                        message: format!("Delete {selected_count} user(s)? This cannot be undone."),
                        confirm_label: "Delete",
                        destructive: true,
                        busy: busy(),
                        on_confirm: handle_delete,
                        on_cancel: move |_| dialog.set(None),
                    }
                }
            },
            Some(UserDialog::EditTarget(user)) => rsx! {
                ModalOverlay {
                    on_close: move |_| dialog.set(None),
                    EditTargetDialog {
                        current: cols.targets.get(&user.id).cloned(),
                        on_save: {
                            let id = user.id;
                            move |text: String| save_target((id, text))
                        },
                        on_clear: {
                            let id = user.id;
                            move |_| clear_target(id)
                        },
                        on_cancel: move |_| dialog.set(None),
                        user,
                    }
                }
            },
            Some(UserDialog::EditLevel(user)) => rsx! {
                ModalOverlay {
                    on_close: move |_| dialog.set(None),
                    EditLevelDialog {
                        current: cols.levels.get(&user.id).copied().unwrap_or_default(),
                        on_save: {
                            let id = user.id;
                            move |level: Level| save_level((id, level))
                        },
                        on_cancel: move |_| dialog.set(None),
                        user,
                    }
                }
            },
            Some(UserDialog::Assign(user)) => rsx! {
                ModalOverlay {
                    on_close: move |_| dialog.set(None),
                    wide: true,
                    AssignProjectsDialog {
                        projects: dialog_projects(),
                        initial: dialog_initial(),
                        busy: busy(),
                        on_assign: {
                            let user = user.clone();
                            move |projects: Vec<ProjectId>| handle_assign((user.clone(), projects))
                        },
                        on_cancel: move |_| dialog.set(None),
                        user,
                    }
                }
            },
        }
    }
}

#[component]
fn DirectoryRow(
    user: User,
    role: String,
    roles_loading: bool,
    target: Option<String>,
    level: Level,
    selected: bool,
    on_toggle: EventHandler<UserId>,
    on_action: EventHandler<RowAction>,
) -> Element {
    let id = user.id;
    let has_target = target.is_some();
    let target_text = target.unwrap_or_else(|| "-".to_string());

    rsx! {
        tr {
            class: if selected { "selected" } else { "" },
            td {
                input {
                    r#type: "checkbox",
                    checked: selected,
                    onchange: move |_| on_toggle.call(id),
                }
            }
            td { class: "cell-id", "{id}" }
            td {
                div { class: "cell-name", "{user.display_name()}" }
                div { class: "muted", "{user.email}" }
            }
            td {
                if roles_loading {
                    span { class: "muted", "Loading..." }
                } else {
                    span { class: "role-badge", "{role}" }
                }
            }
            td {
                span {
                    class: if user.is_active { "status-badge active" } else { "status-badge inactive" },
                    if user.is_active { "Active" } else { "Inactive" }
                }
            }
            td {
                span { class: "cell-target", "{target_text}" }
                button {
                    class: "icon-button",
                    title: "Edit target",
                    onclick: {
                        let user = user.clone();
                        move |_| on_action.call(RowAction::EditTarget(user.clone()))
                    },
                    Icon { icon: FaPen, width: 11, height: 11 }
                }
                if has_target {
                    button {
                        class: "icon-button danger",
                        title: "Delete target",
                        onclick: move |_| on_action.call(RowAction::ClearTarget(id)),
                        Icon { icon: FaXmark, width: 11, height: 11 }
                    }
                }
            }
            td {
                span { "{level}" }
                button {
                    class: "icon-button",
                    title: "Edit level",
                    onclick: {
                        let user = user.clone();
                        move |_| on_action.call(RowAction::EditLevel(user.clone()))
                    },
                    Icon { icon: FaPen, width: 11, height: 11 }
                }
            }
            td {
                Button {
                    variant: ButtonVariant::Ghost,
                    onclick: {
                        let user = user.clone();
                        move |_| on_action.call(RowAction::Assign(user.clone()))
                    },
                    "Assign"
                }
            }
        }
    }
}
