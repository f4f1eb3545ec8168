//! Reporting tabs. Project status and users target read live data; the
//! rest render fixtures from [`api::reports`].

use api::reports::{
    billing_report, cumulative_productivity, filter_projects, monthly_productivity, project_stats,
    tenant_report, user_target_rows, ProjectTab, ReportTab, UserTargetRow,
};
use api::{Action, AdminBackend, Project};
use dioxus::prelude::*;

use crate::components::{Button, ButtonVariant, Input};
use crate::{log_activity, use_activity_log, use_console, LogLevel};

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

#[component]
pub fn ReportsView() -> Element {
    let mut tab = use_signal(ReportTab::default);
    let mut sub_tab = use_signal(|| 0usize);

    let current = tab();
    let sub_tabs = current.sub_tabs();
    let sub_name = sub_tabs.get(sub_tab()).copied().unwrap_or_default();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "view-page",
            div {
                class: "view-header",
                h1 { "Reports" }
            }
            div {
                class: "tab-bar",
                for candidate in ReportTab::ALL {
                    button {
                        key: "{candidate.label()}",
                        class: if candidate == current { "tab active" } else { "tab" },
                        onclick: move |_| {
                            tab.set(candidate);
                            sub_tab.set(0);
                        },
                        "{candidate.label()}"
                    }
                }
            }
            if !sub_tabs.is_empty() {
                div {
                    class: "tab-bar sub",
                    for (index, name) in sub_tabs.iter().enumerate() {
                        button {
                            key: "{name}",
                            class: if index == sub_tab() { "tab active" } else { "tab" },
                            onclick: move |_| sub_tab.set(index),
                            "{name}"
                        }
                    }
                }
            }

            match current {
                ReportTab::ProjectStatus => rsx! { ProjectStatusReport {} },
                ReportTab::UsersStatus => rsx! {
                    div {
                        class: "empty-state",
                        "No {sub_name} data yet."
                    }
                },
                ReportTab::UsersTarget => rsx! { UsersTargetReport { transactions: sub_tab() == 1 } },
                ReportTab::BillingReport => rsx! { BillingReport {} },
                ReportTab::TenantReport => rsx! { TenantReport {} },
                ReportTab::MonthlyProductivity => rsx! { MonthlyProductivityReport {} },
                ReportTab::CumulativeProductivity => rsx! { CumulativeProductivityReport {} },
            }
        }
    }
}

#[component]
fn ProjectStatusReport() -> Element {
    let console = use_console();
    let mut activity_log = use_activity_log();
    let mut search = use_signal(String::new);
    let mut project_tab = use_signal(ProjectTab::default);
    let mut reload = use_signal(|| 0u32);

    let projects = use_resource(move || async move {
        let _ = reload();
        let console = console.peek().clone();
        let client = console.client()?;
        client
            .list_projects(console.projects_page_size())
            .await
            .map_err(|error| {
                tracing::error!(%error, "failed to load projects for reporting");
                log_activity(
                    &mut activity_log,
                    LogLevel::Error,
                    &format!("Loading projects failed: {error}"),
                );
                error.user_message(Action::FetchProjects)
            })
    });

    let body = match &*projects.read() {
        None => rsx! { div { class: "empty-state", "Loading projects..." } },
        Some(Err(message)) => rsx! {
            div {
                class: "error-state",
                p { "{message}" }
                Button {
                    variant: ButtonVariant::Outline,
                    onclick: move |_| reload += 1,
                    "Retry"
                }
            }
        },
        Some(Ok(list)) => project_table(filter_projects(list, &search(), project_tab())),
    };

    rsx! {
        div {
            class: "filter-bar",
            Input {
                class: "input filter-search",
                r#type: "search",
                placeholder: "Search projects",
                value: search(),
                oninput: move |evt: FormEvent| search.set(evt.value()),
            }
            for candidate in [ProjectTab::Active, ProjectTab::Archived] {
                button {
                    key: "{candidate.label()}",
                    class: if candidate == project_tab() { "tab active" } else { "tab" },
                    onclick: move |_| project_tab.set(candidate),
                    "{candidate.label()}"
                }
            }
        }
        {body}
    }
}

fn project_table(projects: Vec<&Project>) -> Element {
    if projects.is_empty() {
        return rsx! { div { class: "empty-state", "No projects found." } };
    }
    rsx! {
        table {
            class: "data-table",
            thead {
                tr {
                    th { "Project" }
                    th { "Total" }
                    th { "Pending" }
                    th { "Active" }
                    th { "Complete" }
                    th { "Complete %" }
                    th { "Users" }
                    th { "Batches" }
                }
            }
            tbody {
                for project in projects {
                    {
                        let stats = project_stats(project);
                        rsx! {
                            tr {
                                key: "{project.id}",
                                td { "{project.label()}" }
                                td { "{stats.total}" }
                                td { "{stats.pending}" }
                                td { "{stats.active}" }
                                td { "{stats.complete}" }
                                td {
                                    div {
                                        class: "progress",
                                        div {
                                            class: "progress-fill",
                                            style: "width: {stats.complete_percentage}%",
                                        }
                                    }
                                    span { class: "muted", "{stats.complete_percentage}%" }
                                }
                                td { "{stats.users}" }
                                td { "{stats.batches}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn UsersTargetReport(transactions: bool) -> Element {
    let console = use_console();
    let mut activity_log = use_activity_log();

    let rows = use_resource(move || async move {
        let client = console.peek().client()?;
        match client.list_memberships().await {
            Ok(memberships) => Ok(user_target_rows(&memberships)),
            Err(error) => {
                tracing::error!(%error, "failed to load project members");
                log_activity(
                    &mut activity_log,
                    LogLevel::Error,
                    &format!("Loading project members failed: {error}"),
                );
                Err(error.user_message(Action::FetchUsers))
            }
        }
    });

    let body = match &*rows.read() {
        None => rsx! { div { class: "empty-state", "Loading users..." } },
        Some(Err(message)) => rsx! { div { class: "error-state", "{message}" } },
        Some(Ok(rows)) if rows.is_empty() => rsx! { div { class: "empty-state", "No project members yet." } },
        Some(Ok(rows)) => target_table(rows, transactions),
    };
    body
}

fn target_table(rows: &[UserTargetRow], transactions: bool) -> Element {
    rsx! {
        table {
            class: "data-table",
            thead {
                tr {
                    th { "User" }
                    th { "Achieved Transactions" }
                    if !transactions {
                        th { "Transaction Target" }
                        th { "AHT Target (s)" }
                    }
                }
            }
            tbody {
                for row in rows {
                    tr {
                        key: "{row.id}",
                        td { "{row.username}" }
                        td { "{row.achieved_transactions}" }
                        if !transactions {
                            td { "{row.transaction_target}" }
                            td { "{row.aht_target}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn BillingReport() -> Element {
    rsx! {
        table {
            class: "data-table",
            thead {
                tr {
                    th { "Organization" }
                    th { "Transactions" }
                    th { "Datasets" }
                    th { "Time Taken" }
                    th { "Users" }
                }
            }
            tbody {
                for row in billing_report() {
                    tr {
                        key: "{row.id}",
                        td { "{row.org_name}" }
                        td { "{row.total_transactions}" }
                        td { "{row.total_datasets}" }
                        td { "{row.total_time_taken}" }
                        td { "{row.total_users}" }
                    }
                }
            }
        }
    }
}

#[component]
fn TenantReport() -> Element {
    rsx! {
        table {
            class: "data-table",
            thead {
                tr {
                    th { "Project" }
                    th { "Level" }
                    th { "Users" }
                    th { "Active Users" }
                    th { "Completed Tasks" }
                    th { "Time Taken" }
                    th { "Avg / Task" }
                    th { "Utilization" }
                }
            }
            tbody {
                for row in tenant_report() {
                    tr {
                        key: "{row.id}",
                        td { "{row.project_name}" }
                        td { "Level {row.level}" }
                        td { "{row.users}" }
                        td { "{row.active_users}" }
                        td { "{row.completed_tasks}" }
                        td { "{row.total_time_taken}" }
                        td { "{row.avg_time_per_task}" }
                        td { "{row.utilization}%" }
                    }
                }
            }
        }
    }
}

#[component]
fn MonthlyProductivityReport() -> Element {
    rsx! {
        table {
            class: "data-table",
            thead {
                tr {
                    th { "Project" }
                    th { "Total Tasks" }
                    th { "Completed" }
                    th { "Productivity" }
                    th { "Utilization" }
                }
            }
            tbody {
                for row in monthly_productivity() {
                    tr {
                        key: "{row.id}",
                        td { "{row.project_name}" }
                        td { "{row.total_tasks}" }
                        td { "{row.completed_tasks}" }
                        td { "{row.productivity}%" }
                        td { "{row.utilization}%" }
                    }
                }
            }
        }
    }
}

#[component]
fn CumulativeProductivityReport() -> Element {
    let mut daywise = use_signal(|| false);

    rsx! {
        label {
            class: "checkbox-label",
            input {
                r#type: "checkbox",
                checked: daywise(),
                onchange: move |evt: FormEvent| daywise.set(evt.checked()),
            }
            " Day-wise breakdown"
        }
        table {
            class: "data-table",
            thead {
                tr {
                    th { "Project" }
                    th { "Total Tasks" }
                    th { "Completed" }
                    th { "Productivity" }
                    th { "Utilization" }
                }
            }
            tbody {
                for row in cumulative_productivity(daywise()) {
                    tr {
                        key: "{row.id}",
                        td { "{row.project_name}" }
                        td { "{row.total_tasks}" }
                        td { "{row.completed_tasks}" }
                        td { "{row.productivity}%" }
                        td { "{row.utilization}%" }
                    }
                    for day in row.daywise.unwrap_or_default() {
                        tr {
                            key: "{row.id}-{day.date}",
                            class: "sub-row",
                            td { "{day.date}" }
                            td { "{day.tasks}" }
                            td { "{day.completed}" }
                            td { colspan: 2 }
                        }
                    }
                }
            }
        }
    }
}
