//! # Reports
//!
//! Only the project status tab is computed from live data, and even there the
//! completion split is a placeholder (70% complete). Every other tab is fed
//! by fixtures or seeded pseudo-random values until the backend grows report
//! endpoints.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::models::{Membership, Project};

/// Top-level report tabs, in display order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportTab {
    #[default]
    ProjectStatus,
    UsersStatus,
    UsersTarget,
    BillingReport,
    TenantReport,
    MonthlyProductivity,
    CumulativeProductivity,
}

impl ReportTab {
    pub const ALL: [ReportTab; 7] = [
        ReportTab::ProjectStatus,
        ReportTab::UsersStatus,
        ReportTab::UsersTarget,
        ReportTab::BillingReport,
        ReportTab::TenantReport,
        ReportTab::MonthlyProductivity,
        ReportTab::CumulativeProductivity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReportTab::ProjectStatus => "Project Status",
            ReportTab::UsersStatus => "Users Status",
            ReportTab::UsersTarget => "Users Target",
            ReportTab::BillingReport => "Billing Report",
            ReportTab::TenantReport => "Tenant Report",
            ReportTab::MonthlyProductivity => "Monthly Productivity",
            ReportTab::CumulativeProductivity => "Cumulative Productivity",
        }
    }

    /// Second-level tabs shown under some reports.
    pub fn sub_tabs(self) -> &'static [&'static str] {
        match self {
            ReportTab::UsersStatus => &["Submitted Tasks", "Daywise Report", "Other Tasks"],
            ReportTab::UsersTarget => &["User Targets", "Transactions"],
            _ => &[],
        }
    }
}

/// Active / Archived switch on the project status tab.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProjectTab {
    #[default]
    Active,
    Archived,
}

impl ProjectTab {
    pub fn label(self) -> &'static str {
        match self {
            ProjectTab::Active => "Active",
            ProjectTab::Archived => "Archived",
        }
    }

    fn admits(self, project: &Project) -> bool {
        match self {
            ProjectTab::Active => !project.is_archived,
            ProjectTab::Archived => project.is_archived,
        }
    }
}

/// Projects matching `search` (case-insensitive, title or description) on
/// the given tab.
pub fn filter_projects<'p>(projects: &'p [Project], search: &str, tab: ProjectTab) -> Vec<&'p Project> {
    let term = search.trim().to_lowercase();
    projects
        .iter()
        .filter(|project| tab.admits(project))
        .filter(|project| {
            term.is_empty()
                || project.title.to_lowercase().contains(&term)
                || project
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&term))
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProjectStats {
    pub total: u64,
    pub pending: u64,
    pub complete: u64,
    pub active: u64,
    pub complete_percentage: u64,
    pub users: usize,
    pub batches: usize,
}

pub fn project_stats(project: &Project) -> ProjectStats {
    let total = project.task_count.unwrap_or(0);
    let complete = total * 7 / 10;
    let complete_percentage = if total > 0 {
        (complete as f64 / total as f64 * 100.0).round() as u64
    } else {
        0
    };
    ProjectStats {
        total,
        pending: total - complete,
        complete,
        active: 0,
        complete_percentage,
        users: project.members.len(),
        batches: project.batches.len().max(1),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserTargetRow {
    pub id: i64,
    pub username: String,
    pub achieved_transactions: u32,
    pub transaction_target: u32,
    pub aht_target: u32,
}

/// Placeholder target rows, one per membership. Values are pseudo-random but
/// seeded by the membership id, so a row reads the same on every render.
pub fn user_target_rows(memberships: &[Membership]) -> Vec<UserTargetRow> {
    memberships
        .iter()
        .enumerate()
        .map(|(index, membership)| {
            let mut rng = SmallRng::seed_from_u64(membership.id as u64);
            let username = membership
                .user
                .as_ref()
                .and_then(|user| user.username.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("User{}", index + 1));
            UserTargetRow {
                id: membership.id,
                username,
                achieved_transactions: rng.gen_range(0..100),
                transaction_target: rng.gen_range(100..1100),
                aht_target: rng.gen_range(50..250),
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillingRow {
    pub id: i64,
    pub org_name: &'static str,
    pub total_transactions: u64,
    pub total_datasets: u64,
    pub total_time_taken: &'static str,
    pub total_users: u64,
}

pub fn billing_report() -> Vec<BillingRow> {
    vec![BillingRow {
        id: 1,
        org_name: "Org Billing Report",
        total_transactions: 1,
        total_datasets: 1,
        total_time_taken: "00:01:58",
        total_users: 1,
    }]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TenantRow {
    pub id: i64,
    pub project_name: &'static str,
    pub level: u8,
    pub users: u64,
    pub active_users: u64,
    pub completed_tasks: u64,
    pub total_time_taken: &'static str,
    pub avg_time_per_task: &'static str,
    pub utilization: u64,
}

pub fn tenant_report() -> Vec<TenantRow> {
    let row = |id, project_name| TenantRow {
        id,
        project_name,
        level: 2,
        users: 1,
        active_users: 1,
        completed_tasks: 1,
        total_time_taken: "00:07:29",
        avg_time_per_task: "00:07:29",
        utilization: 1,
    };
    vec![row(1, "USA 434:ICD: Labelling"), row(2, "TOTAL")]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayRow {
    pub date: &'static str,
    pub tasks: u64,
    pub completed: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductivityRow {
    pub id: i64,
    pub project_name: &'static str,
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub productivity: u8,
    pub utilization: u8,
    /// Present only for cumulative reports requested day-wise.
    pub daywise: Option<Vec<DayRow>>,
}

pub fn monthly_productivity() -> Vec<ProductivityRow> {
    vec![
        ProductivityRow {
            id: 1,
            project_name: "1210 - affinity",
            total_tasks: 150,
            completed_tasks: 120,
            productivity: 80,
            utilization: 75,
            daywise: None,
        },
        ProductivityRow {
            id: 2,
            project_name: "3901 - Fruit and Food Annotation",
            total_tasks: 200,
            completed_tasks: 180,
            productivity: 90,
            utilization: 85,
            daywise: None,
        },
    ]
}

pub fn cumulative_productivity(daywise: bool) -> Vec<ProductivityRow> {
    let days = |rows: [(&'static str, u64, u64); 3]| {
        daywise.then(|| {
            rows.into_iter()
                .map(|(date, tasks, completed)| DayRow {
                    date,
                    tasks,
                    completed,
                })
                .collect::<Vec<_>>()
        })
    };
    vec![
        ProductivityRow {
            id: 1,
            project_name: "USA 434:ICD: Labelling",
            total_tasks: 500,
            completed_tasks: 450,
            productivity: 90,
            utilization: 85,
            daywise: days([
                ("2025-09-01", 50, 45),
                ("2025-09-02", 60, 55),
                ("2025-09-03", 70, 65),
            ]),
        },
        ProductivityRow {
            id: 2,
            project_name: "ROW 441 Timestamping",
            total_tasks: 300,
            completed_tasks: 280,
            productivity: 93,
            utilization: 88,
            daywise: days([
                ("2025-09-01", 30, 28),
                ("2025-09-02", 35, 33),
                ("2025-09-03", 40, 38),
            ]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MembershipUser;
    use serde_json::json;

    fn project(id: i64, title: &str, archived: bool, tasks: Option<u64>) -> Project {
        Project {
            id,
            title: title.to_string(),
            is_archived: archived,
            task_count: tasks,
            ..Project::default()
        }
    }

    #[test]
    fn test_project_stats() {
        let mut p = project(1, "a", false, Some(15));
        p.members = vec![json!({"id": 1}), json!({"id": 2})];
        let stats = project_stats(&p);
        assert_eq!(stats.total, 15);
        assert_eq!(stats.complete, 10);
        assert_eq!(stats.pending, 5);
        assert_eq!(stats.active, 0);
        assert_eq!(stats.complete_percentage, 67);
        assert_eq!(stats.users, 2);
        assert_eq!(stats.batches, 1);

        let empty = project_stats(&project(2, "b", false, None));
        assert_eq!(empty.total, 0);
        assert_eq!(empty.complete_percentage, 0);
    }

    #[test]
    fn test_filter_projects_by_tab_and_search() {
        let mut described = project(3, "Gamma", false, None);
        described.description = Some("Fruit ANNOTATION".to_string());
        let projects = vec![
            project(1, "Alpha", false, None),
            project(2, "Beta", true, None),
            described,
        ];

        assert_eq!(filter_projects(&projects, "", ProjectTab::Active).len(), 2);
        assert_eq!(filter_projects(&projects, "", ProjectTab::Archived)[0].id, 2);
        assert_eq!(filter_projects(&projects, "annot", ProjectTab::Active)[0].id, 3);
        assert!(filter_projects(&projects, "beta", ProjectTab::Active).is_empty());
    }

    #[test]
    fn test_user_target_rows_are_stable_and_in_range() {
        let memberships = vec![
            Membership {
                id: 11,
                user: Some(MembershipUser {
                    username: Some("ann".to_string()),
                    ..MembershipUser::default()
                }),
                project: None,
            },
            Membership {
                id: 12,
                ..Membership::default()
            },
        ];
        let rows = user_target_rows(&memberships);
        assert_eq!(rows, user_target_rows(&memberships));
        assert_eq!(rows[0].username, "ann");
        assert_eq!(rows[1].username, "User2");
        for row in &rows {
            assert!(row.achieved_transactions < 100);
            assert!((100..1100).contains(&row.transaction_target));
            assert!((50..250).contains(&row.aht_target));
        }
    }

    #[test]
    fn test_cumulative_daywise_toggle() {
        assert!(cumulative_productivity(false).iter().all(|r| r.daywise.is_none()));
        let rows = cumulative_productivity(true);
        assert_eq!(rows[1].daywise.as_ref().map(Vec::len), Some(3));
        assert_eq!(monthly_productivity().len(), 2);
        assert_eq!(tenant_report()[1].project_name, "TOTAL");
        assert_eq!(billing_report()[0].total_time_taken, "00:01:58");
    }

    #[test]
    fn test_sub_tabs() {
        assert_eq!(ReportTab::UsersTarget.sub_tabs(), &["User Targets", "Transactions"]);
        assert!(ReportTab::BillingReport.sub_tabs().is_empty());
        assert_eq!(ReportTab::ALL.len(), 7);
    }
}
