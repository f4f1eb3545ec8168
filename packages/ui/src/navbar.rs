use dioxus::prelude::*;

use crate::activity_log_panel::ActivityLogToggle;
use crate::icons::{FaChartBar, FaListCheck, FaUserShield, FaUsers};
use crate::Icon;

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

/// Top-level sections of the console.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavTab {
    Users,
    AssignedTasks,
    Reports,
    Roles,
}

impl NavTab {
    pub const ALL: [NavTab; 4] = [
        NavTab::Users,
        NavTab::AssignedTasks,
        NavTab::Reports,
        NavTab::Roles,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NavTab::Users => "Manage Users",
            NavTab::AssignedTasks => "Assigned Tasks",
            NavTab::Reports => "Reports",
            NavTab::Roles => "Assign Roles",
        }
    }
}

#[component]
pub fn Navbar(active: NavTab, on_navigate: EventHandler<NavTab>) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        nav {
            class: "navbar",
            span { class: "navbar-title", "Admin Console" }
            div {
                class: "navbar-tabs",
                for tab in NavTab::ALL {
                    button {
                        key: "{tab.label()}",
                        class: if tab == active { "navbar-tab active" } else { "navbar-tab" },
                        onclick: move |_| on_navigate.call(tab),
                        match tab {
                            NavTab::Users => rsx! { Icon { icon: FaUsers, width: 14, height: 14 } },
                            NavTab::AssignedTasks => rsx! { Icon { icon: FaListCheck, width: 14, height: 14 } },
                            NavTab::Reports => rsx! { Icon { icon: FaChartBar, width: 14, height: 14 } },
                            NavTab::Roles => rsx! { Icon { icon: FaUserShield, width: 14, height: 14 } },
                        }
                        span { "{tab.label()}" }
                    }
                }
            }
            ActivityLogToggle {}
        }
    }
}
