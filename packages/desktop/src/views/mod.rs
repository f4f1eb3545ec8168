use dioxus::prelude::*;
use ui::NavTab;

use crate::Route;

impl Route {
    fn tab(&self) -> NavTab {
        match self {
            Route::Root {} | Route::Users {} => NavTab::Users,
            Route::AssignedTasks {} => NavTab::AssignedTasks,
            Route::Reports {} => NavTab::Reports,
            Route::AssignRole {} => NavTab::Roles,
        }
    }

    fn for_tab(tab: NavTab) -> Self {
        match tab {
            NavTab::Users => Route::Users {},
            NavTab::AssignedTasks => Route::AssignedTasks {},
            NavTab::Reports => Route::Reports {},
            NavTab::Roles => Route::AssignRole {},
        }
    }
}

#[component]
pub fn ConsoleLayout() -> Element {
    let nav = use_navigator();
    let route = use_route::<Route>();

    rsx! {
        ui::views::ConsoleLayoutView {
            active: route.tab(),
            on_navigate: move |tab: NavTab| {
                nav.push(Route::for_tab(tab));
            },
            Outlet::<Route> {}
        }
    }
}

#[component]
pub fn Users() -> Element {
    rsx! { ui::views::UsersView {} }
}

#[component]
pub fn AssignedTasks() -> Element {
    rsx! { ui::views::AssignedTasksView {} }
}

#[component]
pub fn Reports() -> Element {
    rsx! { ui::views::ReportsView {} }
}

#[component]
pub fn AssignRole() -> Element {
    rsx! { ui::views::AssignRoleView {} }
}
