use dioxus::prelude::*;

use crate::{use_session, ActivityLogPanel, NavTab, Navbar, CONSOLE_CSS};

/// Shared chrome around every console page.
///
/// Platform packages map their routes to a [`NavTab`] and pass the router
/// outlet as children.
#[component]
pub fn ConsoleLayoutView(
    /// Tab matching the current route.
    active: NavTab,
    /// Called when the operator picks another tab.
    on_navigate: EventHandler<NavTab>,
    children: Element,
) -> Element {
    let session = use_session();
    let signed_in = session().me.map(|me| me.display_name());

    rsx! {
        document::Stylesheet { href: CONSOLE_CSS }
        div {
            class: "console-shell",
            Navbar { active, on_navigate }
            div {
                class: "console-identity muted",
                if session().loading {
                    "Identifying..."
                } else if let Some(name) = signed_in {
                    "Signed in as {name}"
                }
            }
            main {
                class: "console-main",
                {children}
            }
            ActivityLogPanel {}
        }
    }
}
