use dioxus::prelude::*;
use store::ConsoleConfig;

use views::{AssignRole, AssignedTasks, ConsoleLayout, Reports, Users};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Root {},
    #[layout(ConsoleLayout)]
        #[route("/users")]
        Users {},
        #[route("/assigned")]
        AssignedTasks {},
        #[route("/reports")]
        Reports {},
        #[route("/roles")]
        AssignRole {},
}

fn main() {
    dioxus::launch(App);
}

/// The backend is the origin serving the console, so the defaults apply.
#[component]
fn App() -> Element {
    use_context_provider(|| Signal::new(ui::ActivityLog::default()));
    use_hook(|| tracing::info!("admin console starting (web)"));

    rsx! {
        document::Link { rel: "stylesheet", href: ui::CONSOLE_CSS }
        ui::ConsoleProvider {
            config: ConsoleConfig::default(),
            ui::components::ToastProvider {
                Router::<Route> {}
            }
        }
    }
}

#[component]
fn Root() -> Element {
    let nav = use_navigator();
    nav.replace(Route::Users {});
    rsx! {}
}
