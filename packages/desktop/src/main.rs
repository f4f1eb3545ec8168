use dioxus::prelude::*;

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

#[component]
fn App() -> Element {
    use_context_provider(|| Signal::new(ui::ActivityLog::default()));
    let config = use_hook(|| {
        let path = ui::config_file::config_path();
        tracing::info!(path = %path.display(), "admin console starting (desktop)");
        ui::config_file::load_config()
    });

    rsx! {
        document::Link { rel: "stylesheet", href: ui::CONSOLE_CSS }
        ui::ConsoleProvider {
            config,
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
