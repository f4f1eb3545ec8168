//! Console context: configuration, backend client, overlay and the caller's
//! session, provided once at the app root.

use api::directory::identify_caller;
use api::{LabelStudioClient, User};
use dioxus::prelude::*;
use store::{ConsoleConfig, Overlay};

use crate::activity_log::{log_activity, use_activity_log, LogLevel};
use crate::overlay::{make_overlay, OverlayStore};

/// Long-lived handles shared by every view.
#[derive(Clone)]
pub struct Console {
    pub config: ConsoleConfig,
    pub overlay: Overlay<OverlayStore>,
    client: Result<LabelStudioClient, String>,
}

impl Console {
    pub fn new(config: ConsoleConfig) -> Self {
        let config = with_page_origin(config);
        let client = LabelStudioClient::new(&config).map_err(|error| {
            tracing::error!(%error, "backend client unavailable");
            format!("Backend is not configured: {error}")
        });
        let overlay = make_overlay(config.overlay_namespace());
        Self {
            config,
            overlay,
            client,
        }
    }

    /// The backend client, or the message to show when it could not be built.
    pub fn client(&self) -> Result<LabelStudioClient, String> {
        self.client.clone()
    }

    pub fn directory_page_size(&self) -> u32 {
        self.config.directory.page_size.max(1)
    }

    pub fn projects_page_size(&self) -> u32 {
        self.config.projects.page_size.max(1)
    }
}

/// An empty backend URL means "the origin that served the page".
#[cfg(target_arch = "wasm32")]
fn with_page_origin(mut config: ConsoleConfig) -> ConsoleConfig {
    if config.server.base_url.trim().is_empty() {
        if let Some(origin) = web_sys::window().and_then(|w| w.location().origin().ok()) {
            config.server.base_url = origin;
        }
    }
    config
}

#[cfg(not(target_arch = "wasm32"))]
fn with_page_origin(config: ConsoleConfig) -> ConsoleConfig {
    config
}

/// Who is operating the console.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub me: Option<User>,
    pub loading: bool,
    /// From the caller role reported by the last directory fetch.
    pub caller_is_admin: bool,
    /// Users on the directory page last loaded (the first page at startup),
    /// for views that need display fields or creator information.
    pub page_users: Vec<User>,
}

pub fn use_console() -> Signal<Console> {
    use_context::<Signal<Console>>()
}

pub fn use_session() -> Signal<Session> {
    use_context::<Signal<Session>>()
}

/// Wrap the app with this component to provide [`Console`] and [`Session`].
#[component]
pub fn ConsoleProvider(config: ConsoleConfig, children: Element) -> Element {
    let console = use_context_provider(|| Signal::new(Console::new(config)));
    let mut session = use_context_provider(|| {
        Signal::new(Session {
            loading: true,
            ..Session::default()
        })
    });
    let mut activity_log = use_activity_log();

    let _ = use_resource(move || async move {
        let client = match console.peek().client() {
            Ok(client) => client,
            Err(message) => {
                log_activity(&mut activity_log, LogLevel::Error, &message);
                session.write().loading = false;
                return;
            }
        };
        let caller = identify_caller(&client, console.peek().directory_page_size()).await;
        match caller.me.as_ref() {
            Some(me) => tracing::info!(user = me.id, email = %me.email, "signed in"),
            None => log_activity(
                &mut activity_log,
                LogLevel::Warning,
                "Could not identify the signed-in user; project visibility is unfiltered.",
            ),
        }
        let mut state = session.write();
        state.me = caller.me;
        state.caller_is_admin = caller.caller_is_admin;
        // The directory view may already have loaded a later page.
        if state.page_users.is_empty() {
            state.page_users = caller.page_users;
        }
        state.loading = false;
    });

    rsx! {
        {children}
    }
}
