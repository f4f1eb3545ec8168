use dioxus::prelude::*;
use dioxus_primitives::toast;

pub use dioxus_primitives::toast::{use_toast, ToastOptions};

const TOAST_CSS: Asset = asset!("/assets/styling/toast.css");

/// Hosts the toast region. Wrap the router with this once per app.
#[component]
pub fn ToastProvider(children: Element) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: TOAST_CSS }
        toast::ToastProvider { {children} }
    }
}
