//! Page shown to signed-out visitors.

use dioxus::prelude::*;
use ui::AuthForm;

#[component]
pub fn Login() -> Element {
    rsx! {
        div {
            class: "login-page",
            AuthForm {}
        }
    }
}
