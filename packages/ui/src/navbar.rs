use dioxus::prelude::*;

use crate::icons::{FaPlus, FaRightFromBracket};
use crate::Icon;

/// Top bar with the app title, the add-product toggle, and sign-out.
#[component]
pub fn Navbar(
    form_open: bool,
    on_toggle_form: EventHandler<()>,
    on_sign_out: EventHandler<()>,
) -> Element {
    rsx! {
        nav {
            class: "navbar",
            div {
                class: "navbar__inner",
                h1 { class: "navbar__title", "Product Inventory" }
                div {
                    class: "navbar__actions",
                    button {
                        class: "btn btn--primary",
                        onclick: move |_| on_toggle_form.call(()),
                        Icon { icon: FaPlus, width: 16, height: 16 }
                        if form_open { "Close Form" } else { "Add Product" }
                    }
                    button {
                        class: "btn btn--secondary",
                        onclick: move |_| on_sign_out.call(()),
                        Icon { icon: FaRightFromBracket, width: 16, height: 16 }
                        "Sign Out"
                    }
                }
            }
        }
    }
}
