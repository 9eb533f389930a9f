//! Signed-in page: navbar, the collapsible add-product form, and the list.

use dioxus::prelude::*;
use inventory::ProductSet;
use ui::{load_products, use_auth, use_catalog, use_session, use_toast, Navbar, ProductForm, ProductList};

#[component]
pub fn Home() -> Element {
    let auth = use_auth();
    let catalog = use_catalog();
    let session = use_session();
    let toast = use_toast();

    // Shared with ProductList via context so a create here can re-fetch the
    // set the list renders.
    let products: Signal<Option<ProductSet>> = use_context_provider(|| Signal::new(None));

    let mut show_form = use_signal(|| false);

    let sign_out_auth = auth.clone();
    let sign_out = move |_| {
        let auth = sign_out_auth.clone();
        async move {
            if let Err(err) = auth.sign_out().await {
                toast.error(err.to_string());
            }
        }
    };

    let created_catalog = catalog.clone();
    let created = move |_| {
        let catalog = created_catalog.clone();
        async move {
            show_form.set(false);
            let Some(session) = session() else {
                return;
            };
            load_products(&catalog, &session, products, toast).await;
        }
    };

    rsx! {
        div {
            class: "app-shell",
            Navbar {
                form_open: show_form(),
                on_toggle_form: move |_| show_form.set(!show_form()),
                on_sign_out: sign_out,
            }
            main {
                class: "app-main",
                if show_form() {
                    div {
                        class: "app-main__form",
                        ProductForm { on_created: created }
                    }
                }
                ProductList {}
            }
        }
    }
}
