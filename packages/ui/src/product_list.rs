//! Product grid with search, editing, and deletion.
//!
//! The fetched set lives in a context signal (see [`use_products`]) so the
//! page shell can trigger a re-fetch after a create without reaching into
//! this component. Search filters that set locally; it never re-fetches.

use client::Session;
use dioxus::prelude::*;
use inventory::{Product, ProductSet};

use crate::auth::{use_catalog, use_session, AppCatalog};
use crate::edit_product_form::EditProductForm;
use crate::icons::{FaBoxOpen, FaMagnifyingGlass, FaPenToSquare, FaTrash};
use crate::modal::ConfirmDialog;
use crate::toast::{use_toast, Toasts};
use crate::Icon;

/// The shared product set. `None` until the first fetch settles.
pub fn use_products() -> Signal<Option<ProductSet>> {
    use_context::<Signal<Option<ProductSet>>>()
}

/// Fetch the session owner's products into the shared signal. On failure the
/// previous set stays visible and the error is surfaced as a toast; only the
/// very first load settles to an empty set so the page leaves the spinner.
pub async fn load_products(
    catalog: &AppCatalog,
    session: &Session,
    mut products: Signal<Option<ProductSet>>,
    toast: Toasts,
) {
    match catalog.fetch(session).await {
        Ok(list) => products.set(Some(ProductSet::new(list))),
        Err(err) => {
            toast.error(err.to_string());
            if products.peek().is_none() {
                products.set(Some(ProductSet::default()));
            }
        }
    }
}

#[component]
pub fn ProductList() -> Element {
    let session = use_session();
    let catalog = use_catalog();
    let toast = use_toast();
    let mut products = use_products();

    let mut search_query = use_signal(String::new);
    let mut editing = use_signal(|| Option::<Product>::None);
    let mut pending_delete = use_signal(|| Option::<Product>::None);

    // First load, and again whenever the session changes.
    let loader_catalog = catalog.clone();
    let _loader = use_resource(move || {
        let catalog = loader_catalog.clone();
        async move {
            let Some(session) = session() else {
                return;
            };
            load_products(&catalog, &session, products, toast).await;
        }
    });

    let delete_catalog = catalog.clone();
    let confirm_delete = move |_| {
        let catalog = delete_catalog.clone();
        async move {
            let Some(product) = pending_delete() else {
                return;
            };
            pending_delete.set(None);
            let Some(session) = session() else {
                return;
            };
            match catalog.delete(&session, product.id, &product.image_url).await {
                Ok(()) => {
                    // The row is gone; drop it locally instead of re-fetching.
                    if let Some(set) = products.write().as_mut() {
                        set.remove(product.id);
                    }
                    toast.success("Product deleted successfully");
                }
                Err(err) => toast.error(err.to_string()),
            }
        }
    };

    let saved_catalog = catalog.clone();
    let edit_saved = move |_| {
        let catalog = saved_catalog.clone();
        async move {
            let Some(session) = session() else {
                return;
            };
            load_products(&catalog, &session, products, toast).await;
        }
    };

    let query = search_query();
    let loaded = products();
    let owns_any = loaded.as_ref().is_some_and(|set| !set.is_empty());
    let visible: Vec<Product> = loaded
        .as_ref()
        .map(|set| set.search(&query))
        .unwrap_or_default();

    rsx! {
        div {
            class: "product-list",
            div {
                class: "search-bar",
                Icon { icon: FaMagnifyingGlass, width: 16, height: 16 }
                input {
                    r#type: "text",
                    placeholder: "Search products by name...",
                    value: query,
                    oninput: move |evt| search_query.set(evt.value()),
                }
            }

            if loaded.is_none() {
                div {
                    class: "product-list__loading",
                    div { class: "spinner" }
                }
            } else if visible.is_empty() {
                div {
                    class: "product-list__empty",
                    Icon { icon: FaBoxOpen, width: 48, height: 48 }
                    p {
                        if owns_any { "No products match your search." } else { "No products found. Add some!" }
                    }
                }
            } else {
                div {
                    class: "product-grid",
                    for product in visible {
                        ProductCard {
                            key: "{product.id}",
                            product: product.clone(),
                            on_edit: move |product| editing.set(Some(product)),
                            on_delete: move |product| pending_delete.set(Some(product)),
                        }
                    }
                }
            }
        }

        if let Some(product) = editing() {
            EditProductForm {
                key: "{product.id}",
                product: product.clone(),
                on_close: move |_| editing.set(None),
                on_saved: edit_saved,
            }
        }

        if pending_delete().is_some() {
            ConfirmDialog {
                message: "Are you sure you want to delete this product?",
                confirm_label: "Delete",
                on_confirm: confirm_delete,
                on_cancel: move |_| pending_delete.set(None),
            }
        }
    }
}

/// One product tile: image, name, price, comments, and hover actions.
#[component]
fn ProductCard(
    product: Product,
    on_edit: EventHandler<Product>,
    on_delete: EventHandler<Product>,
) -> Element {
    let catalog = use_catalog();
    let image_src = catalog.image_url(&product);
    let price = format!("${:.2}", product.price);

    let edit_product = product.clone();
    let delete_product = product.clone();

    rsx! {
        div {
            class: "product-card",
            div {
                class: "product-card__media",
                img { src: "{image_src}", alt: "{product.name}" }
                div {
                    class: "product-card__overlay",
                    button {
                        class: "product-card__action",
                        onclick: move |_| on_edit.call(edit_product.clone()),
                        Icon { icon: FaPenToSquare, width: 16, height: 16 }
                    }
                    button {
                        class: "product-card__action product-card__action--danger",
                        onclick: move |_| on_delete.call(delete_product.clone()),
                        Icon { icon: FaTrash, width: 16, height: 16 }
                    }
                }
            }
            div {
                class: "product-card__body",
                h3 { class: "product-card__name", "{product.name}" }
                p { class: "product-card__price", "{price}" }
                p { class: "product-card__comments", "{product.comments}" }
            }
        }
    }
}
