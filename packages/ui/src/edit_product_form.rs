//! Modal for editing a product. Fields are prefilled from the stored row;
//! leaving the file picker empty keeps the current image.

use dioxus::prelude::*;
use inventory::{ImageUpload, Product, ProductDraft};

use crate::auth::{use_catalog, use_session};
use crate::icons::{FaUpload, FaXmark};
use crate::modal::ModalOverlay;
use crate::toast::use_toast;
use crate::Icon;

#[component]
pub fn EditProductForm(
    product: Product,
    on_close: EventHandler<()>,
    on_saved: EventHandler<()>,
) -> Element {
    let session = use_session();
    let catalog = use_catalog();
    let toast = use_toast();

    let initial = product.clone();
    let mut draft = use_signal(move || ProductDraft::from_product(&initial));
    let mut loading = use_signal(|| false);

    let pick_image = move |evt: FormEvent| async move {
        if let Some(file_engine) = evt.files() {
            if let Some(name) = file_engine.files().first().cloned() {
                if let Some(bytes) = file_engine.read_file(&name).await {
                    draft.write().image = Some(ImageUpload::new(name, bytes));
                }
            }
        }
    };

    let submit_catalog = catalog.clone();
    let submit_product = product.clone();
    let submit = move |_| {
        let catalog = submit_catalog.clone();
        let product = submit_product.clone();
        async move {
            let Some(session) = session() else {
                return;
            };
            let changes = match draft().validate_update() {
                Ok(changes) => changes,
                Err(err) => {
                    toast.error(err.to_string());
                    return;
                }
            };
            loading.set(true);
            match catalog.update(&session, &product, changes).await {
                Ok(()) => {
                    toast.success("Product updated successfully!");
                    on_saved.call(());
                    on_close.call(());
                }
                Err(err) => toast.error(err.to_string()),
            }
            loading.set(false);
        }
    };

    let name = draft.read().name.clone();
    let price = draft.read().price.clone();
    let comments = draft.read().comments.clone();
    let image_note = match draft.read().image.as_ref() {
        Some(image) => image.file_name.clone(),
        None => "Current image will be kept".to_string(),
    };

    rsx! {
        ModalOverlay {
            on_close: move |_| on_close.call(()),
            div {
                class: "edit-form",
                div {
                    class: "edit-form__header",
                    h2 { "Edit Product" }
                    button {
                        class: "edit-form__close",
                        onclick: move |_| on_close.call(()),
                        Icon { icon: FaXmark, width: 16, height: 16 }
                    }
                }

                div {
                    class: "edit-form__body",
                    div {
                        class: "form-field",
                        label { r#for: "edit-name", "Product Name" }
                        input {
                            id: "edit-name",
                            r#type: "text",
                            required: true,
                            value: name,
                            oninput: move |evt| draft.write().name = evt.value(),
                        }
                    }

                    div {
                        class: "form-field",
                        label { r#for: "edit-price", "Price ($)" }
                        input {
                            id: "edit-price",
                            r#type: "number",
                            step: "0.01",
                            required: true,
                            value: price,
                            oninput: move |evt| draft.write().price = evt.value(),
                        }
                    }

                    div {
                        class: "form-field",
                        label { r#for: "edit-comments", "Comments" }
                        textarea {
                            id: "edit-comments",
                            rows: "3",
                            required: true,
                            value: comments,
                            oninput: move |evt| draft.write().comments = evt.value(),
                        }
                    }

                    div {
                        class: "form-field",
                        label { "Product Image" }
                        div {
                            class: "upload-box",
                            Icon { icon: FaUpload, width: 32, height: 32 }
                            label {
                                class: "upload-box__action",
                                span { "Upload a new image" }
                                input {
                                    r#type: "file",
                                    accept: "image/*",
                                    onchange: pick_image,
                                }
                            }
                            p { class: "upload-box__hint", "PNG, JPG, GIF up to 10MB" }
                            p { class: "upload-box__file", "{image_note}" }
                        }
                    }

                    div {
                        class: "edit-form__actions",
                        button {
                            class: "btn btn--outline",
                            onclick: move |_| on_close.call(()),
                            "Cancel"
                        }
                        button {
                            class: "btn btn--primary",
                            disabled: loading(),
                            onclick: submit,
                            if loading() { "Updating..." } else { "Update Product" }
                        }
                    }
                }
            }
        }
    }
}
