//! Form for adding a product. The image is required; nothing is sent to the
//! backend until the draft validates.

use dioxus::prelude::*;
use inventory::{ImageUpload, ProductDraft};

use crate::auth::{use_catalog, use_session};
use crate::icons::FaUpload;
use crate::toast::use_toast;
use crate::Icon;

#[component]
pub fn ProductForm(on_created: EventHandler<()>) -> Element {
    let session = use_session();
    let catalog = use_catalog();
    let toast = use_toast();

    let mut draft = use_signal(ProductDraft::default);
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
    let submit = move |_| {
        let catalog = submit_catalog.clone();
        async move {
            let Some(session) = session() else {
                return;
            };
            let new = match draft().validate_new() {
                Ok(new) => new,
                Err(err) => {
                    toast.error(err.to_string());
                    return;
                }
            };
            loading.set(true);
            match catalog.create(&session, new).await {
                Ok(_) => {
                    toast.success("Product added successfully!");
                    draft.set(ProductDraft::default());
                    on_created.call(());
                }
                Err(err) => toast.error(err.to_string()),
            }
            loading.set(false);
        }
    };

    let name = draft.read().name.clone();
    let price = draft.read().price.clone();
    let comments = draft.read().comments.clone();
    let picked = draft.read().image.as_ref().map(|image| image.file_name.clone());

    rsx! {
        div {
            class: "product-form",
            div {
                class: "form-field",
                label { r#for: "product-name", "Product Name" }
                input {
                    id: "product-name",
                    r#type: "text",
                    required: true,
                    value: name,
                    oninput: move |evt| draft.write().name = evt.value(),
                }
            }

            div {
                class: "form-field",
                label { r#for: "product-price", "Price ($)" }
                input {
                    id: "product-price",
                    r#type: "number",
                    step: "0.01",
                    required: true,
                    value: price,
                    oninput: move |evt| draft.write().price = evt.value(),
                }
            }

            div {
                class: "form-field",
                label { r#for: "product-comments", "Comments" }
                textarea {
                    id: "product-comments",
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
                        span { "Upload a file" }
                        input {
                            r#type: "file",
                            accept: "image/*",
                            onchange: pick_image,
                        }
                    }
                    p { class: "upload-box__hint", "PNG, JPG, GIF up to 10MB" }
                    if let Some(name) = &picked {
                        p { class: "upload-box__file", "{name}" }
                    }
                }
            }

            button {
                class: "btn btn--primary product-form__submit",
                disabled: loading(),
                onclick: submit,
                if loading() { "Adding Product..." } else { "Add Product" }
            }
        }
    }
}
