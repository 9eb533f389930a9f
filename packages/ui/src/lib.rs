//! This crate contains all shared UI for the workspace.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod auth;
pub use auth::{use_auth, use_backend_config, use_catalog, use_session, AppAuth, AppCatalog, AuthProvider};

mod toast;
pub use toast::{use_toast, ToastKind, ToastProvider, Toasts};

mod modal;
pub use modal::{ConfirmDialog, ModalOverlay};

mod auth_form;
pub use auth_form::AuthForm;

mod navbar;
pub use navbar::Navbar;

mod product_form;
pub use product_form::ProductForm;

mod edit_product_form;
pub use edit_product_form::EditProductForm;

mod product_list;
pub use product_list::{load_products, use_products, ProductList};
