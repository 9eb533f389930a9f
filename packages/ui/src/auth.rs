//! Session context and hooks for the UI.
//!
//! The app shell provides a [`Config`], an [`AppAuth`] and an [`AppCatalog`]
//! through context; [`AuthProvider`] mirrors the auth client's session into a
//! signal so views re-render on sign-in and sign-out.

use client::{Auth, Config, HttpBackend, Session};
use dioxus::prelude::*;
use inventory::ProductCatalog;

/// The auth client the app runs against.
pub type AppAuth = Auth<HttpBackend>;
/// The product catalog the app runs against.
pub type AppCatalog = ProductCatalog<HttpBackend>;

/// Get the shared auth client.
pub fn use_auth() -> AppAuth {
    use_context::<AppAuth>()
}

/// Get the shared product catalog.
pub fn use_catalog() -> AppCatalog {
    use_context::<AppCatalog>()
}

/// Get the backend configuration.
pub fn use_backend_config() -> Config {
    use_context::<Config>()
}

/// The current session. `None` means signed out.
pub fn use_session() -> Signal<Option<Session>> {
    use_context::<Signal<Option<Session>>>()
}

/// Provider component that tracks the current session.
/// Wrap the app with this component below the context for [`AppAuth`].
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let auth = use_auth();
    let mut session = use_signal(|| auth.session());

    // Mirror session changes into the signal for as long as this component
    // is mounted. The receiver drops with the task, which unsubscribes.
    let watcher = auth.clone();
    use_effect(move || {
        let auth = watcher.clone();
        spawn(async move {
            let mut changes = auth.subscribe();
            while changes.changed().await.is_ok() {
                session.set(changes.borrow_and_update().clone());
            }
        });
    });

    use_context_provider(|| session);

    rsx! {
        {children}
    }
}
