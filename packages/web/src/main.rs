use client::{Auth, Config, HttpBackend};
use dioxus::prelude::*;
use inventory::ProductCatalog;
use ui::{use_session, AuthProvider, ToastProvider};
use views::{Home, Login};

mod views;

const FAVICON: Asset = asset!("/assets/favicon.ico");
const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    dioxus::launch(App);
}

fn App() -> Element {
    // One backend client for the whole app; views reach it through context.
    // Web builds bake the connection settings in at compile time, native
    // builds read them from the environment at startup.
    let backend = use_hook(|| {
        #[cfg(target_arch = "wasm32")]
        let config = Config::from_build_env();
        #[cfg(not(target_arch = "wasm32"))]
        let config = Config::from_env();
        tracing::info!(url = %config.url, "backend configured");
        HttpBackend::new(config)
    });
    use_context_provider(|| backend.config().clone());
    use_context_provider(|| Auth::new(backend.clone()));
    use_context_provider(|| ProductCatalog::new(backend));

    rsx! {
        // Global app resources
        document::Link { rel: "icon", href: FAVICON }
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        ToastProvider {
            AuthProvider {
                Shell {}
            }
        }
    }
}

/// Session gate: signed-out visitors see the auth card, everyone else the
/// inventory.
#[component]
fn Shell() -> Element {
    let session = use_session();

    if session().is_some() {
        rsx! {
            Home {}
        }
    } else {
        rsx! {
            Login {}
        }
    }
}
