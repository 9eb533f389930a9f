//! Email/password sign-in and sign-up, plus Google one-tap.

use dioxus::prelude::*;

use crate::auth::{use_auth, use_backend_config};
use crate::icons::{FaEnvelope, FaLock};
use crate::toast::use_toast;
use crate::Icon;

/// Loads Google Identity Services, renders the sign-in button into the
/// placeholder div, and shows the one-tap prompt. Every accepted credential
/// is forwarded to Rust through `dioxus.send`.
///
/// The setup block runs on every mount: the script loads only once, but each
/// mount gets a fresh eval channel and a fresh placeholder div, so initialize,
/// renderButton, and prompt all have to run again for them.
#[cfg(any(target_arch = "wasm32", test))]
const GOOGLE_SIGN_IN_JS: &str = r#"
const setup = () => {
    window.google.accounts.id.initialize({
        client_id: "__CLIENT_ID__",
        callback: (response) => dioxus.send({
            credential: response.credential,
            select_by: response.select_by || null,
        }),
        auto_select: true,
        cancel_on_tap_outside: false,
        context: "signin",
        ux_mode: "popup",
        itp_support: true,
        use_fedcm_for_prompt: true,
    });
    const target = document.getElementById("google-signin-button");
    if (target) {
        window.google.accounts.id.renderButton(target, {
            type: "standard",
            shape: "pill",
            theme: "outline",
            text: "signin_with",
            size: "large",
            logo_alignment: "left",
        });
    }
    window.google.accounts.id.prompt((notification) => {
        if (notification.isNotDisplayed()) {
            console.log("One Tap not displayed");
        }
    });
};

const existing = document.getElementById("google-gsi-script");
if (window.google && window.google.accounts) {
    setup();
} else if (existing) {
    existing.addEventListener("load", setup);
} else {
    const script = document.createElement("script");
    script.id = "google-gsi-script";
    script.src = "https://accounts.google.com/gsi/client";
    script.async = true;
    script.onload = setup;
    document.head.appendChild(script);
}
"#;

#[cfg(target_arch = "wasm32")]
#[derive(Debug, serde::Deserialize)]
struct GoogleCredential {
    credential: String,
    select_by: Option<String>,
}

/// Where the backend should send the user back to after an email
/// confirmation or a federated redirect.
#[cfg(target_arch = "wasm32")]
fn page_origin() -> Option<String> {
    web_sys::window().and_then(|window| window.location().origin().ok())
}

#[cfg(not(target_arch = "wasm32"))]
fn page_origin() -> Option<String> {
    None
}

/// Trimmed credentials, or the message to surface when a field is missing.
fn credentials(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Please enter your email");
    }
    if password.is_empty() {
        return Err("Please enter your password");
    }
    Ok((email.to_string(), password.to_string()))
}

/// Card with the email/password form and, when configured, Google sign-in.
#[component]
pub fn AuthForm() -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let config = use_backend_config();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let mut signing_up = use_signal(|| false);

    let google_enabled = config.google_client_id.is_some();

    // Google button and one-tap prompt; credentials arrive on the eval
    // channel until this form unmounts.
    #[cfg(target_arch = "wasm32")]
    {
        let auth = auth.clone();
        let client_id = config.google_client_id.clone();
        use_effect(move || {
            let Some(client_id) = client_id.clone() else {
                return;
            };
            let auth = auth.clone();
            let mut eval = document::eval(&GOOGLE_SIGN_IN_JS.replace("__CLIENT_ID__", &client_id));
            spawn(async move {
                while let Ok(response) = eval.recv::<GoogleCredential>().await {
                    tracing::debug!(select_by = ?response.select_by, "google credential received");
                    match auth
                        .sign_in_with_id_token("google", &response.credential, page_origin().as_deref())
                        .await
                    {
                        Ok(_) => toast.success("Successfully logged in with Google!"),
                        Err(err) => toast.error(err.to_string()),
                    }
                }
            });
        });
    }

    let submit_auth = auth.clone();
    let submit = move |_| {
        let auth = submit_auth.clone();
        async move {
            let (email, password) = match credentials(&email(), &password()) {
                Ok(fields) => fields,
                Err(message) => {
                    toast.error(message);
                    return;
                }
            };
            loading.set(true);
            if signing_up() {
                match auth.sign_up(&email, &password, page_origin().as_deref()).await {
                    Ok(_) => toast.success("Check your email for the confirmation link!"),
                    Err(err) => toast.error(err.to_string()),
                }
            } else {
                match auth.sign_in(&email, &password).await {
                    Ok(_) => toast.success("Successfully logged in!"),
                    Err(err) => toast.error(err.to_string()),
                }
            }
            loading.set(false);
        }
    };

    rsx! {
        div {
            class: "auth-card",
            h2 {
                class: "auth-card__title",
                if signing_up() { "Create Account" } else { "Welcome Back" }
            }

            if google_enabled {
                div { id: "google-signin-button", class: "auth-card__google" }
                div {
                    class: "auth-card__divider",
                    span { "Or continue with email" }
                }
            }

            div {
                class: "form-field",
                label { r#for: "email", "Email" }
                div {
                    class: "form-field__control",
                    Icon { icon: FaEnvelope, width: 16, height: 16 }
                    input {
                        id: "email",
                        r#type: "email",
                        placeholder: "your@email.com",
                        required: true,
                        value: email(),
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
            }

            div {
                class: "form-field",
                label { r#for: "password", "Password" }
                div {
                    class: "form-field__control",
                    Icon { icon: FaLock, width: 16, height: 16 }
                    input {
                        id: "password",
                        r#type: "password",
                        placeholder: "******************",
                        required: true,
                        value: password(),
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
            }

            button {
                class: "btn btn--primary auth-card__submit",
                disabled: loading(),
                onclick: submit,
                if loading() {
                    "Processing..."
                } else if signing_up() {
                    "Sign Up"
                } else {
                    "Sign In"
                }
            }
            button {
                class: "auth-card__toggle",
                onclick: move |_| signing_up.set(!signing_up()),
                if signing_up() {
                    "Already have an account? Sign In"
                } else {
                    "Don't have an account? Sign Up"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_both_fields() {
        assert_eq!(
            credentials("", "hunter2"),
            Err("Please enter your email")
        );
        assert_eq!(
            credentials("   ", "hunter2"),
            Err("Please enter your email")
        );
        assert_eq!(
            credentials("ada@example.com", ""),
            Err("Please enter your password")
        );
        assert_eq!(
            credentials(" ada@example.com ", "hunter2"),
            Ok(("ada@example.com".to_string(), "hunter2".to_string()))
        );
    }

    #[test]
    fn test_google_script_sets_up_when_library_already_loaded() {
        // A remount after sign-out finds the GSI script tag already in the
        // document. The setup (initialize + renderButton + prompt) must run
        // anyway, since the new mount has a fresh eval channel and a fresh
        // placeholder div; only the script load itself happens once.
        let gated = GOOGLE_SIGN_IN_JS
            .split("window.google && window.google.accounts")
            .nth(1)
            .expect("script checks for an already-loaded library");
        assert!(gated.contains("setup();"));
        assert!(gated.contains(r#"addEventListener("load", setup)"#));

        // The load-once guard applies to the script tag, not to setup.
        assert_eq!(GOOGLE_SIGN_IN_JS.matches("createElement").count(), 1);
    }
}
