//! Toast notifications, stacked top-right and dismissed after a few seconds.

use dioxus::prelude::*;

const DISMISS_AFTER_SECS: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
struct Toast {
    id: u64,
    kind: ToastKind,
    message: String,
    timer_started: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct ToastState {
    next_id: u64,
    items: Vec<Toast>,
}

impl ToastState {
    fn push(&mut self, kind: ToastKind, message: String) -> u64 {
        self.next_id += 1;
        self.items.push(Toast {
            id: self.next_id,
            kind,
            message,
            timer_started: false,
        });
        self.next_id
    }

    fn needs_timers(&self) -> bool {
        self.items.iter().any(|toast| !toast.timer_started)
    }

    /// Ids of toasts that still need a dismiss timer, marking each so a
    /// timer is started exactly once per toast.
    fn take_unscheduled(&mut self) -> Vec<u64> {
        self.items
            .iter_mut()
            .filter(|toast| !toast.timer_started)
            .map(|toast| {
                toast.timer_started = true;
                toast.id
            })
            .collect()
    }

    fn dismiss(&mut self, id: u64) {
        self.items.retain(|toast| toast.id != id);
    }
}

/// Handle for pushing notifications; copy it into event handlers.
#[derive(Clone, Copy)]
pub struct Toasts {
    state: Signal<ToastState>,
}

impl Toasts {
    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    fn push(&self, kind: ToastKind, message: String) {
        let mut state = self.state;
        state.write().push(kind, message);
    }

    fn dismiss(&self, id: u64) {
        let mut state = self.state;
        state.write().dismiss(id);
    }
}

/// Get the toast handle. Panics outside a [`ToastProvider`].
pub fn use_toast() -> Toasts {
    use_context::<Toasts>()
}

/// Renders its children plus the toast stack, and provides the handle.
#[component]
pub fn ToastProvider(children: Element) -> Element {
    let mut state = use_signal(ToastState::default);
    let toasts = use_context_provider(|| Toasts { state });

    // Dismiss timers belong to this component, which outlives every pusher.
    // A form that unmounts right after its success toast (sign-in swaps the
    // page, create collapses the form) must not take the timer down with it.
    use_effect(move || {
        let pending = if state.read().needs_timers() {
            state.write().take_unscheduled()
        } else {
            Vec::new()
        };
        for id in pending {
            spawn(async move {
                #[cfg(target_arch = "wasm32")]
                gloo_timers::future::sleep(std::time::Duration::from_secs(DISMISS_AFTER_SECS))
                    .await;
                #[cfg(not(target_arch = "wasm32"))]
                tokio::time::sleep(std::time::Duration::from_secs(DISMISS_AFTER_SECS)).await;

                state.write().dismiss(id);
            });
        }
    });

    rsx! {
        {children}
        div {
            class: "toast-viewport",
            for toast in state().items {
                div {
                    key: "{toast.id}",
                    class: if toast.kind == ToastKind::Success { "toast toast--success" } else { "toast toast--error" },
                    onclick: move |_| toasts.dismiss(toast.id),
                    "{toast.message}"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_toast_gets_exactly_one_timer() {
        let mut state = ToastState::default();
        let first = state.push(ToastKind::Success, "Successfully logged in!".to_string());

        assert!(state.needs_timers());
        assert_eq!(state.take_unscheduled(), vec![first]);

        // Scheduling is sticky: the provider's next pass starts no second
        // timer for a toast that already has one.
        assert!(!state.needs_timers());
        assert_eq!(state.take_unscheduled(), Vec::<u64>::new());

        let second = state.push(ToastKind::Error, "boom".to_string());
        assert_eq!(state.take_unscheduled(), vec![second]);
    }

    #[test]
    fn test_dismiss_drops_only_that_toast() {
        let mut state = ToastState::default();
        let first = state.push(ToastKind::Success, "one".to_string());
        let second = state.push(ToastKind::Success, "two".to_string());

        state.dismiss(first);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].id, second);

        // Dismissing an already-gone id is a no-op.
        state.dismiss(first);
        assert_eq!(state.items.len(), 1);
    }
}
