use leptos::prelude::*;
use strum::{AsRefStr, Display};
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

pub(crate) const MAX_TOASTS: usize = 4;
pub(crate) const TOAST_TIMEOUT_MS: i32 = 3000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Visible toasts, oldest first, capped at `MAX_TOASTS`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ToastQueue {
    items: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    pub fn push(&mut self, kind: ToastKind, message: String) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Toast { id, kind, message });
        if self.items.len() > MAX_TOASTS {
            let overflow = self.items.len() - MAX_TOASTS;
            self.items.drain(..overflow);
        }
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

/// Transient notifications, provided as context by `App`.
#[derive(Clone, Copy)]
pub struct Toaster {
    queue: RwSignal<ToastQueue>,
}

impl Toaster {
    pub fn new() -> Self {
        Self {
            queue: RwSignal::new(ToastQueue::default()),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    fn push(&self, kind: ToastKind, message: String) {
        let mut id = 0;
        self.queue.update(|q| id = q.push(kind, message));

        let toaster = *self;
        let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(
            wasm_bindgen::closure::Closure::once_into_js(move || toaster.dismiss(id))
                .as_ref()
                .unchecked_ref(),
            TOAST_TIMEOUT_MS,
        );
    }

    pub fn dismiss(&self, id: u64) {
        self.queue.update(|q| q.dismiss(id));
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn Toasts() -> impl IntoView {
    let toaster = expect_context::<Toaster>();

    view! {
        <div class="fixed bottom-4 right-4 z-50 flex w-80 flex-col gap-2" aria-live="polite">
            {move || {
                toaster
                    .queue
                    .with(|q| q.items().to_vec())
                    .into_iter()
                    .map(|t| {
                        let class = tw_merge!(
                            "cursor-pointer rounded-md border px-4 py-3 text-sm shadow-lg bg-background",
                            match t.kind {
                                ToastKind::Success => "border-success/40 text-foreground",
                                ToastKind::Error => "border-destructive/40 text-destructive",
                            }
                        );
                        let id = t.id;
                        view! {
                            <div class=class data-kind=t.kind.to_string() on:click=move |_| toaster.dismiss(id)>
                                {t.message}
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_caps_and_drops_oldest() {
        let mut q = ToastQueue::default();
        for i in 0..6 {
            q.push(ToastKind::Success, format!("t{i}"));
        }
        let messages: Vec<&str> = q.items().iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["t2", "t3", "t4", "t5"]);
    }

    #[test]
    fn test_dismiss_by_id() {
        let mut q = ToastQueue::default();
        let a = q.push(ToastKind::Success, "saved".to_string());
        let b = q.push(ToastKind::Error, "failed".to_string());
        assert_ne!(a, b);

        q.dismiss(a);
        assert_eq!(q.items().len(), 1);
        assert_eq!(q.items()[0].kind, ToastKind::Error);

        // Dismissing twice (timer + click) is harmless.
        q.dismiss(a);
        assert_eq!(q.items().len(), 1);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ToastKind::Success.to_string(), "success");
        assert_eq!(ToastKind::Error.as_ref(), "error");
    }
}
