use super::super::{Model, Msg};
use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::FileList;
use yew::prelude::*;

pub const NOTIFICATION_DISMISS_MS: u32 = 4000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Success => "fa-solid fa-circle-check",
            NotificationKind::Error => "fa-solid fa-circle-exclamation",
            NotificationKind::Warning => "fa-solid fa-triangle-exclamation",
            NotificationKind::Info => "fa-solid fa-circle-info",
        }
    }

    fn class(&self) -> &'static str {
        match self {
            NotificationKind::Success => "notification-success",
            NotificationKind::Error => "notification-error",
            NotificationKind::Warning => "notification-warning",
            NotificationKind::Info => "notification-info",
        }
    }
}

/// A toast. Dropping it cancels its dismiss timer.
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub text: String,
    _dismiss: Timeout,
}

impl Notification {
    pub fn new(id: u64, kind: NotificationKind, text: String, dismiss: Timeout) -> Self {
        Self {
            id,
            kind,
            text,
            _dismiss: dismiss,
        }
    }
}

// Debounce function to limit button events
pub fn debounce<F>(duration: u32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        let mut timeout_ref = timeout.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        *timeout_ref = Some(Timeout::new(duration, move || inner_callback()));
    })
}

/// Only the first file of a selection, drop or paste is considered.
pub fn first_file(file_list: &FileList) -> Option<GlooFile> {
    file_list.item(0).map(GlooFile::from)
}

pub fn render_notifications(model: &Model, ctx: &Context<Model>) -> Html {
    if model.notifications.is_empty() {
        return html! {};
    }

    html! {
        <div class="notification-stack">
            { for model.notifications.iter().map(|notification| {
                let id = notification.id;
                html! {
                    <div class={classes!("notification", notification.kind.class())}>
                        <i class={notification.kind.icon()}></i>
                        <p>{ &notification.text }</p>
                        <button
                            class="notification-close"
                            title="Dismiss"
                            onclick={ctx.link().callback(move |_| Msg::DismissNotification(id))}
                        >
                            <i class="fa-solid fa-xmark"></i>
                        </button>
                    </div>
                }
            })}
        </div>
    }
}
