use super::super::{Model, Msg};
use super::utils::{first_file, Notification, NotificationKind, NOTIFICATION_DISMISS_MS};
use crate::api;
use gloo_file::callbacks::read_as_bytes;
use gloo_file::{File as GlooFile, FileReadError, ObjectUrl};
use gloo_timers::callback::Timeout;
use shared::{PredictionResult, RequestError, UploadError, BAR_REVEAL_DELAY_MS, GREETING_DELAY_MS};
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

pub fn notify(model: &mut Model, ctx: &Context<Model>, kind: NotificationKind, text: String) {
    let id = model.next_notification_id;
    model.next_notification_id += 1;

    let link = ctx.link().clone();
    let dismiss = Timeout::new(NOTIFICATION_DISMISS_MS, move || {
        link.send_message(Msg::DismissNotification(id));
    });
    model.notifications.push(Notification::new(id, kind, text, dismiss));
}

pub fn handle_notify(model: &mut Model, ctx: &Context<Model>, kind: NotificationKind, text: String) -> bool {
    notify(model, ctx, kind, text);
    true
}

fn report_upload_error(model: &mut Model, ctx: &Context<Model>, err: UploadError) {
    let kind = match err {
        UploadError::Busy | UploadError::EmptySelection => NotificationKind::Warning,
        UploadError::UnsupportedType(_) | UploadError::TooLarge(_) => NotificationKind::Error,
    };
    notify(model, ctx, kind, err.to_string());
}

/// Validates the file's metadata and starts reading its bytes.
pub fn handle_file_chosen(model: &mut Model, ctx: &Context<Model>, file: GlooFile) -> bool {
    if let Err(err) = shared::upload::validate(&file.raw_mime_type(), file.size()) {
        log::warn!("Rejected {}: {}", file.name(), err);
        report_upload_error(model, ctx, err);
        return true;
    }

    let link = ctx.link().clone();
    let read_target = file.clone();
    model.file_reader = Some(read_as_bytes(&file, move |bytes| {
        link.send_message(Msg::FileRead(read_target, bytes));
    }));
    false
}

pub fn handle_file_read(
    model: &mut Model,
    ctx: &Context<Model>,
    file: GlooFile,
    bytes: Result<Vec<u8>, FileReadError>,
) -> bool {
    model.file_reader = None;

    let bytes = match bytes {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Failed to read {}: {}", file.name(), e);
            notify(model, ctx, NotificationKind::Error, format!("Failed to read file: {}", e));
            return true;
        }
    };

    let name = file.name();
    match model.upload.offer(&name, &file.raw_mime_type(), bytes) {
        Ok(()) => {
            model.preview_url = Some(ObjectUrl::from(file));
            model.bars_revealed = false;
            model.reveal_timeout = None;
            model.greeting_timeout = None;
            notify(model, ctx, NotificationKind::Info, format!("{} ready for analysis", name));
        }
        Err(err) => report_upload_error(model, ctx, err),
    }
    true
}

pub fn handle_reset(model: &mut Model) -> bool {
    model.upload.reset();
    model.preview_url = None;
    model.bars_revealed = false;
    model.file_reader = None;
    model.reveal_timeout = None;
    model.greeting_timeout = None;
    true
}

pub fn handle_analyze(model: &mut Model, ctx: &Context<Model>) -> bool {
    let request = match model.upload.begin_analysis() {
        Ok(request) => request,
        Err(err) => {
            report_upload_error(model, ctx, err);
            return true;
        }
    };

    let link = ctx.link().clone();
    spawn_local(async move {
        let outcome = api::request_prediction(&request).await;
        link.send_message(Msg::AnalysisFinished(outcome));
    });
    true
}

pub fn handle_analysis_finished(
    model: &mut Model,
    ctx: &Context<Model>,
    outcome: Result<PredictionResult, RequestError>,
) -> bool {
    let summary = match model.upload.complete_analysis(outcome) {
        Ok(Some(result)) => format!("{} ({})", result.label(), result.confidence_text()),
        Ok(None) => return false,
        Err(err) => {
            log::error!("Analysis failed: {}", err);
            model.preview_url = None;
            notify(model, ctx, NotificationKind::Error, err.to_string());
            return true;
        }
    };
    log::info!("Analysis complete: {}", summary);

    model.bars_revealed = false;
    let link = ctx.link().clone();
    model.reveal_timeout = Some(Timeout::new(BAR_REVEAL_DELAY_MS, move || {
        link.send_message(Msg::RevealBars);
    }));
    let link = ctx.link().clone();
    model.greeting_timeout = Some(Timeout::new(GREETING_DELAY_MS, move || {
        link.send_message(Msg::OfferGreeting);
    }));

    notify(model, ctx, NotificationKind::Success, "Analysis complete!".to_string());
    true
}

pub fn handle_offer_greeting(model: &mut Model) -> bool {
    model.greeting_timeout = None;
    if let Some(result) = model.upload.result() {
        if model.chat.offer_greeting(result) {
            model.focus_chat_input = true;
            return true;
        }
    }
    false
}

pub fn handle_send_chat(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(request) = model.chat.send_draft() else {
        return false;
    };

    let link = ctx.link().clone();
    spawn_local(async move {
        let outcome = api::request_chat_reply(&request).await;
        link.send_message(Msg::ChatReply(outcome));
    });
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    let file = event
        .data_transfer()
        .and_then(|data_transfer| data_transfer.files())
        .and_then(|file_list| first_file(&file_list));

    match file {
        Some(file) => {
            handle_file_chosen(model, ctx, file);
        }
        None => notify(model, ctx, NotificationKind::Warning, "No file was dropped.".to_string()),
    }
    true
}

pub fn handle_paste(model: &mut Model, ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    let file = event
        .clipboard_data()
        .and_then(|data_transfer| data_transfer.files())
        .and_then(|file_list| first_file(&file_list));

    match file {
        Some(file) => {
            event.prevent_default();
            handle_file_chosen(model, ctx, file)
        }
        None => false,
    }
}
