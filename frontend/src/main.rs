mod api;
mod components;

use components::chat_widget::render_chat_widget;
use components::handlers;
use components::header::render_header;
use components::preview_area::render_preview_area;
use components::results::render_results;
use components::upload_section::render_upload_section;
use components::utils::{render_notifications, Notification, NotificationKind};
use gloo_events::EventListener;
use gloo_file::callbacks::FileReader;
use gloo_file::{File as GlooFile, FileReadError, ObjectUrl};
use gloo_timers::callback::Timeout;
use shared::{ChatController, PredictionResult, RequestError, UploadController, ViewState};
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent, HtmlElement, HtmlInputElement};
use yew::prelude::*;

// Yew msg components
pub enum Msg {
    // File operations
    FileChosen(GlooFile),
    FileRead(GlooFile, Result<Vec<u8>, FileReadError>),
    ResetUpload,

    // Analysis operations
    Analyze,
    AnalysisFinished(Result<PredictionResult, RequestError>),
    RevealBars,
    OfferGreeting,

    // Chat operations
    ToggleChat,
    ChatInput(String),
    SendChat,
    ChatReply(Result<String, RequestError>),

    // UI states
    Notify(NotificationKind, String),
    DismissNotification(u64),
    SetDragging(bool),

    // Input events
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

// Main component
pub struct Model {
    pub upload: UploadController,
    pub chat: ChatController,
    pub preview_url: Option<ObjectUrl>,
    pub is_dragging: bool,
    pub bars_revealed: bool,
    pub notifications: Vec<Notification>,
    pub next_notification_id: u64,
    pub chat_input_ref: NodeRef,
    pub chat_log_ref: NodeRef,
    pub focus_chat_input: bool,
    pub file_reader: Option<FileReader>,
    pub reveal_timeout: Option<Timeout>,
    pub greeting_timeout: Option<Timeout>,
    paste_listener: Option<EventListener>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut model = Self {
            upload: UploadController::new(),
            chat: ChatController::new(),
            preview_url: None,
            is_dragging: false,
            bars_revealed: false,
            notifications: Vec::new(),
            next_notification_id: 0,
            chat_input_ref: NodeRef::default(),
            chat_log_ref: NodeRef::default(),
            focus_chat_input: false,
            file_reader: None,
            reveal_timeout: None,
            greeting_timeout: None,
            paste_listener: None,
        };

        let link = ctx.link().clone();
        if let Some(window) = web_sys::window() {
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            model.paste_listener = Some(listener);
        } else {
            log::error!("No global window; paste support disabled");
        }

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // File operations
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, ctx, file),
            Msg::FileRead(file, bytes) => handlers::handle_file_read(self, ctx, file, bytes),
            Msg::ResetUpload => handlers::handle_reset(self),

            // Analysis operations
            Msg::Analyze => handlers::handle_analyze(self, ctx),
            Msg::AnalysisFinished(outcome) => handlers::handle_analysis_finished(self, ctx, outcome),
            Msg::RevealBars => {
                self.bars_revealed = true;
                self.reveal_timeout = None;
                true
            }
            Msg::OfferGreeting => handlers::handle_offer_greeting(self),

            // Chat operations
            Msg::ToggleChat => {
                self.focus_chat_input = self.chat.toggle();
                true
            }
            Msg::ChatInput(text) => {
                self.chat.set_draft(text);
                true
            }
            Msg::SendChat => handlers::handle_send_chat(self, ctx),
            Msg::ChatReply(outcome) => {
                self.chat.finish_send(outcome);
                self.focus_chat_input = true;
                true
            }

            // UI states
            Msg::Notify(kind, text) => handlers::handle_notify(self, ctx, kind, text),
            Msg::DismissNotification(id) => {
                self.notifications.retain(|n| n.id != id);
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }

            // Input events
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if let Some(log) = self.chat_log_ref.cast::<HtmlElement>() {
            log.set_scroll_top(log.scroll_height());
        }
        if std::mem::take(&mut self.focus_chat_input) {
            if let Some(input) = self.chat_input_ref.cast::<HtmlInputElement>() {
                let _ = input.focus();
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let body = match self.upload.view() {
            ViewState::Upload => render_upload_section(self, ctx),
            ViewState::Preview | ViewState::Loading => render_preview_area(self, ctx),
            ViewState::Results => render_results(self, ctx),
        };

        html! {
            <div class="container">
                { render_header() }

                <main class="main-content">
                    { body }
                </main>

                <footer class="app-footer">
                    <p>{"NeuroScan AI | For educational purposes only. Not a medical diagnosis."}</p>
                </footer>

                { render_chat_widget(self, ctx) }
                { render_notifications(self, ctx) }
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("NeuroScan frontend starting");
    yew::Renderer::<Model>::new().render();
}
