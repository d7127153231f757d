//! Floating assistant window. Message text is rendered from fragments, so
//! anything the service returns is displayed as literal text.

use super::super::{Model, Msg};
use shared::chat::{format_message, Fragment};
use shared::{ChatMessage, Sender};
use web_sys::{HtmlInputElement, KeyboardEvent};
use yew::prelude::*;

pub fn render_chat_widget(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let open = model.chat.is_open();

    html! {
        <div class={classes!("chat-widget", open.then_some("open"))}>
            <button
                id="chat-toggle"
                class="chat-toggle"
                title={ if open { "Close assistant" } else { "Ask the assistant" } }
                onclick={link.callback(|_| Msg::ToggleChat)}
            >
                <i class={ if open { "fa-solid fa-xmark" } else { "fa-solid fa-comment-medical" } }></i>
            </button>
            { if open { render_chat_window(model, ctx) } else { html! {} } }
        </div>
    }
}

fn render_chat_window(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let pending = model.chat.is_pending();

    let handle_input = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::ChatInput(input.value())
    });
    let handle_keypress = link.batch_callback(|e: KeyboardEvent| {
        (e.key() == "Enter" && !e.shift_key()).then(|| {
            e.prevent_default();
            Msg::SendChat
        })
    });

    html! {
        <div class="chat-window">
            <div class="chat-header">
                <i class="fa-solid fa-user-doctor"></i>
                <span>{"NeuroScan Assistant"}</span>
            </div>
            <div class="chat-messages" ref={model.chat_log_ref.clone()}>
                { if model.chat.messages().is_empty() { render_welcome() } else { html! {} } }
                { for model.chat.messages().iter().map(render_message) }
                { if pending { render_typing_indicator() } else { html! {} } }
            </div>
            <div class="chat-input-row">
                <input
                    type="text"
                    id="chat-input"
                    placeholder="Ask about brain tumors or MRI scans..."
                    ref={model.chat_input_ref.clone()}
                    value={model.chat.draft().to_string()}
                    disabled={pending}
                    oninput={handle_input}
                    onkeypress={handle_keypress}
                />
                <button
                    id="chat-send"
                    class="chat-send"
                    disabled={pending}
                    onclick={link.callback(|_| Msg::SendChat)}
                >
                    <i class="fa-solid fa-paper-plane"></i>
                </button>
            </div>
        </div>
    }
}

fn render_welcome() -> Html {
    html! {
        <div class="chat-message assistant">
            <p>{"Hello! I can answer questions about brain tumors and MRI imaging. I provide educational information only."}</p>
        </div>
    }
}

fn render_message(message: &ChatMessage) -> Html {
    let sender = match message.sender {
        Sender::User => "user",
        Sender::Assistant => "assistant",
    };

    html! {
        <div class={classes!("chat-message", sender)}>
            <p>{ for format_message(&message.text).into_iter().map(render_fragment) }</p>
        </div>
    }
}

fn render_fragment(fragment: Fragment) -> Html {
    match fragment {
        Fragment::Text(text) => html! { <>{ text }</> },
        Fragment::Strong(text) => html! { <strong>{ text }</strong> },
        Fragment::LineBreak => html! { <br /> },
    }
}

fn render_typing_indicator() -> Html {
    html! {
        <div class="chat-message assistant typing-indicator">
            <span></span><span></span><span></span>
        </div>
    }
}
