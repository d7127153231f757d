use super::super::{Model, Msg};
use super::utils::debounce;
use shared::ViewState;
use yew::prelude::*;

pub fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(file) = model.upload.selected() else {
        return html! {};
    };

    let loading = model.upload.view() == ViewState::Loading;
    let link = ctx.link().clone();

    html! {
        <div id="preview-container" class={classes!(loading.then_some("is-loading"))}>
            <div class="image-preview">
                {
                    match &model.preview_url {
                        Some(url) => html! {
                            <img id="actual-image-preview" src={url.to_string()} alt={file.name().to_string()} />
                        },
                        None => html! {
                            <div class="preview-placeholder">
                                <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
                                <p>{"Loading preview..."}</p>
                            </div>
                        },
                    }
                }
                { render_loading_overlay(loading) }
            </div>

            <div class="file-info">
                <span class="file-name" title={file.name().to_string()}>
                    <i class="fa-solid fa-file-image"></i>{" "}{ file.name() }
                </span>
                <span class="file-size">{ file.size_text() }</span>
            </div>

            <div class="button-container">
                <button
                    id="clear-btn"
                    class="analyze-btn"
                    style="background-color: var(--clear-color);"
                    disabled={loading}
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::ResetUpload)
                    })}
                >
                    <i class="fa-solid fa-trash"></i>{" Remove"}
                </button>
                <button
                    id="analyze-btn"
                    class="analyze-btn"
                    disabled={loading}
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Analyze)
                    })}
                >
                    { render_analyze_button_content(loading) }
                </button>
            </div>
        </div>
    }
}

fn render_loading_overlay(loading: bool) -> Html {
    if !loading {
        return html! {};
    }
    html! {
        <div class="loading-overlay">
            <div class="scan-line"></div>
            <p>{"Analyzing MRI scan..."}</p>
        </div>
    }
}

fn render_analyze_button_content(loading: bool) -> Html {
    if loading {
        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> }
    } else {
        html! { <><i class="fa-solid fa-magnifying-glass"></i>{" Analyze Scan"}</> }
    }
}
