use super::super::{Model, Msg};
use super::utils::debounce;
use shared::RankedClass;
use yew::prelude::*;

pub fn render_results(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(result) = model.upload.result() else {
        return html! { <p class="no-results-message">{"No analysis result available."}</p> };
    };

    let class = result.class();
    let analyzed_filename = model
        .upload
        .selected()
        .map_or_else(|| "Analyzed Image".to_string(), |file| file.name().to_string());
    let link = ctx.link().clone();

    html! {
        <div class={classes!("results-container", class.style_class())}>
            <div class="result-header">
                {
                    match &model.preview_url {
                        Some(url) => html! { <img class="result-thumbnail" src={url.to_string()} alt={analyzed_filename.clone()} /> },
                        None => html! {},
                    }
                }
                <h2 title={format!("Analysis results for: {}", analyzed_filename)}>
                    <i class={class.icon()}></i>{" "}{ result.label() }
                </h2>
                <div class="confidence-meter">
                    <div class="meter-label">{"Confidence:"}</div>
                    <div class="meter-value">{ result.confidence_percent_text() }</div>
                </div>
                <p class="result-description">{ class.description() }</p>
            </div>
            <div class="detailed-results">
                <h3>{"Probability Distribution"}</h3>
                <div class="result-bars">
                    { for result.ranked().iter().map(|ranked| render_bar(ranked, model.bars_revealed)) }
                </div>
            </div>
            <p class="disclaimer">
                <i class="fa-solid fa-triangle-exclamation"></i>
                {" This tool is for educational purposes only and is not a substitute for professional medical diagnosis."}
            </p>
            <div class="button-container">
                <button
                    id="new-analysis-btn"
                    class="analyze-btn"
                    onclick={debounce(300, move || link.send_message(Msg::ResetUpload))}
                >
                    <i class="fa-solid fa-rotate-left"></i>{" New Analysis"}
                </button>
            </div>
        </div>
    }
}

fn render_bar(ranked: &RankedClass, revealed: bool) -> Html {
    html! {
        <div class="result-item">
            <div class="result-label">
                <i class={ranked.class.icon()}></i>{" "}{ &ranked.label }
            </div>
            <div class="result-bar-container">
                <div
                    class={classes!("result-bar", ranked.class.style_class())}
                    style={ranked.width_style(revealed)}
                ></div>
            </div>
            <div class="result-value">{ ranked.percent_text() }</div>
        </div>
    }
}
