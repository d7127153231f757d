use gloo_net::http::Request;
use shared::analysis::interpret_response;
use shared::chat::interpret_reply;
use shared::{
    ChatRequest, PredictRequest, PredictionResult, RequestError, CHAT_ENDPOINT, PREDICT_ENDPOINT,
};

fn transport(err: gloo_net::Error) -> RequestError {
    RequestError::Transport(err.to_string())
}

/// POSTs `payload` as JSON and hands back the status and raw body, leaving
/// interpretation to the caller.
async fn post_json<T: serde::Serialize>(url: &str, payload: &T) -> Result<(u16, String), RequestError> {
    let response = Request::post(url)
        .json(payload)
        .map_err(transport)?
        .send()
        .await
        .map_err(transport)?;

    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    Ok((status, body))
}

pub async fn request_prediction(request: &PredictRequest) -> Result<PredictionResult, RequestError> {
    let (status, body) = post_json(PREDICT_ENDPOINT, request).await?;
    log::debug!("Prediction response status {}", status);
    interpret_response(status, &body)
}

pub async fn request_chat_reply(request: &ChatRequest) -> Result<String, RequestError> {
    let (status, body) = post_json(CHAT_ENDPOINT, request).await?;
    log::debug!("Chat response status {}", status);
    interpret_reply(status, &body)
}
