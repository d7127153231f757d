use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::guard::{self, GuardContext};
use actix_web::error::JsonPayloadError;
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::{StreamExt, TryStreamExt};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use shared::{ChatResponse, MAX_UPLOAD_BYTES};
use std::time::Duration;

use crate::chat::{ChatError, ChatResponder};
use crate::classifier::{self, Classifier};
use crate::config::AppConfig;
use crate::error::ApiError;

#[derive(Deserialize)]
struct PredictBody {
    image: Option<String>,
}

#[derive(Deserialize)]
struct ChatBody {
    #[serde(default)]
    message: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub demo_mode: bool,
    pub model_loaded: bool,
    pub chatbot_configured: bool,
}

/// Largest JSON body: a base64 data URI of a maximum-size image.
fn json_limit() -> usize {
    (MAX_UPLOAD_BYTES as usize).div_ceil(3) * 4 + 4096
}

fn is_multipart(ctx: &GuardContext) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

/// The JSON API. Kept apart from static hosting so tests can mount it alone.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .limit(json_limit())
        .error_handler(|err, _req| json_error(err).into());

    cfg.app_data(json_config)
        .service(
            web::resource("/predict")
                .route(web::post().guard(guard::fn_guard(is_multipart)).to(predict_multipart))
                .route(web::post().to(predict_json)),
        )
        .service(web::resource("/chat").route(web::post().to(chat)))
        .service(web::resource("/health").route(web::get().to(health)));
}

fn json_error(err: JsonPayloadError) -> ApiError {
    match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            ApiError::PayloadTooLarge
        }
        other => ApiError::BadRequest(format!("Invalid JSON body: {}", other)),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: String) {
    configure_api(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

/// Accepts a data URI or bare base64; only the text after the first comma
/// is decoded.
fn decode_image_field(image: &str) -> Result<Vec<u8>, ApiError> {
    let encoded = image.split_once(',').map_or(image, |(_, data)| data);
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| ApiError::BadRequest(format!("Invalid base64 image data: {}", e)))
}

async fn predict_json(
    config: web::Data<AppConfig>,
    classifier: web::Data<dyn Classifier>,
    body: web::Json<PredictBody>,
) -> Result<HttpResponse, ApiError> {
    let image = body
        .into_inner()
        .image
        .ok_or_else(|| ApiError::BadRequest("No image provided".into()))?;
    let bytes = decode_image_field(&image)?;
    run_prediction(&config, classifier.into_inner(), bytes).await
}

async fn predict_multipart(
    config: web::Data<AppConfig>,
    classifier: web::Data<dyn Classifier>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let mut image: Option<Vec<u8>> = None;

    while let Some(mut field) = payload.try_next().await? {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        if filename.is_empty() {
            return Err(ApiError::BadRequest("No image selected".into()));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if (data.len() + chunk.len()) as u64 > MAX_UPLOAD_BYTES {
                return Err(ApiError::PayloadTooLarge);
            }
            data.extend_from_slice(&chunk);
        }
        image = Some(data);
        break;
    }

    let bytes = image.ok_or_else(|| ApiError::BadRequest("No image provided".into()))?;
    run_prediction(&config, classifier.into_inner(), bytes).await
}

async fn run_prediction(
    config: &AppConfig,
    classifier: std::sync::Arc<dyn Classifier>,
    bytes: Vec<u8>,
) -> Result<HttpResponse, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("No image selected".into()));
    }
    if bytes.len() as u64 > MAX_UPLOAD_BYTES {
        return Err(ApiError::PayloadTooLarge);
    }

    let simulated = classifier.is_simulated();
    if simulated && config.demo_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(config.demo_delay_ms)).await;
    }

    let size = bytes.len();
    let response = web::block(move || classifier::predict(classifier.as_ref(), &bytes))
        .await?
        .map_err(|e| {
            error!("Prediction failed: {}", e);
            ApiError::from(e)
        })?
        .with_demo_mode(simulated);

    info!(
        "Predicted {} ({:.2}%) for {} byte image",
        response.prediction.as_deref().unwrap_or("?"),
        response.confidence.unwrap_or_default(),
        size
    );
    Ok(HttpResponse::Ok().json(response))
}

async fn chat(
    responder: web::Data<dyn ChatResponder>,
    body: web::Json<ChatBody>,
) -> Result<HttpResponse, ApiError> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("No message provided".into()));
    }

    if !responder.is_configured() {
        warn!("Chat request received but no API key is configured");
        return Ok(HttpResponse::Ok().json(ChatError::NotConfigured.to_response()));
    }

    let body = match responder.reply(message).await {
        Ok(text) => ChatResponse::reply(text),
        Err(e) => {
            error!("Chat request failed: {}", e);
            e.to_response()
        }
    };
    Ok(HttpResponse::Ok().json(body))
}

async fn health(
    config: web::Data<AppConfig>,
    classifier: web::Data<dyn Classifier>,
) -> HttpResponse {
    let simulated = classifier.is_simulated();
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        demo_mode: simulated,
        model_loaded: !simulated,
        chatbot_configured: config.chatbot_configured(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::DemoClassifier;
    use actix_web::body::MessageBody;
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::test as atest;
    use actix_web::App;
    use async_trait::async_trait;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use shared::analysis::interpret_response;
    use shared::chat::interpret_reply;
    use std::io::Cursor;
    use std::sync::Arc;

    struct StubResponder {
        configured: bool,
        outcome: fn() -> Result<String, ChatError>,
    }

    #[async_trait]
    impl ChatResponder for StubResponder {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn reply(&self, message: &str) -> Result<String, ChatError> {
            (self.outcome)().map(|text| format!("{} ({})", text, message))
        }
    }

    fn png_bytes() -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(12, 12))
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    macro_rules! app_with {
        ($responder:expr) => {{
            let config = AppConfig {
                demo_delay_ms: 0,
                ..AppConfig::default()
            };
            let classifier: Arc<dyn Classifier> = Arc::new(DemoClassifier::new());
            let responder: Arc<dyn ChatResponder> = Arc::new($responder);
            atest::init_service(
                App::new()
                    .app_data(web::Data::new(config))
                    .app_data(web::Data::from(classifier))
                    .app_data(web::Data::from(responder))
                    .configure(configure_api),
            )
            .await
        }};
    }

    fn echo_responder() -> StubResponder {
        StubResponder {
            configured: true,
            outcome: || Ok("Gliomas start in glial cells".to_string()),
        }
    }

    fn multipart_request(filename: &str, data: &[u8]) -> atest::TestRequest {
        let mut payload = Vec::new();
        payload.extend_from_slice(
            format!(
                "--XBOUNDARY\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                filename
            )
            .as_bytes(),
        );
        payload.extend_from_slice(data);
        payload.extend_from_slice(b"\r\n--XBOUNDARY--\r\n");

        atest::TestRequest::post()
            .uri("/predict")
            .insert_header((header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY"))
            .set_payload(payload)
    }

    async fn body_text(resp: ServiceResponse<impl MessageBody>) -> (u16, String) {
        let status = resp.status().as_u16();
        let bytes = atest::read_body(resp).await;
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[actix_web::test]
    async fn test_predict_json_data_uri() {
        let app = app_with!(echo_responder());
        let image = shared::analysis::encode_data_uri("image/png", &png_bytes());
        let req = atest::TestRequest::post()
            .uri("/predict")
            .set_json(serde_json::json!({ "image": image }))
            .to_request();
        let (status, body) = body_text(atest::call_service(&app, req).await).await;
        assert_eq!(status, 200);

        let result = interpret_response(status, &body).unwrap();
        assert_eq!(result.probabilities().len(), 4);
        assert!(body.contains("\"demo_mode\":true"));
        assert_eq!(result.ranked()[0].label, result.label());
    }

    #[actix_web::test]
    async fn test_predict_accepts_bare_base64() {
        let app = app_with!(echo_responder());
        let req = atest::TestRequest::post()
            .uri("/predict")
            .set_json(serde_json::json!({ "image": STANDARD.encode(png_bytes()) }))
            .to_request();
        let resp = atest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_predict_multipart_upload() {
        let app = app_with!(echo_responder());
        let req = multipart_request("scan.png", &png_bytes()).to_request();
        let (status, body) = body_text(atest::call_service(&app, req).await).await;
        assert_eq!(status, 200, "{}", body);
        assert!(interpret_response(status, &body).is_ok());
    }

    #[actix_web::test]
    async fn test_predict_missing_image() {
        let app = app_with!(echo_responder());
        let req = atest::TestRequest::post()
            .uri("/predict")
            .set_json(serde_json::json!({}))
            .to_request();
        let (status, body) = body_text(atest::call_service(&app, req).await).await;
        assert_eq!(status, 400);
        assert_eq!(
            interpret_response(status, &body),
            Err(shared::RequestError::Service("No image provided".into()))
        );
    }

    #[actix_web::test]
    async fn test_predict_rejects_non_image_content() {
        let app = app_with!(echo_responder());
        let image = shared::analysis::encode_data_uri("image/png", b"definitely not a png");
        let req = atest::TestRequest::post()
            .uri("/predict")
            .set_json(serde_json::json!({ "image": image }))
            .to_request();
        let (status, body) = body_text(atest::call_service(&app, req).await).await;
        assert_eq!(status, 400);
        assert!(body.contains("Unsupported image format"));
    }

    #[actix_web::test]
    async fn test_predict_rejects_bad_base64() {
        let app = app_with!(echo_responder());
        let req = atest::TestRequest::post()
            .uri("/predict")
            .set_json(serde_json::json!({ "image": "data:image/png;base64,@@@@" }))
            .to_request();
        let resp = atest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_predict_oversize_json_is_payload_too_large() {
        let app = app_with!(echo_responder());
        let image = format!("data:image/png;base64,{}", "A".repeat(json_limit() + 1));
        let req = atest::TestRequest::post()
            .uri("/predict")
            .set_json(serde_json::json!({ "image": image }))
            .to_request();
        let (status, body) = body_text(atest::call_service(&app, req).await).await;
        assert_eq!(status, 413);
        assert!(body.contains("16MB"), "{}", body);
    }

    #[actix_web::test]
    async fn test_predict_oversize_multipart_is_payload_too_large() {
        let app = app_with!(echo_responder());
        let data = vec![0u8; MAX_UPLOAD_BYTES as usize + 1];
        let req = multipart_request("huge.png", &data).to_request();
        let resp = atest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[actix_web::test]
    async fn test_predict_multipart_without_filename() {
        let app = app_with!(echo_responder());
        let req = multipart_request("", &png_bytes()).to_request();
        let (status, body) = body_text(atest::call_service(&app, req).await).await;
        assert_eq!(status, 400);
        assert_eq!(
            interpret_response(status, &body),
            Err(shared::RequestError::Service("No image selected".into()))
        );
    }

    #[actix_web::test]
    async fn test_chat_round_trip() {
        let app = app_with!(echo_responder());
        let req = atest::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({ "message": "  what is a glioma?  " }))
            .to_request();
        let (status, body) = body_text(atest::call_service(&app, req).await).await;
        assert_eq!(status, 200);
        assert_eq!(
            interpret_reply(status, &body),
            Ok("Gliomas start in glial cells (what is a glioma?)".to_string())
        );
    }

    #[actix_web::test]
    async fn test_chat_empty_message() {
        let app = app_with!(echo_responder());
        let req = atest::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({ "message": "   " }))
            .to_request();
        let (status, body) = body_text(atest::call_service(&app, req).await).await;
        assert_eq!(status, 400);
        assert_eq!(
            interpret_reply(status, &body),
            Err(shared::RequestError::Service("No message provided".into()))
        );
    }

    #[actix_web::test]
    async fn test_chat_not_configured() {
        let app = app_with!(StubResponder {
            configured: false,
            outcome: || Ok(String::new()),
        });
        let req = atest::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({ "message": "hello" }))
            .to_request();
        let resp: ChatResponse = atest::call_and_read_body_json(&app, req).await;
        assert!(resp.error.unwrap().contains("OPENROUTER_API_KEY"));
        assert!(resp.response.unwrap().contains("not configured"));
    }

    #[actix_web::test]
    async fn test_chat_upstream_timeout() {
        let app = app_with!(StubResponder {
            configured: true,
            outcome: || Err(ChatError::Timeout),
        });
        let req = atest::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({ "message": "hello" }))
            .to_request();
        let resp: ChatResponse = atest::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.error.as_deref(), Some("Request timeout"));
        assert_eq!(resp.response.as_deref(), Some("The request took too long. Please try again."));
    }

    #[actix_web::test]
    async fn test_health_reports_demo_mode() {
        let app = app_with!(echo_responder());
        let req = atest::TestRequest::get().uri("/health").to_request();
        let resp: HealthResponse = atest::call_and_read_body_json(&app, req).await;
        assert_eq!(
            resp,
            HealthResponse {
                status: "healthy".to_string(),
                demo_mode: true,
                model_loaded: false,
                chatbot_configured: false,
            }
        );
    }

    #[test]
    fn test_decode_image_field() {
        assert_eq!(decode_image_field("data:image/png;base64,AQID").unwrap(), vec![1, 2, 3]);
        assert_eq!(decode_image_field("AQID").unwrap(), vec![1, 2, 3]);
        assert!(decode_image_field("data:image/png;base64,***").is_err());
    }

    #[test]
    fn test_json_limit_fits_largest_upload() {
        let encoded_len = shared::analysis::encode_data_uri("image/webp", &[]).len()
            + (MAX_UPLOAD_BYTES as usize).div_ceil(3) * 4;
        assert!(json_limit() >= encoded_len);
    }
}
