//! HTTP surface: the prediction page plus a small JSON API.
//!
//! ## Endpoints
//!
//! - `GET /` - Form for the selected case (`?case=N&nav=next|prev`)
//! - `POST /predict` - Form submission; renders verdict and input echo
//! - `POST /api/predict` - JSON prediction
//! - `GET /health` - Health check
//!
//! The cycler index travels with the page (query string and a hidden form
//! field). The server holds only the read-only predictor.

use crate::config::ServerConfig;
use crate::cycler::{Direction, ExampleCycler};
use crate::error::{Result, WineError};
use crate::features::FeatureRecord;
use crate::form::{InputForm, DISPLAY_PRECISION};
use crate::predictor::{Prediction, Predictor, Verdict};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    predictor: Predictor,
}

impl AppState {
    #[must_use]
    pub fn new(predictor: Predictor) -> Self {
        Self { predictor }
    }
}

/// Page query: current case and optional navigation.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub case: Option<usize>,
    pub nav: Option<String>,
}

/// JSON prediction request.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Eleven values in model input order
    pub features: Vec<f64>,
}

/// JSON prediction response.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub verdict: String,
    pub label: String,
    /// Values used, keyed by feature in model input order
    pub features: FeatureRecord,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Create the router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route("/predict", post(predict_form_handler))
        .route("/api/predict", post(predict_json_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Load artifacts, bind, and serve until the process is stopped.
///
/// # Errors
///
/// Returns an error if the artifacts cannot be loaded or the address
/// cannot be bound.
pub async fn serve(config: &ServerConfig) -> Result<()> {
    let predictor = Predictor::load(&config.artifacts.scaler, &config.artifacts.model)?;
    let app = create_router(AppState::new(predictor));

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| WineError::Server(format!("failed to bind {addr}: {e}")))?;
    log::info!("listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| WineError::Server(e.to_string()))
}

async fn page_handler(Query(query): Query<PageQuery>) -> Html<String> {
    let mut cycler = ExampleCycler::with_index(query.case.unwrap_or(0));
    if let Some(nav) = query.nav.as_deref() {
        match nav.parse::<Direction>() {
            Ok(direction) => {
                cycler.advance(direction);
            }
            Err(e) => log::warn!("ignoring navigation: {e}"),
        }
    }
    let form = InputForm::from_case(cycler.current());
    Html(render_page(&cycler, &form, None))
}

async fn predict_form_handler(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Html<String> {
    let case = fields
        .iter()
        .find(|(name, _)| name == "case")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(0);
    let cycler = ExampleCycler::with_index(case);

    let mut form = InputForm::from_case(cycler.current());
    let submitted = fields
        .iter()
        .filter(|(name, _)| name != "case")
        .map(|(name, value)| (name.as_str(), value.as_str()));

    let outcome = form
        .apply_submission(submitted)
        .and_then(|()| {
            let features = form.collect();
            let verdict = state.predictor.predict(&features)?;
            Ok(Prediction { verdict, features })
        });

    let outcome = match outcome {
        Ok(prediction) => {
            log::info!("case {} -> {}", cycler.index() + 1, prediction.verdict);
            Ok(prediction)
        }
        Err(e) => {
            log::warn!("prediction failed: {e}");
            Err(e.to_string())
        }
    };

    Html(render_page(&cycler, &form, Some(&outcome)))
}

async fn predict_json_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> std::result::Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        log::warn!("api request rejected: {rejection}");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: rejection.body_text(),
            }),
        )
    })?;

    let prediction = state.predictor.predict_values(&request.features).map_err(|e| {
        let status = if e.is_input_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        log::warn!("api prediction failed: {e}");
        (
            status,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    Ok(Json(PredictResponse {
        verdict: match prediction.verdict {
            Verdict::Good => "good".to_string(),
            Verdict::Bad => "bad".to_string(),
        },
        label: prediction.verdict.label().to_string(),
        features: prediction.features,
    }))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
    })
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_echo(out: &mut String, record: &FeatureRecord) {
    out.push_str("<h3>Input Data Used:</h3>\n<table>\n");
    for (feature, value) in record.iter() {
        let _ = writeln!(
            out,
            "<tr><th>{}</th><td>{value}</td></tr>",
            escape_html(feature.label())
        );
    }
    out.push_str("</table>\n");
}

/// Render the full page.
///
/// `outcome` is `None` before Predict is pressed, otherwise either the
/// prediction or the message to show in place of the verdict.
#[must_use]
pub fn render_page(
    cycler: &ExampleCycler,
    form: &InputForm,
    outcome: Option<&std::result::Result<Prediction, String>>,
) -> String {
    let index = cycler.index();
    let mut out = String::new();
    out.push_str(concat!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
        "<title>Wine Quality Prediction</title>\n</head>\n<body>\n",
        "<h1>Wine Quality Prediction</h1>\n",
        "<p>Predict whether a wine is <b>Good</b> or <b>Bad</b> based on its chemical properties. ",
        "Use <b>Next</b> or <b>Previous</b> to switch between wines or adjust values manually.</p>\n",
    ));

    let _ = writeln!(
        out,
        "<nav><a href=\"/?case={index}&amp;nav=prev\">Previous</a> \
         <span>Example {} of {}</span> \
         <a href=\"/?case={index}&amp;nav=next\">Next</a></nav>",
        cycler.current().number,
        crate::cases::CASE_COUNT,
    );

    out.push_str("<h3>Enter or Adjust Feature Values</h3>\n");
    out.push_str("<form method=\"post\" action=\"/predict\">\n");
    let _ = writeln!(out, "<input type=\"hidden\" name=\"case\" value=\"{index}\">");
    let step = format!("0.{}1", "0".repeat(DISPLAY_PRECISION - 1));
    for field in form.fields() {
        let key = field.feature.key();
        let _ = writeln!(
            out,
            "<label for=\"{key}\">{}</label> \
             <input type=\"number\" id=\"{key}\" name=\"{key}\" min=\"0\" step=\"{step}\" value=\"{}\"><br>",
            escape_html(&field.caption()),
            field.display_value(),
        );
    }
    out.push_str("<button type=\"submit\">Predict Quality</button>\n</form>\n");

    match outcome {
        Some(Ok(prediction)) => {
            let class = match prediction.verdict {
                Verdict::Good => "good",
                Verdict::Bad => "bad",
            };
            let _ = writeln!(
                out,
                "<p class=\"{class}\">This wine is predicted to be <b>{}</b>.</p>",
                prediction.verdict.label()
            );
            render_echo(&mut out, &prediction.features);
        }
        Some(Err(message)) => {
            let _ = writeln!(
                out,
                "<p class=\"error\">Cannot predict: {}</p>",
                escape_html(message)
            );
        }
        None => {}
    }

    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::artifacts::{ConstantClassifier, StandardScaler};
    use crate::features::{Feature, FEATURE_COUNT};
    use axum::{body::Body, http::Request};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app(label: usize) -> Router {
        let predictor = Predictor::new(
            Arc::new(StandardScaler::identity(FEATURE_COUNT)),
            Arc::new(ConstantClassifier::new(label)),
        )
        .unwrap();
        create_router(AppState::new(predictor))
    }

    async fn body_string(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    fn form_body(case: usize, overrides: &[(&str, &str)]) -> String {
        let mut parts = vec![format!("case={case}")];
        for (k, v) in overrides {
            parts.push(format!("{k}={v}"));
        }
        parts.join("&")
    }

    async fn post_json(app: Router, body: Vec<u8>) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predict")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn post_form(app: Router, body: String) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn test_render_page_without_outcome() {
        let cycler = ExampleCycler::new();
        let form = InputForm::from_case(cycler.current());
        let page = render_page(&cycler, &form, None);
        assert!(page.contains("Example 1 of 6"));
        assert!(page.contains("value=\"0.0650\""));
        assert!(page.contains("name=\"free_sulfur_dioxide\""));
        assert!(page.contains("step=\"0.0001\""));
        assert!(!page.contains("predicted to be"));
    }

    #[tokio::test]
    async fn test_page_defaults_to_first_case() {
        let response = create_test_app(1)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_string(response).await;
        assert!(page.contains("Example 1 of 6"));
        assert!(page.contains("value=\"7.3000\""));
    }

    #[tokio::test]
    async fn test_page_navigation_wraps() {
        let response = create_test_app(1)
            .oneshot(
                Request::builder()
                    .uri("/?case=0&nav=prev")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let page = body_string(response).await;
        assert!(page.contains("Example 6 of 6"));
        assert!(page.contains("value=\"103.0000\""));
        assert!(page.contains("name=\"case\" value=\"5\""));
    }

    #[tokio::test]
    async fn test_page_next() {
        let response = create_test_app(1)
            .oneshot(
                Request::builder()
                    .uri("/?case=2&nav=next")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let page = body_string(response).await;
        assert!(page.contains("Example 4 of 6"));
    }

    #[tokio::test]
    async fn test_form_predict_good() {
        let response = post_form(create_test_app(1), form_body(0, &[])).await;
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_string(response).await;
        assert!(page.contains("<b>Good Quality</b>"));
        assert!(page.contains("Input Data Used"));
        assert!(page.contains("<td>0.9946</td>"));
    }

    #[tokio::test]
    async fn test_form_predict_bad_with_edit() {
        let body = form_body(1, &[("alcohol", "12.25")]);
        let page = body_string(post_form(create_test_app(0), body).await).await;
        assert!(page.contains("<b>Bad Quality</b>"));
        assert!(page.contains("<td>12.25</td>"));
        assert!(page.contains("Example 2 of 6"));
    }

    #[tokio::test]
    async fn test_form_negative_value_shows_error() {
        let body = form_body(0, &[("ph", "-1")]);
        let page = body_string(post_form(create_test_app(1), body).await).await;
        assert!(page.contains("Cannot predict"));
        assert!(!page.contains("predicted to be"));
    }

    #[tokio::test]
    async fn test_form_unknown_field_shows_error() {
        let body = form_body(0, &[("colour", "%3Cred%3E")]);
        let page = body_string(post_form(create_test_app(1), body).await).await;
        assert!(page.contains("unknown feature: colour"));
    }

    #[tokio::test]
    async fn test_api_predict() {
        let request = PredictRequest {
            features: crate::cases::EXAMPLE_CASES[0].record.values().to_vec(),
        };
        let response = create_test_app(1)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/predict")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&request).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let result: PredictResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.verdict, "good");
        assert_eq!(result.label, "Good Quality");
        assert_eq!(result.features.get(Feature::Density), 0.9946);
    }

    #[tokio::test]
    async fn test_api_shape_mismatch() {
        let request = PredictRequest {
            features: vec![1.0, 2.0, 3.0],
        };
        let response = create_test_app(1)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/predict")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&request).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error.error.contains("expected 11 features, got 3"));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.0.status, "healthy");
        assert!(!response.0.version.is_empty());
    }

    #[tokio::test]
    async fn test_api_negative_value_is_bad_request() {
        let mut features = crate::cases::EXAMPLE_CASES[0].record.values().to_vec();
        features[Feature::PH.index()] = -3.39;
        let request = PredictRequest { features };
        let response = post_json(create_test_app(1), serde_json::to_vec(&request).unwrap()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(error.error.contains("must be >= 0.0"));
    }

    #[tokio::test]
    async fn test_api_malformed_json_is_bad_request() {
        let body = br#"{"features": [7.3, 0.65, 0.0, 1.2, 0.065, 15.0, 21.0, 0.9946, "x", 0.47, 10.0]}"#;
        let response = post_json(create_test_app(1), body.to_vec()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["content-type"], "application/json");

        let error: ErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(!error.error.is_empty());
    }

    #[tokio::test]
    async fn test_api_echo_keeps_model_order() {
        let request = PredictRequest {
            features: crate::cases::EXAMPLE_CASES[0].record.values().to_vec(),
        };
        let response = post_json(create_test_app(1), serde_json::to_vec(&request).unwrap()).await;
        let body = body_string(response).await;

        let first = body.find("\"fixed_acidity\"").unwrap();
        let last = body.find("\"alcohol\"").unwrap();
        assert!(first < last);
        assert!(body.find("\"density\"").unwrap() < body.find("\"ph\"").unwrap());
    }
}
