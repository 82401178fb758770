//! High score service client (browser only)
//!
//! Thin `fetch` wrappers around `GET`/`POST /api/highscores`. Parsing and
//! ranking live in `highscores` so they can be tested natively.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::highscores::{Leaderboard, ScoreError, ScoreSubmission, parse_submit_response};

pub const HIGHSCORES_URL: &str = "/api/highscores";

fn js_error(context: &str, e: JsValue) -> ScoreError {
    ScoreError::Network(format!("{context}: {e:?}"))
}

async fn send(request: &Request) -> Result<Response, ScoreError> {
    let window = web_sys::window().ok_or_else(|| ScoreError::Network("window not available".into()))?;
    let value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(|e| js_error("fetch failed", e))?;
    value
        .dyn_into()
        .map_err(|_| ScoreError::Network("failed to cast fetch response".into()))
}

async fn body_text(response: &Response) -> Result<String, ScoreError> {
    let promise = response
        .text()
        .map_err(|e| js_error("response.text() failed", e))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| js_error("await response text failed", e))?
        .as_string()
        .ok_or_else(|| ScoreError::Decode("response text was not a string".into()))
}

/// Fetch and rank the global leaderboard
pub async fn fetch_leaderboard(limit: usize) -> Result<Leaderboard, ScoreError> {
    let request = Request::new_with_str(HIGHSCORES_URL).map_err(|e| js_error("bad request", e))?;
    let response = send(&request).await?;
    if !response.ok() {
        return Err(ScoreError::Http {
            status: response.status(),
        });
    }
    let text = body_text(&response).await?;
    Leaderboard::from_json(&text, limit)
}

/// One submission attempt; retries are scheduled by the caller
pub async fn post_score(submission: &ScoreSubmission) -> Result<(), ScoreError> {
    let body = submission.to_json()?;

    let headers = Headers::new().map_err(|e| js_error("headers", e))?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|e| js_error("headers", e))?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&body));

    let request =
        Request::new_with_str_and_init(HIGHSCORES_URL, &init).map_err(|e| js_error("bad request", e))?;
    let response = send(&request).await?;
    let status = response.status();
    // Error statuses may carry no JSON body at all
    let text = if response.ok() {
        body_text(&response).await?
    } else {
        String::new()
    };
    parse_submit_response(status, &text)
}
