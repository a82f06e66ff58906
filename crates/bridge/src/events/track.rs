//! Browser tracking endpoints.
//!
//! These carry the cookie-gated flows the storefront drives directly: the
//! one-per-hour started-checkout gate, the viewed-product pusher, and the
//! one-shot identify after login. The Omnisend contact id cookie is set by
//! the Omnisend client library itself; the bridge only reads it.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use time::Duration;

use crate::error::ApiError;
use crate::omnisend::types::SOURCE_TAG;
use crate::snippet;
use crate::state::AppState;
use crate::transform::{checkout, product};

/// Cookie set by the Omnisend client library once it knows the contact.
pub const CONTACT_ID_COOKIE: &str = "omnisendContactID";

/// Gate cookie for the started-checkout event: "1" armed, "0" spent.
pub const CHECKOUT_EVENT_COOKIE: &str = "omnisend-sc-checkout-event";

const CHECKOUT_COOKIE_TTL: Duration = Duration::hours(1);

fn checkout_gate_cookie(value: &'static str) -> Cookie<'static> {
    Cookie::build((CHECKOUT_EVENT_COOKIE, value))
        .path("/")
        .max_age(CHECKOUT_COOKIE_TTL)
        .same_site(SameSite::Lax)
        .build()
}

fn contact_id(jar: &CookieJar) -> Option<String> {
    jar.get(CONTACT_ID_COOKIE).map(|c| c.value().to_owned())
}

/// `GET /track/checkout-view`
///
/// Arms the started-checkout gate when it is not already armed. Called on
/// every storefront page view; re-arming an armed gate would reset its
/// expiry, so that case is a no-op.
pub async fn checkout_view(jar: CookieJar) -> (CookieJar, StatusCode) {
    if jar.get(CHECKOUT_EVENT_COOKIE).is_some_and(|c| c.value() == "1") {
        return (jar, StatusCode::NO_CONTENT);
    }

    (jar.add(checkout_gate_cookie("1")), StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct CheckoutStartedRequest {
    pub checkout_id: String,
}

/// `POST /track/checkout-started`
///
/// Fires the started-checkout event at most once per armed gate: the gate
/// is spent before the upstream call, so retries within the hour stay
/// silent.
///
/// # Errors
///
/// Returns [`ApiError`] when the checkout cannot be fetched.
pub async fn checkout_started(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<CheckoutStartedRequest>,
) -> Result<(CookieJar, StatusCode), ApiError> {
    if !jar.get(CHECKOUT_EVENT_COOKIE).is_some_and(|c| c.value() == "1") {
        return Ok((jar, StatusCode::NO_CONTENT));
    }

    let jar = jar.add(checkout_gate_cookie("0"));

    let fetched = state
        .surecart()
        .get_checkout(&request.checkout_id)
        .await
        .map_err(|err| ApiError::Upstream(err.to_string()))?;

    let Some(fetched) = fetched else {
        return Ok((jar, StatusCode::NO_CONTENT));
    };

    let cookie_id = contact_id(&jar);
    match checkout::transform_checkout(&fetched, cookie_id.as_deref()) {
        Ok(Some(event)) => {
            if let Err(err) = state.omnisend().send_event(&event).await {
                tracing::warn!(checkout_id = %request.checkout_id, error = %err, "started checkout send failed");
            }
        }
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(checkout_id = %request.checkout_id, error = %err, "checkout transform failed");
        }
    }

    Ok((jar, StatusCode::NO_CONTENT))
}

#[derive(Debug, Deserialize)]
pub struct ProductViewedQuery {
    pub product_id: String,
}

/// `GET /track/product-viewed.js?product_id=...`
///
/// Returns the event pusher script for the viewed product, or an empty
/// script when the viewer is not a known contact yet. The event rides the
/// client library rather than the server API so it lands in the browser
/// session.
pub async fn product_viewed(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<ProductViewedQuery>,
) -> Response {
    let Some(cookie_id) = contact_id(&jar) else {
        return js_response(String::new());
    };

    let fetched = match state.surecart().get_product(&query.product_id).await {
        Ok(Some(fetched)) => fetched,
        Ok(None) => return js_response(String::new()),
        Err(err) => {
            tracing::warn!(product_id = %query.product_id, error = %err, "product fetch failed");
            return js_response(String::new());
        }
    };

    let payload = json!([
        "track",
        "viewed product",
        {
            "origin": "api",
            "eventVersion": "v4",
            "contact": { "id": cookie_id, "tags": [SOURCE_TAG] },
            "properties": product::viewed_product_event(&fetched),
        }
    ]);

    js_response(snippet::render_event_pusher(&payload))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
    pub email: String,
}

/// `POST /track/login`
///
/// Arms the one-shot identify flag for the user. The next identify script
/// request will emit the contact identifiers and clear the flag.
///
/// # Errors
///
/// Returns [`ApiError`] when the flag cannot be persisted.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .settings()
        .set_identify_flag(&request.user_id, &request.email)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct IdentifyQuery {
    pub user_id: String,
}

/// `GET /track/identify.js?user_id=...`
///
/// One-shot: the armed flag is consumed atomically, so concurrent page
/// loads yield the script at most once.
///
/// # Errors
///
/// Returns [`ApiError`] when the flag cannot be read.
pub async fn identify(
    State(state): State<AppState>,
    Query(query): Query<IdentifyQuery>,
) -> Result<Response, ApiError> {
    let Some(email) = state.settings().take_identify_flag(&query.user_id).await? else {
        return Ok(js_response(String::new()));
    };

    let identifiers = json!({ "email": email });
    Ok(js_response(snippet::render_identify(&identifiers)))
}

fn js_response(body: String) -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_cookie_is_scoped_and_expiring() {
        let cookie = checkout_gate_cookie("1");
        assert_eq!(cookie.name(), CHECKOUT_EVENT_COOKIE);
        assert_eq!(cookie.value(), "1");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(CHECKOUT_COOKIE_TTL));
    }

    #[tokio::test]
    async fn checkout_view_arms_unset_gate() {
        let (jar, status) = checkout_view(CookieJar::new()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(
            jar.get(CHECKOUT_EVENT_COOKIE).map(Cookie::value),
            Some("1")
        );
    }

    #[tokio::test]
    async fn checkout_view_leaves_armed_gate_alone() {
        let jar = CookieJar::new().add(checkout_gate_cookie("1"));
        let (jar, _) = checkout_view(jar).await;
        assert_eq!(
            jar.get(CHECKOUT_EVENT_COOKIE).map(Cookie::value),
            Some("1")
        );
    }

    #[tokio::test]
    async fn checkout_view_rearms_spent_gate() {
        let jar = CookieJar::new().add(checkout_gate_cookie("0"));
        let (jar, _) = checkout_view(jar).await;
        assert_eq!(
            jar.get(CHECKOUT_EVENT_COOKIE).map(Cookie::value),
            Some("1")
        );
    }
}
