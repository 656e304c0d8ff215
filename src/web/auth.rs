use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{error, info};

use super::AppState;
use crate::components::auth::Provider;
use crate::error::{oauth_error, AppResult};

/// Query of an OAuth callback. Everything is optional so a malformed callback still
/// ends on the login page instead of a rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

fn to_login() -> Response {
    Redirect::to("/login").into_response()
}

/// Start the Google flow
pub async fn begin_google_auth(State(state): State<AppState>, jar: CookieJar) -> Response {
    match begin_login(&state, jar, Provider::Google).await {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to start Google sign-in: {}", e);
            to_login()
        }
    }
}

/// Google redirects back here with `code` and `state`
pub async fn complete_google_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Response {
    match complete_login(&state, jar, params, Provider::Google).await {
        Ok(response) => response,
        Err(e) => {
            error!("Error during Google authentication callback: {}", e);
            to_login()
        }
    }
}

/// Start the Microsoft flow
pub async fn begin_microsoft_auth(State(state): State<AppState>, jar: CookieJar) -> Response {
    if state.microsoft.is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }

    match begin_login(&state, jar, Provider::Microsoft).await {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to start Microsoft sign-in: {}", e);
            to_login()
        }
    }
}

/// Microsoft redirects back here with `code` and `state`
pub async fn complete_microsoft_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Response {
    if state.microsoft.is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }

    match complete_login(&state, jar, params, Provider::Microsoft).await {
        Ok(response) => response,
        Err(e) => {
            error!("Error during Microsoft authentication callback: {}", e);
            to_login()
        }
    }
}

async fn begin_login(state: &AppState, jar: CookieJar, provider: Provider) -> AppResult<Response> {
    let mut session = state.sessions.current_or_new(&jar).await?;
    let csrf_state = session.begin_login(provider);

    let url = match provider {
        Provider::Google => state.google.authorization_url(&csrf_state),
        Provider::Microsoft => {
            let microsoft = state
                .microsoft
                .as_ref()
                .ok_or_else(|| oauth_error("Microsoft sign-in is not configured"))?;
            microsoft.authorization_url(&csrf_state).await?
        }
    };

    let jar = state.sessions.persist(jar, &session).await?;
    Ok((jar, Redirect::to(url.as_str())).into_response())
}

async fn complete_login(
    state: &AppState,
    jar: CookieJar,
    params: CallbackParams,
    provider: Provider,
) -> AppResult<Response> {
    if let Some(error) = params.error {
        return Err(oauth_error(&format!("Provider returned error: {}", error)));
    }
    let code = params
        .code
        .ok_or_else(|| oauth_error("Missing authorization code"))?;
    let csrf_state = params.state.unwrap_or_default();

    let session = state
        .sessions
        .current(&jar)
        .await?
        .ok_or_else(|| oauth_error("Callback without a session"))?;

    if !session.expects_callback(provider, &csrf_state) {
        return Err(oauth_error("Callback state does not match the session"));
    }

    let credentials = match provider {
        Provider::Google => state.google.exchange_code(&code).await?,
        Provider::Microsoft => {
            let microsoft = state
                .microsoft
                .as_ref()
                .ok_or_else(|| oauth_error("Microsoft sign-in is not configured"))?;
            microsoft.complete(&code).await?
        }
    };

    // The pre-login id was handed out before authentication; never reuse it
    let (jar, session) = state.sessions.sign_in(jar, &session, credentials).await?;
    info!("Session {} signed in with {:?}", session.id, provider);

    Ok((jar, Redirect::to("/schedule")).into_response())
}
