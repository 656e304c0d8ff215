use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, warn};

use super::views::{IndexTemplate, LoginTemplate};
use super::AppState;
use crate::components::auth::Credentials;
use crate::components::google_calendar::sync_schedule;
use crate::components::session::Session;
use crate::error::AppResult;

fn to_login() -> Response {
    Redirect::to("/login").into_response()
}

/// Handler for `/` and `/login`
pub async fn login_handler(State(state): State<AppState>) -> AppResult<Html<String>> {
    let page = LoginTemplate::new(state.microsoft.is_some());
    Ok(Html(page.render()?))
}

/// Handler for the schedule page: scrape the portal, push to the calendar, render.
///
/// Without signed-in credentials this redirects to `/login` before any outbound
/// request is made.
pub async fn schedule_handler(State(state): State<AppState>, jar: CookieJar) -> Response {
    let session = match state.sessions.current(&jar).await {
        Ok(Some(session)) => session,
        Ok(None) => return to_login(),
        Err(e) => {
            error!("Failed to load session: {}", e);
            return e.into_response();
        }
    };

    let Some(credentials) = session.credentials().cloned() else {
        return to_login();
    };

    let credentials = match ensure_fresh(&state, session, credentials).await {
        Some(credentials) => credentials,
        None => return to_login(),
    };

    match show_schedule(&state, &credentials).await {
        Ok(page) => page.into_response(),
        Err(e) => {
            error!("Error retrieving schedule or syncing with Google Calendar: {}", e);
            e.into_response()
        }
    }
}

/// Refresh expired Google credentials. `None` means the user has to sign in again.
async fn ensure_fresh(state: &AppState, mut session: Session, credentials: Credentials) -> Option<Credentials> {
    if !credentials.can_sync_calendar() || !credentials.is_expired() {
        return Some(credentials);
    }

    match state.google.refresh(&credentials).await {
        Ok(refreshed) => {
            session.authenticate(refreshed.clone());
            if let Err(e) = state.sessions.save(&session).await {
                // The refreshed token is still good for this request
                warn!("Failed to store refreshed credentials: {}", e);
            }
            Some(refreshed)
        }
        Err(e) => {
            error!("Failed to refresh Google credentials: {}", e);
            session.reset();
            if let Err(e) = state.sessions.save(&session).await {
                warn!("Failed to reset session: {}", e);
            }
            None
        }
    }
}

async fn show_schedule(state: &AppState, credentials: &Credentials) -> AppResult<Html<String>> {
    let schedule_data = state.portal.fetch_schedule().await?;

    let (synced, notice) = if credentials.can_sync_calendar() {
        let inserted = sync_schedule(&state.calendar, &credentials.access_token, &schedule_data).await?;
        (Some(inserted.len()), None)
    } else {
        info!("Skipping calendar sync for {:?} sign-in", credentials.provider);
        (None, Some(t!("schedule.sync_unsupported").to_string()))
    };

    let page = IndexTemplate::new(schedule_data, synced, notice, credentials.display_name());
    Ok(Html(page.render()?))
}

/// Sign out: drop the session and its cookie
pub async fn logout_handler(State(state): State<AppState>, jar: CookieJar) -> Response {
    match state.sessions.destroy(jar).await {
        Ok(jar) => (jar, Redirect::to("/login")).into_response(),
        Err(e) => {
            error!("Failed to destroy session: {}", e);
            e.into_response()
        }
    }
}

// Handler for health check
pub async fn health_handler() -> &'static str {
    "OK"
}
