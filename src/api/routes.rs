//! API route handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::server::SharedState;
use crate::error::{Error, Result};
use crate::notifications::{Notification, NotificationId, Toast, ToastSlot};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    #[serde(flatten)]
    pub toast: Toast,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CsrfTokenResponse {
    pub header: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
    pub slots: Vec<ToastSlot>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnqueuedResponse {
    pub id: NotificationId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DismissedResponse {
    pub id: NotificationId,
    pub dismissed: bool,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

// Session token routes

/// Hand the session token to the client, issuing it on first request
pub async fn get_csrf_token(State(state): State<SharedState>) -> Result<impl IntoResponse> {
    let token = state
        .guard
        .get_token()
        .ok_or_else(|| Error::Storage("no session token available".to_string()))?;

    Ok(Json(ApiResponse::ok(CsrfTokenResponse {
        header: state.config.csrf.header_name.clone(),
        token: token.to_string(),
    })))
}

pub async fn logout(State(state): State<SharedState>) -> impl IntoResponse {
    state.guard.clear_token();
    tracing::info!("Session logged out");
    Json(ApiResponse::ok("logged out"))
}

// Notification routes

pub async fn list_notifications(State(state): State<SharedState>) -> impl IntoResponse {
    let notifications = state.center().snapshot().await;
    let slots = state
        .layout
        .arrange(notifications.iter().map(|n| n.id));

    Json(ApiResponse::ok(NotificationsResponse {
        notifications,
        slots,
    }))
}

pub async fn get_notification(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse> {
    let notification = state
        .center()
        .get(NotificationId::from(id))
        .await
        .ok_or(Error::NotificationNotFound(id))?;

    Ok(Json(ApiResponse::ok(notification)))
}

pub async fn create_notification(
    State(state): State<SharedState>,
    Json(req): Json<CreateNotificationRequest>,
) -> impl IntoResponse {
    let duration_ms = req
        .duration_ms
        .unwrap_or(state.config.notifications.default_duration_ms);
    let id = state
        .notifications
        .enqueue_with_duration(req.toast, duration_ms)
        .await;

    (
        StatusCode::CREATED,
        Json(ApiResponse::ok(EnqueuedResponse { id })),
    )
}

pub async fn dismiss_notification(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let id = NotificationId::from(id);
    let dismissed = state.notifications.dismiss(id).await;

    Json(ApiResponse::ok(DismissedResponse { id, dismissed }))
}
