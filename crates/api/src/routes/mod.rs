pub mod health;
pub mod monitoring;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /monitoring/collect                         run a collection pass (POST)
/// /monitoring/matrix                          system-health matrix
/// /monitoring/alerts/process                  run an alert pass (POST)
///
/// /monitoring/modules                         list module configs
/// /monitoring/modules/{module}                get, update
/// /monitoring/modules/{module}/metrics        metric history (?hours=)
///
/// /monitoring/alert-rules                     list (?module=), create
/// /monitoring/alert-rules/{id}                get, update, delete
///
/// /monitoring/alerts                          list (?unresolved_only=&limit=&offset=)
/// /monitoring/alerts/counts                   open alert counts
/// /monitoring/alerts/{id}/acknowledge         acknowledge (POST)
/// /monitoring/alerts/{id}/resolve             resolve (POST)
///
/// /monitoring/notifications                   caller's in-app notifications
/// /monitoring/notifications/unread-count      unread count
/// /monitoring/notifications/{id}/read         mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/monitoring", monitoring::router())
}
