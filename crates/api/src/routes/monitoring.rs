//! Route definitions for the `/monitoring` resource.
//!
//! Every endpoint requires a platform admin.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{alert_rules, alerts, modules, monitoring, notifications};
use crate::state::AppState;

/// Routes mounted at `/monitoring`.
pub fn router() -> Router<AppState> {
    Router::new()
        // Trigger operations
        .route("/collect", post(monitoring::collect))
        .route("/matrix", get(monitoring::matrix))
        .route("/alerts/process", post(monitoring::process))
        // Module configuration
        .route("/modules", get(modules::list_modules))
        .route(
            "/modules/{module}",
            get(modules::get_module).put(modules::update_module),
        )
        .route("/modules/{module}/metrics", get(modules::module_metrics))
        // Alert rules
        .route(
            "/alert-rules",
            get(alert_rules::list_rules).post(alert_rules::create_rule),
        )
        .route(
            "/alert-rules/{id}",
            get(alert_rules::get_rule)
                .put(alert_rules::update_rule)
                .delete(alert_rules::delete_rule),
        )
        // Alert history
        .route("/alerts", get(alerts::list_alerts))
        .route("/alerts/counts", get(alerts::alert_counts))
        .route("/alerts/{id}/acknowledge", post(alerts::acknowledge_alert))
        .route("/alerts/{id}/resolve", post(alerts::resolve_alert))
        // In-app notifications
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/{id}/read", post(notifications::mark_read))
}
