// crates/slotbook_booking/src/routes.rs

use crate::auth::{admin_auth_middleware, AdminAuthState};
use crate::handlers::{
    book_slot_handler, confirm_booking_handler, delete_booking_handler, list_pending_handler,
    list_slots_handler, verify_code_handler, BookingState,
};
use crate::workflow::BookingWorkflow;
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use slotbook_config::AppConfig;
use slotbook_db::{AccessCodeLedger, BookingStore};
use std::sync::Arc;

/// Builds the booking router: the public verify/slots/book surface plus the
/// admin review routes behind the shared-secret middleware.
pub fn routes<L, S>(config: Arc<AppConfig>, workflow: Arc<BookingWorkflow<L, S>>) -> Router
where
    L: AccessCodeLedger + 'static,
    S: BookingStore + 'static,
{
    let state = Arc::new(BookingState {
        config: Arc::clone(&config),
        workflow,
    });
    let auth_state = Arc::new(AdminAuthState { config });

    let admin_routes = Router::new()
        .route("/admin/bookings", get(list_pending_handler::<L, S>))
        .route(
            "/admin/bookings/{id}/confirm",
            post(confirm_booking_handler::<L, S>),
        )
        .route("/admin/bookings/{id}", delete(delete_booking_handler::<L, S>))
        .layer(middleware::from_fn_with_state(
            auth_state,
            admin_auth_middleware,
        ));

    Router::new()
        .route("/verify", post(verify_code_handler::<L, S>))
        .route("/slots", get(list_slots_handler::<L, S>))
        .route("/book", post(book_slot_handler::<L, S>))
        .merge(admin_routes)
        .with_state(state)
}
