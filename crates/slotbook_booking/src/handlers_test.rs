// crates/slotbook_booking/src/handlers_test.rs
#[cfg(test)]
mod tests {
    use crate::auth::ADMIN_AUTH_HEADER;
    use crate::routes::routes;
    use crate::testutil::{MemoryLedger, MemoryStore, RecordingNotifier, StaticBusySource};
    use crate::workflow::BookingWorkflow;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use chrono::{Duration, NaiveDate, Utc};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use slotbook_config::{
        AdminConfig, AppConfig, NotificationConfig, SchedulingConfig, ServerConfig,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &str = "s3cret";

    struct Fixture {
        app: Router,
        store: MemoryStore,
    }

    fn fixture() -> Fixture {
        let config = Arc::new(AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            use_gcal: false,
            database: None,
            gcal: None,
            scheduling: SchedulingConfig::default(),
            notifications: None,
            admin: Some(AdminConfig {
                shared_secret: Some(SECRET.to_string()),
            }),
        });
        let store = MemoryStore::default();
        let workflow = Arc::new(BookingWorkflow::new(
            MemoryLedger::with_codes(&["alpha", "bravo"]),
            store.clone(),
            Arc::new(StaticBusySource {
                periods: vec![],
                fail: false,
            }),
            Some(Arc::new(RecordingNotifier::default())),
            SchedulingConfig::default(),
            Some(NotificationConfig {
                admin_email: "admin@example.com".to_string(),
                sender_name: Some("Slotbook".to_string()),
            }),
            "primary".to_string(),
        ));
        Fixture {
            app: routes(config, workflow),
            store,
        }
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, payload: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Tomorrow's UTC date, always inside the rolling window and with its
    /// working day entirely in the future.
    fn tomorrow() -> NaiveDate {
        (Utc::now() + Duration::days(1)).date_naive()
    }

    async fn first_offered_slot(app: &Router) -> String {
        let uri = format!("/slots?date={}", tomorrow());
        let response = app.clone().oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        body["slots"][0]["start"].as_str().unwrap().to_string()
    }

    // --- /verify -----------------------------------------------------------

    #[tokio::test]
    async fn verify_reports_validity_without_consuming() {
        let f = fixture();

        for _ in 0..2 {
            let response = f
                .app
                .clone()
                .oneshot(post_json("/verify", json!({"access_code": "alpha"})))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(json_body(response).await, json!({"valid": true}));
        }

        let response = f
            .app
            .clone()
            .oneshot(post_json("/verify", json!({"access_code": "nope"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"valid": false}));
    }

    // --- /slots ------------------------------------------------------------

    #[tokio::test]
    async fn slots_listing_renders_the_grid_for_a_date() {
        let f = fixture();
        let uri = format!("/slots?date={}", tomorrow());
        let response = f.app.clone().oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["time_zone"], "UTC");
        let slots = body["slots"].as_array().unwrap();
        // Default grid: 9-17 at 30 minutes.
        assert_eq!(slots.len(), 16);
        let first = &slots[0];
        assert_eq!(
            first["wall_clock"].as_str().unwrap(),
            format!("{} 09:00", tomorrow())
        );
        assert!(first["start"].as_str().unwrap().contains("09:00:00"));
    }

    #[tokio::test]
    async fn unknown_time_zone_is_a_bad_request() {
        let f = fixture();
        let response = f
            .app
            .clone()
            .oneshot(get("/slots?time_zone=Mars%2FOlympus"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], 400);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Mars/Olympus"));
    }

    // --- /book and the admin review ----------------------------------------

    #[tokio::test]
    async fn booking_round_trip_through_the_admin_review() {
        let f = fixture();
        let slot_start = first_offered_slot(&f.app).await;

        let response = f
            .app
            .clone()
            .oneshot(post_json(
                "/book",
                json!({
                    "access_code": "alpha",
                    "name": "Ada Lovelace",
                    "email": "ada@example.com",
                    "slot_start": slot_start,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "pending");
        let id = body["booking_id"].as_i64().unwrap();

        let rows = f.store.all();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].email, "ada@example.com");
        assert!(!rows[0].confirmed);

        let listing = f
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/admin/bookings")
                    .header(ADMIN_AUTH_HEADER, SECRET)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(listing.status(), StatusCode::OK);
        let listing = json_body(listing).await;
        assert_eq!(listing["bookings"][0]["id"].as_i64(), Some(id));

        let confirm = f
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/admin/bookings/{id}/confirm"))
                    .header(ADMIN_AUTH_HEADER, SECRET)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(confirm.status(), StatusCode::OK);
        assert_eq!(json_body(confirm).await["action"], "confirmed");
        assert!(f.store.all()[0].confirmed);
    }

    #[tokio::test]
    async fn admin_delete_removes_the_booking() {
        let f = fixture();
        let slot_start = first_offered_slot(&f.app).await;
        f.app
            .clone()
            .oneshot(post_json(
                "/book",
                json!({
                    "access_code": "alpha",
                    "name": "Ada",
                    "email": "ada@example.com",
                    "slot_start": slot_start,
                }),
            ))
            .await
            .unwrap();
        let id = f.store.all()[0].id;

        let response = f
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/admin/bookings/{id}"))
                    .header(ADMIN_AUTH_HEADER, SECRET)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["action"], "deleted");
        assert!(f.store.all().is_empty());
    }

    #[tokio::test]
    async fn spent_access_code_cannot_book_twice() {
        let f = fixture();
        let slot_start = first_offered_slot(&f.app).await;
        let payload = json!({
            "access_code": "alpha",
            "name": "Ada",
            "email": "ada@example.com",
            "slot_start": slot_start,
        });

        let first = f
            .app
            .clone()
            .oneshot(post_json("/book", payload.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = f
            .app
            .clone()
            .oneshot(post_json("/book", payload))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        assert_eq!(f.store.all().len(), 1);
    }

    #[tokio::test]
    async fn malformed_slot_start_is_a_bad_request() {
        let f = fixture();
        let response = f
            .app
            .clone()
            .oneshot(post_json(
                "/book",
                json!({
                    "access_code": "alpha",
                    "name": "Ada",
                    "email": "ada@example.com",
                    "slot_start": "next tuesday",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(f.store.all().is_empty());
    }
}
