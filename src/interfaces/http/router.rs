//! API Router with Swagger UI
//!
//! Routes fall into three groups that share one `AppState`: public (with
//! optional authentication so handlers can see who is calling), signed-in
//! and admin. The groups are merged, so one path may serve a public GET
//! and an admin PUT.

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::interfaces::http::common::{EmptyData, PageQuery};
use crate::interfaces::http::middleware::{auth_middleware, optional_auth_middleware, require_admin};
use crate::interfaces::http::modules::{
    auth, bookings, catalog, content, files, health, i18n, metrics, payments, request_id, reviews,
    technicians,
};
use crate::interfaces::http::state::AppState;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::me,
        // Catalog
        catalog::list_categories,
        catalog::get_category,
        catalog::create_category,
        catalog::update_category,
        catalog::delete_category,
        catalog::list_products,
        catalog::get_product,
        catalog::get_product_by_slug,
        catalog::create_product,
        catalog::update_product,
        catalog::delete_product,
        catalog::list_services,
        catalog::get_service,
        catalog::get_service_by_slug,
        catalog::create_service,
        catalog::update_service,
        catalog::delete_service,
        // Bookings
        bookings::create_booking,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::update_booking,
        bookings::delete_booking,
        bookings::update_booking_status,
        bookings::assign_technician,
        // Reviews
        reviews::list_service_reviews,
        reviews::service_rating,
        reviews::create_review,
        reviews::mark_helpful,
        reviews::list_reviews,
        reviews::review_stats,
        reviews::get_review,
        reviews::update_review,
        reviews::update_review_status,
        reviews::delete_review,
        // Technicians
        technicians::list_technicians,
        technicians::create_technician,
        technicians::available_technicians,
        technicians::technician_stats,
        technicians::get_technician,
        technicians::update_technician,
        technicians::delete_technician,
        technicians::get_schedule,
        technicians::set_schedule,
        technicians::get_workload,
        // i18n
        i18n::list_languages,
        i18n::locale_settings,
        i18n::get_translations,
        i18n::translate,
        i18n::localized_product,
        i18n::localized_category,
        i18n::localized_page,
        i18n::upsert_translation,
        i18n::delete_translation,
        // Orders & payments
        payments::create_order,
        payments::list_orders,
        payments::get_order,
        payments::payment_methods,
        payments::payment_status,
        payments::list_payments,
        payments::payment_stats,
        payments::create_intent,
        payments::create_refund,
        payments::vnpay_callback,
        payments::vnpay_webhook,
        payments::momo_callback,
        payments::momo_webhook,
        payments::payos_callback,
        payments::payos_webhook,
        // Files
        files::upload_file,
        files::list_files,
        files::get_file,
        files::delete_file,
        // Content
        content::list_faqs,
        content::get_faq,
        content::create_faq,
        content::update_faq,
        content::delete_faq,
        content::list_policies,
        content::get_policy,
        content::upsert_policy,
        content::update_policy,
        content::delete_policy,
        content::list_testimonials,
        content::create_testimonial,
        content::get_testimonial,
        content::update_testimonial,
        content::delete_testimonial,
        content::list_pages,
        content::get_page,
        content::upsert_page,
        content::update_page,
        content::delete_page,
        content::list_articles,
        content::get_article,
        content::create_article,
        content::update_article,
        content::delete_article,
        content::subscribe,
        content::unsubscribe,
        content::list_subscribers,
    ),
    components(
        schemas(
            // Common
            EmptyData,
            PageQuery,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::UserInfo,
            // Catalog
            catalog::CategoryDto,
            catalog::ProductDto,
            catalog::ServiceDto,
            catalog::CreateCategoryRequest,
            catalog::UpdateCategoryRequest,
            catalog::CreateProductRequest,
            catalog::UpdateProductRequest,
            catalog::CreateServiceRequest,
            catalog::UpdateServiceRequest,
            // Bookings
            bookings::BookingDto,
            bookings::CreateBookingRequest,
            bookings::UpdateBookingRequest,
            bookings::UpdateBookingStatusRequest,
            bookings::AssignTechnicianRequest,
            // Reviews
            reviews::ReviewDto,
            reviews::RatingSummaryDto,
            reviews::ServiceRatingDto,
            reviews::ServiceReviewsDto,
            reviews::ReviewStatsDto,
            reviews::CreateReviewRequest,
            reviews::UpdateReviewRequest,
            reviews::UpdateReviewStatusRequest,
            reviews::HelpfulRequest,
            // Technicians
            technicians::TechnicianDto,
            technicians::ScheduleDto,
            technicians::WorkloadDto,
            technicians::TechnicianStatsDto,
            technicians::CreateTechnicianRequest,
            technicians::UpdateTechnicianRequest,
            technicians::SetScheduleRequest,
            // i18n
            i18n::LanguageDto,
            i18n::TranslationDto,
            i18n::TranslationMapDto,
            i18n::TranslateResponse,
            i18n::LocaleSettingsDto,
            i18n::UpsertTranslationRequest,
            // Orders & payments
            payments::OrderDto,
            payments::CreateOrderRequest,
            payments::PaymentMethodDto,
            payments::GatewayStatusDto,
            payments::CreateIntentRequest,
            payments::IntentDto,
            payments::PaymentDto,
            payments::PaymentStatsDto,
            payments::CreateRefundRequest,
            payments::RefundOutcomeDto,
            // Files
            files::FileDto,
            files::UploadForm,
            // Content
            content::FaqDto,
            content::FaqRequest,
            content::PolicyDto,
            content::PolicyRequest,
            content::TestimonialDto,
            content::TestimonialRequest,
            content::PageDto,
            content::PageRequest,
            content::ArticleDto,
            content::ArticleRequest,
            content::SubscriberDto,
            content::SubscribeRequest,
            content::UnsubscribeRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Authentication", description = "Registration, login (JWT) and the current account"),
        (name = "Catalog", description = "Categories, products and bookable services"),
        (name = "Bookings", description = "Customer service bookings and their workflow"),
        (name = "Reviews", description = "Service reviews, moderation and ratings"),
        (name = "Technicians", description = "Technician roster, schedules and workload"),
        (name = "i18n", description = "Languages, translations and localized records"),
        (name = "Orders", description = "Checkout orders priced from the catalog"),
        (name = "Payments", description = "Payment intents, refunds and reporting"),
        (name = "Payment Gateways", description = "VNPAY, MoMo and PayOS callbacks and webhooks"),
        (name = "Files", description = "Image and document uploads"),
        (name = "Content", description = "FAQ, policies, testimonials, pages and blog"),
        (name = "Newsletter", description = "Newsletter subscriptions"),
    ),
    info(
        title = "Audio Tài Lộc API",
        version = "1.0.0",
        description = "Storefront backend: catalog, bookings, reviews, technicians, i18n, payments and content",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Routes anyone may call
fn public_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        // Catalog
        .route("/categories", get(catalog::list_categories))
        .route("/categories/{id}", get(catalog::get_category))
        .route("/products", get(catalog::list_products))
        .route("/products/{id}", get(catalog::get_product))
        .route("/products/slug/{slug}", get(catalog::get_product_by_slug))
        .route("/services", get(catalog::list_services))
        .route("/services/{id}", get(catalog::get_service))
        .route("/services/slug/{slug}", get(catalog::get_service_by_slug))
        // Bookings
        .route("/bookings", post(bookings::create_booking))
        // Reviews
        .route("/services/{id}/reviews", get(reviews::list_service_reviews))
        .route("/services/{id}/rating", get(reviews::service_rating))
        .route("/reviews", post(reviews::create_review))
        .route("/reviews/{id}/helpful", post(reviews::mark_helpful))
        // Technicians
        .route("/technicians/available", get(technicians::available_technicians))
        // i18n
        .route("/i18n/languages", get(i18n::list_languages))
        .route("/i18n/settings", get(i18n::locale_settings))
        .route("/i18n/translations/{context}", get(i18n::get_translations))
        .route("/i18n/translate", get(i18n::translate))
        .route("/i18n/products/{id}", get(i18n::localized_product))
        .route("/i18n/categories/{id}", get(i18n::localized_category))
        .route("/i18n/pages/{slug}", get(i18n::localized_page))
        // Orders & payments
        .route("/orders", post(payments::create_order))
        .route("/orders/{id}", get(payments::get_order))
        .route("/payments/methods", get(payments::payment_methods))
        .route("/payments/status", get(payments::payment_status))
        .route("/payments/vnpay/callback", get(payments::vnpay_callback))
        .route("/payments/vnpay/webhook", post(payments::vnpay_webhook))
        .route("/payments/momo/callback", get(payments::momo_callback))
        .route("/payments/momo/webhook", post(payments::momo_webhook))
        .route("/payments/payos/callback", get(payments::payos_callback))
        .route("/payments/payos/webhook", post(payments::payos_webhook))
        // Content
        .route("/faq", get(content::list_faqs))
        .route("/faq/{id}", get(content::get_faq))
        .route("/policies", get(content::list_policies))
        .route("/policies/{slug}", get(content::get_policy))
        .route("/testimonials", get(content::list_testimonials))
        .route("/pages/{slug}", get(content::get_page))
        .route("/blog", get(content::list_articles))
        .route("/blog/{slug}", get(content::get_article))
        .route("/newsletter/subscribe", post(content::subscribe))
        .route("/newsletter/unsubscribe", post(content::unsubscribe))
}

/// Routes for any signed-in caller
fn authenticated_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/payments/intents", post(payments::create_intent))
        .route(
            "/files/upload",
            post(files::upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
}

/// Admin-only routes. Placeholders match the public routes on the same
/// path (`{slug}` segments carry ids for writes).
fn admin_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/categories", post(catalog::create_category))
        .route(
            "/categories/{id}",
            put(catalog::update_category).delete(catalog::delete_category),
        )
        .route("/products", post(catalog::create_product))
        .route(
            "/products/{id}",
            put(catalog::update_product).delete(catalog::delete_product),
        )
        .route("/services", post(catalog::create_service))
        .route(
            "/services/{id}",
            put(catalog::update_service).delete(catalog::delete_service),
        )
        // Bookings
        .route("/bookings", get(bookings::list_bookings))
        .route(
            "/bookings/{id}",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .route("/bookings/{id}/status", patch(bookings::update_booking_status))
        .route("/bookings/{id}/assign", patch(bookings::assign_technician))
        // Reviews
        .route("/reviews", get(reviews::list_reviews))
        .route("/reviews/stats", get(reviews::review_stats))
        .route(
            "/reviews/{id}",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route("/reviews/{id}/status", patch(reviews::update_review_status))
        // Technicians
        .route(
            "/technicians",
            get(technicians::list_technicians).post(technicians::create_technician),
        )
        .route("/technicians/stats", get(technicians::technician_stats))
        .route(
            "/technicians/{id}",
            get(technicians::get_technician)
                .put(technicians::update_technician)
                .delete(technicians::delete_technician),
        )
        .route(
            "/technicians/{id}/schedule",
            get(technicians::get_schedule).put(technicians::set_schedule),
        )
        .route("/technicians/{id}/workload", get(technicians::get_workload))
        // i18n
        .route("/i18n/translations", post(i18n::upsert_translation))
        .route(
            "/i18n/translations/{context}",
            delete(i18n::delete_translation),
        )
        // Orders & payments
        .route("/orders", get(payments::list_orders))
        .route("/payments", get(payments::list_payments))
        .route("/payments/stats", get(payments::payment_stats))
        .route("/payments/refunds", post(payments::create_refund))
        // Files
        .route("/files", get(files::list_files))
        .route(
            "/files/{id}",
            get(files::get_file).delete(files::delete_file),
        )
        // Content
        .route("/faq", post(content::create_faq))
        .route(
            "/faq/{id}",
            put(content::update_faq).delete(content::delete_faq),
        )
        .route("/policies", post(content::upsert_policy))
        .route(
            "/policies/{slug}",
            put(content::update_policy).delete(content::delete_policy),
        )
        .route("/testimonials", post(content::create_testimonial))
        .route(
            "/testimonials/{id}",
            get(content::get_testimonial)
                .put(content::update_testimonial)
                .delete(content::delete_testimonial),
        )
        .route(
            "/pages",
            get(content::list_pages).post(content::upsert_page),
        )
        .route(
            "/pages/{slug}",
            put(content::update_page).delete(content::delete_page),
        )
        .route("/blog", post(content::create_article))
        .route(
            "/blog/{slug}",
            put(content::update_article).delete(content::delete_article),
        )
        .route("/newsletter/subscribers", get(content::list_subscribers))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return base.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(allowed)
}

/// Create the API router with all routes
pub fn create_api_router(state: AppState, config: &AppConfig) -> Router {
    let auth_state = state.auth.clone();
    // Multipart framing on top of the file itself
    let upload_limit = usize::try_from(config.uploads.max_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(64 * 1024);

    let public = public_routes().route_layer(middleware::from_fn_with_state(
        auth_state.clone(),
        optional_auth_middleware,
    ));
    let signed_in = authenticated_routes(upload_limit).route_layer(
        middleware::from_fn_with_state(auth_state.clone(), auth_middleware),
    );
    let admin = admin_routes()
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let api = public.merge(signed_in).merge(admin);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health & metrics
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        // REST API
        .nest("/api/v1", api)
        // Uploaded files
        .nest_service("/uploads", ServeDir::new(&config.uploads.dir))
        .route_layer(middleware::from_fn(metrics::http_metrics_middleware))
        .with_state(state)
        // Middleware
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server.cors_origins))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::Service;

    use super::*;
    use crate::infrastructure::database::test_connection;
    use crate::infrastructure::storage::LocalFileStorage;

    const ADMIN_EMAIL: &str = "admin@audiotailoc.vn";
    const ADMIN_KEY: &str = "router-test-admin-key";

    struct TestApp {
        router: Router,
        _dir: tempfile::TempDir,
    }

    impl TestApp {
        async fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let mut config = AppConfig::default();
            config.admin.emails = vec![ADMIN_EMAIL.to_string()];
            config.security.admin_api_key = Some(ADMIN_KEY.to_string());
            config.uploads.dir = dir.path().to_path_buf();

            let storage = Arc::new(LocalFileStorage::new(dir.path()));
            let state = AppState::build(test_connection().await, &config, storage, None);
            Self {
                router: create_api_router(state, &config),
                _dir: dir,
            }
        }

        async fn send(
            &mut self,
            method: Method,
            uri: &str,
            body: Option<Value>,
            headers: &[(&str, &str)],
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            for (name, value) in headers {
                builder = builder.header(*name, *value);
            }
            let request = match body {
                Some(json) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            let response = self.router.call(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, value)
        }

        async fn admin(&mut self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            self.send(method, uri, body, &[("x-api-key", ADMIN_KEY)]).await
        }
    }

    #[tokio::test]
    async fn health_reports_database() {
        let mut app = TestApp::new().await;
        let (status, body) = app.send(Method::GET, "/health", None, &[]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"]["status"], "ok");
    }

    #[tokio::test]
    async fn admin_routes_require_credentials() {
        let mut app = TestApp::new().await;

        let create = json!({"name": "Loa", "slug": "loa"});
        let (status, _) = app
            .send(Method::POST, "/api/v1/categories", Some(create.clone()), &[])
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app
            .send(
                Method::POST,
                "/api/v1/categories",
                Some(create.clone()),
                &[("x-api-key", "wrong")],
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = app.admin(Method::POST, "/api/v1/categories", Some(create)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["slug"], "loa");

        // Public read on the same path
        let (status, body) = app.send(Method::GET, "/api/v1/categories", None, &[]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn customers_are_forbidden_from_admin_routes() {
        let mut app = TestApp::new().await;
        let register = json!({"email": "khach@example.com", "password": "matkhau123", "name": "Khách"});
        let (status, _) = app
            .send(Method::POST, "/api/v1/auth/register", Some(register), &[])
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let login = json!({"email": "khach@example.com", "password": "matkhau123"});
        let (status, body) = app
            .send(Method::POST, "/api/v1/auth/login", Some(login), &[])
            .await;
        assert_eq!(status, StatusCode::OK);
        let bearer = format!("Bearer {}", body["data"]["token"].as_str().unwrap());

        let (status, body) = app
            .send(Method::GET, "/api/v1/auth/me", None, &[("authorization", &bearer)])
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["role"], "CUSTOMER");

        let (status, _) = app
            .send(Method::GET, "/api/v1/bookings", None, &[("authorization", &bearer)])
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn validation_failures_are_400() {
        let mut app = TestApp::new().await;
        let bad = json!({"name": "", "price_cents": 0});
        let (status, body) = app.admin(Method::POST, "/api/v1/products", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn booking_flow_over_http() {
        let mut app = TestApp::new().await;
        let (_, body) = app
            .admin(
                Method::POST,
                "/api/v1/services",
                Some(json!({"name": "Lắp đặt loa", "base_price_cents": 500000})),
            )
            .await;
        let service_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/bookings",
                Some(json!({
                    "service_id": service_id,
                    "customer_name": "Trần Thị B",
                    "customer_phone": "0901234567",
                    "scheduled_time": "09:30"
                })),
                &[],
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], "PENDING");
        let booking_id = body["data"]["id"].as_str().unwrap().to_string();

        let uri = format!("/api/v1/bookings/{}/status", booking_id);
        let (status, _) = app
            .admin(Method::PATCH, &uri, Some(json!({"status": "DONE"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .admin(Method::PATCH, &uri, Some(json!({"status": "COMPLETED"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .admin(Method::PATCH, &uri, Some(json!({"status": "confirmed"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "CONFIRMED");
    }

    #[tokio::test]
    async fn reviews_are_moderated_before_they_count() {
        let mut app = TestApp::new().await;
        let (_, body) = app
            .admin(
                Method::POST,
                "/api/v1/services",
                Some(json!({"name": "Sửa micro", "base_price_cents": 150000})),
            )
            .await;
        let service_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, _) = app
            .send(
                Method::POST,
                "/api/v1/reviews",
                Some(json!({"service_id": service_id, "customer_name": "Lý M", "rating": 6})),
                &[],
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/reviews",
                Some(json!({
                    "service_id": service_id,
                    "customer_name": "Lý M",
                    "rating": 4,
                    "comment": "Sửa nhanh, giá hợp lý"
                })),
                &[],
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], "PENDING");
        let review_id = body["data"]["id"].as_str().unwrap().to_string();

        let listing_uri = format!("/api/v1/services/{}/reviews", service_id);
        let (_, body) = app.send(Method::GET, &listing_uri, None, &[]).await;
        assert_eq!(body["data"]["total"], 0);

        let status_uri = format!("/api/v1/reviews/{}/status", review_id);
        let (status, _) = app
            .send(Method::PATCH, &status_uri, Some(json!({"status": "APPROVED"})), &[])
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = app
            .admin(Method::PATCH, &status_uri, Some(json!({"status": "APPROVED"})))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = app.send(Method::GET, &listing_uri, None, &[]).await;
        assert_eq!(body["data"]["total"], 1);
        assert_eq!(body["data"]["stats"]["average_rating"], 4.0);
        assert_eq!(body["data"]["stats"]["distribution"]["4"], 1);

        let helpful_uri = format!("/api/v1/reviews/{}/helpful", review_id);
        let (status, body) = app
            .send(Method::POST, &helpful_uri, Some(json!({"helpful": true})), &[])
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["upvotes"], 1);

        let (status, body) = app.admin(Method::GET, "/api/v1/reviews/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["approved"], 1);
    }

    #[tokio::test]
    async fn translate_falls_back_to_key() {
        let mut app = TestApp::new().await;
        let (status, body) = app
            .send(
                Method::GET,
                "/api/v1/i18n/translate?key=common.missing&locale=en",
                None,
                &[],
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["value"], "common.missing");
        assert_eq!(body["data"]["locale"], "en");
    }

    #[tokio::test]
    async fn vnpay_callback_rejects_bad_signature() {
        let mut app = TestApp::new().await;
        let (status, body) = app
            .send(
                Method::GET,
                "/api/v1/payments/vnpay/callback?vnp_TxnRef=x&vnp_ResponseCode=00&vnp_SecureHash=deadbeef",
                None,
                &[],
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["RspCode"], "97");
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let mut app = TestApp::new().await;
        let request = Request::builder()
            .uri("/api/v1/payments/methods")
            .header("x-request-id", "req-123")
            .body(Body::empty())
            .unwrap();
        let response = app.router.call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], "req-123");
    }

    #[test]
    fn openapi_lists_storefront_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/products/slug/{slug}"));
        assert!(doc.paths.paths.contains_key("/api/v1/payments/intents"));
        assert!(doc.paths.paths.contains_key("/api/v1/newsletter/subscribe"));
        assert!(doc.paths.paths.contains_key("/api/v1/services/{id}/reviews"));
        assert!(doc.paths.paths.contains_key("/api/v1/reviews/{id}/status"));
    }
}
