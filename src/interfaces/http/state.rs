//! Shared router state

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;

use crate::application::identity::IdentityService;
use crate::application::services::{
    BookingService, CatalogService, ContentService, FileService, I18nService, PaymentService,
    ReviewService, TechnicianService,
};
use crate::config::AppConfig;
use crate::domain::file::FileStorage;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::JwtConfig;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::interfaces::http::middleware::AuthState;

/// Everything a handler may need. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub catalog: Arc<CatalogService>,
    pub bookings: Arc<BookingService>,
    pub reviews: Arc<ReviewService>,
    pub technicians: Arc<TechnicianService>,
    pub i18n: Arc<I18nService>,
    pub payments: Arc<PaymentService>,
    pub files: Arc<FileService>,
    pub content: Arc<ContentService>,
    pub identity: Arc<IdentityService>,
    pub auth: AuthState,
    pub metrics: Option<PrometheusHandle>,
    pub started_at: Arc<Instant>,
}

impl AppState {
    /// Wire every service over one connection.
    pub fn build(
        db: DatabaseConnection,
        config: &AppConfig,
        storage: Arc<dyn FileStorage>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let jwt_config = JwtConfig::from_security(&config.security);

        Self {
            catalog: Arc::new(CatalogService::new(repos.clone())),
            bookings: Arc::new(BookingService::new(repos.clone())),
            reviews: Arc::new(ReviewService::new(repos.clone())),
            technicians: Arc::new(TechnicianService::new(repos.clone())),
            i18n: Arc::new(I18nService::new(
                repos.clone(),
                config.i18n.default_locale.clone(),
                config.i18n.supported_locales.clone(),
            )),
            payments: Arc::new(PaymentService::new(repos.clone(), config.payments.clone())),
            files: Arc::new(FileService::new(repos.clone(), storage, &config.uploads)),
            content: Arc::new(ContentService::new(repos.clone())),
            identity: Arc::new(IdentityService::new(
                repos,
                jwt_config.clone(),
                config.admin.clone(),
            )),
            auth: AuthState::new(jwt_config, config.security.admin_api_key.as_deref()),
            db,
            metrics,
            started_at: Arc::new(Instant::now()),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
