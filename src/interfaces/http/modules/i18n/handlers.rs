//! i18n API handlers
//!
//! The locale comes from `?locale=`, then the first `Accept-Language` tag,
//! then the configured default.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use chrono::Utc;

use super::dto::*;
use crate::domain::i18n::LocaleSettings;
use crate::interfaces::http::common::{
    created, ok, ApiError, ApiResponse, ApiResult, CreatedResult, EmptyData, ValidatedJson,
};
use crate::interfaces::http::modules::catalog::{CategoryDto, ProductDto};
use crate::interfaces::http::modules::content::PageDto;
use crate::interfaces::http::state::AppState;

fn request_locale(state: &AppState, explicit: Option<&str>, headers: &HeaderMap) -> String {
    let from_header = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|tag| tag.split(';').next().unwrap_or(tag).trim())
        .filter(|tag| !tag.is_empty() && *tag != "*");
    let requested = explicit.filter(|l| !l.trim().is_empty()).or(from_header);
    state.i18n.resolve_locale(requested)
}

#[utoipa::path(
    get,
    path = "/api/v1/i18n/languages",
    tag = "i18n",
    responses((status = 200, description = "Active languages, default first", body = ApiResponse<Vec<LanguageDto>>))
)]
pub async fn list_languages(State(state): State<AppState>) -> ApiResult<Vec<LanguageDto>> {
    let languages = state.i18n.get_languages().await?;
    ok(languages.into_iter().map(LanguageDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/i18n/settings",
    tag = "i18n",
    params(LocaleQuery),
    responses((status = 200, description = "Number, currency and date conventions", body = ApiResponse<LocaleSettingsDto>))
)]
pub async fn locale_settings(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
) -> ApiResult<LocaleSettingsDto> {
    let locale = request_locale(&state, query.locale.as_deref(), &headers);
    let settings = LocaleSettings::for_locale(&locale).unwrap_or(LocaleSettings::VI);
    ok(LocaleSettingsDto::new(
        locale.clone(),
        settings,
        state.i18n.format_currency(1_234_567, &locale),
        state.i18n.format_date(Utc::now().date_naive(), &locale),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/i18n/translations/{context}",
    tag = "i18n",
    params(("context" = String, Path, description = "Translation context, e.g. common"), LocaleQuery),
    responses((status = 200, description = "Key/value map", body = ApiResponse<TranslationMapDto>))
)]
pub async fn get_translations(
    State(state): State<AppState>,
    Path(context): Path<String>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
) -> ApiResult<TranslationMapDto> {
    let locale = request_locale(&state, query.locale.as_deref(), &headers);
    let translations = state.i18n.get_translations(&context, &locale).await;
    ok(TranslationMapDto {
        locale,
        context,
        translations,
    })
}

/// `?key=` and `?locale=` are reserved; every other parameter fills a
/// `{{name}}` placeholder.
#[utoipa::path(
    get,
    path = "/api/v1/i18n/translate",
    tag = "i18n",
    params(
        ("key" = String, Query, description = "`context.key` or a bare common key"),
        ("locale" = Option<String>, Query, description = "Language code")
    ),
    responses(
        (status = 200, description = "Translated text, or the key when missing", body = ApiResponse<TranslateResponse>),
        (status = 400, description = "Missing key")
    )
)]
pub async fn translate(
    State(state): State<AppState>,
    Query(mut params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> ApiResult<TranslateResponse> {
    let key = params
        .remove("key")
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("key is required"))?;
    let explicit = params.remove("locale");
    let locale = request_locale(&state, explicit.as_deref(), &headers);
    let value = state.i18n.translate(&key, &locale, &params).await;
    ok(TranslateResponse { key, locale, value })
}

#[utoipa::path(
    get,
    path = "/api/v1/i18n/products/{id}",
    tag = "i18n",
    params(("id" = String, Path, description = "Product ID"), LocaleQuery),
    responses(
        (status = 200, description = "Localized product", body = ApiResponse<ProductDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn localized_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
) -> ApiResult<ProductDto> {
    let locale = request_locale(&state, query.locale.as_deref(), &headers);
    match state.i18n.localize_product(&id, &locale).await? {
        Some(product) => ok(product.into()),
        None => Err(ApiError::new(StatusCode::NOT_FOUND, "Product not found")),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/i18n/categories/{id}",
    tag = "i18n",
    params(("id" = String, Path, description = "Category ID"), LocaleQuery),
    responses(
        (status = 200, description = "Localized category", body = ApiResponse<CategoryDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn localized_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
) -> ApiResult<CategoryDto> {
    let locale = request_locale(&state, query.locale.as_deref(), &headers);
    match state.i18n.localize_category(&id, &locale).await? {
        Some(category) => ok(category.into()),
        None => Err(ApiError::new(StatusCode::NOT_FOUND, "Category not found")),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/i18n/pages/{slug}",
    tag = "i18n",
    params(("slug" = String, Path, description = "Page slug"), LocaleQuery),
    responses(
        (status = 200, description = "Localized page", body = ApiResponse<PageDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn localized_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
) -> ApiResult<PageDto> {
    let locale = request_locale(&state, query.locale.as_deref(), &headers);
    match state.i18n.localize_page(&slug, &locale).await? {
        Some(page) => ok(page.into()),
        None => Err(ApiError::new(StatusCode::NOT_FOUND, "Page not found")),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/i18n/translations",
    tag = "i18n",
    security(("bearer_auth" = []), ("api_key" = [])),
    request_body = UpsertTranslationRequest,
    responses((status = 201, description = "Translation saved", body = ApiResponse<TranslationDto>))
)]
pub async fn upsert_translation(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UpsertTranslationRequest>,
) -> CreatedResult<TranslationDto> {
    let saved = state
        .i18n
        .upsert_translation(&request.locale, &request.context, &request.key, &request.value)
        .await?;
    created(saved.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/i18n/translations/{id}",
    tag = "i18n",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Translation ID")),
    responses(
        (status = 200, description = "Translation deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_translation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.i18n.delete_translation(&id).await?;
    ok(EmptyData {})
}
