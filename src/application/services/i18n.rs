//! Translations, locale formatting and localized catalog records

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use tracing::{info, warn};

use crate::domain::catalog::{Category, Product};
use crate::domain::content::Page;
use crate::domain::i18n::{Language, LocaleSettings, Translation};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub const COMMON_CONTEXT: &str = "common";

pub type TranslationMap = BTreeMap<String, String>;

/// Split `"context.key"`; bare keys belong to `common`.
pub fn split_key(full_key: &str) -> (&str, &str) {
    match full_key.split_once('.') {
        Some((context, key)) if !context.is_empty() && !key.is_empty() => (context, key),
        _ => (COMMON_CONTEXT, full_key),
    }
}

/// Replace `{{name}}` placeholders; unknown names stay as written.
pub fn interpolate(template: &str, params: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = after[..end].trim();
                match params.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

pub struct I18nService {
    repos: Arc<dyn RepositoryProvider>,
    default_locale: String,
    supported_locales: Vec<String>,
    cache: DashMap<(String, String), TranslationMap>,
    /// Bumped on every write so loads that raced a write are not cached
    generation: AtomicU64,
}

impl I18nService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        default_locale: impl Into<String>,
        supported_locales: Vec<String>,
    ) -> Self {
        Self {
            repos,
            default_locale: default_locale.into(),
            supported_locales,
            cache: DashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Supported language code for `requested`, else the default locale.
    pub fn resolve_locale(&self, requested: Option<&str>) -> String {
        let Some(requested) = requested else {
            return self.default_locale.clone();
        };
        let lang = requested
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if self.supported_locales.iter().any(|l| *l == lang) {
            lang
        } else {
            self.default_locale.clone()
        }
    }

    fn settings(&self, locale: &str) -> LocaleSettings {
        LocaleSettings::for_locale(locale)
            .or_else(|| LocaleSettings::for_locale(&self.default_locale))
            .unwrap_or(LocaleSettings::VI)
    }

    /// Active languages, default first
    pub async fn get_languages(&self) -> DomainResult<Vec<Language>> {
        let mut languages = self.repos.translations().languages(true).await?;
        languages.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then(a.sort_order.cmp(&b.sort_order))
                .then_with(|| a.code.cmp(&b.code))
        });
        Ok(languages)
    }

    async fn load(&self, context: &str, locale: &str) -> DomainResult<TranslationMap> {
        let mut map = TranslationMap::new();
        if locale != self.default_locale {
            for t in self
                .repos
                .translations()
                .find_by_context(context, &self.default_locale)
                .await?
            {
                map.insert(t.key, t.value);
            }
        }
        for t in self
            .repos
            .translations()
            .find_by_context(context, locale)
            .await?
        {
            map.insert(t.key, t.value);
        }
        Ok(map)
    }

    /// `{key: value}` for a context; keys missing in `locale` come from the
    /// default locale. Storage failures yield an empty map.
    ///
    /// Empty maps are never cached, so unknown contexts cannot grow the cache.
    pub async fn get_translations(&self, context: &str, locale: &str) -> TranslationMap {
        let cache_key = (context.to_string(), locale.to_string());
        if let Some(hit) = self.cache.get(&cache_key) {
            return hit.clone();
        }
        let generation = self.generation.load(Ordering::Acquire);
        match self.load(context, locale).await {
            Ok(map) => {
                self.cache_if_current(cache_key, &map, generation);
                map
            }
            Err(e) => {
                warn!(context, locale, error = %e, "Failed to load translations");
                TranslationMap::new()
            }
        }
    }

    fn cache_if_current(&self, key: (String, String), map: &TranslationMap, generation: u64) {
        if !map.is_empty() && self.generation.load(Ordering::Acquire) == generation {
            self.cache.insert(key, map.clone());
        }
    }

    /// Requested locale, then default locale, then the key itself.
    pub async fn translate(
        &self,
        full_key: &str,
        locale: &str,
        params: &HashMap<String, String>,
    ) -> String {
        let (context, key) = split_key(full_key);
        let map = self.get_translations(context, locale).await;
        match map.get(key) {
            Some(value) => interpolate(value, params),
            None => full_key.to_string(),
        }
    }

    fn invalidate(&self, context: &str) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.cache.retain(|(c, _), _| c != context);
    }

    pub async fn upsert_translation(
        &self,
        locale: &str,
        context: &str,
        key: &str,
        value: &str,
    ) -> DomainResult<Translation> {
        if locale.trim().is_empty() || context.trim().is_empty() || key.trim().is_empty() {
            return Err(DomainError::Validation(
                "locale, context and key are required".into(),
            ));
        }
        let saved = self
            .repos
            .translations()
            .upsert(Translation::new(locale.trim(), context.trim(), key.trim(), value))
            .await?;
        self.invalidate(&saved.context);
        info!(locale = %saved.locale, context = %saved.context, key = %saved.key, "Translation saved");
        Ok(saved)
    }

    pub async fn delete_translation(&self, id: &str) -> DomainResult<()> {
        let existing = self
            .repos
            .translations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Translation", "id", id))?;
        self.repos.translations().delete(id).await?;
        self.invalidate(&existing.context);
        Ok(())
    }

    // ── Formatting ──────────────────────────────────────────────

    pub fn format_number(&self, value: f64, locale: &str, decimals: usize) -> String {
        let s = self.settings(locale);
        let rendered = format!("{:.*}", decimals, value.abs());
        let (int_part, frac_part) = match rendered.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (rendered.as_str(), None),
        };
        let mut out = String::new();
        if value < 0.0 && rendered.chars().any(|c| c != '0' && c != '.') {
            out.push('-');
        }
        out.push_str(&group_digits(int_part, s.thousands_separator));
        if let Some(frac) = frac_part {
            out.push(s.decimal_separator);
            out.push_str(frac);
        }
        out
    }

    /// Whole VND: `1.234.567 ₫` (vi), `1,234,567 VND` (en)
    pub fn format_currency(&self, amount: i64, locale: &str) -> String {
        let s = self.settings(locale);
        let digits = amount.unsigned_abs().to_string();
        let sign = if amount < 0 { "-" } else { "" };
        format!(
            "{}{} {}",
            sign,
            group_digits(&digits, s.thousands_separator),
            s.currency_symbol
        )
    }

    pub fn format_date(&self, date: NaiveDate, locale: &str) -> String {
        date.format(self.settings(locale).chrono_date_format())
            .to_string()
    }

    pub fn format_datetime(&self, at: DateTime<Utc>, locale: &str) -> String {
        self.format_date(at.date_naive(), locale)
    }

    // ── Localized records ───────────────────────────────────────

    pub async fn localize_product(&self, id: &str, locale: &str) -> DomainResult<Option<Product>> {
        let Some(mut product) = self.repos.products().find_by_id(id).await? else {
            return Ok(None);
        };
        if product.is_deleted() {
            return Ok(None);
        }
        let t = self
            .get_translations(&format!("product:{}", product.id), locale)
            .await;
        if let Some(name) = t.get("name") {
            product.name = name.clone();
        }
        if let Some(description) = t.get("description") {
            product.description = Some(description.clone());
        }
        if let Some(short) = t.get("short_description") {
            product.short_description = Some(short.clone());
        }
        Ok(Some(product))
    }

    pub async fn localize_category(&self, id: &str, locale: &str) -> DomainResult<Option<Category>> {
        let Some(mut category) = self.repos.categories().find_by_id(id).await? else {
            return Ok(None);
        };
        let t = self
            .get_translations(&format!("category:{}", category.id), locale)
            .await;
        if let Some(name) = t.get("name") {
            category.name = name.clone();
        }
        if let Some(description) = t.get("description") {
            category.description = Some(description.clone());
        }
        Ok(Some(category))
    }

    pub async fn localize_page(&self, slug: &str, locale: &str) -> DomainResult<Option<Page>> {
        let Some(mut page) = self.repos.pages().find_by_slug(slug).await? else {
            return Ok(None);
        };
        let t = self
            .get_translations(&format!("page:{}", page.slug), locale)
            .await;
        if let Some(title) = t.get("title") {
            page.title = title.clone();
        }
        if let Some(content) = t.get("content") {
            page.content = content.clone();
        }
        if let Some(meta_title) = t.get("meta_title") {
            page.meta_title = Some(meta_title.clone());
        }
        if let Some(meta_description) = t.get("meta_description") {
            page.meta_description = Some(meta_description.clone());
        }
        Ok(Some(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_connection;

    async fn service() -> I18nService {
        let repos = Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        I18nService::new(repos, "vi", vec!["vi".into(), "en".into()])
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn key_splitting() {
        assert_eq!(split_key("nav.home"), ("nav", "home"));
        assert_eq!(split_key("welcome"), ("common", "welcome"));
        assert_eq!(split_key(".odd"), ("common", ".odd"));
    }

    #[test]
    fn interpolation_keeps_unknown_placeholders() {
        let p = params(&[("name", "An")]);
        assert_eq!(interpolate("Xin chào {{name}}!", &p), "Xin chào An!");
        assert_eq!(interpolate("{{ name }} / {{other}}", &p), "An / {{other}}");
        assert_eq!(interpolate("open {{name", &p), "open {{name");
    }

    #[tokio::test]
    async fn translate_falls_back_to_default_then_key() {
        let svc = service().await;
        svc.upsert_translation("vi", "common", "welcome", "Xin chào {{name}}")
            .await
            .unwrap();
        svc.upsert_translation("vi", "nav", "home", "Trang chủ")
            .await
            .unwrap();
        svc.upsert_translation("en", "nav", "home", "Home")
            .await
            .unwrap();

        let p = params(&[("name", "Lan")]);
        assert_eq!(svc.translate("welcome", "en", &p).await, "Xin chào Lan");
        assert_eq!(svc.translate("nav.home", "en", &p).await, "Home");
        assert_eq!(svc.translate("nav.missing", "en", &p).await, "nav.missing");
    }

    #[tokio::test]
    async fn writes_invalidate_cached_maps() {
        let svc = service().await;
        svc.upsert_translation("vi", "cart", "title", "Giỏ hàng")
            .await
            .unwrap();
        assert_eq!(
            svc.get_translations("cart", "en").await.get("title").unwrap(),
            "Giỏ hàng"
        );

        let en = svc
            .upsert_translation("en", "cart", "title", "Cart")
            .await
            .unwrap();
        assert_eq!(
            svc.get_translations("cart", "en").await.get("title").unwrap(),
            "Cart"
        );

        svc.delete_translation(&en.id).await.unwrap();
        assert_eq!(
            svc.get_translations("cart", "en").await.get("title").unwrap(),
            "Giỏ hàng"
        );
    }

    #[tokio::test]
    async fn unknown_contexts_are_not_cached() {
        let svc = service().await;
        svc.upsert_translation("vi", "footer", "copyright", "Bản quyền")
            .await
            .unwrap();
        for i in 0..50 {
            let key = format!("junk{}.key", i);
            assert_eq!(svc.translate(&key, "en", &HashMap::new()).await, key);
        }
        assert_eq!(svc.cache.len(), 0);

        svc.get_translations("footer", "vi").await;
        svc.get_translations("footer", "en").await;
        assert_eq!(svc.cache.len(), 2);
    }

    #[tokio::test]
    async fn load_that_races_a_write_is_not_cached() {
        let svc = service().await;
        svc.upsert_translation("vi", "promo", "banner", "Giảm giá")
            .await
            .unwrap();

        let before = svc.generation.load(Ordering::Acquire);
        let loaded = svc.load("promo", "vi").await.unwrap();
        svc.upsert_translation("vi", "promo", "banner", "Giảm giá 50%")
            .await
            .unwrap();
        svc.cache_if_current(("promo".into(), "vi".into()), &loaded, before);
        assert!(svc.cache.is_empty());

        assert_eq!(
            svc.get_translations("promo", "vi").await.get("banner").unwrap(),
            "Giảm giá 50%"
        );
        assert_eq!(svc.cache.len(), 1);
    }

    #[tokio::test]
    async fn formatting_per_locale() {
        let svc = service().await;
        assert_eq!(svc.format_currency(1_234_567, "vi"), "1.234.567 ₫");
        assert_eq!(svc.format_currency(1_234_567, "en-US"), "1,234,567 VND");
        assert_eq!(svc.format_currency(-500, "vi"), "-500 ₫");
        assert_eq!(svc.format_currency(999, "fr"), "999 ₫");
        assert_eq!(svc.format_number(1234.5, "vi", 2), "1.234,50");
        assert_eq!(svc.format_number(1234.5, "en", 1), "1,234.5");

        let d = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(svc.format_date(d, "vi"), "31/01/2025");
        assert_eq!(svc.format_date(d, "en"), "01/31/2025");
    }

    #[tokio::test]
    async fn languages_default_first_and_locale_resolution() {
        let svc = service().await;
        let langs = svc.get_languages().await.unwrap();
        assert_eq!(langs[0].code, "vi");
        assert!(langs.iter().any(|l| l.code == "en"));

        assert_eq!(svc.resolve_locale(Some("en-GB")), "en");
        assert_eq!(svc.resolve_locale(Some("ja")), "vi");
        assert_eq!(svc.resolve_locale(None), "vi");
    }

    #[tokio::test]
    async fn product_overrides_come_from_its_context() {
        let svc = service().await;
        let product = svc
            .repos
            .products()
            .create(Product::new("loa-keo", "Loa kéo", 2_500_000))
            .await
            .unwrap();
        svc.upsert_translation("en", &format!("product:{}", product.id), "name", "Trolley speaker")
            .await
            .unwrap();

        let en = svc.localize_product(&product.id, "en").await.unwrap().unwrap();
        assert_eq!(en.name, "Trolley speaker");
        let vi = svc.localize_product(&product.id, "vi").await.unwrap().unwrap();
        assert_eq!(vi.name, "Loa kéo");
        assert!(svc.localize_product("missing", "en").await.unwrap().is_none());
        assert!(svc.localize_page("khong-co", "en").await.unwrap().is_none());
    }
}
