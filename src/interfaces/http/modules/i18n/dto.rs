//! i18n DTOs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::i18n::{Language, LocaleSettings, Translation};

#[derive(Debug, Serialize, ToSchema)]
pub struct LanguageDto {
    pub code: String,
    pub name: String,
    pub native_name: String,
    pub flag: Option<String>,
    pub is_default: bool,
}

impl From<Language> for LanguageDto {
    fn from(l: Language) -> Self {
        Self {
            code: l.code,
            name: l.name,
            native_name: l.native_name,
            flag: l.flag,
            is_default: l.is_default,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TranslationDto {
    pub id: String,
    pub locale: String,
    pub context: String,
    pub key: String,
    pub value: String,
}

impl From<Translation> for TranslationDto {
    fn from(t: Translation) -> Self {
        Self {
            id: t.id,
            locale: t.locale,
            context: t.context,
            key: t.key,
            value: t.value,
        }
    }
}

/// Translations of one context in one locale
#[derive(Debug, Serialize, ToSchema)]
pub struct TranslationMapDto {
    pub locale: String,
    pub context: String,
    pub translations: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TranslateResponse {
    pub key: String,
    pub locale: String,
    pub value: String,
}

/// Locale conventions with rendered samples
#[derive(Debug, Serialize, ToSchema)]
pub struct LocaleSettingsDto {
    pub locale: String,
    pub currency: String,
    pub currency_symbol: String,
    pub date_format: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
    /// `1234567` formatted as currency
    pub currency_example: String,
    /// Today formatted with `date_format`
    pub date_example: String,
}

impl LocaleSettingsDto {
    pub fn new(
        locale: String,
        s: LocaleSettings,
        currency_example: String,
        date_example: String,
    ) -> Self {
        Self {
            locale,
            currency: s.currency.to_string(),
            currency_symbol: s.currency_symbol.to_string(),
            date_format: s.date_format.to_string(),
            thousands_separator: s.thousands_separator.to_string(),
            decimal_separator: s.decimal_separator.to_string(),
            currency_example,
            date_example,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LocaleQuery {
    /// Language code; falls back to `Accept-Language`, then the default locale
    pub locale: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertTranslationRequest {
    #[validate(length(min = 2, max = 10))]
    pub locale: String,
    #[validate(length(min = 1, max = 100))]
    pub context: String,
    #[validate(length(min = 1, max = 200))]
    pub key: String,
    pub value: String,
}
