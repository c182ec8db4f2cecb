use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Language {
    pub code: String,
    pub name: String,
    pub native_name: String,
    pub flag: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub id: String,
    pub locale: String,
    pub context: String,
    pub key: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Translation {
    pub fn new(
        locale: impl Into<String>,
        context: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            locale: locale.into(),
            context: context.into(),
            key: key.into(),
            value: value.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Number, currency and date conventions of a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleSettings {
    pub locale: &'static str,
    pub currency: &'static str,
    pub currency_symbol: &'static str,
    /// Display pattern, e.g. `dd/MM/yyyy`
    pub date_format: &'static str,
    pub thousands_separator: char,
    pub decimal_separator: char,
}

impl LocaleSettings {
    pub const VI: LocaleSettings = LocaleSettings {
        locale: "vi",
        currency: "VND",
        currency_symbol: "₫",
        date_format: "dd/MM/yyyy",
        thousands_separator: '.',
        decimal_separator: ',',
    };

    pub const EN: LocaleSettings = LocaleSettings {
        locale: "en",
        currency: "VND",
        currency_symbol: "VND",
        date_format: "MM/dd/yyyy",
        thousands_separator: ',',
        decimal_separator: '.',
    };

    /// Settings for a known locale code (`vi`, `vi-VN`, `en-US`, ...)
    pub fn for_locale(locale: &str) -> Option<LocaleSettings> {
        let lang = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "vi" => Some(Self::VI),
            "en" => Some(Self::EN),
            _ => None,
        }
    }

    /// chrono format string equivalent of `date_format`
    pub fn chrono_date_format(&self) -> &'static str {
        match self.date_format {
            "MM/dd/yyyy" => "%m/%d/%Y",
            _ => "%d/%m/%Y",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_suffix_is_ignored() {
        assert_eq!(LocaleSettings::for_locale("vi-VN"), Some(LocaleSettings::VI));
        assert_eq!(LocaleSettings::for_locale("EN_us"), Some(LocaleSettings::EN));
        assert_eq!(LocaleSettings::for_locale("fr"), None);
    }
}
