//! Small validation helpers shared by services and request DTOs.

/// Fold a Vietnamese character to its ASCII base letter.
fn fold_vietnamese(c: char) -> char {
    match c {
        'à' | 'á' | 'ạ' | 'ả' | 'ã' | 'â' | 'ầ' | 'ấ' | 'ậ' | 'ẩ' | 'ẫ' | 'ă' | 'ằ' | 'ắ' | 'ặ'
        | 'ẳ' | 'ẵ' => 'a',
        'è' | 'é' | 'ẹ' | 'ẻ' | 'ẽ' | 'ê' | 'ề' | 'ế' | 'ệ' | 'ể' | 'ễ' => 'e',
        'ì' | 'í' | 'ị' | 'ỉ' | 'ĩ' => 'i',
        'ò' | 'ó' | 'ọ' | 'ỏ' | 'õ' | 'ô' | 'ồ' | 'ố' | 'ộ' | 'ổ' | 'ỗ' | 'ơ' | 'ờ' | 'ớ' | 'ợ'
        | 'ở' | 'ỡ' => 'o',
        'ù' | 'ú' | 'ụ' | 'ủ' | 'ũ' | 'ư' | 'ừ' | 'ứ' | 'ự' | 'ử' | 'ữ' => 'u',
        'ỳ' | 'ý' | 'ỵ' | 'ỷ' | 'ỹ' => 'y',
        'đ' => 'd',
        other => other,
    }
}

/// Build a URL slug from a display name.
///
/// `"Loa Karaoke Đỉnh Cao"` becomes `"loa-karaoke-dinh-cao"`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_dash = true;

    for c in input.chars().flat_map(char::to_lowercase).map(fold_vietnamese) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// A slug is lowercase ASCII words joined by single dashes.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Parse `"HH:MM"` into minutes since midnight.
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let (h, m) = value.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    (h < 24 && m < 60).then_some(h * 60 + m)
}

/// Format minutes since midnight as `"HH:MM"`.
pub fn format_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// `validator` custom rule for `"HH:MM"` fields.
pub fn validate_hhmm(value: &str) -> Result<(), validator::ValidationError> {
    parse_hhmm(value)
        .map(|_| ())
        .ok_or_else(|| validator::ValidationError::new("time_format"))
}

/// `validator` custom rule for optional slug fields.
pub fn validate_slug(value: &str) -> Result<(), validator::ValidationError> {
    if is_valid_slug(value) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("slug_format"))
    }
}

/// Vietnamese phone numbers: optional `+84`, then 9-10 digits.
pub fn validate_phone(value: &str) -> Result<(), validator::ValidationError> {
    let digits = value.strip_prefix("+84").unwrap_or(value);
    let ok = (9..=11).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(validator::ValidationError::new("phone_format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_folds_vietnamese() {
        assert_eq!(slugify("Loa Karaoke Đỉnh Cao"), "loa-karaoke-dinh-cao");
        assert_eq!(slugify("  Micro   không dây!! "), "micro-khong-day");
        assert_eq!(slugify("Amply 2.0 / Pro"), "amply-2-0-pro");
    }

    #[test]
    fn slug_rules() {
        assert!(is_valid_slug("loa-jbl-pasion-12"));
        assert!(!is_valid_slug("Loa-JBL"));
        assert!(!is_valid_slug("-loa"));
        assert!(!is_valid_slug("loa--jbl"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn hhmm_parsing() {
        assert_eq!(parse_hhmm("08:30"), Some(510));
        assert_eq!(parse_hhmm("23:59"), Some(1439));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("8:30"), None);
        assert_eq!(format_hhmm(510), "08:30");
    }

    #[test]
    fn phone_rules() {
        assert!(validate_phone("0901234567").is_ok());
        assert!(validate_phone("+84901234567").is_ok());
        assert!(validate_phone("090-123").is_err());
    }
}
