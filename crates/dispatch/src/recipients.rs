//! Recipient source: eligibility query plus phone normalization.

use sqlx::PgPool;

use courier_common::error::AppError;
use courier_common::types::Recipient;

/// Fetches eligible recipients from the database with phones normalized to
/// E.164 before they reach the dispatch engine.
pub struct RecipientSource {
    pool: PgPool,
    min_age: i32,
}

impl RecipientSource {
    pub fn new(pool: PgPool, min_age: i32) -> Self {
        Self { pool, min_age }
    }

    /// Fetch eligible recipients in a stable order.
    ///
    /// Rows whose phone fails normalization are skipped with a debug log,
    /// never failed; they produce no audit record.
    pub async fn fetch_eligible(&self) -> Result<Vec<Recipient>, AppError> {
        let rows: Vec<(i64, String)> = sqlx::query_as(
            "SELECT id, phone FROM recipients \
             WHERE age >= $1 AND phone IS NOT NULL AND phone <> '' \
             ORDER BY id",
        )
        .bind(self.min_age)
        .fetch_all(&self.pool)
        .await?;

        let total = rows.len();
        let mut valid = Vec::with_capacity(total);
        for (id, phone) in rows {
            match normalize_phone(&phone) {
                Ok(phone) => valid.push(Recipient { id, phone }),
                Err(err) => {
                    tracing::debug!(
                        recipient_id = id,
                        raw = %phone,
                        error = %err,
                        "Skipping recipient with invalid phone"
                    );
                }
            }
        }

        tracing::info!(valid = valid.len(), total, "Fetched eligible recipients");
        Ok(valid)
    }
}

/// Normalize a raw phone number to E.164: `+` followed by 8 to 15 digits.
///
/// Accepts `00` as an alternative international prefix and tolerates common
/// separators (spaces, dashes, dots, parentheses). Numbers without an
/// international prefix cannot be resolved to a country and are rejected.
pub fn normalize_phone(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();

    let rest = if let Some(rest) = trimmed.strip_prefix('+') {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("00") {
        rest
    } else {
        return Err(AppError::InvalidPhone(
            "missing international prefix".to_string(),
        ));
    };

    let mut digits = String::with_capacity(rest.len());
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => {
                return Err(AppError::InvalidPhone(format!(
                    "unexpected character {c:?}"
                )));
            }
        }
    }

    if !(8..=15).contains(&digits.len()) {
        return Err(AppError::InvalidPhone(format!(
            "{} digits outside E.164 range",
            digits.len()
        )));
    }
    if digits.starts_with('0') {
        return Err(AppError::InvalidPhone(
            "country code cannot start with 0".to_string(),
        ));
    }

    Ok(format!("+{digits}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_e164() {
        assert_eq!(normalize_phone("+15551234567").unwrap(), "+15551234567");
    }

    #[test]
    fn test_normalize_tolerates_separators() {
        assert_eq!(
            normalize_phone("+1 (555) 123-45.67").unwrap(),
            "+15551234567"
        );
        assert_eq!(normalize_phone("  +49 170 1234567 ").unwrap(), "+491701234567");
    }

    #[test]
    fn test_normalize_double_zero_prefix() {
        assert_eq!(normalize_phone("0015551234567").unwrap(), "+15551234567");
    }

    #[test]
    fn test_normalize_rejects_missing_prefix() {
        assert!(normalize_phone("5551234567").is_err());
        assert!(normalize_phone("").is_err());
    }

    #[test]
    fn test_normalize_rejects_letters() {
        assert!(normalize_phone("+1555CALLNOW").is_err());
    }

    #[test]
    fn test_normalize_rejects_bad_lengths() {
        assert!(normalize_phone("+1234567").is_err());
        assert!(normalize_phone("+1234567890123456").is_err());
    }

    #[test]
    fn test_normalize_rejects_leading_zero_country_code() {
        assert!(normalize_phone("+015551234567").is_err());
    }
}
