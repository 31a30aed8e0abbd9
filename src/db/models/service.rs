use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use validator::{Validate, ValidationError};

/// Offering owned by exactly one barber.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct BarberService {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BarberService {
    /// Price the customer actually pays.
    pub fn effective_price(&self) -> f64 {
        self.discount_price.unwrap_or(self.price)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewBarberService {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(range(min = 1))]
    pub duration_minutes: i32,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0.0))]
    pub discount_price: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBarberServicePayload {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub discount_price: Option<f64>,
}

impl NewBarberService {
    /// Cross-field pricing rule, checked alongside `validate()`.
    pub fn validate_discount(&self) -> Result<(), ValidationError> {
        if let Some(discount) = self.discount_price {
            if discount > self.price {
                return Err(ValidationError::new("discount_exceeds_price"));
            }
        }
        Ok(())
    }
}

/// Legacy global offering kept for backwards compatibility: its price is a
/// display string like `"R$ 30,00"` and is parsed leniently where a number
/// is needed.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewService {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(range(min = 1))]
    pub duration_minutes: i32,
    #[validate(length(min = 1, max = 40))]
    pub price: String,
}

/// Best-effort parse of a legacy price string; unparseable values count as
/// zero revenue rather than failing a report.
pub fn legacy_price_value(raw: &str) -> f64 {
    raw.replace("R$", "")
        .replace(' ', "")
        .replace(',', ".")
        .parse()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_prices_parse_leniently() {
        assert_eq!(legacy_price_value("R$ 30,00"), 30.0);
        assert_eq!(legacy_price_value("45.50"), 45.5);
        assert_eq!(legacy_price_value("a combinar"), 0.0);
    }

    #[test]
    fn discount_cannot_exceed_price() {
        let service = NewBarberService {
            name: "Corte".into(),
            duration_minutes: 30,
            price: 30.0,
            discount_price: Some(35.0),
        };
        assert!(service.validate_discount().is_err());
    }

    #[test]
    fn effective_price_prefers_discount() {
        let now = chrono::Local::now().naive_local();
        let service = BarberService {
            id: Uuid::new_v4(),
            barber_id: Uuid::new_v4(),
            name: "Corte".into(),
            duration_minutes: 30,
            price: 30.0,
            discount_price: Some(25.0),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(service.effective_price(), 25.0);
    }
}
