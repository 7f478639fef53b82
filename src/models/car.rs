//! Modelo de Car
//!
//! Este módulo contiene el struct Car y su rate card. Mapea exactamente
//! a la tabla cars con primary key 'id'.
//!
//! El flag `is_available` solo lo muta el motor de alquileres
//! (RentalService), nunca el update genérico de coches.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::rental::DurationType;

/// Car principal - mapea exactamente a la tabla cars
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub model: Option<String>,
    pub description: Option<String>,
    pub year: i32,
    pub price_per_day: Decimal,
    pub price_per_week: Decimal,
    pub price_per_month: Decimal,
    pub current_mileage: i64,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

/// Las tres tarifas por unidad de un coche (día/semana/mes)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RateCard {
    pub price_per_day: Decimal,
    pub price_per_week: Decimal,
    pub price_per_month: Decimal,
}

impl RateCard {
    /// Tarifa por unidad según el tipo de duración
    pub fn rate_for(&self, duration_type: DurationType) -> Decimal {
        match duration_type {
            DurationType::Daily => self.price_per_day,
            DurationType::Weekly => self.price_per_week,
            DurationType::Monthly => self.price_per_month,
        }
    }
}

impl Car {
    pub fn rate_card(&self) -> RateCard {
        RateCard {
            price_per_day: self.price_per_day,
            price_per_week: self.price_per_week,
            price_per_month: self.price_per_month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_card_selects_rate_by_duration_type() {
        let card = RateCard {
            price_per_day: dec!(50.00),
            price_per_week: dec!(300.00),
            price_per_month: dec!(1000.00),
        };

        assert_eq!(card.rate_for(DurationType::Daily), dec!(50.00));
        assert_eq!(card.rate_for(DurationType::Weekly), dec!(300.00));
        assert_eq!(card.rate_for(DurationType::Monthly), dec!(1000.00));
    }
}
