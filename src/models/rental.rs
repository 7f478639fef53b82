//! Modelo de Rental
//!
//! Este módulo contiene el struct Rental y el enum DurationType.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.
//!
//! El campo `passport` NO es una columna: es una proyección de lectura/
//! escritura sobre (primary_guarantor_id_type, primary_guarantor_id_number),
//! así nunca puede divergir del par subyacente.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// id_type canónico del campo passport
pub const PASSPORT_ID_TYPE: &str = "passport";

/// Unidad de facturación - mapea al ENUM duration_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "duration_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DurationType {
    Daily,
    Weekly,
    Monthly,
}

impl DurationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationType::Daily => "daily",
            DurationType::Weekly => "weekly",
            DurationType::Monthly => "monthly",
        }
    }
}

/// Rental principal - mapea exactamente a la tabla rentals
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rental {
    pub id: Uuid,
    pub car_id: Uuid,
    pub duration_type: DurationType,
    pub duration_count: i32,

    pub primary_guarantor_name: String,
    pub primary_guarantor_phone: String,
    pub primary_guarantor_id_type: String,
    pub primary_guarantor_id_number: String,

    pub secondary_guarantor_name: Option<String>,
    pub secondary_guarantor_phone: Option<String>,
    pub secondary_guarantor_id_type: Option<String>,
    pub secondary_guarantor_id_number: Option<String>,

    pub pickup_location: String,
    pub return_location: Option<String>,

    pub rental_start_date: DateTime<Utc>,
    pub rental_end_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,

    pub mileage_at_rental: i64,
    pub mileage_at_return: Option<i64>,

    pub price_rate: Decimal,
    pub total_price: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
    pub additional_charges: Option<Decimal>,
    pub final_total: Decimal,

    pub is_active: bool,
    pub is_paid: bool,

    pub comments: Option<String>,
    pub pickup_service_check: Option<serde_json::Value>,
    pub return_service_check: Option<serde_json::Value>,

    pub created_at: DateTime<Utc>,
}

impl Rental {
    /// Lectura de la proyección `passport`: devuelve el id_number solo
    /// cuando el id_type del garante primario es "passport".
    pub fn passport(&self) -> Option<&str> {
        if self.primary_guarantor_id_type == PASSPORT_ID_TYPE {
            Some(self.primary_guarantor_id_number.as_str())
        } else {
            None
        }
    }

    /// Escritura de la proyección `passport`: fuerza id_type = "passport"
    /// y reemplaza el id_number.
    pub fn set_passport(&mut self, value: String) {
        self.primary_guarantor_id_type = PASSPORT_ID_TYPE.to_string();
        self.primary_guarantor_id_number = value;
    }

    pub fn has_passport(&self) -> bool {
        self.primary_guarantor_id_type == PASSPORT_ID_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_rental() -> Rental {
        Rental {
            id: Uuid::new_v4(),
            car_id: Uuid::new_v4(),
            duration_type: DurationType::Daily,
            duration_count: 3,
            primary_guarantor_name: "John Doe".to_string(),
            primary_guarantor_phone: "+34123456789".to_string(),
            primary_guarantor_id_type: PASSPORT_ID_TYPE.to_string(),
            primary_guarantor_id_number: "X1234567".to_string(),
            secondary_guarantor_name: None,
            secondary_guarantor_phone: None,
            secondary_guarantor_id_type: None,
            secondary_guarantor_id_number: None,
            pickup_location: "Madrid".to_string(),
            return_location: None,
            rental_start_date: Utc::now(),
            rental_end_date: Utc::now(),
            return_date: None,
            mileage_at_rental: 12500,
            mileage_at_return: None,
            price_rate: dec!(50.00),
            total_price: dec!(150.00),
            discount_amount: dec!(0),
            final_price: dec!(150.00),
            additional_charges: None,
            final_total: dec!(150.00),
            is_active: true,
            is_paid: false,
            comments: None,
            pickup_service_check: None,
            return_service_check: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_passport_reads_id_number_only_for_passport_type() {
        let mut rental = sample_rental();
        assert_eq!(rental.passport(), Some("X1234567"));

        rental.primary_guarantor_id_type = "national_id".to_string();
        assert_eq!(rental.passport(), None);
        assert!(!rental.has_passport());
    }

    #[test]
    fn test_passport_write_then_read_round_trip() {
        let mut rental = sample_rental();
        rental.primary_guarantor_id_type = "national_id".to_string();
        rental.primary_guarantor_id_number = "DNI-999".to_string();

        rental.set_passport("P7654321".to_string());

        assert_eq!(rental.passport(), Some("P7654321"));
        assert_eq!(rental.primary_guarantor_id_type, PASSPORT_ID_TYPE);
        assert_eq!(rental.primary_guarantor_id_number, "P7654321");
    }

    #[test]
    fn test_duration_type_as_str() {
        assert_eq!(DurationType::Daily.as_str(), "daily");
        assert_eq!(DurationType::Weekly.as_str(), "weekly");
        assert_eq!(DurationType::Monthly.as_str(), "monthly");
    }
}
