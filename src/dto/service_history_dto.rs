//! DTOs del historial de mantenimiento
//!
//! El wire format conserva las claves camelCase `shopName` / `carDetails`
//! que los clientes existentes ya consumen.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::car::Car;
use crate::models::service_history::ServiceHistory;

// Resumen del coche embebido en cada registro
#[derive(Debug, Serialize)]
pub struct ServiceHistoryCarDetails {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub model: Option<String>,
}

// Registro de mantenimiento con su coche
#[derive(Debug, Serialize)]
pub struct ServiceHistoryResponse {
    pub date: DateTime<Utc>,
    #[serde(rename = "shopName")]
    pub shop_name: String,
    pub services: serde_json::Value,
    pub notes: Option<String>,
    #[serde(rename = "carDetails")]
    pub car_details: ServiceHistoryCarDetails,
}

impl ServiceHistoryResponse {
    pub fn from_parts(record: ServiceHistory, car: &Car) -> Self {
        Self {
            date: record.date,
            shop_name: record.shop_name,
            services: record.services,
            notes: record.notes,
            car_details: ServiceHistoryCarDetails {
                id: car.id,
                name: car.name.clone(),
                brand: car.brand.clone(),
                model: car.model.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn sample_car() -> Car {
        Car {
            id: Uuid::new_v4(),
            name: "Corolla Blanco".to_string(),
            brand: "Toyota".to_string(),
            model: Some("Corolla".to_string()),
            description: None,
            year: 2022,
            price_per_day: dec!(50.00),
            price_per_week: dec!(300.00),
            price_per_month: dec!(1000.00),
            current_mileage: 12000,
            is_available: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_wire_format_uses_camel_case_aliases() {
        let car = sample_car();
        let record = ServiceHistory {
            id: Uuid::new_v4(),
            car_id: car.id,
            date: Utc::now(),
            shop_name: "Taller García".to_string(),
            services: json!(["oil change", "brake pads"]),
            notes: None,
            created_at: Utc::now(),
        };

        let response = ServiceHistoryResponse::from_parts(record, &car);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["shopName"], "Taller García");
        assert_eq!(value["carDetails"]["brand"], "Toyota");
        assert_eq!(value["services"][0], "oil change");
        assert!(value.get("shop_name").is_none());
    }
}
