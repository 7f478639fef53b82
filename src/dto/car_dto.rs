//! DTOs de Car

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::car::Car;

// Request para crear un coche
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub brand: String,

    #[validate(length(max = 100))]
    pub model: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,

    pub price_per_day: Decimal,
    pub price_per_week: Decimal,
    pub price_per_month: Decimal,

    #[validate(range(min = 0))]
    pub current_mileage: Option<i64>,
}

// Request para actualizar un coche.
// Sin campo is_available: la disponibilidad solo la muta el motor de
// alquileres, nunca el update genérico.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub brand: Option<String>,

    #[validate(length(max = 100))]
    pub model: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,

    pub price_per_day: Option<Decimal>,
    pub price_per_week: Option<Decimal>,
    pub price_per_month: Option<Decimal>,

    #[validate(range(min = 0))]
    pub current_mileage: Option<i64>,
}

// Response de coche
#[derive(Debug, Serialize)]
pub struct CarResponse {
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

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        Self {
            id: car.id,
            name: car.name,
            brand: car.brand,
            model: car.model,
            description: car.description,
            year: car.year,
            price_per_day: car.price_per_day,
            price_per_week: car.price_per_week,
            price_per_month: car.price_per_month,
            current_mileage: car.current_mileage,
            is_available: car.is_available,
            created_at: car.created_at,
        }
    }
}
