//! DTOs de Rental
//!
//! La creación acepta tres formas de entrada para el garante primario:
//! campos canónicos, el campo dedicado `passport`, o los alias legacy
//! `renter_name` / `renter_phone` / `passport_number`. La respuesta emite
//! la forma canónica MÁS los alias legacy por compatibilidad.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::car::Car;
use crate::models::rental::{DurationType, Rental};

// Request para crear un alquiler
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRentalRequest {
    pub car_id: Uuid,
    pub duration_type: DurationType,

    #[validate(range(min = 1))]
    pub duration_count: i32,

    // Garante primario (forma canónica)
    pub primary_guarantor_name: Option<String>,
    pub primary_guarantor_phone: Option<String>,
    pub primary_guarantor_id_type: Option<String>,
    pub primary_guarantor_id_number: Option<String>,

    // Campo dedicado passport
    pub passport: Option<String>,

    // Garante secundario (los cuatro campos juntos o ninguno)
    pub secondary_guarantor_name: Option<String>,
    pub secondary_guarantor_phone: Option<String>,
    pub secondary_guarantor_id_type: Option<String>,
    pub secondary_guarantor_id_number: Option<String>,

    // Alias legacy
    pub renter_name: Option<String>,
    pub renter_phone: Option<String>,
    pub passport_number: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub pickup_location: String,

    pub rental_start_date: Option<DateTime<Utc>>,

    #[validate(range(min = 0))]
    pub mileage_at_rental: i64,

    pub discount_amount: Option<Decimal>,
    pub is_paid: Option<bool>,
    pub pickup_service_check: Option<serde_json::Value>,
}

// Request para actualizar un alquiler activo
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRentalRequest {
    pub primary_guarantor_name: Option<String>,
    pub primary_guarantor_phone: Option<String>,
    pub primary_guarantor_id_type: Option<String>,
    pub primary_guarantor_id_number: Option<String>,

    pub passport: Option<String>,

    pub secondary_guarantor_name: Option<String>,
    pub secondary_guarantor_phone: Option<String>,
    pub secondary_guarantor_id_type: Option<String>,
    pub secondary_guarantor_id_number: Option<String>,

    pub renter_name: Option<String>,
    pub renter_phone: Option<String>,
    pub passport_number: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub pickup_location: Option<String>,

    pub rental_start_date: Option<DateTime<Utc>>,
    pub duration_type: Option<DurationType>,

    #[validate(range(min = 1))]
    pub duration_count: Option<i32>,

    #[validate(range(min = 0))]
    pub mileage_at_rental: Option<i64>,

    pub discount_amount: Option<Decimal>,
    pub is_paid: Option<bool>,
    pub comments: Option<String>,
    pub pickup_service_check: Option<serde_json::Value>,
}

// Request para devolver un coche
#[derive(Debug, Deserialize, Validate)]
pub struct ReturnRentalRequest {
    pub id: Uuid,

    #[validate(range(min = 0))]
    pub mileage_at_return: i64,

    pub additional_charges: Option<Decimal>,

    #[validate(length(min = 1, max = 255))]
    pub return_location: Option<String>,

    pub comments: Option<String>,
    pub return_service_check: Option<serde_json::Value>,
}

// Request para marcar un alquiler como pagado
#[derive(Debug, Deserialize)]
pub struct PaymentStatusRequest {
    pub id: Uuid,
}

// Información básica del coche embebida en la respuesta del alquiler
#[derive(Debug, Serialize)]
pub struct RentalCarSummary {
    pub id: Uuid,
    pub name: String,
    pub price_daily: Decimal,
    pub price_weekly: Decimal,
    pub price_monthly: Decimal,
    pub is_available: bool,
    pub brand: String,
    pub model: Option<String>,
}

impl From<&Car> for RentalCarSummary {
    fn from(car: &Car) -> Self {
        Self {
            id: car.id,
            name: car.name.clone(),
            price_daily: car.price_per_day,
            price_weekly: car.price_per_week,
            price_monthly: car.price_per_month,
            is_available: car.is_available,
            brand: car.brand.clone(),
            model: car.model.clone(),
        }
    }
}

// Response de alquiler: forma canónica + proyección passport + alias legacy
#[derive(Debug, Serialize)]
pub struct RentalResponse {
    pub id: Uuid,
    pub car_id: Uuid,
    pub duration_type: DurationType,
    pub duration_count: i32,

    pub primary_guarantor_name: String,
    pub primary_guarantor_phone: String,
    pub primary_guarantor_id_type: String,
    pub primary_guarantor_id_number: String,

    // Proyección derivada, nunca una columna
    pub passport: Option<String>,
    pub has_passport: bool,

    pub secondary_guarantor_name: Option<String>,
    pub secondary_guarantor_phone: Option<String>,
    pub secondary_guarantor_id_type: Option<String>,
    pub secondary_guarantor_id_number: Option<String>,

    // Alias legacy por compatibilidad con clientes antiguos
    pub renter_name: String,
    pub renter_phone: String,
    pub passport_number: Option<String>,

    pub pickup_location: String,
    pub return_location: Option<String>,
    pub rental_start_date: DateTime<Utc>,
    pub rental_end_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,

    pub price_rate: Decimal,
    pub total_price: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
    pub additional_charges: Option<Decimal>,
    pub final_total: Decimal,

    pub mileage_at_rental: i64,
    pub mileage_at_return: Option<i64>,

    pub is_active: bool,
    pub is_paid: bool,

    pub comments: Option<String>,
    pub pickup_service_check: Option<serde_json::Value>,
    pub return_service_check: Option<serde_json::Value>,

    pub created_at: DateTime<Utc>,
    pub car: RentalCarSummary,
}

impl RentalResponse {
    pub fn from_parts(rental: Rental, car: &Car) -> Self {
        let passport = rental.passport().map(|p| p.to_string());
        Self {
            id: rental.id,
            car_id: rental.car_id,
            duration_type: rental.duration_type,
            duration_count: rental.duration_count,
            has_passport: rental.has_passport(),
            passport: passport.clone(),
            passport_number: passport,
            renter_name: rental.primary_guarantor_name.clone(),
            renter_phone: rental.primary_guarantor_phone.clone(),
            primary_guarantor_name: rental.primary_guarantor_name,
            primary_guarantor_phone: rental.primary_guarantor_phone,
            primary_guarantor_id_type: rental.primary_guarantor_id_type,
            primary_guarantor_id_number: rental.primary_guarantor_id_number,
            secondary_guarantor_name: rental.secondary_guarantor_name,
            secondary_guarantor_phone: rental.secondary_guarantor_phone,
            secondary_guarantor_id_type: rental.secondary_guarantor_id_type,
            secondary_guarantor_id_number: rental.secondary_guarantor_id_number,
            pickup_location: rental.pickup_location,
            return_location: rental.return_location,
            rental_start_date: rental.rental_start_date,
            rental_end_date: rental.rental_end_date,
            return_date: rental.return_date,
            price_rate: rental.price_rate,
            total_price: rental.total_price,
            discount_amount: rental.discount_amount,
            final_price: rental.final_price,
            additional_charges: rental.additional_charges,
            final_total: rental.final_total,
            mileage_at_rental: rental.mileage_at_rental,
            mileage_at_return: rental.mileage_at_return,
            is_active: rental.is_active,
            is_paid: rental.is_paid,
            comments: rental.comments,
            pickup_service_check: rental.pickup_service_check,
            return_service_check: rental.return_service_check,
            created_at: rental.created_at,
            car: RentalCarSummary::from(car),
        }
    }
}
