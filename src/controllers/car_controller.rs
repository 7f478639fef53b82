//! Controller de coches

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::car_dto::{CarResponse, CreateCarRequest, UpdateCarRequest};
use crate::dto::rental_dto::RentalResponse;
use crate::dto::ApiResponse;
use crate::middleware::auth::{require_admin, AuthenticatedUser};
use crate::repositories::car_repository::CarRepository;
use crate::repositories::rental_repository::RentalRepository;
use crate::utils::errors::{not_found_error, validation_error, AppResult};

pub struct CarController {
    repository: CarRepository,
    rental_repository: RentalRepository,
}

impl CarController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CarRepository::new(pool.clone()),
            rental_repository: RentalRepository::new(pool),
        }
    }

    /// Alta de coche: solo admins. Nace disponible.
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateCarRequest,
    ) -> AppResult<ApiResponse<CarResponse>> {
        require_admin(user)?;
        request.validate()?;
        validate_rates(&request.price_per_day, &request.price_per_week, &request.price_per_month)?;

        let car = self.repository.create(request).await?;

        Ok(ApiResponse::success_with_message(
            CarResponse::from(car),
            "Car created successfully".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<CarResponse> {
        let car = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Car", &id.to_string()))?;

        Ok(CarResponse::from(car))
    }

    pub async fn list(&self) -> AppResult<Vec<CarResponse>> {
        let cars = self.repository.find_all().await?;
        Ok(cars.into_iter().map(CarResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateCarRequest,
    ) -> AppResult<ApiResponse<CarResponse>> {
        request.validate()?;
        if let Some(rate) = &request.price_per_day {
            validate_non_negative("price_per_day", rate)?;
        }
        if let Some(rate) = &request.price_per_week {
            validate_non_negative("price_per_week", rate)?;
        }
        if let Some(rate) = &request.price_per_month {
            validate_non_negative("price_per_month", rate)?;
        }

        let car = self.repository.update(id, request).await?;

        Ok(ApiResponse::success_with_message(
            CarResponse::from(car),
            "Car updated successfully".to_string(),
        ))
    }

    /// Baja de coche: solo admins; los alquileres caen en cascada.
    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        require_admin(user)?;
        self.repository.delete(id).await
    }

    /// Historial de alquileres de un coche
    pub async fn rentals_by_car(&self, car_id: Uuid) -> AppResult<Vec<RentalResponse>> {
        // NotFound explícito si el coche no existe
        self.repository
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| not_found_error("Car", &car_id.to_string()))?;

        let rentals = self.rental_repository.find_by_car_with_car(car_id).await?;

        Ok(rentals
            .into_iter()
            .map(|(rental, car)| RentalResponse::from_parts(rental, &car))
            .collect())
    }
}

fn validate_rates(
    day: &rust_decimal::Decimal,
    week: &rust_decimal::Decimal,
    month: &rust_decimal::Decimal,
) -> AppResult<()> {
    validate_non_negative("price_per_day", day)?;
    validate_non_negative("price_per_week", week)?;
    validate_non_negative("price_per_month", month)
}

fn validate_non_negative(field: &'static str, value: &rust_decimal::Decimal) -> AppResult<()> {
    if value.is_sign_negative() {
        return Err(validation_error(field, "must be non-negative"));
    }
    Ok(())
}
