//! Controller de alquileres
//!
//! Orquesta entre los DTOs validados y el motor del ciclo de vida
//! (RentalService). Toda transición de estado pasa por el servicio.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::rental_dto::{
    CreateRentalRequest, PaymentStatusRequest, RentalResponse, ReturnRentalRequest,
    UpdateRentalRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{require_admin, AuthenticatedUser};
use crate::repositories::car_repository::CarRepository;
use crate::repositories::rental_repository::RentalRepository;
use crate::services::rental_service::RentalService;
use crate::utils::errors::{not_found_error, AppResult};

pub struct RentalController {
    service: RentalService,
    repository: RentalRepository,
    car_repository: CarRepository,
}

impl RentalController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service: RentalService::new(pool.clone()),
            repository: RentalRepository::new(pool.clone()),
            car_repository: CarRepository::new(pool),
        }
    }

    pub async fn store(
        &self,
        request: CreateRentalRequest,
    ) -> AppResult<ApiResponse<RentalResponse>> {
        request.validate()?;

        let (rental, car) = self.service.start_rental(request).await?;

        Ok(ApiResponse::success_with_message(
            RentalResponse::from_parts(rental, &car),
            "Rental created successfully".to_string(),
        ))
    }

    pub async fn show(&self, id: Uuid) -> AppResult<RentalResponse> {
        let rental = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Rental", &id.to_string()))?;

        let car = self
            .car_repository
            .find_by_id(rental.car_id)
            .await?
            .ok_or_else(|| not_found_error("Car", &rental.car_id.to_string()))?;

        Ok(RentalResponse::from_parts(rental, &car))
    }

    pub async fn index(&self) -> AppResult<Vec<RentalResponse>> {
        let rentals = self.repository.find_all_with_car().await?;

        Ok(rentals
            .into_iter()
            .map(|(rental, car)| RentalResponse::from_parts(rental, &car))
            .collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateRentalRequest,
    ) -> AppResult<ApiResponse<RentalResponse>> {
        request.validate()?;

        let (rental, car) = self.service.update_rental(id, request).await?;

        Ok(ApiResponse::success_with_message(
            RentalResponse::from_parts(rental, &car),
            "Rental updated successfully".to_string(),
        ))
    }

    pub async fn return_car(
        &self,
        request: ReturnRentalRequest,
    ) -> AppResult<ApiResponse<RentalResponse>> {
        request.validate()?;

        let (rental, car) = self.service.return_rental(request).await?;

        Ok(ApiResponse::success_with_message(
            RentalResponse::from_parts(rental, &car),
            "Car returned successfully".to_string(),
        ))
    }

    pub async fn update_payment_status(
        &self,
        request: PaymentStatusRequest,
    ) -> AppResult<ApiResponse<RentalResponse>> {
        let (rental, car) = self.service.mark_paid(request.id).await?;

        Ok(ApiResponse::success_with_message(
            RentalResponse::from_parts(rental, &car),
            "Payment status updated successfully".to_string(),
        ))
    }

    /// Borrado: solo admins. Si el alquiler seguía activo el servicio
    /// libera el coche en la misma transacción.
    pub async fn destroy(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        require_admin(user)?;
        self.service.delete_rental(id).await
    }
}
