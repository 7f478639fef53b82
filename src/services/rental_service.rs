//! Motor del ciclo de vida de alquileres
//!
//! Único escritor de filas de rentals. Dos estados: Activo -> Cerrado
//! (terminal, sin reapertura). Cada transición que toca el par
//! (is_available del coche, alquiler activo) va en UNA transacción con el
//! coche bloqueado FOR UPDATE: de dos startRental concurrentes sobre el
//! mismo coche gana exactamente uno, el otro recibe CarUnavailable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::rental_dto::{CreateRentalRequest, ReturnRentalRequest, UpdateRentalRequest};
use crate::models::car::Car;
use crate::models::rental::Rental;
use crate::repositories::car_repository::CarRepository;
use crate::repositories::rental_repository::{NewRental, RentalRepository};
use crate::services::guarantor::{
    normalize_guarantor, validate_secondary_guarantor, GuarantorInput,
};
use crate::services::pricing;
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};

pub struct RentalService {
    pool: PgPool,
}

impl RentalService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crea un alquiler y marca el coche como no disponible, atómicamente.
    pub async fn start_rental(&self, request: CreateRentalRequest) -> AppResult<(Rental, Car)> {
        validate_secondary_guarantor(
            &request.secondary_guarantor_name,
            &request.secondary_guarantor_phone,
            &request.secondary_guarantor_id_type,
            &request.secondary_guarantor_id_number,
        )?;

        let guarantor = normalize_guarantor(GuarantorInput {
            name: request.primary_guarantor_name,
            phone: request.primary_guarantor_phone,
            id_type: request.primary_guarantor_id_type,
            id_number: request.primary_guarantor_id_number,
            passport: request.passport,
            passport_number: request.passport_number,
            renter_name: request.renter_name,
            renter_phone: request.renter_phone,
        })
        .into_required()?;

        let start_date = request.rental_start_date.unwrap_or_else(Utc::now);
        let discount = request.discount_amount.unwrap_or(Decimal::ZERO);

        let mut tx = self.pool.begin().await?;

        let car = CarRepository::lock_by_id(&mut tx, request.car_id)
            .await?
            .ok_or_else(|| not_found_error("Car", &request.car_id.to_string()))?;

        if !car.is_available {
            return Err(AppError::CarUnavailable);
        }

        // Tarifa del rate card vigente, snapshoteada en el alquiler
        let quote = pricing::quote(
            &car.rate_card(),
            request.duration_type,
            request.duration_count,
            start_date,
            discount,
        )?;

        let rental = RentalRepository::insert_tx(
            &mut tx,
            NewRental {
                car_id: car.id,
                duration_type: request.duration_type,
                duration_count: request.duration_count,
                primary_guarantor_name: guarantor.name,
                primary_guarantor_phone: guarantor.phone,
                primary_guarantor_id_type: guarantor.id_type,
                primary_guarantor_id_number: guarantor.id_number,
                secondary_guarantor_name: request.secondary_guarantor_name,
                secondary_guarantor_phone: request.secondary_guarantor_phone,
                secondary_guarantor_id_type: request.secondary_guarantor_id_type,
                secondary_guarantor_id_number: request.secondary_guarantor_id_number,
                pickup_location: request.pickup_location,
                rental_start_date: start_date,
                rental_end_date: quote.rental_end_date,
                mileage_at_rental: request.mileage_at_rental,
                price_rate: quote.price_rate,
                total_price: quote.total_price,
                discount_amount: quote.discount_amount,
                final_price: quote.final_price,
                is_paid: request.is_paid.unwrap_or(false),
                pickup_service_check: request.pickup_service_check,
            },
        )
        .await?;

        CarRepository::set_available_tx(&mut tx, car.id, false).await?;

        tx.commit().await?;

        tracing::info!(
            rental_id = %rental.id,
            car_id = %car.id,
            "Rental started: {} x {}",
            rental.duration_count,
            rental.duration_type.as_str()
        );

        Ok((rental, car))
    }

    /// Actualiza un alquiler activo. Si cambian tipo de duración, número de
    /// unidades o fecha de inicio, reprecia contra el rate card ACTUAL del
    /// coche (intencional: las ediciones cotizan a tarifas de hoy, no al
    /// snapshot original).
    pub async fn update_rental(
        &self,
        id: Uuid,
        request: UpdateRentalRequest,
    ) -> AppResult<(Rental, Car)> {
        let mut tx = self.pool.begin().await?;

        let mut rental = RentalRepository::lock_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Rental", &id.to_string()))?;

        if !rental.is_active {
            return Err(AppError::RentalClosed(
                "cannot update a completed rental".to_string(),
            ));
        }

        let car = CarRepository::lock_by_id(&mut tx, rental.car_id)
            .await?
            .ok_or_else(|| not_found_error("Car", &rental.car_id.to_string()))?;

        // Normalización con la misma precedencia que en create: un passport
        // nuevo pisa cualquier id_type persistido.
        let guarantor = normalize_guarantor(GuarantorInput {
            name: request.primary_guarantor_name,
            phone: request.primary_guarantor_phone,
            id_type: request.primary_guarantor_id_type,
            id_number: request.primary_guarantor_id_number,
            passport: request.passport,
            passport_number: request.passport_number,
            renter_name: request.renter_name,
            renter_phone: request.renter_phone,
        });

        if let Some(name) = guarantor.name {
            rental.primary_guarantor_name = name;
        }
        if let Some(phone) = guarantor.phone {
            rental.primary_guarantor_phone = phone;
        }
        if let Some(id_type) = guarantor.id_type {
            rental.primary_guarantor_id_type = id_type;
        }
        if let Some(id_number) = guarantor.id_number {
            rental.primary_guarantor_id_number = id_number;
        }

        if request.secondary_guarantor_name.is_some()
            || request.secondary_guarantor_phone.is_some()
            || request.secondary_guarantor_id_type.is_some()
            || request.secondary_guarantor_id_number.is_some()
        {
            validate_secondary_guarantor(
                &request.secondary_guarantor_name,
                &request.secondary_guarantor_phone,
                &request.secondary_guarantor_id_type,
                &request.secondary_guarantor_id_number,
            )?;
            rental.secondary_guarantor_name = request.secondary_guarantor_name;
            rental.secondary_guarantor_phone = request.secondary_guarantor_phone;
            rental.secondary_guarantor_id_type = request.secondary_guarantor_id_type;
            rental.secondary_guarantor_id_number = request.secondary_guarantor_id_number;
        }

        let reprice = request.duration_type.is_some()
            || request.duration_count.is_some()
            || request.rental_start_date.is_some();

        if let Some(pickup) = request.pickup_location {
            rental.pickup_location = pickup;
        }
        if let Some(mileage) = request.mileage_at_rental {
            rental.mileage_at_rental = mileage;
        }
        if let Some(paid) = request.is_paid {
            rental.is_paid = paid;
        }
        if let Some(comments) = request.comments {
            rental.comments = Some(comments);
        }
        if let Some(check) = request.pickup_service_check {
            rental.pickup_service_check = Some(check);
        }

        if reprice {
            let duration_type = request.duration_type.unwrap_or(rental.duration_type);
            let duration_count = request.duration_count.unwrap_or(rental.duration_count);
            let start_date = request.rental_start_date.unwrap_or(rental.rental_start_date);
            let discount = request.discount_amount.unwrap_or(rental.discount_amount);

            let quote = pricing::quote(
                &car.rate_card(),
                duration_type,
                duration_count,
                start_date,
                discount,
            )?;

            rental.duration_type = duration_type;
            rental.duration_count = duration_count;
            rental.rental_start_date = start_date;
            rental.rental_end_date = quote.rental_end_date;
            rental.price_rate = quote.price_rate;
            rental.total_price = quote.total_price;
            rental.discount_amount = quote.discount_amount;
            rental.final_price = quote.final_price;
            // Activo: sin additional_charges todavía
            rental.final_total = quote.final_price;
        } else if let Some(discount) = request.discount_amount {
            // Solo cambió el descuento: el total no se mueve, pero
            // final_price/final_total deben seguir cuadrando.
            if discount < Decimal::ZERO {
                return Err(AppError::InvalidDiscount(
                    "discount_amount cannot be negative".to_string(),
                ));
            }
            if discount > rental.total_price {
                return Err(AppError::InvalidDiscount(format!(
                    "discount_amount {} exceeds total price {}",
                    discount, rental.total_price
                )));
            }
            rental.discount_amount = discount;
            rental.final_price = rental.total_price - discount;
            rental.final_total = rental.final_price;
        }

        let updated = RentalRepository::update_tx(&mut tx, &rental).await?;
        tx.commit().await?;

        Ok((updated, car))
    }

    /// Devolución: única transición Activo -> Cerrado, exactamente una vez.
    /// Libera el coche en la misma transacción.
    pub async fn return_rental(&self, request: ReturnRentalRequest) -> AppResult<(Rental, Car)> {
        let mut tx = self.pool.begin().await?;

        let mut rental = RentalRepository::lock_by_id(&mut tx, request.id)
            .await?
            .ok_or_else(|| not_found_error("Rental", &request.id.to_string()))?;

        let car = CarRepository::lock_by_id(&mut tx, rental.car_id)
            .await?
            .ok_or_else(|| not_found_error("Car", &rental.car_id.to_string()))?;

        apply_return(&mut rental, request, Utc::now())?;

        let closed = RentalRepository::update_tx(&mut tx, &rental).await?;
        CarRepository::set_available_tx(&mut tx, car.id, true).await?;

        tx.commit().await?;

        tracing::info!(
            rental_id = %closed.id,
            car_id = %car.id,
            "Rental returned, final total {}",
            closed.final_total
        );

        Ok((closed, car))
    }

    /// Borra un alquiler. Si aún estaba activo, libera el coche en la misma
    /// transacción para no dejarlo bloqueado para siempre.
    pub async fn delete_rental(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let rental = RentalRepository::lock_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Rental", &id.to_string()))?;

        if rental.is_active {
            CarRepository::set_available_tx(&mut tx, rental.car_id, true).await?;
        }

        RentalRepository::delete_tx(&mut tx, id).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Marca como pagado; permitido en activos y cerrados, idempotente.
    pub async fn mark_paid(&self, id: Uuid) -> AppResult<(Rental, Car)> {
        let repository = RentalRepository::new(self.pool.clone());
        let rental = repository
            .mark_paid(id)
            .await?
            .ok_or_else(|| not_found_error("Rental", &id.to_string()))?;

        let car = CarRepository::new(self.pool.clone())
            .find_by_id(rental.car_id)
            .await?
            .ok_or_else(|| not_found_error("Car", &rental.car_id.to_string()))?;

        Ok((rental, car))
    }
}

/// Aplica una devolución sobre un alquiler en memoria. Función pura: valida
/// todo antes de mutar, así un rechazo deja el alquiler intacto.
///
/// Al cerrar: final_total = final_price + additional_charges, y el
/// return_location por defecto es el pickup_location.
fn apply_return(
    rental: &mut Rental,
    request: ReturnRentalRequest,
    now: DateTime<Utc>,
) -> AppResult<()> {
    let additional_charges = request.additional_charges.unwrap_or(Decimal::ZERO);
    if additional_charges < Decimal::ZERO {
        return Err(validation_error("additional_charges", "cannot be negative"));
    }

    if !rental.is_active {
        return Err(AppError::RentalClosed(
            "this rental has already been returned".to_string(),
        ));
    }

    if request.mileage_at_return < rental.mileage_at_rental {
        return Err(AppError::InvalidMileage(format!(
            "mileage_at_return {} is below mileage_at_rental {}",
            request.mileage_at_return, rental.mileage_at_rental
        )));
    }

    rental.return_date = Some(now);
    rental.mileage_at_return = Some(request.mileage_at_return);
    rental.additional_charges = Some(additional_charges);
    rental.final_total = rental.final_price + additional_charges;
    rental.return_location = request
        .return_location
        .or_else(|| Some(rental.pickup_location.clone()));
    rental.is_active = false;
    if let Some(comments) = request.comments {
        rental.comments = Some(comments);
    }
    if let Some(check) = request.return_service_check {
        rental.return_service_check = Some(check);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rental::{DurationType, PASSPORT_ID_TYPE};
    use rust_decimal_macros::dec;

    fn active_rental() -> Rental {
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
            discount_amount: dec!(10.00),
            final_price: dec!(140.00),
            additional_charges: None,
            final_total: dec!(140.00),
            is_active: true,
            is_paid: false,
            comments: None,
            pickup_service_check: None,
            return_service_check: None,
            created_at: Utc::now(),
        }
    }

    fn return_request(rental: &Rental, mileage: i64) -> ReturnRentalRequest {
        ReturnRentalRequest {
            id: rental.id,
            mileage_at_return: mileage,
            additional_charges: None,
            return_location: None,
            comments: None,
            return_service_check: None,
        }
    }

    #[test]
    fn test_return_with_charges_adds_them_to_final_total() {
        let mut rental = active_rental();
        let mut request = return_request(&rental, 12800);
        request.additional_charges = Some(dec!(25.00));
        request.return_location = Some("Barcelona".to_string());

        apply_return(&mut rental, request, Utc::now()).unwrap();

        assert!(!rental.is_active);
        assert_eq!(rental.final_total, dec!(165.00)); // 140 + 25
        assert_eq!(rental.final_price, dec!(140.00)); // sin cambios
        assert_eq!(rental.mileage_at_return, Some(12800));
        assert_eq!(rental.return_location.as_deref(), Some("Barcelona"));
        assert!(rental.return_date.is_some());
    }

    #[test]
    fn test_return_without_charges_keeps_final_total_equal_to_final_price() {
        let mut rental = active_rental();
        let request = return_request(&rental, 12500);

        apply_return(&mut rental, request, Utc::now()).unwrap();

        assert_eq!(rental.additional_charges, Some(Decimal::ZERO));
        assert_eq!(rental.final_total, rental.final_price);
        // Sin return_location explícito, hereda el pickup
        assert_eq!(rental.return_location.as_deref(), Some("Madrid"));
    }

    #[test]
    fn test_double_return_is_rejected() {
        let mut rental = active_rental();
        let first_request = return_request(&rental, 12800);
        apply_return(&mut rental, first_request, Utc::now()).unwrap();

        let second_request = return_request(&rental, 12900);
        let err = apply_return(&mut rental, second_request, Utc::now()).unwrap_err();

        assert!(matches!(err, AppError::RentalClosed(_)));
        // La primera devolución queda intacta
        assert_eq!(rental.mileage_at_return, Some(12800));
    }

    #[test]
    fn test_low_mileage_is_rejected_without_mutating_the_rental() {
        let mut rental = active_rental();
        let before = rental.clone();

        let request = return_request(&rental, 12000);
        let err = apply_return(&mut rental, request, Utc::now()).unwrap_err();

        assert!(matches!(err, AppError::InvalidMileage(_)));
        assert!(rental.is_active);
        assert_eq!(rental.mileage_at_return, before.mileage_at_return);
        assert_eq!(rental.final_total, before.final_total);
        assert_eq!(rental.return_date, before.return_date);
    }

    #[test]
    fn test_negative_charges_are_rejected_before_any_mutation() {
        let mut rental = active_rental();
        let mut request = return_request(&rental, 12800);
        request.additional_charges = Some(dec!(-5.00));

        let err = apply_return(&mut rental, request, Utc::now()).unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(rental.is_active);
    }

    #[test]
    fn test_return_at_same_mileage_is_allowed() {
        let mut rental = active_rental();
        let request = return_request(&rental, rental.mileage_at_rental);

        assert!(apply_return(&mut rental, request, Utc::now()).is_ok());
    }
}
