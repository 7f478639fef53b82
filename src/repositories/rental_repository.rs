//! Repositorio de alquileres
//!
//! El motor de alquileres (RentalService) es el único escritor de filas de
//! rentals; las escrituras van siempre dentro de su transacción.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::car::Car;
use crate::models::rental::{DurationType, Rental};
use crate::utils::errors::AppResult;

/// Fila nueva de rental, ya normalizada y con el pricing calculado
#[derive(Debug)]
pub struct NewRental {
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
    pub rental_start_date: DateTime<Utc>,
    pub rental_end_date: DateTime<Utc>,
    pub mileage_at_rental: i64,
    pub price_rate: Decimal,
    pub total_price: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
    pub is_paid: bool,
    pub pickup_service_check: Option<serde_json::Value>,
}

pub struct RentalRepository {
    pool: PgPool,
}

impl RentalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Rental>> {
        let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(rental)
    }

    pub async fn find_all(&self) -> AppResult<Vec<Rental>> {
        let rentals =
            sqlx::query_as::<_, Rental>("SELECT * FROM rentals ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(rentals)
    }

    pub async fn find_by_car(&self, car_id: Uuid) -> AppResult<Vec<Rental>> {
        let rentals = sqlx::query_as::<_, Rental>(
            "SELECT * FROM rentals WHERE car_id = $1 ORDER BY created_at DESC",
        )
        .bind(car_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rentals)
    }

    /// Alquileres con su coche, para las respuestas que embeben el resumen
    /// del coche. Dos queries y join en memoria.
    pub async fn find_all_with_car(&self) -> AppResult<Vec<(Rental, Car)>> {
        let rentals = self.find_all().await?;
        self.attach_cars(rentals).await
    }

    pub async fn find_by_car_with_car(&self, car_id: Uuid) -> AppResult<Vec<(Rental, Car)>> {
        let rentals = self.find_by_car(car_id).await?;
        self.attach_cars(rentals).await
    }

    async fn attach_cars(&self, rentals: Vec<Rental>) -> AppResult<Vec<(Rental, Car)>> {
        let car_ids: Vec<Uuid> = rentals.iter().map(|r| r.car_id).collect();
        let cars = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = ANY($1)")
            .bind(&car_ids)
            .fetch_all(&self.pool)
            .await?;

        let mut by_id: HashMap<Uuid, Car> = cars.into_iter().map(|c| (c.id, c)).collect();

        // Un rental sin coche no puede existir (FK), pero no entramos en
        // pánico si la fila desapareció entre las dos queries.
        Ok(rentals
            .into_iter()
            .filter_map(|r| by_id.remove(&r.car_id).map(|c| (r, c)))
            .collect())
    }

    /// Lee el alquiler con row lock dentro de la transacción del motor
    pub async fn lock_by_id(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> AppResult<Option<Rental>> {
        let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(rental)
    }

    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        new_rental: NewRental,
    ) -> AppResult<Rental> {
        let rental = sqlx::query_as::<_, Rental>(
            r#"
            INSERT INTO rentals (
                car_id, duration_type, duration_count,
                primary_guarantor_name, primary_guarantor_phone,
                primary_guarantor_id_type, primary_guarantor_id_number,
                secondary_guarantor_name, secondary_guarantor_phone,
                secondary_guarantor_id_type, secondary_guarantor_id_number,
                pickup_location, rental_start_date, rental_end_date,
                mileage_at_rental, price_rate, total_price, discount_amount,
                final_price, final_total, is_active, is_paid,
                pickup_service_check
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $19, TRUE, $20, $21)
            RETURNING *
            "#,
        )
        .bind(new_rental.car_id)
        .bind(new_rental.duration_type)
        .bind(new_rental.duration_count)
        .bind(new_rental.primary_guarantor_name)
        .bind(new_rental.primary_guarantor_phone)
        .bind(new_rental.primary_guarantor_id_type)
        .bind(new_rental.primary_guarantor_id_number)
        .bind(new_rental.secondary_guarantor_name)
        .bind(new_rental.secondary_guarantor_phone)
        .bind(new_rental.secondary_guarantor_id_type)
        .bind(new_rental.secondary_guarantor_id_number)
        .bind(new_rental.pickup_location)
        .bind(new_rental.rental_start_date)
        .bind(new_rental.rental_end_date)
        .bind(new_rental.mileage_at_rental)
        .bind(new_rental.price_rate)
        .bind(new_rental.total_price)
        .bind(new_rental.discount_amount)
        .bind(new_rental.final_price)
        .bind(new_rental.is_paid)
        .bind(new_rental.pickup_service_check)
        .fetch_one(&mut **tx)
        .await?;

        Ok(rental)
    }

    /// Persiste el estado completo de un rental ya mutado por el motor.
    /// Escribe todas las columnas mutables; id y created_at no cambian.
    pub async fn update_tx(
        tx: &mut Transaction<'_, Postgres>,
        rental: &Rental,
    ) -> AppResult<Rental> {
        let updated = sqlx::query_as::<_, Rental>(
            r#"
            UPDATE rentals SET
                duration_type = $2, duration_count = $3,
                primary_guarantor_name = $4, primary_guarantor_phone = $5,
                primary_guarantor_id_type = $6, primary_guarantor_id_number = $7,
                secondary_guarantor_name = $8, secondary_guarantor_phone = $9,
                secondary_guarantor_id_type = $10, secondary_guarantor_id_number = $11,
                pickup_location = $12, return_location = $13,
                rental_start_date = $14, rental_end_date = $15, return_date = $16,
                mileage_at_rental = $17, mileage_at_return = $18,
                price_rate = $19, total_price = $20, discount_amount = $21,
                final_price = $22, additional_charges = $23, final_total = $24,
                is_active = $25, is_paid = $26, comments = $27,
                pickup_service_check = $28, return_service_check = $29
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(rental.id)
        .bind(rental.duration_type)
        .bind(rental.duration_count)
        .bind(&rental.primary_guarantor_name)
        .bind(&rental.primary_guarantor_phone)
        .bind(&rental.primary_guarantor_id_type)
        .bind(&rental.primary_guarantor_id_number)
        .bind(&rental.secondary_guarantor_name)
        .bind(&rental.secondary_guarantor_phone)
        .bind(&rental.secondary_guarantor_id_type)
        .bind(&rental.secondary_guarantor_id_number)
        .bind(&rental.pickup_location)
        .bind(&rental.return_location)
        .bind(rental.rental_start_date)
        .bind(rental.rental_end_date)
        .bind(rental.return_date)
        .bind(rental.mileage_at_rental)
        .bind(rental.mileage_at_return)
        .bind(rental.price_rate)
        .bind(rental.total_price)
        .bind(rental.discount_amount)
        .bind(rental.final_price)
        .bind(rental.additional_charges)
        .bind(rental.final_total)
        .bind(rental.is_active)
        .bind(rental.is_paid)
        .bind(&rental.comments)
        .bind(&rental.pickup_service_check)
        .bind(&rental.return_service_check)
        .fetch_one(&mut **tx)
        .await?;

        Ok(updated)
    }

    pub async fn delete_tx(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM rentals WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Marca como pagado. Permitido en activos y cerrados, idempotente.
    pub async fn mark_paid(&self, id: Uuid) -> AppResult<Option<Rental>> {
        let rental = sqlx::query_as::<_, Rental>(
            "UPDATE rentals SET is_paid = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rental)
    }
}
