//! Fleet Registry: repositorio de coches
//!
//! Fuente única de verdad de "¿este coche se puede alquilar ahora?".
//! El flag is_available solo lo tocan set_available / set_available_tx,
//! nunca el update genérico.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::car_dto::{CreateCarRequest, UpdateCarRequest};
use crate::models::car::{Car, RateCard};
use crate::utils::errors::{not_found_error, AppResult};

pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateCarRequest) -> AppResult<Car> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (name, brand, model, description, year,
                              price_per_day, price_per_week, price_per_month,
                              current_mileage, is_available)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE)
            RETURNING *
            "#,
        )
        .bind(request.name)
        .bind(request.brand)
        .bind(request.model)
        .bind(request.description)
        .bind(request.year)
        .bind(request.price_per_day)
        .bind(request.price_per_week)
        .bind(request.price_per_month)
        .bind(request.current_mileage.unwrap_or(0))
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    pub async fn find_all(&self) -> AppResult<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>("SELECT * FROM cars ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(cars)
    }

    /// Rate card de un coche; NotFound si no existe
    pub async fn rate_card(&self, id: Uuid) -> AppResult<RateCard> {
        let card = sqlx::query_as::<_, RateCard>(
            "SELECT price_per_day, price_per_week, price_per_month FROM cars WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        card.ok_or_else(|| not_found_error("Car", &id.to_string()))
    }

    /// Flag de disponibilidad; NotFound si no existe
    pub async fn is_available(&self, id: Uuid) -> AppResult<bool> {
        let row: Option<(bool,)> = sqlx::query_as("SELECT is_available FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.0)
            .ok_or_else(|| not_found_error("Car", &id.to_string()))
    }

    /// Cambia el flag de disponibilidad. Idempotente; sin otros efectos.
    pub async fn set_available(&self, id: Uuid, available: bool) -> AppResult<()> {
        let result = sqlx::query("UPDATE cars SET is_available = $2 WHERE id = $1")
            .bind(id)
            .bind(available)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Car", &id.to_string()));
        }
        Ok(())
    }

    /// Update genérico. Nunca toca is_available: eso rompería el invariante
    /// disponible <=> sin alquiler activo.
    pub async fn update(&self, id: Uuid, request: UpdateCarRequest) -> AppResult<Car> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Car", &id.to_string()))?;

        let car = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET name = $2, brand = $3, model = $4, description = $5, year = $6,
                price_per_day = $7, price_per_week = $8, price_per_month = $9,
                current_mileage = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.name.unwrap_or(current.name))
        .bind(request.brand.unwrap_or(current.brand))
        .bind(request.model.or(current.model))
        .bind(request.description.or(current.description))
        .bind(request.year.unwrap_or(current.year))
        .bind(request.price_per_day.unwrap_or(current.price_per_day))
        .bind(request.price_per_week.unwrap_or(current.price_per_week))
        .bind(request.price_per_month.unwrap_or(current.price_per_month))
        .bind(request.current_mileage.unwrap_or(current.current_mileage))
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    /// Borra el coche; los alquileres referenciados caen en cascada
    /// (decisión intencional, protegida por el gate de admin).
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Car", &id.to_string()));
        }
        Ok(())
    }

    /// Lee el coche con row lock (SELECT ... FOR UPDATE) dentro de la
    /// transacción del motor de alquileres. Serializa el check-then-act
    /// sobre is_available: de dos startRental concurrentes sobre el mismo
    /// coche exactamente uno observa available = false.
    pub async fn lock_by_id(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> AppResult<Option<Car>> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(car)
    }

    /// Variante transaccional de set_available
    pub async fn set_available_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        available: bool,
    ) -> AppResult<()> {
        let result = sqlx::query("UPDATE cars SET is_available = $2 WHERE id = $1")
            .bind(id)
            .bind(available)
            .execute(&mut **tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Car", &id.to_string()));
        }
        Ok(())
    }
}
