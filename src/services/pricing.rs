//! Cálculo de precios de alquileres
//!
//! Funciones puras, sin acceso a base de datos. La tarifa se lee del rate
//! card vigente en el momento del cálculo y se snapshotea en el alquiler;
//! nunca se re-deriva después de un cambio de tarifas del coche.

use chrono::{DateTime, Duration, Months, Utc};
use rust_decimal::Decimal;

use crate::models::car::RateCard;
use crate::models::rental::DurationType;
use crate::utils::errors::{validation_error, AppError, AppResult};

/// Resultado del cálculo de precio para un alquiler activo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    pub price_rate: Decimal,
    pub total_price: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
    pub rental_end_date: DateTime<Utc>,
}

/// Fecha de fin: start + count × unidad. La suma de meses es calendario
/// real (Ene 31 + 1 mes cae en el último día de Febrero), no meses de 30
/// días fijos.
pub fn compute_end_date(
    start: DateTime<Utc>,
    duration_type: DurationType,
    duration_count: i32,
) -> AppResult<DateTime<Utc>> {
    let end = match duration_type {
        DurationType::Daily => start.checked_add_signed(Duration::days(duration_count as i64)),
        DurationType::Weekly => start.checked_add_signed(Duration::weeks(duration_count as i64)),
        DurationType::Monthly => start.checked_add_months(Months::new(duration_count as u32)),
    };

    end.ok_or_else(|| AppError::BadRequest("Rental end date is out of range".to_string()))
}

/// Calcula el quote completo: tarifa, total, descuento y fecha de fin.
///
/// Mientras el alquiler está activo final_total == final_price; los
/// additional_charges solo entran en la devolución.
pub fn quote(
    rate_card: &RateCard,
    duration_type: DurationType,
    duration_count: i32,
    start_date: DateTime<Utc>,
    discount_amount: Decimal,
) -> AppResult<PriceQuote> {
    if duration_count < 1 {
        return Err(validation_error("duration_count", "must be at least 1"));
    }

    let price_rate = rate_card.rate_for(duration_type);
    let total_price = (price_rate * Decimal::from(duration_count)).round_dp(2);

    if discount_amount < Decimal::ZERO {
        return Err(AppError::InvalidDiscount(
            "discount_amount cannot be negative".to_string(),
        ));
    }
    if discount_amount > total_price {
        return Err(AppError::InvalidDiscount(format!(
            "discount_amount {} exceeds total price {}",
            discount_amount, total_price
        )));
    }

    let final_price = total_price - discount_amount;
    let rental_end_date = compute_end_date(start_date, duration_type, duration_count)?;

    Ok(PriceQuote {
        price_rate,
        total_price,
        discount_amount,
        final_price,
        rental_end_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn card() -> RateCard {
        RateCard {
            price_per_day: dec!(50.00),
            price_per_week: dec!(300.00),
            price_per_month: dec!(1000.00),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_three_daily_units_at_fifty() {
        let q = quote(&card(), DurationType::Daily, 3, date(2025, 3, 1), Decimal::ZERO).unwrap();

        assert_eq!(q.price_rate, dec!(50.00));
        assert_eq!(q.total_price, dec!(150.00));
        assert_eq!(q.final_price, dec!(150.00));
        assert_eq!(q.rental_end_date, date(2025, 3, 4));
    }

    #[test]
    fn test_repricing_five_daily_units() {
        let q = quote(&card(), DurationType::Daily, 5, date(2025, 3, 1), Decimal::ZERO).unwrap();

        assert_eq!(q.total_price, dec!(250.00));
        assert_eq!(q.rental_end_date, date(2025, 3, 6));
    }

    #[test]
    fn test_weekly_end_date_and_total() {
        let q = quote(&card(), DurationType::Weekly, 2, date(2025, 3, 1), dec!(50)).unwrap();

        assert_eq!(q.total_price, dec!(600.00));
        assert_eq!(q.final_price, dec!(550.00));
        assert_eq!(q.rental_end_date, date(2025, 3, 15));
    }

    #[test]
    fn test_month_addition_is_calendar_aware() {
        // Ene 31 + 1 mes cae en el último día de Febrero
        let q = quote(&card(), DurationType::Monthly, 1, date(2025, 1, 31), Decimal::ZERO).unwrap();
        assert_eq!(q.rental_end_date, date(2025, 2, 28));

        // Año bisiesto
        let q = quote(&card(), DurationType::Monthly, 1, date(2024, 1, 31), Decimal::ZERO).unwrap();
        assert_eq!(q.rental_end_date, date(2024, 2, 29));
    }

    #[test]
    fn test_monthly_total_over_several_months() {
        let q = quote(&card(), DurationType::Monthly, 3, date(2025, 5, 15), Decimal::ZERO).unwrap();

        assert_eq!(q.total_price, dec!(3000.00));
        assert_eq!(q.rental_end_date, date(2025, 8, 15));
    }

    #[test]
    fn test_negative_discount_rejected() {
        let err = quote(&card(), DurationType::Daily, 3, date(2025, 3, 1), dec!(-1)).unwrap_err();
        assert!(matches!(err, AppError::InvalidDiscount(_)));
    }

    #[test]
    fn test_discount_above_total_rejected() {
        let err = quote(&card(), DurationType::Daily, 3, date(2025, 3, 1), dec!(151)).unwrap_err();
        assert!(matches!(err, AppError::InvalidDiscount(_)));
    }

    #[test]
    fn test_discount_equal_to_total_allowed() {
        let q = quote(&card(), DurationType::Daily, 3, date(2025, 3, 1), dec!(150)).unwrap();
        assert_eq!(q.final_price, dec!(0.00));
    }

    #[test]
    fn test_zero_duration_count_rejected() {
        let err =
            quote(&card(), DurationType::Daily, 0, date(2025, 3, 1), Decimal::ZERO).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
