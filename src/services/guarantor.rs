//! Normalización del garante primario
//!
//! Una sola función de precedencia en el boundary convierte las tres formas
//! de entrada aceptadas en la forma canónica. La precedencia es estricta y
//! total, idéntica en create y update:
//!
//!   1. campo dedicado `passport`
//!   2. alias legacy `passport_number` / `renter_name` / `renter_phone`
//!   3. par explícito `id_type` / `id_number` (id_type por defecto "passport")

use crate::models::rental::PASSPORT_ID_TYPE;
use crate::utils::errors::{validation_error, AppError, AppResult};

/// Campos de entrada del garante primario, tal como llegan del request
#[derive(Debug, Default, Clone)]
pub struct GuarantorInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
    pub passport: Option<String>,
    pub passport_number: Option<String>,
    pub renter_name: Option<String>,
    pub renter_phone: Option<String>,
}

/// Forma canónica ya resuelta. `None` significa "no suministrado en esta
/// llamada" (relevante en updates parciales).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedGuarantor {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
}

/// Aplica la precedencia passport > legacy > par explícito.
pub fn normalize_guarantor(input: GuarantorInput) -> NormalizedGuarantor {
    let name = input.name.or(input.renter_name);
    let phone = input.phone.or(input.renter_phone);

    let (id_type, id_number) = if let Some(passport) = input.passport {
        // El campo dedicado gana siempre, aunque vengan otros campos de id
        (Some(PASSPORT_ID_TYPE.to_string()), Some(passport))
    } else if let Some(passport_number) = input.passport_number {
        // passport_number legacy fuerza id_type = passport
        (Some(PASSPORT_ID_TYPE.to_string()), Some(passport_number))
    } else {
        match (input.id_type, input.id_number) {
            (id_type, Some(number)) => (
                Some(id_type.unwrap_or_else(|| PASSPORT_ID_TYPE.to_string())),
                Some(number),
            ),
            (Some(id_type), None) => (Some(id_type), None),
            (None, None) => (None, None),
        }
    };

    NormalizedGuarantor {
        name,
        phone,
        id_type,
        id_number,
    }
}

/// Garante primario completo, requerido en la creación
#[derive(Debug, Clone)]
pub struct PrimaryGuarantor {
    pub name: String,
    pub phone: String,
    pub id_type: String,
    pub id_number: String,
}

impl NormalizedGuarantor {
    /// En create los tres campos obligatorios deben estar presentes tras
    /// la normalización; id_type ya viene con su default.
    pub fn into_required(self) -> AppResult<PrimaryGuarantor> {
        let name = self
            .name
            .ok_or_else(|| validation_error("primary_guarantor_name", "is required"))?;
        let phone = self
            .phone
            .ok_or_else(|| validation_error("primary_guarantor_phone", "is required"))?;
        let id_number = self
            .id_number
            .ok_or_else(|| validation_error("primary_guarantor_id_number", "is required"))?;
        let id_type = self
            .id_type
            .unwrap_or_else(|| PASSPORT_ID_TYPE.to_string());

        Ok(PrimaryGuarantor {
            name,
            phone,
            id_type,
            id_number,
        })
    }
}

/// Garante secundario: o vienen los cuatro campos o ninguno.
pub fn validate_secondary_guarantor(
    name: &Option<String>,
    phone: &Option<String>,
    id_type: &Option<String>,
    id_number: &Option<String>,
) -> Result<(), AppError> {
    let present = [name.is_some(), phone.is_some(), id_type.is_some(), id_number.is_some()];
    let count = present.iter().filter(|p| **p).count();
    if count != 0 && count != 4 {
        return Err(validation_error(
            "secondary_guarantor",
            "all four secondary guarantor fields must be provided together",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passport_field_wins_over_everything() {
        let normalized = normalize_guarantor(GuarantorInput {
            passport: Some("P111".to_string()),
            passport_number: Some("LEGACY222".to_string()),
            id_type: Some("national_id".to_string()),
            id_number: Some("DNI333".to_string()),
            ..Default::default()
        });

        assert_eq!(normalized.id_type.as_deref(), Some("passport"));
        assert_eq!(normalized.id_number.as_deref(), Some("P111"));
    }

    #[test]
    fn test_legacy_passport_number_forces_passport_type() {
        let normalized = normalize_guarantor(GuarantorInput {
            passport_number: Some("LEGACY222".to_string()),
            id_type: Some("national_id".to_string()),
            id_number: Some("DNI333".to_string()),
            ..Default::default()
        });

        assert_eq!(normalized.id_type.as_deref(), Some("passport"));
        assert_eq!(normalized.id_number.as_deref(), Some("LEGACY222"));
    }

    #[test]
    fn test_legacy_renter_fields_map_to_canonical_names() {
        let normalized = normalize_guarantor(GuarantorInput {
            renter_name: Some("Jane".to_string()),
            renter_phone: Some("+34600000000".to_string()),
            ..Default::default()
        });

        assert_eq!(normalized.name.as_deref(), Some("Jane"));
        assert_eq!(normalized.phone.as_deref(), Some("+34600000000"));
    }

    #[test]
    fn test_canonical_name_wins_over_legacy_alias() {
        let normalized = normalize_guarantor(GuarantorInput {
            name: Some("Canonical".to_string()),
            renter_name: Some("Legacy".to_string()),
            ..Default::default()
        });

        assert_eq!(normalized.name.as_deref(), Some("Canonical"));
    }

    #[test]
    fn test_explicit_pair_defaults_id_type_to_passport() {
        let normalized = normalize_guarantor(GuarantorInput {
            id_number: Some("X999".to_string()),
            ..Default::default()
        });

        assert_eq!(normalized.id_type.as_deref(), Some("passport"));
        assert_eq!(normalized.id_number.as_deref(), Some("X999"));
    }

    #[test]
    fn test_explicit_pair_keeps_given_id_type() {
        let normalized = normalize_guarantor(GuarantorInput {
            id_type: Some("national_id".to_string()),
            id_number: Some("DNI123".to_string()),
            ..Default::default()
        });

        assert_eq!(normalized.id_type.as_deref(), Some("national_id"));
        assert_eq!(normalized.id_number.as_deref(), Some("DNI123"));
    }

    #[test]
    fn test_absent_fields_stay_absent_for_partial_updates() {
        let normalized = normalize_guarantor(GuarantorInput::default());

        assert_eq!(normalized.name, None);
        assert_eq!(normalized.phone, None);
        assert_eq!(normalized.id_type, None);
        assert_eq!(normalized.id_number, None);
    }

    #[test]
    fn test_into_required_rejects_missing_fields() {
        let normalized = normalize_guarantor(GuarantorInput {
            name: Some("Jane".to_string()),
            ..Default::default()
        });

        assert!(normalized.into_required().is_err());
    }

    #[test]
    fn test_into_required_builds_full_guarantor() {
        let guarantor = normalize_guarantor(GuarantorInput {
            name: Some("Jane".to_string()),
            phone: Some("+34600000000".to_string()),
            passport: Some("P111".to_string()),
            ..Default::default()
        })
        .into_required()
        .expect("complete guarantor");

        assert_eq!(guarantor.name, "Jane");
        assert_eq!(guarantor.id_type, "passport");
        assert_eq!(guarantor.id_number, "P111");
    }

    #[test]
    fn test_secondary_guarantor_all_or_none() {
        assert!(validate_secondary_guarantor(&None, &None, &None, &None).is_ok());
        assert!(validate_secondary_guarantor(
            &Some("a".into()),
            &Some("b".into()),
            &Some("c".into()),
            &Some("d".into())
        )
        .is_ok());
        assert!(validate_secondary_guarantor(&Some("a".into()), &None, &None, &None).is_err());
    }
}
