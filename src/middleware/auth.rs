//! Middleware de autenticación JWT
//!
//! Decodifica el Bearer token y deja un AuthenticatedUser como extension
//! del request. La emisión de tokens vive fuera de este servicio; aquí
//! solo se verifica y se extrae el rol para el gate de operaciones
//! destructivas.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

/// Rol del usuario autenticado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Employee,
}

/// Claims del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Predicado de política para operaciones destructivas
pub fn require_admin(user: &AuthenticatedUser) -> AppResult<()> {
    if user.role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "only admins can perform this operation".to_string(),
        ));
    }
    Ok(())
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth| auth.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

    let user_id = Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        role: token_data.claims.role,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_admin_rejects_employee() {
        let employee = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            role: UserRole::Employee,
        };
        assert!(matches!(
            require_admin(&employee),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_require_admin_accepts_admin() {
        let admin = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
        };
        assert!(require_admin(&admin).is_ok());
    }
}
