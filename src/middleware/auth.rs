use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;
use crate::scheduling::Principal;

/// Header the identity gateway sets after authenticating the request:
/// `admin`, `staff:<uuid>` or `customer:<uuid>`. Token issuance and
/// verification live upstream; by the time a request reaches this service
/// the principal is already trusted.
pub const PRINCIPAL_HEADER: &str = "x-principal";

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing principal".into()))?;

        parse_principal(raw)
            .ok_or_else(|| AppError::Unauthorized(format!("malformed principal: {raw}")))
    }
}

fn parse_principal(raw: &str) -> Option<Principal> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("admin") {
        return Some(Principal::Admin);
    }
    let (role, id) = raw.split_once(':')?;
    let id = Uuid::parse_str(id.trim()).ok()?;
    match role.trim().to_ascii_lowercase().as_str() {
        "staff" => Some(Principal::Staff(id)),
        "customer" => Some(Principal::Customer(id)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_roles() {
        let id = Uuid::new_v4();
        assert_eq!(parse_principal("admin"), Some(Principal::Admin));
        assert_eq!(
            parse_principal(&format!("staff:{id}")),
            Some(Principal::Staff(id))
        );
        assert_eq!(
            parse_principal(&format!("customer:{id}")),
            Some(Principal::Customer(id))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_principal(""), None);
        assert_eq!(parse_principal("customer:not-a-uuid"), None);
        assert_eq!(parse_principal("owner:6f2a"), None);
    }
}
