use crate::dto::GrantRequest;
use turnstile::auth::WILDCARD_ROUTE;

const MAX_ROUTE_LEN: usize = 512;

#[derive(Debug)]
pub enum ValidationError {
    MissingRequiredField { field: &'static str },
    InvalidRoute { reason: &'static str },
    TooLong { field: &'static str, max: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingRequiredField { field } => {
                write!(f, "Missing required field '{}'", field)
            }
            ValidationError::InvalidRoute { reason } => write!(f, "Invalid route: {}", reason),
            ValidationError::TooLong { field, max } => {
                write!(f, "Field '{}' exceeds {} characters", field, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a grant request before it reaches the grant store
pub fn validate_grant_request(req: &GrantRequest) -> Result<(), ValidationError> {
    if req.admin_id.trim().is_empty() {
        return Err(ValidationError::MissingRequiredField { field: "admin_id" });
    }

    let route = req.route.as_str();
    if route.is_empty() {
        return Err(ValidationError::MissingRequiredField { field: "route" });
    }
    if route.len() > MAX_ROUTE_LEN {
        return Err(ValidationError::TooLong {
            field: "route",
            max: MAX_ROUTE_LEN,
        });
    }
    if route == WILDCARD_ROUTE {
        return Ok(());
    }
    if !route.starts_with('/') {
        return Err(ValidationError::InvalidRoute {
            reason: "must start with '/' or be '*'",
        });
    }
    if route.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidRoute {
            reason: "must not contain whitespace",
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(admin_id: &str, route: &str) -> GrantRequest {
        GrantRequest {
            admin_id: admin_id.to_string(),
            route: route.to_string(),
        }
    }

    #[test]
    fn test_valid_grant_requests() {
        assert!(validate_grant_request(&req("a1", "/admin/delete")).is_ok());
        assert!(validate_grant_request(&req("a1", "/admin/grants/{admin_id}")).is_ok());
        assert!(validate_grant_request(&req("a1", "*")).is_ok());
    }

    #[test]
    fn test_invalid_grant_requests() {
        assert!(matches!(
            validate_grant_request(&req(" ", "/x")),
            Err(ValidationError::MissingRequiredField { field: "admin_id" })
        ));
        assert!(matches!(
            validate_grant_request(&req("a1", "")),
            Err(ValidationError::MissingRequiredField { field: "route" })
        ));
        assert!(matches!(
            validate_grant_request(&req("a1", "admin")),
            Err(ValidationError::InvalidRoute { .. })
        ));
        assert!(matches!(
            validate_grant_request(&req("a1", "/a b")),
            Err(ValidationError::InvalidRoute { .. })
        ));
        assert!(matches!(
            validate_grant_request(&req("a1", &format!("/{}", "x".repeat(MAX_ROUTE_LEN)))),
            Err(ValidationError::TooLong { .. })
        ));
    }
}
