//! Header-based caller identification.
//!
//! Protected routes read the caller from `X-User-ID` and `X-User-Role`; the
//! resulting [`Actor`] is stored in the request extensions for the handlers.

use axum::{extract::Request, middleware::Next, response::Response};
use fooddash_types::{APIError, Actor, Role};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

const MISSING_HEADERS: &str = "X-User-ID and X-User-Role headers are required";
const UNKNOWN_ROLE: &str = "X-User-Role must be one of: customer, restaurant, driver";

/// Middleware that rejects requests without a usable caller identity.
pub async fn require_actor(mut request: Request, next: Next) -> Result<Response, APIError> {
	let actor = extract_actor(&request)?;
	tracing::debug!(user_id = %actor.id, role = %actor.role, "Authenticated request");

	request.extensions_mut().insert(actor);
	Ok(next.run(request).await)
}

fn extract_actor(request: &Request) -> Result<Actor, APIError> {
	let (Some(user_id), Some(role)) = (
		header(request, USER_ID_HEADER),
		header(request, USER_ROLE_HEADER),
	) else {
		return Err(APIError::unauthorized(MISSING_HEADERS));
	};
	let role: Role = role
		.parse()
		.map_err(|_| APIError::unauthorized(UNKNOWN_ROLE))?;

	Ok(Actor::new(user_id, role))
}

fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
	request
		.headers()
		.get(name)
		.and_then(|value| value.to_str().ok())
		.map(str::trim)
		.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::body::Body;

	fn request(headers: &[(&str, &str)]) -> Request {
		let mut builder = Request::builder().uri("/api/orders");
		for (name, value) in headers {
			builder = builder.header(*name, *value);
		}
		builder.body(Body::empty()).unwrap()
	}

	#[test]
	fn test_extracts_actor() {
		let actor =
			extract_actor(&request(&[("X-User-ID", "u-1"), ("X-User-Role", "driver")])).unwrap();
		assert_eq!(actor, Actor::new("u-1", Role::Driver));
	}

	#[test]
	fn test_missing_headers() {
		for headers in [
			vec![],
			vec![("X-User-ID", "u-1")],
			vec![("X-User-Role", "customer")],
			vec![("X-User-ID", "  "), ("X-User-Role", "customer")],
		] {
			let err = extract_actor(&request(&headers)).unwrap_err();
			assert_eq!(err.status_code(), 401);
			assert_eq!(err.message(), MISSING_HEADERS);
		}
	}

	#[test]
	fn test_unknown_role() {
		let err =
			extract_actor(&request(&[("X-User-ID", "u-1"), ("X-User-Role", "admin")])).unwrap_err();
		assert_eq!(err.status_code(), 401);
		assert_eq!(err.message(), UNKNOWN_ROLE);
	}
}
