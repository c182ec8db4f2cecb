//! JSON body extractor that runs `validator` rules before the handler.
//!
//! Malformed bodies and rule violations both become a 400 `ApiError`.
//! Violations are reported as `path: message` pairs, where nested
//! structs and list items produce paths like `items[2].quantity`.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use super::ApiError;

pub struct ValidatedJson<T>(pub T);

fn collect_violations(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for e in list {
                    let message = match &e.message {
                        Some(m) => m.to_string(),
                        None => e.code.to_string(),
                    };
                    out.push(format!("{}: {}", path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_violations(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_violations(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

/// Flatten validation errors into one message, sorted for stable output.
pub fn describe_violations(errors: &ValidationErrors) -> String {
    let mut violations = Vec::new();
    collect_violations("", errors, &mut violations);
    if violations.is_empty() {
        return "Validation failed".to_string();
    }
    violations.sort();
    violations.join("; ")
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(format!("Invalid JSON: {}", rejection.body_text())))?;

        value
            .validate()
            .map_err(|errors| ApiError::bad_request(describe_violations(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use serde_json::{json, Value};
    use tower::Service;

    #[derive(Debug, Deserialize, Validate)]
    struct Line {
        #[validate(range(min = 1, max = 999, message = "quantity must be 1-999"))]
        quantity: u32,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Cart {
        #[validate(length(min = 1, max = 10))]
        name: String,
        #[validate(nested)]
        items: Vec<Line>,
    }

    async fn handler(ValidatedJson(cart): ValidatedJson<Cart>) -> String {
        cart.items.len().to_string()
    }

    async fn post_json(body: Body) -> (StatusCode, Value) {
        let mut app = Router::new().route("/cart", post(handler));
        let req = Request::builder()
            .method("POST")
            .uri("/cart")
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let resp = app.call(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn accepts_a_valid_cart() {
        let body = json!({"name": "Loa", "items": [{"quantity": 2}]});
        let (status, _) = post_json(Body::from(body.to_string())).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (status, body) = post_json(Body::from("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn nested_violations_carry_their_path() {
        let body = json!({"name": "Loa", "items": [{"quantity": 1}, {"quantity": 0}]});
        let (status, body) = post_json(Body::from(body.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("items[1].quantity: quantity must be 1-999"), "{}", message);
    }

    #[tokio::test]
    async fn unnamed_rules_fall_back_to_code() {
        let body = json!({"name": "", "items": []});
        let (_, body) = post_json(Body::from(body.to_string())).await;
        assert_eq!(body["error"], "name: length");
    }
}
