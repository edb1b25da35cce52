use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// 201 with the new id as decimal text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Created(pub i32);

impl IntoResponse for Created {
    fn into_response(self) -> Response {
        (
            StatusCode::CREATED,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.0.to_string(),
        )
            .into_response()
    }
}

/// `jwt: <token>` body, 201 after registration and 200 after login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub status: StatusCode,
}

impl IssuedToken {
    pub fn registered(token: String) -> Self {
        Self { token, status: StatusCode::CREATED }
    }

    pub fn authenticated(token: String) -> Self {
        Self { token, status: StatusCode::OK }
    }
}

impl IntoResponse for IssuedToken {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("jwt: {}", self.token),
        )
            .into_response()
    }
}
