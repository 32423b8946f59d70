use crate::auth::claims::{AuthUser, Role};
use crate::response::{ApiResponse, Empty};
use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Extracts the user and puts it back into the request extensions for handlers.
async fn extract_and_insert_authuser(
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), Response> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<Empty>::error("Authentication required")),
            )
                .into_response()
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

async fn allow_if(
    req: Request<Body>,
    next: Next,
    permitted: impl Fn(Role) -> bool,
    denied: &'static str,
) -> Response {
    let (req, AuthUser(claims)) = match extract_and_insert_authuser(req).await {
        Ok(pair) => pair,
        Err(resp) => return resp,
    };

    if !permitted(claims.role) {
        tracing::debug!(user = %claims.sub, role = %claims.role, "Role not permitted");
        return (StatusCode::FORBIDDEN, Json(ApiResponse::<Empty>::error(denied))).into_response();
    }

    next.run(req).await
}

/// Any signed-in user.
pub async fn allow_authenticated(req: Request<Body>, next: Next) -> Response {
    allow_if(req, next, |_| true, "Authentication required").await
}

pub async fn allow_lecturer(req: Request<Body>, next: Next) -> Response {
    allow_if(
        req,
        next,
        |role| role == Role::Lecturer,
        "Only lecturers can generate attendance QR codes",
    )
    .await
}

pub async fn allow_student(req: Request<Body>, next: Next) -> Response {
    allow_if(
        req,
        next,
        |role| role == Role::Student,
        "Only students are allowed to mark attendance",
    )
    .await
}

/// Lecturers, heads of department, deans and other staff.
pub async fn allow_staff(req: Request<Body>, next: Next) -> Response {
    allow_if(
        req,
        next,
        |role| role.is_staff(),
        "Staff access required",
    )
    .await
}
