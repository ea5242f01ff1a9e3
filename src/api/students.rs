use crate::model::student::Student;
use actix_web::{HttpResponse, Responder, web};
use sqlx::SqlitePool;
use tracing::error;

/// Full roster, ordered by name. Errors are returned to the caller so it
/// can decide between failing the request and degrading to an empty list.
pub async fn fetch_students(pool: &SqlitePool) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>("SELECT id, name, email, course FROM students ORDER BY name ASC")
        .fetch_all(pool)
        .await
}

/// Roster endpoint
#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "All students ordered by name", body = [Student]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Students"
)]
pub async fn list_students(pool: web::Data<SqlitePool>) -> actix_web::Result<impl Responder> {
    let students = fetch_students(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch students");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(students))
}
