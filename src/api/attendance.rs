use crate::model::attendance::AttendanceStatus;
use crate::utils::page_cache::{ATTENDANCE_PAGE, PageCache};
use actix_web::{HttpResponse, Responder, error::ErrorBadRequest, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{error, info};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveAttendance {
    /// Calendar date the marks apply to, no time component.
    #[schema(example = "2024-05-01", format = "date", value_type = String)]
    pub date: String,

    /// student id -> status for that date
    #[schema(example = json!({"1": "present", "2": "late"}))]
    pub attendance: HashMap<i64, AttendanceStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveOutcome {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Attendance saved successfully")]
    pub message: String,
}

/// Upsert one row per entry, keyed on (student_id, date). The rows are
/// written concurrently and independently: there is no batch transaction,
/// so a failure partway through leaves the rows that already landed.
pub async fn upsert_attendance(
    pool: &SqlitePool,
    date: NaiveDate,
    entries: &HashMap<i64, AttendanceStatus>,
) -> Result<(), sqlx::Error> {
    let writes: Vec<_> = entries
        .iter()
        .map(|(&student_id, &status)| async move {
            sqlx::query(
                r#"
                INSERT INTO attendance (student_id, date, status)
                VALUES (?, ?, ?)
                ON CONFLICT (student_id, date) DO UPDATE SET status = excluded.status
                "#,
            )
            .bind(student_id)
            .bind(date)
            .bind(status)
            .execute(pool)
            .await
            .map(|_| ())
            .map_err(|e| {
                error!(error = %e, student_id, %date, "Attendance upsert failed");
                e
            })
        })
        .collect();

    let mut first_err = None;
    for result in futures::future::join_all(writes).await {
        if let Err(e) = result {
            first_err.get_or_insert(e);
        }
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Save-attendance endpoint
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = SaveAttendance,
    responses(
        (status = 200, description = "Batch result; success is false when any row failed", body = SaveOutcome),
        (status = 400, description = "Malformed date or unknown status")
    ),
    tag = "Attendance"
)]
pub async fn save_attendance(
    pool: web::Data<SqlitePool>,
    cache: web::Data<PageCache>,
    payload: web::Json<SaveAttendance>,
) -> actix_web::Result<impl Responder> {
    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| ErrorBadRequest("date must be in YYYY-MM-DD form"))?;

    match upsert_attendance(pool.get_ref(), date, &payload.attendance).await {
        Ok(()) => {
            info!(%date, entries = payload.attendance.len(), "Attendance saved");
            // Drop the cached page so the next render reflects the new marks.
            cache.invalidate(ATTENDANCE_PAGE).await;

            Ok(HttpResponse::Ok().json(SaveOutcome {
                success: true,
                message: "Attendance saved successfully".to_string(),
            }))
        }
        Err(_) => Ok(HttpResponse::Ok().json(SaveOutcome {
            success: false,
            message: "Failed to save attendance".to_string(),
        })),
    }
}
