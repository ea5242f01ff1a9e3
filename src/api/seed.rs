use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{error, info};

const SEED_COURSE: &str = "1° Medio A";

const SEED_STUDENTS: [&str; 5] = [
    "Alvarado, Juan",
    "Berríos, María",
    "Castro, Pedro",
    "Díaz, Ana",
    "Escobar, Luis",
];

/// Create both tables if they do not exist yet. Safe to call repeatedly.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT UNIQUE,
            course TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER NOT NULL REFERENCES students(id),
            date DATE NOT NULL,
            status TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(student_id, date)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert the sample roster, but only when the table is still empty.
/// Returns the number of rows inserted (0 on every call after the first).
pub async fn seed_students(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM students")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Ok(0);
    }

    let mut inserted = 0u64;
    for name in SEED_STUDENTS {
        let result = sqlx::query("INSERT INTO students (name, course) VALUES (?, ?)")
            .bind(name)
            .bind(SEED_COURSE)
            .execute(pool)
            .await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}

pub async fn run_seed(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    ensure_schema(pool).await?;
    seed_students(pool).await
}

/// One-time schema + sample data endpoint
#[utoipa::path(
    get,
    path = "/api/seed",
    responses(
        (status = 200, description = "Schema ensured, sample data present", body = Object, example = json!({
            "message": "Database seeded successfully"
        })),
        (status = 500, description = "Storage error while creating schema or seeding", body = Object, example = json!({
            "error": "database is locked"
        }))
    ),
    tag = "Seed"
)]
pub async fn seed(pool: web::Data<SqlitePool>) -> impl Responder {
    match run_seed(pool.get_ref()).await {
        Ok(inserted) => {
            info!(inserted, "Seed endpoint completed");
            HttpResponse::Ok().json(json!({
                "message": "Database seeded successfully"
            }))
        }
        Err(e) => {
            error!(error = %e, "Seeding failed");
            HttpResponse::InternalServerError().json(json!({
                "error": e.to_string()
            }))
        }
    }
}
