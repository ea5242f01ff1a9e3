use actix_web::{App, test, web::Data};
use chrono::NaiveDate;
use serde_json::json;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::collections::HashMap;

use asistencia::api::attendance::upsert_attendance;
use asistencia::api::seed::{ensure_schema, run_seed};
use asistencia::api::students::fetch_students;
use asistencia::model::attendance::{AttendanceRecord, AttendanceStatus};
use asistencia::routes;
use asistencia::utils::page_cache::{ATTENDANCE_PAGE, PageCache};

// One connection so every query sees the same in-memory database.
async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool")
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn rows_for(pool: &SqlitePool, day: NaiveDate) -> Vec<AttendanceRecord> {
    sqlx::query_as::<_, AttendanceRecord>(
        "SELECT id, student_id, date, status, created_at FROM attendance \
         WHERE date = ? ORDER BY student_id",
    )
    .bind(day)
    .fetch_all(pool)
    .await
    .unwrap()
}

async fn total_rows(pool: &SqlitePool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM attendance")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

#[actix_web::test]
async fn seeding_is_idempotent() {
    let pool = memory_pool().await;

    let first = run_seed(&pool).await.unwrap();
    assert_eq!(first, 5);

    let second = run_seed(&pool).await.unwrap();
    assert_eq!(second, 0);

    let students = fetch_students(&pool).await.unwrap();
    assert_eq!(students.len(), 5);
    assert_eq!(students[0].name, "Alvarado, Juan");
    assert_eq!(students[4].name, "Escobar, Luis");
}

#[actix_web::test]
async fn reader_returns_empty_on_empty_table() {
    let pool = memory_pool().await;
    ensure_schema(&pool).await.unwrap();

    let students = fetch_students(&pool).await.unwrap();
    assert!(students.is_empty());
}

#[actix_web::test]
async fn reader_orders_by_name() {
    let pool = memory_pool().await;
    ensure_schema(&pool).await.unwrap();

    for name in ["Zúñiga, Rosa", "Alvarado, Juan", "Mora, Iván"] {
        sqlx::query("INSERT INTO students (name, course) VALUES (?, ?)")
            .bind(name)
            .bind("1° Medio A")
            .execute(&pool)
            .await
            .unwrap();
    }

    let names: Vec<String> = fetch_students(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["Alvarado, Juan", "Mora, Iván", "Zúñiga, Rosa"]);
}

#[actix_web::test]
async fn saving_twice_keeps_only_latest_status() {
    let pool = memory_pool().await;
    run_seed(&pool).await.unwrap();
    let day = date("2024-05-01");

    let marks = HashMap::from([(1, AttendanceStatus::Present)]);
    upsert_attendance(&pool, day, &marks).await.unwrap();

    let marks = HashMap::from([(1, AttendanceStatus::Late)]);
    upsert_attendance(&pool, day, &marks).await.unwrap();

    let rows = rows_for(&pool, day).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].student_id, 1);
    assert_eq!(rows[0].status, AttendanceStatus::Late);
    assert!(rows[0].created_at.is_some());
}

#[actix_web::test]
async fn empty_mapping_is_a_noop_success() {
    let pool = memory_pool().await;
    run_seed(&pool).await.unwrap();

    upsert_attendance(&pool, date("2024-05-01"), &HashMap::new())
        .await
        .unwrap();

    assert_eq!(total_rows(&pool).await, 0);
}

#[actix_web::test]
async fn example_dataset_writes_exact_rows_for_that_date_only() {
    let pool = memory_pool().await;
    run_seed(&pool).await.unwrap();
    let day = date("2024-05-01");

    let marks = HashMap::from([
        (1, AttendanceStatus::Present),
        (2, AttendanceStatus::Late),
    ]);
    upsert_attendance(&pool, day, &marks).await.unwrap();

    let rows = rows_for(&pool, day).await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].student_id, 1);
    assert_eq!(rows[0].status, AttendanceStatus::Present);
    assert_eq!(rows[1].student_id, 2);
    assert_eq!(rows[1].status, AttendanceStatus::Late);

    assert!(rows_for(&pool, date("2024-05-02")).await.is_empty());
    assert_eq!(total_rows(&pool).await, 2);
}

#[actix_web::test]
async fn disjoint_concurrent_saves_do_not_interfere() {
    let pool = memory_pool().await;
    run_seed(&pool).await.unwrap();
    let day = date("2024-05-01");

    let batch_a = HashMap::from([
        (1, AttendanceStatus::Present),
        (2, AttendanceStatus::Absent),
    ]);
    let batch_b = HashMap::from([
        (3, AttendanceStatus::Late),
        (4, AttendanceStatus::Present),
    ]);

    let (a, b) = futures::join!(
        upsert_attendance(&pool, day, &batch_a),
        upsert_attendance(&pool, day, &batch_b),
    );
    a.unwrap();
    b.unwrap();

    let rows = rows_for(&pool, day).await;
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1].status, AttendanceStatus::Absent);
    assert_eq!(rows[2].status, AttendanceStatus::Late);
}

// -------------------- handler-level --------------------

macro_rules! test_app {
    ($pool:expr, $cache:expr) => {
        test::init_service(
            App::new()
                .app_data(Data::new($pool.clone()))
                .app_data(Data::new($cache.clone()))
                .configure(routes::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn seed_endpoint_reports_success() {
    let pool = memory_pool().await;
    let cache = PageCache::new(60);
    let app = test_app!(pool, cache);

    let req = test::TestRequest::get().uri("/api/seed").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Database seeded successfully");
}

#[actix_web::test]
async fn students_endpoint_returns_seeded_roster() {
    let pool = memory_pool().await;
    run_seed(&pool).await.unwrap();
    let cache = PageCache::new(60);
    let app = test_app!(pool, cache);

    let req = test::TestRequest::get().uri("/api/students").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 5);
    assert_eq!(body[0]["name"], "Alvarado, Juan");
}

#[actix_web::test]
async fn save_endpoint_rejects_malformed_date() {
    let pool = memory_pool().await;
    run_seed(&pool).await.unwrap();
    let cache = PageCache::new(60);
    let app = test_app!(pool, cache);

    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .set_json(json!({ "date": "01-05-2024", "attendance": { "1": "present" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn save_endpoint_rejects_unknown_status() {
    let pool = memory_pool().await;
    run_seed(&pool).await.unwrap();
    let cache = PageCache::new(60);
    let app = test_app!(pool, cache);

    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .set_json(json!({ "date": "2024-05-01", "attendance": { "1": "tardy" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn save_endpoint_saves_and_invalidates_page_cache() {
    let pool = memory_pool().await;
    run_seed(&pool).await.unwrap();
    let cache = PageCache::new(60);
    cache.put(ATTENDANCE_PAGE, "<html>stale</html>".to_string()).await;
    let app = test_app!(pool, cache);

    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .set_json(json!({ "date": "2024-05-01", "attendance": { "1": "present", "2": "late" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Attendance saved successfully");

    assert!(cache.get(ATTENDANCE_PAGE).await.is_none());
    assert_eq!(rows_for(&pool, date("2024-05-01")).await.len(), 2);
}

#[actix_web::test]
async fn attendance_page_renders_roster_and_caches_it() {
    let pool = memory_pool().await;
    run_seed(&pool).await.unwrap();
    let cache = PageCache::new(60);
    let app = test_app!(pool, cache);

    let req = test::TestRequest::get().uri("/attendance").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("Alvarado, Juan"));
    assert!(html.contains("Tomar Asistencia"));

    assert!(cache.get(ATTENDANCE_PAGE).await.is_some());
}
