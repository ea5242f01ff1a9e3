use crate::api::attendance::{SaveAttendance, SaveOutcome};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::student::Student;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Asistencia API",
        version = "1.0.0",
        description = r#"
## School Attendance Tracker

Marks each student of a course as present, absent, or late for a given date.

### Key Features
- **Roster** — list all students ordered by name
- **Attendance** — save per-student statuses for a date; saving twice for the
  same (student, date) overwrites the status
- **Seed** — one-time schema creation and sample roster

Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::seed::seed,
        crate::api::students::list_students,
        crate::api::attendance::save_attendance,
    ),
    components(
        schemas(
            Student,
            AttendanceStatus,
            AttendanceRecord,
            SaveAttendance,
            SaveOutcome,
        )
    ),
    tags(
        (name = "Seed", description = "Schema and sample-data bootstrap"),
        (name = "Students", description = "Student roster APIs"),
        (name = "Attendance", description = "Attendance recording APIs"),
    )
)]
pub struct ApiDoc;
