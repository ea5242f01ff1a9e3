use crate::api::students::fetch_students;
use crate::model::student::Student;
use crate::utils::page_cache::{ATTENDANCE_PAGE, PageCache};
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, Responder, web};
use anyhow::Result;
use sqlx::SqlitePool;
use tracing::warn;

pub async fn index() -> impl Responder {
    HttpResponse::Ok().content_type(ContentType::html()).body(
        r#"<!DOCTYPE html>
<html lang="es">
<head><meta charset="utf-8"><title>Asistencia</title></head>
<body>
  <h1>Asistencia</h1>
  <p><a href="/attendance">Tomar asistencia</a></p>
</body>
</html>
"#,
    )
}

/// Attendance page. Serves the cached render when one exists; otherwise
/// loads the roster, renders, and caches the result. A read failure is
/// logged and degrades to an empty roster rather than failing the page.
pub async fn attendance_page(
    pool: web::Data<SqlitePool>,
    cache: web::Data<PageCache>,
) -> impl Responder {
    if let Some(html) = cache.get(ATTENDANCE_PAGE).await {
        return HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(html);
    }

    let students = match fetch_students(pool.get_ref()).await {
        Ok(students) => students,
        Err(e) => {
            warn!(error = %e, "Failed to fetch students, rendering empty roster");
            Vec::new()
        }
    };

    let html = render_attendance_page(&students);
    cache.put(ATTENDANCE_PAGE, html.clone()).await;

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(html)
}

/// Pre-render the attendance page at startup so the first visitor gets a
/// cache hit. Fails (and is merely reported) when the schema is missing.
pub async fn warmup_page_cache(pool: &SqlitePool, cache: &PageCache) -> Result<()> {
    let students = fetch_students(pool).await?;
    cache
        .put(ATTENDANCE_PAGE, render_attendance_page(&students))
        .await;
    Ok(())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_attendance_page(students: &[Student]) -> String {
    let course = students
        .first()
        .map(|s| escape_html(&s.course))
        .unwrap_or_default();

    let mut rows = String::new();
    for (index, student) in students.iter().enumerate() {
        let name = escape_html(&student.name);
        rows.push_str(&format!(
            r#"      <tr data-student-id="{id}">
        <td>{n}</td>
        <td>{name}</td>
        <td>
          <label><input type="radio" name="status-{id}" value="present" checked> Presente</label>
          <label><input type="radio" name="status-{id}" value="late"> Atrasado</label>
          <label><input type="radio" name="status-{id}" value="absent"> Ausente</label>
        </td>
      </tr>
"#,
            id = student.id,
            n = index + 1,
            name = name,
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="utf-8">
  <title>Tomar Asistencia</title>
</head>
<body>
  <header>
    <a href="/">&#8592; Volver</a>
    <h1>Tomar Asistencia</h1>
    <p>Curso: {course}</p>
    <input type="date" id="date">
    <button id="save">Guardar</button>
  </header>
  <table>
    <thead>
      <tr><th>#</th><th>Alumno</th><th>Estado</th></tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>
  <script>
    // ready -> saving -> ready; marks stay local until Guardar is pressed.
    const dateInput = document.getElementById('date');
    dateInput.value = new Date().toISOString().split('T')[0];

    const saveButton = document.getElementById('save');
    const inputs = () => document.querySelectorAll('input, button');

    saveButton.addEventListener('click', async () => {{
      const attendance = {{}};
      document.querySelectorAll('tr[data-student-id]').forEach(row => {{
        const id = row.dataset.studentId;
        attendance[id] = row.querySelector('input:checked').value;
      }});

      inputs().forEach(el => el.disabled = true);
      try {{
        const res = await fetch('/api/attendance', {{
          method: 'POST',
          headers: {{ 'Content-Type': 'application/json' }},
          body: JSON.stringify({{ date: dateInput.value, attendance }}),
        }});
        const outcome = await res.json();
        alert(outcome.message || 'Error al guardar asistencia');
      }} catch (e) {{
        alert('Error al guardar asistencia');
      }} finally {{
        inputs().forEach(el => el.disabled = false);
      }}
    }});
  </script>
</body>
</html>
"#,
        course = course,
        rows = rows,
    )
}
