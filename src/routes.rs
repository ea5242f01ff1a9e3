use crate::api::{attendance, seed, students};
use crate::view::page;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Pages
    cfg.service(web::resource("/").route(web::get().to(page::index)));
    cfg.service(web::resource("/attendance").route(web::get().to(page::attendance_page)));

    // JSON API
    cfg.service(
        web::scope("/api")
            .service(web::resource("/seed").route(web::get().to(seed::seed)))
            .service(web::resource("/students").route(web::get().to(students::list_students)))
            .service(
                web::resource("/attendance").route(web::post().to(attendance::save_attendance)),
            ),
    );
}
