use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Alvarado, Juan",
        "email": "juan.alvarado@colegio.cl",
        "course": "1° Medio A"
    })
)]
pub struct Student {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "Alvarado, Juan")]
    pub name: String,

    #[schema(example = "juan.alvarado@colegio.cl", nullable = true)]
    pub email: Option<String>,

    #[schema(example = "1° Medio A")]
    pub course: String,
}
