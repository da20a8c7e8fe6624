/// Face store endpoints
///
/// `GET /get-faces` returns the whole collection, `POST /save-face` appends
/// one record. Neither validates record contents.
use crate::{
    context::AppContext,
    error::FaceResult,
    face_store::{FaceRecord, SaveResponse},
};
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/get-faces", get(get_faces))
        .route("/save-face", post(save_face))
}

/// List every enrolled face in insertion order
pub async fn get_faces(State(ctx): State<AppContext>) -> FaceResult<Json<Vec<FaceRecord>>> {
    let records = ctx.store.list().await?;
    tracing::debug!(count = records.len(), "listing faces");
    Ok(Json(records))
}

/// Append a face record as sent by the client
pub async fn save_face(
    State(ctx): State<AppContext>,
    Json(record): Json<FaceRecord>,
) -> FaceResult<Json<SaveResponse>> {
    ctx.store.append(record).await?;
    Ok(Json(SaveResponse::saved()))
}
