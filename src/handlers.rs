use crate::controller::{Answered, START_DATE};
use crate::errors::AppError;
use crate::models::{ConfirmRequest, Draft, EntryForm, ExerciseType, TabSnapshot};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};

pub async fn index() -> Html<String> {
    Html(render_index(START_DATE))
}

/// Load transition: refresh the tab from the remote window and return the
/// resulting snapshot.
pub async fn get_state(
    State(state): State<AppState>,
    Path(exercise): Path<String>,
) -> Result<Json<TabSnapshot>, AppError> {
    let exercise = parse_exercise(&exercise)?;
    let mut controller = state.controller.lock().await;
    controller.load(exercise).await;
    Ok(Json(controller.snapshot(exercise)))
}

pub async fn add_entry(
    State(state): State<AppState>,
    Path(exercise): Path<String>,
    Json(form): Json<EntryForm>,
) -> Result<Json<TabSnapshot>, AppError> {
    let exercise = parse_exercise(&exercise)?;
    let mut controller = state.controller.lock().await;
    controller.set_draft(exercise, draft_from(&form));
    controller.add(exercise, &Answered(form.confirmed)).await;
    Ok(Json(controller.snapshot(exercise)))
}

pub async fn begin_edit(
    State(state): State<AppState>,
    Path((exercise, id)): Path<(String, String)>,
) -> Result<Json<TabSnapshot>, AppError> {
    let exercise = parse_exercise(&exercise)?;
    let mut controller = state.controller.lock().await;
    controller.begin_edit(exercise, &id);
    Ok(Json(controller.snapshot(exercise)))
}

pub async fn cancel_edit(
    State(state): State<AppState>,
    Path(exercise): Path<String>,
) -> Result<Json<TabSnapshot>, AppError> {
    let exercise = parse_exercise(&exercise)?;
    let mut controller = state.controller.lock().await;
    controller.cancel_edit(exercise);
    Ok(Json(controller.snapshot(exercise)))
}

pub async fn save_entry(
    State(state): State<AppState>,
    Path(exercise): Path<String>,
    Json(form): Json<EntryForm>,
) -> Result<Json<TabSnapshot>, AppError> {
    let exercise = parse_exercise(&exercise)?;
    let mut controller = state.controller.lock().await;
    controller.set_draft(exercise, draft_from(&form));
    controller
        .save_edit(exercise, &Answered(form.confirmed))
        .await;
    Ok(Json(controller.snapshot(exercise)))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path((exercise, id)): Path<(String, String)>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<TabSnapshot>, AppError> {
    let exercise = parse_exercise(&exercise)?;
    let mut controller = state.controller.lock().await;
    controller
        .delete(exercise, &id, &Answered(request.confirmed))
        .await;
    Ok(Json(controller.snapshot(exercise)))
}

pub async fn clear_entries(
    State(state): State<AppState>,
    Path(exercise): Path<String>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<TabSnapshot>, AppError> {
    let exercise = parse_exercise(&exercise)?;
    let mut controller = state.controller.lock().await;
    controller
        .clear_all(exercise, &Answered(request.confirmed))
        .await;
    Ok(Json(controller.snapshot(exercise)))
}

fn parse_exercise(slug: &str) -> Result<ExerciseType, AppError> {
    ExerciseType::from_slug(slug)
        .ok_or_else(|| AppError::bad_request(format!("unknown exercise type: {slug}")))
}

fn draft_from(form: &EntryForm) -> Draft {
    Draft {
        person: form.person,
        date: form.date.clone(),
        count: form.count.clone(),
    }
}
