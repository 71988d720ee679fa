use crate::dates::{date_id, is_today, range_caption, short_weekday};
use crate::errors::AppError;
use crate::export::{self, IMAGE_FILE_NAME, JOURNAL_FILE_NAME};
use crate::journal::Journal;
use crate::models::{
    EntryView, JourneyResponse, NoteRequest, NoteResponse, PermissionRequest, PermissionResponse,
    ProgressStats, ToggleRequest, ToggleResponse,
};
use crate::reminder::{Notification, Permission};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::NaiveDateTime;
use tracing::{debug, error, info};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&current_view(&state).await))
}

pub async fn get_journey(State(state): State<AppState>) -> Json<JourneyResponse> {
    Json(current_view(&state).await)
}

async fn current_view(state: &AppState) -> JourneyResponse {
    let now = state.clock.now();
    let permission = state.reminder.lock().await.permission();
    let journal = state.journal.lock().await;
    journey_view(&journal, now, permission)
}

pub async fn get_stats(State(state): State<AppState>) -> Json<ProgressStats> {
    Json(state.journal.lock().await.stats())
}

pub async fn toggle(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    let response = apply_toggle(&state, payload.id.trim()).await?;
    Ok(Json(response))
}

pub async fn toggle_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    apply_toggle(&state, &id).await?;
    Ok(Redirect::to("/"))
}

async fn apply_toggle(state: &AppState, id: &str) -> Result<ToggleResponse, AppError> {
    let mut journal = state.journal.lock().await;
    let checked = journal
        .toggle(id)
        .ok_or_else(|| AppError::not_found(format!("'{id}' is not a day of the journey")))?;

    journal.persist_completed(state.store.as_ref()).await;
    debug!(id, checked, "toggled day");

    Ok(ToggleResponse {
        id: id.to_string(),
        checked,
        completed_ids: journal.completed().iter().cloned().collect(),
        stats: journal.stats(),
    })
}

pub async fn put_note(
    State(state): State<AppState>,
    Json(payload): Json<NoteRequest>,
) -> Result<Json<NoteResponse>, AppError> {
    let id = payload.id.trim();
    let mut journal = state.journal.lock().await;
    if !journal.set_note(id, payload.text.clone()) {
        return Err(AppError::not_found(format!("'{id}' is not a day of the journey")));
    }
    journal.persist_notes(state.store.as_ref()).await;

    Ok(Json(NoteResponse {
        id: id.to_string(),
        text: payload.text,
    }))
}

pub async fn get_permission(State(state): State<AppState>) -> Json<PermissionResponse> {
    let permission = state.reminder.lock().await.permission();
    Json(PermissionResponse { permission })
}

pub async fn resolve_permission(
    State(state): State<AppState>,
    Json(payload): Json<PermissionRequest>,
) -> Result<Json<PermissionResponse>, AppError> {
    let outcome = Permission::from_browser(&payload.result)
        .ok_or_else(|| AppError::bad_request("result must be 'granted', 'denied' or 'default'"))?;

    let mut reminder = state.reminder.lock().await;
    let permission = reminder
        .resolve(outcome, state.store.as_ref(), state.outbox.as_ref())
        .await;
    Ok(Json(PermissionResponse { permission }))
}

pub async fn take_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.outbox.drain().await)
}

pub async fn export_journal(State(state): State<AppState>) -> Result<Response, AppError> {
    let _permit = state
        .exports
        .try_begin()
        .ok_or_else(|| AppError::conflict("an export is already running"))?;

    let (dates, notes) = {
        let journal = state.journal.lock().await;
        (journal.dates().to_vec(), journal.notes().clone())
    };

    let bytes = export::export_journal(dates, notes).await.map_err(|err| {
        error!("journal export failed: {err}");
        AppError::from(err)
    })?;

    info!("journal pdf exported");
    Ok(attachment(bytes, "application/pdf", JOURNAL_FILE_NAME))
}

pub async fn export_image(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<Response, AppError> {
    let _permit = state
        .exports
        .try_begin()
        .ok_or_else(|| AppError::conflict("an export is already running"))?;

    match export::export_image(region.clone()).await {
        None => {
            debug!(region = %region, "nothing to capture");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        Some(Err(err)) => {
            error!(region = %region, "image export failed: {err}");
            Err(err.into())
        }
        Some(Ok(bytes)) => {
            info!(region = %region, "image exported");
            Ok(attachment(bytes, "image/png", IMAGE_FILE_NAME))
        }
    }
}

fn attachment(bytes: Vec<u8>, content_type: &str, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn journey_view(journal: &Journal, now: NaiveDateTime, permission: Permission) -> JourneyResponse {
    let entries = journal
        .dates()
        .iter()
        .map(|entry| EntryView {
            id: entry.id.clone(),
            display_text: entry.display_text.clone(),
            label: entry.label.clone(),
            weekday: short_weekday(entry.date),
            checked: journal.is_checked(&entry.id),
            is_today: is_today(entry, now),
            note: journal.note(&entry.id).unwrap_or_default().to_string(),
        })
        .collect();

    let stats = journal.stats();
    JourneyResponse {
        today: date_id(now.date()),
        range: range_caption(),
        entries,
        complete: stats.is_complete(),
        stats,
        permission,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::journey_dates;
    use crate::journal::{CompletionSet, NoteMap};
    use chrono::NaiveDate;

    #[test]
    fn view_marks_today_checked_and_notes() {
        let mut journal = Journal::new(journey_dates(), CompletionSet::new(), NoteMap::new());
        journal.toggle("2025-11-17");
        journal.set_note("2025-11-16", "hi".into());
        let now = NaiveDate::from_ymd_opt(2025, 11, 17)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let view = journey_view(&journal, now, Permission::Granted);
        assert_eq!(view.today, "2025-11-17");
        assert_eq!(view.entries.len(), 104);
        assert_eq!(view.stats.completed, 3);
        assert!(!view.complete);

        let today: Vec<&EntryView> = view.entries.iter().filter(|e| e.is_today).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].id, "2025-11-17");
        assert_eq!(today[0].weekday, "Mon");
        assert_eq!(view.entries[1].note, "hi");
        assert!(view.entries[0].checked);
        assert!(!view.entries[3].checked);
    }

    #[test]
    fn outside_the_journey_nothing_is_today() {
        let journal = Journal::new(journey_dates(), CompletionSet::new(), NoteMap::new());
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap();
        let view = journey_view(&journal, now, Permission::Unrequested);
        assert!(view.entries.iter().all(|e| !e.is_today));
    }
}
