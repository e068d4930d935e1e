use crate::aggregate;
use crate::cache::LocalCache;
use crate::models::{DailyRow, Draft, Entry, ExerciseType, TabSnapshot};
use crate::remote::RemoteStore;
use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

/// Earliest date an entry may carry. The valid window is
/// `[START_DATE, today]`, closed on both ends, and moves forward daily.
pub const START_DATE: &str = "2025-09-18";

/// Counts above this need an explicit yes before they are persisted.
pub const HIGH_COUNT_THRESHOLD: u32 = 300;

/// Yes/no capability standing in for the blocking browser prompt. Injected
/// per call so tests can script the answer.
pub trait Confirm: Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirmation answer that already happened on the page; the request
/// carries it as a boolean.
pub struct Answered(pub bool);

impl Confirm for Answered {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// Per-tab form and list state. One of these exists per exercise type.
#[derive(Debug, Clone, Default)]
pub struct TabState {
    pub entries: Vec<Entry>,
    pub draft: Draft,
    pub editing_id: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

pub fn today_string() -> String {
    Local::now().date_naive().to_string()
}

/// Drives all state transitions: remote calls, optimistic bookkeeping and
/// the cache mirror. Validation failures refuse the action silently; remote
/// failures land in `TabState.error` together with the compensating local
/// action.
pub struct Controller<R> {
    remote: R,
    cache: LocalCache,
    tabs: [TabState; 2],
    today_fn: fn() -> String,
    next_temp_id: u64,
}

impl<R: RemoteStore> Controller<R> {
    /// Seeds every tab from the local cache so the page has data before the
    /// first remote refresh lands.
    pub async fn new(remote: R, cache: LocalCache) -> Self {
        let mut tabs: [TabState; 2] = Default::default();
        for exercise in ExerciseType::ALL {
            let mut entries = cache.load(exercise).await;
            aggregate::sort_entries_descending(&mut entries);
            tabs[exercise.index()].entries = entries;
        }
        Self {
            remote,
            cache,
            tabs,
            today_fn: today_string,
            next_temp_id: 1,
        }
    }

    pub fn with_today(mut self, today_fn: fn() -> String) -> Self {
        self.today_fn = today_fn;
        self
    }

    pub fn tab(&self, exercise: ExerciseType) -> &TabState {
        &self.tabs[exercise.index()]
    }

    fn tab_mut(&mut self, exercise: ExerciseType) -> &mut TabState {
        &mut self.tabs[exercise.index()]
    }

    pub fn set_draft(&mut self, exercise: ExerciseType, draft: Draft) {
        self.tab_mut(exercise).draft = draft;
    }

    /// Replace the tab's entries with the remote window `[START_DATE, today]`.
    pub async fn load(&mut self, exercise: ExerciseType) {
        self.tab_mut(exercise).loading = true;
        let today = (self.today_fn)();
        let result = self.remote.query(exercise, START_DATE, &today).await;
        let tab = self.tab_mut(exercise);
        match result {
            Ok(mut entries) => {
                aggregate::sort_entries_descending(&mut entries);
                tab.entries = entries;
                tab.error = None;
            }
            Err(err) => {
                warn!("load failed for {}: {err}", exercise.slug());
                tab.error = Some(err.message);
            }
        }
        tab.loading = false;
        self.mirror(exercise).await;
    }

    /// Optimistic insert: prepend under a temporary id, then either swap in
    /// the server row (matched by that temp id) or roll the prepend back.
    pub async fn add(&mut self, exercise: ExerciseType, confirm: &dyn Confirm) {
        if self.tab(exercise).editing_id.is_some() {
            return;
        }
        let Some((date, person, count)) = self.validated_draft(exercise, confirm) else {
            return;
        };

        let temp_id = format!("tmp-{}", self.next_temp_id);
        self.next_temp_id += 1;
        {
            let tab = self.tab_mut(exercise);
            tab.loading = true;
            tab.entries.insert(
                0,
                Entry {
                    id: temp_id.clone(),
                    date: date.clone(),
                    person,
                    count,
                },
            );
        }
        self.mirror(exercise).await;

        let result = self.remote.insert(exercise, &date, person, count).await;
        let tab = self.tab_mut(exercise);
        match result {
            Ok(entry) => {
                if let Some(slot) = tab.entries.iter_mut().find(|e| e.id == temp_id) {
                    *slot = entry;
                }
                aggregate::sort_entries_descending(&mut tab.entries);
                tab.draft.count.clear();
                tab.error = None;
            }
            Err(err) => {
                warn!("insert failed for {}: {err}", exercise.slug());
                tab.entries.retain(|e| e.id != temp_id);
                tab.error = Some(err.message);
            }
        }
        tab.loading = false;
        self.mirror(exercise).await;
    }

    /// Copy an entry's fields into the draft; the stored list is untouched.
    pub fn begin_edit(&mut self, exercise: ExerciseType, id: &str) {
        let tab = self.tab_mut(exercise);
        if let Some(entry) = tab.entries.iter().find(|e| e.id == id) {
            tab.draft = Draft {
                person: entry.person,
                date: entry.date.clone(),
                count: entry.count.to_string(),
            };
            tab.editing_id = Some(entry.id.clone());
        }
    }

    /// Drop the edit session without saving; the stored list is untouched
    /// and the add path opens up again.
    pub fn cancel_edit(&mut self, exercise: ExerciseType) {
        let tab = self.tab_mut(exercise);
        tab.editing_id = None;
        tab.draft.count.clear();
    }

    /// Round-trips the edit before touching local state; a failure keeps the
    /// edit session open.
    pub async fn save_edit(&mut self, exercise: ExerciseType, confirm: &dyn Confirm) {
        let Some(editing_id) = self.tab(exercise).editing_id.clone() else {
            return;
        };
        let Some((date, person, count)) = self.validated_draft(exercise, confirm) else {
            return;
        };

        self.tab_mut(exercise).loading = true;
        let result = self
            .remote
            .update(exercise, &editing_id, &date, person, count)
            .await;
        let tab = self.tab_mut(exercise);
        match result {
            Ok(entry) => {
                if let Some(slot) = tab.entries.iter_mut().find(|e| e.id == editing_id) {
                    *slot = entry;
                }
                aggregate::sort_entries_descending(&mut tab.entries);
                tab.editing_id = None;
                tab.draft.count.clear();
                tab.error = None;
            }
            Err(err) => {
                warn!("update failed for {}: {err}", exercise.slug());
                tab.error = Some(err.message);
            }
        }
        tab.loading = false;
        self.mirror(exercise).await;
    }

    /// Optimistic removal. When the remote delete fails the full window is
    /// refetched so local state matches server truth again.
    pub async fn delete(&mut self, exercise: ExerciseType, id: &str, confirm: &dyn Confirm) {
        if !confirm.confirm("Delete this entry?") {
            return;
        }
        {
            let tab = self.tab_mut(exercise);
            let before = tab.entries.len();
            tab.entries.retain(|e| e.id != id);
            if tab.entries.len() == before {
                return;
            }
            tab.loading = true;
        }
        self.mirror(exercise).await;

        match self.remote.delete(exercise, id).await {
            Ok(()) => {
                self.tab_mut(exercise).error = None;
            }
            Err(err) => {
                warn!("delete failed for {}: {err}", exercise.slug());
                self.tab_mut(exercise).error = Some(err.message);
                let today = (self.today_fn)();
                match self.remote.query(exercise, START_DATE, &today).await {
                    Ok(mut entries) => {
                        aggregate::sort_entries_descending(&mut entries);
                        self.tab_mut(exercise).entries = entries;
                    }
                    Err(refetch_err) => {
                        warn!("refetch after failed delete also failed: {refetch_err}");
                    }
                }
            }
        }
        self.tab_mut(exercise).loading = false;
        self.mirror(exercise).await;
    }

    /// Range-delete the whole window remotely; local state empties only on
    /// success.
    pub async fn clear_all(&mut self, exercise: ExerciseType, confirm: &dyn Confirm) {
        if !confirm.confirm("Remove every entry for this exercise?") {
            return;
        }
        self.tab_mut(exercise).loading = true;
        let today = (self.today_fn)();
        let result = self.remote.delete_range(exercise, START_DATE, &today).await;
        let tab = self.tab_mut(exercise);
        match result {
            Ok(()) => {
                tab.entries.clear();
                tab.error = None;
            }
            Err(err) => {
                warn!("clear failed for {}: {err}", exercise.slug());
                tab.error = Some(err.message);
            }
        }
        tab.loading = false;
        self.mirror(exercise).await;
    }

    /// Everything the page renders for one tab. Aggregation only ever sees
    /// in-window entries, even when the cache seeded something stale.
    pub fn snapshot(&self, exercise: ExerciseType) -> TabSnapshot {
        let tab = self.tab(exercise);
        let today = (self.today_fn)();
        let entries = aggregate::in_range(&tab.entries, START_DATE, &today);
        let totals = aggregate::totals_by_person(&entries);
        let days = aggregate::daily_totals(&entries);
        let daily = aggregate::sorted_dates_descending(&days)
            .into_iter()
            .map(|date| {
                let counts = days.get(&date).cloned().unwrap_or_default();
                let total = counts.values().sum();
                DailyRow {
                    date,
                    counts,
                    total,
                }
            })
            .collect();
        TabSnapshot {
            entries,
            draft: tab.draft.clone(),
            editing_id: tab.editing_id.clone(),
            loading: tab.loading,
            error: tab.error.clone(),
            totals,
            daily,
        }
    }

    // Count first, then the high-value confirmation, then the date window.
    // Any refusal means no state change and no remote call.
    fn validated_draft(
        &self,
        exercise: ExerciseType,
        confirm: &dyn Confirm,
    ) -> Option<(String, crate::models::Person, u32)> {
        let draft = &self.tab(exercise).draft;
        let Some(count) = parse_count(&draft.count) else {
            debug!("refusing draft with invalid count {:?}", draft.count);
            return None;
        };
        if count > HIGH_COUNT_THRESHOLD
            && !confirm.confirm(&format!("Really log {count} reps in one entry?"))
        {
            return None;
        }
        let today = (self.today_fn)();
        if !date_in_window(&draft.date, &today) {
            debug!("refusing draft with out-of-window date {:?}", draft.date);
            return None;
        }
        Some((draft.date.clone(), draft.person, count))
    }

    async fn mirror(&self, exercise: ExerciseType) {
        self.cache
            .save(exercise, &self.tabs[exercise.index()].entries)
            .await;
    }
}

fn parse_count(raw: &str) -> Option<u32> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value <= 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value as u32)
}

fn date_in_window(date: &str, today: &str) -> bool {
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return false;
    }
    START_DATE <= date && date <= today
}
