use crate::clock::Clock;
use crate::state::AppState;
use crate::storage::{self, KeyValueStore, LAST_NOTIFICATION_KEY, PERMISSION_KEY};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tokio::{sync::Mutex, time::MissedTickBehavior};
use tracing::{debug, info};

pub const REMINDER_ICON: &str = "https://cdn-icons-png.flaticon.com/512/833/833472.png";
pub const REMINDER_TAG: &str = "ul-daily-reminder";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    #[default]
    Unrequested,
    Granted,
    Denied,
}

impl Permission {
    /// Maps the browser's `Notification.requestPermission()` result.
    pub fn from_browser(result: &str) -> Option<Self> {
        match result.trim() {
            "granted" => Some(Self::Granted),
            "denied" => Some(Self::Denied),
            "default" => Some(Self::Unrequested),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Notification {
    pub fn reminders_enabled() -> Self {
        Self {
            title: "Reminders Enabled".to_string(),
            body: "You will be reminded at 9 PM to check UL.".to_string(),
            icon: REMINDER_ICON.to_string(),
            tag: None,
        }
    }

    pub fn daily_reminder() -> Self {
        Self {
            title: "UL Reminder".to_string(),
            body: "Hi Uday, remember to mark your day.".to_string(),
            icon: REMINDER_ICON.to_string(),
            tag: Some(REMINDER_TAG.to_string()),
        }
    }
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn dispatch(&self, notification: Notification);
}

/// Notifications waiting for the page to show them. Anything not picked up
/// on the day it was queued is dropped.
pub struct Outbox {
    clock: Arc<dyn Clock>,
    pending: Mutex<Vec<(NaiveDate, Notification)>>,
}

impl Outbox {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            pending: Mutex::new(Vec::new()),
        }
    }

    pub async fn drain(&self) -> Vec<Notification> {
        let today = self.clock.now().date();
        let pending = std::mem::take(&mut *self.pending.lock().await);
        let (fresh, stale): (Vec<_>, Vec<_>) =
            pending.into_iter().partition(|(queued, _)| *queued == today);
        if !stale.is_empty() {
            debug!(count = stale.len(), "dropped notifications from an earlier day");
        }
        fresh.into_iter().map(|(_, notification)| notification).collect()
    }
}

#[async_trait]
impl NotificationSink for Outbox {
    async fn dispatch(&self, notification: Notification) {
        let today = self.clock.now().date();
        info!(title = %notification.title, "queued notification");
        let mut pending = self.pending.lock().await;
        pending.retain(|(queued, _)| *queued == today);
        pending.push((today, notification));
    }
}

/// Once-per-day marker, e.g. `Mon Oct 19 2026`.
pub fn day_marker(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

#[derive(Debug, Clone)]
pub struct Reminder {
    permission: Permission,
    target_hour: u32,
    last_notified: Option<String>,
}

impl Reminder {
    pub fn new(permission: Permission, target_hour: u32, last_notified: Option<String>) -> Self {
        Self {
            permission,
            target_hour,
            last_notified,
        }
    }

    pub async fn load(store: &dyn KeyValueStore, target_hour: u32) -> Self {
        let permission = storage::load(store, PERMISSION_KEY, Permission::Unrequested).await;
        let last_notified = storage::load(store, LAST_NOTIFICATION_KEY, None).await;
        Self::new(permission, target_hour, last_notified)
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn last_notified(&self) -> Option<&str> {
        self.last_notified.as_deref()
    }

    /// Records the outcome of the user's permission request. Once granted
    /// or denied the state never changes again; a dismissed prompt
    /// (`Unrequested`) leaves it open.
    pub async fn resolve(
        &mut self,
        outcome: Permission,
        store: &dyn KeyValueStore,
        sink: &dyn NotificationSink,
    ) -> Permission {
        if self.permission != Permission::Unrequested {
            debug!(current = ?self.permission, requested = ?outcome, "permission already resolved");
            return self.permission;
        }
        if outcome == Permission::Unrequested {
            return self.permission;
        }

        self.permission = outcome;
        storage::save(store, PERMISSION_KEY, &self.permission).await;
        info!(permission = ?self.permission, "notification permission resolved");

        if self.permission == Permission::Granted {
            sink.dispatch(Notification::reminders_enabled()).await;
        }
        self.permission
    }

    pub async fn check(
        &mut self,
        now: NaiveDateTime,
        store: &dyn KeyValueStore,
        sink: &dyn NotificationSink,
    ) -> bool {
        if self.permission != Permission::Granted || now.hour() != self.target_hour {
            return false;
        }

        let today = day_marker(now.date());
        if self.last_notified.as_deref() == Some(today.as_str()) {
            return false;
        }

        // Sent even when every day is already checked off.
        sink.dispatch(Notification::daily_reminder()).await;
        storage::save(store, LAST_NOTIFICATION_KEY, &today).await;
        self.last_notified = Some(today);
        true
    }
}

pub async fn run_reminders(state: AppState, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        check_reminder(&state).await;
    }
}

pub async fn check_reminder(state: &AppState) -> bool {
    let now = state.clock.now();
    let mut reminder = state.reminder.lock().await;
    reminder
        .check(now, state.store.as_ref(), state.outbox.as_ref())
        .await
}
