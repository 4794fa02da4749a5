use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use tokio::sync::watch;
use tracing::{error, info, warn};

use remind_core::types::Repeat;
use remind_store::ReminderStore;

use crate::{
    error::Result,
    notify::Notifier,
    recurrence::next_occurrence,
    render::render_message,
};

/// Outcome of one dispatch pass.
#[derive(Debug, Clone, Copy)]
pub struct DispatchSummary {
    /// Reminders delivered successfully in this pass. Failed deliveries are
    /// excluded; they are only logged.
    pub sent: u32,
    /// The single `now` snapshot all due-comparisons in the pass used.
    pub checked_at: NaiveDateTime,
}

/// Drives delivery of due reminders.
///
/// Holds its own [`ReminderStore`] handle (own connection) so passes never
/// contend with the HTTP handlers' statements.
pub struct DispatchEngine<N: Notifier> {
    store: ReminderStore,
    notifier: N,
    batch_limit: u32,
}

impl<N: Notifier> DispatchEngine<N> {
    pub fn new(store: ReminderStore, notifier: N, batch_limit: u32) -> Self {
        Self {
            store,
            notifier,
            batch_limit,
        }
    }

    /// Run one bounded batch pass.
    ///
    /// `now` is captured once up front; every reminder in the batch is
    /// processed independently, so one delivery failure never aborts or
    /// rolls back the rest. A store error, by contrast, is fatal to the
    /// pass.
    pub async fn run_pass(&self) -> Result<DispatchSummary> {
        let now = Utc::now().naive_utc();
        let due = self.store.select_due(now, self.batch_limit)?;
        let mut sent = 0u32;

        for reminder in due {
            let message = render_message(&reminder.text);
            match self.notifier.send(reminder.chat_id, &message).await {
                Ok(()) => {
                    if reminder.repeat == Repeat::Once {
                        if !self.store.mark_sent(reminder.id)? {
                            // A concurrent pass already claimed it; the
                            // duplicate delivery is the tolerated race.
                            warn!(reminder_id = reminder.id, "already marked sent");
                        }
                    } else {
                        let next = next_occurrence(reminder.remind_at, reminder.repeat);
                        self.store.reschedule(reminder.id, next)?;
                    }
                    sent += 1;
                    info!(
                        reminder_id = reminder.id,
                        chat_id = reminder.chat_id,
                        repeat = %reminder.repeat,
                        "reminder dispatched"
                    );
                }
                Err(e) => {
                    // Left untouched: still due on the next pass.
                    warn!(
                        reminder_id = reminder.id,
                        chat_id = reminder.chat_id,
                        error = %e,
                        "delivery failed"
                    );
                }
            }
        }

        Ok(DispatchSummary {
            sent,
            checked_at: now,
        })
    }

    /// Background loop: run a pass every `poll` until `shutdown` signals.
    pub async fn run(&self, poll: Duration, mut shutdown: watch::Receiver<bool>) {
        info!(poll_secs = poll.as_secs(), "dispatch engine started");
        let mut interval = tokio::time::interval(poll);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.run_pass().await {
                        Ok(summary) if summary.sent > 0 => {
                            info!(sent = summary.sent, "dispatch pass complete");
                        }
                        Ok(_) => {}
                        Err(e) => error!("dispatch pass failed: {e}"),
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("dispatch engine shutting down");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use rusqlite::Connection;
    use std::sync::Mutex;

    use crate::notify::NotifyError;

    /// Records every send; fails any message containing `fail_substring`.
    struct MockNotifier {
        fail_substring: Option<&'static str>,
        calls: Mutex<Vec<(i64, String)>>,
    }

    impl MockNotifier {
        fn ok() -> Self {
            Self {
                fail_substring: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_on(substring: &'static str) -> Self {
            Self {
                fail_substring: Some(substring),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn send(&self, chat_id: i64, text: &str) -> std::result::Result<(), NotifyError> {
            self.calls.lock().unwrap().push((chat_id, text.to_string()));
            match self.fail_substring {
                Some(s) if text.contains(s) => Err(NotifyError::Api { status: 502 }),
                _ => Ok(()),
            }
        }
    }

    fn mem_store() -> ReminderStore {
        ReminderStore::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    fn past(minutes: i64) -> NaiveDateTime {
        Utc::now().naive_utc() - ChronoDuration::minutes(minutes)
    }

    #[tokio::test]
    async fn once_dispatch_is_idempotent() {
        let store = mem_store();
        store.create(7, "one shot", past(5), Repeat::Once).unwrap();
        let engine = DispatchEngine::new(store, MockNotifier::ok(), 50);

        let first = engine.run_pass().await.unwrap();
        assert_eq!(first.sent, 1);

        let second = engine.run_pass().await.unwrap();
        assert_eq!(second.sent, 0);
        assert_eq!(engine.notifier.call_count(), 1);
    }

    #[tokio::test]
    async fn once_dispatch_marks_sent() {
        let store = mem_store();
        store.create(7, "one shot", past(5), Repeat::Once).unwrap();
        let engine = DispatchEngine::new(store, MockNotifier::ok(), 50);

        engine.run_pass().await.unwrap();

        let r = &engine.store.list(7).unwrap()[0];
        assert!(r.sent);
        assert!(!r.done);
    }

    #[tokio::test]
    async fn daily_dispatch_reschedules_one_day_out() {
        let store = mem_store();
        let at = past(60);
        store.create(7, "stand up", at, Repeat::Daily).unwrap();
        let engine = DispatchEngine::new(store, MockNotifier::ok(), 50);

        assert_eq!(engine.run_pass().await.unwrap().sent, 1);

        let r = &engine.store.list(7).unwrap()[0];
        assert_eq!(r.remind_at, at + ChronoDuration::days(1));
        assert!(!r.sent);

        // New occurrence is an hour short of due: not re-selected.
        assert_eq!(engine.run_pass().await.unwrap().sent, 0);
        assert_eq!(engine.notifier.call_count(), 1);
    }

    #[tokio::test]
    async fn done_reminders_are_never_dispatched() {
        let store = mem_store();
        let id = store.create(7, "cancelled", past(5), Repeat::Once).unwrap();
        store.set_done(7, id, true).unwrap();
        let engine = DispatchEngine::new(store, MockNotifier::ok(), 50);

        assert_eq!(engine.run_pass().await.unwrap().sent, 0);
        assert_eq!(engine.notifier.call_count(), 0);
    }

    #[tokio::test]
    async fn future_reminders_are_not_selected() {
        let store = mem_store();
        store.create(7, "later", past(-60), Repeat::Once).unwrap();
        let engine = DispatchEngine::new(store, MockNotifier::ok(), 50);

        assert_eq!(engine.run_pass().await.unwrap().sent, 0);
        assert_eq!(engine.notifier.call_count(), 0);
    }

    #[tokio::test]
    async fn one_failed_delivery_does_not_abort_the_batch() {
        let store = mem_store();
        store.create(7, "first", past(30), Repeat::Once).unwrap();
        store.create(7, "boom", past(20), Repeat::Once).unwrap();
        store.create(7, "third", past(10), Repeat::Daily).unwrap();
        let engine = DispatchEngine::new(store, MockNotifier::failing_on("boom"), 50);

        let summary = engine.run_pass().await.unwrap();
        assert_eq!(summary.sent, 2);
        assert_eq!(engine.notifier.call_count(), 3);

        // First marked sent, third rescheduled; the failed one stays due.
        let still_due = engine
            .store
            .select_due(Utc::now().naive_utc(), 50)
            .unwrap();
        assert_eq!(still_due.len(), 1);
        assert_eq!(still_due[0].text, "boom");
    }

    #[tokio::test]
    async fn rendered_message_carries_bell_prefix() {
        let store = mem_store();
        store.create(7, "water <plants>", past(5), Repeat::Once).unwrap();
        let engine = DispatchEngine::new(store, MockNotifier::ok(), 50);

        engine.run_pass().await.unwrap();

        let calls = engine.notifier.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, 7);
        assert_eq!(calls[0].1, "🔔 <b>Reminder</b>\n\nwater &lt;plants&gt;");
    }

    #[tokio::test]
    async fn batch_limit_caps_a_pass() {
        let store = mem_store();
        for i in 0..5 {
            store.create(7, &format!("r{i}"), past(10 + i), Repeat::Once).unwrap();
        }
        let engine = DispatchEngine::new(store, MockNotifier::ok(), 3);

        assert_eq!(engine.run_pass().await.unwrap().sent, 3);
        // The remainder is picked up by the following pass.
        assert_eq!(engine.run_pass().await.unwrap().sent, 2);
    }
}
