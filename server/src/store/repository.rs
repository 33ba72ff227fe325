//! In-memory event store
//!
//! Holds every calendar event for the lifetime of the process. All mutation
//! goes through a single lock so a regeneration pass (prune + insert) is
//! observed atomically by the reminder sweep.

use super::models::*;
use crate::config::RETENTION_DAYS;
use crate::error::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to the calendar's events
#[derive(Clone, Default)]
pub struct EventStore {
    events: Arc<RwLock<Vec<CalendarEvent>>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub async fn insert(&self, event: CalendarEvent) -> CalendarEvent {
        let mut events = self.events.write().await;
        events.push(event.clone());
        tracing::debug!("Stored {} event {}", event.event_type, event.id);
        event
    }

    /// Get an event by ID
    pub async fn get(&self, id: &str) -> Result<CalendarEvent> {
        let events = self.events.read().await;
        events
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| AppError::EventNotFound(id.to_string()))
    }

    /// All events ordered by due date
    pub async fn list(&self) -> Vec<CalendarEvent> {
        let mut events = self.events.read().await.clone();
        events.sort_by_key(|e| e.due_date);
        events
    }

    /// Events due in `(from, until]`, ordered by due date
    pub async fn list_between(&self, from: DateTime<Utc>, until: DateTime<Utc>) -> Vec<CalendarEvent> {
        let mut events: Vec<CalendarEvent> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.due_date > from && e.due_date <= until)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.due_date);
        events
    }

    /// Pending events whose reminder has not gone out yet
    pub async fn pending_unsent(&self) -> Vec<CalendarEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.status == EventStatus::Pending && !e.reminder_sent)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Record a delivered reminder. Never cleared once set.
    pub async fn mark_reminder_sent(&self, id: &str) -> Result<()> {
        let mut events = self.events.write().await;
        let event = find_mut(&mut events, id)?;
        event.reminder_sent = true;
        Ok(())
    }

    /// Flag a pending event as overdue. Returns false if it was not pending.
    pub(crate) async fn mark_overdue(&self, id: &str) -> Result<bool> {
        let mut events = self.events.write().await;
        let event = find_mut(&mut events, id)?;
        if event.status != EventStatus::Pending {
            return Ok(false);
        }
        event.status = EventStatus::Overdue;
        Ok(true)
    }

    /// Move an event to a caller-requested status
    pub async fn update_status(
        &self,
        id: &str,
        status: EventStatus,
        now: DateTime<Utc>,
    ) -> Result<CalendarEvent> {
        let mut events = self.events.write().await;
        let event = find_mut(&mut events, id)?;

        if !event.status.can_transition_to(status) {
            return Err(AppError::InvalidTransition {
                from: event.status.to_string(),
                to: status.to_string(),
            });
        }

        event.status = status;
        if status == EventStatus::Completed {
            event.completed_at = Some(now);
        }

        tracing::info!("Event {} is now {}", event.id, status);
        Ok(event.clone())
    }

    /// Delete an event
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| e.id != id);

        if events.len() == before {
            return Err(AppError::EventNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Drop stale events, then append whatever `build` produces from the
    /// survivors, under one write lock. Events matching `keep` survive even
    /// when stale. Returns `(pruned, created)`.
    pub async fn prune_and_extend<K, F>(
        &self,
        now: DateTime<Utc>,
        keep: K,
        build: F,
    ) -> (usize, usize)
    where
        K: Fn(&CalendarEvent) -> bool,
        F: FnOnce(&[CalendarEvent]) -> Vec<CalendarEvent>,
    {
        let mut events = self.events.write().await;

        let before = events.len();
        retain_recent(&mut events, now, keep);
        let pruned = before - events.len();

        let created = build(&events);
        let count = created.len();
        events.extend(created);

        (pruned, count)
    }
}

/// Keep completed events and anything due within the trailing retention window
fn retain_recent<K>(events: &mut Vec<CalendarEvent>, now: DateTime<Utc>, keep: K)
where
    K: Fn(&CalendarEvent) -> bool,
{
    let cutoff = now - Duration::days(RETENTION_DAYS);
    events.retain(|e| e.status == EventStatus::Completed || e.due_date > cutoff || keep(e));
}

fn find_mut<'a>(events: &'a mut [CalendarEvent], id: &str) -> Result<&'a mut CalendarEvent> {
    events
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or_else(|| AppError::EventNotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_due(event_type: EventType, due: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent::scheduled(event_type, due)
    }

    #[tokio::test]
    async fn test_insert_get_and_delete() {
        let store = EventStore::new();
        let event = store
            .insert(event_due(EventType::Blog, Utc::now() + Duration::days(1)))
            .await;

        let fetched = store.get(&event.id).await.unwrap();
        assert_eq!(fetched.id, event.id);

        store.delete(&event.id).await.unwrap();
        assert!(store.is_empty().await);
        assert!(matches!(
            store.delete(&event.id).await,
            Err(AppError::EventNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_due_date() {
        let store = EventStore::new();
        let now = Utc::now();
        store.insert(event_due(EventType::Blog, now + Duration::days(3))).await;
        store.insert(event_due(EventType::Linkedin, now + Duration::days(1))).await;
        store.insert(event_due(EventType::CaseStudy, now + Duration::days(2))).await;

        let types: Vec<EventType> = store.list().await.iter().map(|e| e.event_type).collect();

        assert_eq!(
            types,
            vec![EventType::Linkedin, EventType::CaseStudy, EventType::Blog]
        );
    }

    #[tokio::test]
    async fn test_completed_is_terminal() {
        let store = EventStore::new();
        let now = Utc::now();
        let event = store.insert(event_due(EventType::Blog, now)).await;

        let completed = store
            .update_status(&event.id, EventStatus::Completed, now)
            .await
            .unwrap();
        assert_eq!(completed.completed_at, Some(now));

        let result = store
            .update_status(&event.id, EventStatus::InProgress, now)
            .await;
        assert!(matches!(result, Err(AppError::InvalidTransition { .. })));
        assert!(!store.mark_overdue(&event.id).await.unwrap());
        assert_eq!(
            store.get(&event.id).await.unwrap().status,
            EventStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_callers_cannot_set_overdue() {
        let store = EventStore::new();
        let event = store.insert(event_due(EventType::Blog, Utc::now())).await;

        let result = store
            .update_status(&event.id, EventStatus::Overdue, Utc::now())
            .await;

        assert!(matches!(result, Err(AppError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn test_prune_retains_completed_and_recent() {
        let store = EventStore::new();
        let now = Utc::now();

        let old = store
            .insert(event_due(EventType::Blog, now - Duration::days(8)))
            .await;
        let old_completed = store
            .insert(event_due(EventType::Blog, now - Duration::days(30)))
            .await;
        store
            .update_status(&old_completed.id, EventStatus::Completed, now)
            .await
            .unwrap();
        let recent = store
            .insert(event_due(EventType::Linkedin, now - Duration::days(6)))
            .await;
        let future = store
            .insert(event_due(EventType::CaseStudy, now + Duration::days(40)))
            .await;

        let (pruned, created) = store.prune_and_extend(now, |_| false, |_| Vec::new()).await;

        assert_eq!(pruned, 1);
        assert_eq!(created, 0);
        assert!(store.get(&old.id).await.is_err());
        for kept in [&old_completed, &recent, &future] {
            assert!(store.get(&kept.id).await.is_ok());
        }

        let cutoff = now - Duration::days(RETENTION_DAYS);
        for event in store.list().await {
            assert!(event.status == EventStatus::Completed || event.due_date > cutoff);
        }
    }

    #[tokio::test]
    async fn test_prune_and_extend_sees_survivors() {
        let store = EventStore::new();
        let now = Utc::now();
        store
            .insert(event_due(EventType::Blog, now + Duration::days(1)))
            .await;

        let (_, created) = store
            .prune_and_extend(now, |_| false, |existing| {
                assert_eq!(existing.len(), 1);
                vec![event_due(EventType::Linkedin, now + Duration::days(2))]
            })
            .await;

        assert_eq!(created, 1);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_prune_spares_events_matching_keep() {
        let store = EventStore::new();
        let now = Utc::now();
        let stale = store
            .insert(event_due(EventType::Blog, now - Duration::days(20)))
            .await;
        store
            .insert(event_due(EventType::Linkedin, now - Duration::days(20)))
            .await;

        let (pruned, _) = store
            .prune_and_extend(now, |e| e.id == stale.id, |_| Vec::new())
            .await;

        assert_eq!(pruned, 1);
        assert!(store.get(&stale.id).await.is_ok());
    }
}
