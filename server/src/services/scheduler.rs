/// Scheduler Service
/// Owns one recurring timer per enabled sub-schedule plus the reminder sweep.
/// Every schedule change rebuilds the whole timer set from scratch.
use crate::error::{AppError, Result};
use crate::schedule::{sweep_plan, trigger_plans, FireGate, ScheduleConfig, TimerKind, TriggerPlan};
use crate::services::{DraftGenerator, ReminderDispatcher};
use crate::store::{CalendarEvent, EventStore, EventType};
use chrono::{DateTime, Local, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

/// What a timer needs when it fires
#[derive(Clone)]
pub struct TriggerContext {
    store: EventStore,
    dispatcher: ReminderDispatcher,
    drafts: DraftGenerator,
}

impl TriggerContext {
    pub fn new(store: EventStore, dispatcher: ReminderDispatcher, drafts: DraftGenerator) -> Self {
        Self {
            store,
            dispatcher,
            drafts,
        }
    }

    /// Create a same-day event for `event_type` and deliver its reminder now
    pub async fn fire(&self, event_type: EventType) -> CalendarEvent {
        self.fire_at(event_type, Utc::now()).await
    }

    pub async fn fire_at(&self, event_type: EventType, now: DateTime<Utc>) -> CalendarEvent {
        let mut event = CalendarEvent::scheduled(event_type, now);

        match self.drafts.generate_for(event_type).await {
            Ok(draft) => event = event.with_draft(draft),
            Err(e) => tracing::warn!("No draft for {} event: {}", event_type, e),
        }

        let event = self.store.insert(event).await;
        tracing::info!("Scheduled {} event created: {}", event_type, event.id);

        if !self.dispatcher.deliver(&event).await {
            tracing::warn!(
                "Reminder for {} will be retried by the next sweep",
                event.id
            );
        }

        // Re-read so the caller sees the reminder flag
        self.store.get(&event.id).await.unwrap_or(event)
    }

    async fn on_timer(&self, kind: TimerKind, gate: FireGate) {
        let today = Local::now().date_naive();
        if !gate.allows(today) {
            tracing::debug!("Skipping {:?} timer on {} ({:?})", kind, today, gate);
            return;
        }

        match kind.event_type() {
            Some(event_type) => {
                self.fire(event_type).await;
            }
            None => {
                self.dispatcher.sweep().await;
            }
        }
    }
}

/// Recurring trigger scheduler
pub struct SchedulerService {
    scheduler: Arc<RwLock<JobScheduler>>,
    context: TriggerContext,
    active_jobs: Arc<RwLock<BTreeMap<TimerKind, Uuid>>>,
}

impl SchedulerService {
    /// Create new scheduler service
    pub async fn new(context: TriggerContext) -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler: Arc::new(RwLock::new(scheduler)),
            context,
            active_jobs: Arc::new(RwLock::new(BTreeMap::new())),
        })
    }

    pub fn context(&self) -> &TriggerContext {
        &self.context
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<()> {
        let scheduler = self.scheduler.read().await;
        scheduler
            .start()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to start scheduler: {}", e)))?;
        tracing::info!("Content calendar scheduler started");
        Ok(())
    }

    /// Drop every timer and register the ones `config` implies
    pub async fn rebuild(&self, config: &ScheduleConfig) -> Result<()> {
        let mut active = self.active_jobs.write().await;
        self.remove_jobs(&mut active).await?;

        for plan in trigger_plans(config)
            .into_iter()
            .chain(std::iter::once(sweep_plan()))
        {
            let job_id = self.add_job(&plan).await?;
            active.insert(plan.kind, job_id);
        }

        tracing::info!("Scheduler rebuilt with {} timers", active.len());
        Ok(())
    }

    /// Remove all registered timers
    pub async fn cancel_all(&self) -> Result<()> {
        let mut active = self.active_jobs.write().await;
        self.remove_jobs(&mut active).await
    }

    /// Kinds of the timers currently registered
    pub async fn active_timers(&self) -> Vec<TimerKind> {
        self.active_jobs.read().await.keys().copied().collect()
    }

    /// Shutdown scheduler gracefully
    pub async fn shutdown(&self) -> Result<()> {
        let mut scheduler = self.scheduler.write().await;
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to shutdown scheduler: {}", e)))?;
        tracing::info!("Content calendar scheduler shutdown");
        Ok(())
    }

    async fn add_job(&self, plan: &TriggerPlan) -> Result<Uuid> {
        let context = self.context.clone();
        let kind = plan.kind;
        let gate = plan.gate;

        let job = Job::new_async_tz(plan.cron.clone(), Local, move |_uuid, _l| {
            let context = context.clone();
            Box::pin(async move {
                context.on_timer(kind, gate).await;
            })
        })
        .map_err(|e| {
            AppError::Scheduler(format!("Failed to create {:?} job ({}): {}", kind, plan.cron, e))
        })?;

        let job_id = job.guid();

        let scheduler = self.scheduler.write().await;
        scheduler
            .add(job)
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to schedule job: {}", e)))?;

        tracing::debug!("Timer {:?} registered: {}", kind, plan.cron);
        Ok(job_id)
    }

    async fn remove_jobs(&self, active: &mut BTreeMap<TimerKind, Uuid>) -> Result<()> {
        if active.is_empty() {
            return Ok(());
        }

        let scheduler = self.scheduler.write().await;
        while let Some((kind, job_id)) = active.pop_first() {
            scheduler
                .remove(&job_id)
                .await
                .map_err(|e| AppError::Scheduler(format!("Failed to remove job: {}", e)))?;
            tracing::debug!("Timer {:?} removed", kind);
        }

        Ok(())
    }
}
