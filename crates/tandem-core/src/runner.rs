//! Workflow runner — turns proxy replies into timeline entries and drives
//! the scripted demo.

use std::time::Duration;

use chrono::Utc;

use crate::client::ApiClient;
use crate::error::ProxyError;
use crate::models::{DemoTask, TimelineEntry, WorkflowKind};
use crate::store::TimelineStore;

/// Pause between demo tasks so incremental progress is observable.
const DEMO_PACING: Duration = Duration::from_millis(300);

pub struct WorkflowRunner {
    api: ApiClient,
    store: TimelineStore,
}

impl WorkflowRunner {
    pub fn new(api: ApiClient, store: TimelineStore) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &TimelineStore {
        &self.store
    }

    /// Run one workflow and normalize the reply into timeline entries.
    ///
    /// Every returned step shares a single receipt timestamp and starts
    /// collapsed. Any failure becomes one pre-expanded `System` entry so it
    /// is visible without a user action.
    pub async fn run_workflow(
        &self,
        prompt: &str,
        workflow: &WorkflowKind,
    ) -> Vec<TimelineEntry> {
        match self.api.run_workflow(prompt, workflow).await {
            Ok(reply) => {
                let received_at = Utc::now();
                reply
                    .timeline
                    .into_iter()
                    .map(|step| TimelineEntry::new(step.agent, step.text, received_at))
                    .collect()
            }
            Err(e) => {
                tracing::warn!("Workflow '{}' failed: {}", workflow, e);
                vec![TimelineEntry::system_error(format!("Error: {}", e))]
            }
        }
    }

    /// Run one workflow as a fresh session: claim the busy gate and replace
    /// the timeline with the normalized entries.
    pub async fn run(&self, prompt: &str, workflow: &WorkflowKind) -> Result<(), ProxyError> {
        let _guard = self.store.begin_run()?;
        self.store.replace(Vec::new());

        let entries = self.run_workflow(prompt, workflow).await;
        self.store.replace(entries);
        Ok(())
    }

    /// Run a scripted sequence of tasks, accumulating into the timeline.
    ///
    /// Tasks execute strictly in order; each task's `Task` header and
    /// entries are appended in one step only after its workflow call fully
    /// resolves, so tasks never interleave. A failed task is reported
    /// inline and does not abort the remainder; the busy gate is released
    /// on every exit path.
    pub async fn run_demo(&self, tasks: &[DemoTask]) -> Result<(), ProxyError> {
        let _guard = self.store.begin_run()?;
        self.store.replace(Vec::new());

        for (i, task) in tasks.iter().enumerate() {
            tracing::info!(
                "Demo task {}/{}: {} ({})",
                i + 1,
                tasks.len(),
                task.prompt,
                task.workflow
            );

            match self.api.run_workflow(&task.prompt, &task.workflow).await {
                Ok(reply) => {
                    let received_at = Utc::now();
                    let mut batch =
                        vec![TimelineEntry::task_header(&task.prompt, &task.workflow)];
                    batch.extend(
                        reply
                            .timeline
                            .into_iter()
                            .map(|step| TimelineEntry::new(step.agent, step.text, received_at)),
                    );
                    self.store.append(batch);
                }
                Err(e) => {
                    tracing::warn!("Demo task {} failed: {}", i + 1, e);
                    self.store.append(vec![TimelineEntry::system_error(format!(
                        "Error during demo task '{}': {}",
                        task.prompt, e
                    ))]);
                }
            }

            if i + 1 < tasks.len() {
                tokio::time::sleep(DEMO_PACING).await;
            }
        }

        Ok(())
    }
}
