//! `tandem workflow` — run one named agent workflow.

use tandem_core::{ApiClient, TimelineStore, WorkflowKind, WorkflowRunner};

pub async fn run(api_url: &str, prompt: &str, workflow: &str) -> Result<(), String> {
    let kind = WorkflowKind::parse(workflow);
    let store = TimelineStore::new();
    let runner = WorkflowRunner::new(ApiClient::with_base_url(api_url), store.clone());

    runner.run(prompt, &kind).await.map_err(|e| e.to_string())?;

    super::print_timeline(&store.entries());
    Ok(())
}
