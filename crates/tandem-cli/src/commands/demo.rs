//! `tandem demo` — the scripted multi-task demo.

use tandem_core::models::DemoTask;
use tandem_core::{ApiClient, TimelineStore, WorkflowRunner};

pub async fn run(api_url: &str) -> Result<(), String> {
    let tasks = DemoTask::default_script();
    println!("Running {} demo tasks...\n", tasks.len());

    let store = TimelineStore::new();
    let runner = WorkflowRunner::new(ApiClient::with_base_url(api_url), store.clone());

    runner.run_demo(&tasks).await.map_err(|e| e.to_string())?;

    super::print_timeline(&store.entries());
    Ok(())
}
