//! The fixed demo script: a few example tasks showcasing agent handoffs.

use crate::models::{DemoTask, WorkflowKind};

impl DemoTask {
    /// The scripted multi-task demo, consumed sequentially in this order.
    pub fn default_script() -> Vec<DemoTask> {
        vec![
            DemoTask {
                prompt: "Create an onboarding email for a new user of our product named Acme CRM"
                    .to_string(),
                workflow: WorkflowKind::Editorial,
            },
            DemoTask {
                prompt:
                    "Write a Python function that validates email addresses and include unit tests"
                        .to_string(),
                workflow: WorkflowKind::Dev,
            },
            DemoTask {
                prompt: "Draft a short product features summary for Acme CRM landing page"
                    .to_string(),
                workflow: WorkflowKind::Editorial,
            },
        ]
    }
}
