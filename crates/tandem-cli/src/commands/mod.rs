//! CLI command implementations.
//!
//! Each submodule corresponds to a top-level CLI command and reuses the
//! tandem-core domain logic.

pub mod ask;
pub mod demo;
pub mod serve;
pub mod workflow;

use tandem_core::TimelineEntry;

/// Print a timeline in display order, collapsed entries as previews.
pub fn print_timeline(entries: &[TimelineEntry]) {
    if entries.is_empty() {
        println!("(no agent output)");
        return;
    }

    for entry in entries {
        println!("── {} · {} ──", entry.agent, entry.created_at.format("%H:%M:%S"));
        if entry.expanded {
            println!("{}", entry.text);
        } else {
            println!("{}", entry.preview());
        }
        println!();
    }
}
