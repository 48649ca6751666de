//! Enqueue a few tasks and dispatch them against a local development server.
//!
//! ```text
//! cargo run --example local_dispatch -- 127.0.0.1 8080 2
//! ```

use pushq::prelude::*;
use tokio::signal;

#[tokio::main]
async fn main() -> PushqResult<()> {
    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_default();
    let port = args.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let max_retries = args.next().and_then(|r| r.parse().ok()).unwrap_or(0);

    let config = PushqConfig {
        dispatch: DispatchConfig::configure(host, port, max_retries),
        ..PushqConfig::development()
    };
    pushq::logging::init(&config.logging)?;

    let queue = PushQueue::new(config)?;
    queue.start().await?;

    let tasks = [
        TaskOptions::new("/tasks/welcome-mail").with_body(r#"{"user":42}"#),
        TaskOptions::new("/tasks/rebuild-index").with_method(TaskMethod::Put),
        TaskOptions::new("/tasks/cleanup")
            .with_method(TaskMethod::Delete)
            .with_header("X-Queue-Source", "local_dispatch"),
    ];
    for options in tasks {
        let accepted = queue.enqueue(None, options);
        tracing::info!(task_id = %accepted.task_id, "Task accepted");
    }

    println!("Dispatching to {}. Press Ctrl+C to stop...", queue.config().dispatch.base_url());
    signal::ctrl_c().await.ok();

    queue.stop().await?;
    let stats = queue.dispatch_stats().await;
    println!(
        "attempts={} delivered={} retried={} exhausted={} abandoned={}",
        stats.attempts, stats.delivered, stats.retried, stats.exhausted, stats.abandoned
    );
    Ok(())
}
