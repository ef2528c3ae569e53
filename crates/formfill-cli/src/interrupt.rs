//! Ctrl-C handling for long batches.

use formfill::CancelFlag;

/// Exit code after an interrupted batch (128 + SIGINT).
pub const INTERRUPTED: i32 = 130;

/// Trip `cancel` on the first Ctrl-C so the batch stops before its next row
/// and the finished outputs are still written. A second Ctrl-C exits at once.
pub fn cancel_on_interrupt(cancel: &CancelFlag) {
    let cancel = cancel.clone();
    let spawned = std::thread::Builder::new()
        .name("interrupt".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    tracing::warn!("cannot install Ctrl-C handler: {e}");
                    return;
                }
            };
            runtime.block_on(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!("cannot install Ctrl-C handler: {e}");
                    return;
                }
                eprintln!("Interrupted: finishing rows in progress (Ctrl-C again to abort)");
                cancel.cancel();
                if tokio::signal::ctrl_c().await.is_ok() {
                    std::process::exit(INTERRUPTED);
                }
            });
        });
    if let Err(e) = spawned {
        tracing::warn!("cannot start Ctrl-C handler thread: {e}");
    }
}
