use tokio::sync::watch;

/// One-way flag that many tasks can wait on. Used for process shutdown and for
/// holding scheduled jobs back until the gateway reports ready.
#[derive(Clone)]
pub struct Latch {
    sender: watch::Sender<bool>,
}

#[derive(Clone)]
pub struct LatchListener {
    receiver: watch::Receiver<bool>,
}

pub type Shutdown = Latch;

impl Latch {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn subscribe(&self) -> LatchListener {
        LatchListener {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }
}

impl Default for Latch {
    fn default() -> Self {
        Self::new()
    }
}

impl LatchListener {
    pub async fn notified(&mut self) {
        // An error means the sender is gone; nothing will ever flip the flag.
        let _ = self.receiver.wait_for(|set| *set).await;
    }

    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }
}

/// Triggers `shutdown` on the first SIGINT or SIGTERM.
pub fn install_signal_handlers(shutdown: Shutdown) {
    tokio::spawn(async move {
        let signal = next_stop_signal().await;
        tracing::info!(target: "lifecycle", signal, "stop signal received");
        shutdown.trigger();
    });
}

async fn next_stop_signal() -> &'static str {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                return tokio::select! {
                    Ok(()) = tokio::signal::ctrl_c() => "SIGINT",
                    _ = term.recv() => "SIGTERM",
                };
            }
            Err(err) => {
                tracing::warn!(target: "lifecycle", error = %err, "SIGTERM handler unavailable");
            }
        }
    }
    if tokio::signal::ctrl_c().await.is_err() {
        // No way to observe a stop request; only an explicit trigger ends the process.
        std::future::pending::<()>().await;
    }
    "SIGINT"
}
