use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Exit status used when a repeated signal forces the process down
pub const FORCE_EXIT_CODE: i32 = 1;

/// What the listener should do after a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    /// First signal: the token was cancelled, let in-flight work wind down
    Cancel,
    /// Any later signal: leave immediately
    ForceExit,
}

/// Owns the run's cancellation token and counts interrupt signals.
///
/// Clones share the same token and counter.
#[derive(Debug, Clone, Default)]
pub struct InterruptController {
    token: CancellationToken,
    signals: Arc<AtomicUsize>,
}

impl InterruptController {
    /// Create a controller with a fresh token
    pub fn new() -> Self {
        Self::default()
    }

    /// Token observed by remote calls
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Number of signals seen so far
    pub fn signal_count(&self) -> usize {
        self.signals.load(Ordering::SeqCst)
    }

    /// Record a signal. The first one cancels the token, later ones ask for a forced exit.
    pub fn on_signal(&self, signal: &str) -> SignalAction {
        let count = self.signals.fetch_add(1, Ordering::SeqCst) + 1;
        if count == 1 {
            tracing::warn!("received {}, cancelling", signal);
            self.token.cancel();
            SignalAction::Cancel
        } else {
            tracing::warn!("received {}, force exiting", signal);
            SignalAction::ForceExit
        }
    }

    /// Listen for SIGINT/SIGTERM for the rest of the process lifetime.
    ///
    /// Handlers are installed before this returns, so a signal sent right
    /// after is never missed.
    pub fn spawn_listener(&self) -> std::io::Result<JoinHandle<()>> {
        let mut signals = ProcessSignals::install()?;
        let controller = self.clone();
        Ok(tokio::spawn(async move {
            while let Some(name) = signals.recv().await {
                if controller.on_signal(name) == SignalAction::ForceExit {
                    std::process::exit(FORCE_EXIT_CODE);
                }
            }
        }))
    }
}

struct ProcessSignals {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ProcessSignals {
    #[cfg(unix)]
    fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(not(unix))]
    fn install() -> std::io::Result<Self> {
        Ok(Self {})
    }

    #[cfg(unix)]
    async fn recv(&mut self) -> Option<&'static str> {
        tokio::select! {
            Some(()) = self.interrupt.recv() => Some("SIGINT"),
            Some(()) = self.terminate.recv() => Some("SIGTERM"),
            else => None,
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) -> Option<&'static str> {
        tokio::signal::ctrl_c().await.ok().map(|_| "ctrl-c")
    }
}
