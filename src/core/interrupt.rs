use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Process-interrupt flag raised by the Ctrl-C handler and observed
/// between trials and between categories.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    raised: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Raises the flag on Ctrl-C. Must be called inside the runtime.
    pub fn watch_ctrl_c(&self) {
        let flag = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, finishing current trial and releasing the browser");
                flag.raise();
            }
        });
    }
}
