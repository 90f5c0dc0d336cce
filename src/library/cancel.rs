use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Shared flag handed to an in-flight request. Cancelling is one-way.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Tokens of the requests currently in flight, keyed by request id.
///
/// Cancel and register effects run on separate threads, so a cancel may reach
/// the registry before its request does; the request then starts cancelled.
#[derive(Debug, Default)]
pub struct RequestRegistry {
    inner: Mutex<RegistryInner>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    tokens: HashMap<u64, CancellationToken>,
    latest_registered: u64,
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, request_id: u64) -> CancellationToken {
        match self.inner.lock() {
            Ok(mut inner) => {
                inner.latest_registered = inner.latest_registered.max(request_id);
                inner.tokens.entry(request_id).or_default().clone()
            }
            Err(_) => CancellationToken::new(),
        }
    }

    pub fn cancel(&self, request_id: u64) {
        if let Ok(mut inner) = self.inner.lock() {
            if let Some(token) = inner.tokens.get(&request_id) {
                token.cancel();
            } else if request_id > inner.latest_registered {
                let token = CancellationToken::new();
                token.cancel();
                inner.tokens.insert(request_id, token);
            }
        }
    }

    pub fn finish(&self, request_id: u64) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.tokens.remove(&request_id);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.tokens.len()).unwrap_or(0)
    }
}
