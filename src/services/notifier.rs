use async_trait::async_trait;

/// Outbound message channel. Delivery failures are logged by the
/// implementation and reported as `false`; they never surface as errors.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> bool;
}
