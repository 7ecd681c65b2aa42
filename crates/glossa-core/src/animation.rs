use std::time::Duration;

use async_trait::async_trait;

use crate::element::ElementHandle;

/// Fade primitives of the UI layer.
///
/// Each call resolves once the animation has finished.
#[async_trait]
pub trait Animator: Send + Sync {
    async fn fade_out(&self, element: ElementHandle, duration: Duration);

    async fn fade_in(&self, element: ElementHandle, duration: Duration);
}

/// Completes immediately
pub struct NoAnimation;

#[async_trait]
impl Animator for NoAnimation {
    async fn fade_out(&self, _element: ElementHandle, _duration: Duration) {}

    async fn fade_in(&self, _element: ElementHandle, _duration: Duration) {}
}
