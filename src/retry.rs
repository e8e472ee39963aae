use core::{fmt::Display, future::Future, time::Duration};

use tokio::time::sleep;

use crate::browser::Page;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            wait: const { Duration::from_secs(10) },
        }
    }
}

/// Runs `op` until it succeeds or `policy.attempts` are used up, sleeping
/// `policy.wait` between attempts. At least one attempt is always made.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, what: &str, mut op: F) -> Option<T>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.attempts.max(1);
    for i in 1..=attempts {
        match op().await {
            Ok(value) => return Some(value),
            Err(e) => {
                tracing::warn!(target: "retry", "{what} failed ({i}/{attempts}): {e}");
                if i < attempts {
                    sleep(policy.wait).await;
                }
            }
        }
    }
    None
}

/// Navigates with retries; `false` means the caller should skip `url`.
pub async fn safe_get<P: Page>(page: &P, url: &str, policy: RetryPolicy) -> bool {
    retry(policy, url, move || page.goto(url)).await.is_some()
}
