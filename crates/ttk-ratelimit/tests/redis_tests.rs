//! Redis counter integration tests.

use std::time::Duration;

use ttk_models::RateLimitPolicy;
use ttk_ratelimit::{RateLimitStore, RedisSlidingWindow};

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

fn test_policy(max_requests: u32, window: Duration) -> RateLimitPolicy {
    RateLimitPolicy {
        name: "test",
        prefix: format!("ttk-test-{}", uuid::Uuid::new_v4().simple()),
        max_requests,
        window,
    }
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_redis_window_admits_up_to_limit() {
    let store = RedisSlidingWindow::from_url(&redis_url(), test_policy(2, Duration::from_secs(60)))
        .expect("Failed to create store");

    let first = store.limit("caller").await.expect("limit failed");
    let second = store.limit("caller").await.expect("limit failed");
    let third = store.limit("caller").await.expect("limit failed");

    assert!(first.allowed && second.allowed);
    assert_eq!(second.remaining, 0);
    assert!(!third.allowed);
    assert!(third.reset_at_ms >= first.reset_at_ms);

    // Independent key, independent budget
    assert!(store.limit("other").await.expect("limit failed").allowed);
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_redis_window_slides() {
    let store = RedisSlidingWindow::from_url(&redis_url(), test_policy(1, Duration::from_millis(300)))
        .expect("Failed to create store");

    assert!(store.limit("caller").await.unwrap().allowed);
    assert!(!store.limit("caller").await.unwrap().allowed);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(store.limit("caller").await.unwrap().allowed);
}
