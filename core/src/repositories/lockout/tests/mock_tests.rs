//! Tests for the mock lockout repository implementation

use hg_shared::config::LockoutConfig;

use crate::domain::entities::lockout::GuardScope;
use crate::domain::value_objects::DeviceContext;
use crate::repositories::lockout::MockLockoutRepository;
use crate::repositories::LockoutRepository;

fn device() -> DeviceContext {
    DeviceContext::new(
        Some("device-1".to_string()),
        Some("test-agent".to_string()),
        Some("10.0.0.1".to_string()),
    )
}

#[tokio::test]
async fn test_first_failure_creates_the_counter() {
    let repo = MockLockoutRepository::default();

    assert!(repo.find("p1", GuardScope::Login).await.unwrap().is_none());

    let counter = repo
        .record_failure("p1", GuardScope::Login, &device())
        .await
        .unwrap();
    assert_eq!(counter.strike, 1);
    assert_eq!(counter.failed_attempts, 1);
    assert_eq!(counter.last_user_agent.as_deref(), Some("test-agent"));
    assert_eq!(counter.last_ip.as_deref(), Some("10.0.0.1"));

    assert!(repo.find("p1", GuardScope::Login).await.unwrap().is_some());
}

#[tokio::test]
async fn test_scopes_are_tracked_separately() {
    let repo = MockLockoutRepository::default();
    repo.record_failure("p1", GuardScope::Login, &device())
        .await
        .unwrap();
    repo.record_failure("p1", GuardScope::Otp, &device())
        .await
        .unwrap();
    repo.record_failure("p1", GuardScope::Otp, &device())
        .await
        .unwrap();

    let login = repo.find("p1", GuardScope::Login).await.unwrap().unwrap();
    let otp = repo.find("p1", GuardScope::Otp).await.unwrap().unwrap();
    assert_eq!(login.strike, 1);
    assert_eq!(otp.strike, 2);
}

#[tokio::test]
async fn test_threshold_locks_and_success_clears() {
    let config = LockoutConfig::default();
    let repo = MockLockoutRepository::new(config);

    let mut last = None;
    for _ in 0..config.threshold {
        last = Some(
            repo.record_failure("p1", GuardScope::Login, &device())
                .await
                .unwrap(),
        );
    }
    let locked = last.unwrap();
    assert!(locked.locked_until.is_some());

    repo.record_success("p1", GuardScope::Login).await.unwrap();
    let cleared = repo.find("p1", GuardScope::Login).await.unwrap().unwrap();
    assert_eq!(cleared.strike, 0);
    assert!(cleared.locked_until.is_none());
    // lifetime tally survives
    assert_eq!(cleared.failed_attempts, config.threshold as i64);
}

#[tokio::test]
async fn test_success_without_counter_is_a_noop() {
    let repo = MockLockoutRepository::default();
    repo.record_success("ghost", GuardScope::Login).await.unwrap();
    assert!(repo.find("ghost", GuardScope::Login).await.unwrap().is_none());
}
