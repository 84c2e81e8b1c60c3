use std::sync::mpsc;
use std::time::Duration;

use procgate::core::{Config, ControlOutcome, MutationRequest, Role};
use procgate::error::AuthorizationError;

use super::fake_os::{quiet_config, service_with, settle, wait_until, FakeOs};

#[tokio::test]
async fn test_user_cannot_reprioritize() {
    let os = FakeOs::with_processes(&[(100, "worker")]);
    let service = service_with(&os, &quiet_config());

    let session = service.login("user", "123").unwrap();
    assert_eq!(session.role, Role::User);

    assert!(!service.reprioritize(100, 5).await);
    assert!(!service.terminate(100).await);
    assert_eq!(os.control_calls(), 0);

    let result = service
        .execute_detailed(MutationRequest::reprioritize(100, 5))
        .await;
    assert!(matches!(result, Err(AuthorizationError::Forbidden(_))));
}

#[tokio::test]
async fn test_mutation_without_session_is_rejected() {
    let os = FakeOs::with_processes(&[(100, "worker")]);
    let service = service_with(&os, &quiet_config());

    assert!(!service.terminate(100).await);
    let result = service.execute_detailed(MutationRequest::terminate(100)).await;
    assert!(matches!(result, Err(AuthorizationError::NoSession)));
    assert_eq!(os.control_calls(), 0);
}

#[tokio::test]
async fn test_admin_reprioritize_shows_in_next_listing() {
    let os = FakeOs::with_processes(&[(100, "worker"), (200, "daemon")]);
    let service = service_with(&os, &quiet_config());
    service.login("admin", "123").unwrap();

    assert!(service.reprioritize(100, 5).await);

    let records = service.list().await;
    let worker = records.iter().find(|r| r.pid == 100).unwrap();
    assert_eq!(worker.priority, 5);
    let daemon = records.iter().find(|r| r.pid == 200).unwrap();
    assert_eq!(daemon.priority, 0);
}

#[tokio::test]
async fn test_out_of_range_priority_never_reaches_os() {
    let os = FakeOs::with_processes(&[(100, "worker")]);
    let service = service_with(&os, &quiet_config());
    service.login("admin", "123").unwrap();

    let outcome = service
        .execute_detailed(MutationRequest::reprioritize(100, 40))
        .await;
    assert_eq!(outcome.unwrap(), ControlOutcome::InvalidArgument);

    let outcome = service
        .execute_detailed(MutationRequest::terminate(0))
        .await;
    assert_eq!(outcome.unwrap(), ControlOutcome::InvalidArgument);
    assert_eq!(os.control_calls(), 0);
}

#[tokio::test]
async fn test_terminate_twice() {
    let os = FakeOs::with_processes(&[(100, "worker")]);
    let service = service_with(&os, &quiet_config());
    service.login("admin", "123").unwrap();

    assert!(service.terminate(100).await);
    assert_eq!(
        service
            .execute_detailed(MutationRequest::terminate(100))
            .await
            .unwrap(),
        ControlOutcome::NotFound
    );

    let records = service.list().await;
    assert!(records.iter().all(|r| r.pid != 100));
}

#[tokio::test]
async fn test_successful_mutation_refreshes_snapshot() {
    let os = FakeOs::with_processes(&[(100, "worker"), (200, "daemon")]);
    let service = service_with(&os, &quiet_config());
    service.login("admin", "123").unwrap();
    wait_until(|| service.snapshot().len() == 2).await;

    assert!(service.terminate(200).await);
    wait_until(|| service.snapshot().len() == 1).await;
    assert_eq!(service.snapshot()[0].pid, 100);
}

#[tokio::test]
async fn test_mutation_during_poll_fetch_still_refreshes_snapshot() {
    let os = FakeOs::with_processes(&[(100, "worker")]);
    let service = service_with(&os, &quiet_config());
    service.login("admin", "123").unwrap();
    wait_until(|| !service.snapshot().is_empty()).await;

    // A poll fetch reads the old priority and stays in flight.
    let calls_before = os.list_calls();
    let (release, hold) = mpsc::channel();
    os.hold_next_list(hold);
    assert!(service.refresh());
    wait_until(|| os.list_calls() > calls_before).await;

    assert!(service.reprioritize(100, 5).await);
    release.send(()).unwrap();

    wait_until(|| service.snapshot().first().map(|r| r.priority) == Some(5)).await;
    assert_eq!(os.list_calls(), calls_before + 2);
}

#[tokio::test]
async fn test_provider_failure_lists_nothing() {
    let os = FakeOs::with_processes(&[(100, "worker")]);
    let service = service_with(&os, &quiet_config());

    os.set_listing_fails(true);
    assert!(service.list().await.is_empty());

    os.set_listing_fails(false);
    assert_eq!(service.list().await.len(), 1);
}

#[tokio::test]
async fn test_list_without_session_is_not_stored() {
    let os = FakeOs::with_processes(&[(100, "worker")]);
    let service = service_with(&os, &quiet_config());

    assert_eq!(service.list().await.len(), 1);
    assert!(service.snapshot().is_empty());
}

#[tokio::test]
async fn test_later_resolving_list_wins() {
    let os = FakeOs::with_processes(&[(100, "worker")]);
    let service = service_with(&os, &quiet_config());
    service.login("user", "123").unwrap();
    wait_until(|| !service.snapshot().is_empty()).await;

    let calls_before = os.list_calls();
    let (release, hold) = mpsc::channel();
    os.hold_next_list(hold);

    let slow = service.list();
    let fast = async {
        wait_until(|| os.list_calls() > calls_before).await;
        let records = service.list().await;
        release.send(()).unwrap();
        records
    };
    let (slow_records, fast_records) = tokio::join!(slow, fast);

    assert_ne!(slow_records[0].path, fast_records[0].path);
    assert_eq!(service.snapshot()[0].path, slow_records[0].path);
}

#[tokio::test]
async fn test_failed_login_ends_previous_session() {
    let os = FakeOs::with_processes(&[(100, "worker")]);
    let service = service_with(&os, &quiet_config());

    service.login("admin", "123").unwrap();
    assert!(service.is_polling());

    assert!(service.login("admin", "wrong").is_err());
    assert!(service.session().is_none());
    assert!(!service.is_polling());
    assert!(service.snapshot().is_empty());
}

#[tokio::test]
async fn test_login_replaces_session() {
    let os = FakeOs::with_processes(&[(100, "worker")]);
    let service = service_with(&os, &quiet_config());

    service.login("admin", "123").unwrap();
    let session = service.login("user", "123").unwrap();
    assert_eq!(session.identity, "user");
    assert!(!service.session().unwrap().is_admin());
    assert!(!service.reprioritize(100, 1).await);
}

#[tokio::test]
async fn test_credentials_are_exact() {
    let os = FakeOs::with_processes(&[]);
    let service = service_with(&os, &quiet_config());

    assert!(service.login("Admin", "123").is_err());
    assert!(service.login("admin ", "123").is_err());
    assert!(service.login("", "").is_err());
    let err = service.login("root", "123").unwrap_err();
    assert_eq!(err.to_string(), "Invalid username or password");
    assert!(service.session().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_polling_follows_interval_and_stops_on_logout() {
    let os = FakeOs::with_processes(&[(100, "worker")]);
    let service = service_with(&os, &Config::default());

    service.login("user", "123").unwrap();
    settle().await;
    assert_eq!(os.list_calls(), 1);
    assert_eq!(service.snapshot().len(), 1);

    tokio::time::advance(Duration::from_secs(5)).await;
    settle().await;
    assert_eq!(os.list_calls(), 2);

    service.logout();
    assert!(service.snapshot().is_empty());

    tokio::time::advance(Duration::from_secs(20)).await;
    settle().await;
    assert_eq!(os.list_calls(), 2);
    assert!(service.snapshot().is_empty());
    assert!(!service.is_polling());
}
