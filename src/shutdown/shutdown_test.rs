use std::time::Duration;

use serial_test::serial;

use super::*;

#[test]
fn test_starts_running() {
    let coordinator = ShutdownCoordinator::new(false);
    assert!(!coordinator.is_shutting_down());
}

#[test]
fn test_same_signal_twice_transitions_once() {
    let coordinator = ShutdownCoordinator::new(false);

    assert!(coordinator.request_shutdown(ShutdownSignal::Interrupt));
    assert!(coordinator.is_shutting_down());
    assert!(!coordinator.request_shutdown(ShutdownSignal::Interrupt));
    assert!(coordinator.is_shutting_down());
}

#[test]
fn test_different_signals_transition_once() {
    let coordinator = ShutdownCoordinator::new(true);

    assert!(coordinator.request_shutdown(ShutdownSignal::Terminate));
    for sig in ShutdownSignal::ALL {
        assert!(!coordinator.request_shutdown(sig));
    }
    assert!(coordinator.is_shutting_down());
}

#[test]
fn test_clones_share_the_flag() {
    let coordinator = ShutdownCoordinator::new(false);
    let other = coordinator.clone();

    assert!(other.request_shutdown(ShutdownSignal::HangUp));
    assert!(coordinator.is_shutting_down());
    assert!(!coordinator.request_shutdown(ShutdownSignal::Quit));
}

#[test]
fn test_signal_names() {
    let names: Vec<&str> = ShutdownSignal::ALL.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["SIGINT", "SIGTERM", "SIGQUIT", "SIGHUP", "SIGPIPE"]);
}

#[tokio::test]
async fn test_wait_returns_immediately_after_shutdown() {
    let coordinator = ShutdownCoordinator::new(false);
    coordinator.request_shutdown(ShutdownSignal::BrokenPipe);

    tokio::time::timeout(Duration::from_millis(100), coordinator.wait())
        .await
        .expect("wait should resolve");
}

#[tokio::test]
async fn test_wait_wakes_on_request_from_another_task() {
    let coordinator = ShutdownCoordinator::new(false);
    let requester = coordinator.clone();

    let waiter = tokio::spawn(async move { coordinator.wait().await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!waiter.is_finished());

    requester.request_shutdown(ShutdownSignal::Interrupt);
    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("waiter should wake")
        .unwrap();
}

#[tokio::test]
async fn test_wait_blocks_while_running() {
    let coordinator = ShutdownCoordinator::new(false);
    assert!(tokio::time::timeout(Duration::from_millis(50), coordinator.wait())
        .await
        .is_err());
}

#[tokio::test]
#[serial]
async fn test_delivered_signal_requests_shutdown() {
    let coordinator = ShutdownCoordinator::new(false);
    let handlers = coordinator.install_signal_handlers().unwrap();

    let status = tokio::process::Command::new("kill")
        .arg("-HUP")
        .arg(std::process::id().to_string())
        .status()
        .await
        .unwrap();
    assert!(status.success());

    tokio::time::timeout(Duration::from_secs(5), coordinator.wait())
        .await
        .expect("SIGHUP should request shutdown");
    assert!(coordinator.is_shutting_down());

    // A second delivery is absorbed and does not kill the test process
    let status = tokio::process::Command::new("kill")
        .arg("-HUP")
        .arg(std::process::id().to_string())
        .status()
        .await
        .unwrap();
    assert!(status.success());
    tokio::time::sleep(Duration::from_millis(50)).await;

    handlers.abort();
}

#[async_trait::async_trait]
impl SignalReceiver for tokio::sync::mpsc::UnboundedReceiver<()> {
    async fn recv(&mut self) -> Option<()> {
        tokio::sync::mpsc::UnboundedReceiver::recv(self).await
    }
}

#[tokio::test]
async fn test_next_signal_keeps_watching_after_a_stream_closes() {
    let (int_tx, int_rx) = tokio::sync::mpsc::unbounded_channel();
    let (term_tx, term_rx) = tokio::sync::mpsc::unbounded_channel();
    let mut streams = vec![
        (ShutdownSignal::Interrupt, int_rx),
        (ShutdownSignal::Terminate, term_rx),
    ];

    drop(int_tx);
    term_tx.send(()).unwrap();

    let received = tokio::time::timeout(Duration::from_secs(1), next_signal(&mut streams))
        .await
        .expect("open stream should still deliver");
    assert_eq!(received, Some(ShutdownSignal::Terminate));
    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].0, ShutdownSignal::Terminate);
}

#[tokio::test]
async fn test_next_signal_ends_when_all_streams_close() {
    let (int_tx, int_rx) = tokio::sync::mpsc::unbounded_channel::<()>();
    let (quit_tx, quit_rx) = tokio::sync::mpsc::unbounded_channel::<()>();
    let mut streams = vec![(ShutdownSignal::Interrupt, int_rx), (ShutdownSignal::Quit, quit_rx)];

    drop(int_tx);
    drop(quit_tx);

    assert_eq!(next_signal(&mut streams).await, None);
    assert!(streams.is_empty());
}
