use super::*;
use crate::test_support::{Calls, FakeHandle, Failures};

fn handle(calls: &Calls, close_fails: bool) -> Box<FakeHandle> {
    Box::new(FakeHandle {
        calls: calls.clone(),
        failures: Failures {
            close: close_fails,
            ..Failures::default()
        },
        options: None,
    })
}

#[tokio::test]
async fn test_success_closes_once() {
    let calls = Calls::default();
    let value = complete(handle(&calls, false), Ok(7)).await.unwrap();
    assert_eq!(value, 7);
    assert_eq!(calls.all(), vec!["close"]);
}

#[tokio::test]
async fn test_run_error_closes_once_and_surfaces() {
    let calls = Calls::default();
    let err = complete::<_, ()>(handle(&calls, false), Err(anyhow::anyhow!("run failed")))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "run failed");
    assert_eq!(calls.count("close"), 1);
}

#[tokio::test]
async fn test_close_error_does_not_mask_run_error() {
    let calls = Calls::default();
    let err = complete::<_, ()>(handle(&calls, true), Err(anyhow::anyhow!("run failed")))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "run failed");
    assert_eq!(calls.count("close"), 1);
}

#[tokio::test]
async fn test_close_error_alone_is_surfaced() {
    let calls = Calls::default();
    let err = complete(handle(&calls, true), Ok(())).await.unwrap_err();
    assert!(err.to_string().contains("Failed to close fake connection"));
    assert!(format!("{:#}", err).contains("close failed"));
    assert_eq!(calls.count("close"), 1);
}

#[tokio::test]
async fn test_trait_object_handle() {
    let calls = Calls::default();
    let boxed: Box<dyn sl_db::Executor> = handle(&calls, false);
    complete(boxed, Ok(())).await.unwrap();
    assert_eq!(calls.all(), vec!["close"]);
}
