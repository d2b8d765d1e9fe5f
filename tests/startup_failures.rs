// tests/startup_failures.rs
//
// Everything that can go wrong before the server starts accepting requests.

use std::error::Error;

use nginx_config_viewer::cli::CliArgs;
use nginx_config_viewer::errors::ViewerError;
use nginx_config_viewer::server::bind;
use nginx_config_viewer::watch::TrackedPath;
use nginx_config_viewer_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn address_in_use_is_a_bind_error() -> TestResult {
    init_tracing();
    let first = bind("127.0.0.1:0").await?;
    let taken = first.local_addr()?.to_string();

    let err = bind(&taken).await.unwrap_err();
    match err {
        ViewerError::BindError { addr, .. } => assert_eq!(addr, taken),
        other => panic!("expected BindError, got {other:?}"),
    }
    Ok(())
}

#[test]
fn empty_path_cannot_be_resolved() {
    let err = TrackedPath::resolve("").unwrap_err();
    assert!(matches!(err, ViewerError::PathResolution { .. }), "{err:?}");
}

#[test]
fn relative_path_is_made_absolute() -> TestResult {
    let tracked = TrackedPath::resolve("conf/nginx.conf")?;
    assert!(tracked.path().is_absolute());
    assert!(tracked.path().ends_with("conf/nginx.conf"));
    assert!(tracked.dir().ends_with("conf"));
    Ok(())
}

#[tokio::test]
async fn dry_run_exits_without_serving() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let args = CliArgs {
        path: Some(dir.path().join("nginx.conf").display().to_string()),
        // Would fail to bind if we got that far.
        addr: Some("256.0.0.1:1".to_string()),
        dry_run: true,
        ..CliArgs::default()
    };

    nginx_config_viewer::run(args).await?;
    Ok(())
}

#[tokio::test]
async fn invalid_config_stops_startup() {
    init_tracing();
    let args = CliArgs {
        addr: Some("   ".to_string()),
        ..CliArgs::default()
    };

    let err = nginx_config_viewer::run(args).await.unwrap_err();
    assert!(format!("{err}").contains("[server].addr"));
}

#[tokio::test]
async fn missing_watch_directory_stops_startup() {
    init_tracing();
    let dir = tempfile::tempdir().expect("temp dir");
    let args = CliArgs {
        path: Some(dir.path().join("nope").join("nginx.conf").display().to_string()),
        addr: Some("127.0.0.1:0".to_string()),
        ..CliArgs::default()
    };

    let err = nginx_config_viewer::run(args).await.unwrap_err();
    assert!(
        matches!(err.downcast_ref::<ViewerError>(), Some(ViewerError::WatchError(_))),
        "{err:?}"
    );
}
