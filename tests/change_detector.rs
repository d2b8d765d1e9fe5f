// tests/change_detector.rs
//
// Debounce and relevance behaviour of the change detector, driven with a
// paused tokio clock and hand-made notify events.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use notify::EventKind;
use notify::event::{CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind, RenameMode};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant};

use nginx_config_viewer::hub::{Hub, Subscription, RELOAD};
use nginx_config_viewer::watch::{ChangeDetector, TrackedPath, WatchMessage};
use nginx_config_viewer_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

const QUIET: Duration = Duration::from_millis(200);

struct Harness {
    tx: mpsc::UnboundedSender<WatchMessage>,
    sub: Subscription,
    _detector: JoinHandle<()>,
}

impl Harness {
    fn start(tracked: &str) -> Result<Self, Box<dyn Error>> {
        let hub = Arc::new(Hub::new());
        let sub = hub.register();
        let (tx, rx) = mpsc::unbounded_channel();
        let detector = ChangeDetector::new(TrackedPath::resolve(tracked)?, QUIET, hub);
        let handle = tokio::spawn(detector.run(rx));
        Ok(Self {
            tx,
            sub,
            _detector: handle,
        })
    }

    fn send(&self, kind: EventKind, path: &str) {
        let event = notify::Event::new(kind).add_path(PathBuf::from(path));
        self.tx
            .send(WatchMessage::Event(event))
            .expect("detector alive");
    }

    async fn assert_silent_for(&mut self, dur: Duration) {
        let res = time::timeout(dur, self.sub.recv()).await;
        assert!(res.is_err(), "unexpected signal: {:?}", res);
    }
}

fn write() -> EventKind {
    EventKind::Modify(ModifyKind::Data(DataChange::Content))
}

#[tokio::test(start_paused = true)]
async fn burst_of_writes_yields_one_signal_after_last_write() -> TestResult {
    init_tracing();
    let mut h = Harness::start("/tmp/x.conf")?;

    h.send(write(), "/tmp/x.conf");
    time::sleep(Duration::from_millis(20)).await;
    h.send(write(), "/tmp/x.conf");
    time::sleep(Duration::from_millis(25)).await;
    h.send(write(), "/tmp/x.conf");
    let last = Instant::now();

    let signal = h.sub.recv().await.expect("hub alive");
    let waited = last.elapsed();

    assert_eq!(&*signal, RELOAD);
    assert!(waited >= Duration::from_millis(200), "fired early: {waited:?}");
    assert!(waited < Duration::from_millis(250), "fired late: {waited:?}");

    h.assert_silent_for(Duration::from_secs(5)).await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn long_burst_keeps_postponing() -> TestResult {
    init_tracing();
    let mut h = Harness::start("/tmp/x.conf")?;
    let start = Instant::now();

    // 10 events, each 150ms apart: the window never elapses in between.
    for _ in 0..10 {
        h.send(write(), "/tmp/x.conf");
        time::sleep(Duration::from_millis(150)).await;
    }

    h.sub.recv().await.expect("hub alive");
    // Last event at 1350ms, fired 200ms later.
    assert_eq!(start.elapsed(), Duration::from_millis(1550));
    h.assert_silent_for(Duration::from_secs(1)).await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn separate_bursts_yield_separate_signals() -> TestResult {
    init_tracing();
    let mut h = Harness::start("/tmp/x.conf")?;

    h.send(write(), "/tmp/x.conf");
    assert_eq!(&*h.sub.recv().await.expect("hub alive"), RELOAD);

    time::sleep(Duration::from_secs(1)).await;
    h.send(EventKind::Remove(RemoveKind::File), "/tmp/x.conf");
    h.send(EventKind::Create(CreateKind::File), "/tmp/x.conf");
    assert_eq!(&*h.sub.recv().await.expect("hub alive"), RELOAD);

    h.assert_silent_for(Duration::from_secs(1)).await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn unrelated_paths_are_ignored() -> TestResult {
    init_tracing();
    let mut h = Harness::start("/tmp/x.conf")?;

    h.send(write(), "/tmp/y.conf");
    h.send(EventKind::Create(CreateKind::File), "/tmp/x.conf.swp");
    h.send(EventKind::Modify(ModifyKind::Name(RenameMode::From)), "/tmp/.x.conf.tmp");
    h.send(write(), "/tmp");

    h.assert_silent_for(Duration::from_secs(2)).await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn same_base_name_in_other_directory_counts() -> TestResult {
    init_tracing();
    let mut h = Harness::start("/tmp/x.conf")?;

    h.send(
        EventKind::Modify(ModifyKind::Name(RenameMode::To)),
        "/var/other/x.conf",
    );
    assert_eq!(&*h.sub.recv().await.expect("hub alive"), RELOAD);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn attribute_change_on_tracked_file_counts() -> TestResult {
    init_tracing();
    let mut h = Harness::start("/tmp/x.conf")?;

    h.send(
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
        "/tmp/x.conf",
    );
    assert_eq!(&*h.sub.recv().await.expect("hub alive"), RELOAD);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn irrelevant_event_does_not_extend_window() -> TestResult {
    init_tracing();
    let mut h = Harness::start("/tmp/x.conf")?;

    h.send(write(), "/tmp/x.conf");
    let relevant = Instant::now();
    time::sleep(Duration::from_millis(150)).await;
    h.send(write(), "/tmp/other.conf");

    h.sub.recv().await.expect("hub alive");
    assert_eq!(relevant.elapsed(), QUIET);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn watch_errors_are_not_fatal() -> TestResult {
    init_tracing();
    let mut h = Harness::start("/tmp/x.conf")?;

    h.tx.send(WatchMessage::Error(notify::Error::generic("queue overflow")))?;
    h.tx.send(WatchMessage::Error(notify::Error::generic("watch lost")))?;
    h.send(write(), "/tmp/x.conf");

    assert_eq!(&*h.sub.recv().await.expect("hub alive"), RELOAD);
    Ok(())
}
