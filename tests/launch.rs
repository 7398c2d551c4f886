//! End-to-end supervision through the live adapters.
//!
//! Uses `sh` as the interpreter so the "training scripts" are shell
//! scripts that print on both streams and exit with chosen codes.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gcm_correct::config::Settings;
use gcm_correct::context::ServiceContext;
use gcm_correct::launch::{launch, LaunchJob, Overrides};
use gcm_correct::ports::{LineSink, Stream};
use gcm_correct::CorrectionError;

#[derive(Default)]
struct Recorder(Mutex<Vec<(Stream, String)>>);

impl LineSink for Recorder {
    fn line(&self, stream: Stream, line: &str) {
        self.0.lock().unwrap().push((stream, line.to_string()));
    }
}

impl Recorder {
    fn lines(&self, stream: Stream) -> Vec<String> {
        self.0.lock().unwrap().iter().filter(|(s, _)| *s == stream).map(|(_, l)| l.clone()).collect()
    }
}

fn workspace(name: &str, script: &str) -> (PathBuf, Settings) {
    let dir = std::env::temp_dir().join(format!("gcm_correct_launch_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("scripts")).unwrap();
    std::fs::create_dir_all(dir.join("tmp")).unwrap();
    std::fs::write(dir.join("scripts/so_200m_unet_reorganised.py"), script).unwrap();
    let settings = Settings {
        data_dir: dir.join("data"),
        output_dir: dir.join("output"),
        scripts_dir: dir.join("scripts"),
        transient_dir: Some(dir.join("tmp")),
        interpreter: "sh".into(),
    };
    (dir, settings)
}

fn job(overrides: Overrides) -> LaunchJob {
    LaunchJob { variable: "s200mavg".into(), overrides }
}

fn transient(dir: &Path) -> PathBuf {
    dir.join("tmp/temp_s200mavg_unet.py")
}

#[tokio::test]
async fn interleaved_streams_keep_per_stream_order() {
    let (dir, settings) = workspace(
        "interleaved",
        "for i in 1 2 3 4 5; do echo out$i; echo err$i >&2; done\n",
    );
    let sink = Recorder::default();

    let result = launch(&ServiceContext::live(), &settings, &job(Overrides::default()), &sink)
        .await
        .unwrap();

    assert!(result.succeeded);
    assert_eq!(sink.lines(Stream::Stdout), ["out1", "out2", "out3", "out4", "out5"]);
    assert_eq!(sink.lines(Stream::Stderr), ["err1", "err2", "err3", "err4", "err5"]);
    assert!(result.elapsed_seconds >= 0.0);
    assert!(result.finished_at >= result.started_at);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn patched_child_sees_overrides_and_transient_is_removed() {
    let (dir, settings) =
        workspace("patched", "echo \"fit epochs=2000 batch_size=64\"\nexit 0\n");
    let sink = Recorder::default();
    let overrides = Overrides {
        epochs: NonZeroU32::new(3),
        batch_size: NonZeroU32::new(2),
        reuse_existing_model: false,
    };

    let result = launch(&ServiceContext::live(), &settings, &job(overrides), &sink).await.unwrap();

    assert!(result.succeeded);
    assert_eq!(result.script, transient(&dir));
    assert_eq!(sink.lines(Stream::Stdout), ["fit epochs=3 batch_size=2"]);
    assert!(!transient(&dir).exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn failing_child_reports_its_exit_code() {
    let (dir, settings) = workspace("failing", "echo oops >&2\nexit 5\n");
    let sink = Recorder::default();
    let overrides = Overrides { epochs: NonZeroU32::new(1), ..Overrides::default() };

    let result = launch(&ServiceContext::live(), &settings, &job(overrides), &sink).await.unwrap();

    assert!(!result.succeeded);
    assert_eq!(result.exit_code, 5);
    assert!(!transient(&dir).exists());
    let err = result.into_result().unwrap_err();
    assert!(matches!(err, CorrectionError::ChildProcessFailure { exit_code: 5, .. }));
    assert_eq!(err.to_string(), "S200MAVG correction failed with return code 5");
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn missing_interpreter_cleans_up_and_errors() {
    let (dir, mut settings) = workspace("no_interpreter", "exit 0\n");
    settings.interpreter = "gcm-correct-missing-python".into();
    let overrides = Overrides { batch_size: NonZeroU32::new(16), ..Overrides::default() };

    let err = launch(&ServiceContext::live(), &settings, &job(overrides), &Recorder::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CorrectionError::Spawn { .. }));
    assert!(!transient(&dir).exists());
    let _ = std::fs::remove_dir_all(&dir);
}
