use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

use crate::capture::domain::frame_source::FrameSource;
use crate::pipeline::image_processor::ImageProcessor;
use crate::shared::error::ProcessError;
use crate::shared::frame::Frame;
use crate::transport::domain::result_sink::ResultSink;

const DEFAULT_CHANNEL_CAPACITY: usize = 4;

type SendError = Box<dyn std::error::Error + Send + Sync>;

/// Options for one client session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Minimum time between delivered frames; `None` runs unthrottled.
    pub frame_interval: Option<Duration>,
    pub channel_capacity: usize,
    pub cancelled: Arc<AtomicBool>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_interval: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl SessionConfig {
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.frame_interval = (fps > 0.0).then(|| Duration::from_secs_f64(1.0 / fps));
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Frames turned into results and delivered.
    pub processed: usize,
    /// Frames that were unavailable or empty.
    pub skipped: usize,
    /// Frames the processor rejected for other reasons.
    pub failed: usize,
}

/// Hosting loop: `reader thread → channel → process → sink`.
///
/// The reader decodes ahead on its own thread while this thread
/// processes. One bad frame never ends the session; a failing sink does.
pub struct SessionRunner {
    config: SessionConfig,
}

impl SessionRunner {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Runs until the source is exhausted, the sink fails or the session
    /// is cancelled. `source` must already be open; the reader thread
    /// closes it once it stops reading.
    pub fn run(
        &self,
        source: Box<dyn FrameSource>,
        processor: &mut ImageProcessor,
        sink: &mut dyn ResultSink,
        total_frames: Option<usize>,
    ) -> Result<SessionStats, Box<dyn std::error::Error>> {
        let capacity = self.config.channel_capacity.max(1);
        let (frame_tx, frame_rx) = crossbeam_channel::bounded::<Result<Frame, SendError>>(capacity);
        let reader_handle = spawn_reader(source, frame_tx, self.config.cancelled.clone());

        log::info!("Session started");
        let stats = self.run_loop(frame_rx, processor, sink, total_frames.unwrap_or(0));

        if reader_handle.join().is_err() {
            return Err("Reader thread panicked".into());
        }

        log::info!(
            "Session ended: {} processed, {} skipped, {} failed",
            stats.processed,
            stats.skipped,
            stats.failed
        );
        Ok(stats)
    }

    fn run_loop(
        &self,
        frame_rx: Receiver<Result<Frame, SendError>>,
        processor: &mut ImageProcessor,
        sink: &mut dyn ResultSink,
        total: usize,
    ) -> SessionStats {
        let mut stats = SessionStats::default();
        let mut seen = 0;

        for frame_result in frame_rx {
            if self.config.cancelled.load(Ordering::Relaxed) {
                log::info!("Session cancelled");
                break;
            }
            let started = Instant::now();
            seen += 1;

            let frame = match frame_result {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Frame unavailable: {e}");
                    stats.skipped += 1;
                    continue;
                }
            };

            match processor.process(&frame) {
                Ok(result) => {
                    if let Err(e) = sink.send(&result) {
                        log::info!("Client disconnected: {e}");
                        break;
                    }
                    stats.processed += 1;
                }
                Err(ProcessError::EmptyFrame { .. }) => {
                    log::debug!("Skipping empty frame {}", frame.index());
                    stats.skipped += 1;
                }
                Err(e) => {
                    log::error!("Failed to process frame {}: {e}", frame.index());
                    stats.failed += 1;
                }
            }
            processor.logger_mut().progress(seen, total);

            if let Some(interval) = self.config.frame_interval {
                if let Some(rest) = interval.checked_sub(started.elapsed()) {
                    std::thread::sleep(rest);
                }
            }
        }
        stats
    }
}

impl Default for SessionRunner {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

fn spawn_reader(
    mut source: Box<dyn FrameSource>,
    frame_tx: Sender<Result<Frame, SendError>>,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for frame_result in source.frames() {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let mapped = frame_result.map_err(|e| -> SendError { e.to_string().into() });
            if frame_tx.send(mapped).is_err() {
                break;
            }
        }
        source.close();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::domain::gesture::Theme;
    use crate::rendering::domain::render_result::RenderResult;
    use crate::shared::source_metadata::SourceMetadata;
    use crate::test_support;
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    enum Item {
        Frame(Frame),
        Unavailable,
    }

    struct StubSource {
        items: Vec<Item>,
        closed: Arc<AtomicUsize>,
    }

    impl StubSource {
        fn new(items: Vec<Item>) -> (Self, Arc<AtomicUsize>) {
            let closed = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    items,
                    closed: closed.clone(),
                },
                closed,
            )
        }
    }

    impl FrameSource for StubSource {
        fn open(&mut self, _path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
            Ok(SourceMetadata {
                width: 320,
                height: 240,
                total_frames: Some(self.items.len()),
                source_path: None,
            })
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
            Box::new(self.items.drain(..).map(
                |item| -> Result<Frame, Box<dyn std::error::Error>> {
                    match item {
                        Item::Frame(frame) => Ok(frame),
                        Item::Unavailable => Err("camera busy".into()),
                    }
                },
            ))
        }

        fn close(&mut self) {
            self.closed.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[derive(Default)]
    struct CollectingSink {
        results: Vec<RenderResult>,
        fail_after: Option<usize>,
    }

    impl ResultSink for CollectingSink {
        fn send(&mut self, result: &RenderResult) -> Result<(), Box<dyn std::error::Error>> {
            if self.fail_after.is_some_and(|n| self.results.len() >= n) {
                return Err("connection reset".into());
            }
            self.results.push(result.clone());
            Ok(())
        }
    }

    fn blank() -> Item {
        Item::Frame(test_support::frame(test_support::blank_image()))
    }

    fn fist() -> Item {
        Item::Frame(test_support::frame(test_support::fist_image()))
    }

    #[test]
    fn test_processes_every_frame_in_order() {
        // One blank frame casts three NoHand votes; the fourth fist outvotes them.
        let items = vec![blank(), fist(), fist(), fist(), fist()];
        let (source, closed) = StubSource::new(items);
        let mut processor = ImageProcessor::default();
        let mut sink = CollectingSink::default();

        let stats = SessionRunner::default()
            .run(Box::new(source), &mut processor, &mut sink, Some(5))
            .unwrap();

        assert_eq!(
            stats,
            SessionStats {
                processed: 5,
                skipped: 0,
                failed: 0
            }
        );
        let themes: Vec<Theme> = sink.results.iter().map(|r| r.theme).collect();
        assert_eq!(
            themes,
            vec![
                Theme::NeonRed,
                Theme::NeonRed,
                Theme::NeonRed,
                Theme::NeonRed,
                Theme::NeonBlue
            ]
        );
        assert_eq!(closed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_unavailable_and_empty_frames_are_skipped() {
        let items = vec![
            blank(),
            Item::Unavailable,
            Item::Frame(Frame::new(Vec::new(), 0, 0, 3, 2)),
            blank(),
        ];
        let (source, _) = StubSource::new(items);
        let mut processor = ImageProcessor::default();
        let mut sink = CollectingSink::default();

        let stats = SessionRunner::default()
            .run(Box::new(source), &mut processor, &mut sink, None)
            .unwrap();

        assert_eq!(stats.processed, 2);
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.failed, 0);
    }

    #[test]
    fn test_invalid_frame_is_counted_and_session_continues() {
        let items = vec![Item::Frame(Frame::new(vec![0; 16], 2, 2, 4, 0)), blank()];
        let (source, _) = StubSource::new(items);
        let mut processor = ImageProcessor::default();
        let mut sink = CollectingSink::default();

        let stats = SessionRunner::default()
            .run(Box::new(source), &mut processor, &mut sink, None)
            .unwrap();

        assert_eq!(stats.failed, 1);
        assert_eq!(stats.processed, 1);
    }

    #[test]
    fn test_sink_failure_ends_session_and_closes_source() {
        let (source, closed) = StubSource::new((0..10).map(|_| blank()).collect());
        let mut processor = ImageProcessor::default();
        let mut sink = CollectingSink {
            fail_after: Some(2),
            ..CollectingSink::default()
        };

        let stats = SessionRunner::default()
            .run(Box::new(source), &mut processor, &mut sink, Some(10))
            .unwrap();

        assert_eq!(stats.processed, 2);
        assert_eq!(sink.results.len(), 2);
        assert_eq!(closed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_cancelled_session_delivers_nothing() {
        let (source, closed) = StubSource::new(vec![blank(), blank()]);
        let config = SessionConfig::default();
        config.cancelled.store(true, Ordering::Relaxed);
        let mut processor = ImageProcessor::default();
        let mut sink = CollectingSink::default();

        let stats = SessionRunner::new(config)
            .run(Box::new(source), &mut processor, &mut sink, None)
            .unwrap();

        assert_eq!(stats.processed, 0);
        assert!(sink.results.is_empty());
        assert_eq!(closed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_frame_interval_paces_delivery() {
        let (source, _) = StubSource::new(vec![blank(), blank(), blank()]);
        let config = SessionConfig::default().with_fps(50.0);
        assert_eq!(config.frame_interval, Some(Duration::from_millis(20)));
        let mut processor = ImageProcessor::default();
        let mut sink = CollectingSink::default();

        let started = Instant::now();
        SessionRunner::new(config)
            .run(Box::new(source), &mut processor, &mut sink, None)
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn test_non_positive_fps_disables_pacing() {
        assert_eq!(SessionConfig::default().with_fps(0.0).frame_interval, None);
    }

    #[test]
    fn test_progress_reaches_logger() {
        struct CountingLogger(Arc<Mutex<Vec<(usize, usize)>>>);
        impl crate::pipeline::pipeline_logger::PipelineLogger for CountingLogger {
            fn progress(&mut self, current: usize, total: usize) {
                self.0.lock().unwrap().push((current, total));
            }
            fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
            fn metric(&mut self, _name: &str, _value: f64) {}
            fn info(&mut self, _message: &str) {}
        }

        let calls = Arc::new(Mutex::new(Vec::new()));
        let (source, _) = StubSource::new(vec![blank(), Item::Unavailable, blank()]);
        let mut processor =
            ImageProcessor::default().with_logger(Box::new(CountingLogger(calls.clone())));
        let mut sink = CollectingSink::default();

        SessionRunner::default()
            .run(Box::new(source), &mut processor, &mut sink, Some(3))
            .unwrap();

        assert_eq!(*calls.lock().unwrap(), vec![(1, 3), (3, 3)]);
    }
}
