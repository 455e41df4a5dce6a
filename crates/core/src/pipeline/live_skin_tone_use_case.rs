use std::time::Instant;

use serde::Serialize;

use crate::analysis::domain::face_analyzer::{FaceAnalyzer, FaceReading};
use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::capture::domain::frame_display::FrameDisplay;
use crate::capture::domain::frame_source::FrameSource;
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::constants::{ESC_KEY, WAIT_KEY_MS};
use crate::shared::frame::Frame;

/// Why the capture loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TerminationReason {
    /// The source returned an empty frame.
    EmptyFrame,
    /// The exit key was pressed while the frame was on display.
    UserExit,
    /// The configured frame budget was used up.
    FrameLimit,
    /// A stage returned an error; the error is propagated to the caller.
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated(TerminationReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopOutcome {
    pub frames_processed: usize,
    pub reason: TerminationReason,
}

/// Faces found in one processed frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame_index: usize,
    pub faces: Vec<FaceReading>,
}

pub type FrameCallback = Box<dyn FnMut(&FrameReport)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopSettings {
    /// How long each displayed frame waits for a key press.
    pub wait_ms: i32,
    pub exit_key: i32,
    pub max_frames: Option<usize>,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            wait_ms: WAIT_KEY_MS,
            exit_key: ESC_KEY,
            max_frames: None,
        }
    }
}

/// Live pipeline: acquire → gray → detect → analyze → annotate → display.
///
/// Single-threaded and blocking. Every region is consumed within the
/// iteration that detected it; nothing carries over to the next frame.
/// The source is released and the display closed exactly once, whichever
/// way the loop ends, including on error.
pub struct LiveSkinToneUseCase {
    source: Box<dyn FrameSource>,
    detector: Box<dyn FaceDetector>,
    analyzer: FaceAnalyzer,
    annotator: Box<dyn FrameAnnotator>,
    display: Box<dyn FrameDisplay>,
    logger: Box<dyn PipelineLogger>,
    settings: LoopSettings,
    on_frame: Option<FrameCallback>,
    state: LoopState,
}

impl LiveSkinToneUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        analyzer: FaceAnalyzer,
        annotator: Box<dyn FrameAnnotator>,
        display: Box<dyn FrameDisplay>,
        logger: Box<dyn PipelineLogger>,
        settings: LoopSettings,
        on_frame: Option<FrameCallback>,
    ) -> Self {
        Self {
            source,
            detector,
            analyzer,
            annotator,
            display,
            logger,
            settings,
            on_frame,
            state: LoopState::Running,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Runs until a termination condition, then tears down the source and
    /// display. A loop that has already terminated cannot be restarted.
    pub fn execute(&mut self) -> Result<LoopOutcome, Box<dyn std::error::Error>> {
        if let LoopState::Terminated(_) = self.state {
            return Err("capture loop has already terminated".into());
        }

        let result = self.run();

        self.source.release();
        self.display.close();

        match &result {
            Ok(outcome) => {
                self.state = LoopState::Terminated(outcome.reason);
                self.logger.info(&format!(
                    "Stopped after {} frame(s): {:?}",
                    outcome.frames_processed, outcome.reason
                ));
            }
            Err(e) => {
                self.state = LoopState::Terminated(TerminationReason::Failed);
                log::error!("Capture loop aborted: {e}");
            }
        }
        self.logger.summary();
        result
    }

    fn run(&mut self) -> Result<LoopOutcome, Box<dyn std::error::Error>> {
        let mut processed = 0;
        loop {
            if self.settings.max_frames.is_some_and(|max| processed >= max) {
                return Ok(outcome(processed, TerminationReason::FrameLimit));
            }

            let Some(mut frame) = self.source.read()? else {
                self.logger.info("Empty frame captured");
                return Ok(outcome(processed, TerminationReason::EmptyFrame));
            };

            let faces = self.process_frame(&mut frame)?;
            processed += 1;
            self.logger.frame_done(processed);

            if let Some(callback) = self.on_frame.as_mut() {
                callback(&FrameReport {
                    frame_index: frame.index(),
                    faces,
                });
            }

            let t = Instant::now();
            self.display.show(&frame)?;
            let key = self.display.wait_key(self.settings.wait_ms)?;
            self.logger.timing("display", elapsed_ms(t));

            if key == Some(self.settings.exit_key) {
                return Ok(outcome(processed, TerminationReason::UserExit));
            }
        }
    }

    fn process_frame(
        &mut self,
        frame: &mut Frame,
    ) -> Result<Vec<FaceReading>, Box<dyn std::error::Error>> {
        let t = Instant::now();
        let regions = self.detector.detect(&frame.to_gray())?;
        self.logger.timing("detect", elapsed_ms(t));
        self.logger.metric("faces", regions.len() as f64);

        let t = Instant::now();
        let faces: Vec<FaceReading> = regions
            .iter()
            .map(|r| self.analyzer.analyze(&*frame, r))
            .collect();
        self.logger.timing("analyze", elapsed_ms(t));

        let t = Instant::now();
        self.annotator.annotate(frame, &faces)?;
        self.logger.timing("annotate", elapsed_ms(t));

        Ok(faces)
    }
}

fn outcome(frames_processed: usize, reason: TerminationReason) -> LoopOutcome {
    LoopOutcome {
        frames_processed,
        reason,
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::undertone::Undertone;
    use crate::annotation::infrastructure::cpu_annotator::CpuAnnotator;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::shared::frame::GrayFrame;
    use crate::shared::region::Region;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    const SKIN: [u8; 3] = [120, 150, 200];

    // --- Stubs ---

    #[derive(Default)]
    struct SourceLog {
        reads: usize,
        releases: usize,
    }

    /// Plays back a fixed script; `None` entries are empty frames.
    struct ScriptedSource {
        script: VecDeque<Option<Frame>>,
        log: Arc<Mutex<SourceLog>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Option<Frame>>) -> (Self, Arc<Mutex<SourceLog>>) {
            let log = Arc::new(Mutex::new(SourceLog::default()));
            (
                Self {
                    script: script.into(),
                    log: log.clone(),
                },
                log,
            )
        }
    }

    impl FrameSource for ScriptedSource {
        fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
            self.log.lock().unwrap().reads += 1;
            Ok(self.script.pop_front().flatten())
        }

        fn release(&mut self) {
            self.log.lock().unwrap().releases += 1;
        }
    }

    struct FailingSource {
        log: Arc<Mutex<SourceLog>>,
    }

    impl FrameSource for FailingSource {
        fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
            Err("device unplugged".into())
        }

        fn release(&mut self) {
            self.log.lock().unwrap().releases += 1;
        }
    }

    /// Returns one fixed list of regions per call, in order.
    struct StubDetector {
        per_frame: VecDeque<Vec<Region>>,
        seen_sizes: Arc<Mutex<Vec<(u32, u32)>>>,
    }

    impl StubDetector {
        fn new(per_frame: Vec<Vec<Region>>) -> Self {
            Self {
                per_frame: per_frame.into(),
                seen_sizes: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, gray: &GrayFrame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            self.seen_sizes
                .lock()
                .unwrap()
                .push((gray.width(), gray.height()));
            Ok(self.per_frame.pop_front().unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct DisplayLog {
        shown: Vec<usize>,
        closes: usize,
    }

    struct RecordingDisplay {
        keys: VecDeque<Option<i32>>,
        log: Arc<Mutex<DisplayLog>>,
    }

    impl RecordingDisplay {
        fn new(keys: Vec<Option<i32>>) -> (Self, Arc<Mutex<DisplayLog>>) {
            let log = Arc::new(Mutex::new(DisplayLog::default()));
            (
                Self {
                    keys: keys.into(),
                    log: log.clone(),
                },
                log,
            )
        }
    }

    impl FrameDisplay for RecordingDisplay {
        fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.log.lock().unwrap().shown.push(frame.index());
            Ok(())
        }

        fn wait_key(&mut self, delay_ms: i32) -> Result<Option<i32>, Box<dyn std::error::Error>> {
            assert_eq!(delay_ms, WAIT_KEY_MS);
            Ok(self.keys.pop_front().flatten())
        }

        fn close(&mut self) {
            self.log.lock().unwrap().closes += 1;
        }
    }

    /// Records the faces passed to each annotate call.
    struct RecordingAnnotator {
        calls: Arc<Mutex<Vec<Vec<Region>>>>,
    }

    impl FrameAnnotator for RecordingAnnotator {
        fn annotate(
            &self,
            _frame: &mut Frame,
            faces: &[FaceReading],
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.calls
                .lock()
                .unwrap()
                .push(faces.iter().map(|f| f.region).collect());
            Ok(())
        }
    }

    // --- Helpers ---

    fn frame(index: usize) -> Frame {
        Frame::filled(160, 120, SKIN, index)
    }

    fn use_case(
        source: Box<dyn FrameSource>,
        detector: StubDetector,
        annotator: Box<dyn FrameAnnotator>,
        display: Box<dyn FrameDisplay>,
        settings: LoopSettings,
        on_frame: Option<FrameCallback>,
    ) -> LiveSkinToneUseCase {
        LiveSkinToneUseCase::new(
            source,
            Box::new(detector),
            FaceAnalyzer::default(),
            annotator,
            display,
            Box::new(NullPipelineLogger),
            settings,
            on_frame,
        )
    }

    // --- Tests ---

    #[test]
    fn test_empty_third_frame_stops_after_two() {
        let (source, source_log) = ScriptedSource::new(vec![Some(frame(0)), Some(frame(1)), None]);
        let (display, display_log) = RecordingDisplay::new(vec![]);

        let mut uc = use_case(
            Box::new(source),
            StubDetector::new(vec![]),
            Box::new(CpuAnnotator::default()),
            Box::new(display),
            LoopSettings::default(),
            None,
        );
        let outcome = uc.execute().unwrap();

        assert_eq!(outcome.frames_processed, 2);
        assert_eq!(outcome.reason, TerminationReason::EmptyFrame);
        assert_eq!(
            uc.state(),
            LoopState::Terminated(TerminationReason::EmptyFrame)
        );
        let source_log = source_log.lock().unwrap();
        assert_eq!(source_log.reads, 3);
        assert_eq!(source_log.releases, 1);
        let display_log = display_log.lock().unwrap();
        assert_eq!(display_log.shown, vec![0, 1]);
        assert_eq!(display_log.closes, 1);
    }

    #[test]
    fn test_exit_key_stops_loop() {
        let (source, source_log) =
            ScriptedSource::new(vec![Some(frame(0)), Some(frame(1)), Some(frame(2))]);
        let (display, display_log) = RecordingDisplay::new(vec![Some(65), Some(ESC_KEY)]);

        let mut uc = use_case(
            Box::new(source),
            StubDetector::new(vec![]),
            Box::new(CpuAnnotator::default()),
            Box::new(display),
            LoopSettings::default(),
            None,
        );
        let outcome = uc.execute().unwrap();

        assert_eq!(outcome.frames_processed, 2);
        assert_eq!(outcome.reason, TerminationReason::UserExit);
        assert_eq!(source_log.lock().unwrap().reads, 2);
        assert_eq!(source_log.lock().unwrap().releases, 1);
        assert_eq!(display_log.lock().unwrap().closes, 1);
    }

    #[test]
    fn test_frame_limit_stops_before_reading_more() {
        let (source, source_log) =
            ScriptedSource::new(vec![Some(frame(0)), Some(frame(1)), Some(frame(2))]);
        let (display, _) = RecordingDisplay::new(vec![]);
        let settings = LoopSettings {
            max_frames: Some(1),
            ..Default::default()
        };

        let mut uc = use_case(
            Box::new(source),
            StubDetector::new(vec![]),
            Box::new(CpuAnnotator::default()),
            Box::new(display),
            settings,
            None,
        );
        let outcome = uc.execute().unwrap();

        assert_eq!(outcome.frames_processed, 1);
        assert_eq!(outcome.reason, TerminationReason::FrameLimit);
        assert_eq!(source_log.lock().unwrap().reads, 1);
    }

    #[test]
    fn test_regions_apply_only_to_their_own_frame() {
        let (source, _) = ScriptedSource::new(vec![Some(frame(0)), Some(frame(1)), None]);
        let (display, _) = RecordingDisplay::new(vec![]);
        let calls = Arc::new(Mutex::new(Vec::new()));
        let annotator = RecordingAnnotator {
            calls: calls.clone(),
        };
        let face = Region::new(20, 40, 50, 50);

        let mut uc = use_case(
            Box::new(source),
            StubDetector::new(vec![vec![face], vec![]]),
            Box::new(annotator),
            Box::new(display),
            LoopSettings::default(),
            None,
        );
        uc.execute().unwrap();

        assert_eq!(*calls.lock().unwrap(), vec![vec![face], vec![]]);
    }

    #[test]
    fn test_detector_receives_full_frame_grayscale() {
        let (source, _) = ScriptedSource::new(vec![Some(frame(0)), None]);
        let (display, _) = RecordingDisplay::new(vec![]);
        let detector = StubDetector::new(vec![]);
        let sizes = detector.seen_sizes.clone();

        let mut uc = use_case(
            Box::new(source),
            detector,
            Box::new(CpuAnnotator::default()),
            Box::new(display),
            LoopSettings::default(),
            None,
        );
        uc.execute().unwrap();

        assert_eq!(*sizes.lock().unwrap(), vec![(160, 120)]);
    }

    #[test]
    fn test_reports_delivered_per_frame() {
        let (source, _) = ScriptedSource::new(vec![Some(frame(0)), Some(frame(1)), None]);
        let (display, _) = RecordingDisplay::new(vec![]);
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = reports.clone();
        let face = Region::new(10, 10, 100, 100);

        let mut uc = use_case(
            Box::new(source),
            StubDetector::new(vec![vec![face], vec![face, face]]),
            Box::new(CpuAnnotator::default()),
            Box::new(display),
            LoopSettings::default(),
            Some(Box::new(move |r: &FrameReport| {
                sink.lock().unwrap().push(r.clone())
            })),
        );
        uc.execute().unwrap();

        let reports = reports.lock().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].frame_index, 0);
        assert_eq!(reports[0].faces.len(), 1);
        assert_eq!(reports[0].faces[0].undertone, Undertone::Warm);
        assert_eq!(reports[1].faces.len(), 2);
    }

    #[test]
    fn test_displayed_frame_is_annotated() {
        struct CapturingDisplay {
            last: Arc<Mutex<Option<Frame>>>,
        }
        impl FrameDisplay for CapturingDisplay {
            fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
                *self.last.lock().unwrap() = Some(frame.clone());
                Ok(())
            }
            fn wait_key(&mut self, _: i32) -> Result<Option<i32>, Box<dyn std::error::Error>> {
                Ok(None)
            }
            fn close(&mut self) {}
        }

        let (source, _) = ScriptedSource::new(vec![Some(frame(0)), None]);
        let last = Arc::new(Mutex::new(None));
        let mut uc = use_case(
            Box::new(source),
            StubDetector::new(vec![vec![Region::new(40, 40, 60, 60)]]),
            Box::new(CpuAnnotator::default()),
            Box::new(CapturingDisplay { last: last.clone() }),
            LoopSettings::default(),
            None,
        );
        uc.execute().unwrap();

        let shown = last.lock().unwrap().clone().unwrap();
        assert_ne!(shown, frame(0));
        let o = (40 * 160 + 40) * 3;
        assert_eq!(&shown.data()[o..o + 3], &[0, 255, 0]);
    }

    #[test]
    fn test_source_error_still_releases_and_closes() {
        let log = Arc::new(Mutex::new(SourceLog::default()));
        let (display, display_log) = RecordingDisplay::new(vec![]);

        let mut uc = use_case(
            Box::new(FailingSource { log: log.clone() }),
            StubDetector::new(vec![]),
            Box::new(CpuAnnotator::default()),
            Box::new(display),
            LoopSettings::default(),
            None,
        );
        let err = uc.execute().unwrap_err();

        assert!(err.to_string().contains("device unplugged"));
        assert_eq!(log.lock().unwrap().releases, 1);
        assert_eq!(display_log.lock().unwrap().closes, 1);
        assert_eq!(uc.state(), LoopState::Terminated(TerminationReason::Failed));
    }

    #[test]
    fn test_terminated_loop_cannot_restart() {
        let (source, source_log) = ScriptedSource::new(vec![None]);
        let (display, _) = RecordingDisplay::new(vec![]);

        let mut uc = use_case(
            Box::new(source),
            StubDetector::new(vec![]),
            Box::new(CpuAnnotator::default()),
            Box::new(display),
            LoopSettings::default(),
            None,
        );
        assert_eq!(uc.execute().unwrap().frames_processed, 0);
        assert!(uc.execute().is_err());
        assert_eq!(source_log.lock().unwrap().releases, 1);
    }
}
