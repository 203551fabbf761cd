//! Preview pipeline: lifecycle sequencing and frame delivery.
//!
//! Ties a [`CameraSession`] to a [`FrameConverter`] and a consumer
//! sink. The host drives it with plain function calls mirroring its
//! surface lifecycle: `surface_created` brings the camera up and arms
//! the frame listener, `surface_destroyed` tears it down. Raw frames
//! pass through a single-slot handoff, so a consumer slower than the
//! producer sheds frames deterministically instead of queueing them.

use crate::convert::{ConvertError, ConvertedImage, FrameConverter, FrameSlot};
use crate::metrics::MetricsSnapshot;
use crate::session::{
    CameraSession, DeliveryMode, Orientation, PreviewSurface, RawFrame, SessionError,
};
use thiserror::Error;

/// Errors surfaced while pumping frames through the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The session or device failed.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// Frame conversion failed.
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Consumer of converted preview frames.
///
/// Invoked synchronously, once per delivered frame, with the image,
/// its linearized pixel bytes, and the display orientation recorded at
/// configuration time.
pub trait PreviewSink {
    /// Receives one converted frame.
    fn on_preview_frame(&mut self, image: &ConvertedImage, raw: &[u8], orientation: Orientation);
}

/// Adapter implementing [`PreviewSink`] for a closure.
pub struct FnSink<F>(pub F);

impl<F> PreviewSink for FnSink<F>
where
    F: FnMut(&ConvertedImage, &[u8], Orientation),
{
    fn on_preview_frame(&mut self, image: &ConvertedImage, raw: &[u8], orientation: Orientation) {
        (self.0)(image, raw, orientation)
    }
}

/// The assembled preview pipeline.
///
/// The sink is a constructor argument: a frame can never be converted
/// without a consumer attached, so there is no unset-callback path.
pub struct PreviewPipeline<S: PreviewSink> {
    session: CameraSession,
    converter: Option<FrameConverter>,
    slot: FrameSlot,
    sink: S,
    delivery: DeliveryMode,
    armed: bool,
    delivered: u64,
    ignored: u64,
}

impl<S: PreviewSink> PreviewPipeline<S> {
    /// Builds a pipeline over an opened session.
    pub fn new(session: CameraSession, sink: S) -> Self {
        let delivery = session.config().delivery;
        Self {
            session,
            converter: None,
            slot: FrameSlot::new(),
            sink,
            delivery,
            armed: false,
            delivered: 0,
            ignored: 0,
        }
    }

    /// Host notification: the presentation surface became valid.
    ///
    /// Configures the camera, binds the preview to the surface, and
    /// arms the frame listener. Errors degrade to "no preview": they
    /// are logged at debug level and swallowed, and the session remains
    /// closable.
    pub fn surface_created(&mut self, surface: &dyn PreviewSurface) {
        if let Err(e) = self.bring_up(surface) {
            tracing::debug!(error = %e, "error starting camera preview");
        }
    }

    fn bring_up(&mut self, surface: &dyn PreviewSurface) -> Result<(), PipelineError> {
        let size = self.session.configure()?;
        self.converter = Some(FrameConverter::new(
            size,
            self.session.config().format,
            self.session.orientation(),
        )?);
        self.session.start(surface)?;
        self.armed = true;
        Ok(())
    }

    /// Host notification: the surface changed size or format.
    ///
    /// Accepted and ignored; the negotiated preview is not reworked
    /// mid-stream.
    pub fn surface_changed(&mut self, _width: u32, _height: u32) {}

    /// Host notification: the surface is no longer valid.
    ///
    /// Disarms the listener and closes the session. Idempotent.
    pub fn surface_destroyed(&mut self) {
        self.armed = false;
        self.session.close();
    }

    /// Routes one raw frame from the device toward the converter.
    ///
    /// Frames arriving while the listener is disarmed are ignored and
    /// counted. Returns true if the frame entered the handoff slot.
    pub fn on_raw_frame(&mut self, frame: RawFrame) -> bool {
        if !self.armed {
            self.ignored += 1;
            tracing::trace!(sequence = frame.sequence(), "frame ignored, listener disarmed");
            return false;
        }
        self.slot.offer(frame)
    }

    /// Converts and delivers at most one pending frame.
    ///
    /// Returns true if a frame was delivered. In one-shot mode the
    /// listener disarms after the delivery; call [`rearm`] to request
    /// the next frame.
    ///
    /// [`rearm`]: PreviewPipeline::rearm
    pub fn pump(&mut self) -> Result<bool, PipelineError> {
        let Some(frame) = self.slot.take() else {
            return Ok(false);
        };
        let Some(converter) = self.converter.as_ref() else {
            // A frame can only be slotted while armed, which implies a
            // converter; drained frames after teardown are discarded.
            return Ok(false);
        };

        let image = converter.convert(&frame)?;
        self.sink
            .on_preview_frame(&image, image.raw_bytes(), image.orientation());
        self.delivered += 1;

        if self.delivery == DeliveryMode::OneShot {
            self.armed = false;
        }
        Ok(true)
    }

    /// Re-arms a disarmed listener for the next frame.
    ///
    /// Only meaningful while the session streams; used by one-shot
    /// consumers to request another capture cycle.
    pub fn rearm(&mut self) {
        if self.session.is_streaming() {
            self.armed = true;
        }
    }

    /// Pulls one frame from the streaming device, then converts and
    /// delivers it. Convenience for pull-driven hosts.
    pub fn capture_and_deliver(&mut self) -> Result<bool, PipelineError> {
        if !self.armed {
            return Ok(false);
        }
        let frame = self.session.read_frame()?;
        if !self.on_raw_frame(frame) {
            return Ok(false);
        }
        self.pump()
    }

    /// Returns the underlying session.
    #[inline]
    pub fn session(&self) -> &CameraSession {
        &self.session
    }

    /// True while the listener routes frames to the converter.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Number of frames delivered to the sink.
    #[inline]
    pub fn frames_delivered(&self) -> u64 {
        self.delivered
    }

    /// Number of frames shed because the handoff slot was occupied.
    #[inline]
    pub fn frames_dropped(&self) -> u64 {
        self.slot.dropped()
    }

    /// Number of frames ignored because the listener was disarmed.
    #[inline]
    pub fn frames_ignored(&self) -> u64 {
        self.ignored
    }

    /// Current pipeline counters for the metrics registry.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            streaming: self.session.is_streaming(),
            frames_delivered: self.delivered,
            frames_dropped: self.slot.dropped(),
            preview_size: self.session.preview_size(),
            orientation_degrees: self
                .session
                .preview_size()
                .map(|_| self.session.orientation().degrees()),
        }
    }
}

impl<S: PreviewSink> std::fmt::Debug for PreviewPipeline<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewPipeline")
            .field("session", &self.session)
            .field("armed", &self.armed)
            .field("delivered", &self.delivered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{
        HeadlessSurface, MockCamera, Orientation, PixelFormat, PreviewConfig, SessionState,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default, Clone)]
    struct Delivered {
        count: usize,
        byte_len: usize,
        raw_len: usize,
        orientation_degrees: u32,
        width: u32,
        height: u32,
    }

    fn recording_sink(
        record: Rc<RefCell<Delivered>>,
    ) -> FnSink<impl FnMut(&ConvertedImage, &[u8], Orientation)> {
        FnSink(
            move |image: &ConvertedImage, raw: &[u8], orientation: Orientation| {
                let mut d = record.borrow_mut();
                d.count += 1;
                d.byte_len = image.byte_len();
                d.raw_len = raw.len();
                d.orientation_degrees = orientation.degrees();
                d.width = image.width();
                d.height = image.height();
            },
        )
    }

    fn pipeline_with(
        config: PreviewConfig,
        record: Rc<RefCell<Delivered>>,
    ) -> PreviewPipeline<impl PreviewSink> {
        let session = CameraSession::open(Box::new(MockCamera::new()), config).unwrap();
        PreviewPipeline::new(session, recording_sink(record))
    }

    #[test]
    fn test_single_frame_scenario() {
        // open → configure (orientation 90) → start → one 640x480 frame
        let record = Rc::new(RefCell::new(Delivered::default()));
        let mut pipeline = pipeline_with(PreviewConfig::default(), record.clone());

        pipeline.surface_created(&HeadlessSurface::new());
        assert!(pipeline.is_armed());

        pipeline.capture_and_deliver().unwrap();

        let delivered = record.borrow().clone();
        assert_eq!(delivered.count, 1);
        assert_eq!(delivered.byte_len, 640 * 480 * 4);
        assert_eq!(delivered.raw_len, 640 * 480 * 4);
        assert_eq!(delivered.orientation_degrees, 90);
        assert_eq!((delivered.width, delivered.height), (640, 480));

        pipeline.surface_destroyed();
        assert_eq!(pipeline.session().state(), SessionState::Closed);
    }

    #[test]
    fn test_orientation_stable_across_frames() {
        let record = Rc::new(RefCell::new(Delivered::default()));
        let mut pipeline = pipeline_with(PreviewConfig::default(), record.clone());
        pipeline.surface_created(&HeadlessSurface::new());

        for _ in 0..5 {
            pipeline.capture_and_deliver().unwrap();
            assert_eq!(record.borrow().orientation_degrees, 90);
        }
        assert_eq!(record.borrow().count, 5);
    }

    #[test]
    fn test_one_shot_disarms_after_delivery() {
        let record = Rc::new(RefCell::new(Delivered::default()));
        let config = PreviewConfig {
            delivery: DeliveryMode::OneShot,
            ..PreviewConfig::default()
        };
        let mut pipeline = pipeline_with(config, record.clone());
        pipeline.surface_created(&HeadlessSurface::new());

        assert!(pipeline.capture_and_deliver().unwrap());
        assert!(!pipeline.is_armed());
        // Disarmed: nothing further is delivered
        assert!(!pipeline.capture_and_deliver().unwrap());
        assert_eq!(record.borrow().count, 1);

        // The consumer requests the next cycle
        pipeline.rearm();
        assert!(pipeline.capture_and_deliver().unwrap());
        assert_eq!(record.borrow().count, 2);
    }

    #[test]
    fn test_not_ready_surface_leaves_pipeline_disarmed() {
        let record = Rc::new(RefCell::new(Delivered::default()));
        let mut pipeline = pipeline_with(PreviewConfig::default(), record.clone());

        pipeline.surface_created(&HeadlessSurface::not_ready());
        assert!(!pipeline.is_armed());
        assert!(!pipeline.capture_and_deliver().unwrap());
        assert_eq!(record.borrow().count, 0);

        // Teardown still releases the device
        pipeline.surface_destroyed();
        assert_eq!(pipeline.session().state(), SessionState::Closed);
    }

    #[test]
    fn test_slow_consumer_sheds_frames() {
        let record = Rc::new(RefCell::new(Delivered::default()));
        let mut pipeline = pipeline_with(PreviewConfig::default(), record.clone());
        pipeline.surface_created(&HeadlessSurface::new());

        let frame_len = PixelFormat::Nv21.frame_len(640, 480);
        pipeline.on_raw_frame(RawFrame::new(vec![0u8; frame_len], 1));
        pipeline.on_raw_frame(RawFrame::new(vec![0u8; frame_len], 2));
        pipeline.on_raw_frame(RawFrame::new(vec![0u8; frame_len], 3));

        assert_eq!(pipeline.frames_dropped(), 2);
        pipeline.pump().unwrap();
        assert_eq!(record.borrow().count, 1);
        assert!(!pipeline.pump().unwrap());
    }

    #[test]
    fn test_malformed_frame_propagates() {
        let record = Rc::new(RefCell::new(Delivered::default()));
        let mut pipeline = pipeline_with(PreviewConfig::default(), record.clone());
        pipeline.surface_created(&HeadlessSurface::new());

        pipeline.on_raw_frame(RawFrame::new(vec![0u8; 17], 1));
        assert!(matches!(
            pipeline.pump(),
            Err(PipelineError::Convert(ConvertError::MalformedFrame { .. }))
        ));
        assert_eq!(record.borrow().count, 0);
    }

    #[test]
    fn test_frames_ignored_when_disarmed() {
        let record = Rc::new(RefCell::new(Delivered::default()));
        let mut pipeline = pipeline_with(PreviewConfig::default(), record);

        assert!(!pipeline.on_raw_frame(RawFrame::new(vec![0u8; 8], 1)));
        assert!(!pipeline.pump().unwrap());
    }

    #[test]
    fn test_destroy_without_create_is_safe() {
        let record = Rc::new(RefCell::new(Delivered::default()));
        let mut pipeline = pipeline_with(PreviewConfig::default(), record);
        pipeline.surface_destroyed();
        pipeline.surface_destroyed();
        assert_eq!(pipeline.session().state(), SessionState::Closed);
    }

    #[test]
    fn test_metrics_snapshot_reflects_counters() {
        let record = Rc::new(RefCell::new(Delivered::default()));
        let mut pipeline = pipeline_with(PreviewConfig::default(), record);
        pipeline.surface_created(&HeadlessSurface::new());
        pipeline.capture_and_deliver().unwrap();

        let snapshot = pipeline.metrics_snapshot();
        assert!(snapshot.streaming);
        assert_eq!(snapshot.frames_delivered, 1);
        assert_eq!(snapshot.orientation_degrees, Some(90));
    }
}
