use std::time::Instant;

use image::RgbImage;

use crate::gesture::domain::distance_estimator::DistanceEstimator;
use crate::gesture::domain::gesture::{GestureSample, Theme};
use crate::gesture::domain::gesture_classifier::GestureClassifier;
use crate::gesture::domain::shape_descriptor::{ShapeDescriptorExtractor, ShapeDescriptors};
use crate::gesture::domain::temporal_smoother::{RollingWindowSmoother, TemporalSmootherInterface};
use crate::pipeline::pipeline_logger::{elapsed_ms, NullPipelineLogger, PipelineLogger};
use crate::rendering::domain::ascii_renderer::AsciiRenderer;
use crate::rendering::domain::render_result::RenderResult;
use crate::segmentation::domain::region_selector::{RegionSelector, SelectionOutcome};
use crate::segmentation::domain::skin_mask_builder::SkinMaskBuilder;
use crate::shared::config::ProcessorConfig;
use crate::shared::error::ProcessError;
use crate::shared::frame::Frame;
use crate::vision::domain::vision_primitives::VisionPrimitives;
use crate::vision::infrastructure::imageproc_primitives::ImageprocPrimitives;

/// Everything learned about one frame before smoothing.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameAnalysis {
    pub outcome: SelectionOutcome,
    pub descriptors: Option<ShapeDescriptors>,
    pub sample: GestureSample,
}

/// Per-session frame processor.
///
/// Owns the smoothing state, so each client session needs its own
/// instance. Calls to [`process`](Self::process) must be serialized.
pub struct ImageProcessor {
    config: ProcessorConfig,
    vision: Box<dyn VisionPrimitives>,
    mask_builder: SkinMaskBuilder,
    selector: RegionSelector,
    extractor: ShapeDescriptorExtractor,
    classifier: GestureClassifier,
    estimator: DistanceEstimator,
    smoother: Box<dyn TemporalSmootherInterface>,
    renderer: AsciiRenderer,
    logger: Box<dyn PipelineLogger>,
}

impl ImageProcessor {
    pub fn new(config: ProcessorConfig, vision: Box<dyn VisionPrimitives>) -> Self {
        Self {
            mask_builder: SkinMaskBuilder::new(&config),
            selector: RegionSelector::new(&config),
            extractor: ShapeDescriptorExtractor::new(&config),
            classifier: GestureClassifier::new(&config),
            estimator: DistanceEstimator::new(&config),
            smoother: Box::new(RollingWindowSmoother::new(&config)),
            renderer: AsciiRenderer::new(&config),
            logger: Box::new(NullPipelineLogger),
            config,
            vision,
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_classifier(mut self, classifier: GestureClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn logger(&self) -> &dyn PipelineLogger {
        self.logger.as_ref()
    }

    pub fn logger_mut(&mut self) -> &mut dyn PipelineLogger {
        self.logger.as_mut()
    }

    /// Theme last emitted, [`Theme::Default`] before the first frame.
    pub fn theme(&self) -> Theme {
        self.smoother.last().map_or(Theme::Default, |o| o.theme)
    }

    /// Forgets the smoothing history, as if the session had just started.
    pub fn reset(&mut self) {
        self.smoother.reset();
    }

    /// Mask, region, descriptors, class and raw width for one frame.
    ///
    /// Does not touch the smoothing state.
    pub fn analyze(&mut self, frame: &Frame) -> Result<FrameAnalysis, ProcessError> {
        let image = validate(frame)?;
        Ok(self.analyze_image(&image))
    }

    /// Runs the whole pipeline on one frame and advances the smoothing
    /// state.
    ///
    /// Returns [`ProcessError::EmptyFrame`] for frames without pixels; the
    /// caller should skip those.
    pub fn process(&mut self, frame: &Frame) -> Result<RenderResult, ProcessError> {
        let image = validate(frame)?;
        let analysis = self.analyze_image(&image);
        let smoothed = self.smoother.update(analysis.sample);

        let start = Instant::now();
        let character_grid = self
            .renderer
            .render(self.vision.as_ref(), &image, smoothed.resolution);
        self.logger.timing("render", elapsed_ms(start));

        log::debug!(
            "frame {}: {} class={:?} raw={} -> theme={} resolution={}",
            frame.index(),
            analysis.outcome.label(),
            analysis.sample.class,
            analysis.sample.raw_resolution,
            smoothed.theme,
            smoothed.resolution
        );

        Ok(RenderResult {
            character_grid,
            theme: smoothed.theme,
            resolution: smoothed.resolution,
        })
    }

    fn analyze_image(&mut self, image: &RgbImage) -> FrameAnalysis {
        let vision = self.vision.as_ref();

        let start = Instant::now();
        let mask = self.mask_builder.build(vision, image);
        self.logger.timing("mask", elapsed_ms(start));

        let start = Instant::now();
        let outcome = self.selector.select(vision, &mask);
        self.logger.timing("select", elapsed_ms(start));

        let descriptors = outcome.region().map(|region| {
            let start = Instant::now();
            let d = self.extractor.extract(vision, region);
            self.logger.timing("describe", elapsed_ms(start));
            d
        });

        let class = self.classifier.classify(descriptors.as_ref());
        let area = descriptors.as_ref().map(|d| d.area);
        let raw_resolution = self.estimator.estimate(area);

        if let Some(d) = &descriptors {
            self.logger.metric("region_area", d.area);
            log::debug!(
                "region area={:.0} solidity={:?} aspect={:.2} circularity={:.2} finger_gaps={}",
                d.area,
                d.solidity,
                d.aspect_ratio,
                d.circularity,
                d.finger_gaps
            );
        }
        self.logger.metric("raw_resolution", raw_resolution as f64);

        FrameAnalysis {
            outcome,
            descriptors,
            sample: GestureSample {
                class,
                raw_resolution,
            },
        }
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default(), Box::new(ImageprocPrimitives::new()))
    }
}

fn validate(frame: &Frame) -> Result<RgbImage, ProcessError> {
    if frame.is_empty() {
        return Err(ProcessError::EmptyFrame {
            width: frame.width(),
            height: frame.height(),
        });
    }
    let invalid = || ProcessError::InvalidFrame {
        channels: frame.channels(),
        expected: frame.expected_len(),
        actual: frame.data().len(),
    };
    if frame.channels() != 3 || frame.data().len() != frame.expected_len() {
        return Err(invalid());
    }
    frame.to_rgb_image().ok_or_else(invalid)
}
