use std::collections::{HashMap, VecDeque};

use crate::gesture::domain::gesture::{GestureClass, GestureSample, Theme};
use crate::shared::config::ProcessorConfig;

/// Smoothed per-frame output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmoothedOutput {
    pub resolution: u32,
    pub class: GestureClass,
    pub theme: Theme,
}

/// Domain interface for damping frame-to-frame jitter in gesture readings.
pub trait TemporalSmootherInterface: Send {
    fn update(&mut self, sample: GestureSample) -> SmoothedOutput;

    /// Last emitted output, `None` before the first update.
    fn last(&self) -> Option<SmoothedOutput>;

    fn reset(&mut self);
}

/// Two independent rolling windows, updated once per frame.
///
/// Resolution: truncated mean of the last `resolution_window_size` raw
/// widths, clamped to `[min_width, max_width]`.
///
/// Gesture: mode of the last `theme_window_size` classes. Ties keep the
/// previously emitted class when it is among the leaders, otherwise the
/// most recently pushed leader wins. A `NoHand` frame is pushed
/// `no_hand_votes` times so a stale gesture is released faster than a new
/// one is adopted.
pub struct RollingWindowSmoother {
    resolutions: VecDeque<u32>,
    resolution_capacity: usize,
    classes: VecDeque<GestureClass>,
    class_capacity: usize,
    no_hand_votes: usize,
    min_width: u32,
    max_width: u32,
    last: Option<SmoothedOutput>,
}

impl RollingWindowSmoother {
    pub fn new(config: &ProcessorConfig) -> Self {
        let resolution_capacity = config.resolution_window_size.max(1);
        let class_capacity = config.theme_window_size.max(1);
        Self {
            resolutions: VecDeque::with_capacity(resolution_capacity),
            resolution_capacity,
            classes: VecDeque::with_capacity(class_capacity),
            class_capacity,
            no_hand_votes: config.no_hand_votes.max(1),
            min_width: config.min_width,
            max_width: config.max_width,
            last: None,
        }
    }

    fn push_resolution(&mut self, width: u32) -> u32 {
        if self.resolutions.len() == self.resolution_capacity {
            self.resolutions.pop_front();
        }
        self.resolutions.push_back(width);

        let sum: u64 = self.resolutions.iter().map(|&w| w as u64).sum();
        let mean = (sum / self.resolutions.len() as u64) as u32;
        mean.clamp(self.min_width, self.max_width)
    }

    fn push_class(&mut self, class: GestureClass) -> GestureClass {
        let votes = if class == GestureClass::NoHand {
            self.no_hand_votes
        } else {
            1
        };
        for _ in 0..votes {
            if self.classes.len() == self.class_capacity {
                self.classes.pop_front();
            }
            self.classes.push_back(class);
        }
        self.mode()
    }

    fn mode(&self) -> GestureClass {
        let mut counts: HashMap<GestureClass, usize> = HashMap::new();
        for &c in &self.classes {
            *counts.entry(c).or_default() += 1;
        }
        let best = counts.values().copied().max().unwrap_or(0);

        if let Some(previous) = self.last.map(|o| o.class) {
            if counts.get(&previous) == Some(&best) {
                return previous;
            }
        }
        self.classes
            .iter()
            .rev()
            .find(|c| counts.get(*c) == Some(&best))
            .copied()
            .unwrap_or(GestureClass::NoHand)
    }
}

impl TemporalSmootherInterface for RollingWindowSmoother {
    fn update(&mut self, sample: GestureSample) -> SmoothedOutput {
        let resolution = self.push_resolution(sample.raw_resolution);
        let class = self.push_class(sample.class);
        let output = SmoothedOutput {
            resolution,
            class,
            theme: class.theme(),
        };
        self.last = Some(output);
        output
    }

    fn last(&self) -> Option<SmoothedOutput> {
        self.last
    }

    fn reset(&mut self) {
        self.resolutions.clear();
        self.classes.clear();
        self.last = None;
    }
}
