//! Font size search.
//!
//! Candidate sizes are probed in descending steps of [`SIZE_STEP`] from the
//! ceiling down to [`MIN_FONT_SIZE`]; the first size the metrics oracle
//! accepts wins. Sizes between two candidates are never tried, so the result
//! can be up to four points below the true optimum.

use super::canvas::LayoutBox;
use crate::fonts::FontMetrics;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Smallest size ever probed or applied.
pub const MIN_FONT_SIZE: u32 = 5;
/// Distance between two probed sizes.
pub const SIZE_STEP: u32 = 5;

/// Outcome of probing one candidate size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Fits(u32),
    DoesNotFit(u32),
}

impl Probe {
    pub fn size(&self) -> u32 {
        match self {
            Probe::Fits(size) | Probe::DoesNotFit(size) => *size,
        }
    }
}

/// No candidate size fits the box.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No font size from {max_size} down to {min} fits {text_len} characters in the box", min = MIN_FONT_SIZE)]
pub struct FitSearchExhausted {
    pub max_size: u32,
    pub text_len: usize,
}

/// What to do when every candidate fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitFallback {
    /// Apply [`MIN_FONT_SIZE`] and log a warning
    #[default]
    MinimumSize,
    /// Return [`FitSearchExhausted`]
    Fail,
}

/// Candidate sizes: `max_size`, `max_size - 5`, ... and finally [`MIN_FONT_SIZE`].
///
/// Empty when `max_size` is below the minimum.
pub fn candidate_sizes(max_size: u32) -> CandidateSizes {
    CandidateSizes {
        next: (max_size >= MIN_FONT_SIZE).then_some(max_size),
    }
}

/// Descending candidate sizes, see [`candidate_sizes`].
#[derive(Debug, Clone)]
pub struct CandidateSizes {
    next: Option<u32>,
}

impl Iterator for CandidateSizes {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let size = self.next?;
        self.next = match size.checked_sub(SIZE_STEP) {
            Some(lower) if lower >= MIN_FONT_SIZE => Some(lower),
            // the step grid ends above the minimum, which is still probed
            _ if size > MIN_FONT_SIZE => Some(MIN_FONT_SIZE),
            _ => None,
        };
        Some(size)
    }
}

/// Body text ceiling derived from the fitted title size.
pub fn body_ceiling(title_size: u32, coefficient: f64) -> u32 {
    let ceiling = (f64::from(title_size) * coefficient).floor();
    if ceiling.is_finite() && ceiling > 0.0 {
        ceiling as u32
    } else {
        0
    }
}

/// Descending probe over the candidate sizes of one text run.
pub struct Probes<'a, M: ?Sized> {
    metrics: &'a M,
    text: &'a str,
    layout: &'a LayoutBox,
    bold: bool,
    sizes: CandidateSizes,
}

impl<M: FontMetrics + ?Sized> Iterator for Probes<'_, M> {
    type Item = Probe;

    fn next(&mut self) -> Option<Probe> {
        let size = self.sizes.next()?;
        let probe = match self.metrics.fits(self.text, size, self.bold, self.layout) {
            Ok(true) => Probe::Fits(size),
            Ok(false) => Probe::DoesNotFit(size),
            Err(err) => {
                debug!(size, error = %err, "metrics oracle failed, treating size as not fitting");
                Probe::DoesNotFit(size)
            },
        };
        Some(probe)
    }
}

/// Finds the largest candidate font size that fits a box.
#[derive(Debug, Clone)]
pub struct TextFitEngine<M> {
    metrics: M,
    fallback: FitFallback,
}

impl<M: FontMetrics> TextFitEngine<M> {
    pub fn new(metrics: M, fallback: FitFallback) -> Self {
        Self { metrics, fallback }
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    pub fn fallback(&self) -> FitFallback {
        self.fallback
    }

    /// Probe every candidate size for `text` in `layout`, largest first.
    pub fn probes<'a>(
        &'a self,
        text: &'a str,
        layout: &'a LayoutBox,
        max_size: u32,
        bold: bool,
    ) -> Probes<'a, M> {
        Probes {
            metrics: &self.metrics,
            text,
            layout,
            bold,
            sizes: candidate_sizes(max_size),
        }
    }

    /// The first fitting candidate size.
    pub fn fit(
        &self,
        text: &str,
        layout: &LayoutBox,
        max_size: u32,
        bold: bool,
    ) -> Result<u32, FitSearchExhausted> {
        self.probes(text, layout, max_size, bold)
            .find_map(|probe| match probe {
                Probe::Fits(size) => Some(size),
                Probe::DoesNotFit(_) => None,
            })
            .ok_or(FitSearchExhausted {
                max_size,
                text_len: text.chars().count(),
            })
    }

    /// [`fit`](Self::fit), resolving exhaustion with the configured fallback.
    pub fn fit_with_fallback(
        &self,
        text: &str,
        layout: &LayoutBox,
        max_size: u32,
        bold: bool,
    ) -> Result<u32, FitSearchExhausted> {
        match self.fit(text, layout, max_size, bold) {
            Ok(size) => Ok(size),
            Err(exhausted) => match self.fallback {
                FitFallback::MinimumSize => {
                    warn!(
                        max_size,
                        family = self.metrics.family_name(),
                        "no font size fits, applying minimum size {}",
                        MIN_FONT_SIZE
                    );
                    Ok(MIN_FONT_SIZE)
                },
                FitFallback::Fail => Err(exhausted),
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::fonts::MetricsError;
    use proptest::prelude::*;
    use std::cell::RefCell;

    /// Fits whenever the size is at most `max_fitting`.
    pub(crate) struct ThresholdMetrics {
        pub max_fitting: u32,
    }

    impl FontMetrics for ThresholdMetrics {
        fn family_name(&self) -> &str {
            "Threshold"
        }

        fn fits(
            &self,
            _text: &str,
            size: u32,
            _bold: bool,
            _layout: &LayoutBox,
        ) -> Result<bool, MetricsError> {
            Ok(size <= self.max_fitting)
        }
    }

    /// Each character is `size * 0.6` points wide and lines are `size * 1.2` high.
    struct ProportionalMetrics;

    impl FontMetrics for ProportionalMetrics {
        fn family_name(&self) -> &str {
            "Proportional"
        }

        fn fits(
            &self,
            text: &str,
            size: u32,
            _bold: bool,
            layout: &LayoutBox,
        ) -> Result<bool, MetricsError> {
            let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
            let lines = text.lines().count().max(1);
            let width = widest as f64 * f64::from(size) * 0.6;
            let height = lines as f64 * f64::from(size) * 1.2;
            Ok(width <= layout.width * 72.0 && height <= layout.height * 72.0)
        }
    }

    /// Records probed sizes and fails on the ones listed.
    struct RecordingMetrics {
        failing: Vec<u32>,
        probed: RefCell<Vec<u32>>,
    }

    impl FontMetrics for RecordingMetrics {
        fn family_name(&self) -> &str {
            "Recording"
        }

        fn fits(
            &self,
            _text: &str,
            size: u32,
            _bold: bool,
            _layout: &LayoutBox,
        ) -> Result<bool, MetricsError> {
            self.probed.borrow_mut().push(size);
            if self.failing.contains(&size) {
                Err(MetricsError::MissingGlyph('\u{1F41D}'))
            } else {
                Ok(true)
            }
        }
    }

    fn layout() -> LayoutBox {
        LayoutBox::new(0.5, 0.5, 15.0, 1.5)
    }

    #[test]
    fn test_candidate_sizes() {
        let sizes: Vec<u32> = candidate_sizes(60).collect();
        assert_eq!(sizes, vec![60, 55, 50, 45, 40, 35, 30, 25, 20, 15, 10, 5]);
        let odd: Vec<u32> = candidate_sizes(12).collect();
        assert_eq!(odd, vec![12, 7, 5]);
        let body: Vec<u32> = candidate_sizes(24).collect();
        assert_eq!(body, vec![24, 19, 14, 9, 5]);
        assert_eq!(candidate_sizes(6).collect::<Vec<_>>(), vec![6, 5]);
        assert_eq!(candidate_sizes(4).count(), 0);
        assert_eq!(candidate_sizes(5).collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_minimum_size_probed_below_off_grid_ceiling() {
        let engine = TextFitEngine::new(ThresholdMetrics { max_fitting: 5 }, FitFallback::Fail);
        assert_eq!(engine.fit("Bees", &layout(), 24, false), Ok(5));
        assert_eq!(engine.fit_with_fallback("Bees", &layout(), 27, false), Ok(5));
    }

    #[test]
    fn test_exhausted_message_names_minimum() {
        let err = FitSearchExhausted {
            max_size: 24,
            text_len: 4,
        };
        assert_eq!(
            err.to_string(),
            format!("No font size from 24 down to {} fits 4 characters in the box", MIN_FONT_SIZE)
        );
    }

    #[test]
    fn test_fit_threshold_oracle() {
        let engine = TextFitEngine::new(ThresholdMetrics { max_fitting: 40 }, FitFallback::Fail);
        assert_eq!(engine.fit("Bees", &layout(), 60, false), Ok(40));
    }

    #[test]
    fn test_fit_is_greedy_on_step_grid() {
        let engine = TextFitEngine::new(ThresholdMetrics { max_fitting: 44 }, FitFallback::Fail);
        assert_eq!(engine.fit("Bees", &layout(), 60, true), Ok(40));
    }

    #[test]
    fn test_probes_are_tagged() {
        let engine = TextFitEngine::new(ThresholdMetrics { max_fitting: 50 }, FitFallback::Fail);
        let layout = layout();
        let probes: Vec<Probe> = engine.probes("Bees", &layout, 60, false).take(3).collect();
        assert_eq!(
            probes,
            vec![Probe::DoesNotFit(60), Probe::DoesNotFit(55), Probe::Fits(50)]
        );
        assert_eq!(probes[2].size(), 50);
    }

    #[test]
    fn test_oracle_error_is_does_not_fit() {
        let metrics = RecordingMetrics {
            failing: vec![30, 25],
            probed: RefCell::new(Vec::new()),
        };
        let engine = TextFitEngine::new(&metrics, FitFallback::Fail);
        assert_eq!(engine.fit("Bees", &layout(), 30, false), Ok(20));
        assert_eq!(*metrics.probed.borrow(), vec![30, 25, 20]);
    }

    #[test]
    fn test_exhaustion_fail_policy() {
        let engine = TextFitEngine::new(ThresholdMetrics { max_fitting: 4 }, FitFallback::Fail);
        let err = engine
            .fit_with_fallback("Bees", &layout(), 60, false)
            .unwrap_err();
        assert_eq!(err.max_size, 60);
        assert_eq!(err.text_len, 4);
    }

    #[test]
    fn test_exhaustion_minimum_size_policy() {
        let engine =
            TextFitEngine::new(ThresholdMetrics { max_fitting: 0 }, FitFallback::MinimumSize);
        assert_eq!(
            engine.fit_with_fallback("Bees", &layout(), 60, false),
            Ok(MIN_FONT_SIZE)
        );
    }

    #[test]
    fn test_ceiling_below_minimum_is_exhausted() {
        let engine = TextFitEngine::new(ThresholdMetrics { max_fitting: 100 }, FitFallback::Fail);
        assert!(engine.fit("Bees", &layout(), 3, false).is_err());
    }

    #[test]
    fn test_body_ceiling() {
        assert_eq!(body_ceiling(40, 0.6), 24);
        assert_eq!(body_ceiling(45, 0.6), 27);
        assert_eq!(body_ceiling(5, 0.6), 3);
        assert_eq!(body_ceiling(40, -1.0), 0);
    }

    #[test]
    fn test_fallback_from_yaml_name() {
        let fallback: FitFallback = serde_saphyr::from_str("fail").unwrap();
        assert_eq!(fallback, FitFallback::Fail);
    }

    proptest! {
        #[test]
        fn prop_fit_is_monotonic_in_box_size(
            text in "[a-z ]{1,40}(\n[a-z ]{1,40}){0,3}",
            width in 0.5f64..16.0,
            height in 0.5f64..9.0,
            shrink_w in 0.1f64..=1.0,
            shrink_h in 0.1f64..=1.0,
            max_size in 5u32..120,
        ) {
            let engine = TextFitEngine::new(ProportionalMetrics, FitFallback::MinimumSize);
            let outer = LayoutBox::new(0.0, 0.0, width, height);
            let inner = LayoutBox::new(0.0, 0.0, width * shrink_w, height * shrink_h);
            prop_assert!(outer.contains(&inner));

            let outer_size = engine.fit_with_fallback(&text, &outer, max_size, false).unwrap();
            let inner_size = engine.fit_with_fallback(&text, &inner, max_size, false).unwrap();
            prop_assert!(inner_size <= outer_size);
        }
    }
}
