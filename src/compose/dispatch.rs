//! Slide variant selection.
//!
//! ```text
//! title, no text, no image, background  -> TitleSlide
//! title, text, background, no image     -> TextOnBackground
//! title, text, image, no background     -> TextBesideImage
//! anything else                         -> Rejected
//! ```

use super::builders::{BuiltSlide, SlideBuilder};
use super::deck::{InvalidSlideSpec, SlideSpec};
use crate::common::error::Result;
use crate::fonts::FontMetrics;
use crate::ooxml::pptx::MutablePresentation;
use std::fmt;

/// The three slide layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideVariant {
    TitleSlide,
    TextOnBackground,
    TextBesideImage,
}

impl fmt::Display for SlideVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlideVariant::TitleSlide => "title",
            SlideVariant::TextOnBackground => "text on background",
            SlideVariant::TextBesideImage => "text beside image",
        };
        f.write_str(name)
    }
}

/// Result of dispatching one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Built(BuiltSlide),
    Rejected(InvalidSlideSpec),
}

/// Pick the layout for `spec` without building anything.
pub fn select_variant(spec: &SlideSpec) -> std::result::Result<SlideVariant, InvalidSlideSpec> {
    if spec.title.trim().is_empty() {
        return Err(InvalidSlideSpec::EmptyTitle);
    }

    match (
        spec.body_text.is_some(),
        spec.image_asset.is_some(),
        spec.background_asset.is_some(),
    ) {
        (false, false, true) => Ok(SlideVariant::TitleSlide),
        (true, false, true) => Ok(SlideVariant::TextOnBackground),
        (true, true, false) => Ok(SlideVariant::TextBesideImage),
        (_, true, true) => Err(InvalidSlideSpec::ConflictingAssets),
        (true, false, false) => Err(InvalidSlideSpec::MissingAsset),
        (false, true, false) => Err(InvalidSlideSpec::ImageWithoutText),
        (false, false, false) => Err(InvalidSlideSpec::MissingBackground),
    }
}

/// Select the layout for `spec` and append the slide to `presentation`.
///
/// Invalid specs produce [`DispatchOutcome::Rejected`] and leave the
/// presentation untouched; build failures are returned as errors.
pub fn dispatch<M: FontMetrics>(
    builder: &SlideBuilder<M>,
    presentation: &mut MutablePresentation,
    spec: &SlideSpec,
) -> Result<DispatchOutcome> {
    let variant = match select_variant(spec) {
        Ok(variant) => variant,
        Err(reason) => return Ok(DispatchOutcome::Rejected(reason)),
    };

    let built = match (
        variant,
        spec.body_text.as_deref(),
        spec.image_asset.as_ref(),
        spec.background_asset.as_ref(),
    ) {
        (SlideVariant::TitleSlide, _, _, Some(background)) => {
            builder.build_title_slide(presentation, &spec.title, background)?
        },
        (SlideVariant::TextOnBackground, Some(body), _, Some(background)) => {
            builder.build_text_on_background(presentation, &spec.title, body, background)?
        },
        (SlideVariant::TextBesideImage, Some(body), Some(image), _) => {
            builder.build_text_beside_image(presentation, &spec.title, body, image)?
        },
        // select_variant guarantees the assets of each variant
        _ => return Ok(DispatchOutcome::Rejected(InvalidSlideSpec::MissingAsset)),
    };
    Ok(DispatchOutcome::Built(built))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::CompositionSettings;
    use crate::compose::fit::tests::ThresholdMetrics;
    use crate::media::{MediaAsset, MediaRole};
    use image::{Rgb, RgbImage};
    use std::path::Path;

    fn asset(path: &str, role: MediaRole) -> MediaAsset {
        MediaAsset {
            file_path: path.into(),
            width: 1344,
            height: 768,
            role,
        }
    }

    fn spec(
        title: &str,
        text: Option<&str>,
        image: Option<&str>,
        background: Option<&str>,
    ) -> SlideSpec {
        SlideSpec {
            title: title.to_string(),
            body_text: text.map(str::to_string),
            image_asset: image.map(|p| asset(p, MediaRole::Image)),
            background_asset: background.map(|p| asset(p, MediaRole::Background)),
        }
    }

    fn png(dir: &Path, name: &str) -> String {
        let path = dir.join(name);
        RgbImage::from_pixel(8, 8, Rgb([0, 0, 0])).save(&path).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_title_only_with_background_is_title_slide() {
        let s = spec("X", None, None, Some("b.png"));
        assert_eq!(select_variant(&s), Ok(SlideVariant::TitleSlide));
        assert_eq!(s.validate(), Ok(SlideVariant::TitleSlide));
    }

    #[test]
    fn test_text_without_assets_is_rejected() {
        let s = spec("X", Some("t"), None, None);
        assert_eq!(select_variant(&s), Err(InvalidSlideSpec::MissingAsset));
    }

    #[test]
    fn test_variant_table() {
        assert_eq!(
            select_variant(&spec("X", Some("t"), None, Some("b.png"))),
            Ok(SlideVariant::TextOnBackground)
        );
        assert_eq!(
            select_variant(&spec("X", Some("t"), Some("i.png"), None)),
            Ok(SlideVariant::TextBesideImage)
        );
        assert_eq!(
            select_variant(&spec("X", Some("t"), Some("i.png"), Some("b.png"))),
            Err(InvalidSlideSpec::ConflictingAssets)
        );
        assert_eq!(
            select_variant(&spec("X", None, Some("i.png"), Some("b.png"))),
            Err(InvalidSlideSpec::ConflictingAssets)
        );
        assert_eq!(
            select_variant(&spec("X", None, Some("i.png"), None)),
            Err(InvalidSlideSpec::ImageWithoutText)
        );
        assert_eq!(
            select_variant(&spec("X", None, None, None)),
            Err(InvalidSlideSpec::MissingBackground)
        );
        assert_eq!(
            select_variant(&spec("  ", None, None, Some("b.png"))),
            Err(InvalidSlideSpec::EmptyTitle)
        );
    }

    #[test]
    fn test_dispatch_builds_title_slide() {
        let dir = tempfile::tempdir().unwrap();
        let background = png(dir.path(), "b.png");
        let builder =
            SlideBuilder::new(ThresholdMetrics { max_fitting: 40 }, CompositionSettings::default());
        let mut pres = MutablePresentation::new();

        let outcome = dispatch(&builder, &mut pres, &spec("X", None, None, Some(&background)))
            .unwrap();
        match outcome {
            DispatchOutcome::Built(built) => assert_eq!(built.variant, SlideVariant::TitleSlide),
            DispatchOutcome::Rejected(reason) => panic!("rejected: {}", reason),
        }
        assert_eq!(pres.slide_count(), 1);
    }

    #[test]
    fn test_dispatch_rejection_adds_no_slide() {
        let builder =
            SlideBuilder::new(ThresholdMetrics { max_fitting: 40 }, CompositionSettings::default());
        let mut pres = MutablePresentation::new();

        let outcome = dispatch(&builder, &mut pres, &spec("X", Some("t"), None, None)).unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Rejected(InvalidSlideSpec::MissingAsset)
        );
        assert_eq!(pres.slide_count(), 0);
    }
}
