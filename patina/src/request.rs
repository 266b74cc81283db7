//! The restoration request: one car image plus two preference selections.

use serde::{Deserialize, Serialize};

/// Supported image encodings for the uploaded car photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    /// JPEG-encoded image.
    Jpeg,
    /// PNG-encoded image.
    Png,
}

impl ImageFormat {
    /// Returns the MIME type for this format.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// The uploaded car photo.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarImage {
    /// Raw encoded image bytes.
    pub bytes: Vec<u8>,
    /// The image encoding.
    pub format: ImageFormat,
}

impl CarImage {
    /// Creates an image from raw bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>, format: ImageFormat) -> Self {
        Self { bytes, format }
    }

    /// Whether the image carries no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for CarImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarImage")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// How the restoration should be approached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesignApproach {
    /// Keep the car as close to factory condition as possible.
    PreserveAuthenticity,
    /// Blend period-correct restoration with discreet modern upgrades.
    SubtleModernTouches,
    /// Rebuild the car around modern running gear and styling.
    FullRestomod,
}

impl DesignApproach {
    /// The label shown to users and embedded in prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PreserveAuthenticity => "Preserve Authenticity",
            Self::SubtleModernTouches => "Subtle Modern Touches",
            Self::FullRestomod => "Full Restomod Makeover",
        }
    }

    /// All approaches in presentation order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [
            Self::PreserveAuthenticity,
            Self::SubtleModernTouches,
            Self::FullRestomod,
        ]
    }
}

/// The preferred aesthetic direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StylingFlavor {
    /// Factory-correct colors, trim, and materials.
    FactoryOriginal,
    /// Period motorsport styling cues.
    RetroSport,
    /// Contemporary custom styling.
    ContemporaryCustom,
    /// Concours-grade collector presentation.
    LuxuryCollector,
    /// Practical refresh for regular driving.
    DailyDriverRevival,
}

impl StylingFlavor {
    /// The label shown to users and embedded in prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FactoryOriginal => "Factory Original",
            Self::RetroSport => "Retro Sport",
            Self::ContemporaryCustom => "Contemporary Custom",
            Self::LuxuryCollector => "Luxury Collector",
            Self::DailyDriverRevival => "Daily Driver Revival",
        }
    }

    /// All flavors in presentation order.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::FactoryOriginal,
            Self::RetroSport,
            Self::ContemporaryCustom,
            Self::LuxuryCollector,
            Self::DailyDriverRevival,
        ]
    }
}

/// One complete restoration request.
///
/// Immutable once built; created by the caller and consumed exactly once
/// by a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestorationRequest {
    /// The uploaded car photo.
    pub image: CarImage,
    /// How the restoration should be approached.
    pub approach: DesignApproach,
    /// The preferred aesthetic direction.
    pub styling: StylingFlavor,
}

impl RestorationRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(image: CarImage, approach: DesignApproach, styling: StylingFlavor) -> Self {
        Self {
            image,
            approach,
            styling,
        }
    }

    /// Renders the two preference selections as plain key-value lines,
    /// exactly as the strategy and sourcing prompts embed them.
    #[must_use]
    pub fn preference_lines(&self) -> String {
        format!(
            "Approach: {}\nStyling: {}",
            self.approach.label(),
            self.styling.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_image() -> CarImage {
        CarImage::new(vec![0xFF, 0xD8, 0xFF], ImageFormat::Jpeg)
    }

    #[test]
    fn test_image_format_mime_types() {
        assert_eq!(ImageFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(ImageFormat::Png.mime_type(), "image/png");
    }

    #[test]
    fn test_car_image_is_empty() {
        assert!(CarImage::new(Vec::new(), ImageFormat::Png).is_empty());
        assert!(!sample_image().is_empty());
    }

    #[test]
    fn test_car_image_debug_omits_bytes() {
        let image = sample_image();
        let rendered = format!("{image:?}");
        assert!(rendered.contains("len: 3"));
        assert!(!rendered.contains("255"));
    }

    #[test]
    fn test_approach_labels() {
        assert_eq!(
            DesignApproach::PreserveAuthenticity.label(),
            "Preserve Authenticity"
        );
        assert_eq!(
            DesignApproach::FullRestomod.label(),
            "Full Restomod Makeover"
        );
        assert_eq!(DesignApproach::all().len(), 3);
    }

    #[test]
    fn test_styling_labels() {
        assert_eq!(StylingFlavor::RetroSport.label(), "Retro Sport");
        assert_eq!(
            StylingFlavor::DailyDriverRevival.label(),
            "Daily Driver Revival"
        );
        assert_eq!(StylingFlavor::all().len(), 5);
    }

    #[test]
    fn test_preference_lines() {
        let request = RestorationRequest::new(
            sample_image(),
            DesignApproach::FullRestomod,
            StylingFlavor::RetroSport,
        );
        assert_eq!(
            request.preference_lines(),
            "Approach: Full Restomod Makeover\nStyling: Retro Sport"
        );
    }
}
