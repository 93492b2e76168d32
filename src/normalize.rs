use crate::error::{Error, Result};
use crate::logi;
use crate::resolution::{closest_aspect_ratio, SupportedResolution};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::path::Path;

/// Source pixels scaled and center-cropped to exactly one supported resolution.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub image: DynamicImage,
    pub resolution: SupportedResolution,
}

impl NormalizedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Decodes `path` (format sniffed from content) and fits it to the nearest supported
/// resolution.
pub fn normalize_image(path: &Path) -> Result<NormalizedImage> {
    if !path.is_file() {
        return Err(Error::InputNotFound(format!(
            "image file {} does not exist",
            path.display()
        )));
    }

    let source = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    let (width, height) = source.dimensions();
    let resolution = closest_aspect_ratio(width, height);
    logi(format!(
        "Source {}x{} -> target {} ({}x{})",
        width, height, resolution.name, resolution.width, resolution.height
    ));

    Ok(NormalizedImage {
        image: resize_and_crop(&source, resolution),
        resolution,
    })
}

/// Scale so the limiting axis meets the target exactly, then center-crop the other axis.
pub fn resize_and_crop(source: &DynamicImage, target: SupportedResolution) -> DynamicImage {
    let (width, height) = source.dimensions();
    let (w, h) = (width.max(1) as u64, height.max(1) as u64);
    let (tw, th) = (target.width as u64, target.height as u64);

    // w/h > tw/th without float rounding
    let (new_w, new_h) = if w * th > tw * h {
        ((w * th / h).max(tw), th)
    } else {
        (tw, (h * tw / w).max(th))
    };

    let scaled = source.resize_exact(new_w as u32, new_h as u32, FilterType::Lanczos3);
    let left = ((new_w - tw) / 2) as u32;
    let top = ((new_h - th) / 2) as u32;
    scaled.crop_imm(left, top, target.width, target.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::SUPPORTED_RESOLUTIONS;
    use image::{Rgb, RgbImage};

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 120, 200])))
    }

    #[test]
    fn output_matches_chosen_resolution_for_any_source() {
        for (w, h) in [(1, 1), (1920, 1080), (1080, 1920), (333, 333), (800, 601), (2, 9), (97, 13)] {
            let target = closest_aspect_ratio(w, h);
            let out = resize_and_crop(&solid(w, h), target);
            assert_eq!(out.dimensions(), (target.width, target.height), "{w}x{h}");
        }
    }

    #[test]
    fn forcing_a_mismatched_target_still_crops_exactly() {
        let wide = solid(400, 100);
        for target in SUPPORTED_RESOLUTIONS {
            let out = resize_and_crop(&wide, target);
            assert_eq!(out.dimensions(), (target.width, target.height), "{}", target.name);
        }
    }

    #[test]
    fn crop_is_centered() {
        // 3 vertical bands; a square target keeps only the middle one.
        let mut img = RgbImage::new(300, 100);
        for (x, _, px) in img.enumerate_pixels_mut() {
            *px = if (100..200).contains(&x) { Rgb([255, 255, 255]) } else { Rgb([0, 0, 0]) };
        }
        let square = SUPPORTED_RESOLUTIONS[2];
        let out = resize_and_crop(&DynamicImage::ImageRgb8(img), square).to_rgb8();
        let center = out.get_pixel(square.width / 2, square.height / 2);
        assert!(center[0] > 200, "center should come from the white band, got {center:?}");
    }

    #[test]
    fn normalizes_a_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.PNG");
        solid(640, 480).save_with_format(&path, image::ImageFormat::Png).unwrap();

        let normalized = normalize_image(&path).unwrap();
        assert_eq!(normalized.resolution.name, "4:3");
        assert_eq!(normalized.dimensions(), (1024, 768));
    }

    #[test]
    fn missing_file_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = normalize_image(&dir.path().join("image.jpg")).unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)), "{err:?}");
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let err = normalize_image(&path).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }), "{err:?}");
    }
}
