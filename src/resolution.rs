/// A target resolution the video endpoint accepts, keyed by its aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedResolution {
    pub name: &'static str,
    ratio_w: u32,
    ratio_h: u32,
    pub width: u32,
    pub height: u32,
}

impl SupportedResolution {
    const fn new(name: &'static str, ratio: (u32, u32), size: (u32, u32)) -> Self {
        Self {
            name,
            ratio_w: ratio.0,
            ratio_h: ratio.1,
            width: size.0,
            height: size.1,
        }
    }

    pub fn nominal_ratio(&self) -> f64 {
        self.ratio_w as f64 / self.ratio_h as f64
    }
}

/// Table order matters: ties in [`closest_aspect_ratio`] resolve to the earlier entry.
pub const SUPPORTED_RESOLUTIONS: [SupportedResolution; 5] = [
    SupportedResolution::new("16:9", (16, 9), (1280, 720)),
    SupportedResolution::new("9:16", (9, 16), (720, 1280)),
    SupportedResolution::new("1:1", (1, 1), (960, 960)),
    SupportedResolution::new("4:3", (4, 3), (1024, 768)),
    SupportedResolution::new("3:4", (3, 4), (768, 1024)),
];

pub fn closest_aspect_ratio(width: u32, height: u32) -> SupportedResolution {
    let aspect = width as f64 / height.max(1) as f64;
    SUPPORTED_RESOLUTIONS
        .iter()
        .copied()
        .min_by(|a, b| {
            let da = (a.nominal_ratio() - aspect).abs();
            let db = (b.nominal_ratio() - aspect).abs();
            da.total_cmp(&db)
        })
        .unwrap_or(SUPPORTED_RESOLUTIONS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_documented_examples() {
        assert_eq!(closest_aspect_ratio(1920, 1080).name, "16:9");
        assert_eq!(closest_aspect_ratio(1000, 1000).name, "1:1");
        assert_eq!(closest_aspect_ratio(100, 300).name, "9:16");
        assert_eq!(closest_aspect_ratio(800, 600).name, "4:3");
        assert_eq!(closest_aspect_ratio(600, 800).name, "3:4");
    }

    #[test]
    fn choice_minimizes_ratio_distance() {
        for (w, h) in [(1, 1), (3, 1), (1, 7), (1234, 987), (640, 481), (5000, 2812), (17, 19)] {
            let aspect = w as f64 / h as f64;
            let chosen = closest_aspect_ratio(w, h);
            let best = SUPPORTED_RESOLUTIONS
                .iter()
                .map(|r| (r.nominal_ratio() - aspect).abs())
                .fold(f64::INFINITY, f64::min);
            assert_eq!((chosen.nominal_ratio() - aspect).abs(), best, "{w}x{h}");
        }
    }

    #[test]
    fn table_sizes_match_their_ratios() {
        for r in SUPPORTED_RESOLUTIONS {
            assert_eq!(r.width * r.ratio_h, r.height * r.ratio_w, "{}", r.name);
        }
    }
}
