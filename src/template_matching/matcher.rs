/// Template matching implementation
///
/// Multi-scale correlation-coefficient matching (zero-mean normalized
/// cross-correlation) of a grayscale template against a grayscale screen.
use super::error::MatchError;
use super::resize::resize_area;
use super::types::{ImageSource, MatchResult, Region};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::template_matching::{MatchTemplateMethod, find_extremes};

/// Correlation surface, one value per template placement
pub type CorrelationSurface = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Decode a source into 8-bit grayscale
pub fn load_gray(source: ImageSource<'_>) -> Result<GrayImage, MatchError> {
    match source {
        ImageSource::Path(path) => image::open(path)
            .map(|img| img.to_luma8())
            .map_err(|source| MatchError::ImageLoad {
                path: path.to_path_buf(),
                source,
            }),
        ImageSource::Decoded(img) => Ok(img.to_luma8()),
    }
}

/// Find the best match of `template` in `screen` over every factor in `scales`
///
/// Both inputs are converted to grayscale first. Scales whose resized template
/// does not fit inside the screen are skipped.
pub fn match_template<'a, 'b>(
    screen: impl Into<ImageSource<'a>>,
    template: impl Into<ImageSource<'b>>,
    scales: &[f32],
) -> Result<MatchResult, MatchError> {
    let (screen, template) = (screen.into(), template.into());
    log::debug!("Matching {} in {}", template.describe(), screen.describe());
    let screen_gray = load_gray(screen)?;
    let template_gray = load_gray(template)?;
    match_gray(&screen_gray, &template_gray, scales)
}

/// [`match_template`] over already decoded grayscale images
pub fn match_gray(
    screen: &GrayImage,
    template: &GrayImage,
    scales: &[f32],
) -> Result<MatchResult, MatchError> {
    if scales.is_empty() {
        return Err(MatchError::EmptyScaleSet);
    }

    let mut best: Option<MatchResult> = None;

    for &scale in scales {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(MatchError::InvalidScale { scale });
        }

        let scaled = resize_area(template, scale);
        if scaled.width() > screen.width() || scaled.height() > screen.height() {
            log::debug!(
                "⚠️ Skipping scale {:.2}: template {}x{} larger than screen {}x{}",
                scale,
                scaled.width(),
                scaled.height(),
                screen.width(),
                screen.height()
            );
            continue;
        }

        let surface = correlation_coefficient_normed(screen, &scaled);
        let extremes = find_extremes(&surface);
        let (x, y) = extremes.max_value_location;

        log::debug!(
            "🔍 Scale {:.2}: template {}x{}, best {:.3} at ({},{})",
            scale,
            scaled.width(),
            scaled.height(),
            extremes.max_value,
            x,
            y
        );

        if best.is_none_or(|b| extremes.max_value > b.confidence) {
            best = Some(MatchResult {
                confidence: extremes.max_value,
                region: Region::new(x, y, scaled.width(), scaled.height()),
                scale,
            });
        }
    }

    best.ok_or_else(|| MatchError::NoScaleFits {
        template_width: template.width(),
        template_height: template.height(),
        image_width: screen.width(),
        image_height: screen.height(),
        scales: scales.to_vec(),
    })
}

/// Normalized correlation coefficient of `template` at every placement in `image`
///
/// Values lie in [-1, 1]. A flat template correlates perfectly everywhere; a flat
/// image window against a textured template scores 0.
///
/// The caller guarantees the template fits inside the image.
pub fn correlation_coefficient_normed(image: &GrayImage, template: &GrayImage) -> CorrelationSurface {
    let (tw, th) = template.dimensions();
    let n = (tw as f64) * (th as f64);

    let cross = imageproc::template_matching::match_template(
        image,
        template,
        MatchTemplateMethod::CrossCorrelation,
    );

    let (t_sum, t_sq_sum) = template.pixels().fold((0.0f64, 0.0f64), |(s, sq), p| {
        let v = p[0] as f64;
        (s + v, sq + v * v)
    });
    let t_mean = t_sum / n;
    let t_norm = (t_sq_sum - t_sum * t_mean).max(0.0).sqrt();

    if t_norm < f64::EPSILON {
        return CorrelationSurface::from_pixel(cross.width(), cross.height(), Luma([1.0]));
    }

    let sums = IntegralSums::new(image);

    CorrelationSurface::from_fn(cross.width(), cross.height(), |x, y| {
        let (w_sum, w_sq_sum) = sums.window(x, y, tw, th);
        let w_norm = (w_sq_sum - w_sum * w_sum / n).max(0.0).sqrt();
        let num = cross.get_pixel(x, y)[0] as f64 - w_sum * t_mean;
        let denom = w_norm * t_norm;

        let value = if num.abs() < denom {
            num / denom
        } else if num.abs() < denom * 1.125 {
            num.signum()
        } else {
            0.0
        };
        Luma([value.clamp(-1.0, 1.0) as f32])
    })
}

/// Summed-area tables of pixel values and squared pixel values
struct IntegralSums {
    stride: usize,
    sum: Vec<f64>,
    sq_sum: Vec<f64>,
}

impl IntegralSums {
    fn new(image: &GrayImage) -> Self {
        let (w, h) = image.dimensions();
        let stride = w as usize + 1;
        let mut sum = vec![0.0f64; stride * (h as usize + 1)];
        let mut sq_sum = sum.clone();

        for y in 0..h as usize {
            let mut row = 0.0f64;
            let mut row_sq = 0.0f64;
            for x in 0..w as usize {
                let v = image.get_pixel(x as u32, y as u32)[0] as f64;
                row += v;
                row_sq += v * v;
                let idx = (y + 1) * stride + x + 1;
                sum[idx] = sum[idx - stride] + row;
                sq_sum[idx] = sq_sum[idx - stride] + row_sq;
            }
        }

        Self {
            stride,
            sum,
            sq_sum,
        }
    }

    /// Sum and squared sum of the `w`x`h` window with top-left (x, y)
    fn window(&self, x: u32, y: u32, w: u32, h: u32) -> (f64, f64) {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + w as usize, y0 + h as usize);
        let at = |table: &[f64], xx: usize, yy: usize| table[yy * self.stride + xx];
        let rect = |table: &[f64]| at(table, x1, y1) - at(table, x0, y1) - at(table, x1, y0) + at(table, x0, y0);
        (rect(&self.sum), rect(&self.sq_sum))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_matching::resize::resize_area;
    use crate::test_support::{noise_image, paste};
    use image::DynamicImage;

    #[test]
    fn test_finds_pasted_template() {
        let template = noise_image(20, 12, 7);
        let mut screen = noise_image(120, 90, 1);
        paste(&mut screen, &template, 37, 51);

        let result = match_gray(&screen, &template, &[1.0]).unwrap();
        assert_eq!(result.region, Region::new(37, 51, 20, 12));
        assert!(result.confidence > 0.999, "got {}", result.confidence);
        assert_eq!(result.scale, 1.0);
    }

    #[test]
    fn test_absent_template_scores_low() {
        let template = noise_image(20, 12, 7);
        let screen = noise_image(120, 90, 1);

        let result = match_gray(&screen, &template, &[1.0]).unwrap();
        assert!(result.confidence < 0.5, "got {}", result.confidence);
    }

    #[test]
    fn test_identity_scale_equals_single_scale_correlation() {
        let template = noise_image(16, 10, 3);
        let mut screen = noise_image(80, 60, 2);
        paste(&mut screen, &template, 5, 40);

        let surface = correlation_coefficient_normed(&screen, &template);
        let extremes = find_extremes(&surface);
        let result = match_gray(&screen, &template, &[1.0]).unwrap();

        assert_eq!(result.confidence, extremes.max_value);
        assert_eq!(
            (result.region.x, result.region.y),
            extremes.max_value_location
        );
        assert_eq!((result.region.width, result.region.height), (16, 10));
    }

    #[test]
    fn test_path_and_decoded_inputs_agree() {
        let dir = tempfile::tempdir().unwrap();
        let template = noise_image(18, 14, 11);
        let mut screen = noise_image(100, 70, 4);
        paste(&mut screen, &template, 60, 9);

        let screen_path = dir.path().join("screen.png");
        let template_path = dir.path().join("template.png");
        screen.save(&screen_path).unwrap();
        template.save(&template_path).unwrap();

        let screen_img = DynamicImage::ImageLuma8(screen);
        let template_img = DynamicImage::ImageLuma8(template);

        let from_paths = match_template(&screen_path, &template_path, &[1.0]).unwrap();
        let from_memory = match_template(&screen_img, &template_img, &[1.0]).unwrap();
        let mixed = match_template(&screen_path, &template_img, &[1.0]).unwrap();

        assert_eq!(from_paths, from_memory);
        assert_eq!(from_paths, mixed);
        assert_eq!(from_paths.region, Region::new(60, 9, 18, 14));
    }

    #[test]
    fn test_colour_input_is_converted_to_grayscale() {
        let template = noise_image(18, 14, 11);
        let mut screen = noise_image(100, 70, 4);
        paste(&mut screen, &template, 22, 30);

        let gray = match_gray(&screen, &template, &[1.0]).unwrap();
        let rgb_screen = DynamicImage::ImageLuma8(screen).to_rgb8();
        let rgb = match_template(
            &DynamicImage::ImageRgb8(rgb_screen),
            &DynamicImage::ImageLuma8(template),
            &[1.0],
        )
        .unwrap();

        assert_eq!(gray.region, rgb.region);
        assert!((gray.confidence - rgb.confidence).abs() < 1e-4);
    }

    #[test]
    fn test_winning_scale_sets_region_size() {
        let base = noise_image(40, 24, 21);
        let shrunk = resize_area(&base, 0.5);
        let mut screen = noise_image(120, 90, 5);
        paste(&mut screen, &shrunk, 30, 20);

        let result = match_gray(&screen, &base, &[1.0, 0.5]).unwrap();
        assert_eq!(result.scale, 0.5);
        assert_eq!(result.region, Region::new(30, 20, 20, 12));
        assert!(result.confidence > 0.999, "got {}", result.confidence);
    }

    #[test]
    fn test_oversized_scale_is_skipped() {
        let template = noise_image(20, 12, 7);
        let mut screen = noise_image(60, 40, 1);
        paste(&mut screen, &template, 10, 10);

        // 4x the template no longer fits; 1.0 still wins
        let result = match_gray(&screen, &template, &[4.0, 1.0]).unwrap();
        assert_eq!(result.scale, 1.0);
        assert_eq!(result.region, Region::new(10, 10, 20, 12));
    }

    #[test]
    fn test_empty_scale_set_is_rejected() {
        let template = noise_image(4, 4, 1);
        let screen = noise_image(10, 10, 2);
        assert!(matches!(
            match_gray(&screen, &template, &[]),
            Err(MatchError::EmptyScaleSet)
        ));
    }

    #[test]
    fn test_non_positive_scale_is_rejected() {
        let template = noise_image(4, 4, 1);
        let screen = noise_image(10, 10, 2);
        assert!(matches!(
            match_gray(&screen, &template, &[1.0, 0.0]),
            Err(MatchError::InvalidScale { .. })
        ));
    }

    #[test]
    fn test_template_larger_than_screen() {
        let template = noise_image(30, 30, 1);
        let screen = noise_image(20, 20, 2);
        assert!(matches!(
            match_gray(&screen, &template, &[1.0]),
            Err(MatchError::NoScaleFits { .. })
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.png");
        let template = DynamicImage::ImageLuma8(noise_image(4, 4, 1));

        match match_template(&missing, &template, &[1.0]) {
            Err(MatchError::ImageLoad { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected ImageLoad error, got {other:?}"),
        }
    }

    #[test]
    fn test_flat_template_correlates_everywhere() {
        let template = GrayImage::from_pixel(5, 5, Luma([128]));
        let screen = noise_image(20, 20, 9);
        let surface = correlation_coefficient_normed(&screen, &template);
        assert!(surface.pixels().all(|p| p[0] == 1.0));
    }

    #[test]
    fn test_flat_window_scores_zero() {
        let template = noise_image(5, 5, 9);
        let screen = GrayImage::from_pixel(20, 20, Luma([40]));
        let surface = correlation_coefficient_normed(&screen, &template);
        assert!(surface.pixels().all(|p| p[0] == 0.0));
    }

    #[test]
    fn test_inverted_template_scores_minus_one() {
        let template = noise_image(8, 8, 13);
        let inverted = GrayImage::from_fn(8, 8, |x, y| Luma([255 - template.get_pixel(x, y)[0]]));
        let mut screen = noise_image(30, 30, 14);
        paste(&mut screen, &inverted, 4, 6);

        let surface = correlation_coefficient_normed(&screen, &template);
        let extremes = find_extremes(&surface);
        assert!(extremes.min_value < -0.999);
        assert_eq!(extremes.min_value_location, (4, 6));
    }
}
