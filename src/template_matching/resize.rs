/// Template rescaling
///
/// Shrinking averages every source pixel a destination pixel covers, weighted by
/// the covered fraction (area interpolation). Enlarging falls back to bilinear.
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};

/// Size of a `width`x`height` image scaled by `scale`, never below 1x1
pub fn scaled_dimensions(width: u32, height: u32, scale: f32) -> (u32, u32) {
    let scale = scale as f64;
    let w = (width as f64 * scale).round().max(1.0) as u32;
    let h = (height as f64 * scale).round().max(1.0) as u32;
    (w, h)
}

/// Resize a grayscale template by `(scale, scale)`
pub fn resize_area(template: &GrayImage, scale: f32) -> GrayImage {
    let (src_w, src_h) = template.dimensions();
    let (dst_w, dst_h) = scaled_dimensions(src_w, src_h, scale);

    if dst_w == src_w && dst_h == src_h {
        return template.clone();
    }
    if dst_w > src_w || dst_h > src_h {
        return imageops::resize(template, dst_w, dst_h, FilterType::Triangle);
    }

    let box_size = 1.0 / scale as f64;
    let columns = coverage_table(src_w, dst_w, box_size);
    let rows = coverage_table(src_h, dst_h, box_size);

    GrayImage::from_fn(dst_w, dst_h, |dx, dy| {
        let mut acc = 0.0f64;
        let mut area = 0.0f64;
        for &(sy, wy) in &rows[dy as usize] {
            for &(sx, wx) in &columns[dx as usize] {
                let weight = wx * wy;
                acc += weight * template.get_pixel(sx, sy)[0] as f64;
                area += weight;
            }
        }
        let value = if area > 0.0 { acc / area } else { 0.0 };
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

/// For every destination index, the source indices it covers and by how much
fn coverage_table(src_len: u32, dst_len: u32, box_size: f64) -> Vec<Vec<(u32, f64)>> {
    let src_end = src_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = (d as f64 * box_size).min(src_end);
            let end = ((d + 1) as f64 * box_size).min(src_end);
            let mut cells = Vec::new();
            let mut s = start.floor() as u32;
            while (s as f64) < end && s < src_len {
                let lo = start.max(s as f64);
                let hi = end.min((s + 1) as f64);
                if hi > lo {
                    cells.push((s, hi - lo));
                }
                s += 1;
            }
            // Rounding can leave the last destination pixel past the source edge
            if cells.is_empty() {
                cells.push((src_len - 1, 1.0));
            }
            cells
        })
        .collect()
}
