// Synthetic image fixtures shared by unit tests
use image::{GrayImage, Luma};

/// Deterministic pseudo-random texture; different seeds do not correlate
pub fn noise_image(width: u32, height: u32, seed: u64) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let mut v = (x as u64)
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add((y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F))
            .wrapping_add(seed.wrapping_mul(0x1656_67B1_9E37_79F9));
        v ^= v >> 33;
        v = v.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
        v ^= v >> 33;
        v = v.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
        v ^= v >> 33;
        Luma([(v & 0xFF) as u8])
    })
}

/// Copy `patch` into `screen` with its top-left corner at (x, y)
pub fn paste(screen: &mut GrayImage, patch: &GrayImage, x: u32, y: u32) {
    image::imageops::replace(screen, patch, x as i64, y as i64);
}
