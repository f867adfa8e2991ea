/// Unweighted mean of the red, green and blue channels on a 0-255 scale.
pub fn luminance(rgb: [u8; 3]) -> f32 {
    (f32::from(rgb[0]) + f32::from(rgb[1]) + f32::from(rgb[2])) / 3.0
}

pub fn adjusted_luminance(rgb: [u8; 3], inverse: bool) -> f32 {
    let lum = luminance(rgb);
    if inverse {
        255.0 - lum
    } else {
        lum
    }
}

/// Mean color and transparency of a block of RGBA pixels.
///
/// Fully transparent pixels do not contribute to the color. Returns `None`
/// when every pixel is fully transparent.
pub fn average_opaque(pixels: impl IntoIterator<Item = [u8; 4]>) -> Option<[u8; 3]> {
    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for px in pixels {
        if px[3] == 0 {
            continue;
        }
        for channel in 0..3 {
            sum[channel] += u64::from(px[channel]);
        }
        count += 1;
    }

    if count == 0 {
        return None;
    }
    Some(sum.map(|total| (total / count) as u8))
}
