use tiny_skia::Pixmap;

/// Number of box blur passes; three passes approximate a gaussian
pub const BLUR_PASSES: usize = 3;

/// Box radius matching a shadow blur amount
pub fn blur_radius(blur: f32) -> u32 {
    if blur.is_finite() && blur > 0.0 {
        (blur / 2.0).round() as u32
    } else {
        0
    }
}

/// Pixels the glow can spread beyond the shape it surrounds
pub fn blur_margin(blur: f32) -> u32 {
    blur_radius(blur) * BLUR_PASSES as u32 + 1
}

/// Blurs a premultiplied pixmap in place with repeated separable box blurs.
pub fn blur_pixmap(pixmap: &mut Pixmap, radius: u32) {
    if radius == 0 {
        return;
    }
    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let data = pixmap.data_mut();
    let mut temp = vec![0u8; data.len()];

    for _ in 0..BLUR_PASSES {
        box_blur_pass(data, &mut temp, width, height, radius as usize, true);
        box_blur_pass(&temp, data, width, height, radius as usize, false);
    }
}

/// One sliding-window pass over every row (or column). Samples outside the
/// buffer count as transparent.
fn box_blur_pass(src: &[u8], dst: &mut [u8], width: usize, height: usize, radius: usize, horizontal: bool) {
    let (lines, len) = if horizontal { (height, width) } else { (width, height) };
    let div = (2 * radius + 1) as u32;
    let index = |line: usize, pos: usize| -> usize {
        if horizontal {
            (line * width + pos) * 4
        } else {
            (pos * width + line) * 4
        }
    };

    for line in 0..lines {
        let mut sum = [0u32; 4];
        for pos in 0..=radius.min(len - 1) {
            let i = index(line, pos);
            for c in 0..4 {
                sum[c] += src[i + c] as u32;
            }
        }

        for pos in 0..len {
            let i = index(line, pos);
            for c in 0..4 {
                dst[i + c] = (sum[c] / div) as u8;
            }

            // Slide the window one pixel forward
            if pos >= radius {
                let leave = index(line, pos - radius);
                for c in 0..4 {
                    sum[c] -= src[leave + c] as u32;
                }
            }
            if pos + radius + 1 < len {
                let enter = index(line, pos + radius + 1);
                for c in 0..4 {
                    sum[c] += src[enter + c] as u32;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blur_spreads_and_conserves_premultiplication() {
        let mut pixmap = Pixmap::new(21, 21).unwrap();
        let center = (10 * 21 + 10) * 4;
        pixmap.data_mut()[center..center + 4].copy_from_slice(&[200, 100, 0, 255]);

        blur_pixmap(&mut pixmap, 2);

        let data = pixmap.data();
        assert!(data[center + 3] < 255);
        let neighbour = (10 * 21 + 13) * 4;
        assert!(data[neighbour + 3] > 0);
        for px in data.chunks_exact(4) {
            assert!(px[0] <= px[3] && px[1] <= px[3] && px[2] <= px[3]);
        }
    }

    #[test]
    fn test_zero_radius_is_noop() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        pixmap.data_mut()[0..4].copy_from_slice(&[10, 10, 10, 10]);
        blur_pixmap(&mut pixmap, 0);
        assert_eq!(&pixmap.data()[0..4], &[10, 10, 10, 10]);
        assert_eq!(blur_radius(f32::NAN), 0);
        assert_eq!(blur_radius(25.0), 13);
    }
}
