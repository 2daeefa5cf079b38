//! Depth-conversion properties across the supported encodings.

use panelgfx::{Color, ColorDepth, Palette, PixelCopy, PixelSource};
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case::rgb332(ColorDepth::Rgb332, 32, 32, 64)]
#[case::rgb565(ColorDepth::Rgb565, 8, 4, 8)]
#[case::swap565(ColorDepth::Swap565, 8, 4, 8)]
#[case::rgb666(ColorDepth::Rgb666, 4, 4, 4)]
#[case::rgb888(ColorDepth::Rgb888, 1, 1, 1)]
#[case::swap888(ColorDepth::Swap888, 1, 1, 1)]
#[case::argb8888(ColorDepth::Argb8888, 1, 1, 1)]
fn round_trip_stays_within_quantization(
    #[case] depth: ColorDepth,
    #[case] r_step: i32,
    #[case] g_step: i32,
    #[case] b_step: i32,
) {
    for v in 0u32..=255 {
        let c = Color::new(v as u8, (255 - v) as u8, (v ^ 0x5A) as u8);
        let back = depth.from_raw(depth.to_raw(c, None), None);
        assert!((back.r as i32 - c.r as i32).abs() < r_step, "{depth:?} r at {v}");
        assert!((back.g as i32 - c.g as i32).abs() < g_step, "{depth:?} g at {v}");
        assert!((back.b as i32 - c.b as i32).abs() < b_step, "{depth:?} b at {v}");
    }
}

#[rstest]
#[case::full_red(Color::new(255, 0, 0))]
#[case::full_green(Color::new(0, 255, 0))]
#[case::full_blue(Color::new(0, 0, 255))]
#[case::white(Color::new(255, 255, 255))]
#[case::black(Color::new(0, 0, 0))]
fn primaries_round_trip_exactly(#[case] c: Color) {
    // Channel extremes survive every depth exactly under the
    // replication expansion rule.
    for depth in [
        ColorDepth::Rgb332,
        ColorDepth::Rgb565,
        ColorDepth::Swap565,
        ColorDepth::Rgb666,
        ColorDepth::Rgb888,
        ColorDepth::Swap888,
        ColorDepth::Argb8888,
    ] {
        let back = depth.from_raw(depth.to_raw(c, None), None);
        assert_eq!((back.r, back.g, back.b), (c.r, c.g, c.b), "{depth:?}");
    }
}

#[test]
fn oversize_palette_index_is_masked() {
    // An 8-bit source presenting index 200 against a
    // 16-entry palette resolves palette[200 & 0x0F].
    let palette = Palette::grayscale(16);
    let data = [200u8];
    let mut pc = PixelCopy::new(
        PixelSource::Buffer {
            data: &data,
            depth: ColorDepth::Rgb332,
        },
        1,
        1,
        ColorDepth::Rgb888,
        Some(&palette),
        None,
        None,
    );
    let mut out = [0u32; 1];
    assert_eq!(pc.copy_run(&mut out, 0, 1), 1);
    assert_eq!(out[0], palette.lookup(200 & 0x0F).to_rgb888());
}

proptest! {
    #[test]
    fn any_depth_pair_composes(v in 0u32..0xFFFFFF) {
        // Cross-depth conversion equals extract -> widen -> repack: going
        // through the logical color is the same as going through any
        // intermediate depth of equal or higher channel precision.
        let c = Color::from_rgb888(v);
        let via565 = ColorDepth::Rgb565.to_raw(c, None);
        let direct332 = ColorDepth::Rgb332.to_raw(c, None);
        let from565 = ColorDepth::Rgb332.to_raw(
            ColorDepth::Rgb565.from_raw(via565, None),
            None,
        );
        // 332 truncates harder than 565, so both routes agree.
        prop_assert_eq!(direct332, from565);
    }

    #[test]
    fn swapped_forms_agree_with_native(v in 0u32..0xFFFFFF) {
        let c = Color::from_rgb888(v);
        let native = ColorDepth::Rgb565.to_raw(c, None);
        let swapped = ColorDepth::Swap565.to_raw(c, None);
        prop_assert_eq!(native, (swapped & 0xFF) << 8 | swapped >> 8);

        let n888 = ColorDepth::Rgb888.to_raw(c, None);
        let s888 = ColorDepth::Swap888.to_raw(c, None);
        prop_assert_eq!(
            n888,
            (s888 & 0xFF) << 16 | (s888 & 0xFF00) | s888 >> 16
        );
    }
}
