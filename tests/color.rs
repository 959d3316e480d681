use paint_play::color::{clip, clip_alpha};
use paint_play::{Color, PaintError};

#[test]
fn test_parse_literal_formats() {
    let rgba: Color = "rgba(10,20,30,0.5)".parse().unwrap();
    assert_eq!((rgba.red(), rgba.green(), rgba.blue()), (10, 20, 30));
    assert_eq!(rgba.alpha(), 0.5);

    let hex: Color = "#0a141e".parse().unwrap();
    assert_eq!((hex.red(), hex.green(), hex.blue()), (10, 20, 30));
    assert_eq!(hex.alpha(), 1.0);

    let rgb: Color = "rgb(10, 20, 30)".parse().unwrap();
    assert_eq!(rgb, hex);
}

#[test]
fn test_unknown_formats_rejected() {
    for bad in ["red", "hsl(0,0,0)", "#abc", "rgba(1,2,3)", "rgb(1,2,x)", ""] {
        assert!(
            matches!(bad.parse::<Color>(), Err(PaintError::InvalidColor(_))),
            "{:?} should not parse",
            bad
        );
    }
}

#[test]
fn test_only_plain_digits_accepted() {
    for bad in ["#+1+2+3", "#-1-2-3", "# 1 2 3", "rgb(NaN,0,0)", "rgb(inf,0,0)", "rgb(1e3,0,0)", "rgba(1,2,3,+1)"] {
        assert!(
            matches!(bad.parse::<Color>(), Err(PaintError::InvalidColor(_))),
            "{:?} should not parse",
            bad
        );
    }
    let negative: Color = "rgb(-5,0.5,300)".parse().unwrap();
    assert_eq!((negative.red(), negative.green(), negative.blue()), (0, 1, 255));
}

#[test]
fn test_display_round_trip() {
    for (r, g, b, a) in [(0.0, 0.0, 0.0, 0.0), (255.0, 128.0, 3.0, 0.25), (12.0, 300.0, -4.0, 0.8)] {
        let color = Color::from_rgba(r, g, b, a);
        assert_eq!(color.to_string().parse::<Color>().unwrap(), color);
    }
}

#[test]
fn test_channels_always_clamped() {
    for value in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -1.0, 1e12, 127.4] {
        let _ = clip(value);
        let alpha = clip_alpha(value);
        assert!((0.0..=1.0).contains(&alpha), "{} -> {}", value, alpha);
    }
    let color = Color::from_rgba(-5.0, 512.0, f32::NAN, f32::NAN);
    assert_eq!((color.red(), color.green(), color.blue()), (0, 255, 0));
    assert_eq!(color.alpha(), 0.0);
}
