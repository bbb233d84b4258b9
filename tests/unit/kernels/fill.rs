use super::*;
use crate::{
    kernels::{scalar::ScalarRows, swar::SwarRows},
    video::format::PixelFormat,
};

const BLACK: [u8; 3] = [16, 128, 128];
const WHITE: [u8; 3] = [240, 128, 128];

fn info(f: PixelFormat) -> FormatInfo {
    f.info().unwrap()
}

#[test]
fn bt601_conversion_of_reference_colours() {
    assert_eq!(yuv_to_rgb(16, 128, 128), [0, 0, 0]);
    assert_eq!(yuv_to_rgb(240, 128, 128), [255, 255, 255]);
    assert_eq!(yuv_to_rgb(81, 90, 240), [254, 0, 0]);
}

#[test]
fn ayuv_color_fill_sets_opaque_alpha() {
    let i = info(PixelFormat::Ayuv);
    let mut f = Frame::new(i.format, 3, 2).unwrap();
    fill_color(&ScalarRows, &i, &mut f, BLACK);
    for px in f.data().chunks_exact(4) {
        assert_eq!(px, [0xFF, 16, 128, 128]);
    }
}

#[test]
fn xrgb_white_fill_zeroes_padding() {
    let i = info(PixelFormat::Xrgb);
    let mut f = Frame::new(i.format, 2, 1).unwrap();
    f.data_mut().fill(7);
    fill_color(&SwarRows, &i, &mut f, WHITE);
    assert_eq!(f.data(), &[0, 255, 255, 255, 0, 255, 255, 255]);
}

#[test]
fn rgb_fill_skips_stride_padding() {
    let i = info(PixelFormat::Bgr);
    let mut f = Frame::new(i.format, 1, 2).unwrap();
    fill_color(&ScalarRows, &i, &mut f, WHITE);
    assert_eq!(f.data(), &[255, 255, 255, 0, 255, 255, 255, 0]);
}

#[test]
fn yv12_fill_swaps_chroma_planes() {
    let i = info(PixelFormat::Yv12);
    let mut f = Frame::new(i.format, 2, 2).unwrap();
    fill_color(&ScalarRows, &i, &mut f, [50, 60, 70]);
    assert_eq!(f.plane(0).unwrap().row(0).unwrap()[..2], [50, 50]);
    assert_eq!(f.plane(1).unwrap().row(0).unwrap()[0], 70);
    assert_eq!(f.plane(2).unwrap().row(0).unwrap()[0], 60);
}

#[test]
fn checker_tiles_alternate_every_eight_pixels() {
    let i = info(PixelFormat::I420);
    let mut f = Frame::new(i.format, 20, 18).unwrap();
    fill_checker(&SwarRows, &i, &mut f);
    let luma = f.plane(0).unwrap();
    assert_eq!(luma.row(0).unwrap()[0], 80);
    assert_eq!(luma.row(0).unwrap()[7], 80);
    assert_eq!(luma.row(0).unwrap()[8], 160);
    assert_eq!(luma.row(0).unwrap()[16], 80);
    assert_eq!(luma.row(8).unwrap()[0], 160);
    assert_eq!(luma.row(8).unwrap()[8], 80);
    assert_eq!(luma.row(17).unwrap()[19], 80);
    let u = f.plane(1).unwrap();
    assert!(u.row(8).unwrap()[..10].iter().all(|&b| b == 128));
}

#[test]
fn checker_on_packed_formats_uses_grey_and_neutral_chroma() {
    let i = info(PixelFormat::Uyvy);
    let mut f = Frame::new(i.format, 10, 1).unwrap();
    fill_checker(&ScalarRows, &i, &mut f);
    assert_eq!(&f.data()[..4], &[128, 80, 128, 80]);
    assert_eq!(&f.data()[16..20], &[128, 160, 128, 160]);

    let i = info(PixelFormat::Argb);
    let mut f = Frame::new(i.format, 9, 1).unwrap();
    fill_checker(&ScalarRows, &i, &mut f);
    assert_eq!(&f.data()[..4], &[255, 80, 80, 80]);
    assert_eq!(&f.data()[32..36], &[255, 160, 160, 160]);
}

#[test]
fn fills_are_identical_across_tiers() {
    for format in PixelFormat::ALL {
        let Some(i) = format.info() else { continue };
        for (w, h) in [(1, 1), (7, 3), (17, 9), (33, 16)] {
            let mut a = Frame::new(format, w, h).unwrap();
            let mut b = Frame::new(format, w, h).unwrap();
            fill_checker(&ScalarRows, &i, &mut a);
            fill_checker(&SwarRows, &i, &mut b);
            assert_eq!(a.data(), b.data(), "{format} {w}x{h}");
            fill_color(&ScalarRows, &i, &mut a, WHITE);
            fill_color(&SwarRows, &i, &mut b, WHITE);
            assert_eq!(a.data(), b.data(), "{format} {w}x{h}");
        }
    }
}

#[test]
fn transparent_fill_zeroes_everything() {
    let mut f = Frame::new(PixelFormat::Rgba, 2, 2).unwrap();
    f.data_mut().fill(9);
    fill_transparent(&mut f);
    assert!(f.data().iter().all(|&b| b == 0));
}

#[test]
fn fills_stop_at_covered_bytes_on_padded_planes() {
    // 5x3 I420: luma stride 8, chroma 3 wide with stride 4.
    let i = info(PixelFormat::I420);
    let mut f = Frame::new(i.format, 5, 3).unwrap();
    f.data_mut().fill(9);

    fill_checker(&SwarRows, &i, &mut f);
    let luma = f.plane(0).unwrap();
    assert_eq!(luma.row(0).unwrap()[..5], [80; 5]);
    assert_eq!(luma.row(0).unwrap()[5..], [9; 3]);
    let cb = f.plane(1).unwrap();
    assert_eq!(cb.row(1).unwrap(), &[NEUTRAL, NEUTRAL, NEUTRAL, 9]);

    fill_color(&ScalarRows, &i, &mut f, [50, 60, 70]);
    assert_eq!(f.plane(0).unwrap().row(2).unwrap(), &[50, 50, 50, 50, 50, 9, 9, 9]);
    assert_eq!(f.plane(2).unwrap().row(0).unwrap(), &[70, 70, 70, 9]);
}
