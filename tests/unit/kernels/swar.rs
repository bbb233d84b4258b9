use super::*;

fn xorshift(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *state = x;
    x
}

fn random_bytes(state: &mut u64, n: usize) -> Vec<u8> {
    (0..n).map(|_| xorshift(state) as u8).collect()
}

#[test]
fn blend_bytes_matches_scalar_for_all_lengths() {
    let mut rng = 0x9E37_79B9_7F4A_7C15;
    for len in 0..67 {
        let src = random_bytes(&mut rng, len);
        let base = random_bytes(&mut rng, len);
        for a in [1u32, 37, 128, 200, 255] {
            let mut want = base.clone();
            let mut got = base.clone();
            ScalarRows.blend_bytes(&mut want, &src, a);
            SwarRows.blend_bytes(&mut got, &src, a);
            assert_eq!(got, want, "len={len} a={a}");
        }
    }
}

#[test]
fn blend_bytes_extremes_do_not_bleed_across_lanes() {
    let src = [255u8; 16];
    for a in 1..256 {
        let mut want = [255u8; 16];
        let mut got = [255u8; 16];
        ScalarRows.blend_bytes(&mut want, &src, a);
        SwarRows.blend_bytes(&mut got, &src, a);
        assert_eq!(got, want, "a={a}");
        assert!(got.iter().all(|&b| b == 255));
    }
}

#[test]
fn alpha_pixels_match_scalar() {
    let mut rng = 7;
    for px in [1usize, 2, 3, 17] {
        for alpha_at in [0usize, 3] {
            let src = random_bytes(&mut rng, px * 4);
            let base = random_bytes(&mut rng, px * 4);
            for a in [1u32, 64, 129, 255] {
                let mut want = base.clone();
                let mut got = base.clone();
                ScalarRows.blend_alpha_pixels(&mut want, &src, alpha_at, a);
                SwarRows.blend_alpha_pixels(&mut got, &src, alpha_at, a);
                assert_eq!(got, want);
            }
        }
    }
}

#[test]
fn fill_repeat_matches_scalar() {
    for len in 0..23 {
        let mut want = vec![0u8; len];
        let mut got = vec![9u8; len];
        ScalarRows.fill_repeat(&mut want, [10, 20, 30, 40]);
        SwarRows.fill_repeat(&mut got, [10, 20, 30, 40]);
        assert_eq!(got, want);
    }
}
