use super::*;

#[test]
fn opacity_maps_to_integer_scale() {
    assert_eq!(opacity_to_alpha(0.0), 0);
    assert_eq!(opacity_to_alpha(0.5), 128);
    assert_eq!(opacity_to_alpha(1.0), OPAQUE);
    assert_eq!(opacity_to_alpha(-3.0), 0);
    assert_eq!(opacity_to_alpha(7.5), OPAQUE);
    assert_eq!(opacity_to_alpha(f64::NAN), 0);
    assert_eq!(opacity_to_alpha(0.999), 256);
    assert_eq!(opacity_to_alpha(0.001), 0);
}

#[test]
fn best_tier_follows_caps() {
    assert_eq!(CpuCaps::scalar_only().best_tier(), KernelTier::Scalar);
    assert_eq!(CpuCaps { swar64: true }.best_tier(), KernelTier::Swar64);
}

#[test]
fn rows_for_reports_requested_tier() {
    assert_eq!(rows_for(KernelTier::Scalar).tier(), KernelTier::Scalar);
    assert_eq!(rows_for(KernelTier::Swar64).tier(), KernelTier::Swar64);
    assert_eq!(KernelTier::Swar64.to_string(), "swar64");
}
