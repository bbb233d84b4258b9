use std::{
    collections::BTreeMap,
    sync::{Arc, OnceLock},
};

use crate::{
    config::KernelPreference,
    foundation::error::{MixError, MixResult},
    kernels::{CpuCaps, KernelTier, rows_for},
    registry::descriptor::FormatDescriptor,
    video::format::{FormatInfo, Layout, PixelFormat},
};

/// Immutable map from pixel format to its [`FormatDescriptor`].
///
/// Built once from a capability probe. Lookups are plain reads, so a registry can be shared
/// across threads behind an `Arc` without locking.
#[derive(Debug)]
pub struct Registry {
    caps: CpuCaps,
    entries: BTreeMap<PixelFormat, FormatDescriptor>,
}

/// Families with a vectorized kernel set. The rest always run scalar.
fn has_vector_kernels(info: &FormatInfo) -> bool {
    matches!(
        info.layout,
        Layout::PackedAlpha { .. } | Layout::Planar { .. } | Layout::Packed422 { .. }
    )
}

impl Registry {
    /// Probe the CPU and pick the fastest tier per family.
    pub fn probe(pref: KernelPreference) -> Self {
        let caps = match pref {
            KernelPreference::Auto => CpuCaps::detect(),
            KernelPreference::Scalar => CpuCaps::scalar_only(),
        };
        Self::with_caps(caps)
    }

    pub fn with_caps(caps: CpuCaps) -> Self {
        let best = caps.best_tier();
        let entries = PixelFormat::ALL
            .into_iter()
            .filter_map(|f| f.info())
            .map(|info| {
                let tier = if has_vector_kernels(&info) {
                    best
                } else {
                    KernelTier::Scalar
                };
                (info.format, FormatDescriptor::new(info, rows_for(tier)))
            })
            .collect::<BTreeMap<_, _>>();
        tracing::debug!(tier = %best, formats = entries.len(), "built format registry");
        Self { caps, entries }
    }

    /// Force one tier for every format. Used for parity checks and benchmarks.
    pub fn with_tier(tier: KernelTier) -> Self {
        let entries = PixelFormat::ALL
            .into_iter()
            .filter_map(|f| f.info())
            .map(|info| (info.format, FormatDescriptor::new(info, rows_for(tier))))
            .collect();
        Self {
            caps: CpuCaps {
                swar64: tier == KernelTier::Swar64,
            },
            entries,
        }
    }

    /// Process-wide registry, probed on first use.
    ///
    /// `FRAMEMIX_KERNELS=scalar` in the environment forces the scalar tier.
    pub fn shared() -> Arc<Registry> {
        static SHARED: OnceLock<Arc<Registry>> = OnceLock::new();
        SHARED
            .get_or_init(|| Arc::new(Self::probe(KernelPreference::from_env())))
            .clone()
    }

    pub fn caps(&self) -> CpuCaps {
        self.caps
    }

    pub fn lookup(&self, format: PixelFormat) -> MixResult<&FormatDescriptor> {
        self.entries
            .get(&format)
            .ok_or_else(|| MixError::unsupported_format(format.name()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormatDescriptor> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/table.rs"]
mod tests;
