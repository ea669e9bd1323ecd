//! Spoofing-environment fingerprint heuristics.
//!
//! Stateless checks used before any live fix exists: does this device look
//! like one set up to inject mock locations? Four ordered probes, each
//! independent, short-circuiting on the first hit:
//!
//! 1. the OS-level mock-location setting selects a mock app,
//! 2. an installed app holds the mock-location capability,
//! 3. the provider list carries a test/mock-named provider, or a test
//!    provider can be registered (capability probe),
//! 4. build identity strings match known virtualization/emulation/cloning
//!    markers.
//!
//! The result names which probe fired, for diagnostics. This is an advisory
//! signal only, NOT a security boundary: the mock-setting query is absent on
//! newer OS versions and the marker list is a curated best effort. Treat a
//! hit as grounds for distrust, never a miss as proof of integrity.

use std::fmt;

use crate::platform::{BuildProfile, DeviceInspector, LocationSource};

/// Name used for the register-a-test-provider capability probe.
const PROBE_PROVIDER_NAME: &str = "trustfix_probe";

/// Substrings that mark virtualized, emulated, or multi-instance builds.
const VIRTUAL_MARKERS: &[&str] = &[
    "parallel", "clone", "dual", "multiple", "2face", "2account", "virtual", "emulator",
    "genymotion", "bluestacks", "nox", "memu", "ldplayer", "andy", "simulator", "x86",
    "android sdk", "sdk_google", "google_sdk", "droid4x", "vbox", "virtualbox", "vmware",
    "qemu", "parallel space", "multi", "island", "shelter",
];

/// Hardware platform names of common emulators.
const EMULATOR_HARDWARE: &[&str] = &["goldfish", "ranchu", "vbox"];

/// Why the environment looks like one set up for location spoofing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpoofSignal {
    /// The OS mock-location setting selects a mock app.
    MockSettingSelected,
    /// The named package holds the mock-location capability.
    MockCapableApp(String),
    /// The named provider looks like a test/mock provider.
    SuspiciousProvider(String),
    /// The OS accepted registration of a test provider.
    TestProviderAccepted,
    /// The named build field matched a virtualization marker.
    VirtualizedBuild {
        /// Which identity string matched (`model`, `fingerprint`, ...).
        field: &'static str,
        /// The marker that matched.
        marker: String,
    },
    /// A retained fix from the named provider was OS-flagged as mock.
    MockFlaggedFix(String),
    /// A retained fix from the named provider failed sanity checks.
    SuspiciousFix(String),
}

impl fmt::Display for SpoofSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MockSettingSelected => write!(f, "mock-location setting selects a mock app"),
            Self::MockCapableApp(pkg) => write!(f, "mock-capable app installed: {pkg}"),
            Self::SuspiciousProvider(name) => write!(f, "suspicious provider: {name}"),
            Self::TestProviderAccepted => write!(f, "test provider registration accepted"),
            Self::VirtualizedBuild { field, marker } => {
                write!(f, "build {field} matches virtualization marker {marker:?}")
            }
            Self::MockFlaggedFix(provider) => {
                write!(f, "mock-flagged fix retained by provider {provider}")
            }
            Self::SuspiciousFix(provider) => {
                write!(f, "suspicious fix retained by provider {provider}")
            }
        }
    }
}

/// Run the four ordered probes, returning the first signal found.
pub fn assess_environment(
    inspector: &dyn DeviceInspector,
    source: &dyn LocationSource,
) -> Option<SpoofSignal> {
    // 1. OS mock-location setting. None means the signal does not exist on
    //    this OS version - no signal, not "false".
    if inspector.mock_setting_enabled() == Some(true) {
        tracing::info!("mock-location setting enabled in device settings");
        return Some(SpoofSignal::MockSettingSelected);
    }

    // 2. Installed apps holding the mock-location capability.
    if let Some(pkg) = inspector.mock_capable_apps().into_iter().next() {
        tracing::info!(package = %pkg, "mock-capable app installed");
        return Some(SpoofSignal::MockCapableApp(pkg));
    }

    // 3. Provider list and the registration probe.
    if let Some(signal) = scan_providers(source) {
        return Some(signal);
    }

    // 4. Build identity strings.
    build_signal(&inspector.build_profile())
}

/// Check 3: test/mock provider names and the capability probe.
fn scan_providers(source: &dyn LocationSource) -> Option<SpoofSignal> {
    for provider in source.providers() {
        if provider_name_suspicious(&provider) {
            tracing::info!(provider = %provider, "suspicious provider name");
            return Some(SpoofSignal::SuspiciousProvider(provider));
        }
    }
    if source.probe_test_provider(PROBE_PROVIDER_NAME) {
        tracing::info!("test provider registration accepted");
        return Some(SpoofSignal::TestProviderAccepted);
    }
    None
}

/// A provider identifier that reads like a test or mock source.
///
/// The bare `gps`/`network`/`passive` identifiers are fine; a gps-prefixed
/// name with extra characters usually means a replaced provider.
fn provider_name_suspicious(provider: &str) -> bool {
    let name = provider.to_lowercase();
    name.contains("test")
        || name.contains("mock")
        || (name.contains("gps") && name.len() > 3)
}

/// Check 4: match build identity strings against the marker lists.
pub fn build_signal(profile: &BuildProfile) -> Option<SpoofSignal> {
    let fields: [(&'static str, &str); 7] = [
        ("model", &profile.model),
        ("manufacturer", &profile.manufacturer),
        ("brand", &profile.brand),
        ("fingerprint", &profile.fingerprint),
        ("product", &profile.product),
        ("device", &profile.device),
        ("hardware", &profile.hardware),
    ];

    for (field, value) in fields {
        let value = value.to_lowercase();
        for marker in VIRTUAL_MARKERS {
            if value.contains(marker) {
                return Some(SpoofSignal::VirtualizedBuild {
                    field,
                    marker: (*marker).to_string(),
                });
            }
        }
    }

    // Anchored patterns the substring list cannot express.
    let fingerprint = profile.fingerprint.to_lowercase();
    if fingerprint.starts_with("generic") || fingerprint.contains("test-keys") {
        return Some(SpoofSignal::VirtualizedBuild {
            field: "fingerprint",
            marker: if fingerprint.starts_with("generic") {
                "generic".to_string()
            } else {
                "test-keys".to_string()
            },
        });
    }
    if profile.brand.to_lowercase().starts_with("generic") {
        return Some(SpoofSignal::VirtualizedBuild {
            field: "brand",
            marker: "generic".to_string(),
        });
    }
    if profile.device.to_lowercase().starts_with("generic") {
        return Some(SpoofSignal::VirtualizedBuild {
            field: "device",
            marker: "generic".to_string(),
        });
    }
    let product = profile.product.to_lowercase();
    if product.starts_with("sdk") || product.starts_with("vbox86t") {
        return Some(SpoofSignal::VirtualizedBuild {
            field: "product",
            marker: if product.starts_with("sdk") {
                "sdk".to_string()
            } else {
                "vbox86t".to_string()
            },
        });
    }
    for marker in EMULATOR_HARDWARE {
        if profile.hardware.to_lowercase().contains(marker) {
            return Some(SpoofSignal::VirtualizedBuild {
                field: "hardware",
                marker: (*marker).to_string(),
            });
        }
    }

    None
}
