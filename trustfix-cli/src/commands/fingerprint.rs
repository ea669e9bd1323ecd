//! Offline build fingerprint assessment.
//!
//! Feeds a set of build identity strings through the virtualization-marker
//! checks without touching any session machinery. Useful for vetting the
//! marker list against real device reports.

use std::error::Error;

use clap::Args;

use trustfix::fingerprint::build_signal;
use trustfix::platform::BuildProfile;

#[derive(Args, Debug)]
pub struct FingerprintArgs {
    /// Marketing model name.
    #[arg(long, default_value = "")]
    pub model: String,

    /// Device manufacturer.
    #[arg(long, default_value = "")]
    pub manufacturer: String,

    /// Consumer brand.
    #[arg(long, default_value = "")]
    pub brand: String,

    /// Full build fingerprint string.
    #[arg(long = "build-fingerprint", default_value = "")]
    pub fingerprint: String,

    /// Product code name.
    #[arg(long, default_value = "")]
    pub product: String,

    /// Industrial device name.
    #[arg(long, default_value = "")]
    pub device: String,

    /// Hardware platform name.
    #[arg(long, default_value = "")]
    pub hardware: String,
}

pub fn run(args: &FingerprintArgs) -> Result<(), Box<dyn Error>> {
    let profile = BuildProfile {
        model: args.model.clone(),
        manufacturer: args.manufacturer.clone(),
        brand: args.brand.clone(),
        fingerprint: args.fingerprint.clone(),
        product: args.product.clone(),
        device: args.device.clone(),
        hardware: args.hardware.clone(),
    };

    match build_signal(&profile) {
        Some(signal) => println!("spoofing marker: {signal}"),
        None => println!("no virtualization markers in the supplied strings"),
    }
    Ok(())
}
