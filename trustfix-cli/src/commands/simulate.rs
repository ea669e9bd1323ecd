//! Scripted acquisition session.
//!
//! Drives a real session through a scripted user: a configurable number of
//! permission denials, a settings scenario, and a stream of fixes with an
//! optional spoofed segment. Prints every session event as it happens.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, ValueEnum};
use tokio::sync::broadcast::error::TryRecvError;

use trustfix::config::{AccuracyTier, AcquisitionConfig};
use trustfix::fix::LocationFix;
use trustfix::platform::SettingsVerdict;
use trustfix::service::TrustFixService;
use trustfix::session::SessionEvent;

use crate::sim::{SimDevice, SimPermissions, SimSettings, SimSource};

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum SettingsScenario {
    /// Device settings already satisfy the request.
    #[default]
    Ok,
    /// Settings need the interactive resolution prompt.
    Resolvable,
    /// Settings cannot be fixed interactively.
    Unsatisfiable,
}

impl From<SettingsScenario> for SettingsVerdict {
    fn from(scenario: SettingsScenario) -> Self {
        match scenario {
            SettingsScenario::Ok => SettingsVerdict::Satisfied,
            SettingsScenario::Resolvable => SettingsVerdict::Resolvable,
            SettingsScenario::Unsatisfiable => SettingsVerdict::Unsatisfiable,
        }
    }
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// How many times the scripted user denies the permission dialog.
    #[arg(long, default_value_t = 0)]
    pub denials: u32,

    /// Settings scenario.
    #[arg(long, value_enum, default_value = "ok")]
    pub settings: SettingsScenario,

    /// Reject the interactive settings resolution instead of accepting it.
    #[arg(long)]
    pub reject_resolution: bool,

    /// Number of fixes to deliver once subscribed.
    #[arg(long, default_value_t = 5)]
    pub fixes: u32,

    /// Deliver the fix with this (1-based) index as an OS-flagged mock.
    #[arg(long)]
    pub spoof_at: Option<u32>,

    /// Treat every fix as synthetic (config override).
    #[arg(long)]
    pub force_synthetic: bool,

    /// Let synthetic fixes become the best location anyway.
    #[arg(long)]
    pub accept_synthetic: bool,

    /// Starting latitude for the simulated track.
    #[arg(long, default_value_t = 53.630278)]
    pub lat: f64,

    /// Starting longitude for the simulated track.
    #[arg(long, default_value_t = 9.988333)]
    pub lon: f64,
}

pub fn run(args: &SimulateArgs) -> Result<(), Box<dyn Error>> {
    let config = AcquisitionConfig::new(
        AccuracyTier::High,
        Duration::from_secs(1),
        args.accept_synthetic,
    )?
    .with_force_synthetic(args.force_synthetic);

    let permissions = Arc::new(SimPermissions::default());
    let settings = Arc::new(SimSettings::new(args.settings.into()));
    let source = Arc::new(SimSource::default());

    let service = TrustFixService::new(
        config,
        permissions.clone(),
        settings.clone(),
        source.clone(),
        Arc::new(SimDevice),
    )?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(drive(args, &service, &permissions, &settings, &source));

    match service.best_fix() {
        Some(fix) => println!("final best fix: {fix}"),
        None => println!("final best fix: none"),
    }
    Ok(())
}

/// The scripted user: reacts to each event the way the scenario dictates.
async fn drive(
    args: &SimulateArgs,
    service: &TrustFixService,
    permissions: &SimPermissions,
    settings: &SimSettings,
    source: &SimSource,
) {
    let mut events = service.events();
    let mut denials_left = args.denials;

    service.start();

    // Negotiation phase: answer dialogs until updates flow or the machine
    // parks for good.
    loop {
        let event = match events.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Empty) => {
                if source.is_subscribed() {
                    break;
                }
                // Parked with nothing to answer (hard settings failure or a
                // permanent decline).
                println!("session parked before subscription");
                return;
            }
            Err(_) => return,
        };
        announce(&event);

        match event {
            SessionEvent::NeedPermission => {
                service.request_permission();
                if denials_left > 0 {
                    denials_left -= 1;
                    println!("user: deny");
                    service.on_permission_result(false);
                    service.start();
                } else {
                    println!("user: grant");
                    permissions.grant();
                    service.on_permission_result(true);
                }
            }
            SessionEvent::NeedSettingsChange => {
                service.begin_settings_resolution();
                if args.reject_resolution {
                    println!("user: reject settings change");
                    service.on_settings_resolution(false);
                } else {
                    println!("user: accept settings change");
                    settings.resolve();
                    service.on_settings_resolution(true);
                }
            }
            SessionEvent::PermanentlyDeclined | SessionEvent::FallbackToSystemSettings => {
                return;
            }
            SessionEvent::Error { .. } => return,
            _ => {}
        }
    }

    // Delivery phase: push the scripted track.
    println!("subscribed; delivering {} fixes", args.fixes);
    for i in 1..=args.fixes {
        let spoofed = args.spoof_at == Some(i);
        let fix = LocationFix::new(args.lat, args.lon + f64::from(i) * 0.0002, "gps")
            .with_accuracy(8.0)
            .with_synthetic(spoofed);
        service.on_fix(fix);
        tokio::time::sleep(Duration::from_millis(20)).await;

        while let Ok(event) = events.try_recv() {
            announce(&event);
        }
    }

    service.stop();
}

fn announce(event: &SessionEvent) {
    match event {
        SessionEvent::NewLocation(fix) => println!("event: new location {fix}"),
        SessionEvent::Error { kind, message } => println!("event: {kind} error - {message}"),
        other => println!("event: {}", other.name()),
    }
}
