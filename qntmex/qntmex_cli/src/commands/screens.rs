//! Headless walk through the wallet screens

use clap::Args;
use qntmex_core::flow::{self, Event};
use qntmex_core::{Report, Result};

/// Arguments for the screens command
#[derive(Args)]
pub struct ScreensArgs {
    /// Event to send, repeatable: wait, next, import, create, back,
    /// toggle-biometric, confirm-import, confirm-seed-saved,
    /// edit:<field>=<text> and toggle-visibility:<field>, where <field> is
    /// seed, password or confirm-password.
    /// Without any, walks the create-wallet path.
    #[clap(long = "event")]
    pub events: Vec<Event>,
}

/// Implementation of the screens command
pub fn execute_screens(args: &ScreensArgs) -> Result<Report> {
    let events = if args.events.is_empty() {
        flow::create_path()
    } else {
        args.events.clone()
    };
    Ok(flow::replay(events)?)
}
