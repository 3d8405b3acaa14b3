//! # LCD Display Tool
//!
//! Shows already-aggregated values on the lab's 2×16 LCD.
//!
//! ```bash
//! lcd-display local 22.3 55.0
//! lcd-display temp_group 18.0 24.0 21.0
//! lcd-display full_temp 18.0 3 24.0 7 21.0   # two screens, 2.5 s each
//! lcd-display --stdout weather 12.5 80.1 15  # draw on the terminal
//! lcd-display "Bonjour la classe"            # free text
//! ```
//!
//! A display failure is logged and the tool still exits 0; only a missing
//! mode exits 1.

use anyhow::Result;
use clap::{error::ErrorKind, Parser};
use lab_weather_lib::config::Config;
use lab_weather_lib::display::{DisplayPlan, Renderer, SurfaceAddress};
use lab_weather_lib::layout;
use lab_weather_lib::logging;
use lab_weather_lib::terminal::TerminalSurface;
use lab_weather_lib::timing::ThreadSleep;
use tracing::{info, warn};

/// Render values on the 16x2 LCD
#[derive(Parser, Debug)]
#[command(name = "lcd-display")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Draw on the terminal instead of the LCD
    #[arg(long)]
    stdout: bool,

    /// local, temp_group, humid_group, weather, full_temp, full_humid, or free text
    mode: String,

    /// Values for the mode
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    data: Vec<String>,
}

/// Exit status for a rejected command line. Help and version are not errors.
fn exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn parse_args() -> Args {
    Args::try_parse().unwrap_or_else(|err| {
        let code = exit_code(&err);
        let _ = err.print();
        std::process::exit(code)
    })
}

fn render_on_terminal(plan: &DisplayPlan, address: SurfaceAddress) -> bool {
    Renderer::new(TerminalSurface::stdout(), ThreadSleep, address).render(plan)
}

#[cfg(all(target_os = "linux", feature = "hardware"))]
fn render_on_lcd(plan: &DisplayPlan, address: SurfaceAddress) -> bool {
    use lab_weather_lib::hw_i2c::RppalConnector;
    use lab_weather_lib::lcd1602::LcdSurface;

    let surface = LcdSurface::new(RppalConnector, ThreadSleep);
    Renderer::new(surface, ThreadSleep, address).render(plan)
}

#[cfg(not(all(target_os = "linux", feature = "hardware")))]
fn render_on_lcd(plan: &DisplayPlan, address: SurfaceAddress) -> bool {
    warn!("LCD support not enabled, rebuild with --features hardware; drawing on the terminal");
    render_on_terminal(plan, address)
}

fn main() -> Result<()> {
    let args = parse_args();
    logging::init("info");

    let config = Config::load();
    let address = config.display.surface_address();
    let plan = layout::plan(&args.mode, &args.data);
    info!(mode = %args.mode, values = args.data.len(), "rendering display plan");

    let ok = if args.stdout {
        render_on_terminal(&plan, address)
    } else {
        render_on_lcd(&plan, address)
    };

    if !ok {
        warn!("display update failed");
    }
    Ok(())
}
