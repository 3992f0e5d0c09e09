// SPDX-License-Identifier: MPL-2.0

//! Status menu for Daikin units, in the plain-text format menu bar tools
//! such as xbar render.
//!
//! Without arguments, discovers units and prints one submenu per unit. Each
//! entry calls this program back as `menubar <ip> <command> <arg>`, which
//! applies the change and exits.
//!
//! # Usage
//!
//! ```bash
//! # Print the menu
//! cargo run --example menubar
//!
//! # Wait for two units with a longer budget
//! cargo run --example menubar -- --units 2 --slow
//!
//! # Apply a command
//! cargo run --example menubar -- 192.168.1.20 set_target_temp 22
//! ```
//!
//! Set `RUST_LOG=daikin_lib=debug` to see the protocol traffic on stderr.

use std::env;
use std::fmt::Write as _;

use daikin_lib::fleet::{UnitReport, snapshot_all};
use daikin_lib::types::{FanDirection, FanRate, Mode, Setpoint};
use daikin_lib::{Aircon, ControlCommand, DiscoveryOptions, HttpConfig, discover};
use tracing_subscriber::EnvFilter;

const TEMPERATURES: [f64; 9] = [18.0, 19.0, 20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 26.0];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    match args.as_slice() {
        [host, command, arg] if !host.starts_with("--") => apply(host, command, arg).await,
        _ => print_menu(&args).await,
    }
}

async fn apply(host: &str, name: &str, arg: &str) -> Result<(), Box<dyn std::error::Error>> {
    let command = ControlCommand::parse(name, arg)?;
    let aircon = Aircon::http(host).build_without_probe()?;
    command.apply(&aircon).await?;
    println!("{host}: {command}");
    Ok(())
}

async fn print_menu(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = if args.iter().any(|a| a == "--slow") {
        DiscoveryOptions::new()
    } else {
        DiscoveryOptions::quick()
    };
    if let Some(units) = args
        .iter()
        .position(|a| a == "--units")
        .and_then(|i| args.get(i + 1))
        .and_then(|n| n.parse().ok())
    {
        options = options.with_waitfor(units);
    }

    let units = discover(&options).await?;
    let reports = snapshot_all(units.addresses(), &HttpConfig::new("")).await;

    let program = env::args().next().unwrap_or_else(|| "menubar".to_string());
    println!("❄ {}", units.len());
    println!("---");

    if let Some(outdoor) = reports
        .iter()
        .filter_map(|r| r.result.as_ref().ok())
        .map(|s| s.sensor.outdoor_temperature)
        .find(|t| !t.is_unknown())
    {
        println!("Outside: {outdoor}°C");
        println!("---");
    }

    for report in &reports {
        print!("{}", render_unit(report, &program));
    }

    if reports.is_empty() {
        println!("No units found");
    }
    println!("---");
    println!("Refresh | refresh=true");
    Ok(())
}

fn render_unit(report: &UnitReport, program: &str) -> String {
    let host = &report.host;
    let snapshot = match &report.result {
        Ok(snapshot) => snapshot,
        Err(e) => return format!("{host}: {e} | color=red\n"),
    };

    let action = |label: &str, depth: usize, command: ControlCommand| {
        format!(
            "{}{label} | refresh=true terminal=false shell=\"{program}\" param1={host} param2={} param3={}\n",
            "--".repeat(depth),
            command.name(),
            command.argument()
        )
    };

    let control = &snapshot.control;
    let mut out = String::new();
    let mode = control.mode.map_or("?", |m| m.label());
    let _ = writeln!(
        out,
        "{:<18} {}°C ({mode})",
        snapshot.name(),
        snapshot.sensor.indoor_temperature
    );

    if !snapshot.is_on() {
        out.push_str(&action("Turn on", 1, ControlCommand::SetPower(true)));
        return out;
    }

    out.push_str(&action("Turn off", 1, ControlCommand::SetPower(false)));
    out.push_str("-----\n--Mode\n");
    for mode in Mode::SELECTABLE {
        out.push_str(&action(mode.label(), 2, ControlCommand::SetMode(mode)));
    }

    out.push_str("--Temperature\n");
    for degrees in TEMPERATURES {
        let label = format!("{degrees}°C");
        let target = ControlCommand::SetTargetTemperature(Setpoint::Celsius(degrees));
        out.push_str(&action(&label, 2, target));
    }

    out.push_str("--Fan\n----Rate\n");
    for rate in FanRate::ALL {
        out.push_str(&action(rate.label(), 3, ControlCommand::SetFanRate(rate)));
    }
    out.push_str("----Direction\n");
    for dir in FanDirection::ALL {
        out.push_str(&action(dir.label(), 3, ControlCommand::SetFanDirection(dir)));
    }

    out
}
