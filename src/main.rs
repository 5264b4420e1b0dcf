//! Moves the focused window between the halves and the whole of each monitor
//! under WindowMaker

#![deny(
    clippy::all,
    clippy::complexity,
    clippy::correctness,
    clippy::nursery,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    absolute_paths_not_starting_with_crate,
    anonymous_parameters,
    bad_style,
    ellipsis_inclusive_range_patterns,
    exported_private_dependencies,
    ill_formed_attribute_input,
    improper_ctypes,
    keyword_idents,
    macro_use_extern_crate,
    meta_variable_misuse,
    missing_abi,
    no_mangle_generic_items,
    non_shorthand_field_patterns,
    noop_method_call,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    pub_use_of_private_extern_crate,
    semicolon_in_expressions_from_macros,
    trivial_casts,
    unconditional_recursion,
    unreachable_pub,
    unsafe_code,
    while_true
)]
#![allow(
    clippy::redundant_pub_crate,
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::cast_possible_wrap,
    clippy::doc_markdown,
    clippy::exit,
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::struct_excessive_bools,
    clippy::upper_case_acronyms,
    clippy::use_debug,
    clippy::print_stdout
)]
#![cfg_attr(
    any(test),
    allow(
        clippy::expect_used,
        clippy::panic,
        clippy::unwrap_used,
        clippy::wildcard_enum_match_arm,
    )
)]

mod cli;
mod config;
mod controller;
mod display;
mod error;
mod geometry;
mod macros;
mod monitor;
mod placement;
mod utils;
mod wmaker;
mod x;

use anyhow::Result;
use clap::Parser;
use cli::{Command, Opts};
use colored::Colorize;
use config::Config;
use controller::{Controller, Cycled, MonitorEntry, Settings};
use placement::DockSide;
use std::process::exit;
use wmaker::WmakerDefaults;
use x::xconnection::XConnection;

fn main() {
    let args = Opts::parse();

    match args.color_when.as_deref() {
        Some("always") => colored::control::set_override(true),
        Some("never") => colored::control::set_override(false),
        _ => {},
    }

    let config = match args.config.as_ref() {
        Some(path) => Config::load(path),
        None => Config::load_default(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => moveto_fatal!("{:#}", e),
    };

    // Kept alive so the log file is flushed on the way out
    let logger = match utils::initialize_logging(&config, &args) {
        Ok(handle) => Some(handle),
        Err(e) => {
            moveto_error!("failed to initialize logging: {:#}", e);
            None
        },
    };
    log::debug!("{}: {:#?}", "Configuration options".bright_blue(), config);

    let status = match run(&args, &config) {
        Ok(()) => 0,
        Err(e) => {
            moveto_error!("{:#}", e);
            1
        },
    };

    drop(logger);
    exit(status);
}

/// Build the [`Settings`] for a command. Only moving a window depends on
/// WindowMaker's defaults, so the file is left alone otherwise
fn settings(args: &Opts, config: &Config) -> Result<Settings> {
    let (monitor_name, dock_right, dock_left) = match &args.command {
        Command::Move {
            monitor_name,
            dock_right,
            dock_left,
            ..
        } => (monitor_name, *dock_right, *dock_left),
        _ => return Ok(config.settings(WmakerDefaults::default())),
    };

    let mut settings = config.settings(WmakerDefaults::load(config.wmaker_defaults_path())?);
    if monitor_name.is_some() {
        settings.dock_monitor = monitor_name.clone();
    }
    if dock_right || dock_left {
        settings.reserve.dock_side = if dock_right { DockSide::Right } else { DockSide::Left };
        settings.dock_at_edge = true;
    }

    Ok(settings)
}

/// Carry out the command given on the command line
fn run(args: &Opts, config: &Config) -> Result<()> {
    let settings = settings(args, config)?;
    let conn = XConnection::new(None)?;
    let controller = Controller::new(&conn, settings);

    match &args.command {
        Command::Move { direction, .. } => match controller.cycle(*direction)? {
            Cycled::Moved { to, geometry, .. } => {
                log::debug!("Window is now {} at {}", to.state, geometry);
            },
            Cycled::Boundary { at, snapped } =>
                if args.verbose > 0 {
                    moveto_info!(
                        "window is already {} at the {} end{}",
                        at.state,
                        direction,
                        if snapped { " (snapped into place)" } else { "" }
                    );
                },
        },
        Command::Mousemove { monitor_name } => {
            controller.send_cursor_to_monitor(monitor_name)?;
        },
        Command::Showmonitors { long, json } => {
            let monitors = controller.list_monitors()?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&monitors)?);
            } else {
                for monitor in &monitors {
                    println!("{}", format_monitor(monitor, *long));
                }
            }
        },
    }

    Ok(())
}

/// One line of `showmonitors`
fn format_monitor(monitor: &MonitorEntry, long: bool) -> String {
    if !long {
        return monitor.name.clone();
    }

    let mut line = format!("{:<12} {}", monitor.name.green().bold(), monitor.geometry);
    if monitor.primary {
        line.push_str(&format!(" {}", "primary".yellow()));
    }
    if monitor.active {
        line.push_str(&format!(" {}", "active".purple()));
    }

    line
}
