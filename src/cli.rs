//! The command line arguments

use crate::{placement::Direction, utils::wants_color};
use clap::{crate_description, crate_version, AppSettings, Parser, Subcommand, ValueHint};
use once_cell::sync::Lazy;
use std::{env, fs, path::PathBuf};

/// Options for the [`moveto`] program
#[derive(Parser, Clone, Debug, PartialEq)]
#[clap(
    version = crate_version!(),
    about = <String as AsRef<str>>::as_ref(&APP_ABOUT),
    after_help =  <String as AsRef<str>>::as_ref(&AFTER_HELP),
    override_usage =  <String as AsRef<str>>::as_ref(&OVERRIDE_HELP),
    max_term_width = 100,
    color = clap::ColorChoice::Auto,
    global_setting = AppSettings::DeriveDisplayOrder,
    disable_help_subcommand = true,
    infer_subcommands = true,
)]
pub(crate) struct Opts {
    /// Display debugging messages on various levels
    #[clap(
        long,
        short,
        global = true,
        parse(from_occurrences),
        long_help = "
        Set the verbosity level of the program. Only warnings are shown by default. `-v` shows \
                     INFO messages, `-vv` DEBUG messages and `-vvv` TRACE messages. The \
                     verbosity can also be set with the `MOVETO_LOG` environment variable"
    )]
    pub(crate) verbose: u8,

    /// Location of configuration file
    #[clap(
        long,
        short,
        global = true,
        takes_value = true,
        number_of_values = 1,
        value_name = "file",
        value_hint = ValueHint::FilePath,
        validator = |t| {
            fs::metadata(
                PathBuf::from(t).components()
                    .count()
                    .gt(&1_usize)
                    .then(|| PathBuf::from(t))
                    .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(t)),
            )
            .map_err(|_| "must be a valid path")
            .map(|_| ())
            .map_err(|e| e.to_string())
        },
        long_help = "\
        Specify the location of the configuration file. The default location is \
                `$XDG_CONFIG_HOME/moveto/moveto.yml`"
    )]
    pub(crate) config: Option<PathBuf>,

    /// When to colorize output
    #[clap(
        name = "color",
        long = "color",
        short = 'C',
        global = true,
        value_name = "when",
        possible_values = &["never", "auto", "always"],
        long_help = "\
        When to colorize output (usually meant for piping). Valid values are: always, \
                auto, never"
    )]
    pub(crate) color_when: Option<String>,

    #[clap(subcommand)]
    pub(crate) command: Command,
}

/// What `moveto` should do
#[derive(Subcommand, Clone, Debug, PartialEq)]
pub(crate) enum Command {
    /// Move the focused window one placement to the left or right
    #[clap(
        name = "move",
        long_about = "\
        Cycle the focused window through the left half, the whole and the right half of each \
                      monitor, going from monitor to monitor. The window stops at the leftmost \
                      and rightmost ends"
    )]
    Move {
        /// Direction to move the window in
        #[clap(arg_enum, value_name = "direction")]
        direction: Direction,

        /// Name of the monitor carrying the dock
        #[clap(long, short, value_name = "name")]
        monitor_name: Option<String>,

        /// The dock is on the right side of the screen
        #[clap(long, short = 'r', conflicts_with = "dock-left")]
        dock_right: bool,

        /// The dock is on the left side of the screen
        #[clap(long, short = 'l')]
        dock_left: bool,
    },

    /// Send the pointer to the center of a monitor
    #[clap(name = "mousemove")]
    Mousemove {
        /// Name of the monitor
        #[clap(long, short, value_name = "name", required = true)]
        monitor_name: String,
    },

    /// List the connected monitors from left to right
    #[clap(name = "showmonitors")]
    Showmonitors {
        /// Also show geometry and which monitors are primary or active
        #[clap(long, short)]
        long: bool,

        /// Print the monitors as JSON
        #[clap(long, short, conflicts_with = "long")]
        json: bool,
    },
}

// =============== Prettify Help ==================

/// Yellow ansi code
const YELLOW: &str = "\x1b[0;33m";
/// Green ansi code
const GREEN: &str = "\x1b[0;32m";
/// Bold-red ansi code
const BRED: &str = "\x1b[01;38;5;1m";
/// Reset colors
const RES: &str = "\x1b[0m";

/// Colored options used in the output of `--help`
pub(crate) static APP_ABOUT: Lazy<String> = Lazy::new(|| {
    wants_color()
        .then(|| {
            format!(
                "{}DESCRIPTION: {}{}{}",
                YELLOW,
                GREEN,
                crate_description!(),
                RES
            )
        })
        .unwrap_or_else(|| crate_description!().to_owned())
});

/// Colorized message to override the generated help message
pub(crate) static OVERRIDE_HELP: Lazy<String> = Lazy::new(|| {
    wants_color()
        .then(|| {
            format!(
                "{}moveto{} [{}FLAGS{}/{}OPTIONS{}] <{}SUBCOMMAND{}>",
                BRED, RES, GREEN, RES, GREEN, RES, GREEN, RES
            )
        })
        .unwrap_or_else(|| String::from("moveto [FLAGS/OPTIONS] <SUBCOMMAND>"))
});

/// Colorized message displayed after the help message
pub(crate) static AFTER_HELP: Lazy<String> = Lazy::new(|| {
    wants_color()
        .then(|| {
            format!(
                "See {}moveto{} {}--help{} for longer explanations of some options.",
                BRED, RES, GREEN, RES
            )
        })
        .unwrap_or_else(|| {
            String::from("See moveto --help for longer explanations of some options.")
        })
});
