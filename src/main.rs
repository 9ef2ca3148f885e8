use anyhow::Result;
use clap::{Arg, Command};

use battalert::commands;

fn main() -> Result<()> {
    battalert::init_logging();

    let matches = Command::new("battalert")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Alerts you when battery charge crosses your low/high thresholds")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("run")
                .about("Watch the battery and notify on threshold crossings (runs until Ctrl+C)")
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("SECS")
                        .help("Seconds between battery checks (default from config: 15)")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("probe-timeout")
                        .long("probe-timeout")
                        .value_name("MS")
                        .help("Milliseconds to wait for the battery probe before giving up")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("no-notify")
                        .long("no-notify")
                        .help("Write alerts to the log instead of desktop notifications")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Sample the battery once and show which alert would fire"),
        )
        .subcommand(
            Command::new("set")
                .about("Change settings (use 'battalert set --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("thresholds")
                        .about("Set the low and high alert thresholds in percent")
                        .arg(
                            Arg::new("low")
                                .help("Alert below this charge while unplugged")
                                .required(true)
                                .index(1)
                                .value_parser(clap::value_parser!(u8)),
                        )
                        .arg(
                            Arg::new("high")
                                .help("Alert above this charge while plugged in")
                                .required(true)
                                .index(2)
                                .value_parser(clap::value_parser!(u8)),
                        ),
                )
                .subcommand(
                    Command::new("login")
                        .about("Start battalert automatically at login")
                        .arg(
                            Arg::new("state")
                                .help("on or off")
                                .required(true)
                                .index(1)
                                .value_parser(["on", "off"]),
                        ),
                ),
        )
        .subcommand(
            Command::new("get")
                .about("Show settings (use 'battalert get --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("thresholds").about("Show the alert thresholds"))
                .subcommand(Command::new("login").about("Show whether battalert starts at login")),
        )
        .subcommand(Command::new("version").about("Shows version information"))
        .get_matches();

    if matches.get_flag("version") {
        return commands::version();
    }

    match matches.subcommand() {
        Some(("run", sub_matches)) => commands::run(sub_matches)?,
        Some(("check", _)) => commands::check()?,
        Some(("set", sub_matches)) => commands::config::handle_set(sub_matches)?,
        Some(("get", sub_matches)) => commands::config::handle_get(sub_matches)?,
        Some(("version", _)) => commands::version()?,
        _ => {
            println!("Welcome to battalert!");
            println!("Use 'battalert run' to start watching your battery.");
            println!("Use 'battalert --help' for more information.");
        }
    }

    Ok(())
}
