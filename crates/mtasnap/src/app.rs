use clap::{Arg, ArgAction, Command};

pub const DEFAULT_TITLE: &str = "MTA: San Andreas";
pub const DEFAULT_OUT_DIR: &str = "screenshots";

pub fn build_cli() -> Command {
    Command::new("mtasnap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Hotkey-driven screenshots of a game window")
        .long_about(
            "mtasnap locates a game window by title, captures its client area either by \
             copying the screen or by asking the window to render off-screen, and can run \
             a global hotkey listener that labels each shot with its position in a \
             four-step capture cycle.",
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        // List subcommand
        .subcommand(
            Command::new("list")
                .about("List windows")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("windows")
                        .about("List all top-level windows")
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .help("Output in JSON format")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("filter")
                                .long("filter")
                                .short('f')
                                .help("Only show windows whose title contains this text"),
                        ),
                ),
        )
        // Capture subcommand
        .subcommand(
            Command::new("capture")
                .about("Capture the target window once, or repeatedly on an interval")
                .arg(backend_arg())
                .arg(title_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Save the single shot to this path (default: generated name in the output directory)"),
                )
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .help("Output directory for generated filenames")
                        .default_value(DEFAULT_OUT_DIR),
                )
                .arg(
                    Arg::new("interval-ms")
                        .long("interval-ms")
                        .help("Capture repeatedly, pausing this many milliseconds between frames")
                        .value_parser(clap::value_parser!(u64))
                        .conflicts_with("output"),
                )
                .arg(
                    Arg::new("count")
                        .long("count")
                        .help("Number of frames to capture in interval mode")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10")
                        .requires("interval-ms"),
                )
                .arg(no_foreground_arg()),
        )
        // Bench subcommand
        .subcommand(
            Command::new("bench")
                .about("Measure sustained capture throughput")
                .arg(backend_arg())
                .arg(title_arg())
                .arg(
                    Arg::new("seconds")
                        .long("seconds")
                        .short('s')
                        .help("How long to run the capture loop")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("5"),
                )
                .arg(no_foreground_arg()),
        )
        // Listen subcommand
        .subcommand(
            Command::new("listen")
                .about("Listen for Alt/Q/E globally and save a labeled shot per keypress (ESC quits)")
                .arg(backend_arg())
                .arg(title_arg())
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .help("Directory for saved screenshots (created if absent)")
                        .default_value(DEFAULT_OUT_DIR),
                )
                .arg(
                    Arg::new("delay-ms")
                        .long("delay-ms")
                        .help("Settle delay after each accepted keypress before capturing")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("0"),
                )
                .arg(
                    Arg::new("crop")
                        .long("crop")
                        .help("Crop each shot to a region: x,y,width,height (e.g., \"0,0,400,50\")")
                        .value_name("REGION"),
                )
                .arg(
                    Arg::new("skip-position")
                        .long("skip-position")
                        .help("Cycle position to drop instead of saving (default 4, only with --crop)")
                        .value_parser(clap::value_parser!(u8))
                        .requires("crop"),
                )
                .arg(no_foreground_arg()),
        )
}

fn backend_arg() -> Arg {
    Arg::new("backend")
        .long("backend")
        .short('b')
        .help("Capture strategy")
        .value_parser(["region-copy", "off-screen-render"])
        .default_value("region-copy")
}

fn title_arg() -> Arg {
    Arg::new("title")
        .long("title")
        .short('t')
        .help("Window title substring to match")
        .default_value(DEFAULT_TITLE)
}

fn no_foreground_arg() -> Arg {
    Arg::new("no-foreground")
        .long("no-foreground")
        .help("Skip bringing the target window to the foreground")
        .action(ArgAction::SetTrue)
}
