use std::path::PathBuf;
use std::time::Duration;

use clap::ArgMatches;
use tracing::{error, info};

use mtasnap_core::capture::{self, Backend};
use mtasnap_core::cycle::{CropRegion, SavePolicy};
use mtasnap_core::errors::SnapError;
use mtasnap_core::events;
use mtasnap_core::hotkey::{Dispatcher, DispatcherConfig, Listener};
use mtasnap_core::storage;
use mtasnap_core::window::{WindowInfo, ensure_foreground, find_window, list_windows};

use crate::app::{DEFAULT_OUT_DIR, DEFAULT_TITLE};
use crate::table;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("list", sub_matches)) => handle_list_command(sub_matches),
        Some(("capture", sub_matches)) => handle_capture_command(sub_matches),
        Some(("bench", sub_matches)) => handle_bench_command(sub_matches),
        Some(("listen", sub_matches)) => handle_listen_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

fn handle_list_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("windows", sub_matches)) => handle_list_windows(sub_matches),
        _ => {
            error!(event = "cli.list_subcommand_unknown");
            Err("Unknown list subcommand".into())
        }
    }
}

fn handle_list_windows(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let filter = matches.get_one::<String>("filter");

    info!(
        event = "cli.list_windows_started",
        json_output = json_output,
        filter = ?filter
    );

    match list_windows(filter.map(String::as_str)) {
        Ok(windows) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&windows)?);
            } else if windows.is_empty() {
                println!("No windows found.");
            } else {
                println!("Top-level windows:");
                table::print_windows_table(&windows);
            }

            info!(event = "cli.list_windows_completed", count = windows.len());
            Ok(())
        }
        Err(e) => Err(fail("Failed to list windows", e)),
    }
}

fn handle_capture_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let backend = parse_backend(matches);
    let title = arg_str(matches, "title", DEFAULT_TITLE);
    let out_dir = PathBuf::from(arg_str(matches, "out-dir", DEFAULT_OUT_DIR));

    info!(
        event = "cli.capture_started",
        backend = backend.as_str(),
        title = title
    );

    let window = locate_window(title)?;
    activate_for_backend(backend, &window, matches.get_flag("no-foreground"));

    let mut source =
        capture::open_source(backend, &window).map_err(|e| fail("Failed to open capture source", e))?;

    match matches.get_one::<u64>("interval-ms") {
        Some(&interval_ms) => {
            let count = *matches.get_one::<u64>("count").unwrap_or(&10);
            storage::ensure_dir(&out_dir).map_err(|e| fail("Cannot create output directory", e))?;

            for index in 1..=count {
                let frame = source.grab().map_err(|e| fail("Capture failed", e))?;
                let path = out_dir.join(storage::interval_filename(storage::epoch_millis(), index));
                storage::save_frame(&frame, &path).map_err(|e| fail("Save failed", e))?;
                println!("{}", path.display());

                if index < count {
                    std::thread::sleep(Duration::from_millis(interval_ms));
                }
            }

            info!(event = "cli.capture_completed", frames = count);
        }
        None => {
            let frame = source.grab().map_err(|e| fail("Capture failed", e))?;

            let path = match matches.get_one::<String>("output") {
                Some(output) => PathBuf::from(output),
                None => {
                    storage::ensure_dir(&out_dir)
                        .map_err(|e| fail("Cannot create output directory", e))?;
                    out_dir.join(storage::interval_filename(storage::epoch_millis(), 1))
                }
            };

            storage::save_frame(&frame, &path).map_err(|e| fail("Save failed", e))?;
            println!("Saved {} ({}x{})", path.display(), frame.width, frame.height);

            info!(event = "cli.capture_completed", frames = 1u64);
        }
    }

    Ok(())
}

fn handle_bench_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let backend = parse_backend(matches);
    let title = arg_str(matches, "title", DEFAULT_TITLE);
    let seconds = *matches.get_one::<u64>("seconds").unwrap_or(&5);

    info!(
        event = "cli.bench_started",
        backend = backend.as_str(),
        seconds = seconds
    );

    let window = locate_window(title)?;
    activate_for_backend(backend, &window, matches.get_flag("no-foreground"));

    let mut source =
        capture::open_source(backend, &window).map_err(|e| fail("Failed to open capture source", e))?;

    let report = capture::benchmark(source.as_mut(), Duration::from_secs(seconds))
        .map_err(|e| fail("Benchmark failed", e))?;

    println!(
        "{}: {} frames in {:.2}s ({:.1} fps)",
        backend, report.frames, report.elapsed_secs, report.fps
    );

    info!(event = "cli.bench_completed", frames = report.frames);
    Ok(())
}

fn handle_listen_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let backend = parse_backend(matches);
    let title = arg_str(matches, "title", DEFAULT_TITLE);
    let out_dir = PathBuf::from(arg_str(matches, "out-dir", DEFAULT_OUT_DIR));
    let settle_delay = Duration::from_millis(*matches.get_one::<u64>("delay-ms").unwrap_or(&0));

    let policy = match matches.get_one::<String>("crop") {
        Some(raw) => SavePolicy::CropAndSkip {
            region: parse_crop_region(raw)?,
            skip_position: *matches.get_one::<u8>("skip-position").unwrap_or(&4),
        },
        None => SavePolicy::SaveAll,
    };

    info!(
        event = "cli.listen_started",
        backend = backend.as_str(),
        title = title,
        out_dir = out_dir.display().to_string().as_str()
    );

    let window = locate_window(title)?;
    if !matches.get_flag("no-foreground") && !ensure_foreground(window.handle) {
        // Non-fatal: capture still works for an occluded window with the
        // off-screen backend, and the user may foreground it by hand
        eprintln!("Warning: could not bring the window to the foreground");
    }

    storage::ensure_dir(&out_dir).map_err(|e| fail("Cannot create output directory", e))?;
    let source =
        capture::open_source(backend, &window).map_err(|e| fail("Failed to open capture source", e))?;

    let config = DispatcherConfig {
        out_dir,
        settle_delay,
        policy,
        ..DispatcherConfig::default()
    };
    let mut dispatcher = Dispatcher::new(source, config);

    let (listener, events_rx) =
        Listener::spawn().map_err(|e| fail("Failed to start hotkey listener", e))?;

    println!("Listening for Alt / Q / E ... (ESC to quit)");
    dispatcher.run(events_rx);
    listener.stop();

    events::log_app_shutdown();
    Ok(())
}

/// Report a failed operation on stderr and in the log, then hand the
/// error back for the nonzero exit.
fn fail<E: SnapError + 'static>(context: &str, e: E) -> Box<dyn std::error::Error> {
    eprintln!("{context}: {e}");
    error!(
        event = "cli.operation_failed",
        context = context,
        code = e.error_code(),
        error = %e
    );
    events::log_app_error(&e);
    Box::new(e)
}

fn locate_window(title: &str) -> Result<WindowInfo, Box<dyn std::error::Error>> {
    match find_window(title) {
        Some(window) => Ok(window),
        None => {
            let message = format!("Window not found containing title: {title}");
            eprintln!("{message}");
            error!(event = "cli.window_not_found", title = title);
            Err(message.into())
        }
    }
}

/// The screen-copy backend needs the window frontmost and unobstructed;
/// the off-screen renderer does not.
fn activate_for_backend(backend: Backend, window: &WindowInfo, skip: bool) {
    if skip || backend != Backend::RegionCopy {
        return;
    }
    if !ensure_foreground(window.handle) {
        eprintln!("Warning: could not bring the window to the foreground");
    }
}

fn parse_backend(matches: &ArgMatches) -> Backend {
    // clap restricts the value, so the fallback is never hit
    Backend::parse(arg_str(matches, "backend", "region-copy")).unwrap_or(Backend::RegionCopy)
}

fn arg_str<'a>(matches: &'a ArgMatches, name: &str, default: &'a str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or(default)
}

/// Parse a crop region of the form "x,y,width,height".
fn parse_crop_region(raw: &str) -> Result<CropRegion, Box<dyn std::error::Error>> {
    let parts: Vec<u32> = raw
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .map_err(|_| format!("Invalid crop region '{raw}': expected x,y,width,height"))?;

    if parts.len() != 4 {
        return Err(format!("Invalid crop region '{raw}': expected four values").into());
    }
    if parts[2] == 0 || parts[3] == 0 {
        return Err(format!("Invalid crop region '{raw}': width and height must be positive").into());
    }

    Ok(CropRegion {
        x: parts[0],
        y: parts[1],
        width: parts[2],
        height: parts[3],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crop_region_valid() {
        let region = parse_crop_region("0,0,400,50").unwrap();
        assert_eq!(
            region,
            CropRegion {
                x: 0,
                y: 0,
                width: 400,
                height: 50
            }
        );
    }

    #[test]
    fn test_parse_crop_region_tolerates_spaces() {
        let region = parse_crop_region("10, 20, 30, 40").unwrap();
        assert_eq!(region.x, 10);
        assert_eq!(region.height, 40);
    }

    #[test]
    fn test_parse_crop_region_rejects_bad_input() {
        assert!(parse_crop_region("").is_err());
        assert!(parse_crop_region("1,2,3").is_err());
        assert!(parse_crop_region("1,2,3,4,5").is_err());
        assert!(parse_crop_region("a,b,c,d").is_err());
        assert!(parse_crop_region("0,0,0,50").is_err());
        assert!(parse_crop_region("0,0,400,0").is_err());
    }

    #[test]
    fn test_parse_backend_from_matches() {
        let matches = crate::app::build_cli()
            .try_get_matches_from(["mtasnap", "capture", "--backend", "off-screen-render"])
            .unwrap();
        let (_, capture) = matches.subcommand().unwrap();
        assert_eq!(parse_backend(capture), Backend::OffScreenRender);
    }
}
