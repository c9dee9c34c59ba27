use clap::Parser;

use vision_testbed::capture::SyntheticCaptureFactory;
use vision_testbed::cli::{handle_config_action, list_devices, Args, Command};
use vision_testbed::config::Config;
use vision_testbed::demo::{self, DemoOptions};
use vision_testbed::display::HeadlessDisplay;
use vision_testbed::testbed::{Testbed, VideoSource};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Command-line overrides
    if let Some(devices) = args.devices {
        config.synthetic.devices = devices;
    }
    if let Some(mode) = args.window_mode {
        config.testbed.window_mode = mode.into();
    }

    let factory = SyntheticCaptureFactory::new(config.synthetic.clone());

    match args.command {
        Some(Command::ListDevices) => list_devices(&factory),
        Some(Command::Config { action }) => handle_config_action(action, &config),
        None => {
            let preview = args.preview.or_else(|| config.testbed.preview_title.clone());
            let display = HeadlessDisplay::with_script(&args.keys);
            let mut testbed = Testbed::with_settings(display, config.testbed.loop_settings());

            demo::install(
                &mut testbed,
                DemoOptions {
                    threshold: args.threshold,
                    max_frames: args.frames,
                },
            );

            let stop = testbed.stop_handle();
            if let Err(e) = ctrlc::set_handler(move || {
                log::info!("Received Ctrl+C, shutting down...");
                stop.request_stop();
            }) {
                log::warn!("Ctrl+C handler not installed: {}", e);
            }

            if let Err(e) = testbed.start_video(VideoSource::FirstAvailable(&factory), preview.as_deref()) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }

            let stats = testbed.stats();
            println!(
                "Processed {} frame(s) ({} missed)",
                stats.frames_processed, stats.frames_missed
            );
            for slot in testbed.registry().slots() {
                println!(
                    "  {} [{}]: {} frame(s) shown",
                    slot.title(),
                    if slot.is_visible() { "visible" } else { "hidden" },
                    testbed.display().frames_shown(slot.title())
                );
            }
        }
    }
}
