use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::ThreadRng;
use reflex_core::{SessionConfig, SessionOutcome, SessionRecord, SessionSummary, TrialResult};
use reflex_report::{default_csv_path, export_csv, export_json};
use reflex_session::{run_session, UniformDelay};
use reflex_timing::MonotonicClock;
use winit::event_loop::EventLoop;

use crate::app::ReflexApp;
use crate::cli::Args;
use crate::platform::{self, SessionIo};

fn read_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_choice(prompt: &str, min: u32, max: u32) -> io::Result<u32> {
    loop {
        let line = read_line(prompt)?;
        if let Ok(value) = line.parse::<u32>() {
            if (min..=max).contains(&value) {
                return Ok(value);
            }
        }
        println!("Invalid selection. Enter {min}-{max}.");
    }
}

fn print_results(trials: &[TrialResult]) {
    println!("\n=== Results ===");
    for (index, trial) in trials.iter().enumerate() {
        match trial.reaction_ms {
            Some(ms) => println!(
                "Trial {}: delay={:.3} s, reaction={:.3} ms",
                index + 1,
                trial.scheduled_delay_seconds,
                ms
            ),
            None => println!(
                "Trial {}: delay={:.3} s, FALSE START",
                index + 1,
                trial.scheduled_delay_seconds
            ),
        }
    }
    let summary = SessionSummary::from_trials(trials);
    if let Some(avg) = summary.average_reaction_ms {
        println!("Average reaction (valid only): {:.3} ms", avg);
    }
    println!(
        "Valid trials: {}, false starts: {}",
        summary.valid_count, summary.false_start_count
    );
    println!("================");
}

fn run_one(
    event_loop: &mut EventLoop<()>,
    app: &mut ReflexApp,
    clock: &MonotonicClock,
    delays: &mut UniformDelay<ThreadRng>,
    config: &SessionConfig,
    prompt_for_start: bool,
) -> Result<SessionRecord> {
    println!("\n=== Test Run ===");
    println!("Wait for the bright screen, then press any key or mouse button as fast as possible.");
    println!("Press Esc during a run to abort back to the menu.");
    if prompt_for_start {
        println!("Fullscreen starts after you press Enter.");
        read_line("Press Enter to begin...")?;
    }

    delays.set_range(config.min_delay_seconds, config.max_delay_seconds)?;
    app.show_session_screen()?;
    let record = {
        let mut io = SessionIo { event_loop, app };
        run_session(config, clock, delays, &mut io)
    };
    app.hide_session_screen();
    let record = record?;

    match record.outcome {
        SessionOutcome::Completed => print_results(&record.trials),
        SessionOutcome::Aborted => println!("\nRun aborted."),
        SessionOutcome::QuitRequested => {}
    }
    Ok(record)
}

fn settings_page(config: &mut SessionConfig) -> Result<()> {
    loop {
        println!("\n=== Settings ===");
        println!(
            "1. Min random delay (seconds): {:.3}",
            config.min_delay_seconds
        );
        println!(
            "2. Max random delay (seconds): {:.3}",
            config.max_delay_seconds
        );
        println!("3. Trial count: {}", config.trial_count);
        println!("4. Back");

        match prompt_choice("Select option: ", 1, 4)? {
            1 => {
                let line = read_line("New min delay (seconds): ")?;
                match line.parse::<f64>() {
                    Ok(value) if value > 0.0 && value < config.max_delay_seconds => {
                        config.min_delay_seconds = value;
                    }
                    _ => println!("Invalid value. Must be > 0 and < current max delay."),
                }
            }
            2 => {
                let line = read_line("New max delay (seconds): ")?;
                match line.parse::<f64>() {
                    Ok(value) if value > config.min_delay_seconds => {
                        config.max_delay_seconds = value;
                    }
                    _ => println!("Invalid value. Must be > current min delay."),
                }
            }
            3 => {
                let line = read_line("New trial count: ")?;
                match line.parse::<usize>() {
                    Ok(value) if value >= 1 => config.trial_count = value,
                    _ => println!("Invalid value. Must be a positive integer."),
                }
            }
            _ => break,
        }
    }
    Ok(())
}

fn about_page() -> Result<()> {
    println!("\n=== About Reflex ===");
    println!("Purpose: measure human reaction time with low-latency timing.");
    println!("Timing: monotonic clock readings bracket the blocking stimulus present.");
    println!("Input: window key and mouse press events; the first press per trial counts.");
    println!("Display: borderless fullscreen, solid dark and bright screens only.");
    println!("====================");
    read_line("Press Enter to return to menu...")?;
    Ok(())
}

fn post_run_choice() -> Result<u32> {
    println!("\n=== Next Action ===");
    println!("1. Redo test");
    println!("2. Back to main menu");
    println!("3. Quit");
    Ok(prompt_choice("Select option: ", 1, 3)?)
}

fn csv_export_prompt(trials: &[TrialResult]) -> Result<()> {
    if trials.is_empty() {
        return Ok(());
    }

    loop {
        println!("\n=== CSV Export ===");
        println!("1. Export to default filename");
        println!("2. Export to custom path");
        println!("3. Skip");

        let path = match prompt_choice("Select option: ", 1, 3)? {
            1 => default_csv_path(),
            2 => {
                let line = read_line("Enter CSV output path: ")?;
                if line.is_empty() {
                    println!("Path cannot be empty.");
                    continue;
                }
                PathBuf::from(line)
            }
            _ => return Ok(()),
        };

        match export_csv(&path, trials) {
            Ok(()) => {
                println!("CSV exported: {}", path.display());
                return Ok(());
            }
            Err(err) => eprintln!("CSV export failed: {err:#}"),
        }
    }
}

pub fn main_menu(
    event_loop: &mut EventLoop<()>,
    app: &mut ReflexApp,
    clock: &MonotonicClock,
    delays: &mut UniformDelay<ThreadRng>,
    mut config: SessionConfig,
) -> Result<()> {
    println!("Reflex ready.");

    while !app.quit_requested() {
        platform::pump(event_loop, app);
        if app.quit_requested() {
            break;
        }

        println!("\n=== Reflex ===");
        println!(
            "Current settings: delay {:.3}-{:.3} s, trials {}",
            config.min_delay_seconds, config.max_delay_seconds, config.trial_count
        );
        println!("1. Start test");
        println!("2. Settings");
        println!("3. About");
        println!("4. Quit");

        match prompt_choice("Select option: ", 1, 4)? {
            1 => loop {
                let record = run_one(event_loop, app, clock, delays, &config, true)?;
                if record.outcome == SessionOutcome::QuitRequested {
                    return Ok(());
                }
                if record.outcome == SessionOutcome::Completed {
                    csv_export_prompt(&record.trials)?;
                }
                match post_run_choice()? {
                    1 => continue,
                    2 => break,
                    _ => return Ok(()),
                }
            },
            2 => settings_page(&mut config)?,
            3 => about_page()?,
            _ => break,
        }
    }
    Ok(())
}

/// One session without any prompting, for scripted use. Exit code 0 on
/// success, 2 when an export failed, 3 on abort, 4 on quit.
pub fn run_once(
    event_loop: &mut EventLoop<()>,
    app: &mut ReflexApp,
    clock: &MonotonicClock,
    delays: &mut UniformDelay<ThreadRng>,
    config: &SessionConfig,
    args: &Args,
) -> Result<i32> {
    let record = run_one(event_loop, app, clock, delays, config, false)?;
    match record.outcome {
        SessionOutcome::Completed => {
            let mut code = 0;
            if let Some(path) = &args.csv_out {
                if let Err(err) = export_csv(path, &record.trials) {
                    eprintln!("CSV export failed: {err:#}");
                    code = 2;
                }
            }
            if let Some(path) = &args.json_out {
                if let Err(err) = export_json(path, &record.trials) {
                    eprintln!("JSON export failed: {err:#}");
                    code = 2;
                }
            }
            Ok(code)
        }
        SessionOutcome::Aborted => Ok(3),
        SessionOutcome::QuitRequested => Ok(4),
    }
}
