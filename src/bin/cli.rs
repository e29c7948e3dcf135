use docscan::capture::{GuideFrame, ReplaySource, StillSource};
use docscan::testing::{column_stripes_frame, document_frame, uniform_frame};
use docscan::{
    AnalysisResult, AnalyzerState, CapturedImage, DocScanConfig, FrameAnalyzer, PixelBuffer, ScanSession, TickOutcome,
    WarningKind,
};
use std::env;
use std::time::{Duration, Instant};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    docscan::init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = &args[1];
    match command.as_str() {
        "analyze" => cmd_analyze(&args),
        "crop" => cmd_crop(&args),
        "replay" => cmd_replay(&args),
        "selfcheck" => cmd_selfcheck(),
        "--version" | "version" => {
            println!("{} {}", docscan::NAME, docscan::VERSION);
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: docscan-cli <command> [args]");
    eprintln!("  analyze <image>... [--config <path>] [--json]");
    eprintln!("  crop <image> <output> [--config <path>]");
    eprintln!("  replay <image>... [--config <path>] [--out <path>] [--json]");
    eprintln!("  selfcheck");
}

/// Positional arguments plus the flags shared by every command
struct Options {
    inputs: Vec<String>,
    config: DocScanConfig,
    out: Option<String>,
    json: bool,
}

fn parse_options(args: &[String]) -> Result<Options, Box<dyn std::error::Error>> {
    let mut inputs = Vec::new();
    let mut config_path = None;
    let mut out = None;
    let mut json = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config_path = Some(args.get(i).ok_or("--config needs a path")?.clone());
            }
            "--out" => {
                i += 1;
                out = Some(args.get(i).ok_or("--out needs a path")?.clone());
            }
            "--json" => json = true,
            other => inputs.push(other.to_string()),
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => DocScanConfig::load_from_file(path)?,
        None => DocScanConfig::load_or_default(),
    };

    Ok(Options {
        inputs,
        config,
        out,
        json,
    })
}

fn describe(result: &AnalysisResult) -> String {
    let m = &result.metrics;
    format!(
        "score {:>3} {:<22} brightness {:>6.1} sharpness {:>6.1} edges {:.4} motion {:>5.1}",
        result.score,
        result.message().unwrap_or("OK"),
        m.brightness,
        m.sharpness,
        m.edge_density,
        m.motion_score
    )
}

fn cmd_analyze(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let opts = parse_options(args)?;
    if opts.inputs.is_empty() {
        eprintln!("Usage: docscan-cli analyze <image>... [--config <path>] [--json]");
        std::process::exit(1);
    }

    let analyzer = FrameAnalyzer::new(opts.config.analyzer.clone());
    for path in &opts.inputs {
        let frame = PixelBuffer::load(path)?;
        frame.ensure_analyzable()?;

        let mut state = AnalyzerState::new();
        let result = analyzer.analyze_still(&frame, &mut state);
        if opts.json {
            println!("{}", serde_json::json!({ "path": path, "result": result }));
        } else {
            println!("{}: {}", path, describe(&result));
        }
    }
    Ok(())
}

fn cmd_crop(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let opts = parse_options(args)?;
    if opts.inputs.len() != 2 {
        eprintln!("Usage: docscan-cli crop <image> <output> [--config <path>]");
        std::process::exit(1);
    }

    let guide: GuideFrame = opts.config.capture.guide;
    let frame = PixelBuffer::load(&opts.inputs[0])?;
    let (still, rect) = guide.extract(&frame)?;

    let image = CapturedImage::new(docscan::CaptureTrigger::Manual, still, Some(rect));
    image.save(&opts.inputs[1])?;
    println!(
        "Cropped {}x{} -> {}x{} at ({:.0}, {:.0}): {}",
        frame.width(),
        frame.height(),
        image.width(),
        image.height(),
        rect.x,
        rect.y,
        opts.inputs[1]
    );
    Ok(())
}

/// Feed images through a live session, one per poll, on a virtual clock
fn cmd_replay(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let opts = parse_options(args)?;
    if opts.inputs.is_empty() {
        eprintln!("Usage: docscan-cli replay <image>... [--config <path>] [--out <path>] [--json]");
        std::process::exit(1);
    }

    let frames = opts
        .inputs
        .iter()
        .map(PixelBuffer::load)
        .collect::<Result<Vec<_>, _>>()?;

    let settings = opts.config.capture.clone();
    let period = settings.poll_interval();
    // Enough extra polls on the last frame for a streak to complete
    let max_ticks = frames.len() as u64 + settings.min_stable_ms / settings.poll_interval_ms + 1;

    let mut session = ScanSession::with_config(ReplaySource::new(frames), &opts.config);
    session.start()?;

    let start = Instant::now();
    let mut captured = None;
    for tick in 0..max_ticks {
        let elapsed = period * tick as u32;
        let outcome = session.tick_at(start + elapsed)?;
        report_tick(tick, elapsed, &outcome, opts.json);

        if let TickOutcome::Captured(image) = outcome {
            captured = Some(image);
            break;
        }
    }

    match captured {
        Some(image) => {
            if let Some(out) = &opts.out {
                image.save(out)?;
                if !opts.json {
                    println!("Saved capture to {}", out);
                }
            }
        }
        None => {
            if !opts.json {
                println!("No auto-capture after {} polls", max_ticks);
            }
        }
    }
    Ok(())
}

fn report_tick(tick: u64, elapsed: Duration, outcome: &TickOutcome, json: bool) {
    let elapsed_ms = elapsed.as_millis() as u64;
    match outcome {
        TickOutcome::Inactive => {}
        TickOutcome::NotReady => {
            if json {
                println!("{}", serde_json::json!({ "tick": tick, "elapsed_ms": elapsed_ms, "ready": false }));
            } else {
                println!("[{:>5} ms] not ready", elapsed_ms);
            }
        }
        TickOutcome::Analyzed { result, stable_for } => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "tick": tick,
                        "elapsed_ms": elapsed_ms,
                        "stable_ms": stable_for.as_millis() as u64,
                        "result": result,
                    })
                );
            } else {
                println!(
                    "[{:>5} ms] {} stable {} ms",
                    elapsed_ms,
                    describe(result),
                    stable_for.as_millis()
                );
            }
        }
        TickOutcome::Captured(image) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "tick": tick,
                        "elapsed_ms": elapsed_ms,
                        "captured": {
                            "id": image.id,
                            "trigger": image.trigger,
                            "width": image.width(),
                            "height": image.height(),
                            "captured_at": image.captured_at,
                        },
                    })
                );
            } else {
                println!(
                    "[{:>5} ms] captured {}x{} ({})",
                    elapsed_ms,
                    image.width(),
                    image.height(),
                    image.id
                );
            }
        }
    }
}

/// Synthetic frames with known verdicts under the default thresholds
fn cmd_selfcheck() -> Result<(), Box<dyn std::error::Error>> {
    let cases: [(&str, PixelBuffer, Option<WarningKind>); 5] = [
        ("dark", uniform_frame(640, 480, 20), Some(WarningKind::TooDark)),
        ("overexposed", uniform_frame(640, 480, 252), Some(WarningKind::TooBright)),
        ("flat", uniform_frame(640, 480, 128), Some(WarningKind::SlightlyBlurry)),
        ("low contrast", column_stripes_frame(640, 480, 100, 110), Some(WarningKind::AdjustPosition)),
        ("document", document_frame(1280, 720), None),
    ];

    let analyzer = FrameAnalyzer::default();
    let mut failures = 0;
    for (name, frame, expected) in &cases {
        let result = analyzer.analyze_still(frame, &mut AnalyzerState::new());
        let ok = result.warning == *expected;
        if !ok {
            failures += 1;
        }
        println!("{} {:<13} {}", if ok { "ok  " } else { "FAIL" }, name, describe(&result));
    }

    let mut session = ScanSession::new(StillSource::new(document_frame(1280, 720)));
    session.start()?;
    let start = Instant::now();
    let period = session.settings().poll_interval();
    let captured = (0..10u32).find_map(|tick| match session.tick_at(start + period * tick) {
        Ok(TickOutcome::Captured(image)) => Some(Ok((tick, image))),
        Ok(_) => None,
        Err(e) => Some(Err(e)),
    });
    match captured.transpose()? {
        Some((tick, image)) => println!(
            "ok   auto-capture  {}x{} after {} ms",
            image.width(),
            image.height(),
            (period * tick).as_millis()
        ),
        None => {
            failures += 1;
            println!("FAIL auto-capture  no capture within 10 polls");
        }
    }

    if failures > 0 {
        return Err(format!("{} self-check case(s) failed", failures).into());
    }
    Ok(())
}
