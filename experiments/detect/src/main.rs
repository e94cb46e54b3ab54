use deepcheck_base::log;
use deepcheck_infer::{Detector, DetectorConfig, Inference, VideoMode};
use std::path::PathBuf;
use std::sync::Arc;

const USAGE: &str = "Usage: detect [--config FILE] [--model FILE] [--stride N] [--first-frame] \
                     [--json] [--log-dir DIR] FILE...

Classifies each image (.jpg .jpeg .png) or video (.mp4 .avi .mov) as Real or Fake.
With --json and no --log-dir, logging is off so stdout carries only results.";

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    model: Option<PathBuf>,
    stride: Option<usize>,
    first_frame: bool,
    json: bool,
    log_dir: Option<PathBuf>,
    files: Vec<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().ok_or_else(|| format!("{flag} needs a value"));
        match arg.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
            "--model" => parsed.model = Some(PathBuf::from(value("--model")?)),
            "--stride" => {
                let raw = value("--stride")?;
                let stride = raw
                    .parse::<usize>()
                    .map_err(|_| format!("invalid stride '{raw}'"))?;
                parsed.stride = Some(stride);
            }
            "--log-dir" => parsed.log_dir = Some(PathBuf::from(value("--log-dir")?)),
            "--first-frame" => parsed.first_frame = true,
            "--json" => parsed.json = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            file => parsed.files.push(PathBuf::from(file)),
        }
    }
    if parsed.files.is_empty() {
        return Err("no input files".to_string());
    }
    Ok(parsed)
}

/// Config file first, then command-line overrides.
fn build_config(args: &Args) -> Result<DetectorConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => DetectorConfig::load(path)?,
        None => DetectorConfig::default(),
    };
    if let Some(model) = &args.model {
        config = config.with_model_path(model);
    }
    if let Some(stride) = args.stride {
        config = config.with_stride(stride);
    }
    if args.first_frame {
        config = config.with_video_mode(VideoMode::FirstFrame);
    }
    if let Some(dir) = &args.log_dir {
        config = config.with_log_dir(dir);
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {message}\n\n{USAGE}");
            std::process::exit(2);
        }
    };
    let config = build_config(&args)?;

    match config.log_dir() {
        Some(dir) => deepcheck_base::init_file_logger(dir)?,
        None if !args.json => deepcheck_base::init_stdout_logger(),
        None => {}
    }

    let Some(model_path) = config.model_path() else {
        eprintln!("error: no model given (use --model or model_path in the config file)");
        std::process::exit(2);
    };

    // one model for every file
    let inference = Inference::from_choice(config.device())?;
    let classifier = inference.use_resnet_classifier(model_path, config.normalization())?;
    log::info!("classifier ready: {:?}", classifier);
    let detector = Detector::new(Arc::new(classifier), config)?;

    let results = detector.infer_many(args.files.clone()).await;

    let mut failed = false;
    for (file, result) in args.files.iter().zip(results) {
        match result {
            Ok(prediction) if args.json => {
                let line = serde_json::json!({
                    "file": file.display().to_string(),
                    "result": prediction,
                });
                println!("{line}");
            }
            Ok(prediction) => {
                if args.files.len() > 1 {
                    println!("{}", file.display());
                }
                println!("{prediction}");
            }
            Err(e) => {
                failed = true;
                eprintln!("error: {} for {}: {}", e.kind(), file.display(), e);
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
