use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use boxblur_core::imaging::domain::image_reader::ImageReader;
use boxblur_core::imaging::domain::image_writer::ImageWriter;
use boxblur_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use boxblur_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use boxblur_core::pipeline::blur_image_use_case::BlurImageUseCase;
use boxblur_core::pipeline::fill_region_use_case::FillRegionUseCase;
use boxblur_core::shared::color::FillColor;
use boxblur_core::shared::constants::{IMAGE_EXTENSIONS, MAX_RADIUS};
use boxblur_core::shared::region::Region;
use boxblur_core::shared::settings::BlurSettings;

/// Box blur for image files.
#[derive(Parser)]
#[command(name = "boxblur")]
struct Cli {
    /// Input image file.
    input: PathBuf,

    /// Output image file; the format follows its extension.
    output: PathBuf,

    /// Blur radius in pixels (kernel side is 2r+1).
    #[arg(long)]
    radius: Option<u32>,

    /// Only process this rectangle, as X,Y,W,H.
    #[arg(long)]
    region: Option<Region>,

    /// Worker threads for the row scan.
    #[arg(long)]
    threads: Option<usize>,

    /// Report progress every N image rows.
    #[arg(long)]
    progress_interval: Option<usize>,

    /// Fill the region with a solid color instead of blurring
    /// (#rrggbb, #rrggbbaa or a color name).
    #[arg(long)]
    fill: Option<FillColor>,

    /// Settings file (JSON). Defaults to the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Store the effective blur settings in the settings file for later runs.
    #[arg(long)]
    save_settings: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let reader: Box<dyn ImageReader> = Box::new(ImageFileReader::new());
    let image_writer: Box<dyn ImageWriter> = Box::new(ImageFileWriter::new());

    if let Some(color) = cli.fill {
        let use_case = FillRegionUseCase::new(reader, image_writer, color, cli.region);
        use_case.execute(&cli.input, &cli.output)?;
    } else {
        let settings = resolve_settings(&cli)?;
        if cli.save_settings {
            save_settings(&cli, &settings)?;
        }
        let use_case = BlurImageUseCase::new(reader, image_writer, settings, cli.region, None);
        use_case.execute(&cli.input, &cli.output, |fraction| {
            eprint!("\rBlurring {:.0}%", fraction * 100.0);
        })?;
        eprintln!();
    }

    log::info!("Output written to {}", cli.output.display());
    Ok(())
}

/// Settings file first, then command-line overrides.
fn resolve_settings(cli: &Cli) -> Result<BlurSettings, Box<dyn std::error::Error>> {
    let mut settings = match &cli.config {
        Some(path) if cli.save_settings && !path.exists() => BlurSettings::default(),
        Some(path) => BlurSettings::load(path)?,
        None => BlurSettings::load_or_default(),
    };
    if let Some(radius) = cli.radius {
        settings.radius = radius;
    }
    if let Some(threads) = cli.threads {
        settings.threads = threads;
    }
    if let Some(interval) = cli.progress_interval {
        settings.progress_interval = interval;
    }
    settings.validate()?;
    log::debug!("Effective settings: {settings:?}");
    Ok(settings)
}

fn save_settings(cli: &Cli, settings: &BlurSettings) -> Result<(), Box<dyn std::error::Error>> {
    let path = cli
        .config
        .clone()
        .or_else(BlurSettings::default_path)
        .ok_or("No config directory available; pass --config to choose a settings file")?;
    settings.save(&path)?;
    log::info!("Saved settings to {}", path.display());
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    for path in [&cli.input, &cli.output] {
        if !is_image(path) {
            return Err(format!(
                "Unsupported image format: {} (expected one of: {})",
                path.display(),
                IMAGE_EXTENSIONS.join(", ")
            )
            .into());
        }
    }
    if let Some(radius) = cli.radius {
        if radius > MAX_RADIUS {
            return Err(format!("Radius must be at most {MAX_RADIUS}, got {radius}").into());
        }
    }
    if cli.threads == Some(0) {
        return Err("Threads must be at least 1".into());
    }
    if cli.progress_interval == Some(0) {
        return Err("Progress interval must be at least 1".into());
    }
    if let Some(region) = &cli.region {
        if region.is_empty() {
            return Err(format!("Region must have a positive size, got {region}").into());
        }
    }
    if cli.fill.is_some() && (cli.radius.is_some() || cli.threads.is_some()) {
        log::warn!("--radius and --threads are ignored with --fill");
    }
    if cli.fill.is_some() && cli.save_settings {
        return Err("--save-settings only applies to blurring, not --fill".into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("boxblur").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parses_region_and_fill() {
        let cli = parse(&["in.png", "out.png", "--region", "1,2,3,4", "--fill", "red"]);
        assert_eq!(cli.region, Some(Region::new(1, 2, 3, 4)));
        assert_eq!(cli.fill, Some(FillColor::rgb(255, 0, 0)));
    }

    #[test]
    fn test_rejects_malformed_region() {
        let result = Cli::try_parse_from(["boxblur", "in.png", "out.png", "--region", "1,2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("settings.json");
        std::fs::write(&config, r#"{"radius": 9, "threads": 2}"#).unwrap();

        let cli = parse(&[
            "in.png",
            "out.png",
            "--radius",
            "4",
            "--config",
            config.to_str().unwrap(),
        ]);
        let settings = resolve_settings(&cli).unwrap();
        assert_eq!(settings.radius, 4);
        assert_eq!(settings.threads, 2);
    }

    #[test]
    fn test_save_settings_writes_effective_values() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("boxblur").join("settings.json");

        let cli = parse(&[
            "in.png",
            "out.png",
            "--radius",
            "6",
            "--progress-interval",
            "20",
            "--config",
            config.to_str().unwrap(),
            "--save-settings",
        ]);
        let settings = BlurSettings {
            radius: 6,
            progress_interval: 20,
            ..BlurSettings::default()
        };
        save_settings(&cli, &settings).unwrap();

        assert_eq!(BlurSettings::load(&config).unwrap(), settings);
    }

    #[test]
    fn test_save_settings_starts_from_defaults_for_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("new.json");
        let cli = parse(&[
            "in.png",
            "out.png",
            "--threads",
            "3",
            "--config",
            config.to_str().unwrap(),
            "--save-settings",
        ]);
        let settings = resolve_settings(&cli).unwrap();
        assert_eq!(settings.threads, 3);
        assert_eq!(settings.radius, BlurSettings::default().radius);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = parse(&["in.png", "out.png", "--config", "/nonexistent/settings.json"]);
        assert!(resolve_settings(&cli).is_err());
    }

    #[rstest]
    #[case::png("photo.png", true)]
    #[case::upper_case("PHOTO.JPG", true)]
    #[case::video("clip.mp4", false)]
    #[case::no_extension("photo", false)]
    fn test_is_image(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_image(Path::new(path)), expected);
    }

    #[test]
    fn test_validate_rejects_missing_input() {
        let cli = parse(&["/nonexistent/in.png", "out.png"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_threads() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        std::fs::write(&input, b"").unwrap();
        let cli = parse(&[input.to_str().unwrap(), "out.png", "--threads", "0"]);
        let err = validate(&cli).unwrap_err();
        assert!(err.to_string().contains("Threads"));
    }
}
