use std::path::PathBuf;

use clap::Parser;

/// Perspective grid over a reference image.
#[derive(Parser, Debug)]
#[command(name = "lucida-studio", about = "Perspective grid drawing aid")]
pub struct Cli {
    /// Background image (PNG or JPEG).
    pub image: Option<PathBuf>,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 800.0)]
    pub height: f64,

    /// Folder exports are written to.
    #[arg(long, env = "LUCIDA_EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Seed for point colors, for reproducible sessions.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log filter, e.g. "lucida_grid=debug". Falls back to RUST_LOG.
    #[arg(long)]
    pub log: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    pub image: Option<PathBuf>,
    pub window_size: (f64, f64),
    pub export_dir: PathBuf,
    pub color_seed: Option<u64>,
    pub log_filter: Option<String>,
    /// Horizon nudge per arrow key, in world units.
    pub level_step: f32,
    /// Rotation per Q/E press, in degrees; Shift uses `coarse_rotation_step`.
    pub rotation_step: f32,
    pub coarse_rotation_step: f32,
    pub curvature_step: f32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            image: None,
            window_size: (1280.0, 800.0),
            export_dir: PathBuf::from("."),
            color_seed: None,
            log_filter: None,
            level_step: 10.0,
            rotation_step: 1.0,
            coarse_rotation_step: 15.0,
            curvature_step: 0.1,
        }
    }
}

impl From<Cli> for StudioConfig {
    fn from(cli: Cli) -> Self {
        Self {
            image: cli.image,
            window_size: (cli.width, cli.height),
            export_dir: cli.export_dir,
            color_seed: cli.seed,
            log_filter: cli.log,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_image_and_flags() {
        let cli = Cli::parse_from(["lucida-studio", "ref.jpg", "--seed", "9", "--width", "640"]);
        let config = StudioConfig::from(cli);
        assert_eq!(config.image, Some(PathBuf::from("ref.jpg")));
        assert_eq!(config.color_seed, Some(9));
        assert_eq!(config.window_size, (640.0, 800.0));
        assert_eq!(config.rotation_step, 1.0);
    }

    #[test]
    fn image_is_optional() {
        let cli = Cli::parse_from(["lucida-studio"]);
        assert_eq!(StudioConfig::from(cli).image, None);
    }
}
