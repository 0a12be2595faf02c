//! Configuration management for PCM conversion

use crate::audio::Converter;
use crate::error::{Pcm2WavError, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(skip)]
    pub input_path: PathBuf,
    #[serde(skip)]
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub overwrite: bool,
    pub create_dirs: bool,
    pub verify: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            input_path: PathBuf::from("input.pcm"),
            output_path: PathBuf::from("input.wav"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            overwrite: true,
            create_dirs: false,
            verify: false,
        }
    }
}

impl Config {
    pub fn verbose(&self) -> bool {
        self.logging.verbose
    }

    pub fn verify(&self) -> bool {
        self.output.verify
    }

    /// Converter carrying the output options of this config.
    pub fn converter(&self) -> Converter {
        Converter::new()
            .overwrite(self.output.overwrite)
            .create_dirs(self.output.create_dirs)
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "pcm2wav", about = "Wrap raw 16 kHz mono 16-bit PCM in a WAV header", version)]
pub struct Args {
    #[arg(short = 'i', long = "input", help = "Input raw PCM file path")]
    pub input: PathBuf,

    #[arg(short = 'o', long = "output", help = "Output WAV file path (defaults to input with .wav extension)")]
    pub output: Option<PathBuf>,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,

    #[arg(long = "no-overwrite", help = "Fail instead of truncating an existing output file")]
    pub no_overwrite: bool,

    #[arg(long = "create-dirs", help = "Create missing parent directories of the output file")]
    pub create_dirs: bool,

    #[arg(long = "verify", help = "Re-read the written file and check its format")]
    pub verify: bool,
}

impl Config {
    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Flags only switch behavior on; absent flags keep the file settings.
        config.output_path = args.output.unwrap_or_else(|| default_output_path(&args.input));
        config.input_path = args.input;
        if args.no_overwrite {
            config.output.overwrite = false;
        }
        if args.create_dirs {
            config.output.create_dirs = true;
        }
        if args.verify {
            config.output.verify = true;
        }
        if args.verbose {
            config.logging.verbose = true;
        }

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Pcm2WavError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Pcm2WavError::config(format!("Failed to parse config file: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(Pcm2WavError::config("Input path cannot be empty"));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(Pcm2WavError::config("Output path cannot be empty"));
        }
        if same_location(&self.input_path, &self.output_path) {
            return Err(Pcm2WavError::config(format!(
                "Output path must differ from input path: {}", self.input_path.display()
            )));
        }
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Pcm2WavError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| Pcm2WavError::config(format!("Failed to write config file: {}", e)))
    }

    pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::default().save_to_file(path)
    }
}

/// Compares resolved paths, so `a.pcm` and `./a.pcm` are the same file.
fn same_location(a: &Path, b: &Path) -> bool {
    a == b || resolve(a) == resolve(b)
}

/// Canonical form of `path`; an output that does not exist yet resolves through its parent.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// `speech.pcm` -> `speech.wav`
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("wav")
}
