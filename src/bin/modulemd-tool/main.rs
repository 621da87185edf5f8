use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use slog::{o, Drain};
use slog_scope::error;

use modulemd::config;
use modulemd::{IndexMerger, ModuleIndex, ParseOptions};

const CONFIG_DEFAULT_PATH: &str = "/etc/modulemd-tool.yaml";

#[derive(Clone, Debug, clap::ValueEnum)]
enum DumpFormat {
    Yaml,
}

impl fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Parse and re-emit every document in one or more YAML files
#[derive(Args)]
struct CmdValidate {
    #[arg(long)]
    strict: bool,
    files: Vec<PathBuf>,
}

impl CmdValidate {
    fn run(&self, config: &config::Config) -> Result<()> {
        let options = ParseOptions {
            strict: self.strict || config.parse.strict,
            allow_legacy_u64_overflow: config.parse.allow_legacy_u64_overflow,
        };
        let mut failures = 0usize;
        for file in &self.files {
            let bytes = std::fs::read(file).with_context(|| format!("reading {:?}", file))?;
            let infos = modulemd::yaml::read_documents(&bytes, &options)?;
            for info in &infos {
                match &info.result {
                    Ok(doc) => println!("{:?}: {}: ok", file, doc.kind_name()),
                    Err(err) => {
                        failures += 1;
                        println!("{:?}: error: {}", file, err);
                    }
                }
            }
        }
        if failures > 0 {
            anyhow::bail!("{} subdocument(s) failed validation", failures);
        }
        Ok(())
    }
}

/// Merge one or more YAML files (in priority order, lowest first) and
/// dump the result
#[derive(Args)]
struct CmdMerge {
    #[arg(short, long, default_value_t = DumpFormat::Yaml, value_enum)]
    format: DumpFormat,
    files: Vec<PathBuf>,
}

impl CmdMerge {
    fn run(&self, config: &config::Config) -> Result<()> {
        let options = ParseOptions {
            strict: config.parse.strict,
            allow_legacy_u64_overflow: config.parse.allow_legacy_u64_overflow,
        };
        let mut merger = IndexMerger::new();
        for (priority, file) in self.files.iter().enumerate() {
            let bytes = std::fs::read(file).with_context(|| format!("reading {:?}", file))?;
            let mut index = ModuleIndex::new();
            index.update_from_yaml(&bytes, &options)?;
            merger.add_index(index, priority as i32)?;
        }
        let merged = merger.resolve()?;
        let DumpFormat::Yaml = self.format;
        print!("{}", merged.dump_to_yaml()?);
        Ok(())
    }
}

/// Dump every default-stream selection in a YAML file
#[derive(Args)]
struct CmdDefaults {
    #[arg(long)]
    intent: Option<String>,
    file: PathBuf,
}

impl CmdDefaults {
    fn run(&self, config: &config::Config) -> Result<()> {
        let options = ParseOptions {
            strict: config.parse.strict,
            allow_legacy_u64_overflow: config.parse.allow_legacy_u64_overflow,
        };
        let bytes = std::fs::read(&self.file).with_context(|| format!("reading {:?}", self.file))?;
        let mut index = ModuleIndex::new();
        index.update_from_yaml(&bytes, &options)?;
        for (module, stream) in index.get_default_streams_by_module(self.intent.as_deref()) {
            println!("{}: {}", module, stream);
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum CommandLine {
    /// Dump parsed config file. Helps to find typos
    DumpConfig,
    /// Parse and re-emit every document in one or more YAML files
    Validate(CmdValidate),
    /// Merge one or more YAML files and dump the result
    Merge(CmdMerge),
    /// Dump every default-stream selection in a YAML file
    Defaults(CmdDefaults),
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Application {
    /// Path to configuration file
    #[clap(short, default_value = CONFIG_DEFAULT_PATH)]
    config_path: String,
    #[clap(subcommand)]
    command: CommandLine,
}

impl Application {
    fn init_syslog_logger(log_level: slog::Level) -> Result<slog_scope::GlobalLoggerGuard> {
        let logger = slog_syslog::SyslogBuilder::new()
            .facility(slog_syslog::Facility::LOG_USER)
            .level(log_level)
            .unix("/dev/log")
            .start()?;

        let logger = slog::Logger::root(logger.fuse(), o!());
        Ok(slog_scope::set_global_logger(logger))
    }

    fn init_env_logger() -> Result<slog_scope::GlobalLoggerGuard> {
        Ok(slog_envlogger::init()?)
    }

    fn init_logger(&self, config: &config::Config) -> Result<slog_scope::GlobalLoggerGuard> {
        if std::env::var("RUST_LOG").is_ok() {
            Self::init_env_logger()
        } else {
            Self::init_syslog_logger(config.log_level.into())
        }
    }

    fn run_command(&self, config: config::Config) -> Result<()> {
        match &self.command {
            CommandLine::DumpConfig => {
                let config = serde_yaml::to_string(&config).with_context(|| "Failed to dump config")?;
                println!("{}", config);
                Ok(())
            }
            CommandLine::Validate(v) => v.run(&config),
            CommandLine::Merge(v) => v.run(&config),
            CommandLine::Defaults(v) => v.run(&config),
        }
    }

    pub fn run(&self) {
        let config = config::Config::read(&self.config_path).unwrap_or_default();
        let _logger_guard = self.init_logger(&config).expect("Logger");

        if let Err(err) = self.run_command(config) {
            error!("Failed with error: {:#}", err);
        }
    }
}

fn main() {
    Application::parse().run();
}
