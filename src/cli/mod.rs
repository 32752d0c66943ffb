// FILE: src/cli/mod.rs

mod config;
mod handlers;

use crate::error::{CompilerError, Result};
use crate::CompilerOptions;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use std::time::Instant;

pub struct EnhancedCli {
    config: config::ConfigFile,
    start_time: Instant,
}

impl Default for EnhancedCli {
    fn default() -> Self {
        Self::new()
    }
}

impl EnhancedCli {
    pub fn new() -> Self {
        Self {
            config: config::ConfigFile::default(),
            start_time: Instant::now(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.start_time = Instant::now();
        let matches = self.build_cli().get_matches();

        self.setup_logging(matches.get_count("verbose"))?;

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        let result = match matches.subcommand() {
            Some(("build", sub_matches)) => handlers::handle_build_command(self, sub_matches),
            Some(("check", sub_matches)) => handlers::handle_check_command(self, sub_matches),
            Some(("debug", sub_matches)) => handlers::handle_debug_command(self, sub_matches),
            _ => {
                println!("No subcommand specified. Use --help for usage information.");
                Ok(())
            }
        };

        log::debug!("Finished in {}ms", self.start_time.elapsed().as_millis());
        result
    }

    fn build_cli(&self) -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path (.toml or .json)")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count),
            )
            .subcommand(
                Command::new("build")
                    .about("Compile SCSS files or directories to CSS")
                    .arg(Arg::new("input").help("Input SCSS files or directories").required(true).num_args(1..).index(1))
                    .arg(Arg::new("output").short('o').long("output").value_name("DIR").help("Output directory"))
                    .arg(Arg::new("define").short('D').long("define").value_name("VAR=VALUE").help("Define custom variable").action(ArgAction::Append))
                    .arg(Arg::new("debug").short('d').long("debug").help("Log each compilation step").action(ArgAction::SetTrue))
                    .arg(Arg::new("stats").long("stats").help("Show compilation statistics").action(ArgAction::SetTrue))
                    .arg(Arg::new("watch").short('w').long("watch").help("Watch for file changes and recompile").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("check")
                    .about("Check SCSS files for missing imports and undefined variables")
                    .arg(Arg::new("input").help("Input SCSS file or directory").required(true).index(1))
                    .arg(Arg::new("recursive").short('r').long("recursive").help("Check all SCSS files in directory recursively").action(ArgAction::SetTrue))
                    .arg(Arg::new("define").short('D').long("define").value_name("VAR=VALUE").help("Define custom variable").action(ArgAction::Append))
                    .arg(Arg::new("strict").long("strict").help("Fail on undefined variables").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("debug")
                    .about("Print the compile result of a SCSS file as JSON")
                    .arg(Arg::new("input").help("Input SCSS file").required(true).index(1))
                    .arg(Arg::new("define").short('D').long("define").value_name("VAR=VALUE").help("Define custom variable").action(ArgAction::Append)),
            )
    }

    fn setup_logging(&self, verbose_count: u8) -> Result<()> {
        let log_level = match verbose_count {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::new()
            .filter_level(log_level)
            .parse_default_env()
            .format_timestamp_secs()
            .try_init()
            .map_err(|e| CompilerError::invalid_format(format!("Logger already initialized: {}", e)))
    }

    /// Merge flags over the config file; flags win
    pub fn build_compiler_options(&self, matches: &clap::ArgMatches) -> Result<CompilerOptions> {
        let mut options = CompilerOptions::default();

        if let Some(config_vars) = &self.config.custom_variables {
            options.custom_variables.extend(config_vars.clone());
        }
        if let Ok(Some(defines)) = matches.try_get_many::<String>("define") {
            for define in defines {
                let (key, value) = parse_define(define)?;
                options.custom_variables.insert(key, value);
            }
        }

        options.output_directory = match matches.try_get_one::<String>("output") {
            Ok(Some(dir)) => Some(PathBuf::from(dir)),
            _ => self.config.output_directory.as_ref().map(PathBuf::from),
        };

        options.debug_mode = matches!(matches.try_get_one::<bool>("debug"), Ok(Some(true)));
        options.fail_on_undefined = matches!(matches.try_get_one::<bool>("strict"), Ok(Some(true)))
            || self.config.fail_on_undefined.unwrap_or(false);

        Ok(options)
    }
}

fn parse_define(define: &str) -> Result<(String, String)> {
    match define.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(CompilerError::invalid_format(format!(
            "Invalid variable definition: {}. Use VAR=VALUE format.",
            define
        ))),
    }
}
