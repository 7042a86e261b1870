//! Command-line argument parsing for texnav.
//!
//! This module provides the `Cli` struct which encapsulates all command-line
//! options and methods for parsing them.

use crate::config::{Config, ConfigValue};
use crate::core::fs::normalize;
use std::path::{Path, PathBuf};

const HELP: &str = "\
texnav - A command-driven text editor with a file manager

Usage: texnav [OPTIONS] [FILES...]

Options:
  -h, --help           Show this help message
  -d, --dir DIR        Start in DIR instead of the current directory
      --font-size N    Initial font size (8-72)
  -i, --ignore-case    Start with case-insensitive search";

/// Command-line interface configuration.
#[derive(Debug, Default, PartialEq)]
pub struct Cli {
    /// File(s) to open as sessions at start-up
    pub files: Vec<PathBuf>,

    /// Start directory
    pub dir: Option<PathBuf>,

    pub font_size: Option<i64>,

    /// Start with case-insensitive search
    pub ignore_case: bool,

    /// `-h` was given
    pub help: bool,
}

impl Cli {
    /// Parse the process arguments, printing help and exiting on `-h`.
    pub fn parse() -> Result<Self, Box<dyn std::error::Error>> {
        let cli = Self::parse_from(std::env::args().skip(1))?;
        if cli.help {
            println!("{HELP}");
            std::process::exit(0);
        }
        Ok(cli)
    }

    /// Parse an argument list (without the program name).
    ///
    /// Returns an error if a flag is unknown or its value is missing.
    pub fn parse_from<I>(args: I) -> Result<Self, Box<dyn std::error::Error>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut cli = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => cli.help = true,
                "-i" | "--ignore-case" => cli.ignore_case = true,
                "-d" | "--dir" => {
                    if let Some(dir) = args.next() {
                        cli.dir = Some(PathBuf::from(dir));
                    } else {
                        return Err("--dir requires a value".into());
                    }
                }
                "--font-size" => {
                    let Some(size) = args.next() else {
                        return Err("--font-size requires a value".into());
                    };
                    let size: i64 = size
                        .parse()
                        .map_err(|_| format!("Invalid font size: {size}"))?;
                    if !(8..=72).contains(&size) {
                        return Err(format!("Font size must be between 8 and 72, got {size}").into());
                    }
                    cli.font_size = Some(size);
                }
                arg if arg.starts_with('-') => {
                    return Err(format!("Unknown flag: {}. Use --help for usage.", arg).into());
                }
                _ => {
                    // Positional arguments are files
                    cli.files.push(PathBuf::from(arg));
                }
            }
        }

        Ok(cli)
    }

    /// Apply CLI overrides to a configuration object.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(size) = self.font_size {
            config.set("font_size", ConfigValue::Int(size));
        }
        if self.ignore_case {
            config.set("case_sensitive", false);
        }
    }

    /// Absolute, normalized starting directory; `--dir` is taken relative to `cwd`
    pub fn start_dir(&self, cwd: &Path) -> PathBuf {
        match &self.dir {
            Some(dir) => normalize(&cwd.join(dir)),
            None => cwd.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_flags_and_files() {
        let cli = Cli::parse_from(args(&["-d", "/tmp", "--font-size", "20", "-i", "a.txt", "b.txt"]))
            .unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp")));
        assert_eq!(cli.font_size, Some(20));
        assert!(cli.ignore_case);
        assert_eq!(cli.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Cli::parse_from(args(&["--dir"])).is_err());
        assert!(Cli::parse_from(args(&["--font-size", "big"])).is_err());
        assert!(Cli::parse_from(args(&["--font-size", "100"])).is_err());
        assert!(Cli::parse_from(args(&["--wat"])).is_err());
    }

    #[test]
    fn test_apply_to_config() {
        let mut config = Config::default();
        crate::user_config::configure(&mut config);
        let cli = Cli::parse_from(args(&["--font-size", "30", "--ignore-case"])).unwrap();
        cli.apply_to_config(&mut config);
        assert_eq!(config.get_int("font_size"), Some(30));
        assert_eq!(config.get_bool("case_sensitive"), Some(false));

        let mut untouched = Config::default();
        Cli::default().apply_to_config(&mut untouched);
        assert!(untouched.settings.is_empty());
    }

    #[test]
    fn test_start_dir_is_absolute() {
        let cwd = Path::new("/home/user");
        let cli = Cli::parse_from(args(&["-d", "proj/../notes"])).unwrap();
        assert_eq!(cli.start_dir(cwd), PathBuf::from("/home/user/notes"));

        let cli = Cli::parse_from(args(&["-d", "/tmp"])).unwrap();
        assert_eq!(cli.start_dir(cwd), PathBuf::from("/tmp"));
        assert_eq!(Cli::default().start_dir(cwd), PathBuf::from("/home/user"));
    }
}
