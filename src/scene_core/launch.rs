use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::scene_core::command::parse_int_prefix;
use crate::scene_core::config::CONFIG_FILE;

#[derive(Clone, Debug)]
pub struct LaunchOptions {
    /// Seeds the time override exactly like `/time set <n>`.
    pub time_override: Option<f64>,
    pub config_path: PathBuf,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            time_override: None,
            config_path: PathBuf::from(CONFIG_FILE),
        }
    }
}

impl LaunchOptions {
    pub fn from_env_args() -> Result<Self> {
        Self::from_iter(
            std::env::args_os().skip(1),
            std::env::var_os("OCEAN_SCENE_TIME"),
        )
    }

    fn from_iter<I>(args: I, env_time: Option<OsString>) -> Result<Self>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut options = Self::default();

        if let Some(value) = env_time {
            let value = value.to_string_lossy();
            if !value.trim().is_empty() {
                options.time_override = Some(parse_int_prefix(&value));
            }
        }

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            let arg_str = arg.to_string_lossy();
            match arg_str.as_ref() {
                "--time" => {
                    let Some(value) = iter.next() else {
                        return Err(anyhow!("--time requires a value"));
                    };
                    options.time_override = Some(parse_int_prefix(&value.to_string_lossy()));
                }
                "--config" => {
                    let Some(value) = iter.next() else {
                        return Err(anyhow!("--config requires a value"));
                    };
                    options.config_path = PathBuf::from(value);
                }
                other => log::warn!("ignoring unknown argument {other}"),
            }
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::LaunchOptions;
    use std::ffi::OsString;

    fn args(values: &[&str]) -> Vec<OsString> {
        values.iter().map(OsString::from).collect()
    }

    #[test]
    fn defaults_use_wall_clock_and_local_config() {
        let parsed = LaunchOptions::from_iter(Vec::<OsString>::new(), None).unwrap();
        assert!(parsed.time_override.is_none());
        assert_eq!(parsed.config_path, std::path::PathBuf::from("config.json"));
    }

    #[test]
    fn time_flag_sets_override() {
        let parsed = LaunchOptions::from_iter(args(&["--time", "750"]), None).unwrap();
        assert_eq!(parsed.time_override, Some(750.0));
    }

    #[test]
    fn cli_flag_wins_over_env() {
        let parsed =
            LaunchOptions::from_iter(args(&["--time", "100"]), Some(OsString::from("900")))
                .unwrap();
        assert_eq!(parsed.time_override, Some(100.0));
    }

    #[test]
    fn env_sets_override() {
        let parsed = LaunchOptions::from_iter(Vec::<OsString>::new(), Some(OsString::from("250")))
            .unwrap();
        assert_eq!(parsed.time_override, Some(250.0));
    }

    #[test]
    fn config_flag_overrides_path() {
        let parsed =
            LaunchOptions::from_iter(args(&["--config", "scenes/dusk.json"]), None).unwrap();
        assert_eq!(
            parsed.config_path,
            std::path::PathBuf::from("scenes/dusk.json")
        );
    }

    #[test]
    fn missing_values_are_errors() {
        assert!(LaunchOptions::from_iter(args(&["--time"]), None).is_err());
        assert!(LaunchOptions::from_iter(args(&["--config"]), None).is_err());
    }
}
