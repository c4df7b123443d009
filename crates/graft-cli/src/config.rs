//! Configuration loading helpers for the graft CLI.
//!
//! The logic here filters CLI arguments destined for `ortho-config` so the
//! loader only receives supported flags while `clap` parses the remaining
//! rewrite arguments.

use std::ffi::{OsStr, OsString};

use graft_config::Config;
use ortho_config::OrthoConfig;

use crate::AppError;

pub(crate) trait ConfigLoader {
    /// Loads configuration for the CLI.
    ///
    /// # Flag Ordering
    ///
    /// Configuration flags (listed in `CONFIG_CLI_FLAGS`) must appear before
    /// any rewrite arguments. Configuration flags appearing later are handed
    /// to `clap`, which rejects them.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

#[derive(Debug, Clone, Copy)]
enum FlagAction {
    Include { needs_value: bool },
    Skip,
}

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

impl OrthoConfigLoader {
    fn process_config_flag(argument: &OsStr) -> FlagAction {
        let argument_text = argument.to_string_lossy();
        if !argument_text.starts_with("--") {
            return FlagAction::Skip;
        }

        let (flag, has_inline_value) = match argument_text.split_once('=') {
            Some((flag, _)) => (flag, true),
            None => (argument_text.as_ref(), false),
        };

        if super::CONFIG_CLI_FLAGS.iter().any(|known| *known == flag) {
            return FlagAction::Include {
                needs_value: !has_inline_value,
            };
        }

        FlagAction::Skip
    }
}

pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_start: usize,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some((program, rest)) = args.split_first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_start: 0,
        };
    };

    let mut config_arguments = vec![program.clone()];
    let mut command_start = 1usize;
    let mut pending_value = false;

    for argument in rest {
        if pending_value {
            pending_value = false;
        } else {
            match OrthoConfigLoader::process_config_flag(argument) {
                FlagAction::Include { needs_value } => pending_value = needs_value,
                FlagAction::Skip => break,
            }
        }
        config_arguments.push(argument.clone());
        command_start += 1;
    }

    ConfigArgumentSplit {
        config_arguments,
        command_start,
    }
}

pub(crate) fn prepare_cli_arguments(
    args: &[OsString],
    split: &ConfigArgumentSplit,
) -> Vec<OsString> {
    args.first()
        .into_iter()
        .chain(args.get(split.command_start..).unwrap_or(&[]))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::*;

    fn os_args(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn inline_value_flags_do_not_need_follow_up_value() {
        let result = OrthoConfigLoader::process_config_flag(OsStr::new("--log-filter=debug"));
        match result {
            FlagAction::Include { needs_value } => assert!(!needs_value),
            FlagAction::Skip => panic!("expected include for known inline flag"),
        }
    }

    #[test]
    fn separate_value_flags_consume_following_argument() {
        let result = OrthoConfigLoader::process_config_flag(OsStr::new("--capture-marker"));
        match result {
            FlagAction::Include { needs_value } => assert!(needs_value),
            FlagAction::Skip => panic!("expected include for known separated flag"),
        }
    }

    #[test]
    fn rewrite_flags_signal_stop() {
        let result = OrthoConfigLoader::process_config_flag(OsStr::new("--before"));
        assert!(matches!(result, FlagAction::Skip), "should skip");
    }

    #[test]
    fn split_separates_leading_config_flags() {
        let args = os_args(&[
            "graft",
            "--log-filter",
            "debug",
            "--log-format=json",
            "--before",
            "b.rs",
            "main.rs",
        ]);
        let split = split_config_arguments(&args);

        assert_eq!(
            split.config_arguments,
            os_args(&["graft", "--log-filter", "debug", "--log-format=json"])
        );
        assert_eq!(split.command_start, 4);
        assert_eq!(
            prepare_cli_arguments(&args, &split),
            os_args(&["graft", "--before", "b.rs", "main.rs"])
        );
    }

    #[test]
    fn late_config_flags_stay_with_the_command() {
        let args = os_args(&["graft", "--before", "b.rs", "--log-filter", "debug"]);
        let split = split_config_arguments(&args);

        assert_eq!(split.config_arguments, os_args(&["graft"]));
        assert_eq!(prepare_cli_arguments(&args, &split), args);
    }

    #[test]
    fn empty_arguments_split_cleanly() {
        let split = split_config_arguments(&[]);
        assert!(split.config_arguments.is_empty());
        assert!(prepare_cli_arguments(&[], &split).is_empty());
    }
}
