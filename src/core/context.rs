//! Run context assembled from the CLI and the configuration file

use crate::cli::args::Cli;
use crate::config::loader::{self, Overrides};
use crate::config::target::{TargetConfig, Verbosity};
use crate::core::capability::Mode;
use crate::core::interrupt::Interrupt;
use std::sync::Arc;

pub struct Context {
    pub target: Arc<TargetConfig>,
    pub mode: Mode,
    pub verbosity: Verbosity,
    /// Submit-mode rounds; 0 runs until interrupted.
    pub submissions: usize,
    pub quiet: bool,
    pub interrupt: Interrupt,
}

impl From<&Cli> for Overrides {
    fn from(cli: &Cli) -> Self {
        Overrides {
            url: cli.url.clone(),
            mode: cli.mode,
            verbosity: cli.verbosity,
            report_format: cli.report_format,
            report_dir: cli.report_dir.clone(),
            tests: cli.tests.clone(),
            min_interval: cli.min_interval,
            max_interval: cli.max_interval,
        }
    }
}

impl Context {
    /// Loads and validates the named configuration. Any failure here is
    /// fatal to the run.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let target = loader::load_file(&cli.config_file, &cli.config, &Overrides::from(cli))?;
        Self::from_target(target, cli.submissions, cli.quiet)
    }

    pub fn from_target(target: TargetConfig, submissions: usize, quiet: bool) -> anyhow::Result<Self> {
        let mode = target.mode.unwrap_or_default();
        loader::validate(&target, mode)?;

        Ok(Self {
            mode,
            verbosity: target.verbosity.unwrap_or_default(),
            target: Arc::new(target),
            submissions,
            quiet,
            interrupt: Interrupt::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::target::FieldSpec;
    use url::Url;

    #[test]
    fn test_defaults_to_submit_mode() {
        let target = TargetConfig::new(Url::parse("http://a.test/").unwrap())
            .with_field("email", FieldSpec::css("#email"))
            .with_submit(FieldSpec::css("#go"));
        let ctx = Context::from_target(target, 1, false).unwrap();
        assert_eq!(ctx.mode, Mode::Submit);
        assert_eq!(ctx.verbosity, Verbosity::Balanced);
    }

    #[test]
    fn test_invalid_target_is_fatal() {
        let mut target = TargetConfig::new(Url::parse("http://a.test/").unwrap());
        target.mode = Some(Mode::SqlInject);
        assert!(Context::from_target(target, 1, false).is_err());
    }
}
