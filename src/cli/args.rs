use crate::config::target::{ReportFormat, Verbosity};
use crate::core::capability::{Category, Mode};
use clap::Parser;
use std::path::PathBuf;

/// FORM MONKEY – automated form submission and form security testing
#[derive(Parser, Debug)]
#[command(
    name = "form-monkey",
    version,
    about = "FORM MONKEY – automated form submission and form security testing",
    long_about = r#"
FORM MONKEY drives a real browser against one web form, either to submit
it repeatedly with synthetic data or to probe it for common weaknesses:

  • SQL injection (database error signatures after each payload)
  • Cross-site scripting (alert dialogs and unescaped reflection)
  • CSRF posture (anti-CSRF tokens, cookie attributes, referrer policy)
  • Security headers (9-header catalog plus HTTP to HTTPS redirect)

Comprehensive mode runs the selected tests one after another, scores the
target from 0 to 100 and writes HTML and/or JSON reports."#,
    after_help = r#"EXAMPLES:
  form-monkey -c contact -m submit --submissions 5
  form-monkey -c contact -m sql_inject
  form-monkey -c contact -m headers --url https://staging.example.com/contact
  form-monkey -c contact -m comprehensive --test sql --test headers --report-format both

ENVIRONMENT:
  CONFIG, FORM, MODE, VERBOSITY, TARGET_URL, REPORT_FORMAT, REPORT_DIR,
  SECURITY_TESTS, MIN_INTERVAL, MAX_INTERVAL, RUST_LOG"#
)]
pub struct Cli {
    /// Named configuration to use from the config file
    #[arg(short, long, env = "FORM", default_value = "default")]
    pub config: String,

    /// Path of the JSON configuration file
    #[arg(long = "config-file", env = "CONFIG", default_value = "config.json")]
    pub config_file: PathBuf,

    /// Operation mode
    #[arg(short, long, env = "MODE", value_enum)]
    pub mode: Option<Mode>,

    /// Logging verbosity (RUST_LOG takes precedence when set)
    #[arg(short, long, env = "VERBOSITY", value_enum)]
    pub verbosity: Option<Verbosity>,

    /// Override the target URL from the configuration
    #[arg(long, env = "TARGET_URL")]
    pub url: Option<String>,

    // ═══════════════════════════════════════════════════════════════════
    // COMPREHENSIVE MODE
    // ═══════════════════════════════════════════════════════════════════
    /// Report format
    #[arg(long = "report-format", env = "REPORT_FORMAT", value_enum, help_heading = "COMPREHENSIVE MODE")]
    pub report_format: Option<ReportFormat>,

    /// Directory reports are written into
    #[arg(long = "report-dir", env = "REPORT_DIR", help_heading = "COMPREHENSIVE MODE")]
    pub report_dir: Option<PathBuf>,

    /// Security test to run (repeatable)
    #[arg(
        long = "test",
        env = "SECURITY_TESTS",
        value_enum,
        value_delimiter = ',',
        help_heading = "COMPREHENSIVE MODE"
    )]
    pub tests: Vec<Category>,

    // ═══════════════════════════════════════════════════════════════════
    // SUBMIT MODE
    // ═══════════════════════════════════════════════════════════════════
    /// Minimum seconds between submissions
    #[arg(long = "min-interval", env = "MIN_INTERVAL", help_heading = "SUBMIT MODE")]
    pub min_interval: Option<u64>,

    /// Maximum seconds between submissions
    #[arg(long = "max-interval", env = "MAX_INTERVAL", help_heading = "SUBMIT MODE")]
    pub max_interval: Option<u64>,

    /// Number of submissions (0 = until interrupted)
    #[arg(long, default_value = "1", help_heading = "SUBMIT MODE")]
    pub submissions: usize,

    // ═══════════════════════════════════════════════════════════════════
    // OUTPUT
    // ═══════════════════════════════════════════════════════════════════
    /// Do not print the banner
    #[arg(long = "no-banner", help_heading = "OUTPUT")]
    pub no_banner: bool,

    /// Suppress the banner and console summaries
    #[arg(short, long, help_heading = "OUTPUT")]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comprehensive_flags() {
        let cli = Cli::try_parse_from([
            "form-monkey",
            "-c",
            "contact",
            "-m",
            "comprehensive",
            "--test",
            "sql",
            "--test",
            "headers",
            "--report-format",
            "both",
        ])
        .unwrap();
        assert_eq!(cli.config, "contact");
        assert_eq!(cli.mode, Some(Mode::Comprehensive));
        assert_eq!(cli.tests, vec![Category::SqlInject, Category::Headers]);
        assert_eq!(cli.report_format, Some(ReportFormat::Both));
        assert_eq!(cli.submissions, 1);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["form-monkey", "-m", "ssrf"]).is_err());
    }
}
