use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser};
use glurest::{Action, ModelSource, Selector, SystemFilter};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "console-cli")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(
    about = "Drive the glu console: run plans, load models, inspect fabrics",
    long_about = None
)]
#[command(
    override_usage = "console-cli -f <fabric> <start|stop|bounce|deploy|undeploy|redeploy|load|status> [flags]"
)]
pub struct Cli {
    /// Action: start, stop, bounce, deploy, undeploy, redeploy, load or status
    #[arg(value_name = "ACTION", value_parser = parse_command)]
    pub command: Command,

    /// Turn on debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Url to the glu console for the given fabric [default: http://localhost:8080/console]
    #[arg(short, long, env = "GLU_CONSOLE_URL")]
    pub console: Option<String>,

    /// Perform action on a fabric
    #[arg(short, long, env = "GLU_FABRIC")]
    pub fabric: Option<String>,

    /// glu user to use for authentication, defaults to the current user
    #[arg(short, long, env = "GLU_USER")]
    pub user: Option<String>,

    /// Password. Warning: it will appear in clear in ps output. Use only for testing.
    #[arg(short = 'x', long = "xpassword", conflicts_with = "password_file")]
    pub password: Option<String>,

    /// Read the password from this file (first line). Protect it with unix permissions.
    #[arg(short = 'X', long = "xpasswordfile", value_name = "FILE")]
    pub password_file: Option<PathBuf>,

    #[command(flatten)]
    pub selection: Selection,

    /// Perform action on all instances in parallel. Default is serial.
    #[arg(short, long)]
    pub parallel: bool,

    /// Do a dry run of the plan. No changes will be made.
    #[arg(short = 'n', long = "dryrun")]
    pub dry_run: bool,

    /// Load the model pointed to by this url
    #[arg(short, long, value_name = "URL", conflicts_with = "model_file")]
    pub model: Option<String>,

    /// Load the model from this file
    #[arg(short = 'M', long = "modelFile", value_name = "FILE")]
    pub model_file: Option<PathBuf>,

    /// Show the current (live) model instead of the expected one. Only with 'status'.
    #[arg(short, long)]
    pub live: bool,

    /// Pretty print the model
    #[arg(short, long)]
    pub beautify: bool,
}

/// Entry selection. At most one may be given.
#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct Selection {
    /// Perform action on all entries
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Perform action on one or more agent(s)
    #[arg(short = 'A', long)]
    pub agent: Option<String>,

    /// Select by tags, all must be present: frontend;backend
    #[arg(short = 't', long = "allTags", value_name = "TAGS")]
    pub all_tags: Option<String>,

    /// Select by tags, any one must be present: frontend;backend
    #[arg(short = 'T', long = "anyTag", value_name = "TAGS")]
    pub any_tag: Option<String>,

    /// Perform action on one or more instance(s)
    #[arg(short = 'I', long)]
    pub instance: Option<String>,

    /// Filter in DSL syntax (see 'Filter Syntax' in the console documentation)
    #[arg(short = 's', long = "systemFilter", value_name = "FILTER")]
    pub system_filter: Option<String>,

    /// File holding a filter in DSL syntax
    #[arg(short = 'S', long = "systemFilterFile", value_name = "FILE")]
    pub system_filter_file: Option<PathBuf>,
}

impl Selection {
    /// Shorthand selector inputs, for filter generation.
    pub fn selector(&self) -> Selector {
        Selector {
            agent: self.agent.clone(),
            instance: self.instance.clone(),
            all_tags: self.all_tags.clone(),
            any_tag: self.any_tag.clone(),
        }
    }

    /// Whether entries are picked, given the filter resolved from this selection.
    ///
    /// A blank filter picks nothing, so only `-a` or a non-empty filter count.
    pub fn is_selected(&self, filter: Option<&SystemFilter>) -> bool {
        self.all || filter.is_some()
    }
}

// ============================================================================
// Actions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Create and run a plan
    Plan(Action),
    /// Load a model (-m / -M)
    Load,
    /// Print the model
    Status,
}

impl FromStr for Command {
    type Err = glurest::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "load" => Ok(Command::Load),
            "status" => Ok(Command::Status),
            other => other.parse().map(Command::Plan),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Plan(action) => write!(f, "{action}"),
            Command::Load => f.write_str("load"),
            Command::Status => f.write_str("status"),
        }
    }
}

fn parse_command(s: &str) -> Result<Command, String> {
    s.parse().map_err(|e: glurest::Error| e.to_string())
}

// ============================================================================
// Validation
// ============================================================================

impl Cli {
    /// Model to load before running the action, if any.
    pub fn model_source(&self) -> Option<ModelSource> {
        match (&self.model, &self.model_file) {
            (Some(url), _) => Some(ModelSource::Url(url.clone())),
            (None, Some(path)) => Some(ModelSource::File(path.clone())),
            (None, None) => None,
        }
    }

    /// Checks that depend on the action and cannot be expressed as clap rules.
    ///
    /// `filter` is the filter resolved from the selection flags.
    pub fn check_request(&self, filter: Option<&SystemFilter>) -> Result<(), String> {
        match self.command {
            Command::Plan(_) if !self.selection.is_selected(filter) => {
                Err("you need to specify one of: agent, instance, filter or all!".to_string())
            }
            Command::Load if self.model_source().is_none() => {
                Err("you need to specify which model to load (-m or -M)!".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Print a usage error and exit with clap's usage status.
pub fn usage_error(message: impl std::fmt::Display) -> ! {
    Cli::command()
        .error(ErrorKind::MissingRequiredArgument, message)
        .exit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("console-cli").chain(args.iter().copied()))
    }

    fn check(cli: &Cli) -> Result<(), String> {
        let filter = crate::commands::resolve_filter(&cli.selection).unwrap();
        cli.check_request(filter.as_ref())
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plan_action() {
        let cli = parse(&["-f", "glu-dev-1", "-A", "agent-1", "-p", "bounce"]).unwrap();
        assert_eq!(cli.command, Command::Plan(Action::Bounce));
        assert_eq!(cli.fabric.as_deref(), Some("glu-dev-1"));
        assert_eq!(cli.selection.agent.as_deref(), Some("agent-1"));
        assert!(cli.parallel);
        assert!(check(&cli).is_ok());
    }

    #[test]
    fn test_parse_long_flags() {
        let cli = parse(&[
            "--fabric",
            "prod",
            "--anyTag",
            "web;api",
            "--dryrun",
            "--xpassword",
            "secret",
            "redeploy",
        ])
        .unwrap();
        assert_eq!(cli.selection.any_tag.as_deref(), Some("web;api"));
        assert!(cli.dry_run);
        assert_eq!(cli.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let err = parse(&["-f", "glu-dev-1", "-a", "explode"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_missing_action_rejected() {
        assert!(parse(&["-f", "glu-dev-1"]).is_err());
    }

    #[test]
    fn test_two_selectors_rejected() {
        let combos: [&[&str]; 6] = [
            &["-A", "a1", "-t", "web"],
            &["-A", "a1", "-a"],
            &["-T", "web", "-I", "a1:/m"],
            &["-s", "agent='a1'", "-a"],
            &["-s", "agent='a1'", "-S", "filter.txt"],
            &["-t", "web", "-T", "api"],
        ];
        for combo in combos {
            let mut args = vec!["-f", "glu-dev-1"];
            args.extend_from_slice(combo);
            args.push("start");
            let err = parse(&args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ArgumentConflict, "{combo:?}");
        }
    }

    #[test]
    fn test_password_flags_conflict() {
        let err = parse(&["-x", "pw", "-X", "pw.txt", "-a", "start"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_model_flags_conflict() {
        let err = parse(&["-m", "http://m", "-M", "m.json", "load"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_plan_requires_selection() {
        let cli = parse(&["-f", "glu-dev-1", "stop"]).unwrap();
        assert!(check(&cli).is_err());

        let cli = parse(&["-f", "glu-dev-1", "-a", "stop"]).unwrap();
        assert!(check(&cli).is_ok());
    }

    #[test]
    fn test_blank_filter_is_not_a_selection() {
        let cli = parse(&["-f", "dev", "-s", "", "start"]).unwrap();
        assert_eq!(
            check(&cli).unwrap_err(),
            "you need to specify one of: agent, instance, filter or all!"
        );

        let cli = parse(&["-f", "dev", "-A", "", "start"]).unwrap();
        assert!(check(&cli).is_err());
    }

    #[test]
    fn test_empty_filter_file_is_not_a_selection() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();

        let cli = parse(&["-f", "dev", "-S", path, "stop"]).unwrap();
        assert!(check(&cli).is_err());

        let cli = parse(&["-f", "dev", "-S", path, "status"]).unwrap();
        assert!(check(&cli).is_ok());
    }

    #[test]
    fn test_load_requires_model() {
        let cli = parse(&["-f", "glu-dev-1", "load"]).unwrap();
        assert!(check(&cli).is_err());

        let cli = parse(&["-f", "glu-dev-1", "-M", "model.json", "load"]).unwrap();
        assert!(check(&cli).is_ok());
        assert_eq!(
            cli.model_source(),
            Some(ModelSource::File(PathBuf::from("model.json")))
        );
    }

    #[test]
    fn test_status_needs_no_selection() {
        let cli = parse(&["-f", "glu-dev-1", "-l", "-b", "status"]).unwrap();
        assert_eq!(cli.command, Command::Status);
        assert!(cli.live);
        assert!(cli.beautify);
        assert!(check(&cli).is_ok());
    }

    #[test]
    fn test_command_display() {
        assert_eq!(Command::Plan(Action::Undeploy).to_string(), "undeploy");
        assert_eq!(Command::Load.to_string(), "load");
        assert_eq!(Command::Status.to_string(), "status");
    }
}
