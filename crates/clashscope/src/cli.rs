//! Clap derive structures for the `clashscope` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// clashscope -- review cloud clash-detection results from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "clashscope",
    version,
    about = "Review clash-detection tests, runs and results from the command line",
    long_about = "Lists clash-detection tests, suppression rules and runs for a project,\n\
        renders the clashes of a run with category, model and rule names resolved,\n\
        and creates, updates and starts tests against the clash-detection REST API.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Service profile to use
    #[arg(long, short = 'p', env = "CLASHSCOPE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Project (iTwin) id (overrides profile)
    #[arg(long, short = 'P', env = "CLASHSCOPE_PROJECT", global = true)]
    pub project: Option<String>,

    /// Service base URL (overrides profile)
    #[arg(long, env = "CLASHSCOPE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Access token including scheme, e.g. "Bearer eyJ..."
    #[arg(long, env = "CLASHSCOPE_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CLASHSCOPE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept invalid TLS certificates (local mock services only)
    #[arg(long, short = 'k', env = "CLASHSCOPE_INSECURE", global = true)]
    pub insecure: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, create and update clash-detection tests
    #[command(alias = "t")]
    Tests(TestsArgs),

    /// List suppression rules
    #[command(alias = "sr")]
    Rules(RulesArgs),

    /// List, inspect and start test runs
    #[command(alias = "r")]
    Runs(RunsArgs),

    /// Show the clashes of a run
    #[command(alias = "c")]
    Clashes(ClashesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TESTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TestsArgs {
    #[command(subcommand)]
    pub command: TestsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TestsCommand {
    /// List tests of the project
    #[command(alias = "ls")]
    List {
        /// Bypass the cache and re-fetch
        #[arg(long)]
        refresh: bool,
    },

    /// Create the demo test (no suppression rules) in the project
    Create,

    /// Overwrite a test with the demo definition that carries a suppression rule
    Update {
        /// Test id (defaults to the project's first test)
        test_id: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SUPPRESSION RULES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RulesCommand {
    /// List suppression rules of the project
    #[command(alias = "ls")]
    List,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RUNS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RunsArgs {
    #[command(subcommand)]
    pub command: RunsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RunsCommand {
    /// List runs of the project, most recent as returned by the service
    #[command(alias = "ls")]
    List,

    /// Show one run in detail
    Show {
        /// Run id
        run_id: String,
    },

    /// Start a test run (ids default to the profile's [run] section)
    Start(StartRunArgs),
}

#[derive(Debug, Args)]
pub struct StartRunArgs {
    /// Test to run
    #[arg(long)]
    pub test_id: Option<String>,

    /// iModel to run against
    #[arg(long)]
    pub imodel_id: Option<String>,

    /// Named version of the iModel
    #[arg(long)]
    pub named_version_id: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLASHES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClashesArgs {
    #[command(subcommand)]
    pub command: ClashesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClashesCommand {
    /// List the clashes of a run
    #[command(alias = "ls")]
    List {
        /// Zero-based index into `runs list` (defaults to the first run)
        #[arg(long)]
        run: Option<usize>,
    },

    /// List clash markers (center point + popup text)
    Markers {
        /// Zero-based index into `runs list` (defaults to the first run)
        #[arg(long)]
        run: Option<usize>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Print the config file location
    Path,

    /// Display current configuration (secrets masked)
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an access token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
