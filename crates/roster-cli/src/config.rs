//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use roster_core::search::Criteria;
use roster_core::{SearchConfig, StoreConfig, DEFAULT_LIMIT, DEFAULT_MAX_LIMIT};

/// Default data directory.
pub const DEFAULT_DATA_PATH: &str = "./roster_data";

/// Roster member search
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version, about = "Member/team search with dynamic filters and paging", long_about = None)]
pub struct Args {
    /// Path to the database storage directory.
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    pub data_path: PathBuf,

    /// Use a temporary database that is discarded on exit.
    #[arg(long)]
    pub temporary: bool,

    /// Insert the demo teams and members before running the command.
    #[arg(long)]
    pub seed: bool,

    /// Page size for searches that do not pass `--limit`.
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub default_limit: u32,

    /// Largest page size a search may return.
    #[arg(long, default_value_t = DEFAULT_MAX_LIMIT)]
    pub max_limit: u32,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Store configuration for these arguments.
    pub fn store_config(&self) -> StoreConfig {
        if self.temporary {
            StoreConfig::temporary()
        } else {
            StoreConfig::new(&self.data_path)
        }
    }

    /// Search configuration for these arguments.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig::default()
            .with_default_limit(self.default_limit)
            .with_max_limit(self.max_limit)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Insert the demo teams and members.
    Seed,

    /// Add a team.
    AddTeam {
        /// Team name.
        name: String,
    },

    /// Add a member.
    AddMember {
        /// Member name.
        name: String,

        /// Member age.
        age: i32,

        /// Id of the member's team.
        #[arg(long)]
        team: Option<u64>,
    },

    /// Move a member to another team.
    ChangeTeam {
        /// Member id.
        member: u64,

        /// New team id; omit to remove the member from its team.
        #[arg(long)]
        team: Option<u64>,
    },

    /// Search members.
    Search(SearchArgs),
}

/// How search results are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchMode {
    /// Every matching row.
    List,
    /// One page; the total always comes from a count query.
    Page,
    /// One page; the count is skipped when the first page is short.
    Optimized,
    /// One sorted window without a total.
    Window,
}

#[derive(ClapArgs, Debug)]
pub struct SearchArgs {
    /// Exact member name.
    #[arg(long)]
    pub name: Option<String>,

    /// Exact team name.
    #[arg(long)]
    pub team: Option<String>,

    /// Minimum age, inclusive.
    #[arg(long)]
    pub age_goe: Option<i32>,

    /// Maximum age, inclusive.
    #[arg(long)]
    pub age_loe: Option<i32>,

    /// Rows to skip (windowed modes).
    #[arg(long, default_value_t = 0)]
    pub offset: u64,

    /// Page size (windowed modes); defaults to `--default-limit`.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Sort terms, e.g. "age,desc;name".
    #[arg(long)]
    pub sort: Option<String>,

    /// Fetch mode.
    #[arg(long, value_enum, default_value = "optimized")]
    pub mode: SearchMode,
}

impl SearchArgs {
    /// Criteria for the filter arguments.
    pub fn criteria(&self) -> Criteria {
        let mut builder = Criteria::builder();
        if let Some(name) = &self.name {
            builder = builder.member_name(name.clone());
        }
        if let Some(team) = &self.team {
            builder = builder.team_name(team.clone());
        }
        if let Some(age) = self.age_goe {
            builder = builder.age_goe(age);
        }
        if let Some(age) = self.age_loe {
            builder = builder.age_loe(age);
        }
        builder.build()
    }
}
