//! Command execution.

use std::io::Write;

use roster_core::search::{PageRequest, PagingMode, SortSpec};
use roster_core::{MemberStore, SearchExecutor, SledStore};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::config::{Args, Command, SearchArgs, SearchMode};
use crate::error::CliError;

/// Open the store, run the command and write its JSON result to `out`.
pub fn run(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    let store = SledStore::open(args.store_config())?;
    // The seed command inserts the demo data itself.
    if args.seed && !matches!(args.command, Command::Seed) {
        seed(&store)?;
    }

    match &args.command {
        Command::Seed => {
            let seeded = seed(&store)?;
            write_json(out, &seeded)?;
        }
        Command::AddTeam { name } => {
            let team = store.insert_team(name.as_str())?;
            write_json(out, &team)?;
        }
        Command::AddMember { name, age, team } => {
            let member = store.insert_member(name.as_str(), *age, *team)?;
            write_json(out, &member)?;
        }
        Command::ChangeTeam { member, team } => {
            store.change_team(*member, *team)?;
            write_json(out, &store.member(*member)?)?;
        }
        Command::Search(search) => {
            let executor = SearchExecutor::with_config(&store, args.search_config());
            run_search(&executor, search, out)?;
        }
    }

    store.flush()?;
    Ok(())
}

fn run_search<S: MemberStore>(
    executor: &SearchExecutor<S>,
    search: &SearchArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let criteria = search.criteria();
    let sort = match &search.sort {
        Some(text) => SortSpec::parse(text)?,
        None => SortSpec::unsorted(),
    };

    match search.mode {
        SearchMode::List if sort.is_empty() => write_json(out, &executor.search(&criteria)?),
        SearchMode::List => write_json(out, &executor.search_sorted(&criteria, &sort)?),
        SearchMode::Window => {
            let request = PageRequest::or_default(search.offset, search.limit, executor.config())?;
            write_json(
                out,
                &executor.search_ordered(&criteria, request.offset(), request.limit(), &sort)?,
            )
        }
        SearchMode::Page | SearchMode::Optimized => {
            let mode = if search.mode == SearchMode::Page {
                PagingMode::Naive
            } else {
                PagingMode::Optimized
            };
            let request = PageRequest::or_default(search.offset, search.limit, executor.config())?
                .with_sort(sort);
            write_json(out, &executor.search_page_with(&criteria, &request, mode)?)
        }
    }
}

/// Insert the demo data set: two teams of two members each.
fn seed(store: &SledStore) -> Result<serde_json::Value, CliError> {
    let team_a = store.insert_team("teamA")?;
    let team_b = store.insert_team("teamB")?;
    let members = vec![
        store.insert_member("member1", 10, Some(team_a.id))?,
        store.insert_member("member2", 20, Some(team_a.id))?,
        store.insert_member("member3", 30, Some(team_b.id))?,
        store.insert_member("member4", 40, Some(team_b.id))?,
    ];
    info!(teams = 2, members = members.len(), "demo data seeded");
    Ok(json!({ "teams": [team_a, team_b], "members": members }))
}

fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
