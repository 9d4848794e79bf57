//! Sled-backed member store.

use std::collections::HashMap;

use roster_proto::{Filter, ReadQuery};
use sled::{Db, Tree};
use tracing::{debug, info};

use super::scan::{count_matching, execute_read};
use super::{JoinedRow, MemberRecord, MemberStore, TeamRecord};
use crate::config::StoreConfig;
use crate::error::Error;

/// Tree name for member records.
const MEMBER_TREE: &str = "members";

/// Tree name for team records.
const TEAM_TREE: &str = "teams";

/// Member and team storage on sled.
///
/// Keys are big-endian ids from [`Db::generate_id`], so a key-order scan
/// returns rows in insertion order.
pub struct SledStore {
    /// The underlying sled database.
    db: Db,

    /// Tree for member records.
    member_tree: Tree,

    /// Tree for team records.
    team_tree: Tree,
}

impl SledStore {
    /// Open or create a store with the given configuration.
    pub fn open(config: StoreConfig) -> Result<Self, Error> {
        let db = config.to_sled_config().open()?;
        let member_tree = db.open_tree(MEMBER_TREE)?;
        let team_tree = db.open_tree(TEAM_TREE)?;

        info!(
            path = %config.path.display(),
            temporary = config.temporary,
            recovered = db.was_recovered(),
            members = member_tree.len(),
            teams = team_tree.len(),
            "member store opened"
        );

        Ok(Self {
            db,
            member_tree,
            team_tree,
        })
    }

    /// Open a temporary store that is deleted on drop.
    pub fn temporary() -> Result<Self, Error> {
        Self::open(StoreConfig::temporary())
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.db.flush()?;
        Ok(())
    }

    /// Insert a team.
    pub fn insert_team(&self, name: impl Into<String>) -> Result<TeamRecord, Error> {
        let team = TeamRecord {
            id: self.db.generate_id()?,
            name: name.into(),
        };
        self.team_tree.insert(team.id.to_be_bytes(), team.to_bytes()?)?;
        debug!(team_id = team.id, name = %team.name, "team inserted");
        Ok(team)
    }

    /// Insert a member, optionally assigned to an existing team.
    pub fn insert_member(
        &self,
        name: impl Into<String>,
        age: i32,
        team_id: Option<u64>,
    ) -> Result<MemberRecord, Error> {
        if let Some(team_id) = team_id {
            self.require_team(team_id)?;
        }
        let member = MemberRecord {
            id: self.db.generate_id()?,
            name: name.into(),
            age,
            team_id,
        };
        self.member_tree
            .insert(member.id.to_be_bytes(), member.to_bytes()?)?;
        debug!(member_id = member.id, team_id = ?member.team_id, "member inserted");
        Ok(member)
    }

    /// Move a member to another team, or out of any team.
    pub fn change_team(&self, member_id: u64, team_id: Option<u64>) -> Result<(), Error> {
        if let Some(team_id) = team_id {
            self.require_team(team_id)?;
        }
        let mut member = self
            .member(member_id)?
            .ok_or_else(|| Error::NotFound(format!("member {member_id}")))?;
        member.team_id = team_id;
        self.member_tree
            .insert(member.id.to_be_bytes(), member.to_bytes()?)?;
        Ok(())
    }

    /// Look up a member by id.
    pub fn member(&self, id: u64) -> Result<Option<MemberRecord>, Error> {
        match self.member_tree.get(id.to_be_bytes())? {
            Some(bytes) => Ok(Some(MemberRecord::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Look up a team by id.
    pub fn team(&self, id: u64) -> Result<Option<TeamRecord>, Error> {
        match self.team_tree.get(id.to_be_bytes())? {
            Some(bytes) => Ok(Some(TeamRecord::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All members in key order.
    pub fn members(&self) -> Result<Vec<MemberRecord>, Error> {
        self.scan_members().collect()
    }

    /// Members with exactly this name.
    pub fn members_by_name(&self, name: &str) -> Result<Vec<MemberRecord>, Error> {
        let mut found = Vec::new();
        for member in self.scan_members() {
            let member = member?;
            if member.name == name {
                found.push(member);
            }
        }
        Ok(found)
    }

    fn require_team(&self, team_id: u64) -> Result<(), Error> {
        if self.team_tree.contains_key(team_id.to_be_bytes())? {
            Ok(())
        } else {
            Err(Error::NotFound(format!("team {team_id}")))
        }
    }

    fn scan_members(&self) -> impl Iterator<Item = Result<MemberRecord, Error>> + '_ {
        self.member_tree.iter().map(|result| {
            let (_key, value) = result?;
            MemberRecord::from_bytes(&value)
        })
    }

    fn load_teams(&self) -> Result<HashMap<u64, TeamRecord>, Error> {
        let mut teams = HashMap::new();
        for result in self.team_tree.iter() {
            let (_key, value) = result?;
            let team = TeamRecord::from_bytes(&value)?;
            teams.insert(team.id, team);
        }
        Ok(teams)
    }

    /// Left-join members with teams in member key order.
    fn scan_joined(&self) -> Result<impl Iterator<Item = Result<JoinedRow, Error>> + '_, Error> {
        let teams = self.load_teams()?;
        Ok(self.scan_members().map(move |member| {
            let member = member?;
            let team = member.team_id.and_then(|id| teams.get(&id).cloned());
            Ok(JoinedRow { member, team })
        }))
    }
}

impl MemberStore for SledStore {
    fn fetch(&self, query: &ReadQuery) -> Result<Vec<JoinedRow>, Error> {
        execute_read(self.scan_joined()?, query)
    }

    fn count(&self, filter: &Filter) -> Result<u64, Error> {
        count_matching(self.scan_joined()?, filter)
    }
}
