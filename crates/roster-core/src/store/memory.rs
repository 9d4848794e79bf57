//! In-memory member store.

use std::collections::HashMap;

use parking_lot::RwLock;
use roster_proto::{Filter, ReadQuery};

use super::scan::{count_matching, execute_read};
use super::{JoinedRow, MemberRecord, MemberStore, TeamRecord};
use crate::error::Error;

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    teams: HashMap<u64, TeamRecord>,
    // Insertion order is the store-native order.
    members: Vec<MemberRecord>,
}

impl State {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn joined_rows(&self) -> Vec<Result<JoinedRow, Error>> {
        self.members
            .iter()
            .map(|member| {
                Ok(JoinedRow {
                    member: member.clone(),
                    team: member.team_id.and_then(|id| self.teams.get(&id).cloned()),
                })
            })
            .collect()
    }
}

/// A member store held entirely in memory.
///
/// Reads take a shared lock for the duration of one scan, so a fetch and the
/// following count of the same request may observe different states.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a team.
    pub fn insert_team(&self, name: impl Into<String>) -> TeamRecord {
        let mut state = self.state.write();
        let team = TeamRecord {
            id: state.allocate_id(),
            name: name.into(),
        };
        state.teams.insert(team.id, team.clone());
        team
    }

    /// Insert a member, optionally assigned to an existing team.
    pub fn insert_member(
        &self,
        name: impl Into<String>,
        age: i32,
        team_id: Option<u64>,
    ) -> Result<MemberRecord, Error> {
        let mut state = self.state.write();
        if let Some(team_id) = team_id {
            if !state.teams.contains_key(&team_id) {
                return Err(Error::NotFound(format!("team {team_id}")));
            }
        }
        let member = MemberRecord {
            id: state.allocate_id(),
            name: name.into(),
            age,
            team_id,
        };
        state.members.push(member.clone());
        Ok(member)
    }

    /// Move a member to another team, or out of any team.
    pub fn change_team(&self, member_id: u64, team_id: Option<u64>) -> Result<(), Error> {
        let mut state = self.state.write();
        if let Some(team_id) = team_id {
            if !state.teams.contains_key(&team_id) {
                return Err(Error::NotFound(format!("team {team_id}")));
            }
        }
        let member = state
            .members
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or_else(|| Error::NotFound(format!("member {member_id}")))?;
        member.team_id = team_id;
        Ok(())
    }

    /// Look up a member by id.
    pub fn member(&self, id: u64) -> Option<MemberRecord> {
        self.state.read().members.iter().find(|m| m.id == id).cloned()
    }

    /// Look up a team by id.
    pub fn team(&self, id: u64) -> Option<TeamRecord> {
        self.state.read().teams.get(&id).cloned()
    }

    /// All members in store-native order.
    pub fn members(&self) -> Vec<MemberRecord> {
        self.state.read().members.clone()
    }

    /// Members with exactly this name.
    pub fn members_by_name(&self, name: &str) -> Vec<MemberRecord> {
        self.state
            .read()
            .members
            .iter()
            .filter(|m| m.name == name)
            .cloned()
            .collect()
    }
}

impl MemberStore for MemoryStore {
    fn fetch(&self, query: &ReadQuery) -> Result<Vec<JoinedRow>, Error> {
        let rows = self.state.read().joined_rows();
        execute_read(rows, query)
    }

    fn count(&self, filter: &Filter) -> Result<u64, Error> {
        let rows = self.state.read().joined_rows();
        count_matching(rows, filter)
    }
}
