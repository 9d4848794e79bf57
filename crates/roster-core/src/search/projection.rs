//! Flat output rows.

use serde::Serialize;

use crate::store::JoinedRow;

/// One search result: member fields plus the team fields of the left join.
///
/// Team fields are `None` for members without a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedRow {
    member_id: u64,
    member_name: String,
    age: i32,
    team_id: Option<u64>,
    team_name: Option<String>,
}

impl ProjectedRow {
    pub(crate) fn from_joined(row: JoinedRow) -> Self {
        let (team_id, team_name) = match row.team {
            Some(team) => (Some(team.id), Some(team.name)),
            None => (None, None),
        };
        Self {
            member_id: row.member.id,
            member_name: row.member.name,
            age: row.member.age,
            team_id,
            team_name,
        }
    }

    pub fn member_id(&self) -> u64 {
        self.member_id
    }

    pub fn member_name(&self) -> &str {
        &self.member_name
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn team_id(&self) -> Option<u64> {
        self.team_id
    }

    pub fn team_name(&self) -> Option<&str> {
        self.team_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemberRecord, TeamRecord};

    #[test]
    fn test_projection_with_team() {
        let row = JoinedRow {
            member: MemberRecord {
                id: 3,
                name: "member3".to_string(),
                age: 30,
                team_id: Some(2),
            },
            team: Some(TeamRecord {
                id: 2,
                name: "teamB".to_string(),
            }),
        };

        let projected = ProjectedRow::from_joined(row);
        assert_eq!(projected.member_id(), 3);
        assert_eq!(projected.member_name(), "member3");
        assert_eq!(projected.age(), 30);
        assert_eq!(projected.team_id(), Some(2));
        assert_eq!(projected.team_name(), Some("teamB"));
    }

    #[test]
    fn test_projection_without_team() {
        let row = JoinedRow {
            member: MemberRecord {
                id: 9,
                name: "loner".to_string(),
                age: 50,
                team_id: None,
            },
            team: None,
        };

        let projected = ProjectedRow::from_joined(row);
        assert_eq!(projected.team_id(), None);
        assert_eq!(projected.team_name(), None);

        let json = serde_json::to_value(&projected).unwrap();
        assert_eq!(json["memberName"], "loner");
        assert!(json["teamName"].is_null());
    }
}
