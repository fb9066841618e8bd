//! Vote domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use hackvote_core::{ProjectId, VoteId, VoterIp};

/// One recorded endorsement of a project. Votes are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vote {
    pub id: VoteId,
    pub project_id: ProjectId,
    pub voter_ip: VoterIp,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A vote that passed validation and is about to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVote {
    pub project_id: ProjectId,
    pub voter_ip: VoterIp,
    pub user_agent: Option<String>,
}

impl NewVote {
    /// Materialize the vote with a fresh ID and creation time.
    #[must_use]
    pub fn into_vote(self, created_at: DateTime<Utc>) -> Vote {
        Vote {
            id: VoteId::generate(),
            project_id: self.project_id,
            voter_ip: self.voter_ip,
            user_agent: self.user_agent,
            created_at,
        }
    }
}
