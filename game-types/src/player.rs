use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::PlayerId;
use crate::game::{Role, Team};

pub const AI_TAG_PREFIX: &str = "AI:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SeatOccupant {
    Human { player_id: PlayerId },
    Ai { model_id: String },
}

impl SeatOccupant {
    pub fn is_ai(&self) -> bool {
        matches!(self, SeatOccupant::Ai { .. })
    }

    /// Encoded form used by storage: the player UUID, or `AI:<model-id>`
    pub fn tag(&self) -> String {
        match self {
            SeatOccupant::Human { player_id } => player_id.to_string(),
            SeatOccupant::Ai { model_id } => format!("{AI_TAG_PREFIX}{model_id}"),
        }
    }

    pub fn from_tag(tag: &str) -> Option<SeatOccupant> {
        if let Some(model_id) = tag.strip_prefix(AI_TAG_PREFIX) {
            if model_id.is_empty() {
                return None;
            }
            return Some(SeatOccupant::Ai {
                model_id: model_id.to_string(),
            });
        }

        uuid::Uuid::parse_str(tag)
            .ok()
            .map(|player_id| SeatOccupant::Human { player_id })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeatAssignments {
    pub red_spymaster: SeatOccupant,
    pub red_operative: SeatOccupant,
    pub blue_spymaster: SeatOccupant,
    pub blue_operative: SeatOccupant,
}

impl SeatAssignments {
    pub fn get(&self, team: Team, role: Role) -> &SeatOccupant {
        match (team, role) {
            (Team::Red, Role::Spymaster) => &self.red_spymaster,
            (Team::Red, Role::Operative) => &self.red_operative,
            (Team::Blue, Role::Spymaster) => &self.blue_spymaster,
            (Team::Blue, Role::Operative) => &self.blue_operative,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ((Team, Role), &SeatOccupant)> {
        [
            ((Team::Red, Role::Spymaster), &self.red_spymaster),
            ((Team::Red, Role::Operative), &self.red_operative),
            ((Team::Blue, Role::Spymaster), &self.blue_spymaster),
            ((Team::Blue, Role::Operative), &self.blue_operative),
        ]
        .into_iter()
    }

    /// Seat held by a human player for the given role, if any
    pub fn seat_of(&self, player_id: PlayerId, role: Role) -> Option<Team> {
        [Team::Red, Team::Blue].into_iter().find(|team| {
            matches!(
                self.get(*team, role),
                SeatOccupant::Human { player_id: id } if *id == player_id
            )
        })
    }

    pub fn roles_of(&self, player_id: PlayerId) -> Vec<(Team, Role)> {
        self.iter()
            .filter(|(_, occupant)| {
                matches!(occupant, SeatOccupant::Human { player_id: id } if *id == player_id)
            })
            .map(|(seat, _)| seat)
            .collect()
    }
}

/// Who submitted a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Actor {
    Human(PlayerId),
    Ai(String),
}

impl Actor {
    pub fn is_ai(&self) -> bool {
        matches!(self, Actor::Ai(_))
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Human(player_id) => write!(f, "{player_id}"),
            Actor::Ai(model_id) => write!(f, "{AI_TAG_PREFIX}{model_id}"),
        }
    }
}

impl From<&SeatOccupant> for Actor {
    fn from(occupant: &SeatOccupant) -> Self {
        match occupant {
            SeatOccupant::Human { player_id } => Actor::Human(*player_id),
            SeatOccupant::Ai { model_id } => Actor::Ai(model_id.clone()),
        }
    }
}
