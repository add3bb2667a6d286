//! Participant, Division and the registration/edit payloads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a participant (used in match slots and lookups).
pub type ParticipantId = Uuid;

/// Fixed skill tiers; each division runs its own independent bracket.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Division {
    Elite,
    Division1,
    Division2,
    Recruits,
}

impl Division {
    pub const ALL: [Division; 4] = [
        Division::Elite,
        Division::Division1,
        Division::Division2,
        Division::Recruits,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Division::Elite => "elite",
            Division::Division1 => "division1",
            Division::Division2 => "division2",
            Division::Recruits => "recruits",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known division.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownDivision(pub String);

impl fmt::Display for UnknownDivision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown division: {}", self.0)
    }
}

impl std::error::Error for UnknownDivision {}

impl FromStr for Division {
    type Err = UnknownDivision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Division::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDivision(s.to_string()))
    }
}

/// Availability of a participant, edited by admins.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    #[default]
    Active,
    InGame,
    Inactive,
}

/// A registered participant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub player_name: String,
    pub discord_user: String,
    pub roblox_user: String,
    pub division: Division,
    pub experience: Option<String>,
    pub score: i32,
    pub status: ParticipantStatus,
}

impl Participant {
    /// Build a participant from a registration. Score starts at zero, status at active.
    pub fn from_registration(registration: NewParticipant) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_name: registration.player_name,
            discord_user: registration.discord_user,
            roblox_user: registration.roblox_user,
            division: registration.division,
            experience: registration.experience,
            score: 0,
            status: ParticipantStatus::Active,
        }
    }

    /// Apply the fields present in `patch`.
    pub fn apply(&mut self, patch: &ParticipantPatch) {
        if let Some(name) = &patch.player_name {
            self.player_name = name.clone();
        }
        if let Some(discord) = &patch.discord_user {
            self.discord_user = discord.clone();
        }
        if let Some(roblox) = &patch.roblox_user {
            self.roblox_user = roblox.clone();
        }
        if let Some(division) = patch.division {
            self.division = division;
        }
        if let Some(experience) = &patch.experience {
            self.experience = experience.clone();
        }
        if let Some(score) = patch.score {
            self.score = score;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Registration form fields.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewParticipant {
    pub player_name: String,
    pub discord_user: String,
    pub roblox_user: String,
    pub division: Division,
    #[serde(default)]
    pub experience: Option<String>,
}

impl NewParticipant {
    /// Registration with empty contact handles (handy for admin tooling and tests).
    pub fn named(player_name: impl Into<String>, division: Division) -> Self {
        Self {
            player_name: player_name.into(),
            discord_user: String::new(),
            roblox_user: String::new(),
            division,
            experience: None,
        }
    }
}

/// Partial participant update; absent fields are left unchanged. `experience`
/// sent as `null` is cleared.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ParticipantPatch {
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub discord_user: Option<String>,
    #[serde(default)]
    pub roblox_user: Option<String>,
    #[serde(default)]
    pub division: Option<Division>,
    #[serde(
        default,
        deserialize_with = "crate::models::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub experience: Option<Option<String>>,
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub status: Option<ParticipantStatus>,
}
