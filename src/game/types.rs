//! Robot type catalog, teams, and the legal BUILD/TRAIN transitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Starting health of every tree.
pub const TREE_STARTING_HEALTH: i32 = 200;

/// Starting health of every gold mine.
pub const GOLD_MINE_STARTING_HEALTH: i32 = 5000;

/// Wood granted by a single CUT, regardless of the tree's remaining health.
pub const CUT_AMOUNT: i64 = 10;

/// Gold granted by a single MINE, regardless of the mine's remaining health.
pub const MINE_AMOUNT: i64 = 10;

/// One of the two competing teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Team {
    /// The red team.
    Red,
    /// The blue team.
    Blue,
}

impl Team {
    /// Both teams, in index order.
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    /// Index used for per-team arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Team::Red => 0,
            Team::Blue => 1,
        }
    }

    /// Wire name of the team.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Team::Red => "RED",
            Team::Blue => "BLUE",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Static stats of a robot type.
///
/// Radii are squared distances. Buildings carry zeros for every unit-only
/// field and never move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeStats {
    /// Gold debited when the type is built or trained.
    pub gold_cost: i64,
    /// Wood debited when the type is built or trained.
    pub wood_cost: i64,
    /// Health a fresh robot of this type starts with.
    pub starting_health: i32,
    /// Squared vision radius (consumed by the external visibility component).
    pub vision_radius: i32,
    /// Base per-turn time budget in milliseconds.
    pub time_limit_ms: u64,
    /// Squared distance a MOVE may cover.
    pub move_radius: i32,
    /// Squared distance an ATTACK may target.
    pub attack_radius: i32,
    /// Squared radius of an ATTACK's area of effect.
    pub damage_radius: i32,
    /// Damage dealt to everything inside the area of effect.
    pub attack_damage: i32,
}

impl TypeStats {
    #[allow(clippy::too_many_arguments)]
    const fn unit(
        gold_cost: i64,
        wood_cost: i64,
        starting_health: i32,
        vision_radius: i32,
        move_radius: i32,
        attack_radius: i32,
        damage_radius: i32,
        attack_damage: i32,
        time_limit_ms: u64,
    ) -> Self {
        Self {
            gold_cost,
            wood_cost,
            starting_health,
            vision_radius,
            time_limit_ms,
            move_radius,
            attack_radius,
            damage_radius,
            attack_damage,
        }
    }

    const fn building(
        gold_cost: i64,
        wood_cost: i64,
        starting_health: i32,
        vision_radius: i32,
        time_limit_ms: u64,
    ) -> Self {
        Self::unit(
            gold_cost,
            wood_cost,
            starting_health,
            vision_radius,
            0,
            0,
            0,
            0,
            time_limit_ms,
        )
    }
}

const ARCHER: TypeStats = TypeStats::unit(80, 50, 50, 150, 2, 80, 0, 10, 20);
const HORSE: TypeStats = TypeStats::unit(150, 100, 100, 80, 5, 1, 0, 30, 20);
const PEASANT: TypeStats = TypeStats::unit(50, 20, 50, 60, 2, -1, -1, 0, 20);
const PIKE: TypeStats = TypeStats::unit(100, 120, 150, 80, 1, 5, 0, 10, 20);
const HOUSE: TypeStats = TypeStats::building(500, 800, 300, 100, 20);

/// A robot type from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RobotType {
    /// Long-range unit.
    Archer,
    /// Fast melee unit.
    Horse,
    /// Gathering unit; the only type that can CUT and MINE.
    Peasant,
    /// Durable short-range unit.
    Pike,
    /// Immobile building that produces peasants.
    House,
}

/// (builder, built) pairs allowed for BUILD.
pub const LEGAL_BUILDS: [(RobotType, RobotType); 2] = [
    (RobotType::Peasant, RobotType::House),
    (RobotType::House, RobotType::Peasant),
];

/// (current, target) pairs allowed for TRAIN.
pub const LEGAL_TRAINS: [(RobotType, RobotType); 3] = [
    (RobotType::Peasant, RobotType::Archer),
    (RobotType::Peasant, RobotType::Horse),
    (RobotType::Peasant, RobotType::Pike),
];

impl RobotType {
    /// Every type in the catalog.
    pub const ALL: [RobotType; 5] = [
        RobotType::Archer,
        RobotType::Horse,
        RobotType::Peasant,
        RobotType::Pike,
        RobotType::House,
    ];

    /// Stats for this type.
    #[must_use]
    pub const fn stats(self) -> &'static TypeStats {
        match self {
            RobotType::Archer => &ARCHER,
            RobotType::Horse => &HORSE,
            RobotType::Peasant => &PEASANT,
            RobotType::Pike => &PIKE,
            RobotType::House => &HOUSE,
        }
    }

    /// Whether this type is a mobile unit.
    #[must_use]
    pub const fn is_unit(self) -> bool {
        !self.is_building()
    }

    /// Whether this type is an immobile building.
    #[must_use]
    pub const fn is_building(self) -> bool {
        matches!(self, RobotType::House)
    }

    /// Whether this type may CUT trees and MINE gold.
    #[must_use]
    pub const fn gathers(self) -> bool {
        matches!(self, RobotType::Peasant)
    }

    /// Whether a robot of this type may BUILD `target`.
    #[must_use]
    pub fn can_build(self, target: RobotType) -> bool {
        LEGAL_BUILDS.contains(&(self, target))
    }

    /// Whether a robot of this type may TRAIN into `target`.
    #[must_use]
    pub fn can_train(self, target: RobotType) -> bool {
        LEGAL_TRAINS.contains(&(self, target))
    }

    /// Wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RobotType::Archer => "ARCHER",
            RobotType::Horse => "HORSE",
            RobotType::Peasant => "PEASANT",
            RobotType::Pike => "PIKE",
            RobotType::House => "HOUSE",
        }
    }
}

impl fmt::Display for RobotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error for a type name that is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown robot type '{0}'")]
pub struct UnknownType(pub String);

impl FromStr for RobotType {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RobotType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownType(s.to_string()))
    }
}
