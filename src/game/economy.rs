//! Per-team gold and wood.
//!
//! Balances only move through BUILD/TRAIN (debits) and CUT/MINE (credits).
//! Debits are all-or-nothing: a cost is either paid in full or not at all.

use std::fmt;

use serde::Serialize;

use crate::game::{Team, TypeStats};

/// Which resource a team is short of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortfall {
    /// Not enough gold.
    Gold,
    /// Not enough wood.
    Wood,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shortfall::Gold => "gold",
            Shortfall::Wood => "wood",
        })
    }
}

/// A team's balances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Treasury {
    /// Gold balance.
    pub gold: i64,
    /// Wood balance.
    pub wood: i64,
}

/// Gold and wood for both teams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Economy {
    teams: [Treasury; 2],
}

impl Economy {
    /// Both teams start with the same balances.
    #[must_use]
    pub const fn new(starting_gold: i64, starting_wood: i64) -> Self {
        let start = Treasury {
            gold: starting_gold,
            wood: starting_wood,
        };
        Self {
            teams: [start, start],
        }
    }

    /// Balances of a team.
    #[must_use]
    pub const fn treasury(&self, team: Team) -> Treasury {
        self.teams[team.index()]
    }

    /// Gold balance of a team.
    #[must_use]
    pub const fn gold(&self, team: Team) -> i64 {
        self.teams[team.index()].gold
    }

    /// Wood balance of a team.
    #[must_use]
    pub const fn wood(&self, team: Team) -> i64 {
        self.teams[team.index()].wood
    }

    /// Credit gold to a team.
    pub fn add_gold(&mut self, team: Team, amount: i64) {
        let treasury = &mut self.teams[team.index()];
        treasury.gold = treasury.gold.saturating_add(amount);
    }

    /// Credit wood to a team.
    pub fn add_wood(&mut self, team: Team, amount: i64) {
        let treasury = &mut self.teams[team.index()];
        treasury.wood = treasury.wood.saturating_add(amount);
    }

    /// Check whether a team can pay for a type, gold first.
    ///
    /// # Errors
    ///
    /// Returns the first resource the team is short of.
    pub fn can_afford(&self, team: Team, stats: &TypeStats) -> Result<(), Shortfall> {
        let treasury = self.treasury(team);
        if treasury.gold < stats.gold_cost {
            return Err(Shortfall::Gold);
        }
        if treasury.wood < stats.wood_cost {
            return Err(Shortfall::Wood);
        }
        Ok(())
    }

    /// Pay for a type if the team can afford all of it.
    ///
    /// # Errors
    ///
    /// Returns the first resource the team is short of; balances are
    /// untouched in that case.
    pub fn pay(&mut self, team: Team, stats: &TypeStats) -> Result<(), Shortfall> {
        self.can_afford(team, stats)?;
        let treasury = &mut self.teams[team.index()];
        treasury.gold -= stats.gold_cost;
        treasury.wood -= stats.wood_cost;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::RobotType;

    #[test]
    fn test_starting_balances() {
        let economy = Economy::new(100, 40);
        for team in Team::ALL {
            assert_eq!(economy.gold(team), 100);
            assert_eq!(economy.wood(team), 40);
        }
    }

    #[test]
    fn test_pay_debits_both_resources() {
        let mut economy = Economy::new(100, 100);
        economy.pay(Team::Red, RobotType::Archer.stats()).unwrap();
        assert_eq!(economy.gold(Team::Red), 20);
        assert_eq!(economy.wood(Team::Red), 50);
        assert_eq!(economy.gold(Team::Blue), 100);
    }

    #[test]
    fn test_pay_is_all_or_nothing() {
        // Enough gold for a horse, not enough wood.
        let mut economy = Economy::new(200, 50);
        assert_eq!(
            economy.pay(Team::Blue, RobotType::Horse.stats()),
            Err(Shortfall::Wood)
        );
        assert_eq!(economy.gold(Team::Blue), 200);
        assert_eq!(economy.wood(Team::Blue), 50);
    }

    #[test]
    fn test_gold_is_checked_first() {
        let economy = Economy::new(0, 0);
        assert_eq!(
            economy.can_afford(Team::Red, RobotType::House.stats()),
            Err(Shortfall::Gold)
        );
    }

    #[test]
    fn test_credits() {
        let mut economy = Economy::default();
        economy.add_gold(Team::Red, 10);
        economy.add_wood(Team::Blue, 30);
        assert_eq!(economy.treasury(Team::Red), Treasury { gold: 10, wood: 0 });
        assert_eq!(economy.treasury(Team::Blue), Treasury { gold: 0, wood: 30 });
    }
}
