//! Tower health pools and the terminal-outcome check.

use bug_battle_core::TowerSide;

/// Fixed-position structure guarding one end of the lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Tower {
    hp: i32,
    max_hp: i32,
}

impl Tower {
    fn new(max_hp: i32) -> Self {
        Self { hp: max_hp, max_hp }
    }

    pub(crate) const fn hp(&self) -> i32 {
        self.hp
    }

    pub(crate) const fn max_hp(&self) -> i32 {
        self.max_hp
    }
}

/// The pair of towers that exist for the duration of a match.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Towers {
    player: Tower,
    enemy: Tower,
}

impl Towers {
    pub(crate) fn new(max_hp: i32) -> Self {
        Self {
            player: Tower::new(max_hp),
            enemy: Tower::new(max_hp),
        }
    }

    pub(crate) fn get(&self, side: TowerSide) -> Tower {
        match side {
            TowerSide::Player => self.player,
            TowerSide::Enemy => self.enemy,
        }
    }

    /// Applies impact damage to one tower and returns its remaining hp.
    pub(crate) fn damage(&mut self, side: TowerSide, amount: i32) -> i32 {
        let tower = match side {
            TowerSide::Player => &mut self.player,
            TowerSide::Enemy => &mut self.enemy,
        };
        tower.hp = (tower.hp - amount).max(0);
        tower.hp
    }

    /// Determines the winner once a tower has fallen.
    ///
    /// The enemy tower is inspected first so a simultaneous double zero
    /// resolves deterministically in the player's favour.
    pub(crate) fn fallen_winner(&self) -> Option<TowerSide> {
        if self.enemy.hp == 0 {
            Some(TowerSide::Player)
        } else if self.player.hp == 0 {
            Some(TowerSide::Enemy)
        } else {
            None
        }
    }
}
