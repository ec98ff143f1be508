#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gold, lives and score ledger.

use arcane_defenders_core::{
    balance::{
        SCORE_LEVEL_COMPLETE, SCORE_PER_KILL, SCORE_PER_LIFE, SCORE_PER_WAVE, WAVE_CLEAR_GOLD,
    },
    Event, Outbox,
};
use serde::Serialize;

/// Player purse and scorecard for a single level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Economy {
    gold: u32,
    lives: u32,
    max_lives: u32,
    score: u32,
    kills: u32,
    waves_completed: u32,
    #[serde(skip)]
    game_over: bool,
}

impl Economy {
    /// Creates a ledger holding the level's starting gold and lives.
    #[must_use]
    pub const fn new(starting_gold: u32, starting_lives: u32) -> Self {
        Self {
            gold: starting_gold,
            lives: starting_lives,
            max_lives: starting_lives,
            score: 0,
            kills: 0,
            waves_completed: 0,
            game_over: false,
        }
    }

    /// Gold available to spend.
    #[must_use]
    pub const fn gold(&self) -> u32 {
        self.gold
    }

    /// Lives remaining.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Lives granted at the start of the level.
    #[must_use]
    pub const fn max_lives(&self) -> u32 {
        self.max_lives
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Enemies killed so far.
    #[must_use]
    pub const fn kills(&self) -> u32 {
        self.kills
    }

    /// Waves cleared with a bonus so far.
    #[must_use]
    pub const fn waves_completed(&self) -> u32 {
        self.waves_completed
    }

    /// Reports whether the level ended in victory or defeat.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Reports whether the purse covers the cost.
    #[must_use]
    pub const fn can_afford(&self, cost: u32) -> bool {
        self.gold >= cost
    }

    /// Deducts the cost when affordable. Returns `false` and leaves the purse
    /// untouched otherwise.
    pub fn spend(&mut self, cost: u32, out: &mut Outbox) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.gold -= cost;
        out.emit(Event::GoldChanged { gold: self.gold });
        true
    }

    /// Adds gold to the purse.
    pub fn earn(&mut self, amount: u32, out: &mut Outbox) {
        self.gold = self.gold.saturating_add(amount);
        out.emit(Event::GoldChanged { gold: self.gold });
    }

    /// Removes lives, clamping at zero and ending the level on the last one.
    pub fn lose_life(&mut self, amount: u32, out: &mut Outbox) {
        self.lives = self.lives.saturating_sub(amount);
        out.emit(Event::LivesChanged { lives: self.lives });
        if self.lives == 0 {
            self.finish(false, out);
        }
    }

    /// Books a kill and pays out its bounty.
    pub fn add_kill(&mut self, bounty: u32, out: &mut Outbox) {
        self.kills += 1;
        self.score = self.score.saturating_add(SCORE_PER_KILL);
        self.earn(bounty, out);
    }

    /// Pays the bonus for clearing a wave that is not the last.
    pub fn complete_wave(&mut self, out: &mut Outbox) {
        self.waves_completed += 1;
        self.score = self.score.saturating_add(SCORE_PER_WAVE);
        self.earn(WAVE_CLEAR_GOLD, out);
    }

    /// Adds the completion bonus and ends the level in victory.
    ///
    /// Does nothing once the level already ended.
    pub fn complete_level(&mut self, out: &mut Outbox) {
        if self.game_over {
            return;
        }
        let survivors = self.lives.saturating_mul(SCORE_PER_LIFE);
        self.score = self
            .score
            .saturating_add(SCORE_LEVEL_COMPLETE)
            .saturating_add(survivors);
        self.finish(true, out);
    }

    fn finish(&mut self, victory: bool, out: &mut Outbox) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        out.emit(Event::GameOver { victory });
    }
}
