//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use arcane_defenders_core::{
    balance::SELL_REFUND_RATIO, CellCoord, EnemyId, Special, TowerDefinition, TowerId, TowerKind,
    TowerRole, TowerTier, Vec2,
};

use crate::enemies::TargetingProfile;

/// A tower standing on a build spot.
#[derive(Clone, Debug)]
pub struct Tower {
    id: TowerId,
    definition: &'static TowerDefinition,
    cell: CellCoord,
    position: Vec2,
    level: usize,
    damage_multiplier: f32,
    range_multiplier: f32,
    can_reveal: bool,
    since_last_fire: Duration,
    since_last_pulse: Duration,
    aura_members: Vec<TowerId>,
    target: Option<EnemyId>,
}

impl Tower {
    /// Creates a base-tier tower centred on the provided cell.
    #[must_use]
    pub fn new(id: TowerId, definition: &'static TowerDefinition, cell: CellCoord) -> Self {
        Self {
            id,
            definition,
            cell,
            position: cell.center(),
            level: 0,
            damage_multiplier: 1.0,
            range_multiplier: 1.0,
            can_reveal: false,
            since_last_fire: Duration::ZERO,
            since_last_pulse: Duration::ZERO,
            aura_members: Vec::new(),
            target: None,
        }
    }

    /// Identifier of the tower.
    #[must_use]
    pub const fn id(&self) -> TowerId {
        self.id
    }

    /// Archetype of the tower.
    #[must_use]
    pub const fn kind(&self) -> TowerKind {
        self.definition.kind
    }

    /// Static definition backing the tower.
    #[must_use]
    pub const fn definition(&self) -> &'static TowerDefinition {
        self.definition
    }

    /// Cell the tower occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Pixel position of the tower centre.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Zero-based upgrade level.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Statistics of the current tier.
    #[must_use]
    pub fn tier(&self) -> &'static TowerTier {
        self.definition.tier(self.level)
    }

    /// Special unlocked at the current tier.
    #[must_use]
    pub fn special(&self) -> Option<Special> {
        self.tier().special
    }

    /// Effective range after aura bonuses.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.tier().range * self.range_multiplier
    }

    /// Effective damage after aura bonuses.
    #[must_use]
    pub fn damage(&self) -> f32 {
        self.tier().damage * self.damage_multiplier
    }

    /// Current damage multiplier.
    #[must_use]
    pub const fn damage_multiplier(&self) -> f32 {
        self.damage_multiplier
    }

    /// Current range multiplier.
    #[must_use]
    pub const fn range_multiplier(&self) -> f32 {
        self.range_multiplier
    }

    /// Time between attacks at the current tier.
    #[must_use]
    pub fn fire_rate(&self) -> Duration {
        self.tier().fire_rate
    }

    /// Reports whether the tower currently sees stealthed enemies.
    #[must_use]
    pub const fn can_reveal(&self) -> bool {
        self.can_reveal
    }

    /// Capabilities used to filter targets.
    #[must_use]
    pub fn profile(&self) -> TargetingProfile {
        TargetingProfile {
            can_target_flying: self.definition.can_target_flying,
            can_reveal: self.can_reveal,
        }
    }

    /// Enemy the tower is currently aiming at.
    #[must_use]
    pub const fn target(&self) -> Option<EnemyId> {
        self.target
    }

    /// Records the enemy the tower is aiming at.
    pub fn set_target(&mut self, target: Option<EnemyId>) {
        self.target = target;
    }

    /// Gold needed to reach the next tier, if one exists.
    #[must_use]
    pub fn next_upgrade_cost(&self) -> Option<u32> {
        self.definition.upgrade_cost(self.level)
    }

    /// Base cost plus every upgrade purchased so far.
    #[must_use]
    pub fn total_cost(&self) -> u32 {
        let upgrades: u32 = self.definition.tiers[1..=self.level.min(self.definition.max_level())]
            .iter()
            .map(|tier| tier.upgrade_cost)
            .sum();
        self.definition.cost + upgrades
    }

    /// Refund paid when the tower is sold.
    #[must_use]
    pub fn sell_value(&self) -> u32 {
        (f64::from(self.total_cost()) * SELL_REFUND_RATIO).floor() as u32
    }

    /// Advances to the next tier. Returns `false` when already at the top tier.
    pub fn upgrade(&mut self) -> bool {
        if self.level >= self.definition.max_level() {
            return false;
        }
        self.level += 1;
        if self.special().is_some_and(Special::reveals) {
            self.can_reveal = true;
        }
        true
    }

    /// Drops last tick's aura bonuses.
    ///
    /// Support towers keep the detection granted by their own tier.
    pub fn reset_buffs(&mut self) {
        self.damage_multiplier = 1.0;
        self.range_multiplier = 1.0;
        if self.definition.role != TowerRole::Support {
            self.can_reveal = false;
        }
    }

    /// Applies an aura, keeping the strongest bonus when auras overlap.
    pub fn apply_aura(&mut self, damage_boost: f32, range_boost: f32, reveal: bool) {
        self.damage_multiplier = self.damage_multiplier.max(1.0 + damage_boost);
        self.range_multiplier = self.range_multiplier.max(1.0 + range_boost);
        if reveal {
            self.can_reveal = true;
        }
    }

    /// Adds elapsed time to the fire clock and returns the accumulated total.
    pub fn accumulate_fire_clock(&mut self, delta: Duration) -> Duration {
        self.since_last_fire = self.since_last_fire.saturating_add(delta);
        self.since_last_fire
    }

    /// Restarts the fire clock after an attack.
    pub fn reset_fire_clock(&mut self) {
        self.since_last_fire = Duration::ZERO;
    }

    /// Advances the aura pulse clock and reports whether a rescan is due.
    pub fn pulse_due(&mut self, delta: Duration, period: Duration) -> bool {
        self.since_last_pulse = self.since_last_pulse.saturating_add(delta);
        if self.since_last_pulse >= period {
            self.since_last_pulse = Duration::ZERO;
            return true;
        }
        false
    }

    /// Towers captured by the latest aura scan.
    #[must_use]
    pub fn aura_members(&self) -> &[TowerId] {
        &self.aura_members
    }

    /// Replaces the towers covered by the aura.
    pub fn set_aura_members(&mut self, members: Vec<TowerId>) {
        self.aura_members = members;
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Clone, Debug, Default)]
pub struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    occupancy: BTreeMap<CellCoord, TowerId>,
    next_tower_id: u32,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tower on a free cell and returns its identifier.
    ///
    /// Returns `None` when the cell is already occupied.
    pub fn insert(&mut self, kind: TowerKind, cell: CellCoord) -> Option<TowerId> {
        if self.occupancy.contains_key(&cell) {
            return None;
        }
        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id = self.next_tower_id.saturating_add(1);
        let _ = self.occupancy.insert(cell, id);
        let _ = self
            .entries
            .insert(id, Tower::new(id, kind.definition(), cell));
        Some(id)
    }

    /// Removes a tower and frees its cell.
    pub fn remove(&mut self, id: TowerId) -> Option<Tower> {
        let tower = self.entries.remove(&id)?;
        let _ = self.occupancy.remove(&tower.cell);
        Some(tower)
    }

    /// Looks up a tower by identifier.
    #[must_use]
    pub fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    /// Looks up a tower by identifier for mutation.
    pub fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    /// Identifier of the tower standing on the cell.
    #[must_use]
    pub fn at(&self, cell: CellCoord) -> Option<TowerId> {
        self.occupancy.get(&cell).copied()
    }

    /// Towers in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    /// Mutable towers in placement order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }

    /// Number of towers standing.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no towers stand.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sell_value_refunds_sixty_percent_of_investment() {
        let mut tower = Tower::new(
            TowerId::new(0),
            TowerKind::Arcane.definition(),
            CellCoord::new(1, 1),
        );
        assert_eq!(tower.sell_value(), 30);

        assert!(tower.upgrade());
        assert_eq!(tower.total_cost(), 90);
        assert_eq!(tower.sell_value(), 54);
    }

    #[test]
    fn upgrades_stop_at_the_top_tier() {
        let mut tower = Tower::new(
            TowerId::new(0),
            TowerKind::Frost.definition(),
            CellCoord::new(0, 0),
        );
        assert!(tower.upgrade());
        assert!(tower.upgrade());
        assert!(!tower.upgrade());
        assert_eq!(tower.level(), 2);
        assert_eq!(tower.special(), Some(Special::Freeze));
        assert_eq!(tower.total_cost(), 60 + 45 + 90);
        assert_eq!(tower.next_upgrade_cost(), None);
    }

    #[test]
    fn first_pulse_waits_a_full_period() {
        let mut enchanter = Tower::new(
            TowerId::new(0),
            TowerKind::Enchanter.definition(),
            CellCoord::new(0, 0),
        );
        let period = Duration::from_millis(2000);

        assert!(!enchanter.pulse_due(Duration::from_millis(16), period));
        assert!(!enchanter.pulse_due(Duration::from_millis(1983), period));
        assert!(enchanter.pulse_due(Duration::from_millis(1), period));
        assert!(!enchanter.pulse_due(Duration::from_millis(1999), period));
    }

    #[test]
    fn reveal_tier_survives_buff_reset_on_support_towers() {
        let mut enchanter = Tower::new(
            TowerId::new(0),
            TowerKind::Enchanter.definition(),
            CellCoord::new(0, 0),
        );
        assert!(enchanter.upgrade());
        enchanter.reset_buffs();
        assert!(enchanter.can_reveal());

        let mut arcane = Tower::new(
            TowerId::new(1),
            TowerKind::Arcane.definition(),
            CellCoord::new(1, 0),
        );
        arcane.apply_aura(0.25, 0.15, true);
        assert!(arcane.can_reveal());
        assert!((arcane.range() - 92.0).abs() < 1e-4);
        arcane.reset_buffs();
        assert!(!arcane.can_reveal());
        assert_eq!(arcane.range(), 80.0);
    }

    #[test]
    fn overlapping_auras_keep_the_strongest_bonus() {
        let mut tower = Tower::new(
            TowerId::new(0),
            TowerKind::Flame.definition(),
            CellCoord::new(0, 0),
        );
        tower.apply_aura(0.35, 0.2, false);
        tower.apply_aura(0.15, 0.1, false);
        assert!((tower.damage_multiplier() - 1.35).abs() < 1e-6);
        assert!((tower.range_multiplier() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn registry_rejects_occupied_cells_and_frees_on_removal() {
        let mut registry = TowerRegistry::new();
        let cell = CellCoord::new(4, 2);
        let id = registry.insert(TowerKind::Arcane, cell).expect("free cell");
        assert_eq!(registry.insert(TowerKind::Flame, cell), None);
        assert_eq!(registry.at(cell), Some(id));

        let removed = registry.remove(id).expect("tower exists");
        assert_eq!(removed.cell(), cell);
        assert!(registry.at(cell).is_none());
        assert!(registry.is_empty());
        assert_eq!(
            registry.insert(TowerKind::Flame, cell),
            Some(TowerId::new(1))
        );
    }
}
