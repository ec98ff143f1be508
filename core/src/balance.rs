//! Gameplay tuning constants.

use std::time::Duration;

/// Gold granted when a level does not specify its own starting purse.
pub const STARTING_GOLD: u32 = 100;
/// Lives granted when a level does not specify its own count.
pub const STARTING_LIVES: u32 = 20;
/// Gold bonus paid out when a non-final wave is cleared.
pub const WAVE_CLEAR_GOLD: u32 = 25;
/// Fraction of a tower's total investment returned when it is sold.
pub const SELL_REFUND_RATIO: f64 = 0.6;

/// Score awarded per kill.
pub const SCORE_PER_KILL: u32 = 10;
/// Score awarded per cleared non-final wave.
pub const SCORE_PER_WAVE: u32 = 100;
/// Score awarded per remaining life when the level is completed.
pub const SCORE_PER_LIFE: u32 = 50;
/// Flat score awarded for completing the level.
pub const SCORE_LEVEL_COMPLETE: u32 = 500;

/// Fractional hit point growth applied per wave after the first.
pub const HP_SCALE_PER_WAVE: f64 = 0.12;
/// Fractional bounty growth applied per wave after the first.
pub const GOLD_SCALE_PER_WAVE: f64 = 0.05;

/// Distance at which an enemy is considered to have reached its next waypoint.
pub const WAYPOINT_ARRIVAL_RADIUS: f32 = 2.0;
/// Distance at which a projectile connects with its target.
pub const PROJECTILE_HIT_RADIUS: f32 = 5.0;
/// Vertical offset above the tower centre at which projectiles spawn.
pub const MUZZLE_OFFSET: f32 = 8.0;
/// Fire period used by towers whose tier omits one.
pub const DEFAULT_FIRE_RATE: Duration = Duration::from_millis(1000);

/// Radius within which a chain lightning bolt can jump.
pub const CHAIN_JUMP_RADIUS: f32 = 50.0;
/// Chance that a stunning chain hit freezes its victim.
pub const CHAIN_STUN_CHANCE: f64 = 0.15;
/// Freeze duration applied by a stunning chain hit.
pub const CHAIN_STUN_DURATION: Duration = Duration::from_millis(600);

/// Chance that a freezing projectile locks its target in place.
pub const FREEZE_CHANCE: f64 = 0.15;
/// Freeze duration applied by a freezing projectile.
pub const FREEZE_DURATION: Duration = Duration::from_millis(1500);
/// Chance that a stunning projectile locks its target in place.
pub const STUN_CHANCE: f64 = 0.2;
/// Freeze duration applied by a stunning projectile.
pub const STUN_DURATION: Duration = Duration::from_millis(800);

/// Damage fraction shed at the edge of a splash radius.
pub const SPLASH_EDGE_FALLOFF: f32 = 0.5;
/// Fraction of burn strength and duration inflicted on splash victims.
pub const SPLASH_BURN_FRACTION: f32 = 0.5;

/// Period between support tower aura scans.
pub const SUPPORT_PULSE: Duration = Duration::from_millis(2000);

/// Period between barracks strikes.
pub const BARRACKS_STRIKE_PERIOD: Duration = Duration::from_millis(1000);
/// Slow strength inflicted by a barracks strike.
pub const BARRACKS_SLOW_AMOUNT: f32 = 0.5;
/// Slow duration inflicted by a barracks strike.
pub const BARRACKS_SLOW_DURATION: Duration = Duration::from_millis(500);

/// Radius of the meteor blast in pixels.
pub const METEOR_RADIUS: f32 = 35.0;
/// Damage dealt at the centre of a meteor blast.
pub const METEOR_PEAK_DAMAGE: f32 = 50.0;
/// Distance over which meteor damage falls off linearly.
pub const METEOR_FALLOFF_DISTANCE: f32 = 50.0;
/// Damage floor for enemies caught inside the blast.
pub const METEOR_MIN_DAMAGE: f32 = 20.0;
/// Burn strength applied to meteor victims.
pub const METEOR_BURN_DPS: f32 = 5.0;
/// Burn duration applied to meteor victims.
pub const METEOR_BURN_DURATION: Duration = Duration::from_millis(3000);
/// Cooldown between meteor casts.
pub const METEOR_COOLDOWN: Duration = Duration::from_millis(45_000);

/// Largest offset, in pixels, applied to freshly spawned enemies on each axis.
pub const SPAWN_JITTER: f32 = 3.0;
