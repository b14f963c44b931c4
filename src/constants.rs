// --- Play Field ---
pub const FIELD_WIDTH: f64 = 1100.0;
pub const FIELD_HEIGHT: f64 = 650.0;
pub const TICKS_PER_SECOND: u64 = 50;
pub const LOSS_HOLD_MILLIS: u64 = 2000; // Defeat screen stays up this long before the round returns

// --- Avatar ---
pub const AVATAR_START_X: f64 = 900.0;
pub const AVATAR_START_Y: f64 = 400.0;
pub const AVATAR_WIDTH: f64 = 70.0;
pub const AVATAR_HEIGHT: f64 = 70.0;
pub const AVATAR_SPEED: f64 = 10.0;
pub const AVATAR_BOOST_SPEED: f64 = 20.0;

// --- Hostiles ---
pub const HOSTILE_SPAWN_INTERVAL: u64 = 200; // Ticks between hostile spawns
pub const HOSTILE_WIDTH: f64 = 60.0;
pub const HOSTILE_HEIGHT: f64 = 50.0;
pub const HOSTILE_DESCENT_SPEED: f64 = 6.0;
pub const HOSTILE_STOP_MIN: f64 = 50.0;
pub const HOSTILE_STOP_MAX: f64 = FIELD_HEIGHT / 2.0;
pub const HOSTILE_DROP_INTERVAL_MIN: u64 = 50;
pub const HOSTILE_DROP_INTERVAL_MAX: u64 = 300;
pub const HOSTILE_LOOKS: u8 = 3;

// --- Projectiles ---
pub const PROJECTILE_SPEED: f64 = 6.0;
pub const PROJECTILE_RADIUS_MIN: u32 = 10;
pub const PROJECTILE_RADIUS_MAX: u32 = 50;
pub const PROJECTILE_COLORS: u8 = 6;

// --- Beams ---
pub const BEAM_SPEED: f64 = 10.0;
pub const BEAM_WIDTH: f64 = 50.0; // Along the direction of travel
pub const BEAM_HEIGHT: f64 = 15.0;
pub const SPREAD_BEAM_COUNT: usize = 5;
pub const SPREAD_HALF_ANGLE_DEG: f64 = 50.0;

// --- Explosions ---
pub const EXPLOSION_WIDTH: f64 = 90.0;
pub const EXPLOSION_HEIGHT: f64 = 90.0;
pub const EXPLOSION_HOSTILE_LIFE: i32 = 100;
pub const EXPLOSION_PROJECTILE_LIFE: i32 = 50;
pub const EXPLOSION_SHIELD_LIFE: i32 = 30;
pub const EXPLOSION_FLICKER_TICKS: i32 = 10;

// --- Scoring ---
pub const SCORE_HOSTILE: u32 = 50;
pub const SCORE_PROJECTILE: u32 = 1;

// --- Abilities ---
pub const EMP_COST: u32 = 20;
pub const EMP_COUNTDOWN: f64 = 10.0;
pub const EMP_DECAY_PER_TICK: f64 = 0.5; // 20 ticks of visible burst

pub const HYPER_COST: u32 = 100;
pub const HYPER_DURATION: i32 = 500;

pub const SHIELD_COST: u32 = 50;
pub const SHIELD_LIFE: i32 = 400;
pub const SHIELD_THICKNESS: f64 = 20.0;

pub const GRAVITY_COST: u32 = 10;
pub const GRAVITY_LIFE: i32 = 40;
