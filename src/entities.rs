use crate::constants::*;
use crate::input::HeldKeys;
use crate::rendering::{Canvas, Visual};
use crate::types::{direction_between, fully_within_bounds, Rect, Vector2D};
use rand::Rng;

/// Shared surface of every non-player entity the simulation owns.
pub trait Entity {
    fn rect(&self) -> &Rect;
    fn is_alive(&self) -> bool;
    /// Terminal and idempotent.
    fn kill(&mut self);
    fn visual(&self) -> Visual;
    /// One tick of movement/lifetime. May mark the entity dead.
    fn advance(&mut self);

    fn draw(&self, canvas: &mut impl Canvas) {
        canvas.blit(self.visual(), self.rect());
    }
}

// --- Avatar ---

/// One of the eight key-derived directions. Components are -1, 0 or 1 and never both 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Facing {
    pub dx: i32,
    pub dy: i32,
}

impl Facing {
    pub const RIGHT: Facing = Facing { dx: 1, dy: 0 };

    pub fn from_movement(dx: i32, dy: i32) -> Option<Self> {
        if dx == 0 && dy == 0 {
            None
        } else {
            Some(Facing { dx: dx.signum(), dy: dy.signum() })
        }
    }

    pub fn unit(&self) -> Vector2D {
        Vector2D::new(self.dx as f64, self.dy as f64)
            .normalized()
            .unwrap_or(Vector2D::new(1.0, 0.0))
    }

    pub fn angle_deg(&self) -> f64 {
        self.unit().screen_angle_deg()
    }
}

impl Default for Facing {
    fn default() -> Self {
        Facing::RIGHT
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbilityState {
    Normal,
    Hyper { remaining: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvatarPose {
    Facing,
    Victory,
    Defeat,
}

pub struct Avatar {
    pub rect: Rect,
    pub facing: Facing,
    pub speed: f64,
    pub ability: AbilityState,
    pub pose: AvatarPose,
}

impl Avatar {
    pub fn new(x: f64, y: f64) -> Self {
        Avatar {
            rect: Rect::new(Vector2D::new(x, y), AVATAR_WIDTH, AVATAR_HEIGHT),
            facing: Facing::RIGHT,
            speed: AVATAR_SPEED,
            ability: AbilityState::Normal,
            pose: AvatarPose::Facing,
        }
    }

    pub fn apply_boost(&mut self, boost: bool) {
        self.speed = if boost { AVATAR_BOOST_SPEED } else { AVATAR_SPEED };
    }

    pub fn is_hyper(&self) -> bool {
        matches!(self.ability, AbilityState::Hyper { .. })
    }

    pub fn enter_hyper(&mut self) {
        self.ability = AbilityState::Hyper { remaining: HYPER_DURATION };
    }

    pub fn advance(&mut self, held: &HeldKeys) {
        let (dx, dy) = held.movement();
        let delta = Vector2D::new(dx as f64, dy as f64).scale(self.speed);
        self.rect.translate(delta);
        if !fully_within_bounds(&self.rect) {
            // No sliding along the wall: the whole step is undone.
            self.rect.translate(delta.scale(-1.0));
        }

        if let Some(facing) = Facing::from_movement(dx, dy) {
            self.facing = facing;
            self.pose = AvatarPose::Facing;
        }

        if let AbilityState::Hyper { remaining } = self.ability {
            let remaining = remaining - 1;
            self.ability = if remaining < 0 {
                AbilityState::Normal
            } else {
                AbilityState::Hyper { remaining }
            };
        }
    }

    pub fn visual(&self) -> Visual {
        Visual::Avatar { facing: self.facing, pose: self.pose, inverted: self.is_hyper() }
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.blit(self.visual(), &self.rect);
    }
}

// --- Projectile (enemy bomb) ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileStatus {
    Active,
    Inactive,
}

pub struct Projectile {
    pub rect: Rect,
    pub heading: Vector2D,
    pub speed: f64,
    pub status: ProjectileStatus,
    pub color: u8,
    alive: bool,
}

impl Projectile {
    /// Dropped from the bottom of `hostile`, aimed once at `target`.
    pub fn new(hostile: &Hostile, target: &Rect, rng: &mut impl Rng) -> Self {
        let radius = rng.gen_range(PROJECTILE_RADIUS_MIN..=PROJECTILE_RADIUS_MAX) as f64;
        let heading = direction_between(&hostile.rect, target).unwrap_or(Vector2D::new(0.0, 1.0));
        let center = Vector2D::new(hostile.rect.center.x, hostile.rect.bottom());
        Projectile {
            rect: Rect::new(center, radius * 2.0, radius * 2.0),
            heading,
            speed: PROJECTILE_SPEED,
            status: ProjectileStatus::Active,
            color: rng.gen_range(0..PROJECTILE_COLORS),
            alive: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ProjectileStatus::Active
    }

    /// EMP effect: half speed, harmless on contact. Lasts for the projectile's lifetime.
    pub fn disable(&mut self) {
        self.speed /= 2.0;
        self.status = ProjectileStatus::Inactive;
    }
}

impl Entity for Projectile {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kill(&mut self) {
        self.alive = false;
    }

    fn visual(&self) -> Visual {
        Visual::Projectile { color: self.color, inactive: !self.is_active() }
    }

    fn advance(&mut self) {
        self.rect.translate(self.heading.scale(self.speed));
        if !fully_within_bounds(&self.rect) {
            self.kill();
        }
    }
}

// --- Beam ---

pub struct Beam {
    pub rect: Rect,
    pub direction: Vector2D,
    alive: bool,
}

impl Beam {
    /// Fired along the avatar's facing, rotated by `offset_deg` (counter-clockwise on screen).
    pub fn new(avatar: &Avatar, offset_deg: f64) -> Self {
        let base_angle = avatar.facing.angle_deg();
        let direction = Vector2D::from_screen_angle_deg(base_angle + offset_deg);
        let center = Vector2D::new(
            avatar.rect.center.x + avatar.rect.width * direction.x,
            avatar.rect.center.y + avatar.rect.height * direction.y,
        );
        Beam {
            rect: Rect::rotated(center, BEAM_WIDTH, BEAM_HEIGHT, base_angle),
            direction,
            alive: true,
        }
    }
}

/// Angular offsets for a spread volley, evenly spaced across the spread span.
pub fn spread_offsets() -> Vec<f64> {
    let step = 2.0 * SPREAD_HALF_ANGLE_DEG / (SPREAD_BEAM_COUNT - 1) as f64;
    (0..SPREAD_BEAM_COUNT)
        .map(|i| -SPREAD_HALF_ANGLE_DEG + step * i as f64)
        .collect()
}

impl Entity for Beam {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kill(&mut self) {
        self.alive = false;
    }

    fn visual(&self) -> Visual {
        Visual::Beam
    }

    fn advance(&mut self) {
        self.rect.translate(self.direction.scale(BEAM_SPEED));
        if !fully_within_bounds(&self.rect) {
            self.kill();
        }
    }
}

// --- Hostile ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostileMode {
    Descending,
    Holding,
}

pub struct Hostile {
    pub rect: Rect,
    pub velocity: Vector2D,
    pub stop_altitude: f64,
    pub mode: HostileMode,
    /// Ticks between bomb drops. `None` once an EMP has silenced this hostile.
    pub drop_interval: Option<u64>,
    pub look: u8,
    pub disabled: bool,
    alive: bool,
}

impl Hostile {
    pub fn new(rng: &mut impl Rng) -> Self {
        let x = rng.gen_range(0.0..=FIELD_WIDTH);
        Hostile {
            rect: Rect::new(Vector2D::new(x, 0.0), HOSTILE_WIDTH, HOSTILE_HEIGHT),
            velocity: Vector2D::new(0.0, HOSTILE_DESCENT_SPEED),
            stop_altitude: rng.gen_range(HOSTILE_STOP_MIN..=HOSTILE_STOP_MAX),
            mode: HostileMode::Descending,
            drop_interval: Some(rng.gen_range(HOSTILE_DROP_INTERVAL_MIN..=HOSTILE_DROP_INTERVAL_MAX)),
            look: rng.gen_range(0..HOSTILE_LOOKS),
            disabled: false,
            alive: true,
        }
    }

    pub fn drops_bomb_at(&self, tick: u64) -> bool {
        self.mode == HostileMode::Holding
            && self.drop_interval.is_some_and(|interval| tick % interval == 0)
    }

    /// EMP effect: no further bomb drops, drawn as disabled.
    pub fn disable(&mut self) {
        self.drop_interval = None;
        self.disabled = true;
    }
}

impl Entity for Hostile {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kill(&mut self) {
        self.alive = false;
    }

    fn visual(&self) -> Visual {
        Visual::Hostile { look: self.look, disabled: self.disabled }
    }

    fn advance(&mut self) {
        if self.mode == HostileMode::Descending && self.rect.center.y > self.stop_altitude {
            self.velocity = Vector2D::ZERO;
            self.mode = HostileMode::Holding;
        }
        self.rect.translate(self.velocity);
    }
}

// --- Timed effects ---

/// Tick countdown shared by explosions, shields and gravity fields. Expires
/// once it drops below zero, so `Lifetime::new(n)` lasts `n + 1` ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lifetime {
    remaining: i32,
}

impl Lifetime {
    pub fn new(ticks: i32) -> Self {
        Lifetime { remaining: ticks }
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn tick(&mut self) {
        if !self.is_expired() {
            self.remaining -= 1;
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining < 0
    }

    pub fn expire(&mut self) {
        self.remaining = -1;
    }
}

pub struct Explosion {
    pub rect: Rect,
    pub life: Lifetime,
}

impl Explosion {
    pub fn new(at: &Rect, life: i32) -> Self {
        Explosion {
            rect: Rect::new(at.center, EXPLOSION_WIDTH, EXPLOSION_HEIGHT),
            life: Lifetime::new(life),
        }
    }

    /// Two-frame flicker, switching every `EXPLOSION_FLICKER_TICKS`.
    pub fn flipped(&self) -> bool {
        self.life.remaining().div_euclid(EXPLOSION_FLICKER_TICKS).rem_euclid(2) == 1
    }
}

impl Entity for Explosion {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn is_alive(&self) -> bool {
        !self.life.is_expired()
    }

    fn kill(&mut self) {
        self.life.expire();
    }

    fn visual(&self) -> Visual {
        Visual::Explosion { flipped: self.flipped() }
    }

    fn advance(&mut self) {
        self.life.tick();
    }
}

pub struct GravityField {
    pub rect: Rect,
    pub life: Lifetime,
}

impl GravityField {
    pub fn new(life: i32) -> Self {
        GravityField { rect: Rect::field(), life: Lifetime::new(life) }
    }
}

impl Entity for GravityField {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn is_alive(&self) -> bool {
        !self.life.is_expired()
    }

    fn kill(&mut self) {
        self.life.expire();
    }

    fn visual(&self) -> Visual {
        Visual::GravityField
    }

    fn advance(&mut self) {
        self.life.tick();
    }
}

pub struct Shield {
    pub rect: Rect,
    pub life: Lifetime,
}

impl Shield {
    /// A barrier standing one avatar-length ahead, turned to the avatar's facing.
    pub fn new(avatar: &Avatar, life: i32) -> Self {
        let facing = avatar.facing;
        let center = Vector2D::new(
            avatar.rect.center.x + facing.dx as f64 * avatar.rect.width,
            avatar.rect.center.y + facing.dy as f64 * avatar.rect.height,
        );
        Shield {
            rect: Rect::rotated(center, SHIELD_THICKNESS, avatar.rect.height * 2.0, facing.angle_deg()),
            life: Lifetime::new(life),
        }
    }
}

impl Entity for Shield {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn is_alive(&self) -> bool {
        !self.life.is_expired()
    }

    fn kill(&mut self) {
        self.life.expire();
    }

    fn visual(&self) -> Visual {
        Visual::Shield
    }

    fn advance(&mut self) {
        self.life.tick();
    }
}

/// Field-wide pulse. Its effects are applied by the simulation at creation;
/// the burst itself only counts down its visible lifetime.
pub struct EmpBurst {
    pub rect: Rect,
    pub countdown: f64,
    alive: bool,
}

impl EmpBurst {
    pub fn new() -> Self {
        EmpBurst { rect: Rect::field(), countdown: EMP_COUNTDOWN, alive: true }
    }
}

impl Entity for EmpBurst {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kill(&mut self) {
        self.alive = false;
    }

    fn visual(&self) -> Visual {
        Visual::EmpBurst
    }

    fn advance(&mut self) {
        self.countdown -= EMP_DECAY_PER_TICK;
        if self.countdown <= 0.0 {
            self.kill();
        }
    }
}
