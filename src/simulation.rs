use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::abilities::{Ability, ScoreLedger};
use crate::constants::*;
use crate::entities::{
    spread_offsets, Avatar, AvatarPose, Beam, EmpBurst, Entity, Explosion, GravityField, Hostile,
    Projectile, Shield,
};
use crate::input::{TickInput, Trigger};
use crate::rendering::Canvas;
use crate::types::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    /// The avatar was struck while vulnerable. Nothing advanced this tick.
    Defeated,
}

/// Owns every live entity and the score for one round.
pub struct Simulation {
    pub avatar: Avatar,
    pub beams: Vec<Beam>,
    pub hostiles: Vec<Hostile>,
    pub projectiles: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
    pub shields: Vec<Shield>,
    pub emp_bursts: Vec<EmpBurst>,
    pub gravity_fields: Vec<GravityField>,
    pub ledger: ScoreLedger,
    pub tick: u64,
    rng: StdRng,
}

impl Simulation {
    pub fn new(rng: StdRng) -> Self {
        Simulation {
            avatar: Avatar::new(AVATAR_START_X, AVATAR_START_Y),
            beams: Vec::new(),
            hostiles: Vec::new(),
            projectiles: Vec::new(),
            explosions: Vec::new(),
            shields: Vec::new(),
            emp_bursts: Vec::new(),
            gravity_fields: Vec::new(),
            ledger: ScoreLedger::new(0),
            tick: 0,
            rng,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Simulation::new(StdRng::seed_from_u64(seed))
    }

    pub fn score(&self) -> u32 {
        self.ledger.value()
    }

    /// One fixed-rate tick: triggers, spawns, collisions, then movement.
    pub fn step(&mut self, input: &TickInput) -> StepOutcome {
        for trigger in &input.triggers {
            match trigger {
                Trigger::Fire => self.fire(input.held.spread),
                Trigger::Emp => {
                    self.activate(Ability::Emp);
                }
                Trigger::Hyper => {
                    self.activate(Ability::Hyper);
                }
                Trigger::Shield => {
                    self.activate(Ability::Shield);
                }
                Trigger::Gravity => {
                    self.activate(Ability::Gravity);
                }
                Trigger::Quit => {}
            }
        }

        if self.tick % HOSTILE_SPAWN_INTERVAL == 0 {
            self.hostiles.push(Hostile::new(&mut self.rng));
            debug!("Hostile spawned at tick {}", self.tick);
        }

        for hostile in &self.hostiles {
            if hostile.drops_bomb_at(self.tick) {
                self.projectiles.push(Projectile::new(hostile, &self.avatar.rect, &mut self.rng));
            }
        }

        self.resolve_hostile_beam_hits();
        self.resolve_projectile_beam_hits();
        self.resolve_gravity_fields();
        if self.resolve_avatar_hits() == StepOutcome::Defeated {
            return StepOutcome::Defeated;
        }
        self.resolve_shield_hits();

        self.avatar.apply_boost(input.held.boost);
        self.avatar.advance(&input.held);
        advance_all(&mut self.beams);
        advance_all(&mut self.hostiles);
        advance_all(&mut self.projectiles);
        advance_all(&mut self.explosions);
        advance_all(&mut self.shields);
        advance_all(&mut self.emp_bursts);
        advance_all(&mut self.gravity_fields);

        self.tick += 1;
        StepOutcome::Continue
    }

    /// One beam straight ahead, or a spread volley when `spread` is held. Free.
    pub fn fire(&mut self, spread: bool) {
        if spread {
            for offset in spread_offsets() {
                self.beams.push(Beam::new(&self.avatar, offset));
            }
        } else {
            self.beams.push(Beam::new(&self.avatar, 0.0));
        }
    }

    fn is_live(&self, ability: Ability) -> bool {
        match ability {
            Ability::Emp => !self.emp_bursts.is_empty(),
            Ability::Shield => !self.shields.is_empty(),
            Ability::Hyper => self.avatar.is_hyper(),
            Ability::Gravity => !self.gravity_fields.is_empty(),
        }
    }

    /// Checks the precondition and balance, pays, then applies the effect.
    /// A refused activation leaves every piece of state untouched.
    pub fn activate(&mut self, ability: Ability) -> bool {
        if ability.exclusive() && self.is_live(ability) {
            debug!("{:?} refused: already active", ability);
            return false;
        }
        if !self.ledger.try_spend(ability.cost()) {
            debug!("{:?} refused: score {} below cost {}", ability, self.ledger.value(), ability.cost());
            return false;
        }

        match ability {
            Ability::Emp => self.release_emp(),
            Ability::Hyper => self.avatar.enter_hyper(),
            Ability::Shield => self.shields.push(Shield::new(&self.avatar, SHIELD_LIFE)),
            Ability::Gravity => self.gravity_fields.push(GravityField::new(GRAVITY_LIFE)),
        }
        debug!("{:?} activated at tick {}, score now {}", ability, self.tick, self.ledger.value());
        true
    }

    /// Silences every live hostile and defuses every live projectile. Later spawns are unaffected.
    fn release_emp(&mut self) {
        for hostile in &mut self.hostiles {
            hostile.disable();
        }
        for projectile in &mut self.projectiles {
            projectile.disable();
        }
        self.emp_bursts.push(EmpBurst::new());
    }

    fn resolve_hostile_beam_hits(&mut self) {
        let hit = collide_groups(&mut self.hostiles, &mut self.beams);
        for rect in &hit {
            self.explosions.push(Explosion::new(rect, EXPLOSION_HOSTILE_LIFE));
            self.ledger.award(SCORE_HOSTILE);
        }
        if !hit.is_empty() {
            self.avatar.pose = AvatarPose::Victory;
        }
    }

    fn resolve_projectile_beam_hits(&mut self) {
        for rect in collide_groups(&mut self.projectiles, &mut self.beams) {
            self.explosions.push(Explosion::new(&rect, EXPLOSION_PROJECTILE_LIFE));
            self.ledger.award(SCORE_PROJECTILE);
        }
    }

    fn resolve_gravity_fields(&mut self) {
        for field in &self.gravity_fields {
            for projectile in self.projectiles.iter_mut() {
                if projectile.is_alive() && field.rect.overlaps(&projectile.rect) {
                    projectile.kill();
                    self.explosions.push(Explosion::new(&projectile.rect, EXPLOSION_PROJECTILE_LIFE));
                    self.ledger.award(SCORE_PROJECTILE);
                }
            }
            for hostile in self.hostiles.iter_mut() {
                if hostile.is_alive() && field.rect.overlaps(&hostile.rect) {
                    hostile.kill();
                    self.explosions.push(Explosion::new(&hostile.rect, EXPLOSION_HOSTILE_LIFE));
                }
            }
        }
        self.projectiles.retain(|p| p.is_alive());
        self.hostiles.retain(|h| h.is_alive());
    }

    fn resolve_avatar_hits(&mut self) -> StepOutcome {
        let hyper = self.avatar.is_hyper();
        let mut struck = false;
        for projectile in self.projectiles.iter_mut() {
            if !projectile.rect.overlaps(&self.avatar.rect) {
                continue;
            }
            projectile.kill();
            if hyper {
                self.explosions.push(Explosion::new(&projectile.rect, EXPLOSION_PROJECTILE_LIFE));
                self.ledger.award(SCORE_PROJECTILE);
            } else if projectile.is_active() {
                struck = true;
            }
        }
        self.projectiles.retain(|p| p.is_alive());

        if struck {
            self.avatar.pose = AvatarPose::Defeat;
            info!("Avatar struck at tick {} with score {}", self.tick, self.ledger.value());
            StepOutcome::Defeated
        } else {
            StepOutcome::Continue
        }
    }

    fn resolve_shield_hits(&mut self) {
        for shield in &self.shields {
            for projectile in self.projectiles.iter_mut() {
                if projectile.is_alive() && shield.rect.overlaps(&projectile.rect) {
                    projectile.kill();
                    self.explosions.push(Explosion::new(&shield.rect, EXPLOSION_SHIELD_LIFE));
                }
            }
        }
        self.projectiles.retain(|p| p.is_alive());
    }

    /// Paints the avatar, then each group in fixed order, then the score.
    pub fn draw(&self, canvas: &mut impl Canvas) {
        self.avatar.draw(canvas);
        draw_all(&self.beams, canvas);
        draw_all(&self.hostiles, canvas);
        draw_all(&self.projectiles, canvas);
        draw_all(&self.explosions, canvas);
        draw_all(&self.shields, canvas);
        draw_all(&self.emp_bursts, canvas);
        draw_all(&self.gravity_fields, canvas);
        canvas.draw_score(self.ledger.value());
    }
}

fn advance_all<E: Entity>(group: &mut Vec<E>) {
    group.retain_mut(|entity| {
        entity.advance();
        entity.is_alive()
    });
}

fn draw_all<E: Entity>(group: &[E], canvas: &mut impl Canvas) {
    for entity in group {
        entity.draw(canvas);
    }
}

/// Kills every `a` touching a live `b`, and those `b`s with it. A `b` is spent on
/// the first `a` it touches. Returns the rectangles of the `a`s that were hit.
fn collide_groups<A: Entity, B: Entity>(a: &mut Vec<A>, b: &mut Vec<B>) -> Vec<Rect> {
    let mut hit = Vec::new();
    for first in a.iter_mut() {
        let mut touched = false;
        for second in b.iter_mut() {
            if second.is_alive() && first.rect().overlaps(second.rect()) {
                second.kill();
                touched = true;
            }
        }
        if touched {
            first.kill();
            hit.push(*first.rect());
        }
    }
    a.retain(|e| e.is_alive());
    b.retain(|e| e.is_alive());
    hit
}
