//! Per-tick intents (input layer → arbitration core)
//!
//! Игрок (input translator) и AI пишут сюда каждый tick через `input_*`.
//! Повторный вызов в том же tick = тот же эффект (первый запрос выигрывает),
//! кроме `input_recoil`: он накапливается.
//! `clear_intents` обнуляет всё в конце tick'а.

use bevy::prelude::*;

/// Движение: направление (world space, XZ) + magnitude 0..1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementIntent {
    pub direction: Vec3,
    pub magnitude: f32,
    pub sprint: bool,
}

/// Friend detection режим для fire intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendFilter {
    /// Не стрелять в себя (health root == firer)
    SelfIgnore,
    /// Не засчитывать попадания по фракции `side`
    Side(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FireIntent {
    pub friend_filter: Option<FriendFilter>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpIntent {
    /// Угол прыжка (градусы от горизонта)
    pub angle: f32,
    pub forward_multiplier: f32,
}

/// Край, на который лезем (host geometry)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimbTarget {
    pub point: Vec3,
    /// Высота препятствия над ногами агента (метры)
    pub height: f32,
}

/// Все запросы агента на текущий tick
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct IntentSet {
    pub movement: Option<MovementIntent>,
    pub aim: bool,
    pub zoom: bool,
    pub fire: Option<FireIntent>,
    pub fire_when_ready: bool,
    pub reload: bool,
    /// Pump через `delay` секунд
    pub pump: Option<f32>,
    pub jump: Option<JumpIntent>,
    /// Угол roll (градусы, относительно heading)
    pub roll: Option<f32>,
    pub climb: Option<ClimbTarget>,
    pub throw: Option<Vec3>,
    pub take_cover: bool,
    pub leave_cover: bool,
    pub crouch: bool,
    pub melee: bool,
    pub custom_action: Option<u32>,
    /// (vertical, horizontal) градусы, накапливается за tick
    pub recoil: Vec2,
}

impl IntentSet {
    pub fn input_movement(&mut self, direction: Vec3, magnitude: f32, sprint: bool) {
        self.movement.get_or_insert(MovementIntent {
            direction,
            magnitude: magnitude.clamp(0.0, 1.0),
            sprint,
        });
    }

    pub fn input_aim(&mut self) {
        self.aim = true;
    }

    pub fn input_zoom(&mut self) {
        self.zoom = true;
    }

    pub fn input_fire(&mut self) {
        self.fire.get_or_insert(FireIntent::default());
    }

    /// Fire с friend detection по фракции
    pub fn input_fire_on_condition(&mut self, side: u64) {
        let fire = self.fire.get_or_insert(FireIntent::default());
        fire.friend_filter.get_or_insert(FriendFilter::Side(side));
    }

    pub fn input_fire_ignoring_self(&mut self) {
        let fire = self.fire.get_or_insert(FireIntent::default());
        fire.friend_filter.get_or_insert(FriendFilter::SelfIgnore);
    }

    pub fn input_fire_when_ready(&mut self) {
        self.fire_when_ready = true;
    }

    pub fn input_reload(&mut self) {
        self.reload = true;
    }

    pub fn input_pump(&mut self, delay: f32) {
        self.pump.get_or_insert(delay.max(0.0));
    }

    pub fn input_jump(&mut self, angle: f32, forward_multiplier: f32) {
        self.jump.get_or_insert(JumpIntent {
            angle,
            forward_multiplier,
        });
    }

    pub fn input_roll(&mut self, angle: f32) {
        self.roll.get_or_insert(angle);
    }

    pub fn input_climb_or_vault(&mut self, target: ClimbTarget) {
        self.climb.get_or_insert(target);
    }

    pub fn input_throw_grenade(&mut self, target: Vec3) {
        self.throw.get_or_insert(target);
    }

    pub fn input_take_cover(&mut self) {
        self.take_cover = true;
    }

    pub fn input_leave_cover(&mut self) {
        self.leave_cover = true;
    }

    pub fn input_crouch(&mut self) {
        self.crouch = true;
    }

    pub fn input_melee(&mut self) {
        self.melee = true;
    }

    pub fn input_custom_action(&mut self, id: u32) {
        self.custom_action.get_or_insert(id);
    }

    /// Cumulative: внешняя отдача (взрыв, удар) суммируется
    pub fn input_recoil(&mut self, vertical: f32, horizontal: f32) {
        self.recoil += Vec2::new(vertical, horizontal);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_inputs_are_idempotent() {
        let mut intents = IntentSet::default();
        intents.input_roll(30.0);
        intents.input_roll(-90.0);
        intents.input_fire_on_condition(3);
        intents.input_fire_on_condition(5);

        assert_eq!(intents.roll, Some(30.0));
        assert_eq!(
            intents.fire,
            Some(FireIntent {
                friend_filter: Some(FriendFilter::Side(3))
            })
        );
    }

    #[test]
    fn test_recoil_input_is_cumulative() {
        let mut intents = IntentSet::default();
        intents.input_recoil(1.0, 0.5);
        intents.input_recoil(2.0, -0.5);
        assert_eq!(intents.recoil, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut intents = IntentSet::default();
        intents.input_aim();
        intents.input_movement(Vec3::X, 2.0, true);
        intents.input_custom_action(4);
        assert_eq!(intents.movement.map(|m| m.magnitude), Some(1.0));

        intents.clear();
        assert_eq!(intents, IntentSet::default());
    }
}
