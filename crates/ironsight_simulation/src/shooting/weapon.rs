//! Weapon config (static data) + ammo counters
//!
//! Один `WeaponConfig` для всех классов оружия: ranged поля у ножа
//! просто не используются (и наоборот). Загружается из JSON (serde), либо
//! через presets.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Класс оружия
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponClass {
    Pistol,
    #[default]
    Rifle,
    Shotgun,
    /// Тяжёлое: roll и jump запрещены
    Heavy,
    /// Холодное: fire intent = melee sweep
    Melee,
}

/// Как пополняется магазин
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReloadMode {
    /// Весь магазин за один clip
    #[default]
    Magazine,
    /// По одному патрону
    Bullet,
    /// По одному патрону + pump в конце
    BulletThenPump,
}

/// Static weapon data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub class: WeaponClass,

    /// Shot groups в секунду
    pub rate_of_fire: f32,

    /// Projectiles в одной группе (дробь)
    pub bullets_per_shot: u32,

    pub magazine: u32,

    /// Дальность raycast / melee sweep (метры)
    pub distance: f32,

    /// Урон одного projectile
    pub damage: u32,

    /// Полный угол разброса (градусы)
    pub spread_degrees: f32,

    pub reload_mode: ReloadMode,

    /// true = одна группа тратит один патрон (дробовик)
    pub consume_single_bullet_per_shot: bool,

    /// Выстрел прерывает загрузку патронов (иначе fire игнорируется)
    pub fire_interrupts_reload: bool,

    // === Melee ===
    pub melee_radius: f32,
    pub melee_cooldown: f32,
    pub melee_damage: u32,

    // === Recoil (градусы за группу) ===
    pub recoil_vertical: f32,
    pub recoil_horizontal: f32,

    /// Смещение дула от origin агента (local space)
    pub muzzle_offset: [f32; 3],

    /// Запас патронов (None = бесконечный)
    pub reserve: Option<u32>,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self::rifle()
    }
}

/// Минимальный rate of fire (защита от деления на 0)
const MIN_RATE_OF_FIRE: f32 = 0.01;

impl WeaponConfig {
    pub fn pistol() -> Self {
        Self {
            class: WeaponClass::Pistol,
            rate_of_fire: 4.0,
            bullets_per_shot: 1,
            magazine: 12,
            distance: 40.0,
            damage: 15,
            spread_degrees: 2.0,
            reload_mode: ReloadMode::Magazine,
            consume_single_bullet_per_shot: false,
            fire_interrupts_reload: false,
            melee_radius: 0.4,
            melee_cooldown: 0.8,
            melee_damage: 10,
            recoil_vertical: 2.0,
            recoil_horizontal: 0.5,
            muzzle_offset: [0.2, 1.4, -0.4],
            reserve: None,
        }
    }

    pub fn rifle() -> Self {
        Self {
            class: WeaponClass::Rifle,
            rate_of_fire: 10.0,
            bullets_per_shot: 1,
            magazine: 30,
            distance: 120.0,
            damage: 20,
            spread_degrees: 1.5,
            recoil_vertical: 1.2,
            recoil_horizontal: 0.4,
            muzzle_offset: [0.2, 1.4, -0.7],
            ..Self::pistol()
        }
    }

    pub fn shotgun() -> Self {
        Self {
            class: WeaponClass::Shotgun,
            rate_of_fire: 1.2,
            bullets_per_shot: 8,
            magazine: 6,
            distance: 25.0,
            damage: 8,
            spread_degrees: 10.0,
            reload_mode: ReloadMode::BulletThenPump,
            consume_single_bullet_per_shot: true,
            fire_interrupts_reload: true,
            recoil_vertical: 6.0,
            recoil_horizontal: 1.5,
            muzzle_offset: [0.2, 1.4, -0.8],
            ..Self::pistol()
        }
    }

    pub fn machine_gun() -> Self {
        Self {
            class: WeaponClass::Heavy,
            rate_of_fire: 14.0,
            magazine: 100,
            distance: 150.0,
            damage: 18,
            spread_degrees: 3.0,
            recoil_vertical: 0.8,
            recoil_horizontal: 0.8,
            ..Self::rifle()
        }
    }

    pub fn knife() -> Self {
        Self {
            class: WeaponClass::Melee,
            rate_of_fire: 1.5,
            bullets_per_shot: 0,
            magazine: 0,
            distance: 1.6,
            damage: 0,
            spread_degrees: 0.0,
            melee_radius: 0.5,
            melee_cooldown: 0.6,
            melee_damage: 35,
            recoil_vertical: 0.0,
            recoil_horizontal: 0.0,
            muzzle_offset: [0.0, 1.2, -0.3],
            ..Self::pistol()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WeaponConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn sanitized(mut self) -> Self {
        self.rate_of_fire = self.rate_of_fire.max(MIN_RATE_OF_FIRE);
        self.distance = self.distance.max(0.0);
        self.spread_degrees = self.spread_degrees.clamp(0.0, 180.0);
        self.melee_radius = self.melee_radius.max(0.0);
        self.melee_cooldown = self.melee_cooldown.max(0.0);
        if !self.is_melee() {
            self.bullets_per_shot = self.bullets_per_shot.max(1);
        }
        self
    }

    /// Интервал между shot groups (секунды)
    pub fn fire_delay(&self) -> f32 {
        1.0 / self.rate_of_fire.max(MIN_RATE_OF_FIRE)
    }

    pub fn is_heavy(&self) -> bool {
        self.class == WeaponClass::Heavy
    }

    pub fn is_melee(&self) -> bool {
        self.class == WeaponClass::Melee
    }

    /// Сколько патронов тратит одна группа (до `bullets_per_shot`)
    pub fn rounds_per_group(&self) -> u32 {
        if self.consume_single_bullet_per_shot {
            1
        } else {
            self.bullets_per_shot
        }
    }
}

/// Патроны: в магазине + запас
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ammo {
    pub loaded: u32,
    pub capacity: u32,
    /// None = бесконечный запас
    pub reserve: Option<u32>,
}

impl Ammo {
    pub fn full(config: &WeaponConfig) -> Self {
        Self {
            loaded: config.magazine,
            capacity: config.magazine,
            reserve: config.reserve,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.loaded == 0
    }

    pub fn is_full(&self) -> bool {
        self.loaded >= self.capacity
    }

    /// Можно ли вообще что-то зарядить
    pub fn can_reload(&self) -> bool {
        !self.is_full() && self.reserve != Some(0)
    }

    /// Магазин целиком из запаса. Возвращает сколько зарядили.
    pub fn load_magazine(&mut self) -> u32 {
        let wanted = self.capacity.saturating_sub(self.loaded);
        let taken = self.take_from_reserve(wanted);
        self.loaded += taken;
        taken
    }

    /// Один патрон. false = некуда / нечего.
    pub fn load_bullet(&mut self) -> bool {
        if self.is_full() || self.take_from_reserve(1) == 0 {
            return false;
        }
        self.loaded += 1;
        true
    }

    /// Снимает до `rounds`, возвращает сколько реально сняли
    pub fn consume(&mut self, rounds: u32) -> u32 {
        let spent = rounds.min(self.loaded);
        self.loaded -= spent;
        spent
    }

    fn take_from_reserve(&mut self, wanted: u32) -> u32 {
        match self.reserve.as_mut() {
            None => wanted,
            Some(reserve) => {
                let taken = wanted.min(*reserve);
                *reserve -= taken;
                taken
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_delay_clamps_rate() {
        assert!((WeaponConfig::rifle().fire_delay() - 0.1).abs() < 1e-6);

        let broken = WeaponConfig {
            rate_of_fire: 0.0,
            ..WeaponConfig::rifle()
        };
        assert!((broken.fire_delay() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_presets() {
        assert!(WeaponConfig::machine_gun().is_heavy());
        assert!(WeaponConfig::knife().is_melee());
        assert_eq!(WeaponConfig::shotgun().rounds_per_group(), 1);
        assert_eq!(WeaponConfig::rifle().rounds_per_group(), 1);
        assert_eq!(WeaponConfig::shotgun().bullets_per_shot, 8);
    }

    #[test]
    fn test_weapon_json_overrides_preset_fields() {
        let config = WeaponConfig::from_json_str(
            r#"{ "class": "Shotgun", "bullets_per_shot": 3, "rate_of_fire": -5.0, "reserve": 12 }"#,
        )
        .expect("valid json");
        assert_eq!(config.class, WeaponClass::Shotgun);
        assert_eq!(config.bullets_per_shot, 3);
        assert_eq!(config.rate_of_fire, 0.01);
        assert_eq!(config.reserve, Some(12));
    }

    #[test]
    fn test_ammo_reserve_limits_reload() {
        let mut ammo = Ammo {
            loaded: 2,
            capacity: 10,
            reserve: Some(5),
        };
        assert_eq!(ammo.load_magazine(), 5);
        assert_eq!(ammo.loaded, 7);
        assert!(!ammo.can_reload());
        assert!(!ammo.load_bullet());

        assert_eq!(ammo.consume(10), 7);
        assert_eq!(ammo.loaded, 0);
    }
}
