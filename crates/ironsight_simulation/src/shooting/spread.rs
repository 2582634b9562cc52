//! Aim error sampling (spread)
//!
//! Квадратная выборка в [-1, 1]²; точки вне единичного круга проецируются
//! на окружность со случайными знаками осей (плотность у края выше, чем
//! у равномерного диска).

use bevy::prelude::*;
use rand::Rng;

/// Половинный угол ошибки (градусы)
///
/// `extra`: внешняя ошибка (движение), `multiplier`: zoom и т.п.
pub fn half_angle(base_degrees: f32, multiplier: f32, extra_degrees: f32) -> f32 {
    ((extra_degrees + base_degrees * multiplier) / 2.0).max(0.0)
}

/// Нормализованное смещение внутри единичного круга
pub fn sample_offset<R: Rng>(rng: &mut R) -> Vec2 {
    let x: f32 = rng.gen_range(-1.0..=1.0);
    let y: f32 = rng.gen_range(-1.0..=1.0);

    let length_sq = x * x + y * y;
    if length_sq <= 1.0 {
        return Vec2::new(x, y);
    }

    let length = length_sq.sqrt();
    let sign_x = if rng.gen::<bool>() { 1.0 } else { -1.0 };
    let sign_y = if rng.gen::<bool>() { 1.0 } else { -1.0 };
    Vec2::new(sign_x * x.abs() / length, sign_y * y.abs() / length)
}

/// Поворот направления: yaw вокруг up, затем pitch вокруг right (градусы)
///
/// Для почти вертикального направления up = мировой forward (-Z).
/// Положительный yaw: влево, положительный pitch: вверх.
pub fn rotate(direction: Vec3, yaw_degrees: f32, pitch_degrees: f32) -> Vec3 {
    let direction = direction.normalize_or(Vec3::NEG_Z);
    let up = if direction.dot(Vec3::Y).abs() > 0.99 {
        Vec3::NEG_Z
    } else {
        Vec3::Y
    };
    let right = direction.cross(up).normalize_or(Vec3::X);

    let yaw = Quat::from_axis_angle(up, yaw_degrees.to_radians());
    let pitch = Quat::from_axis_angle(right, pitch_degrees.to_radians());
    (pitch * (yaw * direction)).normalize_or(direction)
}

/// Направление projectile'а с ошибкой
pub fn apply_offset(direction: Vec3, offset: Vec2, half_angle_degrees: f32) -> Vec3 {
    rotate(
        direction,
        offset.x * half_angle_degrees,
        offset.y * half_angle_degrees,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spread_stays_within_half_angle() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let half = half_angle(6.0, 1.0, 2.0);
        assert_eq!(half, 4.0);

        let forward = Vec3::NEG_Z;
        let mut widest = 0.0_f32;
        for _ in 0..10_000 {
            let offset = sample_offset(&mut rng);
            assert!(offset.length() <= 1.0 + 1e-5);

            let direction = apply_offset(forward, offset, half);
            let angle = direction.angle_between(forward).to_degrees();
            widest = widest.max(angle);
            assert!(angle <= half + 0.05, "angle {} exceeds {}", angle, half);
        }

        // Выборка действительно разбрасывает
        assert!(widest > half * 0.5);
    }

    #[test]
    fn test_zero_spread_keeps_direction() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let direction = Vec3::new(0.3, -0.2, -1.0).normalize();
        let offset = sample_offset(&mut rng);
        assert!((apply_offset(direction, offset, 0.0) - direction).length() < 1e-5);
    }

    #[test]
    fn test_rotate_signs() {
        let up = rotate(Vec3::NEG_Z, 0.0, 10.0);
        assert!(up.y > 0.0);

        let left = rotate(Vec3::NEG_Z, 10.0, 0.0);
        assert!(left.x < 0.0);

        // Вертикальный луч не вырождается
        let down = rotate(Vec3::NEG_Y, 5.0, 5.0);
        assert!(down.is_finite());
        assert!(down.angle_between(Vec3::NEG_Y).to_degrees() < 10.0);
    }
}
