//! Scene Query Service (raycast / sphere sweep)
//!
//! Физика и геометрия: на стороне host'а. Core получает упорядоченный
//! список кандидатов и сам решает, какой hit засчитать (`shooting::resolve`).

use bevy::prelude::*;

/// Тег коллайдера (что это за поверхность для hit filter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColliderTag {
    #[default]
    Untagged,
    /// Trigger hitbox части тела (голова, рука)
    BodyPart,
    /// Направленный щит
    Shield,
}

/// Один кандидат попадания
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    pub tag: ColliderTag,
    pub is_trigger: bool,
    /// Владелец коллайдера (entity в `TargetRegistry`)
    pub owner: Entity,
}

/// Host-side сервис запросов к сцене
///
/// Пустой результат: нормальный исход ("ничего не задели"), не ошибка.
pub trait SceneQuery: Send + Sync + 'static {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<SceneHit>;

    fn sphere_sweep(&self, origin: Vec3, radius: f32, direction: Vec3, max_distance: f32)
        -> Vec<SceneHit>;
}

/// Resource: активный scene query сервис
#[derive(Resource)]
pub struct SceneQueries(pub Box<dyn SceneQuery>);

impl SceneQueries {
    pub fn new(query: impl SceneQuery) -> Self {
        Self(Box::new(query))
    }
}

impl Default for SceneQueries {
    fn default() -> Self {
        Self::new(EmptyScene)
    }
}

/// Сцена без коллайдеров (headless default)
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyScene;

impl SceneQuery for EmptyScene {
    fn raycast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Vec<SceneHit> {
        Vec::new()
    }

    fn sphere_sweep(&self, _origin: Vec3, _radius: f32, _direction: Vec3, _max_distance: f32)
        -> Vec<SceneHit> {
        Vec::new()
    }
}

/// Сферический коллайдер для `SphereScene`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSphere {
    pub center: Vec3,
    pub radius: f32,
    pub owner: Entity,
    pub tag: ColliderTag,
    pub is_trigger: bool,
}

/// Простая сцена из сфер (headless демо, интеграционные тесты)
///
/// Результаты отсортированы по distance, равные distance: в порядке добавления.
#[derive(Debug, Clone, Default)]
pub struct SphereScene {
    pub spheres: Vec<SceneSphere>,
}

impl SphereScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sphere(mut self, sphere: SceneSphere) -> Self {
        self.spheres.push(sphere);
        self
    }

    fn cast(&self, origin: Vec3, direction: Vec3, inflate: f32, max_distance: f32) -> Vec<SceneHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return Vec::new();
        }

        let mut hits: Vec<SceneHit> = self
            .spheres
            .iter()
            .filter_map(|sphere| {
                let distance = ray_sphere_distance(origin, direction, sphere.center, sphere.radius + inflate)?;
                if distance > max_distance {
                    return None;
                }
                let swept_center = origin + direction * distance;
                let normal = (swept_center - sphere.center).normalize_or_zero();
                Some(SceneHit {
                    point: sphere.center + normal * sphere.radius,
                    normal,
                    distance,
                    tag: sphere.tag,
                    is_trigger: sphere.is_trigger,
                    owner: sphere.owner,
                })
            })
            .collect();

        // Stable sort: равные distance сохраняют порядок добавления
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

impl SceneQuery for SphereScene {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<SceneHit> {
        self.cast(origin, direction, 0.0, max_distance)
    }

    fn sphere_sweep(&self, origin: Vec3, radius: f32, direction: Vec3, max_distance: f32)
        -> Vec<SceneHit> {
        self.cast(origin, direction, radius.max(0.0), max_distance)
    }
}

/// Distance вдоль луча до первого пересечения со сферой
///
/// Origin внутри сферы → 0.0 (сразу контакт).
fn ray_sphere_distance(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    if to_center.length_squared() <= radius * radius {
        return Some(0.0);
    }

    let along = to_center.dot(direction);
    if along < 0.0 {
        return None;
    }

    let closest_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if closest_sq > radius_sq {
        return None;
    }

    Some(along - (radius_sq - closest_sq).sqrt())
}
