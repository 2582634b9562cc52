//! Cover spots (геометрия: host, здесь только описание)

use bevy::prelude::*;

/// Укрытие, найденное host'ом (cover-shape геометрия не наша зона)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverSpot {
    pub id: u64,
    /// Точка, где стоит агент
    pub anchor: Vec3,
    /// Наружу от стены (куда агент смотрит поверх укрытия)
    pub forward: Vec3,
    /// Высокое укрытие (стоя), иначе присев
    pub is_tall: bool,
    /// Есть угол для side peek слева / справа
    pub corner_left: bool,
    pub corner_right: bool,
    /// Host пометил: для aim нужен шаг назад от стены
    pub needs_back_step: bool,
}

/// В какую сторону вдоль укрытия смотрит агент
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverFacing {
    #[default]
    Left,
    Right,
}

impl CoverSpot {
    fn flat_forward(&self) -> Vec3 {
        Vec3::new(self.forward.x, 0.0, self.forward.z).normalize_or(Vec3::NEG_Z)
    }

    /// Касательная вдоль укрытия (влево, если смотреть по forward)
    pub fn left_tangent(&self) -> Vec3 {
        Vec3::Y.cross(self.flat_forward()).normalize_or(Vec3::NEG_X)
    }

    pub fn tangent(&self, facing: CoverFacing) -> Vec3 {
        match facing {
            CoverFacing::Left => self.left_tangent(),
            CoverFacing::Right => -self.left_tangent(),
        }
    }

    /// Начальный facing: по знаку проекции heading на касательную
    pub fn initial_facing(&self, heading: Vec3) -> CoverFacing {
        if heading.dot(self.left_tangent()) >= 0.0 {
            CoverFacing::Left
        } else {
            CoverFacing::Right
        }
    }

    pub fn has_corner(&self, facing: CoverFacing) -> bool {
        match facing {
            CoverFacing::Left => self.corner_left,
            CoverFacing::Right => self.corner_right,
        }
    }

    /// Желаемый side peek offset (None если угла с этой стороны нет)
    pub fn side_peek(&self, facing: CoverFacing, distance: f32) -> Option<Vec3> {
        self.has_corner(facing)
            .then(|| self.tangent(facing) * distance)
    }

    /// Желаемый back-step offset
    pub fn back_step(&self, distance: f32) -> Option<Vec3> {
        self.needs_back_step.then(|| -self.flat_forward() * distance)
    }
}

/// Агент в укрытии
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveCover {
    pub spot: CoverSpot,
    pub facing: CoverFacing,
}

impl ActiveCover {
    pub fn enter(spot: CoverSpot, heading: Vec3) -> Self {
        Self {
            facing: spot.initial_facing(heading),
            spot,
        }
    }

    /// Боковое движение вдоль укрытия разворачивает агента
    ///
    /// Возвращает true если facing сменился.
    pub fn reface(&mut self, move_direction: Vec3, threshold: f32) -> bool {
        let lateral = move_direction.dot(self.spot.left_tangent());
        let facing = if lateral > threshold {
            CoverFacing::Left
        } else if lateral < -threshold {
            CoverFacing::Right
        } else {
            return false;
        };

        let changed = facing != self.facing;
        self.facing = facing;
        changed
    }
}
