use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::RGB;
use specs::prelude::{Component, NullStorage, VecStorage};

use crate::data::items::PickupEffect;

#[derive(Clone, Debug)]
pub struct Position {
    pub point: Point,
}

impl Component for Position {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Renderable {
    pub glyph: u16,
    pub color: RGB,
    pub order: i32,
}

impl Component for Renderable {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Stats {
    pub hp: i32,
}

impl Component for Stats {
    type Storage = VecStorage<Self>;
}

/// A collectible. Picking it up runs the effect once and removes the entity.
#[derive(Clone, Debug)]
pub struct Item {
    pub name: String,
    pub effect: PickupEffect,
}

impl Component for Item {
    type Storage = VecStorage<Self>;
}

/// Inert hazard marker placed by the level populator. Hazard resolution is
/// not part of the turn engine.
#[derive(Clone, Debug)]
pub struct Hazard {
    pub name: String,
}

impl Component for Hazard {
    type Storage = VecStorage<Self>;
}

#[derive(Default)]
pub struct PlayerTag;

impl Component for PlayerTag {
    type Storage = NullStorage<Self>;
}
