pub mod components;

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::{RGB, YELLOW};
use specs::prelude::{Builder, Entity, Join, World as SpecsWorld, WorldExt};

use crate::data::TrapSpec;
use crate::data::items::{ItemTemplate, PickupEffect};

use self::components::{Hazard, Item, PlayerTag, Position, Renderable, Stats};

pub const STARTING_HP: i32 = 20;

/// One collectible visible on a tile, keyed by its entity for pickup.
#[derive(Clone, Debug)]
pub struct TileItem {
    pub entity: Entity,
    pub name: String,
}

/// Entity storage for a run: one player entity that lives for the whole run,
/// plus per-level item and hazard entities. A cell's occupants are simply the
/// entities whose position matches that cell.
pub struct EcsWorld {
    specs_world: SpecsWorld,
    player: Entity,
}

impl EcsWorld {
    pub fn new(spawn: Point) -> Self {
        let mut specs_world = SpecsWorld::new();
        specs_world.register::<Position>();
        specs_world.register::<Renderable>();
        specs_world.register::<Stats>();
        specs_world.register::<Item>();
        specs_world.register::<Hazard>();
        specs_world.register::<PlayerTag>();

        let player = specs_world
            .create_entity()
            .with(Position { point: spawn })
            .with(Renderable {
                glyph: b'@' as u16,
                color: RGB::named(YELLOW),
                order: 2,
            })
            .with(Stats { hp: STARTING_HP })
            .with(PlayerTag)
            .build();

        Self {
            specs_world,
            player,
        }
    }

    pub fn player_point(&self) -> Point {
        let positions = self.specs_world.read_component::<Position>();
        positions
            .get(self.player)
            .map(|pos| pos.point)
            .unwrap_or(Point::new(0, 0))
    }

    pub fn set_player_point(&mut self, point: Point) {
        let mut positions = self.specs_world.write_component::<Position>();
        if let Some(pos) = positions.get_mut(self.player) {
            pos.point = point;
        }
    }

    pub fn player_hp(&self) -> i32 {
        let stats = self.specs_world.read_component::<Stats>();
        stats.get(self.player).map(|stats| stats.hp).unwrap_or(0)
    }

    pub fn damage_player(&mut self, amount: i32) {
        let mut stats = self.specs_world.write_component::<Stats>();
        if let Some(player_stats) = stats.get_mut(self.player) {
            player_stats.hp -= amount;
        }
    }

    pub fn items_at(&self, point: Point) -> Vec<TileItem> {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_component::<Position>();
        let items = self.specs_world.read_component::<Item>();
        (&entities, &positions, &items)
            .join()
            .filter(|(_, pos, _)| pos.point == point)
            .map(|(entity, _, item)| TileItem {
                entity,
                name: item.name.clone(),
            })
            .collect()
    }

    /// Runs the item's pickup effect against the player and removes the item
    /// from the world for good. Returns the message to show, or `None` if the
    /// entity is not a collectible anymore.
    pub fn pick_up(&mut self, target: Entity) -> Option<String> {
        let (name, effect) = {
            let items = self.specs_world.read_component::<Item>();
            let item = items.get(target)?;
            (item.name.clone(), item.effect)
        };

        let line = {
            let mut stats = self.specs_world.write_component::<Stats>();
            let player_stats = stats.get_mut(self.player)?;
            match effect {
                PickupEffect::Restore { amount } => {
                    player_stats.hp += amount;
                    format!("The {name} mends {amount} wounds.")
                }
                PickupEffect::Drain { amount } => {
                    player_stats.hp -= amount;
                    format!("The {name} saps {amount} vitality!")
                }
            }
        };

        let _ = self.specs_world.delete_entity(target);
        self.specs_world.maintain();
        Some(line)
    }

    pub fn spawn_item(&mut self, template: &ItemTemplate, point: Point) {
        self.specs_world
            .create_entity()
            .with(Position { point })
            .with(Renderable {
                glyph: template.glyph as u16,
                color: template.color,
                order: 1,
            })
            .with(Item {
                name: template.name.to_string(),
                effect: template.effect,
            })
            .build();
    }

    pub fn spawn_trap(&mut self, spec: &TrapSpec, point: Point) {
        self.specs_world
            .create_entity()
            .with(Position { point })
            .with(Renderable {
                glyph: spec.glyph as u16,
                color: RGB::from_u8(200, 80, 80),
                order: 0,
            })
            .with(Hazard {
                name: spec.name.clone(),
            })
            .build();
    }

    /// Deletes every positioned entity except the player. Used when a fresh
    /// level replaces the current one.
    pub fn clear_level_entities(&mut self) {
        let doomed: Vec<Entity> = {
            let entities = self.specs_world.entities();
            let positions = self.specs_world.read_component::<Position>();
            let players = self.specs_world.read_component::<PlayerTag>();
            (&entities, &positions)
                .join()
                .filter(|(entity, _)| !players.contains(*entity))
                .map(|(entity, _)| entity)
                .collect()
        };
        for entity in doomed {
            let _ = self.specs_world.delete_entity(entity);
        }
        self.specs_world.maintain();
    }

    /// Names of the non-player occupants of a cell, for the surroundings
    /// panel.
    pub fn occupants_at(&self, point: Point) -> Vec<String> {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_component::<Position>();
        let items = self.specs_world.read_component::<Item>();
        let hazards = self.specs_world.read_component::<Hazard>();

        let mut names = Vec::new();
        for (entity, pos) in (&entities, &positions).join() {
            if pos.point != point {
                continue;
            }
            if let Some(item) = items.get(entity) {
                names.push(item.name.clone());
            } else if let Some(hazard) = hazards.get(entity) {
                names.push(hazard.name.clone());
            }
        }
        names
    }

    pub fn each_renderable<F>(&self, mut f: F)
    where
        F: FnMut(Point, &Renderable),
    {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_component::<Position>();
        let renderables = self.specs_world.read_component::<Renderable>();

        let mut drawables: Vec<(Point, &Renderable)> = (&entities, &positions, &renderables)
            .join()
            .map(|(_, pos, renderable)| (pos.point, renderable))
            .collect();
        drawables.sort_by_key(|(_, renderable)| renderable.order);
        for (point, renderable) in drawables {
            f(point, renderable);
        }
    }
}
