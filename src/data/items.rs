#![allow(dead_code)]

use bracket_terminal::prelude::{LIGHT_GREEN, MAGENTA, RED, RGB};

#[derive(Clone, Debug)]
pub struct ItemTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub glyph: char,
    pub color: RGB,
    pub effect: PickupEffect,
}

/// What happens to the player the moment an item leaves its tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupEffect {
    Restore { amount: i32 },
    Drain { amount: i32 },
}

impl ItemTemplate {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        glyph: char,
        color: RGB,
        effect: PickupEffect,
    ) -> Self {
        Self {
            name,
            description,
            glyph,
            color,
            effect,
        }
    }
}

/// Item pool offered to the level populator at a given depth.
pub fn depth_items(depth: u32) -> Vec<ItemTemplate> {
    let mut pool = vec![
        ItemTemplate::new(
            "Moss Poultice",
            "Mends 4 wounds with a damp herbal sting.",
            '!',
            RGB::named(LIGHT_GREEN),
            PickupEffect::Restore { amount: 4 },
        ),
        ItemTemplate::new(
            "Tainted Morsel",
            "Saps 2 vitality. It looked edible.",
            '%',
            RGB::named(MAGENTA),
            PickupEffect::Drain { amount: 2 },
        ),
    ];

    if depth >= 3 {
        pool.push(ItemTemplate::new(
            "Crimson Phial",
            "Mends 7 wounds in a hot rush.",
            '!',
            RGB::named(RED),
            PickupEffect::Restore { amount: 7 },
        ));
    }

    pool
}
