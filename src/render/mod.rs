//! Read-only drawing over engine snapshots. Nothing here mutates game state.

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;

use crate::ecs::TileItem;
use crate::map::Level;

pub const MAP_ORIGIN_X: i32 = 2;
pub const MAP_ORIGIN_Y: i32 = 7;
pub const SIDE_PANEL_X: i32 = 40;
pub const OPTIONS_ROW: i32 = 24;
pub const MENU_ROW: i32 = 27;
pub const LOG_PANEL_START: i32 = 43;

const LOG_VISIBLE_LINES: usize = 5;

pub fn draw_map(ctx: &mut BTerm, level: &Level, origin: Point) {
    for y in 0..level.height {
        for x in 0..level.width {
            if let Some(tile) = level.tile_at(Point::new(x, y)) {
                ctx.set(origin.x + x, origin.y + y, tile.fg, tile.bg, tile.glyph);
            }
        }
    }
}

pub fn draw_stats(ctx: &mut BTerm, hp: i32, depth: u32, turns: u64) {
    let info = format!("Level {depth} · Turn {turns}");
    ctx.print_color_centered(3, RGB::named(LIGHT_CYAN), RGB::named(BLACK), &info);

    let vitality = format!("HP {hp}");
    let hp_color = if hp <= 5 {
        RGB::named(ORANGE)
    } else {
        RGB::named(LIGHT_GREEN)
    };
    ctx.print_color_centered(4, hp_color, RGB::named(BLACK), &vitality);
}

pub fn draw_legend(ctx: &mut BTerm, x: i32, y: i32) {
    let entries = [
        ('@', "you"),
        ('>', "stairs down"),
        ('!', "phial"),
        ('%', "morsel"),
        ('^', "trap"),
    ];
    ctx.print_color(x, y, RGB::named(WHITE), RGB::named(BLACK), "Legend");
    for (row, (glyph, meaning)) in entries.iter().enumerate() {
        ctx.print(x, y + 1 + row as i32, format!("{glyph} {meaning}"));
    }
}

pub fn draw_surrounds(ctx: &mut BTerm, surrounds: &[(&'static str, Vec<String>)], x: i32, y: i32) {
    ctx.print_color(x, y, RGB::named(WHITE), RGB::named(BLACK), "Nearby");
    for (row, (label, names)) in surrounds.iter().enumerate() {
        let line = if names.is_empty() {
            format!("{label}: -")
        } else {
            format!("{label}: {}", names.join(", "))
        };
        ctx.print(x, y + 1 + row as i32, line);
    }
}

pub fn draw_options(ctx: &mut BTerm, legend: &[String], y: i32) {
    for (row, chunk) in legend.chunks(5).enumerate() {
        ctx.print_color(
            MAP_ORIGIN_X,
            y + row as i32,
            RGB::named(GRAY),
            RGB::named(BLACK),
            chunk.join("  "),
        );
    }
}

pub fn draw_item_menu(ctx: &mut BTerm, choices: &[TileItem], y: i32) {
    ctx.print_color(
        MAP_ORIGIN_X,
        y,
        RGB::named(YELLOW),
        RGB::named(BLACK),
        "Pick up:",
    );
    for (idx, choice) in choices.iter().enumerate() {
        ctx.print(MAP_ORIGIN_X, y + 1 + idx as i32, format!("{idx}) {}", choice.name));
    }
    ctx.print(
        MAP_ORIGIN_X,
        y + 1 + choices.len() as i32,
        format!("{}) nothing", choices.len()),
    );
}

/// The unrecognized-key diagnostic: every bound key and what it does.
pub fn draw_bad_key(ctx: &mut BTerm, legend: &[String], y: i32) {
    ctx.print_color(
        MAP_ORIGIN_X,
        y,
        RGB::named(ORANGE),
        RGB::named(BLACK),
        "Valid keys (press any key to continue):",
    );
    for (row, chunk) in legend.chunks(5).enumerate() {
        ctx.print(MAP_ORIGIN_X, y + 1 + row as i32, chunk.join("  "));
    }
}

pub fn draw_messages(ctx: &mut BTerm, log: &[String], start_y: i32) {
    let (width, _) = ctx.get_char_size();
    let height = (log.len().min(LOG_VISIBLE_LINES) as i32) + 2;
    let top = (start_y - 1).max(0);
    ctx.draw_box(
        0,
        top,
        width - 1,
        height,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    ctx.print_color(2, top + 1, RGB::named(WHITE), RGB::named(BLACK), "Messages");
    for (row, entry) in log.iter().take(LOG_VISIBLE_LINES).enumerate() {
        ctx.print(2, top + 2 + row as i32, entry);
    }
}
