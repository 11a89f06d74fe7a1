mod data;
mod ecs;
mod engine;
mod map;
mod render;
mod scripted_input;

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;
use chrono::Utc;

use data::{HighScore, ScoreBoard};
use engine::{Engine, KeyBindings, Phase, RunEnd};
use render::{
    LOG_PANEL_START, MAP_ORIGIN_X, MAP_ORIGIN_Y, MENU_ROW, OPTIONS_ROW, SIDE_PANEL_X,
};

const DEFAULT_HERO: &str = "Nameless Delver";

struct GloomDelveState {
    engine: Engine,
    scores: ScoreBoard,
    score_submitted: bool,
}

impl GameState for GloomDelveState {
    fn tick(&mut self, ctx: &mut BTerm) {
        if let Some(key) = ctx.key {
            if self.engine.is_over() && self.score_submitted {
                ctx.quitting = true;
            } else {
                self.engine.handle_key(key);
            }
        }
        if self.engine.is_over() && !self.score_submitted {
            self.record_score();
        }
        ctx.cls();
        self.draw_scene(ctx);
    }
}

impl GloomDelveState {
    fn record_score(&mut self) {
        let entry = HighScore::new(DEFAULT_HERO, self.engine.score(), self.engine.depth);
        match self.scores.submit(entry) {
            Ok(()) => {
                if let Some(best) = self.scores.entries().first() {
                    self.engine
                        .push_message(format!("Best recorded delve: {}.", best.score));
                }
            }
            Err(err) => {
                self.engine
                    .push_message(format!("Could not record the score: {err}"));
            }
        }
        self.score_submitted = true;
    }

    fn draw_scene(&mut self, ctx: &mut BTerm) {
        let header = format!("GloomDelve · Level {}", self.engine.depth);
        ctx.print_color_centered(1, RGB::named(YELLOW), RGB::named(BLACK), &header);
        render::draw_stats(ctx, self.engine.ecs.player_hp(), self.engine.depth, self.engine.turns);

        render::draw_map(
            ctx,
            &self.engine.level,
            Point::new(MAP_ORIGIN_X, MAP_ORIGIN_Y),
        );
        self.engine.ecs.each_renderable(|point, renderable| {
            ctx.set(
                MAP_ORIGIN_X + point.x,
                MAP_ORIGIN_Y + point.y,
                renderable.color,
                RGB::named(BLACK),
                renderable.glyph,
            );
        });

        render::draw_legend(ctx, SIDE_PANEL_X, MAP_ORIGIN_Y);
        render::draw_surrounds(ctx, &self.engine.surroundings(), SIDE_PANEL_X, MAP_ORIGIN_Y + 8);
        render::draw_options(ctx, &self.engine.bindings().legend(), OPTIONS_ROW);

        match self.engine.phase() {
            Phase::SelectingPickup(choices) => render::draw_item_menu(ctx, choices, MENU_ROW),
            Phase::DismissNotice => {
                render::draw_bad_key(ctx, &self.engine.bindings().legend(), MENU_ROW)
            }
            Phase::Ended(end) => {
                let banner = match end {
                    RunEnd::Quit => "You abandon the delve. Press any key.",
                    RunEnd::Died => "The gloom claims you. Press any key.",
                };
                ctx.print_color_centered(MENU_ROW, RGB::named(ORANGE), RGB::named(BLACK), banner);
            }
            Phase::AwaitingCommand => {}
        }

        render::draw_messages(ctx, &self.engine.messages, LOG_PANEL_START);
    }
}

fn main() -> BError {
    let traps = data::load_traps(data::TRAPS_PATH)?;
    let scores = ScoreBoard::load(data::HIGH_SCORES_PATH)?;
    let seed = Utc::now().timestamp_millis() as u64;
    let engine = Engine::new(KeyBindings::standard(), traps, seed);

    let context = BTermBuilder::simple80x50()
        .with_title("GloomDelve · Descent")
        .build()?;
    main_loop(
        context,
        GloomDelveState {
            engine,
            scores,
            score_submitted: false,
        },
    )
}
