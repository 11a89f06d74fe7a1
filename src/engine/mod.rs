//! The turn engine: reads one key at a time, resolves it into a command,
//! applies the command against the level and the entities, charges the hit
//! point cost, and decides level and run transitions.

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::VirtualKeyCode;

use crate::data::TrapSpec;
use crate::data::items::depth_items;
use crate::ecs::{EcsWorld, TileItem};
use crate::map::Level;
use crate::scripted_input::ScriptedInput;

/// Player intents. Exactly one is active per input event; a binding lookup
/// yields at most one command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    MoveNorth,
    MoveSouth,
    MoveWest,
    MoveEast,
    AttackNpc,
    PickUpItem,
    UseItem,
    DropItem,
    Information,
}

impl Command {
    pub fn describe(&self) -> &'static str {
        match self {
            Command::Quit => "quit",
            Command::MoveNorth => "move north",
            Command::MoveSouth => "move south",
            Command::MoveWest => "move west",
            Command::MoveEast => "move east",
            Command::AttackNpc => "attack",
            Command::PickUpItem => "pick up",
            Command::UseItem => "use",
            Command::DropItem => "drop",
            Command::Information => "info",
        }
    }
}

/// Immutable key-to-command table, built once per run and handed to the
/// engine at construction.
pub struct KeyBindings {
    binds: Vec<(VirtualKeyCode, Command)>,
}

impl KeyBindings {
    pub fn standard() -> Self {
        Self {
            binds: vec![
                (VirtualKeyCode::Q, Command::Quit),
                (VirtualKeyCode::W, Command::MoveNorth),
                (VirtualKeyCode::S, Command::MoveSouth),
                (VirtualKeyCode::A, Command::MoveWest),
                (VirtualKeyCode::D, Command::MoveEast),
                (VirtualKeyCode::F, Command::AttackNpc),
                (VirtualKeyCode::E, Command::PickUpItem),
                (VirtualKeyCode::U, Command::UseItem),
                (VirtualKeyCode::V, Command::DropItem),
                (VirtualKeyCode::I, Command::Information),
            ],
        }
    }

    pub fn command_for(&self, key: VirtualKeyCode) -> Option<Command> {
        self.binds
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, command)| *command)
    }

    pub fn legend(&self) -> Vec<String> {
        self.binds
            .iter()
            .map(|(key, command)| format!("{key:?} {}", command.describe()))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunEnd {
    Died,
    Quit,
}

/// Where the engine stands between key presses.
#[derive(Clone, Debug)]
pub enum Phase {
    /// Normal play; the next key is resolved as a command.
    AwaitingCommand,
    /// The unrecognized-key diagnostic is on screen; the next key press is
    /// swallowed and play resumes.
    DismissNotice,
    /// The pickup menu is on screen; digit keys select, `len` cancels.
    SelectingPickup(Vec<TileItem>),
    /// The run is over; the engine ignores further keys.
    Ended(RunEnd),
}

pub struct Engine {
    bindings: KeyBindings,
    traps: Vec<TrapSpec>,
    base_seed: u64,
    pub level: Level,
    pub ecs: EcsWorld,
    pub depth: u32,
    pub turns: u64,
    pub messages: Vec<String>,
    phase: Phase,
}

impl Engine {
    /// Fresh run: level 1, full hit points, populated grid. Nothing carries
    /// over from a previous run.
    pub fn new(bindings: KeyBindings, traps: Vec<TrapSpec>, base_seed: u64) -> Self {
        let level = Level::generate(1, base_seed);
        let ecs = EcsWorld::new(level.spawn);
        let mut engine = Self {
            bindings,
            traps,
            base_seed,
            level,
            ecs,
            depth: 1,
            turns: 0,
            messages: Vec::new(),
            phase: Phase::AwaitingCommand,
        };
        engine.populate_level();
        engine.messages.push("You descend into the gloom.".to_string());
        engine
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Ended(_))
    }

    pub fn run_end(&self) -> Option<RunEnd> {
        match self.phase {
            Phase::Ended(end) => Some(end),
            _ => None,
        }
    }

    /// Final score handed to the score board. Rewards cleared levels first,
    /// turns survived second.
    pub fn score(&self) -> i64 {
        (i64::from(self.depth) - 1) * 100 + self.turns as i64
    }

    pub fn push_message<S: Into<String>>(&mut self, entry: S) {
        self.messages.push(entry.into());
    }

    /// Consumes exactly one key press. The transient message buffer is
    /// cleared here because the previous frame has already shown it.
    pub fn handle_key(&mut self, key: VirtualKeyCode) {
        match self.phase.clone() {
            Phase::Ended(_) => {}
            Phase::DismissNotice => {
                self.messages.clear();
                self.phase = Phase::AwaitingCommand;
            }
            Phase::SelectingPickup(choices) => self.select_pickup(key, choices),
            Phase::AwaitingCommand => {
                self.messages.clear();
                match self.bindings.command_for(key) {
                    Some(command) => self.resolve(command),
                    None => {
                        self.messages.push(format!("{key:?} is not a valid key."));
                        self.phase = Phase::DismissNotice;
                    }
                }
            }
        }
    }

    /// Explicit synchronous run loop over a scripted key source: resolve one
    /// command at a time until the run ends or the script runs dry.
    pub fn run_script(&mut self, input: &mut ScriptedInput) {
        while !self.is_over() {
            match input.next_key() {
                Some(key) => self.handle_key(key),
                None => break,
            }
        }
    }

    /// Occupant names of the four axis neighbors, for the surroundings panel.
    pub fn surroundings(&self) -> Vec<(&'static str, Vec<String>)> {
        let current = self.ecs.player_point();
        let dirs = [("North", 0, -1), ("South", 0, 1), ("West", -1, 0), ("East", 1, 0)];
        dirs.iter()
            .map(|&(label, dx, dy)| {
                let point = Point::new(current.x + dx, current.y + dy);
                if !self.level.in_bounds(point) {
                    return (label, vec!["the level's edge".to_string()]);
                }
                let mut names = self.ecs.occupants_at(point);
                if point == self.level.exit {
                    names.push("stairs down".to_string());
                }
                (label, names)
            })
            .collect()
    }

    fn resolve(&mut self, command: Command) {
        match command {
            Command::Quit => {
                self.messages.push(format!("Left on level {}.", self.depth));
                self.phase = Phase::Ended(RunEnd::Quit);
            }
            Command::MoveNorth => self.try_step(0, -1),
            Command::MoveSouth => self.try_step(0, 1),
            Command::MoveWest => self.try_step(-1, 0),
            Command::MoveEast => self.try_step(1, 0),
            Command::PickUpItem => {
                let choices = self.ecs.items_at(self.ecs.player_point());
                if choices.is_empty() {
                    self.messages
                        .push("There is nothing here to pick up.".to_string());
                } else {
                    self.messages.push(format!(
                        "Pick up which item? 0-{} ({} cancels)",
                        choices.len(),
                        choices.len()
                    ));
                    self.phase = Phase::SelectingPickup(choices);
                }
            }
            // Recognized but unresolved intents. They consume the key press
            // only: no mutation, no turn cost.
            Command::AttackNpc
            | Command::UseItem
            | Command::DropItem
            | Command::Information => {}
        }
    }

    /// Single-cell move, validated against the grid edges only. An off-grid
    /// destination is a silent no-op.
    fn try_step(&mut self, dx: i32, dy: i32) {
        let current = self.ecs.player_point();
        let dest = Point::new(current.x + dx, current.y + dy);
        if !self.level.in_bounds(dest) {
            return;
        }
        self.ecs.set_player_point(dest);
        self.finish_turn(true);
    }

    fn select_pickup(&mut self, key: VirtualKeyCode, choices: Vec<TileItem>) {
        let index = match digit_for(key) {
            Some(index) if index <= choices.len() => index,
            _ => {
                // Out-of-range or non-digit: re-prompt. Retries never cost HP.
                self.messages.clear();
                self.messages.push(format!(
                    "Choose 0-{} ({} cancels).",
                    choices.len(),
                    choices.len()
                ));
                self.phase = Phase::SelectingPickup(choices);
                return;
            }
        };

        self.messages.clear();
        if index == choices.len() {
            self.messages.push("You leave the pile untouched.".to_string());
            self.phase = Phase::AwaitingCommand;
            return;
        }

        self.phase = Phase::AwaitingCommand;
        if let Some(line) = self.ecs.pick_up(choices[index].entity) {
            self.messages.push(line);
            self.finish_turn(true);
        }
    }

    /// Consequence step: a costly turn drains exactly one hit point, then
    /// death, then exit arrival, in that order.
    fn finish_turn(&mut self, costly: bool) {
        if costly {
            self.ecs.damage_player(1);
            self.turns += 1;
        }
        if self.ecs.player_hp() <= 0 {
            self.messages
                .push("Your last strength bleeds away.".to_string());
            self.phase = Phase::Ended(RunEnd::Died);
            return;
        }
        if self.ecs.player_point() == self.level.exit {
            self.descend();
        }
    }

    fn descend(&mut self) {
        self.depth += 1;
        self.level = Level::generate(self.depth, self.base_seed);
        self.ecs.clear_level_entities();
        self.ecs.set_player_point(self.level.spawn);
        self.populate_level();
        self.messages
            .push(format!("You descend to level {}.", self.depth));
    }

    /// Scatters this depth's items and traps. The seed is decorrelated from
    /// the one the level grid used so the two layouts do not track each other.
    fn populate_level(&mut self) {
        let mut rng = RandomNumberGenerator::seeded(
            self.base_seed.wrapping_add(u64::from(self.depth).wrapping_mul(7919)),
        );

        let pool = depth_items(self.depth);
        let item_count = 2 + self.depth.min(4) as usize;
        for _ in 0..item_count {
            let template = &pool[rng.range(0, pool.len() as i32) as usize];
            let point = self.level.random_cell(&mut rng);
            self.ecs.spawn_item(template, point);
        }

        if !self.traps.is_empty() {
            let trap_count = self.depth.min(5) as usize;
            for _ in 0..trap_count {
                let spec = self.traps[rng.range(0, self.traps.len() as i32) as usize].clone();
                let point = self.level.random_cell(&mut rng);
                self.ecs.spawn_trap(&spec, point);
            }
        }
    }
}

fn digit_for(key: VirtualKeyCode) -> Option<usize> {
    match key {
        VirtualKeyCode::Key0 => Some(0),
        VirtualKeyCode::Key1 => Some(1),
        VirtualKeyCode::Key2 => Some(2),
        VirtualKeyCode::Key3 => Some(3),
        VirtualKeyCode::Key4 => Some(4),
        VirtualKeyCode::Key5 => Some(5),
        VirtualKeyCode::Key6 => Some(6),
        VirtualKeyCode::Key7 => Some(7),
        VirtualKeyCode::Key8 => Some(8),
        VirtualKeyCode::Key9 => Some(9),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::items::{ItemTemplate, PickupEffect};
    use crate::ecs::STARTING_HP;
    use bracket_terminal::prelude::{RGB, WHITE};

    /// Engine over a fixed 8x6 grid, player at (4,3), exit at (7,5), no
    /// scattered items or traps.
    fn quiet_engine() -> Engine {
        let level = Level::with_layout(1, 8, 6, Point::new(4, 3), Point::new(7, 5));
        let ecs = EcsWorld::new(level.spawn);
        Engine {
            bindings: KeyBindings::standard(),
            traps: Vec::new(),
            base_seed: 1,
            level,
            ecs,
            depth: 1,
            turns: 0,
            messages: Vec::new(),
            phase: Phase::AwaitingCommand,
        }
    }

    fn poultice() -> ItemTemplate {
        ItemTemplate::new(
            "Moss Poultice",
            "",
            '!',
            RGB::named(WHITE),
            PickupEffect::Restore { amount: 4 },
        )
    }

    #[test]
    fn moves_accumulate_and_clip_at_the_edge() {
        let mut engine = quiet_engine();
        for _ in 0..10 {
            engine.handle_key(VirtualKeyCode::W);
        }
        // Three in-bounds steps from y=3, then seven silent no-ops.
        assert_eq!(engine.ecs.player_point(), Point::new(4, 0));
        assert_eq!(engine.ecs.player_hp(), STARTING_HP - 3);
        assert_eq!(engine.turns, 3);
    }

    #[test]
    fn each_direction_applies_its_delta() {
        let mut engine = quiet_engine();
        engine.handle_key(VirtualKeyCode::D);
        engine.handle_key(VirtualKeyCode::S);
        engine.handle_key(VirtualKeyCode::A);
        engine.handle_key(VirtualKeyCode::W);
        assert_eq!(engine.ecs.player_point(), Point::new(4, 3));
        assert_eq!(engine.ecs.player_hp(), STARTING_HP - 4);
    }

    #[test]
    fn unbound_key_is_a_free_retry() {
        let mut engine = quiet_engine();
        engine.handle_key(VirtualKeyCode::Z);
        assert!(matches!(engine.phase(), Phase::DismissNotice));
        assert_eq!(engine.ecs.player_point(), Point::new(4, 3));
        assert_eq!(engine.ecs.player_hp(), STARTING_HP);
        assert_eq!(engine.depth, 1);
        assert!(engine.messages.iter().any(|m| m.contains("not a valid key")));

        // The dismissing key press is swallowed, not resolved as a command.
        engine.handle_key(VirtualKeyCode::W);
        assert!(matches!(engine.phase(), Phase::AwaitingCommand));
        assert_eq!(engine.ecs.player_point(), Point::new(4, 3));
        assert_eq!(engine.ecs.player_hp(), STARTING_HP);
    }

    #[test]
    fn reserved_commands_cost_nothing() {
        let mut engine = quiet_engine();
        for key in [
            VirtualKeyCode::F,
            VirtualKeyCode::U,
            VirtualKeyCode::V,
            VirtualKeyCode::I,
        ] {
            engine.handle_key(key);
            assert!(matches!(engine.phase(), Phase::AwaitingCommand));
        }
        assert_eq!(engine.ecs.player_hp(), STARTING_HP);
        assert_eq!(engine.turns, 0);
    }

    #[test]
    fn pickup_on_an_empty_cell_is_free() {
        let mut engine = quiet_engine();
        engine.handle_key(VirtualKeyCode::E);
        assert!(matches!(engine.phase(), Phase::AwaitingCommand));
        assert_eq!(engine.ecs.player_hp(), STARTING_HP);
    }

    #[test]
    fn cancelling_a_pickup_leaves_everything_unchanged() {
        let mut engine = quiet_engine();
        let here = engine.ecs.player_point();
        engine.ecs.spawn_item(&poultice(), here);
        engine.ecs.spawn_item(&poultice(), here);

        engine.handle_key(VirtualKeyCode::E);
        assert!(matches!(engine.phase(), Phase::SelectingPickup(_)));

        // Index == item count cancels.
        engine.handle_key(VirtualKeyCode::Key2);
        assert!(matches!(engine.phase(), Phase::AwaitingCommand));
        assert_eq!(engine.ecs.items_at(here).len(), 2);
        assert_eq!(engine.ecs.player_hp(), STARTING_HP);
    }

    #[test]
    fn invalid_selection_reprompts_without_cost() {
        let mut engine = quiet_engine();
        let here = engine.ecs.player_point();
        engine.ecs.spawn_item(&poultice(), here);

        engine.handle_key(VirtualKeyCode::E);
        engine.handle_key(VirtualKeyCode::Key9);
        assert!(matches!(engine.phase(), Phase::SelectingPickup(_)));
        engine.handle_key(VirtualKeyCode::X);
        assert!(matches!(engine.phase(), Phase::SelectingPickup(_)));
        assert_eq!(engine.ecs.player_hp(), STARTING_HP);

        // A valid index applies the effect, removes the item, costs the turn.
        engine.handle_key(VirtualKeyCode::Key0);
        assert!(matches!(engine.phase(), Phase::AwaitingCommand));
        assert!(engine.ecs.items_at(here).is_empty());
        assert_eq!(engine.ecs.player_hp(), STARTING_HP + 4 - 1);
        assert_eq!(engine.turns, 1);
    }

    #[test]
    fn reaching_the_exit_advances_one_level() {
        let mut engine = quiet_engine();
        engine.level = Level::with_layout(1, 8, 6, Point::new(6, 5), Point::new(7, 5));
        engine.ecs.set_player_point(Point::new(6, 5));

        engine.handle_key(VirtualKeyCode::D);

        assert_eq!(engine.depth, 2);
        // Only the arriving move was charged.
        assert_eq!(engine.ecs.player_hp(), STARTING_HP - 1);
        assert_eq!(engine.turns, 1);
        // Player stands on the new level's spawn.
        assert_eq!(engine.ecs.player_point(), engine.level.spawn);
        assert!(engine.level.in_bounds(engine.ecs.player_point()));
        assert!(matches!(engine.phase(), Phase::AwaitingCommand));
    }

    #[test]
    fn quitting_ends_the_run_with_a_notice() {
        let mut engine = quiet_engine();
        engine.handle_key(VirtualKeyCode::Q);
        assert_eq!(engine.run_end(), Some(RunEnd::Quit));
        assert!(engine.messages.iter().any(|m| m.contains("Left on level 1")));

        // Terminal: further keys change nothing.
        engine.handle_key(VirtualKeyCode::W);
        assert_eq!(engine.ecs.player_point(), Point::new(4, 3));
    }

    #[test]
    fn death_beats_exit_arrival_on_the_same_turn() {
        let mut engine = quiet_engine();
        engine.level = Level::with_layout(1, 8, 6, Point::new(6, 5), Point::new(7, 5));
        engine.ecs.set_player_point(Point::new(6, 5));
        engine.ecs.damage_player(STARTING_HP - 1); // one hit point left

        engine.handle_key(VirtualKeyCode::D);

        assert_eq!(engine.run_end(), Some(RunEnd::Died));
        assert_eq!(engine.depth, 1);
        assert_eq!(engine.ecs.player_hp(), 0);
    }

    #[test]
    fn scripted_run_quits_cleanly() {
        let mut engine = quiet_engine();
        let mut input = ScriptedInput::from_script("wwd q");
        engine.run_script(&mut input);
        assert_eq!(engine.run_end(), Some(RunEnd::Quit));
        assert_eq!(engine.ecs.player_hp(), STARTING_HP - 3);
    }

    #[test]
    fn scripted_run_can_end_in_death() {
        let mut engine = quiet_engine();
        engine.ecs.damage_player(STARTING_HP - 2); // two hit points left
        let mut input = ScriptedInput::from_script("wsws");
        engine.run_script(&mut input);
        assert_eq!(engine.run_end(), Some(RunEnd::Died));
        // The script had two keys to spare; they were never consumed as turns.
        assert_eq!(engine.turns, 2);
    }

    #[test]
    fn score_rewards_depth_then_turns() {
        let mut engine = quiet_engine();
        engine.depth = 3;
        engine.turns = 17;
        assert_eq!(engine.score(), 217);
    }

    #[test]
    fn surroundings_report_edges_and_stairs() {
        let mut engine = quiet_engine();
        engine.level = Level::with_layout(1, 8, 6, Point::new(0, 0), Point::new(1, 0));
        engine.ecs.set_player_point(Point::new(0, 0));

        let surrounds = engine.surroundings();
        let north = surrounds.iter().find(|(label, _)| *label == "North").unwrap();
        assert!(north.1.iter().any(|n| n.contains("edge")));
        let east = surrounds.iter().find(|(label, _)| *label == "East").unwrap();
        assert!(east.1.iter().any(|n| n.contains("stairs down")));
    }
}
