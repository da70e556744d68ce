//! Command box: a two-state input field toggled by `/` and submitted with
//! Enter. The reducer is pure; the UI layer applies the effects it returns.

use crate::scene_core::time::TimeOverride;

pub const TIME_SET_PREFIX: &str = "/time set ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandBoxState {
    #[default]
    Hidden,
    Editing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandBoxEvent {
    /// `/` pressed anywhere in the viewport.
    SlashPressed,
    /// Enter pressed inside the field, carrying its content.
    Submit(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandBoxEffect {
    ShowAndFocus,
    /// `/` while the box is already open but the field lost focus.
    Refocus,
    Hide,
    ClearInput,
    SetTimeOverride(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetTime(f64),
}

/// Recognize `/time set <n>`. The last space-separated token is parsed with
/// integer-prefix semantics, so `"/time set abc"` yields `SetTime(NaN)`.
pub fn parse_command(input: &str) -> Option<Command> {
    if !input.starts_with(TIME_SET_PREFIX) {
        return None;
    }
    let token = input.split(' ').next_back().unwrap_or("");
    Some(Command::SetTime(parse_int_prefix(token)))
}

/// Leading whitespace, optional sign, an optional `0x` prefix, then as many
/// digits of that radix as present. No digits at all gives NaN.
pub fn parse_int_prefix(token: &str) -> f64 {
    let trimmed = token.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, rest) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let digits: Vec<u32> = rest
        .chars()
        .map_while(|c| c.to_digit(radix))
        .collect();
    if digits.is_empty() {
        return f64::NAN;
    }

    let value = digits
        .iter()
        .fold(0.0_f64, |acc, &d| acc * f64::from(radix) + f64::from(d));
    if negative {
        -value
    } else {
        value
    }
}

pub fn reduce(
    state: CommandBoxState,
    event: &CommandBoxEvent,
) -> (CommandBoxState, Vec<CommandBoxEffect>) {
    match (state, event) {
        (CommandBoxState::Hidden, CommandBoxEvent::SlashPressed) => {
            (CommandBoxState::Editing, vec![CommandBoxEffect::ShowAndFocus])
        }
        (CommandBoxState::Editing, CommandBoxEvent::SlashPressed) => {
            (CommandBoxState::Editing, vec![CommandBoxEffect::Refocus])
        }
        (CommandBoxState::Editing, CommandBoxEvent::Submit(content)) => {
            let mut effects = Vec::with_capacity(3);
            if let Some(Command::SetTime(value)) = parse_command(content) {
                effects.push(CommandBoxEffect::SetTimeOverride(value));
            }
            effects.push(CommandBoxEffect::ClearInput);
            effects.push(CommandBoxEffect::Hide);
            (CommandBoxState::Hidden, effects)
        }
        (CommandBoxState::Hidden, CommandBoxEvent::Submit(_)) => {
            (CommandBoxState::Hidden, Vec::new())
        }
    }
}

/// Reducer state plus the text buffer the field edits.
#[derive(Debug, Default)]
pub struct CommandBox {
    state: CommandBoxState,
    buffer: String,
    focus_requested: bool,
}

impl CommandBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CommandBoxState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == CommandBoxState::Editing
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.buffer
    }

    /// Returns true once after the box has been shown or refocused.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    pub fn slash_pressed(&mut self, time_override: &mut TimeOverride) {
        self.dispatch(CommandBoxEvent::SlashPressed, time_override);
    }

    pub fn submit(&mut self, time_override: &mut TimeOverride) {
        let content = self.buffer.clone();
        self.dispatch(CommandBoxEvent::Submit(content), time_override);
    }

    fn dispatch(&mut self, event: CommandBoxEvent, time_override: &mut TimeOverride) {
        let (next, effects) = reduce(self.state, &event);
        if next != self.state {
            log::debug!("command box {:?} -> {:?}", self.state, next);
        }
        self.state = next;

        for effect in effects {
            match effect {
                CommandBoxEffect::ShowAndFocus => {
                    // The triggering slash lands in the freshly focused field.
                    self.buffer.clear();
                    self.buffer.push('/');
                    self.focus_requested = true;
                }
                CommandBoxEffect::Refocus => {
                    self.buffer.push('/');
                    self.focus_requested = true;
                }
                CommandBoxEffect::Hide => self.focus_requested = false,
                CommandBoxEffect::ClearInput => self.buffer.clear(),
                CommandBoxEffect::SetTimeOverride(value) => {
                    if value.is_nan() {
                        log::warn!("time override is not a number; sky will be undefined");
                    } else {
                        log::info!("time override set to {value}");
                    }
                    time_override.set(value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_shows_box_and_enter_hides_it() {
        let (state, effects) = reduce(CommandBoxState::Hidden, &CommandBoxEvent::SlashPressed);
        assert_eq!(state, CommandBoxState::Editing);
        assert_eq!(effects, vec![CommandBoxEffect::ShowAndFocus]);

        let (state, effects) = reduce(state, &CommandBoxEvent::Submit("whatever".into()));
        assert_eq!(state, CommandBoxState::Hidden);
        assert_eq!(
            effects,
            vec![CommandBoxEffect::ClearInput, CommandBoxEffect::Hide]
        );
    }

    #[test]
    fn time_set_command_emits_override() {
        let (_, effects) = reduce(
            CommandBoxState::Editing,
            &CommandBoxEvent::Submit("/time set 43200".into()),
        );
        assert_eq!(effects[0], CommandBoxEffect::SetTimeOverride(43_200.0));
    }

    #[test]
    fn submit_while_hidden_is_ignored() {
        let (state, effects) = reduce(
            CommandBoxState::Hidden,
            &CommandBoxEvent::Submit("/time set 1".into()),
        );
        assert_eq!(state, CommandBoxState::Hidden);
        assert!(effects.is_empty());
    }

    #[test]
    fn parse_uses_last_token_and_integer_prefix() {
        assert_eq!(parse_command("/time set 500"), Some(Command::SetTime(500.0)));
        assert_eq!(parse_command("/time set 1 2 750"), Some(Command::SetTime(750.0)));
        assert_eq!(parse_command("/time set 12abc"), Some(Command::SetTime(12.0)));
        assert_eq!(parse_command("/time set -40"), Some(Command::SetTime(-40.0)));
        assert_eq!(parse_command("/time set 3.9"), Some(Command::SetTime(3.0)));
        assert!(matches!(parse_command("/time set abc"), Some(Command::SetTime(v)) if v.is_nan()));
        assert!(matches!(parse_command("/time set "), Some(Command::SetTime(v)) if v.is_nan()));
    }

    #[test]
    fn hex_prefix_is_honoured() {
        assert_eq!(parse_command("/time set 0x1f4"), Some(Command::SetTime(500.0)));
        assert_eq!(parse_int_prefix("0X10"), 16.0);
        assert_eq!(parse_int_prefix("-0x10"), -16.0);
        assert_eq!(parse_int_prefix("0x1fz"), 31.0);
        assert!(parse_int_prefix("0x").is_nan());
        assert!(parse_int_prefix("0xg").is_nan());
        assert_eq!(parse_int_prefix("0"), 0.0);
        assert_eq!(parse_int_prefix("09"), 9.0);
    }

    #[test]
    fn slash_while_editing_refocuses_the_field() {
        let (state, effects) = reduce(CommandBoxState::Editing, &CommandBoxEvent::SlashPressed);
        assert_eq!(state, CommandBoxState::Editing);
        assert_eq!(effects, vec![CommandBoxEffect::Refocus]);

        let mut time_override = TimeOverride::default();
        let mut command_box = CommandBox::new();
        command_box.slash_pressed(&mut time_override);
        assert!(command_box.take_focus_request());
        command_box.buffer_mut().push_str("time");

        // Field lost focus (Escape or a click elsewhere); `/` brings it back.
        command_box.slash_pressed(&mut time_override);
        assert!(command_box.is_visible());
        assert!(command_box.take_focus_request());
        assert_eq!(command_box.buffer(), "/time/");
        assert!(!time_override.is_set());
    }

    #[test]
    fn non_matching_input_is_not_a_command() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("/time 500"), None);
        assert_eq!(parse_command(" /time set 500"), None);
        assert_eq!(parse_command("/TIME SET 500"), None);
    }

    #[test]
    fn command_box_sets_override_and_clears_field() {
        let mut time_override = TimeOverride::default();
        let mut command_box = CommandBox::new();

        command_box.slash_pressed(&mut time_override);
        assert!(command_box.is_visible());
        assert_eq!(command_box.buffer(), "/");
        assert!(command_box.take_focus_request());
        assert!(!command_box.take_focus_request());

        command_box.buffer_mut().push_str("time set 43200");
        command_box.submit(&mut time_override);

        assert!(!command_box.is_visible());
        assert_eq!(command_box.buffer(), "");
        assert_eq!(time_override.get(), Some(43_200.0));
        let time = crate::scene_core::time::resolve_time_of_day(time_override.get(), 0.0);
        assert!((time - 43.2).abs() < 1e-9);
    }

    #[test]
    fn unrecognized_input_leaves_override_untouched() {
        let mut time_override = TimeOverride::default();
        time_override.set(250.0);
        let mut command_box = CommandBox::new();

        command_box.slash_pressed(&mut time_override);
        command_box.buffer_mut().clear();
        command_box.buffer_mut().push_str("hello");
        command_box.submit(&mut time_override);

        assert_eq!(time_override.get(), Some(250.0));
        assert_eq!(command_box.buffer(), "");
        assert_eq!(command_box.state(), CommandBoxState::Hidden);
    }
}
