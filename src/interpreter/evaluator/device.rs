use std::time::Duration;

use crate::{
    ast::{KeyKind, MouseKind, Node},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter, service},
        lexer::Token,
        value::Value,
    },
};

impl Interpreter<'_> {
    /// Runs `press`, `hold` or `release`.
    ///
    /// Buttons are string names. Without a parsed duration, a numeric last
    /// value after at least one button is taken as the press duration in
    /// seconds; `hold` and `release` ignore it.
    pub(super) fn eval_key_action(&mut self,
                                  token: &Token,
                                  kind: KeyKind,
                                  buttons: &[Node],
                                  duration: Option<&Node>)
                                  -> EvalResult<()> {
        let pos = token.pos;
        let mut values = buttons.iter()
                                .map(|button| self.value(button))
                                .collect::<EvalResult<Vec<_>>>()?;
        let mut duration = duration.map(|node| self.value(node)).transpose()?;
        if duration.is_none() && values.len() > 1 && values.last().is_some_and(Value::is_numeric) {
            duration = values.pop();
        }

        let names = values.into_iter()
                          .map(|value| match value {
                              Value::Str(name) => Ok(name),
                              other => Err(RuntimeError::mismatch(format!("button names must be \
                                                                           strings, found {}",
                                                                          other.type_name()),
                                                                  pos)),
                          })
                          .collect::<EvalResult<Vec<_>>>()?;

        match kind {
            KeyKind::Press => {
                let duration = duration.map_or(Ok(Duration::ZERO), |d| d.as_seconds(pos))?;
                service(self.services.device.press(&names, duration), pos)
            },
            KeyKind::Hold => service(self.services.device.hold(&names), pos),
            KeyKind::Release => service(self.services.device.release(&names), pos),
        }
    }

    /// Runs `move`, `dmove` or `scroll`.
    ///
    /// Coordinates and scroll amounts are rounded to whole numbers; the
    /// optional time is in seconds.
    pub(super) fn eval_mouse_action(&mut self,
                                    token: &Token,
                                    kind: MouseKind,
                                    x: &Node,
                                    y: Option<&Node>,
                                    time: Option<&Node>)
                                    -> EvalResult<()> {
        let pos = token.pos;
        let x = self.value(x)?.as_whole(pos)?;
        let y = match y {
            Some(node) => self.value(node)?.as_whole(pos)?,
            None => 0,
        };
        let duration = match time {
            Some(node) => self.value(node)?.as_seconds(pos)?,
            None => Duration::ZERO,
        };

        let device = &mut self.services.device;
        let result = match kind {
            MouseKind::Move => device.move_to(x, y, duration),
            MouseKind::DMove => device.move_by(x, y, duration),
            MouseKind::Scroll => device.scroll(x, duration),
        };
        service(result, pos)
    }

    /// Runs `type text, delay`, pausing `delay` seconds after each
    /// character.
    pub(super) fn eval_type(&mut self, op: &Token, text: &Node, delay: &Node) -> EvalResult<()> {
        let text = self.string_operand(text, op.pos)?;
        let delay = self.value(delay)?.as_seconds(op.pos)?;
        service(self.services.device.type_text(&text, delay), op.pos)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{
        error::ErrorHandler,
        interpreter::{evaluator::Interpreter, parser::parse_source, value::Variables},
        io::{Event, Recorder, Services},
    };

    fn events(source: &str) -> (Vec<Event>, ErrorHandler) {
        let recorder = Recorder::new();
        let mut services = Services::recording(&recorder);
        let mut variables = Variables::default();
        let (root, mut errors) = parse_source(source);
        assert!(!errors.has_errors(), "{}", errors.render());

        Interpreter::new(&mut variables, &mut services, &mut errors).execute(&root);
        (recorder.events(), errors)
    }

    fn names(buttons: &[&str]) -> Vec<String> {
        buttons.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn a_trailing_number_is_the_press_duration() {
        let (events, errors) = events("t = 0.5\npress \"CTRL\", \"C\", t\npress \"A\"");

        assert!(!errors.has_errors());
        assert_eq!(events,
                   [Event::Press { buttons:  names(&["CTRL", "C"]),
                                   duration: Duration::from_millis(500), },
                    Event::Press { buttons:  names(&["A"]),
                                   duration: Duration::ZERO, }]);
    }

    #[test]
    fn pointer_actions_round_their_coordinates() {
        let (events, _) = events("move 10.4, 20.6, 1\ndmove -5, 5\nscroll -3");

        assert_eq!(events,
                   [Event::MoveTo { x:        10,
                                    y:        21,
                                    duration: Duration::from_secs(1), },
                    Event::MoveTo { x:        5,
                                    y:        26,
                                    duration: Duration::ZERO, },
                    Event::Scroll { amount:   -3,
                                    duration: Duration::ZERO, }]);
    }

    #[test]
    fn unknown_buttons_and_non_strings_are_runtime_errors() {
        let (events, errors) = events("press \"NOPE\"\nhold 1\nhold \"SHIFT\"");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.diagnostics()[0].message, "unknown button 'NOPE'");
        assert_eq!(events, [Event::Hold(names(&["SHIFT"]))]);
    }

    #[test]
    fn type_defaults_to_no_delay() {
        let (events, _) = events("type \"Hi\"\ntype \"x\", 0.25");

        assert_eq!(events,
                   [Event::Type { text:  "Hi".to_string(),
                                  delay: Duration::ZERO, },
                    Event::Type { text:  "x".to_string(),
                                  delay: Duration::from_millis(250), }]);
    }
}
