use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::camera::Direction;

/// Something the viewer should do this tick, decoded from raw input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Move(Direction),
    /// Mouse travel in pixels, `dy` positive upward.
    Look { dx: f32, dy: f32 },
    Zoom(f32),
    NextFrame,
    PrevFrame,
    Reload,
    Exit,
}

const MOVE_KEYS: [(KeyCode, Direction); 6] = [
    (KeyCode::KeyW, Direction::Forward),
    (KeyCode::KeyS, Direction::Back),
    (KeyCode::KeyA, Direction::Left),
    (KeyCode::KeyD, Direction::Right),
    (KeyCode::KeyQ, Direction::Down),
    (KeyCode::KeyE, Direction::Up),
];

/// Per-tick snapshot of input state.
#[derive(Debug, Default)]
pub struct InputState {
    mouse_position: Option<Vec2>,
    mouse_delta: Vec2,
    scroll_delta: f32,
    keys_down: HashSet<PhysicalKey>,
    /// Every press this tick in arrival order, auto-repeats included.
    key_strokes: Vec<(PhysicalKey, bool)>,
    mouse_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn mouse_position(&self) -> Option<Vec2> {
        self.mouse_position
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&PhysicalKey::Code(key))
    }

    pub fn mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse_down.contains(&button)
    }

    pub fn record_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.record_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.mouse_position = None,
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                self.record_scroll(amount);
            }
            WindowEvent::MouseInput { state, button, .. } => self.record_button(*button, *state),
            WindowEvent::KeyboardInput { event, .. } => {
                self.record_key(event.physical_key, event.state, event.repeat);
            }
            WindowEvent::Focused(false) => {
                self.keys_down.clear();
                self.mouse_down.clear();
            }
            _ => {}
        }
    }

    pub fn record_cursor(&mut self, current: Vec2) {
        if let Some(prev) = self.mouse_position {
            self.mouse_delta += current - prev;
        }
        self.mouse_position = Some(current);
    }

    pub fn record_scroll(&mut self, lines: f32) {
        self.scroll_delta += lines;
    }

    pub fn record_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.mouse_down.insert(button);
            }
            ElementState::Released => {
                self.mouse_down.remove(&button);
            }
        }
    }

    pub fn record_key(&mut self, key: PhysicalKey, state: ElementState, repeat: bool) {
        match state {
            ElementState::Pressed => {
                self.keys_down.insert(key);
                self.key_strokes.push((key, repeat));
            }
            ElementState::Released => {
                self.keys_down.remove(&key);
            }
        }
    }

    pub fn end_frame(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
        self.key_strokes.clear();
    }
}

/// Decode the input gathered since the last tick.
///
/// Movement follows held keys; frame stepping follows key presses so a held
/// arrow steps once per auto-repeat. Reload and exit ignore repeats.
pub fn intents(input: &InputState) -> Vec<Intent> {
    let mut intents = Vec::new();

    for (key, repeat) in &input.key_strokes {
        let PhysicalKey::Code(code) = key else {
            continue;
        };
        let intent = match code {
            KeyCode::ArrowRight => Intent::NextFrame,
            KeyCode::ArrowLeft => Intent::PrevFrame,
            KeyCode::KeyR if !repeat => Intent::Reload,
            KeyCode::Escape if !repeat => Intent::Exit,
            _ => continue,
        };
        intents.push(intent);
    }

    intents.extend(
        MOVE_KEYS
            .iter()
            .filter(|(key, _)| input.key_down(*key))
            .map(|(_, direction)| Intent::Move(*direction)),
    );

    let delta = input.mouse_delta();
    if input.mouse_button_down(MouseButton::Right) && delta != Vec2::ZERO {
        // Screen y grows downward.
        intents.push(Intent::Look {
            dx: delta.x,
            dy: -delta.y,
        });
    }

    if input.scroll_delta() != 0.0 {
        intents.push(Intent::Zoom(input.scroll_delta()));
    }

    intents
}

/// Collects window events between ticks and hands out intents once per tick.
#[derive(Debug, Default)]
pub struct Controls {
    input: InputState,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_event(&mut self, event: &WindowEvent) {
        self.input.record_event(event);
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Intents for this tick; per-tick deltas are reset afterwards.
    pub fn take_intents(&mut self) -> Vec<Intent> {
        let intents = intents(&self.input);
        self.input.end_frame();
        intents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut InputState, key: KeyCode) {
        input.record_key(PhysicalKey::Code(key), ElementState::Pressed, false);
    }

    fn repeat(input: &mut InputState, key: KeyCode) {
        input.record_key(PhysicalKey::Code(key), ElementState::Pressed, true);
    }

    fn release(input: &mut InputState, key: KeyCode) {
        input.record_key(PhysicalKey::Code(key), ElementState::Released, false);
    }

    #[test]
    fn test_no_input_no_intents() {
        assert!(intents(&InputState::default()).is_empty());
    }

    #[test]
    fn test_arrow_presses_step_frames() {
        let mut controls = Controls::new();
        press(controls.input_mut(), KeyCode::ArrowRight);
        repeat(controls.input_mut(), KeyCode::ArrowRight);
        assert_eq!(
            controls.take_intents(),
            vec![Intent::NextFrame, Intent::NextFrame]
        );

        // Still held but no new press: no step.
        assert!(controls.take_intents().is_empty());

        release(controls.input_mut(), KeyCode::ArrowRight);
        press(controls.input_mut(), KeyCode::ArrowLeft);
        assert_eq!(controls.take_intents(), vec![Intent::PrevFrame]);
    }

    #[test]
    fn test_reload_and_exit_ignore_repeat() {
        let mut controls = Controls::new();
        press(controls.input_mut(), KeyCode::KeyR);
        repeat(controls.input_mut(), KeyCode::KeyR);
        press(controls.input_mut(), KeyCode::Escape);
        assert_eq!(controls.take_intents(), vec![Intent::Reload, Intent::Exit]);
    }

    #[test]
    fn test_held_keys_move_every_tick() {
        let mut controls = Controls::new();
        press(controls.input_mut(), KeyCode::KeyW);
        press(controls.input_mut(), KeyCode::KeyE);
        let expected = vec![Intent::Move(Direction::Forward), Intent::Move(Direction::Up)];
        assert_eq!(controls.take_intents(), expected);
        assert_eq!(controls.take_intents(), expected);

        release(controls.input_mut(), KeyCode::KeyW);
        assert_eq!(controls.take_intents(), vec![Intent::Move(Direction::Up)]);
    }

    #[test]
    fn test_look_only_while_right_button_held() {
        let mut controls = Controls::new();
        controls.input_mut().record_cursor(Vec2::new(100.0, 100.0));
        controls.input_mut().record_cursor(Vec2::new(110.0, 95.0));
        assert!(controls.take_intents().is_empty());

        controls
            .input_mut()
            .record_button(MouseButton::Right, ElementState::Pressed);
        controls.input_mut().record_cursor(Vec2::new(120.0, 105.0));
        assert_eq!(
            controls.take_intents(),
            vec![Intent::Look { dx: 10.0, dy: -10.0 }]
        );

        controls
            .input_mut()
            .record_button(MouseButton::Right, ElementState::Released);
        controls.input_mut().record_cursor(Vec2::new(0.0, 0.0));
        assert!(controls.take_intents().is_empty());
    }

    #[test]
    fn test_scroll_zooms() {
        let mut input = InputState::default();
        input.record_scroll(1.5);
        input.record_scroll(0.5);
        assert_eq!(intents(&input), vec![Intent::Zoom(2.0)]);
        input.end_frame();
        assert!(intents(&input).is_empty());
    }
}
