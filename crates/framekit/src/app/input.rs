use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Escape,
    Tab,
    Space,
    Enter,
    Backspace,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    LeftShift,
    RightShift,
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,
    Minus,
    Equals,
    Comma,
    Period,
    Slash,
    Semicolon,
    Quote,
    Backquote,
    LeftBracket,
    RightBracket,
    Backslash,
}

impl Key {
    pub const COUNT: usize = Self::ALL.len();

    pub const ALL: [Key; 80] = [
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
        Key::Num0,
        Key::Num1,
        Key::Num2,
        Key::Num3,
        Key::Num4,
        Key::Num5,
        Key::Num6,
        Key::Num7,
        Key::Num8,
        Key::Num9,
        Key::F1,
        Key::F2,
        Key::F3,
        Key::F4,
        Key::F5,
        Key::F6,
        Key::F7,
        Key::F8,
        Key::F9,
        Key::F10,
        Key::F11,
        Key::F12,
        Key::Escape,
        Key::Tab,
        Key::Space,
        Key::Enter,
        Key::Backspace,
        Key::Insert,
        Key::Delete,
        Key::Home,
        Key::End,
        Key::PageUp,
        Key::PageDown,
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::LeftShift,
        Key::RightShift,
        Key::LeftCtrl,
        Key::RightCtrl,
        Key::LeftAlt,
        Key::RightAlt,
        Key::Minus,
        Key::Equals,
        Key::Comma,
        Key::Period,
        Key::Slash,
        Key::Semicolon,
        Key::Quote,
        Key::Backquote,
        Key::LeftBracket,
        Key::RightBracket,
        Key::Backslash,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Result<Self, InputError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(InputError::KeyOutOfRange {
                index,
                count: Self::COUNT,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub const COUNT: usize = 3;

    pub const ALL: [MouseButton; Self::COUNT] =
        [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

    pub const fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
        }
    }

    pub fn from_index(index: usize) -> Result<Self, InputError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(InputError::MouseButtonOutOfRange {
                index,
                count: Self::COUNT,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("key index {index} is out of range (expected 0..{count})")]
    KeyOutOfRange { index: usize, count: usize },
    #[error("mouse button index {index} is out of range (expected 0..{count})")]
    MouseButtonOutOfRange { index: usize, count: usize },
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ButtonStates<const N: usize> {
    down: [bool; N],
    pressed: [bool; N],
    released: [bool; N],
}

impl<const N: usize> Default for ButtonStates<N> {
    fn default() -> Self {
        Self {
            down: [false; N],
            pressed: [false; N],
            released: [false; N],
        }
    }
}

impl<const N: usize> ButtonStates<N> {
    fn press(&mut self, index: usize) {
        if !self.down[index] {
            self.pressed[index] = true;
        }
        self.down[index] = true;
    }

    fn release(&mut self, index: usize) {
        self.down[index] = false;
        self.released[index] = true;
    }

    fn clear_edges(&mut self) {
        self.pressed = [false; N];
        self.released = [false; N];
    }

    fn is_down(&self, index: usize) -> bool {
        self.down[index]
    }

    fn is_pressed(&self, index: usize) -> bool {
        self.pressed[index]
    }

    fn is_released(&self, index: usize) -> bool {
        self.released[index]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MouseState {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
    moved: bool,
    buttons: ButtonStates<{ MouseButton::COUNT }>,
}

/// Edge flags (`pressed`/`released`/`moved`) survive until the next [`InputLatch::begin_tick`],
/// which the frame driver calls right after each logic tick.
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    keys: ButtonStates<{ Key::COUNT }>,
    mouse: MouseState,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_down(&mut self, key: Key) {
        self.keys.press(key.index());
    }

    pub fn on_key_up(&mut self, key: Key) {
        self.keys.release(key.index());
    }

    pub fn on_mouse_move(&mut self, x: i32, y: i32, dx: i32, dy: i32) {
        self.mouse.x = x;
        self.mouse.y = y;
        self.mouse.dx = dx;
        self.mouse.dy = dy;
        self.mouse.moved = true;
    }

    pub fn on_mouse_button_down(&mut self, button: MouseButton) {
        self.mouse.buttons.press(button.index());
    }

    pub fn on_mouse_button_up(&mut self, button: MouseButton) {
        self.mouse.buttons.release(button.index());
    }

    pub fn begin_tick(&mut self) {
        self.keys.clear_edges();
        self.mouse.buttons.clear_edges();
        self.mouse.moved = false;
        self.mouse.dx = 0;
        self.mouse.dy = 0;
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys.is_down(key.index())
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.keys.is_pressed(key.index())
    }

    pub fn is_key_released(&self, key: Key) -> bool {
        self.keys.is_released(key.index())
    }

    pub fn key_down_by_index(&self, index: usize) -> Result<bool, InputError> {
        Key::from_index(index).map(|key| self.is_key_down(key))
    }

    pub fn key_pressed_by_index(&self, index: usize) -> Result<bool, InputError> {
        Key::from_index(index).map(|key| self.is_key_pressed(key))
    }

    pub fn key_released_by_index(&self, index: usize) -> Result<bool, InputError> {
        Key::from_index(index).map(|key| self.is_key_released(key))
    }

    pub fn mouse_x(&self) -> i32 {
        self.mouse.x
    }

    pub fn mouse_y(&self) -> i32 {
        self.mouse.y
    }

    pub fn mouse_dx(&self) -> i32 {
        self.mouse.dx
    }

    pub fn mouse_dy(&self) -> i32 {
        self.mouse.dy
    }

    pub fn mouse_moved(&self) -> bool {
        self.mouse.moved
    }

    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse.buttons.is_down(button.index())
    }

    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse.buttons.is_pressed(button.index())
    }

    pub fn is_mouse_button_released(&self, button: MouseButton) -> bool {
        self.mouse.buttons.is_released(button.index())
    }

    pub fn mouse_button_down_by_index(&self, index: usize) -> Result<bool, InputError> {
        MouseButton::from_index(index).map(|button| self.is_mouse_button_down(button))
    }

    pub fn first_key_down(&self) -> Option<Key> {
        Key::ALL.into_iter().find(|key| self.is_key_down(*key))
    }
}
