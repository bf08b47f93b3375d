pub type Color = [u8; 4];

pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    [r, g, b, 255]
}

pub const BLACK: Color = rgb(0, 0, 0);
pub const WHITE: Color = rgb(255, 255, 255);
pub const DARK_GREY: Color = rgb(64, 64, 64);
pub const GREY: Color = rgb(128, 128, 128);
pub const LIGHT_GREY: Color = rgb(192, 192, 192);
pub const RED: Color = rgb(255, 0, 0);
pub const GREEN: Color = rgb(0, 255, 0);
pub const DARK_GREEN: Color = rgb(0, 100, 0);
pub const BLUE: Color = rgb(0, 0, 255);
pub const YELLOW: Color = rgb(255, 255, 0);
pub const CYAN: Color = rgb(0, 255, 255);
pub const MAGENTA: Color = rgb(255, 0, 255);
pub const MAROON: Color = rgb(128, 0, 0);
pub const PURPLE: Color = rgb(128, 0, 128);
pub const LIME: Color = rgb(50, 205, 50);
pub const OLIVE: Color = rgb(128, 128, 0);
pub const NAVY: Color = rgb(0, 0, 128);
pub const TEAL: Color = rgb(0, 128, 128);
pub const BROWN: Color = rgb(139, 69, 19);
