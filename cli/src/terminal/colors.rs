use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightYellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const IPV4_ADDR: Color = Color::BrightBlue;
pub const IPV4_PREFIX: Color = Color::Blue;
pub const HOSTNAME: Color = Color::Cyan;

pub const ONLINE: Color = Color::Green;
pub const OFFLINE: Color = Color::Red;
pub const MISSING: Color = Color::BrightBlack;
