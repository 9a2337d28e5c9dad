//! Character and theme profiles
//!
//! Both are chosen by the host before a run and stay immutable while it lasts.
//! Changing either requires a reset.

use serde::{Deserialize, Serialize};

/// Linear RGBA color, components in 0-1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xFFFFFF);
    pub const BLACK: Color = Color::hex(0x000000);
    pub const GOLD: Color = Color::hex(0xFFD700);
    pub const SHIELD_BLUE: Color = Color::hex(0x3B82F6);
    pub const MAGNET_PURPLE: Color = Color::hex(0x9333EA);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a 0xRRGGBB literal
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as f32 / 255.0,
            g: ((rgb >> 8) & 0xFF) as f32 / 255.0,
            b: (rgb & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parse `#RRGGBB` (leading `#` optional)
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::hex)
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A playable character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub id: u8,
    pub name: String,
    pub title: String,
    /// Fallback body color when no sprite is ready
    pub color: Color,
    /// Base run speed
    pub speed: f32,
    /// Reward bonus shown by the host (never applied by the simulation)
    pub bonus_multiplier: f32,
    /// Run animation frames, in playback order
    pub run_frames: Vec<String>,
}

impl CharacterProfile {
    fn builtin(id: u8, name: &str, title: &str, rgb: u32, speed: f32, bonus: f32, frames: usize) -> Self {
        let lower = name.to_lowercase();
        Self {
            id,
            name: name.to_string(),
            title: title.to_string(),
            color: Color::hex(rgb),
            speed,
            bonus_multiplier: bonus,
            run_frames: (1..=frames)
                .map(|i| format!("sprites/{lower}_run_{i}.png"))
                .collect(),
        }
    }

    /// The built-in character roster
    pub fn roster() -> Vec<CharacterProfile> {
        vec![
            Self::builtin(0, "Sonic", "The Blue Blur", 0x0066FF, 9.0, 1.0, 12),
            Self::builtin(1, "Tails", "The Genius Inventor", 0xFFB600, 6.0, 1.1, 10),
            Self::builtin(2, "Knuckles", "The Guardian", 0xFF0000, 7.0, 1.2, 12),
            Self::builtin(3, "Shadow", "The Ultimate Lifeform", 0x000000, 9.0, 1.15, 8),
            Self::builtin(4, "Amy", "The Energetic Optimist", 0xFF69B4, 7.0, 1.05, 8),
            Self::builtin(5, "Cream", "The Polite & Kind", 0xFFF4E6, 6.0, 1.25, 14),
        ]
    }

    /// Look up a roster character, defaulting to the first one
    pub fn by_id(id: u8) -> CharacterProfile {
        let mut roster = Self::roster();
        match roster.iter().position(|c| c.id == id) {
            Some(i) => roster.swap_remove(i),
            None => roster.swap_remove(0),
        }
    }
}

impl Default for CharacterProfile {
    fn default() -> Self {
        Self::by_id(0)
    }
}

/// Visual theme for the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
    /// Shop price in ring tokens
    pub cost: u32,
    pub sky: Color,
    pub ground: Color,
    pub grass: Color,
    pub obstacle: Color,
    pub text: Color,
    pub background_image: String,
}

impl Theme {
    #[allow(clippy::too_many_arguments)]
    fn builtin(id: &str, name: &str, cost: u32, sky: u32, ground: u32, grass: u32, obstacle: u32, text: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            cost,
            sky: Color::hex(sky),
            ground: Color::hex(ground),
            grass: Color::hex(grass),
            obstacle: Color::hex(obstacle),
            text: Color::hex(text),
            background_image: format!("backgrounds/{id}.png"),
        }
    }

    /// The built-in theme catalogue
    pub fn catalogue() -> Vec<Theme> {
        vec![
            Self::builtin("greenhill", "Green Hill", 0, 0x87CEEB, 0x8B4513, 0x22C55E, 0xEF4444, 0xFFFFFF),
            Self::builtin("marble", "Marble Zone", 500, 0x4C1D95, 0x475569, 0xFBBF24, 0x7F1D1D, 0xFBBF24),
            Self::builtin("starlight", "Star Light", 1000, 0x0F172A, 0x1E293B, 0x38BDF8, 0xC026D3, 0x38BDF8),
            Self::builtin("chemical", "Chemical Plant", 2000, 0x022C22, 0xFACC15, 0xEC4899, 0x1E40AF, 0xEC4899),
        ]
    }

    /// Look up a catalogue theme, defaulting to Green Hill
    pub fn by_id(id: &str) -> Theme {
        let mut catalogue = Self::catalogue();
        match catalogue.iter().position(|t| t.id == id) {
            Some(i) => catalogue.swap_remove(i),
            None => catalogue.swap_remove(0),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::by_id("greenhill")
    }
}
