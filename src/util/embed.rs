use serenity::all::{CreateEmbed, Timestamp};

/// Embed colors used across the bot.
pub struct Colors;

impl Colors {
    pub const PRIMARY: u32 = 0x5865F2;
    pub const SUCCESS: u32 = 0x57F287;
    pub const WARNING: u32 = 0xFEE75C;
    pub const ERROR: u32 = 0xED4245;
    pub const MODERATION: u32 = 0xEB459E;
    pub const MUSIC: u32 = 0x1DB954;
}

pub fn info_embed() -> CreateEmbed {
    base_embed(Colors::PRIMARY)
}

pub fn success_embed() -> CreateEmbed {
    base_embed(Colors::SUCCESS)
}

pub fn warning_embed() -> CreateEmbed {
    base_embed(Colors::WARNING)
}

pub fn error_embed() -> CreateEmbed {
    base_embed(Colors::ERROR)
}

pub fn moderation_embed() -> CreateEmbed {
    base_embed(Colors::MODERATION)
}

pub fn music_embed() -> CreateEmbed {
    base_embed(Colors::MUSIC)
}

fn base_embed(color: u32) -> CreateEmbed {
    CreateEmbed::default().color(color).timestamp(Timestamp::now())
}
