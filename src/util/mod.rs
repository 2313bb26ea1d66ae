pub mod embed;
pub mod parse;
pub mod permissions;
pub mod text;
pub mod time;
