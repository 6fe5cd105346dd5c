//! 歌词格式生成器

pub mod lrc_generator;
