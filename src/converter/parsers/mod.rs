//! 歌词格式解析器

pub mod lrc_parser;
