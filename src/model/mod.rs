//! 定义了整个库通用的、与具体服务无关的核心数据模型。

pub mod report;
pub mod track;
