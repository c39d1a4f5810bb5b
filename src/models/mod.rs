/// 核心枚举定义模块
pub mod enums;
/// 核心结构体定义模块
pub mod structs;

// 重新导出所有类型，方便其他模块使用
pub use enums::*;
pub use structs::*;
