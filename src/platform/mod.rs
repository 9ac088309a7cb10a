//! 平台相关实现

#[cfg(windows)]
pub mod win;
