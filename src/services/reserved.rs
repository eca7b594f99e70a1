//! 保留路径
//!
//! 管理页面、静态资源和内部键占用的名字，不能作为映射路径。

pub const RESERVED_PATHS: &[&str] = &[
    "login",
    "admin",
    "__total_count",
    "admin.html",
    "login.html",
    "daisyui@5.css",
    "tailwindcss@4.js",
    "qr-code-styling.js",
    "zxing.js",
    "robots.txt",
    "wechat.svg",
    "favicon.svg",
];

/// 精确匹配，区分大小写
pub fn is_reserved(path: &str) -> bool {
    RESERVED_PATHS.contains(&path)
}
