//! Generate config command

use crate::config::StaticConfig;

/// 输出示例配置到标准输出
pub fn print_sample_config() {
    println!("{}", StaticConfig::generate_sample_config());
}
