use chrono::NaiveDate;
use tracing::warn;

use crate::services::expiry::parse_expiry;
use crate::storage::Mapping;
use migration::entities::mapping;

/// 解析库中存储的过期日期
///
/// 和用户输入共用一个解析器，旧数据里的 `2024/01/01`、带时间的字符串都能读出日期；
/// 无法解析的值视为无过期日期。
pub fn parse_stored_expiry(raw: &str) -> Option<NaiveDate> {
    parse_expiry(raw).ok().flatten()
}

pub fn format_expiry(date: NaiveDate) -> String {
    migration::expiry_text::format_expiry_date(date)
}

/// 将 Sea-ORM Model 转换为 Mapping
pub fn model_to_mapping(model: mapping::Model) -> Mapping {
    let expiry = model.expiry.as_deref().and_then(|raw| {
        let parsed = parse_stored_expiry(raw);
        if parsed.is_none() && !raw.trim().is_empty() {
            warn!("Mapping '{}' has unparsable expiry '{}'", model.path, raw);
        }
        parsed
    });

    Mapping {
        path: model.path,
        target: model.target,
        name: model.name,
        expiry,
        enabled: model.enabled,
        is_wechat: model.is_wechat,
        qr_code_data: model.qr_code_data,
        created_at: model.created_at,
    }
}

/// 将 Mapping 转换为 ActiveModel（用于插入/更新）
///
/// 更新时 created_at 保持 NotSet，数据库中的创建时间不会被覆盖
pub fn mapping_to_active_model(m: &Mapping, is_new: bool) -> mapping::ActiveModel {
    use sea_orm::ActiveValue::*;

    mapping::ActiveModel {
        path: Set(m.path.clone()),
        target: Set(m.target.clone()),
        name: Set(m.name.clone()),
        expiry: Set(m.expiry.map(format_expiry)),
        enabled: Set(m.enabled),
        is_wechat: Set(m.is_wechat),
        qr_code_data: Set(m.qr_code_data.clone()),
        created_at: if is_new { Set(m.created_at) } else { NotSet },
    }
}
