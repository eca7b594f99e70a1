use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "mappings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub path: String,
    #[sea_orm(column_type = "Text")]
    pub target: String,
    pub name: Option<String>,
    /// 日历日期，统一存为 `YYYY-MM-DD`
    pub expiry: Option<String>,
    pub enabled: bool,
    #[sea_orm(column_name = "isWechat")]
    pub is_wechat: bool,
    #[sea_orm(column_name = "qrCodeData", column_type = "Text", nullable)]
    pub qr_code_data: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
