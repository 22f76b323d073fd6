//! 用户中心与 VIP 相关接口的模型。

use serde::{Deserialize, Serialize};

use super::{Extras, de, fill_size, impl_envelope};

/// 用户资料 (`/v3/get_my_info`)。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDetailModel {
    /// 外层状态码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub status: Option<i64>,
    /// 外层错误码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub error_code: Option<i64>,
    /// 昵称
    #[serde(deserialize_with = "de::loose_string")]
    pub nickname: String,
    /// 头像
    #[serde(deserialize_with = "de::loose_string")]
    pub pic: String,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

/// 领取一天 VIP 的结果。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OneDayVipModel {
    /// 外层状态码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub status: Option<i64>,
    /// 外层错误码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub error_code: Option<i64>,
    /// 今日已领取次数
    #[serde(deserialize_with = "de::loose_i64")]
    pub ad_vip_num: i64,
    /// VIP 到期时间戳
    #[serde(deserialize_with = "de::loose_i64")]
    pub ad_vip_end_time: i64,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

/// 升级 VIP 奖励的结果。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeVipModel {
    /// 外层状态码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub status: Option<i64>,
    /// 外层错误码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub error_code: Option<i64>,
    /// 增加的小时数
    #[serde(deserialize_with = "de::loose_i64")]
    pub recharge_hours: i64,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

/// 会员详情 (`/v1/get_union_vip`)。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserVipResponse {
    /// 外层状态码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub status: Option<i64>,
    /// 外层错误码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub error_code: Option<i64>,
    /// 用户 ID
    #[serde(deserialize_with = "de::loose_i64")]
    pub userid: i64,
    /// 是否为 VIP
    #[serde(deserialize_with = "de::loose_i64")]
    pub is_vip: i64,
    /// VIP 类型
    #[serde(deserialize_with = "de::loose_i64")]
    pub vip_type: i64,
    /// 各业务线的会员状态
    #[serde(rename = "busi_vip")]
    #[serde(deserialize_with = "de::loose_vec")]
    pub busi_vip_list: Vec<BusiVipInfo>,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

impl UserVipResponse {
    fn has_product(&self, product: &str) -> bool {
        self.busi_vip_list
            .iter()
            .any(|v| v.product_type == product && v.is_vip == 1)
    }

    /// 是否持有概念版超级会员 (`svip`)。
    #[must_use]
    pub fn is_super_vip(&self) -> bool {
        self.has_product("svip")
    }

    /// 是否持有畅听会员 (`tvip`)。
    #[must_use]
    pub fn is_concept_vip(&self) -> bool {
        self.has_product("tvip")
    }
}

/// 单个业务线的会员状态。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BusiVipInfo {
    /// 1 表示有效
    #[serde(deserialize_with = "de::loose_i64")]
    pub is_vip: i64,
    /// `svip` 或 `tvip`
    #[serde(deserialize_with = "de::loose_string")]
    pub product_type: String,
    /// 业务类型，例如 `concept`
    #[serde(deserialize_with = "de::loose_string")]
    pub busi_type: String,
    /// 开始时间
    #[serde(rename = "vip_begin_time", deserialize_with = "de::loose_string")]
    pub begin_time: String,
    /// 结束时间
    #[serde(rename = "vip_end_time", deserialize_with = "de::loose_string")]
    pub end_time: String,
    /// 清除时间
    #[serde(rename = "vip_clearday", deserialize_with = "de::loose_string")]
    pub clear_day: String,
}

/// 用户歌单 (`/v7/get_all_list`)。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPlaylistResponse {
    /// 外层状态码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub status: Option<i64>,
    /// 外层错误码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub error_code: Option<i64>,
    /// 用户 ID
    #[serde(deserialize_with = "de::loose_i64")]
    pub userid: i64,
    /// 歌单数
    #[serde(deserialize_with = "de::loose_i64")]
    pub list_count: i64,
    /// 歌单
    #[serde(rename = "info")]
    #[serde(deserialize_with = "de::loose_vec")]
    pub playlists: Vec<UserPlaylistItem>,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

/// 用户的一个歌单。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPlaylistItem {
    /// 名称
    #[serde(deserialize_with = "de::loose_string")]
    pub name: String,
    /// 数字 ID
    #[serde(rename = "listid", deserialize_with = "de::loose_i64")]
    pub list_id: i64,
    /// 全局 ID，获取歌曲时使用
    #[serde(rename = "global_collection_id", deserialize_with = "de::loose_string")]
    pub global_id: String,
    /// 歌曲数
    #[serde(deserialize_with = "de::loose_i64")]
    pub count: i64,
    /// 封面模板，可能为空
    pub pic: Option<String>,
    /// 1 默认收藏，2 我喜欢，0 自建
    #[serde(rename = "is_def", deserialize_with = "de::loose_i64")]
    pub is_default: i64,
    /// 创建时间戳
    #[serde(deserialize_with = "de::loose_i64")]
    pub create_time: i64,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

impl UserPlaylistItem {
    /// 600px 尺寸的封面地址。
    #[must_use]
    pub fn cover_url(&self) -> Option<String> {
        self.pic.as_deref().map(|t| fill_size(t, 600))
    }
}

/// 当月 VIP 领取记录 (`/youth/v1/activity/get_month_vip_record`)。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VipReceiveHistoryResponse {
    /// 外层状态码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub status: Option<i64>,
    /// 外层错误码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub error_code: Option<i64>,
    /// 月份，`yyyy-MM`
    #[serde(deserialize_with = "de::loose_string")]
    pub month: String,
    /// 服务器时间戳
    #[serde(deserialize_with = "de::loose_i64")]
    pub server_time: i64,
    /// 每日领取详情
    #[serde(rename = "list")]
    #[serde(deserialize_with = "de::loose_vec")]
    pub items: Vec<VipReceiveItem>,
    /// 时长统计
    pub future_duration: Option<VipFutureDuration>,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

/// 单日的领取情况。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VipReceiveItem {
    /// 日期，`yyyy-MM-dd`
    #[serde(deserialize_with = "de::loose_string")]
    pub day: String,
    /// 1 表示已领取
    #[serde(rename = "receive_vip", deserialize_with = "de::loose_i64")]
    pub is_received: i64,
    /// VIP 类型
    #[serde(deserialize_with = "de::loose_string")]
    pub vip_type: String,
}

/// 时长统计。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VipFutureDuration {
    /// 可提升的秒数
    #[serde(deserialize_with = "de::loose_i64")]
    pub up_seconds: i64,
    /// 总时长
    #[serde(deserialize_with = "de::loose_i64")]
    pub duration: i64,
    /// 剩余秒数
    #[serde(deserialize_with = "de::loose_i64")]
    pub seconds: i64,
    /// 月份数
    #[serde(deserialize_with = "de::loose_i64")]
    pub month_num: i64,
}

impl_envelope!(
    UserDetailModel,
    OneDayVipModel,
    UpgradeVipModel,
    UserVipResponse,
    UserPlaylistResponse,
    VipReceiveHistoryResponse,
);
