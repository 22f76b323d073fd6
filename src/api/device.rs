//! 风控设备注册 (`/risk/v2/r_register_dev`)。
//!
//! 上报一份固定的硬件信息，以安装 GUID 充当 `imei` 与 `uuid`。
//! 请求体和响应都使用歌单 AES 变体加密，密钥经 PKCS#1 RSA 封装后放在 `p` 参数中。

use serde_json::{Value, json};
use tracing::{instrument, warn};

use super::{now_secs, open_opaque};
use crate::{
    crypto::recipe::{KeyWrap, Recipe, Sealed},
    error::Result,
    session::ANONYMOUS_DFID,
    signature::{APP_ID, CLIENT_VER},
    transport::{KgRequest, Transport},
};

const USER_SERVICE_HOST: &str = "https://userservice.kugou.com";

const SENSORS: [&str; 9] = [
    "accelerometer",
    "gravity",
    "gyroscope",
    "light",
    "magnetic",
    "orientation",
    "pressure",
    "step_counter",
    "temperature",
];

/// 设备注册接口。
#[derive(Debug, Clone)]
pub struct DeviceApi {
    transport: Transport,
}

impl DeviceApi {
    /// 创建接口实例。
    #[must_use]
    pub const fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// 注册设备。
    ///
    /// 返回解密后的响应；无法解密时返回原始响应。成功时 `data.dfid` 是新的设备 ID。
    #[instrument(skip(self, token))]
    pub async fn register_dev(&self, userid: &str, token: &str) -> Result<Value> {
        let session = self.transport.session().snapshot();
        let hardware = hardware_info(&session.install_guid);

        let sealed = Recipe::PlaylistAes.seal(&hardware.to_string())?;
        self.send_registration(userid, token, sealed).await
    }

    /// 发送已加密的硬件信息，并用同一密钥解开响应。
    async fn send_registration(&self, userid: &str, token: &str, sealed: Sealed) -> Result<Value> {
        let p = KeyWrap::Pkcs1.wrap(&json!({ "aes": sealed.key, "uid": userid, "token": token }))?;

        let request = KgRequest::post("/risk/v2/r_register_dev")
            .host(USER_SERVICE_HOST)
            .param("part", 1)
            .param("platid", 1)
            .param("p", p)
            .param("clientver", CLIENT_VER)
            .param("clienttime", now_secs())
            .param("appid", APP_ID)
            .raw(sealed.ciphertext, "text/plain")
            .dfid(ANONYMOUS_DFID);

        let response = self.transport.send(request).await?;
        Ok(open_opaque(&response, Recipe::PlaylistAes, &sealed.key).unwrap_or_else(|| {
            warn!("设备注册响应无法解密，返回原始响应");
            response
        }))
    }
}

/// 上报的硬件信息。所有传感器都声明为不可用。
fn hardware_info(install_guid: &str) -> Value {
    let mut info = json!({
        "availableRamSize": 4_983_533_568_i64,
        "availableRomSize": 48_114_719,
        "availableSDSize": 48_114_717,
        "basebandVer": "",
        "batteryLevel": 100,
        "batteryStatus": 3,
        "brand": "Redmi",
        "buildSerial": "unknown",
        "device": "marble",
        "imei": install_guid,
        "imsi": "",
        "manufacturer": "Xiaomi",
        "uuid": install_guid,
    });
    if let Some(map) = info.as_object_mut() {
        for sensor in SENSORS {
            map.insert(sensor.to_string(), Value::Bool(false));
            map.insert(format!("{sensor}Value"), Value::String(String::new()));
        }
    }
    info
}
