// credentials.rs — Reddit API 凭据解析模块
// 逐字段取第一个命中的来源：命令行参数 > 环境变量 > credentials.json
// 两个字段凑不齐就致命报错，绝不带着残缺凭据发起网络调用

use rust_i18n::t;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::cli::RunArgs;
use crate::config;

/// Reddit API 凭据对
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub api_key: String,
}

/// 映射 credentials.json 的结构体，字段都可缺失
#[derive(Debug, Default, Deserialize)]
struct CredentialsFile {
    client_id: Option<String>,
    api_key: Option<String>,
}

impl Credentials {
    /// 解析本次运行的凭据
    pub fn resolve(args: &RunArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let path = config::credentials_file_path()?;
        Self::resolve_from(
            args.client_id.clone(),
            args.api_key.clone(),
            env::var("REDDIT_CLIENT_ID").ok(),
            env::var("REDDIT_API_KEY").ok(),
            &path,
        )
    }

    /// 实际的合并逻辑，输入全部显式传入，便于测试
    ///
    /// 凭据文件只在前两层没凑齐时才会去读；
    /// 文件缺失或 JSON 无法解析按「没有该来源」处理，不报错。
    fn resolve_from(
        flag_id: Option<String>,
        flag_key: Option<String>,
        env_id: Option<String>,
        env_key: Option<String>,
        file_path: &Path,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut client_id = flag_id.or(env_id);
        let mut api_key = flag_key.or(env_key);

        if client_id.is_none() || api_key.is_none() {
            let file = Self::load_file(file_path);
            client_id = client_id.or(file.client_id);
            api_key = api_key.or(file.api_key);
        }

        match (client_id, api_key) {
            (Some(client_id), Some(api_key)) => Ok(Self { client_id, api_key }),
            _ => Err(t!("error_no_credentials").into()),
        }
    }

    fn load_file(path: &Path) -> CredentialsFile {
        fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }
}
