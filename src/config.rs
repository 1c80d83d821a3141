// config.rs — 配置管理模块
// 遵循 Unix 风格：优先从 ~/.config/reddwall/config.toml 读取配置
// 三层合并，后者覆盖前者：内置默认值 → 配置文件 → 命令行参数

use clap::ValueEnum; // 命令行枚举参数 trait，同时用于解析配置文件里的字符串
use rust_i18n::t; // 引入翻译宏
use schemars::JsonSchema; // 引入用于生成 JSON Schema 的 trait
use serde::{Deserialize, Serialize}; // 引入序列化与反序列化 trait
use shellexpand::tilde; // 用于展开 ~ 和环境变量
use std::env; // 环境变量模块
use std::fs; // 文件系统模块
use std::path::{Path, PathBuf}; // 路径处理类型

use crate::cli::RunArgs;

/// 帖子排序方式，对应 Reddit 的三种 listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortMode {
    Hot,
    New,
    Top,
}

impl SortMode {
    /// listing URL 中的路径段（如 /r/wallpaper/top）
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Hot => "hot",
            SortMode::New => "new",
            SortMode::Top => "top",
        }
    }

    /// 解析配置文件里的字符串，大小写不敏感，无效值返回 None
    pub fn from_config(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value, true).ok()
    }
}

/// top 排序的时间窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeFilter {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeFilter {
    /// listing 请求中 t= 参数的取值
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::Hour => "hour",
            TimeFilter::Day => "day",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
            TimeFilter::All => "all",
        }
    }

    pub fn from_config(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value, true).ok()
    }
}

/// 映射 config.toml 文件内容的结构体
///
/// 所有字段都是可选的：缺失的键落到内置默认值。
/// 文件解析是逐键宽容的，单个键类型不对只丢弃该键，绝不让整次运行失败。
#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct FileSettings {
    /// 要抓取的 subreddit 名称
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
    /// 是否允许成人内容帖子
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsfw: Option<bool>,
    /// top 排序的时间窗口 (hour/day/week/month/year/all)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// macOS 上的桌面编号 (0 表示所有桌面)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<u32>,
    /// 壁纸保存目录 (支持 ~、$HOME 等环境变量，相对路径则相对于 $HOME)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// 排序方式 (hot/new/top)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// 单次拉取的帖子数量上限
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// 是否在已拉取的批次内随机打乱顺序
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random: Option<bool>,
    /// flair 过滤关键词（大小写不敏感的子串匹配）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flair: Option<String>,
}

impl FileSettings {
    /// 读取并解析配置文件
    ///
    /// 文件缺失或整体无法解析时返回全默认值；
    /// 能解析时逐键提取，类型不匹配的键静默回落到默认值。
    pub fn load(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|content| content.parse::<toml::Table>().ok())
            .map(|table| Self::from_table(&table))
            .unwrap_or_default()
    }

    /// 逐键提取，未知键被忽略
    fn from_table(table: &toml::Table) -> Self {
        Self {
            subreddit: table
                .get("subreddit")
                .and_then(toml::Value::as_str)
                .map(str::to_owned),
            nsfw: table.get("nsfw").and_then(toml::Value::as_bool),
            time: table
                .get("time")
                .and_then(toml::Value::as_str)
                .map(str::to_owned),
            display: table
                .get("display")
                .and_then(toml::Value::as_integer)
                .and_then(|v| u32::try_from(v).ok()),
            output: table
                .get("output")
                .and_then(toml::Value::as_str)
                .map(str::to_owned),
            sort: table
                .get("sort")
                .and_then(toml::Value::as_str)
                .map(str::to_owned),
            limit: table
                .get("limit")
                .and_then(toml::Value::as_integer)
                .and_then(|v| u32::try_from(v).ok()),
            random: table.get("random").and_then(toml::Value::as_bool),
            flair: table
                .get("flair")
                .and_then(toml::Value::as_str)
                .map(str::to_owned),
        }
    }

    /// 设置单个配置项，封闭集合的键会先校验取值
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        match key {
            "subreddit" => self.subreddit = Some(value.to_string()),
            "nsfw" => self.nsfw = Some(parse_bool(key, value)?),
            "time" => {
                let parsed = TimeFilter::from_config(value)
                    .ok_or(t!("config_error_bad_value", key => key, value => value))?;
                self.time = Some(parsed.as_str().to_string());
            }
            "display" => {
                let parsed: u32 = value
                    .parse()
                    .map_err(|_| t!("config_error_bad_value", key => key, value => value))?;
                self.display = Some(parsed);
            }
            "output" => self.output = Some(value.to_string()),
            "sort" => {
                let parsed = SortMode::from_config(value)
                    .ok_or(t!("config_error_bad_value", key => key, value => value))?;
                self.sort = Some(parsed.as_str().to_string());
            }
            "limit" => {
                let parsed: u32 = value
                    .parse()
                    .map_err(|_| t!("config_error_bad_value", key => key, value => value))?;
                self.limit = Some(parsed);
            }
            "random" => self.random = Some(parse_bool(key, value)?),
            "flair" => self.flair = Some(value.to_string()),
            _ => return Err(t!("config_error_unknown_key", key => key).into()),
        }
        Ok(())
    }

    /// 将配置保存回文件
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml())?;
        Ok(())
    }

    /// 将当前配置转换为 TOML 字符串
    ///
    /// toml 库不支持带注释序列化，头部注释手动拼接
    pub fn to_toml(&self) -> String {
        let body = toml::to_string_pretty(self).unwrap_or_default();
        format!(
            "# reddwall config\n# keys: subreddit, nsfw, time, display, output, sort, limit, random, flair\n{body}"
        )
    }

    /// 获取配置文件的 JSON Schema
    pub fn schema() -> String {
        let schema = schemars::schema_for!(FileSettings);
        serde_json::to_string_pretty(&schema).unwrap()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, Box<dyn std::error::Error>> {
    value
        .parse()
        .map_err(|_| t!("config_error_bad_value", key => key, value => value).into())
}

/// 本次运行生效的完整选项，合并完成后只读
#[derive(Debug, Clone)]
pub struct Options {
    pub subreddit: String,
    pub nsfw: bool,
    pub time: TimeFilter,
    pub display: u32,
    pub output: String,
    pub sort: SortMode,
    pub limit: u32,
    pub random: bool,
    pub flair: Option<String>,
}

impl Options {
    /// 合并三层配置：命令行参数 > 配置文件 > 内置默认值
    ///
    /// 配置文件里 sort/time 的无效拼写回落到默认值，与缺失同样处理
    pub fn resolve(args: &RunArgs, file: &FileSettings) -> Self {
        Self {
            subreddit: args
                .subreddit
                .clone()
                .or_else(|| file.subreddit.clone())
                .unwrap_or_else(|| "wallpaper".to_string()),
            nsfw: args.nsfw.or(file.nsfw).unwrap_or(false),
            time: args
                .time
                .or_else(|| file.time.as_deref().and_then(TimeFilter::from_config))
                .unwrap_or(TimeFilter::All),
            display: args.display.or(file.display).unwrap_or(0),
            output: args
                .output
                .clone()
                .or_else(|| file.output.clone())
                .unwrap_or_else(|| "Pictures/Wallpapers".to_string()),
            sort: args
                .sort
                .or_else(|| file.sort.as_deref().and_then(SortMode::from_config))
                .unwrap_or(SortMode::Hot),
            limit: args.limit.or(file.limit).unwrap_or(20),
            random: args.random.or(file.random).unwrap_or(false),
            flair: args.flair.clone().or_else(|| file.flair.clone()),
        }
    }

    /// 选中帖子的保存路径：<输出目录>/<subreddit>-<帖子 id>.<扩展名>
    ///
    /// 路径由 (subreddit, id, ext) 完全确定，重复运行得到同一路径
    pub fn save_location(
        &self,
        post_id: &str,
        ext: &str,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(self.save_location_in(&home_dir()?, post_id, ext))
    }

    fn save_location_in(&self, home: &Path, post_id: &str, ext: &str) -> PathBuf {
        self.output_dir(home)
            .join(format!("{}-{}.{}", self.subreddit, post_id, ext))
    }

    /// 输出目录：展开 ~ 和环境变量，相对路径则相对于 $HOME
    fn output_dir(&self, home: &Path) -> PathBuf {
        let expanded = PathBuf::from(tilde(&self.output).into_owned());
        if expanded.is_absolute() {
            expanded
        } else {
            home.join(expanded)
        }
    }
}

/// 用户主目录，Windows 上回落到 USERPROFILE
pub fn home_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .map_err(|_| t!("error_home").into())
}

/// 配置文件路径：~/.config/reddwall/config.toml
pub fn config_file_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    Ok(config_dir()?.join("config.toml"))
}

/// 凭据文件路径：~/.config/reddwall/credentials.json
pub fn credentials_file_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    Ok(config_dir()?.join("credentials.json"))
}

fn config_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    Ok(home_dir()?.join(".config").join("reddwall"))
}
