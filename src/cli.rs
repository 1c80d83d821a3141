// cli.rs — 命令行接口定义模块
// 使用 clap 的 derive 模式定义运行参数和子命令
// 运行参数与子命令互斥：不带子命令即执行「抓取 → 下载 → 设置壁纸」主流程

use clap::{ArgAction, Args, Parser, Subcommand}; // derive 模式所需的 trait 和类型
use clap_complete::Shell; // Shell 枚举：Bash, Zsh, Fish, Elvish, PowerShell

use crate::config::{SortMode, TimeFilter};

/// Reddit 壁纸工具
///
/// 从指定 subreddit 挑选一张图片帖子，下载后设置为系统壁纸。
#[derive(Parser)]
#[command(name = "reddwall")]
#[command(version)] // 自动从 Cargo.toml 读取 version 字段
#[command(author)] // 自动从 Cargo.toml 读取 authors 字段（如有）
#[command(about = "Reddit 壁纸工具 — 从 subreddit 抓取图片帖子并设置为桌面壁纸")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// 主流程参数
///
/// 所有参数都是可选的：缺省时依次回落到配置文件和内置默认值。
/// 布尔开关用 Option<bool> 区分「未提供」和「显式开启」。
#[derive(Args, Default)]
pub struct RunArgs {
    /// subreddit 名称（如 wallpaper, earthporn, art）
    #[arg(short, long)]
    pub subreddit: Option<String>,

    /// top 排序的时间窗口 (hour/day/week/month/year/all)
    #[arg(short, long, value_enum)]
    pub time: Option<TimeFilter>,

    /// 允许成人内容帖子
    #[arg(short, long, num_args = 0, default_missing_value = "true", action = ArgAction::Set)]
    pub nsfw: Option<bool>,

    /// macOS 桌面编号 (0 表示所有桌面，1 表示主桌面，以此类推)
    #[arg(short, long)]
    pub display: Option<u32>,

    /// 壁纸保存目录，相对路径则相对于主目录
    #[arg(short, long)]
    pub output: Option<String>,

    /// 排序方式 (hot/new/top)
    #[arg(long, value_enum)]
    pub sort: Option<SortMode>,

    /// 单次拉取的帖子数量上限
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// 在已拉取的批次内随机打乱顺序
    #[arg(short, long, num_args = 0, default_missing_value = "true", action = ArgAction::Set)]
    pub random: Option<bool>,

    /// flair 过滤关键词，大小写不敏感的子串匹配
    #[arg(short, long)]
    pub flair: Option<String>,

    /// Reddit API client ID
    #[arg(long)]
    pub client_id: Option<String>,

    /// Reddit API client secret (api key)
    #[arg(long)]
    pub api_key: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 生成 shell 补全脚本（支持 bash, zsh, fish, elvish, powershell）
    ///
    /// 用法示例：
    ///   reddwall completions zsh > ~/.zsh/completions/_reddwall
    ///   reddwall completions fish > ~/.config/fish/completions/reddwall.fish
    Completions {
        /// 目标 shell 类型
        shell: Shell,
    },

    /// 配置管理操作
    ///
    /// 用法示例:
    ///   reddwall config show
    ///   reddwall config dump
    ///   reddwall config set subreddit earthporn
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// 配置管理操作
#[derive(Subcommand)]
pub enum ConfigAction {
    /// 查看当前生效的配置简报
    Show,
    /// 生成配置文件对应的 JSON Schema
    Schema,
    /// 以 TOML 格式打印当前配置文件内容
    Dump,
    /// 设置配置项的值并写回配置文件
    Set {
        /// 要设置的键 (subreddit, nsfw, time, display, output, sort, limit, random, flair)
        key: String,
        /// 要设置的值
        value: String,
    },
}
