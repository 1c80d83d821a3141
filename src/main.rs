// main.rs — 程序入口
// 负责初始化异步运行时、解析命令行参数、串起一次线性运行：
// 读配置 → 解析参数 → 解析凭据 → 选帖子 → 下载 → 设置壁纸

mod cli; // 声明 cli 模块，对应 src/cli.rs
mod config; // 声明 config 模块，对应 src/config.rs
mod credentials; // 声明 credentials 模块，对应 src/credentials.rs
mod download;
mod select;
mod setter;
mod source;

// 初始化多语言支持，嵌入 locales 目录下的所有翻译
rust_i18n::i18n!("locales");

use clap::{CommandFactory, Parser}; // 引入 Parser trait 的 parse() 方法; CommandFactory 用于生成补全脚本
use clap_complete::generate; // 引入补全脚本生成函数
use rust_i18n::t; // 引入翻译宏

use cli::{Cli, Commands, ConfigAction, RunArgs};
use config::{FileSettings, Options};
use credentials::Credentials;
use source::reddit::RedditClient;
use source::{ListingQuery, SubmissionSource};

/// `#[tokio::main]` 宏将 async main 转换为同步 main + tokio 运行时
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 自动检测系统语言并设置
    let locale = std::env::var("LANG").unwrap_or_else(|_| "en".to_string());
    if locale.starts_with("zh") {
        rust_i18n::set_locale("zh-CN");
    } else {
        rust_i18n::set_locale("en");
    }

    // 解析命令行参数
    let cli = Cli::parse();

    // 根据子命令分发；不带子命令即执行主流程
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(
                *shell,
                &mut Cli::command(),
                "reddwall",
                &mut std::io::stdout(),
            );
            Ok(())
        }

        Some(Commands::Config { action }) => handle_config(action),

        None => handle_run(&cli.run).await,
    }
}

/// 主流程：严格线性，每一步失败都终止本次运行
async fn handle_run(args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = FileSettings::load(&config::config_file_path()?);
    let options = Options::resolve(args, &settings);

    // 凭据凑不齐就在任何网络调用之前退出
    let credentials = Credentials::resolve(args)?;

    println!("{}", t!("fetch_start", subreddit => options.subreddit));

    let user_agent = format!(
        "reddwall/{} (get wallpaper from /r/{})",
        env!("CARGO_PKG_VERSION"),
        options.subreddit
    );
    let client = RedditClient::connect(&credentials, &user_agent).await?;

    let submissions = client
        .listing(ListingQuery {
            subreddit: &options.subreddit,
            sort: options.sort,
            time: options.time,
            limit: options.limit,
        })
        .await?;
    println!("{}", t!("fetch_count", count => submissions.len()));

    let candidate = select::pick(submissions, &options).ok_or(t!("error_no_candidate"))?;
    println!(
        "{}",
        t!("candidate_info", id => candidate.id, subreddit => candidate.subreddit, url => candidate.url)
    );

    let save_location = options.save_location(&candidate.id, &candidate.ext)?;
    if download::fetch_image(&candidate.url, &save_location).await? {
        println!("{}", t!("download_done", path => save_location.display()));
    } else {
        println!("{}", t!("download_skip", path => save_location.display()));
    }

    println!("{}", t!("setting_wallpaper"));
    setter::apply(&save_location, options.display)?;
    println!("{}", t!("set_done"));

    Ok(())
}

/// 处理 config 子命令：查看或修改配置
fn handle_config(action: &ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let path = config::config_file_path()?;
    let mut settings = FileSettings::load(&path);

    match action {
        ConfigAction::Show => {
            // 展示合并默认值之后实际生效的配置
            let options = Options::resolve(&RunArgs::default(), &settings);
            println!("{}", t!("config_title"));
            println!("{}", t!("config_path", path => path.display()));
            println!("{}", t!("config_subreddit", value => options.subreddit));
            println!("{}", t!("config_sort", value => options.sort.as_str()));
            println!("{}", t!("config_time", value => options.time.as_str()));
            println!("{}", t!("config_limit", value => options.limit));
            println!("{}", t!("config_output", value => options.output));
            println!("{}", t!("config_nsfw", value => options.nsfw));
            println!("{}", t!("config_random", value => options.random));
            println!(
                "{}",
                t!("config_flair", value => options.flair.as_deref().unwrap_or("None"))
            );
            println!("{}", t!("config_display", value => options.display));
        }
        ConfigAction::Schema => {
            println!("{}", FileSettings::schema());
        }
        ConfigAction::Dump => {
            println!("{}", settings.to_toml());
        }
        ConfigAction::Set { key, value } => {
            settings.set(key, value)?;
            settings.save(&path)?;
            println!("{}", t!("config_updated", key => key, value => value));
        }
    }
    Ok(())
}
