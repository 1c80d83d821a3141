// source/mod.rs — 内容源抽象接口模块
// 定义了所有帖子来源（目前只有 Reddit）必须实现的通用 Trait

pub mod reddit;

use async_trait::async_trait; // 异步 Trait 支持宏

use crate::config::{SortMode, TimeFilter};

/// 统一的帖子元数据结构
/// 不论来自哪个内容源，都转换成这个结构体供筛选逻辑使用
#[derive(Debug, Clone)]
pub struct Submission {
    /// 帖子在原站的 ID
    pub id: String,
    /// 所属 subreddit 的展示名
    pub subreddit: String,
    /// 帖子指向的原始 URL（未经分类和改写）
    pub url: String,
    /// 成人内容标记
    pub over_18: bool,
    /// flair 文本，未设置则为 None
    pub flair_text: Option<String>,
}

/// listing 查询参数结构体
pub struct ListingQuery<'a> {
    pub subreddit: &'a str,
    pub sort: SortMode,
    /// 只在 sort 为 top 时生效
    pub time: TimeFilter,
    pub limit: u32,
}

/// 内容源的抽象 Trait
///
/// # 异步 Trait 说明
/// Rust 原生目前对 Trait 中的 async fn 支持有限，
/// 这里使用 `async_trait` 宏来支持异步接口。
#[async_trait]
pub trait SubmissionSource {
    /// 按 sort/time/limit 拉取一批帖子
    /// 返回统一的 Submission 列表，顺序与 API 返回一致
    async fn listing(
        &self,
        query: ListingQuery<'_>,
    ) -> Result<Vec<Submission>, Box<dyn std::error::Error>>;
}
