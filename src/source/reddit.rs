// reddit.rs — Reddit API 异步客户端模块
// 负责与 Reddit API 交互：application-only OAuth 认证和拉取 subreddit listing

use async_trait::async_trait;
use rust_i18n::t;
use serde::Deserialize; // 反序列化 trait，用于将 JSON 转为 Rust 结构体

use super::{ListingQuery, Submission, SubmissionSource};
use crate::config::SortMode;
use crate::credentials::Credentials;

/// Reddit API 异步客户端
///
/// 封装了 reqwest::Client 和 OAuth token，token 在整次运行内有效。
///
/// # Rust 特性说明
/// - `reqwest::Client` 内部维护连接池，应该复用而非每次请求都创建新的
pub struct RedditClient {
    /// HTTP 客户端（内部有连接池，应复用）
    client: reqwest::Client,

    /// application-only OAuth 的 bearer token
    token: String,
}

/// token 接口响应，只提取需要的字段
#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
}

/// Reddit listing 响应的外层信封
///
/// Reddit 的 JSON 把所有对象包在 {kind, data} 里，
/// listing 的 data.children 是帖子数组，每个元素又是一层 {kind, data}。
/// 多余的字段会被 serde 自动忽略。
#[derive(Deserialize, Debug)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize, Debug)]
struct ListingData {
    children: Vec<Thing>,
}

#[derive(Deserialize, Debug)]
struct Thing {
    data: RawSubmission,
}

/// 单条帖子的数据结构，只提取筛选所需的字段
#[derive(Deserialize, Debug)]
struct RawSubmission {
    /// 帖子唯一标识符（如 "abc123"）
    id: String,

    /// 所属 subreddit 的展示名
    subreddit: String,

    /// 帖子指向的 URL
    url: String,

    /// 成人内容标记，个别对象缺失该字段时按 false 处理
    #[serde(default)]
    over_18: bool,

    /// flair 文本，可能为 null 或缺失
    #[serde(default)]
    link_flair_text: Option<String>,
}

impl RedditClient {
    /// 认证并创建客户端
    ///
    /// 使用 application-only OAuth：client_id/api_key 做 HTTP basic auth，
    /// grant_type=client_credentials 换取 bearer token。
    /// 认证失败（网络错误、非 2xx 状态、响应不可解析）都是致命错误，带原因上报。
    pub async fn connect(
        credentials: &Credentials,
        user_agent: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;

        let response = client
            .post("https://www.reddit.com/api/v1/access_token")
            .basic_auth(&credentials.client_id, Some(&credentials.api_key))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(t!("error_auth_status", status => status).into());
        }

        let token: TokenResponse = response.json().await?;

        Ok(Self {
            client,
            token: token.access_token,
        })
    }
}

#[async_trait]
impl SubmissionSource for RedditClient {
    async fn listing(
        &self,
        query: ListingQuery<'_>,
    ) -> Result<Vec<Submission>, Box<dyn std::error::Error>> {
        let url = format!(
            "https://oauth.reddit.com/r/{}/{}",
            query.subreddit,
            query.sort.as_str()
        );

        let params = listing_params(&query);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(t!("error_listing_status", status => status).into());
        }

        let listing: Listing = response.json().await?;

        let submissions = listing
            .data
            .children
            .into_iter()
            .map(|thing| Submission {
                id: thing.data.id,
                subreddit: thing.data.subreddit,
                url: thing.data.url,
                over_18: thing.data.over_18,
                flair_text: thing.data.link_flair_text,
            })
            .collect();

        Ok(submissions)
    }
}

/// 组装 listing 请求的查询参数，时间窗口只对 top 排序有意义
fn listing_params(query: &ListingQuery<'_>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("limit", query.limit.to_string()),
        ("raw_json", "1".to_string()),
    ];
    if query.sort == SortMode::Top {
        params.push(("t", query.time.as_str().to_string()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeFilter;

    #[test]
    fn top_sort_carries_time_and_limit() {
        let query = ListingQuery {
            subreddit: "wallpaper",
            sort: SortMode::Top,
            time: TimeFilter::Week,
            limit: 5,
        };
        let params = listing_params(&query);
        assert!(params.contains(&("limit", "5".to_string())));
        assert!(params.contains(&("t", "week".to_string())));
    }

    #[test]
    fn hot_and_new_sorts_omit_the_time_window() {
        for sort in [SortMode::Hot, SortMode::New] {
            let query = ListingQuery {
                subreddit: "wallpaper",
                sort,
                time: TimeFilter::Week,
                limit: 20,
            };
            let params = listing_params(&query);
            assert!(!params.iter().any(|(key, _)| *key == "t"));
        }
    }

    #[test]
    fn listing_envelope_deserializes() {
        let payload = r#"{
            "kind": "Listing",
            "data": {
                "children": [
                    {
                        "kind": "t3",
                        "data": {
                            "id": "abc",
                            "subreddit": "wallpaper",
                            "url": "https://example.com/pic.jpg",
                            "over_18": true,
                            "link_flair_text": "Desktop"
                        }
                    },
                    {
                        "kind": "t3",
                        "data": {
                            "id": "def",
                            "subreddit": "wallpaper",
                            "url": "https://example.com/other.png",
                            "link_flair_text": null
                        }
                    }
                ]
            }
        }"#;

        let listing: Listing = serde_json::from_str(payload).expect("valid listing");
        assert_eq!(listing.data.children.len(), 2);

        let first = &listing.data.children[0].data;
        assert_eq!(first.id, "abc");
        assert!(first.over_18);
        assert_eq!(first.link_flair_text.as_deref(), Some("Desktop"));

        // over_18 缺失按 false 处理，flair 为 null 解析为 None
        let second = &listing.data.children[1].data;
        assert!(!second.over_18);
        assert_eq!(second.link_flair_text, None);
    }
}
