// select.rs — 帖子筛选模块
// 在已拉取的一批帖子上做单趟筛选，返回第一个可用的图片帖子。
// 纯函数实现，不碰网络，便于单独测试。

use rand::seq::SliceRandom; // shuffle 方法所在的 trait
use rand::thread_rng;

use crate::config::Options;
use crate::source::Submission;

/// 通过全部筛选的候选帖子
///
/// 用后即弃，不做任何持久化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub subreddit: String,
    /// 改写后的直链图片 URL
    pub url: String,
    /// 保存文件用的扩展名
    pub ext: String,
}

/// 从一批帖子中挑出第一个可用的图片帖子
///
/// random 开启时先整批打乱再筛选（随机性只覆盖已拉取的 limit 条，
/// 不是整个 subreddit）。逐帖短路：
///   1. NSFW 未开启时跳过成人内容帖子
///   2. 配置了 flair 过滤时跳过 flair 不匹配的帖子
///   3. URL 无法归类为图片的帖子跳过
/// 整批筛完没有幸存者就返回 None，调用方视为终态失败，不重试。
pub fn pick(mut submissions: Vec<Submission>, options: &Options) -> Option<Candidate> {
    if options.random {
        submissions.shuffle(&mut thread_rng());
    }

    submissions.into_iter().find_map(|submission| {
        if submission.over_18 && !options.nsfw {
            return None;
        }
        if let Some(filter) = options.flair.as_deref() {
            if !flair_matches(filter, submission.flair_text.as_deref()) {
                return None;
            }
        }
        let (url, ext) = classify_url(&submission.url)?;
        Some(Candidate {
            id: submission.id,
            subreddit: submission.subreddit,
            url,
            ext,
        })
    })
}

/// flair 过滤：大小写不敏感的子串匹配，帖子没有 flair 视为不匹配
fn flair_matches(filter: &str, flair_text: Option<&str>) -> bool {
    match flair_text {
        Some(text) => text.to_lowercase().contains(&filter.to_lowercase()),
        None => false,
    }
}

/// 将帖子 URL 归类为可下载的直链图片
///
/// 返回 (直链 URL, 扩展名)，无法归类返回 None。
/// 查询参数一律先剥掉。Imgur 判断在直链扩展名判断之前，
/// 这样 imgur.com/abc123.png 也会被改写成 i.imgur.com/abc123.jpg 直链。
fn classify_url(raw: &str) -> Option<(String, String)> {
    let url = raw.split('?').next().unwrap_or(raw);

    // Imgur 页面链接改写成直链，相册 /a/ 和 /gallery/ 没有单图直链，跳过
    if url.contains("imgur.com") && !url.contains("/a/") && !url.contains("/gallery/") {
        let trimmed = url.strip_suffix("/new").unwrap_or(url);
        let segment = trimmed.rsplit('/').next()?;
        // 去掉末尾扩展名，留下 Imgur 的图片 id
        let id = segment
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(segment);
        if id.is_empty() {
            return None;
        }
        return Some((format!("http://i.imgur.com/{id}.jpg"), "jpg".to_string()));
    }

    for ext in ["jpg", "png", "jpeg"] {
        if url.ends_with(&format!(".{ext}")) {
            return Some((url.to_string(), ext.to_string()));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RunArgs;
    use crate::config::FileSettings;

    fn options() -> Options {
        Options::resolve(&RunArgs::default(), &FileSettings::default())
    }

    fn submission(id: &str, url: &str) -> Submission {
        Submission {
            id: id.to_string(),
            subreddit: "wallpaper".to_string(),
            url: url.to_string(),
            over_18: false,
            flair_text: None,
        }
    }

    #[test]
    fn direct_image_extensions_pass_through() {
        assert_eq!(
            classify_url("https://example.com/pic.jpg"),
            Some(("https://example.com/pic.jpg".to_string(), "jpg".to_string()))
        );
        assert_eq!(
            classify_url("https://example.com/pic.png?width=800"),
            Some(("https://example.com/pic.png".to_string(), "png".to_string()))
        );
        assert_eq!(
            classify_url("https://example.com/pic.jpeg"),
            Some(("https://example.com/pic.jpeg".to_string(), "jpeg".to_string()))
        );
    }

    #[test]
    fn imgur_page_links_are_rewritten() {
        assert_eq!(
            classify_url("https://imgur.com/abc123.png?x=1"),
            Some(("http://i.imgur.com/abc123.jpg".to_string(), "jpg".to_string()))
        );
        assert_eq!(
            classify_url("https://imgur.com/abc123"),
            Some(("http://i.imgur.com/abc123.jpg".to_string(), "jpg".to_string()))
        );
        // 末尾的 /new 段被剥掉
        assert_eq!(
            classify_url("https://imgur.com/abc123/new"),
            Some(("http://i.imgur.com/abc123.jpg".to_string(), "jpg".to_string()))
        );
    }

    #[test]
    fn imgur_albums_and_galleries_are_skipped() {
        assert_eq!(classify_url("https://imgur.com/a/abc123"), None);
        assert_eq!(classify_url("https://imgur.com/gallery/abc123"), None);
    }

    #[test]
    fn non_image_urls_are_skipped() {
        assert_eq!(classify_url("https://example.com/article"), None);
        assert_eq!(classify_url("https://v.redd.it/xyz"), None);
    }

    #[test]
    fn nsfw_posts_are_never_selected_when_disabled() {
        let mut adult = submission("bad", "https://example.com/a.jpg");
        adult.over_18 = true;
        let safe = submission("ok", "https://example.com/b.jpg");

        let picked = pick(vec![adult.clone(), safe], &options()).expect("candidate");
        assert_eq!(picked.id, "ok");

        // 批次里只有成人内容时一无所获
        assert_eq!(pick(vec![adult], &options()), None);
    }

    #[test]
    fn nsfw_posts_pass_when_enabled() {
        let mut adult = submission("bad", "https://example.com/a.jpg");
        adult.over_18 = true;
        let mut opts = options();
        opts.nsfw = true;
        assert_eq!(pick(vec![adult], &opts).expect("candidate").id, "bad");
    }

    #[test]
    fn flair_filter_is_case_insensitive_substring() {
        let mut opts = options();
        opts.flair = Some("Desktop".to_string());

        let mut matching = submission("yes", "https://example.com/a.jpg");
        matching.flair_text = Some("4k Desktop Wallpaper".to_string());
        let mut wrong = submission("no", "https://example.com/b.jpg");
        wrong.flair_text = Some("Mobile".to_string());
        let unflaired = submission("none", "https://example.com/c.jpg");

        let picked = pick(vec![wrong, unflaired, matching], &opts).expect("candidate");
        assert_eq!(picked.id, "yes");
    }

    #[test]
    fn first_survivor_wins_in_api_order() {
        let batch = vec![
            submission("skip", "https://example.com/page.html"),
            submission("first", "https://example.com/a.jpg"),
            submission("second", "https://example.com/b.jpg"),
        ];
        assert_eq!(pick(batch, &options()).expect("candidate").id, "first");
    }

    #[test]
    fn exhausted_batch_yields_none() {
        let batch = vec![
            submission("a", "https://example.com/page.html"),
            submission("b", "https://imgur.com/a/album"),
        ];
        assert_eq!(pick(batch, &options()), None);
    }

    #[test]
    fn random_still_selects_from_singleton_batch() {
        let mut opts = options();
        opts.random = true;
        let batch = vec![submission("only", "https://example.com/a.jpg")];
        assert_eq!(pick(batch, &opts).expect("candidate").id, "only");
    }
}
