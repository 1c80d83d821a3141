// download.rs — 图片下载模块
// 单次 GET，不跟随重定向：失效的 Imgur 链接会重定向到占位图，
// 跟过去会把占位图当壁纸存下来，所以重定向一律按失败处理。

use rust_i18n::t;
use std::path::Path;
use std::time::Duration;
use tokio::fs; // tokio 提供的异步文件操作
use tokio::fs::File;
use tokio::io::AsyncWriteExt; // 异步写入 trait，提供 write_all() 等方法

/// 单次 GET 的超时上限
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// 下载图片到指定路径
///
/// 目标文件已存在时完全跳过网络调用，直接复用（内容不做重新校验）。
/// 返回 true 表示本次真的下载了，false 表示复用了已有文件。
///
/// 新下载时按需创建父目录，响应体按块流式写盘。
pub async fn fetch_image(url: &str, dest: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    if dest.exists() {
        return Ok(false);
    }

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(FETCH_TIMEOUT)
        .build()?;

    let mut response = client.get(url).send().await?;

    let status = response.status();
    if status.is_redirection() {
        return Err(t!("error_download_redirect", url => url).into());
    }
    if !status.is_success() {
        return Err(t!("error_download_status", status => status).into());
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = File::create(dest).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(true)
}
