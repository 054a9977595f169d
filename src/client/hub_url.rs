// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 学习平台课程内容页的基础地址
pub const HUB_CONTENT_BASE: &str = "https://learn.bcit.ca/d2l/le/content/";

/// 基础地址之后允许的路径段数量
const VALID_PATH_LENGTHS: [usize; 2] = [3, 4];

/// 课程 ID 与资源 ID 在完整路径中的位置
const COURSE_SEGMENT: usize = 3;
const RESOURCE_SEGMENT: usize = 5;

/// 从内容页地址解析出的标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIds {
    pub course_id: String,
    pub resource_id: String,
}

/// 判断地址是否为课程内容页
///
/// 必须以 `base` 开头，且其后有 3 或 4 个非空路径段
pub fn matches_content_page(url: &str, base: &str) -> bool {
    let Some(rest) = url.strip_prefix(base) else {
        return false;
    };
    let path = rest.split(['?', '#']).next().unwrap_or_default();
    let segments = path
        .trim_end_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .count();
    VALID_PATH_LENGTHS.contains(&segments)
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

/// 解析 `.../content/<courseId>/<...>/<resourceId>/...` 中的标识
///
/// 两个标识都必须是纯数字
pub fn extract_ids(url: &str) -> Option<ResourceIds> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.filter(|s| !s.is_empty()).collect();

    let course_id = *segments.get(COURSE_SEGMENT)?;
    let resource_id = *segments.get(RESOURCE_SEGMENT)?;
    if !is_valid_id(course_id) || !is_valid_id(resource_id) {
        return None;
    }

    Some(ResourceIds {
        course_id: course_id.to_string(),
        resource_id: resource_id.to_string(),
    })
}

/// 构造文件直接下载地址
pub fn build_download_url(base: &str, ids: &ResourceIds) -> String {
    format!(
        "{}/{}/topics/files/download/{}/DirectFileTopicDownload",
        base.trim_end_matches('/'),
        ids.course_id,
        ids.resource_id
    )
}

/// 下载入口元素的 id
pub fn download_affordance_id(ids: &ResourceIds) -> String {
    format!("d2l-file-download-{}-{}", ids.course_id, ids.resource_id)
}
