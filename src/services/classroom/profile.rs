use tracing::warn;

use crate::cache::{CacheResult, ObjectCache};
use crate::google::ClassroomApi;

fn cache_key(viewer: &str, user_id: &str) -> String {
    format!("profile:{viewer}:{user_id}")
}

/// 查询用户邮箱，结果按查看者缓存
///
/// 查询失败按未知处理，不影响整个请求
pub async fn lookup_email(
    api: &dyn ClassroomApi,
    cache: Option<&dyn ObjectCache>,
    viewer: &str,
    user_id: &str,
) -> Option<String> {
    let key = cache_key(viewer, user_id);
    if let Some(cache) = cache
        && let CacheResult::Found(email) = cache.get_raw(&key).await
    {
        return Some(email).filter(|e| !e.is_empty());
    }

    let email = match api.get_user_profile(user_id).await {
        Ok(profile) => profile
            .and_then(|p| p.email_address)
            .filter(|e| !e.is_empty()),
        Err(e) => {
            warn!("Failed to get profile for user {}: {}", user_id, e);
            // 失败不缓存，下次重试
            return None;
        }
    };

    if let Some(cache) = cache {
        cache
            .insert_raw(key, email.clone().unwrap_or_default(), 0)
            .await;
    }
    email
}
