use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::future::try_join_all;

use super::NotificationService;
use crate::errors::{DashboardError, Result};
use crate::google::ClassroomApi;
use crate::models::notifications::responses::{NotificationItem, NotificationListResponse};
use crate::services::classroom::active_courses;
use crate::services::context::{failure_response, require_google_session};
use crate::utils::dates::parse_timestamp;

const DEFAULT_COURSE_NAME: &str = "Curso";

pub async fn list_notifications(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = match require_google_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let api = service.get_google(request).classroom(&session.access_token);

    match course_announcements(api.as_ref()).await {
        Ok(announcements) => Ok(HttpResponse::Ok().json(NotificationListResponse { announcements })),
        Err(e) => Ok(failure_response("/api/notifications", &e, false)),
    }
}

/// 所有进行中课程的公告，最新的在前
pub async fn course_announcements(api: &dyn ClassroomApi) -> Result<Vec<NotificationItem>> {
    let courses = active_courses(api).await?;

    let per_course = try_join_all(courses.iter().filter_map(|course| {
        let course_id = course.id.as_deref()?;
        let course_name = course.name.as_deref().unwrap_or(DEFAULT_COURSE_NAME);
        Some(async move {
            let announcements = api.list_announcements(course_id).await?;
            Ok::<_, DashboardError>(
                announcements
                    .into_iter()
                    .map(|a| NotificationItem {
                        id: a.id,
                        course_id: course_id.to_string(),
                        course_name: course_name.to_string(),
                        text: a.text.unwrap_or_default(),
                        alternate_link: a.alternate_link,
                        state: a.state,
                        creation_time: a.creation_time,
                        update_time: a.update_time,
                    })
                    .collect::<Vec<_>>(),
            )
        })
    }))
    .await?;

    let mut items: Vec<NotificationItem> = per_course.into_iter().flatten().collect();
    // 没有时间的排在最后
    items.sort_by_key(|item| {
        std::cmp::Reverse(
            item.creation_time
                .as_deref()
                .and_then(parse_timestamp)
                .map(|t| t.timestamp_millis())
                .unwrap_or(0),
        )
    });
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::fake::{FakeClassroom, course};
    use crate::models::classroom::entities::{Announcement, Course};

    fn announcement(id: &str, course_id: &str, created: Option<&str>) -> Announcement {
        Announcement {
            id: Some(id.into()),
            course_id: course_id.into(),
            text: Some(format!("Aviso {id}")),
            creation_time: created.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_announcements_sorted_newest_first() {
        let api = FakeClassroom::new()
            .enrolled(course("c1", "Historia"))
            .enrolled(Course {
                id: Some("c2".into()),
                ..Default::default()
            })
            .announcement(announcement("a1", "c1", Some("2025-03-01T10:00:00Z")))
            .announcement(announcement("a2", "c1", None))
            .announcement(announcement("a3", "c2", Some("2025-03-05T10:00:00Z")));

        let items = course_announcements(&api).await.unwrap();
        let ids: Vec<_> = items.iter().filter_map(|i| i.id.as_deref()).collect();
        assert_eq!(ids, vec!["a3", "a1", "a2"]);
        assert_eq!(items[0].course_name, DEFAULT_COURSE_NAME);
        assert_eq!(items[1].course_name, "Historia");
        assert_eq!(items[1].text, "Aviso a1");
    }

    #[tokio::test]
    async fn test_course_failure_fails_request() {
        let api = FakeClassroom::new()
            .enrolled(course("c1", "Historia"))
            .failing("c1");
        assert!(course_announcements(&api).await.is_err());
    }
}
