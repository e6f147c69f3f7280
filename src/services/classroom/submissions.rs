use crate::errors::Result;
use crate::google::ClassroomApi;
use crate::models::classroom::entities::{CourseWork, StudentSubmission};
use crate::services::context::map_bounded;

/// 单个作业的全部提交
pub struct WorkSubmissions<'a> {
    pub work: &'a CourseWork,
    pub work_id: &'a str,
    pub result: Result<Vec<StudentSubmission>>,
}

impl WorkSubmissions<'_> {
    /// 某个学生在该作业上的第一条提交
    pub fn for_user(&self, user_id: &str) -> Option<&StudentSubmission> {
        self.result
            .as_ref()
            .ok()?
            .iter()
            .find(|s| s.user_id.as_deref() == Some(user_id))
    }
}

/// 按作业拉取提交，每个作业只请求一次；没有 ID 的作业跳过
pub async fn submissions_by_work<'a>(
    api: &dyn ClassroomApi,
    course_id: &str,
    works: &'a [CourseWork],
    max_concurrency: usize,
) -> Vec<WorkSubmissions<'a>> {
    let with_ids: Vec<(&CourseWork, &str)> = works
        .iter()
        .filter_map(|w| Some((w, w.id.as_deref()?)))
        .collect();

    map_bounded(with_ids, max_concurrency, |(work, work_id)| async move {
        WorkSubmissions {
            work,
            work_id,
            result: api.list_submissions(course_id, work_id, None).await,
        }
    })
    .await
}
