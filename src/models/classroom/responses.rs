use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{Announcement, Course, CourseWork, Student, StudentSubmission, UserProfile};

// Google 分页列表响应

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCoursesPage {
    #[serde(default)]
    pub courses: Vec<Course>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCourseWorkPage {
    #[serde(default)]
    pub course_work: Vec<CourseWork>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStudentsPage {
    #[serde(default)]
    pub students: Vec<Student>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSubmissionsPage {
    #[serde(default)]
    pub student_submissions: Vec<StudentSubmission>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAnnouncementsPage {
    #[serde(default)]
    pub announcements: Vec<Announcement>,
    pub next_page_token: Option<String>,
}

/// 统一的分页访问，供 REST 客户端循环读取
pub trait Paginated {
    type Item;
    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

macro_rules! impl_paginated {
    ($page:ty, $item:ty, $field:ident) => {
        impl Paginated for $page {
            type Item = $item;
            fn into_parts(self) -> (Vec<Self::Item>, Option<String>) {
                (self.$field, self.next_page_token.filter(|t| !t.is_empty()))
            }
        }
    };
}

impl_paginated!(ListCoursesPage, Course, courses);
impl_paginated!(ListCourseWorkPage, CourseWork, course_work);
impl_paginated!(ListStudentsPage, Student, students);
impl_paginated!(ListSubmissionsPage, StudentSubmission, student_submissions);
impl_paginated!(ListAnnouncementsPage, Announcement, announcements);

/// GET /api/classroom
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct CoursesResponse {
    pub courses: Vec<Course>,
}

/// GET /api/user
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct RolesResponse {
    pub roles: Vec<String>,
}

/// 当前用户（userProfiles/me）
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl CurrentUser {
    pub fn from_profile(profile: UserProfile) -> Option<Self> {
        Some(Self {
            user_id: profile.id?,
            name: profile.name.and_then(|n| n.full_name),
            email: profile.email_address,
        })
    }
}
