use serde::Serialize;
use ts_rs::TS;

use super::entities::SessionUser;

/// GET /api/auth/session
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct SessionResponse {
    pub user: SessionUser,
    pub expires: chrono::DateTime<chrono::Utc>,
}

/// POST /api/auth/signout
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct SignOutResponse {
    pub url: String,
}
