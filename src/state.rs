use std::path::PathBuf;

use sea_orm::DatabaseConnection;

use crate::services::aggregation::AggregationService;
use crate::services::avatar::AvatarService;
use crate::services::faculty::FacultyService;
use crate::services::student::StudentService;

/// Services shared by every handler, wired once at start-up.
#[derive(Clone)]
pub struct AppState {
    pub students: StudentService,
    pub faculties: FacultyService,
    pub avatars: AvatarService,
    pub aggregation: AggregationService,
}

impl AppState {
    pub fn new(db: DatabaseConnection, avatars_dir: PathBuf) -> Self {
        Self {
            students: StudentService::new(db.clone()),
            faculties: FacultyService::new(db.clone()),
            avatars: AvatarService::new(db.clone(), avatars_dir),
            aggregation: AggregationService::new(db),
        }
    }
}
