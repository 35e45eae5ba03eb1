use std::path::{Path, PathBuf};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::entities::{avatar, student};
use crate::error::AppError;
use crate::pagination::page_index;

/// Uploaded image as received from the client.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub data: Vec<u8>,
    pub original_filename: Option<String>,
    pub media_type: String,
}

/// Avatar bytes paired with the media type recorded at upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarContent {
    pub data: Vec<u8>,
    pub media_type: String,
}

// Helper to get file extension; a leading dot counts, so `.png` yields `png`
fn get_extension(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Random storage name keeping the uploaded file's extension, if it had one.
fn storage_file_name(original_filename: Option<&str>) -> String {
    let id = Uuid::new_v4();
    match original_filename.and_then(get_extension) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

/// Keeps each student's avatar in the `avatar` table and as a file under `avatars_dir`.
#[derive(Clone)]
pub struct AvatarService {
    db: DatabaseConnection,
    avatars_dir: PathBuf,
}

impl AvatarService {
    pub fn new(db: DatabaseConnection, avatars_dir: PathBuf) -> Self {
        Self { db, avatars_dir }
    }

    pub fn avatars_dir(&self) -> &Path {
        &self.avatars_dir
    }

    /// Stores the image for `student_id`, replacing any previous avatar record.
    ///
    /// The file is written before the record, so a stored record never points at a
    /// missing file. A replaced avatar's old file is left on disk.
    pub async fn upload(
        &self,
        student_id: i32,
        upload: AvatarUpload,
    ) -> Result<avatar::Model, AppError> {
        info!("Avatar | upload | student={}", student_id);

        student::Entity::find_by_id(student_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                warn!("Avatar | no student with id={}", student_id);
                AppError::student_not_found(student_id)
            })?;

        let file_path = self
            .write_file(&upload.data, upload.original_filename.as_deref())
            .await?;
        let saved = self.store_record(student_id, upload, file_path).await?;

        info!(
            "Avatar | stored | student={} | path={} | size={}",
            student_id, saved.file_path, saved.file_size
        );
        Ok(saved)
    }

    pub async fn get_from_store(&self, student_id: i32) -> Result<AvatarContent, AppError> {
        info!("Avatar | read from store | student={}", student_id);

        let avatar = self.find_by_student(student_id).await?;
        Ok(AvatarContent {
            data: avatar.data,
            media_type: avatar.media_type,
        })
    }

    /// Reads the on-disk copy. The media type still comes from the record.
    pub async fn get_from_filesystem(&self, student_id: i32) -> Result<AvatarContent, AppError> {
        info!("Avatar | read from filesystem | student={}", student_id);

        let avatar = self.find_by_student(student_id).await?;
        let data = tokio::fs::read(&avatar.file_path).await.map_err(|e| {
            error!("Avatar | read failed | path={} | {}", avatar.file_path, e);
            AppError::AvatarProcessing(e)
        })?;

        Ok(AvatarContent {
            data,
            media_type: avatar.media_type,
        })
    }

    /// `page_number` is 1-based.
    pub async fn list_page(
        &self,
        page_number: u64,
        page_size: u64,
    ) -> Result<Vec<avatar::Model>, AppError> {
        info!("Avatar | list | page={} | size={}", page_number, page_size);

        let index = page_index(page_number, page_size)?;
        Ok(avatar::Entity::find()
            .order_by_asc(avatar::Column::Id)
            .paginate(&self.db, page_size)
            .fetch_page(index)
            .await?)
    }

    async fn find_by_student(&self, student_id: i32) -> Result<avatar::Model, AppError> {
        avatar::Entity::find()
            .filter(avatar::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                warn!("Avatar | no avatar for student={}", student_id);
                AppError::avatar_not_found(student_id)
            })
    }

    /// Inserts or replaces the student's avatar row. A student removed after the
    /// upload's existence check trips the foreign key and reports as not found.
    async fn store_record(
        &self,
        student_id: i32,
        upload: AvatarUpload,
        file_path: String,
    ) -> Result<avatar::Model, AppError> {
        let file_size = upload.data.len() as i64;

        let existing = avatar::Entity::find()
            .filter(avatar::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await?;

        let result = match existing {
            Some(model) => {
                debug!("Avatar | replacing | student={} | old={}", student_id, model.file_path);
                let mut active_avatar = model.into_active_model();
                active_avatar.data = Set(upload.data);
                active_avatar.file_size = Set(file_size);
                active_avatar.media_type = Set(upload.media_type);
                active_avatar.file_path = Set(file_path);
                active_avatar.update(&self.db).await
            }
            None => {
                avatar::ActiveModel {
                    student_id: Set(student_id),
                    data: Set(upload.data),
                    file_size: Set(file_size),
                    media_type: Set(upload.media_type),
                    file_path: Set(file_path),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        };

        result.map_err(|e| {
            AppError::from_fk_violation(e, || AppError::student_not_found(student_id))
        })
    }

    async fn write_file(
        &self,
        data: &[u8],
        original_filename: Option<&str>,
    ) -> Result<String, AppError> {
        let path = self.avatars_dir.join(storage_file_name(original_filename));

        let fail = |e: std::io::Error| {
            error!("Avatar | write failed | path={} | {}", path.display(), e);
            AppError::AvatarProcessing(e)
        };

        tokio::fs::create_dir_all(&self.avatars_dir)
            .await
            .map_err(&fail)?;
        tokio::fs::write(&path, data).await.map_err(&fail)?;

        Ok(path.to_string_lossy().into_owned())
    }
}
