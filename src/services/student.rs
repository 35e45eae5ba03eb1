use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, warn};

use crate::entities::{avatar, faculty, student};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct StudentParams {
    pub name: String,
    pub age: i32,
    pub faculty_id: Option<i32>,
}

#[derive(Clone)]
pub struct StudentService {
    db: DatabaseConnection,
}

impl StudentService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, params: StudentParams) -> Result<student::Model, AppError> {
        info!("Student | create");
        debug!("Student | create | params={:?}", params);

        self.ensure_faculty_exists(params.faculty_id).await?;

        let student = student::ActiveModel {
            name: Set(params.name),
            age: Set(params.age),
            faculty_id: Set(params.faculty_id),
            ..Default::default()
        };

        Ok(student.insert(&self.db).await?)
    }

    pub async fn update(&self, id: i32, params: StudentParams) -> Result<student::Model, AppError> {
        info!("Student | update | id={}", id);
        debug!("Student | update | id={} | params={:?}", id, params);

        let existing = self.get(id).await?;
        self.ensure_faculty_exists(params.faculty_id).await?;

        let mut active_student = existing.into_active_model();
        active_student.name = Set(params.name);
        active_student.age = Set(params.age);
        active_student.faculty_id = Set(params.faculty_id);

        Ok(active_student.update(&self.db).await?)
    }

    pub async fn get(&self, id: i32) -> Result<student::Model, AppError> {
        debug!("Student | get | id={}", id);

        student::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                warn!("Student | no student with id={}", id);
                AppError::student_not_found(id)
            })
    }

    /// Removes the student together with its avatar record. The avatar file stays on disk.
    pub async fn remove(&self, id: i32) -> Result<(), AppError> {
        info!("Student | remove | id={}", id);

        let student = self.get(id).await?;

        let txn = self.db.begin().await?;
        avatar::Entity::delete_many()
            .filter(avatar::Column::StudentId.eq(student.id))
            .exec(&txn)
            .await?;
        student::Entity::delete_by_id(student.id).exec(&txn).await?;
        txn.commit().await?;

        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<student::Model>, AppError> {
        info!("Student | list all");

        Ok(student::Entity::find()
            .order_by_asc(student::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn filter_by_age(&self, age: i32) -> Result<Vec<student::Model>, AppError> {
        info!("Student | filter by age | age={}", age);

        Ok(student::Entity::find()
            .filter(student::Column::Age.eq(age))
            .order_by_asc(student::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Inclusive on both bounds.
    pub async fn filter_by_age_range(
        &self,
        min_age: i32,
        max_age: i32,
    ) -> Result<Vec<student::Model>, AppError> {
        info!("Student | filter by age range | min={} | max={}", min_age, max_age);

        Ok(student::Entity::find()
            .filter(student::Column::Age.between(min_age, max_age))
            .order_by_asc(student::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn faculty_of(&self, id: i32) -> Result<Option<faculty::Model>, AppError> {
        info!("Student | faculty | id={}", id);

        let student = self.get(id).await?;
        Ok(student.find_related(faculty::Entity).one(&self.db).await?)
    }

    async fn ensure_faculty_exists(&self, faculty_id: Option<i32>) -> Result<(), AppError> {
        let Some(faculty_id) = faculty_id else {
            return Ok(());
        };

        faculty::Entity::find_by_id(faculty_id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or_else(|| {
                warn!("Student | no faculty with id={}", faculty_id);
                AppError::faculty_not_found(faculty_id)
            })
    }
}
