use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info, warn};

use crate::entities::{faculty, student};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct FacultyParams {
    pub name: String,
    pub color: String,
}

#[derive(Clone)]
pub struct FacultyService {
    db: DatabaseConnection,
}

impl FacultyService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, params: FacultyParams) -> Result<faculty::Model, AppError> {
        info!("Faculty | create");
        debug!("Faculty | create | params={:?}", params);

        let faculty = faculty::ActiveModel {
            name: Set(params.name),
            color: Set(params.color),
            ..Default::default()
        };

        Ok(faculty.insert(&self.db).await?)
    }

    pub async fn update(&self, id: i32, params: FacultyParams) -> Result<faculty::Model, AppError> {
        info!("Faculty | update | id={}", id);

        let mut active_faculty = self.get(id).await?.into_active_model();
        active_faculty.name = Set(params.name);
        active_faculty.color = Set(params.color);

        Ok(active_faculty.update(&self.db).await?)
    }

    pub async fn get(&self, id: i32) -> Result<faculty::Model, AppError> {
        debug!("Faculty | get | id={}", id);

        faculty::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                warn!("Faculty | no faculty with id={}", id);
                AppError::faculty_not_found(id)
            })
    }

    /// Removes a faculty. Refuses while any student still references it.
    pub async fn remove(&self, id: i32) -> Result<(), AppError> {
        info!("Faculty | remove | id={}", id);

        let faculty = self.get(id).await?;

        let enrolled = student::Entity::find()
            .filter(student::Column::FacultyId.eq(faculty.id))
            .count(&self.db)
            .await?;
        if enrolled > 0 {
            warn!("Faculty | remove blocked | id={} | students={}", id, enrolled);
            return Err(AppError::Conflict(format!(
                "Faculty with id = {} still has {} student(s)",
                id, enrolled
            )));
        }

        self.delete_row(faculty.id).await
    }

    /// A student enrolled after the count above trips `ON DELETE RESTRICT`.
    async fn delete_row(&self, id: i32) -> Result<(), AppError> {
        faculty::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                AppError::from_fk_violation(e, || {
                    AppError::Conflict(format!("Faculty with id = {} still has students", id))
                })
            })?;
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<faculty::Model>, AppError> {
        info!("Faculty | list all");

        Ok(faculty::Entity::find()
            .order_by_asc(faculty::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn filter_by_color(&self, color: &str) -> Result<Vec<faculty::Model>, AppError> {
        info!("Faculty | filter by color | color={}", color);

        Ok(faculty::Entity::find()
            .filter(faculty::Column::Color.eq(color))
            .order_by_asc(faculty::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Case-insensitive match against either the color or the name.
    pub async fn filter_by_color_or_name(
        &self,
        term: &str,
    ) -> Result<Vec<faculty::Model>, AppError> {
        info!("Faculty | filter by color or name | term={}", term);

        let term = term.to_lowercase();
        Ok(faculty::Entity::find()
            .filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(faculty::Column::Color))).eq(term.clone()))
                    .add(Expr::expr(Func::lower(Expr::col(faculty::Column::Name))).eq(term)),
            )
            .order_by_asc(faculty::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Students enrolled in the faculty. Unknown faculties yield an empty list.
    pub async fn students_of(&self, faculty_id: i32) -> Result<Vec<student::Model>, AppError> {
        info!("Faculty | students | id={}", faculty_id);

        Ok(student::Entity::find()
            .filter(student::Column::FacultyId.eq(faculty_id))
            .order_by_asc(student::Column::Id)
            .all(&self.db)
            .await?)
    }
}
