use sea_orm::{
    sea_query::Expr, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
};
use tracing::info;

use crate::entities::student;
use crate::error::AppError;

/// Number of blocking workers the parallel average splits the ages across.
pub const AVERAGE_WORKERS: usize = 4;

/// Integer sum and count of a slice of ages; partials combine by addition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgeTotals {
    pub sum: i64,
    pub count: u64,
}

impl AgeTotals {
    pub fn of(ages: &[i32]) -> Self {
        Self {
            sum: ages.iter().map(|&age| i64::from(age)).sum(),
            count: ages.len() as u64,
        }
    }

    pub fn combine(self, other: Self) -> Self {
        Self {
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }

    pub fn mean(self) -> Result<f64, AppError> {
        if self.count == 0 {
            return Err(AppError::EmptyAggregate);
        }
        Ok(self.sum as f64 / self.count as f64)
    }
}

/// Splits `ages` into at most `workers` chunks, totals each on a blocking task and merges.
pub async fn parallel_average(ages: Vec<i32>, workers: usize) -> Result<f64, AppError> {
    if ages.is_empty() {
        return Err(AppError::EmptyAggregate);
    }

    let chunk_size = ages.len().div_ceil(workers.max(1));
    let handles: Vec<_> = ages
        .chunks(chunk_size)
        .map(|chunk| {
            let chunk = chunk.to_vec();
            tokio::task::spawn_blocking(move || AgeTotals::of(&chunk))
        })
        .collect();

    let mut totals = AgeTotals::default();
    for handle in handles {
        let partial = handle
            .await
            .map_err(|e| AppError::InternalServerError(format!("Task join error: {}", e)))?;
        totals = totals.combine(partial);
    }

    totals.mean()
}

/// Upper-cased names beginning with a capital `A`, sorted ascending.
pub fn upper_names_starting_with_a<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut selected: Vec<String> = names
        .into_iter()
        .filter(|name| name.starts_with('A'))
        .map(|name| name.to_uppercase())
        .collect();
    selected.sort();
    selected
}

/// Read-only derived queries over the student set.
#[derive(Clone)]
pub struct AggregationService {
    db: DatabaseConnection,
}

impl AggregationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        info!("Aggregation | count");
        Ok(student::Entity::find().count(&self.db).await?)
    }

    /// Sums and counts in the store; the division happens here so it matches
    /// [`parallel_average`] exactly.
    pub async fn average_age(&self) -> Result<f64, AppError> {
        info!("Aggregation | average age");

        let (sum, count): (Option<i64>, i64) = student::Entity::find()
            .select_only()
            .column_as(Expr::col(student::Column::Age).sum(), "age_sum")
            .column_as(Expr::col(student::Column::Id).count(), "student_count")
            .into_tuple()
            .one(&self.db)
            .await?
            .unwrap_or((None, 0));

        AgeTotals {
            sum: sum.unwrap_or(0),
            count: count.max(0) as u64,
        }
        .mean()
    }

    pub async fn last_five(&self) -> Result<Vec<student::Model>, AppError> {
        info!("Aggregation | last five by id");

        Ok(student::Entity::find()
            .order_by_desc(student::Column::Id)
            .limit(5)
            .all(&self.db)
            .await?)
    }

    /// Loads every name and filters in memory.
    pub async fn names_starting_with_a(&self) -> Result<Vec<String>, AppError> {
        info!("Aggregation | names starting with A");

        let names: Vec<String> = student::Entity::find()
            .select_only()
            .column(student::Column::Name)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(upper_names_starting_with_a(names))
    }

    pub async fn average_age_parallel(&self) -> Result<f64, AppError> {
        info!("Aggregation | average age (parallel)");

        let ages: Vec<i32> = student::Entity::find()
            .select_only()
            .column(student::Column::Age)
            .into_tuple()
            .all(&self.db)
            .await?;

        parallel_average(ages, AVERAGE_WORKERS).await
    }
}
